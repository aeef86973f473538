use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

use commands::{inspect, render, serve, summary};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "borderflow")]
#[command(about = "Border crossing dashboard: chart server and CLI tools")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where settings and data come from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Config file (defaults to borderflow.toml when present)
    #[arg(short, long, env = "BORDERFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// CSV file with the border-crossing records, overrides the config
    #[arg(short, long)]
    pub data_path: Option<PathBuf>,
}

impl SourceArgs {
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(data_path) = &self.data_path {
            settings.data_path = data_path.clone();
        }
        Ok(settings)
    }
}

/// Explicit control values for one-off builds.
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Measure, defaults to the first one in the dataset
    #[arg(short, long)]
    pub measure: Option<String>,

    /// First month included, "Jan 2020" or 2020-01-01
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// Last month included, "Dec 2020" or 2020-12-01
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,
}

fn parse_date_arg(raw: &str) -> std::result::Result<NaiveDate, String> {
    model::parse_month(raw)
        .or_else(|| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
        .ok_or_else(|| format!("expected \"Mon YYYY\" or YYYY-MM-DD, got {}", raw))
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
        #[arg(short, long)]
        bind_address: Option<String>,
    },
    /// Print missing values and Value statistics of the dataset
    Summary {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the derived table behind one chart
    Inspect {
        #[command(flatten)]
        source: SourceArgs,

        /// Chart id, see `render` for the list
        #[arg(long)]
        chart: String,

        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Print every chart specification as JSON
    Render {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        selection: SelectionArgs,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve { source, bind_address } => {
                let mut settings = source.settings()?;
                if let Some(bind_address) = bind_address {
                    settings.bind_address = bind_address;
                }
                serve(&settings).await?;
            }
            Commands::Summary { source } => {
                summary(&source.settings()?)?;
            }
            Commands::Inspect { source, chart, selection } => {
                inspect(&source.settings()?, &chart, &selection)?;
            }
            Commands::Render { source, selection } => {
                render(&source.settings()?, &selection)?;
            }
        }
        Ok(())
    }
}

use chrono::{Month, NaiveDate};

/// Column names of the border-crossing file.
pub mod columns {
    pub const PORT_NAME: &str = "Port Name";
    pub const STATE: &str = "State";
    pub const PORT_CODE: &str = "Port Code";
    pub const BORDER: &str = "Border";
    pub const DATE: &str = "Date";
    pub const MEASURE: &str = "Measure";
    pub const VALUE: &str = "Value";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const MONTH: &str = "Month";
    pub const YEAR: &str = "Year";

    /// Columns without which the dataset cannot be served.
    pub const REQUIRED: [&str; 6] = [BORDER, DATE, MEASURE, VALUE, STATE, PORT_NAME];

    /// Columns that hold numbers once parsed.
    pub const NUMERIC: [&str; 5] = [PORT_CODE, VALUE, LATITUDE, LONGITUDE, YEAR];
}

/// Parses a `Mon YYYY` cell such as `Jan 2024` into the first day of that month.
///
/// Anything else yields `None`; a bad date never fails the load.
pub fn parse_month(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(&format!("01 {}", trimmed), "%d %b %Y").ok()
}

/// One row of the border-crossing dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    port_name: String,
    state: String,
    port_code: Option<i64>,
    border: String,
    date: Option<NaiveDate>,
    measure: String,
    value: u64,
    latitude: Option<f64>,
    longitude: Option<f64>,
    month: Option<Month>,
    year: Option<i32>,
}

impl Record {
    /// Creates a new record without coordinates or derived columns.
    pub fn new(
        border: &str,
        date: Option<NaiveDate>,
        measure: &str,
        port_name: &str,
        state: &str,
        value: u64,
    ) -> Self {
        Self {
            port_name: port_name.to_string(),
            state: state.to_string(),
            port_code: None,
            border: border.to_string(),
            date,
            measure: measure.to_string(),
            value,
            latitude: None,
            longitude: None,
            month: None,
            year: None,
        }
    }

    pub fn with_coordinates(mut self, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    pub fn with_port_code(mut self, port_code: Option<i64>) -> Self {
        self.port_code = port_code;
        self
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn port_code(&self) -> Option<i64> {
        self.port_code
    }

    pub fn border(&self) -> &str {
        &self.border
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn measure(&self) -> &str {
        &self.measure
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    /// Both coordinates, when the row has them.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Month derived from the date. Empty until the derived-column pass ran.
    pub fn month(&self) -> Option<Month> {
        self.month
    }

    /// Year derived from the date. Empty until the derived-column pass ran.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Value of a numeric column by name, as used by the correlation matrix.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        match column {
            columns::PORT_CODE => self.port_code.map(|v| v as f64),
            columns::VALUE => Some(self.value as f64),
            columns::LATITUDE => self.latitude,
            columns::LONGITUDE => self.longitude,
            columns::YEAR => self.year.map(f64::from),
            _ => None,
        }
    }

    pub(crate) fn set_calendar(&mut self, month: Option<Month>, year: Option<i32>) {
        self.month = month;
        self.year = year;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_accepts_abbreviated_month() {
        assert_eq!(
            parse_month("Mar 2019"),
            NaiveDate::from_ymd_opt(2019, 3, 1)
        );
        assert_eq!(
            parse_month(" Dec 1996 "),
            NaiveDate::from_ymd_opt(1996, 12, 1)
        );
    }

    #[test]
    fn test_parse_month_turns_garbage_into_none() {
        assert_eq!(parse_month(""), None);
        assert_eq!(parse_month("2019-03"), None);
        assert_eq!(parse_month("Foo 2019"), None);
    }

    #[test]
    fn test_numeric_lookup() {
        let record = Record::new("US-Mexico Border", None, "Trucks", "El Paso", "Texas", 12)
            .with_coordinates(Some(31.76), Some(-106.45))
            .with_port_code(Some(2402));

        assert_eq!(record.numeric(columns::VALUE), Some(12.0));
        assert_eq!(record.numeric(columns::PORT_CODE), Some(2402.0));
        assert_eq!(record.numeric(columns::YEAR), None);
        assert_eq!(record.numeric(columns::BORDER), None);
        assert_eq!(record.coordinates(), Some((31.76, -106.45)));
    }
}

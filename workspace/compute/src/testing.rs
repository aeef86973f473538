//! Shared fixtures for the compute tests.

use chrono::NaiveDate;
use model::{Dataset, Record};

fn month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// The smallest useful dataset: one measure, two states.
pub fn two_row_dataset() -> Dataset {
    Dataset::from_records(vec![
        Record::new(
            "US-Mexico Border",
            month(2020, 1),
            "Personal Vehicles",
            "Laredo",
            "Texas",
            50,
        ),
        Record::new(
            "US-Mexico Border",
            month(2020, 1),
            "Personal Vehicles",
            "San Ysidro",
            "California",
            30,
        ),
    ])
    .enrich()
}

/// A handful of ports on both borders with three measures.
///
/// Trucks comes first, spans Jan to Apr 2020 and has one undated row and one
/// row without coordinates.
pub fn sample_dataset() -> Dataset {
    let canada = "US-Canada Border";
    let mexico = "US-Mexico Border";
    let detroit = (Some(42.33), Some(-83.05));
    let laredo = (Some(27.50), Some(-99.50));
    let el_paso = (Some(31.76), Some(-106.45));
    let otay = (Some(32.55), Some(-116.94));

    let rows = vec![
        (canada, month(2020, 1), "Trucks", "Detroit", "Michigan", 3801, 120, detroit),
        (canada, month(2020, 2), "Trucks", "Detroit", "Michigan", 3801, 130, detroit),
        (canada, month(2020, 3), "Trucks", "Buffalo", "New York", 901, 90, (None, None)),
        (mexico, month(2020, 1), "Trucks", "Laredo", "Texas", 2304, 300, laredo),
        (mexico, month(2020, 2), "Trucks", "Laredo", "Texas", 2304, 310, laredo),
        (mexico, month(2020, 3), "Trucks", "El Paso", "Texas", 2402, 200, el_paso),
        (mexico, month(2020, 4), "Trucks", "Otay Mesa", "California", 2506, 150, otay),
        (mexico, None, "Trucks", "Otay Mesa", "California", 2506, 40, otay),
        (canada, month(2020, 1), "Personal Vehicles", "Detroit", "Michigan", 3801, 500, detroit),
        (mexico, month(2020, 1), "Personal Vehicles", "Laredo", "Texas", 2304, 800, laredo),
        (mexico, month(2020, 2), "Personal Vehicles", "San Ysidro", "California", 2504, 900, (None, None)),
        (canada, month(2020, 3), "Personal Vehicles", "Blaine", "Washington", 3004, 400, (None, None)),
        (canada, month(2020, 1), "Buses", "Buffalo", "New York", 901, 10, (None, None)),
    ];

    let records = rows
        .into_iter()
        .map(|(border, date, measure, port, state, code, value, (lat, lon))| {
            Record::new(border, date, measure, port, state, value)
                .with_port_code(Some(code))
                .with_coordinates(lat, lon)
        })
        .collect();

    Dataset::from_records(records).enrich()
}

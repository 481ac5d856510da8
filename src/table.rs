//! Projection of records into display rows for the report table.

use serde::Serialize;

use crate::records::{Car, CarRecord};

/// One rendered table row. Cells are display strings; nothing here is re-parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub id: String,
    pub car: String,
    pub price: String,
    pub total_sales: String,
}

impl DisplayRow {
    pub fn header() -> Self {
        DisplayRow {
            id: "ID".to_string(),
            car: "Car".to_string(),
            price: "Price".to_string(),
            total_sales: "Total Sales".to_string(),
        }
    }

    pub fn from_record(record: &CarRecord) -> Self {
        DisplayRow {
            id: record.id.to_string(),
            car: format_car(&record.car),
            price: record.price.clone(),
            total_sales: record.total_sales.to_string(),
        }
    }

    pub fn cells(&self) -> [&str; 4] {
        [
            self.id.as_str(),
            self.car.as_str(),
            self.price.as_str(),
            self.total_sales.as_str(),
        ]
    }
}

/// `"{make} {model} ({year})"`
pub fn format_car(car: &Car) -> String {
    format!("{} {} ({})", car.make, car.model, car.year)
}

/// Header row followed by one row per record, in input order.
pub fn cars_to_table(records: &[CarRecord]) -> Vec<DisplayRow> {
    std::iter::once(DisplayRow::header())
        .chain(records.iter().map(DisplayRow::from_record))
        .collect()
}

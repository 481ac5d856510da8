//! Input record types as they appear in `car_sales.json`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque record identifier. The sales export uses integers, but any string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

/// Make, model and model year of a car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    #[serde(rename = "car_make")]
    pub make: String,
    #[serde(rename = "car_model")]
    pub model: String,
    #[serde(rename = "car_year")]
    pub year: i32,
}

/// One per-model sales record.
///
/// `price` is kept exactly as given (e.g. `"$1,234.56"`); it is only parsed
/// during aggregation, against an explicit [`NumericFormat`](crate::currency::NumericFormat).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    pub id: RecordId,
    pub car: Car,
    pub price: String,
    pub total_sales: u64,
}

impl CarRecord {
    pub fn new(
        id: impl Into<RecordId>,
        make: &str,
        model: &str,
        year: i32,
        price: &str,
        total_sales: u64,
    ) -> Self {
        CarRecord {
            id: id.into(),
            car: Car {
                make: make.to_string(),
                model: model.to_string(),
                year,
            },
            price: price.to_string(),
            total_sales,
        }
    }
}

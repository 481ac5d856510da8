use thiserror::Error;

use crate::records::RecordId;

/// A price string that is not a valid amount under the active [`NumericFormat`](crate::currency::NumericFormat).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("price {input:?} does not start with currency symbol {symbol:?}")]
    MissingSymbol { input: String, symbol: char },

    #[error("price {input:?} has no amount after the currency symbol")]
    Empty { input: String },

    #[error("price {input:?} is not a valid number: {reason}")]
    InvalidNumber { input: String, reason: &'static str },
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("cannot aggregate an empty record set")]
    EmptyInput,

    #[error("record {id}: {source}")]
    Format {
        id: RecordId,
        #[source]
        source: FormatError,
    },
}

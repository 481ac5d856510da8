pub mod aggregate;
pub mod config;
pub mod currency;
pub mod error;
pub mod loader;
pub mod mail;
pub mod narrative;
pub mod output;
pub mod records;
pub mod report;
pub mod table;

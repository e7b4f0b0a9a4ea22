//!
//! src/errors.rs
//!
//! Defines the error enum and conversions
//! shared by the catalog binaries
//!

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("config error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("write error: {0}")]
    Write(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self { CatalogError::Http(e.to_string()) }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self { CatalogError::Parse(e.to_string()) }
}

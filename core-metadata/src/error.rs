use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Invalid UTF-8 in metadata value for '{key}': {source}")]
    InvalidUtf8 {
        key: String,
        #[source]
        source: FromUtf8Error,
    },
}

pub type Result<T> = std::result::Result<T, MetadataError>;

mod openapi;
#[cfg(feature = "docs")]
pub use openapi::openapi::openapi;

pub mod upload;

pub mod reports;

pub mod records;

pub mod import;

pub mod reports;

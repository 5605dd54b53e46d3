pub mod amount;
pub mod date;
pub mod delimited;
pub mod parser;
pub mod pdf;
pub mod spreadsheet;

pub use date::parse_booking_date;
pub use parser::{ParsedStatement, RawRow, parse_statement};

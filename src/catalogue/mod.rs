pub mod error;
pub mod table;
pub mod sources;
pub mod reader;

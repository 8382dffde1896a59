pub mod table;

pub use table::CsvSink;

pub mod record_io;
pub mod records;

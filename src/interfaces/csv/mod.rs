pub mod payment_reader;
pub mod status_writer;

use crate::domain::payment::PaymentRecord;
use crate::error::{PaymentError, Result};
use std::io::Read;

/// Reads payment records from a CSV export.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<PaymentRecord>`.
/// Whitespace is trimmed and short records are tolerated, so exports from
/// different tools deserialize uniformly.
pub struct PaymentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PaymentReader<R> {
    /// Creates a new `PaymentReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes records, so a
    /// large export is processed in a streaming fashion.
    pub fn payments(self) -> impl Iterator<Item = Result<PaymentRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PaymentError::from))
    }
}

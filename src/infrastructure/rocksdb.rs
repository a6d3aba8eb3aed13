use crate::domain::payment::{PaymentRecord, PaymentStatus};
use crate::domain::ports::PaymentStore;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing payment records, keyed by order id.
pub const CF_PAYMENTS: &str = "payments";

/// A persistent payment store backed by RocksDB.
///
/// Records are stored as JSON under their order id. Per-student reads scan
/// the column family; the data set is one payments table for a single
/// institute, so a secondary index is not worth its upkeep.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbPaymentStore {
    db: Arc<DB>,
}

impl RocksDbPaymentStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the payments column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_payments])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_PAYMENTS).ok_or_else(|| {
            PaymentError::Internal(Box::new(std::io::Error::other(
                "payments column family not found",
            )))
        })
    }

    fn decode(bytes: &[u8]) -> Result<PaymentRecord> {
        serde_json::from_slice(bytes).map_err(|e| {
            PaymentError::Internal(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("failed to deserialize payment record: {e}"),
            )))
        })
    }

    fn encode(record: &PaymentRecord) -> Result<Vec<u8>> {
        serde_json::to_vec(record).map_err(|e| {
            PaymentError::Internal(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("failed to serialize payment record: {e}"),
            )))
        })
    }
}

#[async_trait]
impl PaymentStore for RocksDbPaymentStore {
    async fn record(&self, payment: PaymentRecord) -> Result<()> {
        let cf = self.cf()?;
        let value = Self::encode(&payment)?;
        self.db.put_cf(cf, payment.order_id.as_bytes(), value)?;
        Ok(())
    }

    async fn update_status(&self, order_id: &str, status: PaymentStatus) -> Result<()> {
        let cf = self.cf()?;
        let Some(bytes) = self.db.get_cf(cf, order_id.as_bytes())? else {
            return Err(PaymentError::Validation(format!(
                "unknown order id: {order_id}"
            )));
        };
        let mut record = Self::decode(&bytes)?;
        record.status = status;
        let value = Self::encode(&record)?;
        self.db.put_cf(cf, order_id.as_bytes(), value)?;
        Ok(())
    }

    async fn payments_for(&self, student_id: &str) -> Result<Vec<PaymentRecord>> {
        let cf = self.cf()?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            let record = Self::decode(&value)?;
            if record.student_id == student_id {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn student_ids(&self) -> Result<Vec<String>> {
        let cf = self.cf()?;
        let mut ids = BTreeSet::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            let record = Self::decode(&value)?;
            ids.insert(record.student_id);
        }
        Ok(ids.into_iter().collect())
    }
}

use crate::adapters::memory_store::InMemoryOrderStore;
use crate::domain::model::{OrderId, OrderQuery, OrderRecord, OrderStatus};
use crate::domain::ports::OrderStore;
use crate::utils::error::StoreError;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// One line of an order export file:
/// `id,created_at,status,subtotal,tax,total,billing_city,billing_state`.
#[derive(Debug, Deserialize)]
struct OrderRow {
    id: OrderId,
    #[serde(deserialize_with = "deserialize_timestamp")]
    created_at: NaiveDateTime,
    status: OrderStatus,
    #[serde(with = "rust_decimal::serde::str")]
    subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    tax: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    total: Decimal,
    #[serde(default)]
    billing_city: String,
    billing_state: String,
}

impl From<OrderRow> for OrderRecord {
    fn from(row: OrderRow) -> Self {
        OrderRecord {
            id: row.id,
            created_at: row.created_at,
            status: row.status,
            subtotal: row.subtotal,
            tax: row.tax,
            total: row.total,
            billing_city: row.billing_city,
            billing_region_code: row.billing_state,
        }
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

/// Parses an order export, tolerating a leading UTF-8 BOM.
pub fn parse_orders<R: Read>(mut reader: R) -> Result<Vec<OrderRecord>, StoreError> {
    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .map_err(|e| StoreError::Unavailable {
            message: format!("failed to read order data: {}", e),
        })?;
    let body = raw.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(raw.as_slice());

    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(body);
    let headers = csv
        .headers()
        .map_err(|e| StoreError::Malformed {
            line: 1,
            message: e.to_string(),
        })?
        .clone();

    let mut orders = Vec::new();
    let mut seen = HashSet::new();
    let mut record = csv::StringRecord::new();

    loop {
        let has_record = csv.read_record(&mut record).map_err(|e| StoreError::Malformed {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            message: e.to_string(),
        })?;
        if !has_record {
            break;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let row: OrderRow = record
            .deserialize(Some(&headers))
            .map_err(|e| StoreError::Malformed {
                line,
                message: e.to_string(),
            })?;
        // 同一訂單編號出現兩次，無法判斷哪一筆才是真的
        if !seen.insert(row.id) {
            return Err(StoreError::Malformed {
                line,
                message: format!("duplicate order id {}", row.id),
            });
        }
        orders.push(OrderRecord::from(row));
    }

    Ok(orders)
}

/// Order store reading a CSV order export from disk.
///
/// The file is re-read on every `find`, so each report sees the file as it is
/// when the report starts; `get` resolves against that snapshot.
#[derive(Debug)]
pub struct CsvOrderStore {
    path: PathBuf,
    snapshot: RwLock<InMemoryOrderStore>,
}

impl CsvOrderStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            snapshot: RwLock::new(InMemoryOrderStore::default()),
        }
    }

    fn reload(&self) -> Result<(), StoreError> {
        let file = std::fs::File::open(&self.path).map_err(|e| StoreError::Unavailable {
            message: format!("cannot open {}: {}", self.path.display(), e),
        })?;
        let orders = parse_orders(std::io::BufReader::new(file))?;
        tracing::debug!("Loaded {} orders from {}", orders.len(), self.path.display());

        let mut snapshot = self.snapshot.write().map_err(|_| StoreError::Unavailable {
            message: "order snapshot lock poisoned".to_string(),
        })?;
        *snapshot = InMemoryOrderStore::from_orders(orders);
        Ok(())
    }
}

impl OrderStore for CsvOrderStore {
    fn find(&self, query: &OrderQuery) -> Result<Vec<OrderId>, StoreError> {
        self.reload()?;
        let snapshot = self.snapshot.read().map_err(|_| StoreError::Unavailable {
            message: "order snapshot lock poisoned".to_string(),
        })?;
        snapshot.find(query)
    }

    fn get(&self, id: OrderId) -> Result<Option<OrderRecord>, StoreError> {
        let snapshot = self.snapshot.read().map_err(|_| StoreError::Unavailable {
            message: "order snapshot lock poisoned".to_string(),
        })?;
        snapshot.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\u{feff}id,created_at,status,subtotal,tax,total,billing_city,billing_state
100,2024-02-01 09:00:00,completed,47.00,3.00,50.00,Boston,MA
101,2024-03-15T18:30:00,wc-processing,23.97,1.53,25.50,\"Springfield, West\",MA
102,2024-03-16 08:00:00,cancelled,10,0.63,10.63,Lowell,MA
";

    #[test]
    fn test_parse_orders() {
        let orders = parse_orders(SAMPLE.as_bytes()).unwrap();

        assert_eq!(orders.len(), 3);
        assert_eq!(orders[0].id, 100);
        assert_eq!(orders[0].total, dec!(50.00));
        assert_eq!(orders[1].status, OrderStatus::Processing);
        assert_eq!(orders[1].billing_city, "Springfield, West");
        assert_eq!(orders[2].subtotal, dec!(10));
        assert_eq!(orders[2].status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_parse_orders_reports_bad_line() {
        let data = "id,created_at,status,subtotal,tax,total,billing_city,billing_state
1,2024-02-01 09:00:00,completed,1.00,0.00,1.00,Boston,MA
2,not-a-date,completed,1.00,0.00,1.00,Boston,MA
";

        match parse_orders(data.as_bytes()) {
            Err(StoreError::Malformed { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("not-a-date"));
            }
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_orders_rejects_repeated_id() {
        let data = "id,created_at,status,subtotal,tax,total,billing_city,billing_state
5,2024-02-01 09:00:00,completed,100.00,0.00,100.00,Nashua,NH
5,2024-02-01 09:00:00,completed,10.00,0.63,10.63,Boston,MA
";

        match parse_orders(data.as_bytes()) {
            Err(StoreError::Malformed { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("duplicate order id 5"));
            }
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_store_with_repeated_id_never_reports_foreign_order() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"id,created_at,status,subtotal,tax,total,billing_city,billing_state
5,2024-02-01 09:00:00,completed,100.00,0.00,100.00,Nashua,NH
5,2024-02-01 09:00:00,completed,10.00,0.63,10.63,Boston,MA
",
        )
        .unwrap();
        file.flush().unwrap();

        let store = CsvOrderStore::new(file.path());
        let result = crate::core::aggregator::aggregate(1, 2024, "MA", &store);

        assert!(matches!(
            result,
            Err(crate::utils::error::ReportError::StoreUnavailable {
                source: StoreError::Malformed { line: 3, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_store_rereads_file_on_find() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();

        let store = CsvOrderStore::new(file.path());
        let query = OrderQuery {
            range: crate::core::quarter::resolve(1, 2024).unwrap(),
            statuses: OrderStatus::REPORTABLE.to_vec(),
            billing_region: "MA".to_string(),
        };

        assert_eq!(store.find(&query).unwrap(), vec![100, 101]);
        assert_eq!(store.get(101).unwrap().unwrap().tax, dec!(1.53));

        writeln!(file, "103,2024-01-02 00:00:00,completed,1.00,0.06,1.06,Salem,MA").unwrap();
        file.flush().unwrap();

        assert_eq!(store.find(&query).unwrap(), vec![100, 101, 103]);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let store = CsvOrderStore::new("/definitely/not/here/orders.csv");
        let query = OrderQuery {
            range: crate::core::quarter::resolve(1, 2024).unwrap(),
            statuses: OrderStatus::REPORTABLE.to_vec(),
            billing_region: "MA".to_string(),
        };

        assert!(matches!(
            store.find(&query),
            Err(StoreError::Unavailable { .. })
        ));
    }
}

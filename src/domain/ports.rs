use crate::domain::model::{OrderId, OrderQuery, OrderRecord, Report, ReportPeriod};
use crate::utils::error::{Result, StoreError};

/// Read-only access to the host order store.
pub trait OrderStore {
    /// Ids of orders matching the query, in the store's own order.
    fn find(&self, query: &OrderQuery) -> std::result::Result<Vec<OrderId>, StoreError>;

    /// `Ok(None)` when the id no longer resolves (e.g. the order was deleted
    /// after `find` ran).
    fn get(&self, id: OrderId) -> std::result::Result<Option<OrderRecord>, StoreError>;
}

impl<T: OrderStore + ?Sized> OrderStore for &T {
    fn find(&self, query: &OrderQuery) -> std::result::Result<Vec<OrderId>, StoreError> {
        (**self).find(query)
    }

    fn get(&self, id: OrderId) -> std::result::Result<Option<OrderRecord>, StoreError> {
        (**self).get(id)
    }
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Display surface for a finished report.
pub trait ReportPresenter {
    fn present(&mut self, period: &ReportPeriod, report: &Report) -> Result<()>;
}

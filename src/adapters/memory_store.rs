use crate::domain::model::{OrderId, OrderQuery, OrderRecord};
use crate::domain::ports::OrderStore;
use crate::utils::error::StoreError;

/// Order store backed by a `Vec`, returning matches in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Vec<OrderRecord>,
}

impl InMemoryOrderStore {
    /// Later records replace earlier ones with the same id, so `find` and
    /// `get` always see the same record.
    pub fn from_orders(orders: Vec<OrderRecord>) -> Self {
        let mut store = Self::default();
        for order in orders {
            store.insert(order);
        }
        store
    }

    /// Adds an order, replacing any existing one with the same id in place.
    pub fn insert(&mut self, order: OrderRecord) {
        match self.orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => *existing = order,
            None => self.orders.push(order),
        }
    }

    pub fn remove(&mut self, id: OrderId) -> Option<OrderRecord> {
        let index = self.orders.iter().position(|o| o.id == id)?;
        Some(self.orders.remove(index))
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn find(&self, query: &OrderQuery) -> Result<Vec<OrderId>, StoreError> {
        Ok(self
            .orders
            .iter()
            .filter(|order| query.matches(order))
            .map(|order| order.id)
            .collect())
    }

    fn get(&self, id: OrderId) -> Result<Option<OrderRecord>, StoreError> {
        Ok(self.orders.iter().find(|o| o.id == id).cloned())
    }
}

// Adapters layer: concrete implementations of the domain ports.

pub mod csv_store;
pub mod local_storage;
pub mod memory_store;

pub use csv_store::CsvOrderStore;
pub use local_storage::LocalStorage;
pub use memory_store::InMemoryOrderStore;

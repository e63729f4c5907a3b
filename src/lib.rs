pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::Cli;
pub use config::ReportConfig;

pub use adapters::{CsvOrderStore, InMemoryOrderStore, LocalStorage};
pub use core::report_service::{CsvExport, ReportService, ReportSettings};
pub use domain::model::{OrderRecord, OrderStatus, QuarterRange, Report, ReportPeriod};
pub use utils::error::{ReportError, Result, StoreError};

pub mod aggregator;
pub mod csv_renderer;
pub mod quarter;
pub mod report_service;

pub use crate::domain::model::{OrderRecord, OrderStatus, QuarterRange, Report, ReportPeriod};
pub use crate::domain::ports::{OrderStore, ReportPresenter, Storage};
pub use crate::utils::error::Result;

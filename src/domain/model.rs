use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type OrderId = u64;

/// Lifecycle states an order moves through on the host store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[serde(alias = "wc-pending")]
    Pending,
    #[serde(alias = "wc-processing")]
    Processing,
    #[serde(alias = "wc-on-hold")]
    OnHold,
    #[serde(alias = "wc-completed")]
    Completed,
    #[serde(alias = "wc-cancelled")]
    Cancelled,
    #[serde(alias = "wc-refunded")]
    Refunded,
    #[serde(alias = "wc-failed")]
    Failed,
}

impl OrderStatus {
    /// Only paid orders count towards collected tax.
    pub const REPORTABLE: [OrderStatus; 2] = [OrderStatus::Completed, OrderStatus::Processing];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::OnHold => "on-hold",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of an order as the store hands it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub created_at: NaiveDateTime,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub billing_city: String,
    pub billing_region_code: String,
}

/// Inclusive timestamp bounds of a calendar quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuarterRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl QuarterRange {
    pub fn contains(&self, instant: &NaiveDateTime) -> bool {
        *instant >= self.start && *instant <= self.end
    }
}

/// What the aggregator asks the order store for.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderQuery {
    pub range: QuarterRange,
    pub statuses: Vec<OrderStatus>,
    pub billing_region: String,
}

impl OrderQuery {
    pub fn matches(&self, order: &OrderRecord) -> bool {
        self.range.contains(&order.created_at)
            && self.statuses.contains(&order.status)
            && order.billing_region_code == self.billing_region
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Report {
    pub orders: Vec<OrderRecord>,
    pub total_sales: Decimal,
    pub total_tax: Decimal,
    pub order_count: usize,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// A requested reporting period. Missing parts default to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    pub quarter: u32,
    pub year: i32,
}

impl ReportPeriod {
    pub fn new(quarter: u32, year: i32) -> Self {
        Self { quarter, year }
    }

    /// 季度 = ceil(月份 / 3)
    pub fn containing(date: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            quarter: (date.month() + 2) / 3,
            year: date.year(),
        }
    }

    pub fn current() -> Self {
        Self::containing(chrono::Local::now().date_naive())
    }

    pub fn or_default(quarter: Option<u32>, year: Option<i32>, today: chrono::NaiveDate) -> Self {
        let current = Self::containing(today);
        Self {
            quarter: quarter.unwrap_or(current.quarter),
            year: year.unwrap_or(current.year),
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} {}", self.quarter, self.year)
    }
}

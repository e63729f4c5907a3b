use crate::core::quarter;
use crate::domain::model::{OrderQuery, OrderStatus, Report};
use crate::domain::ports::OrderStore;
use crate::utils::error::{ReportError, Result, StoreError};
use rust_decimal::Decimal;

/// Collects completed and processing orders billed to `region_code` during
/// the quarter and sums their totals and tax.
///
/// Ids that no longer resolve by the time they are fetched are skipped; any
/// other store failure aborts the report.
pub fn aggregate<S: OrderStore>(
    quarter: u32,
    year: i32,
    region_code: &str,
    store: &S,
) -> Result<Report> {
    let range = quarter::resolve(quarter, year)?;
    let store_failure = |source: StoreError| ReportError::StoreUnavailable {
        quarter,
        year,
        source,
    };

    let query = OrderQuery {
        range,
        statuses: OrderStatus::REPORTABLE.to_vec(),
        billing_region: region_code.to_string(),
    };

    tracing::debug!(
        "Querying orders for Q{} {} ({} .. {}) in region {}",
        quarter,
        year,
        range.start,
        range.end,
        region_code
    );
    let ids = store.find(&query).map_err(store_failure)?;
    tracing::debug!("Order store matched {} order ids", ids.len());

    let mut report = Report {
        orders: Vec::with_capacity(ids.len()),
        total_sales: Decimal::ZERO,
        total_tax: Decimal::ZERO,
        order_count: 0,
    };

    for id in ids {
        let Some(order) = store.get(id).map_err(store_failure)? else {
            // 訂單在查詢後被刪除，直接略過
            tracing::warn!("Order {} disappeared before it could be loaded, skipping", id);
            continue;
        };

        let overflow = || ReportError::TotalsOverflow {
            quarter,
            year,
            order_id: order.id,
        };
        report.total_sales = report.total_sales.checked_add(order.total).ok_or_else(overflow)?;
        report.total_tax = report.total_tax.checked_add(order.tax).ok_or_else(overflow)?;
        report.orders.push(order);
    }
    report.order_count = report.orders.len();

    tracing::info!(
        "Aggregated {} orders for Q{} {}: sales {}, tax {}",
        report.order_count,
        quarter,
        year,
        report.total_sales,
        report.total_tax
    );

    Ok(report)
}

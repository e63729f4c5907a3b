use crate::core::csv_renderer::format_amount;
use crate::domain::model::{Report, ReportPeriod};
use crate::domain::ports::ReportPresenter;
use crate::utils::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

pub const NO_ORDERS_MESSAGE: &str = "No orders found for the selected period.";

/// Inserts `,` thousands separators into an already formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(formatted.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

/// `$1,234.56`
pub fn format_money(value: Decimal) -> String {
    let formatted = group_thousands(&format_amount(value));
    match formatted.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", formatted),
    }
}

pub fn format_count(count: usize) -> String {
    group_thousands(&count.to_string())
}

/// Terminal rendering of the summary card and the order details table.
pub struct TextPresenter<W: Write> {
    writer: W,
    jurisdiction: String,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(writer: W, jurisdiction: impl Into<String>) -> Self {
        Self {
            writer,
            jurisdiction: jurisdiction.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_summary(&mut self, period: &ReportPeriod, report: &Report) -> std::io::Result<()> {
        let w = &mut self.writer;
        writeln!(
            w,
            "Q{} {} - {} Sales Summary",
            period.quarter, period.year, self.jurisdiction
        )?;
        writeln!(w)?;
        writeln!(w, "{:<22}{:>16}", "Metric", "Value")?;
        writeln!(w, "{:<22}{:>16}", "Total Orders", format_count(report.order_count))?;
        writeln!(w, "{:<22}{:>16}", "Total Sales", format_money(report.total_sales))?;
        writeln!(w, "{:<22}{:>16}", "Total Tax Collected", format_money(report.total_tax))?;
        Ok(())
    }

    fn write_details(&mut self, report: &Report) -> std::io::Result<()> {
        let w = &mut self.writer;
        writeln!(w)?;
        writeln!(w, "Order Details")?;
        writeln!(
            w,
            "{:<10}{:<14}{:>14}{:>12}{:>14}  {}",
            "Order ID", "Date", "Subtotal", "Tax", "Total", "City"
        )?;

        for order in &report.orders {
            writeln!(
                w,
                "{:<10}{:<14}{:>14}{:>12}{:>14}  {}",
                format!("#{}", order.id),
                order.created_at.format("%b %d, %Y").to_string(),
                format_money(order.subtotal),
                format_money(order.tax),
                format_money(order.total),
                order.billing_city
            )?;
        }
        Ok(())
    }
}

impl<W: Write> ReportPresenter for TextPresenter<W> {
    fn present(&mut self, period: &ReportPeriod, report: &Report) -> Result<()> {
        if report.is_empty() {
            writeln!(self.writer, "{}", NO_ORDERS_MESSAGE)?;
        } else {
            self.write_summary(period, report)?;
            self.write_details(report)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    quarter: u32,
    year: i32,
    region_code: &'a str,
    #[serde(flatten)]
    report: &'a Report,
}

/// Machine-readable rendering, one JSON document per report.
pub struct JsonPresenter<W: Write> {
    writer: W,
    region_code: String,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(writer: W, region_code: impl Into<String>) -> Self {
        Self {
            writer,
            region_code: region_code.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportPresenter for JsonPresenter<W> {
    fn present(&mut self, period: &ReportPeriod, report: &Report) -> Result<()> {
        let summary = JsonSummary {
            quarter: period.quarter,
            year: period.year,
            region_code: &self.region_code,
            report,
        };
        serde_json::to_writer_pretty(&mut self.writer, &summary)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

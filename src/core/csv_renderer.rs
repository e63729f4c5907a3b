use crate::domain::model::Report;
use crate::utils::error::Result;
use rust_decimal::{Decimal, RoundingStrategy};
use std::io::Write;

/// Spreadsheet tools need the BOM to read non-ASCII city names as UTF-8.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

pub const HEADER: [&str; 7] = ["Order ID", "Date", "Subtotal", "Tax", "Total", "City", "State"];

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Two decimals, `.` separator, no grouping, half away from zero.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer)
}

/// Streams the export into `writer`: BOM, header, one row per order, a blank
/// separator line and the `TOTAL` row.
pub fn render_to<W: Write>(report: &Report, mut writer: W) -> Result<()> {
    writer.write_all(&UTF8_BOM)?;

    {
        let mut csv = csv_writer(&mut writer);
        csv.write_record(HEADER)?;

        for order in &report.orders {
            csv.write_record([
                order.id.to_string(),
                order.created_at.format(DATE_FORMAT).to_string(),
                format_amount(order.subtotal),
                format_amount(order.tax),
                format_amount(order.total),
                order.billing_city.clone(),
                order.billing_region_code.clone(),
            ])?;
        }
        csv.flush()?;
    }

    writer.write_all(b"\n")?;

    // Tax and Total columns carry total_tax and total_sales
    let mut csv = csv_writer(&mut writer);
    csv.write_record([
        "TOTAL".to_string(),
        format!("{} orders", report.order_count),
        String::new(),
        format_amount(report.total_tax),
        format_amount(report.total_sales),
        String::new(),
        String::new(),
    ])?;
    csv.flush()?;

    Ok(())
}

/// Renders the export into memory.
///
/// Writing to a `Vec<u8>` cannot fail, so an error here means the report was
/// rejected by the CSV writer itself.
pub fn render(report: &Report) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(128 + report.orders.len() * 64);
    render_to(report, &mut buffer)?;
    tracing::debug!(
        "Rendered CSV with {} data rows ({} bytes)",
        report.orders.len(),
        buffer.len()
    );
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{OrderRecord, OrderStatus};
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    fn order(id: u64, city: &str, subtotal: Decimal, tax: Decimal, total: Decimal) -> OrderRecord {
        OrderRecord {
            id,
            created_at: NaiveDateTime::parse_from_str("2024-01-05 14:03:09", DATE_FORMAT).unwrap(),
            status: OrderStatus::Completed,
            subtotal,
            tax,
            total,
            billing_city: city.to_string(),
            billing_region_code: "MA".to_string(),
        }
    }

    fn two_order_report() -> Report {
        Report {
            orders: vec![
                order(100, "Boston", dec!(47.00), dec!(3.00), dec!(50.00)),
                order(101, "Worcester", dec!(23.97), dec!(1.53), dec!(25.50)),
            ],
            total_sales: dec!(75.50),
            total_tax: dec!(4.53),
            order_count: 2,
        }
    }

    fn as_text(bytes: &[u8]) -> &str {
        std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(19.999)), "20.00");
        assert_eq!(format_amount(dec!(5)), "5.00");
        assert_eq!(format_amount(dec!(0.125)), "0.13");
        assert_eq!(format_amount(dec!(1234567.8)), "1234567.80");
        assert_eq!(format_amount(dec!(-2.345)), "-2.35");
        assert_eq!(format_amount(dec!(-0.001)), "0.00");
    }

    #[test]
    fn test_render_starts_with_bom() {
        let bytes = render(&Report::default()).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
    }

    #[test]
    fn test_render_empty_report() {
        let bytes = render(&Report::default()).unwrap();

        assert_eq!(
            as_text(&bytes),
            "Order ID,Date,Subtotal,Tax,Total,City,State\n\nTOTAL,0 orders,,0.00,0.00,,\n"
        );
    }

    #[test]
    fn test_render_two_orders() {
        let bytes = render(&two_order_report()).unwrap();
        let lines: Vec<&str> = as_text(&bytes).lines().collect();

        assert_eq!(
            lines,
            vec![
                "Order ID,Date,Subtotal,Tax,Total,City,State",
                "100,2024-01-05 14:03:09,47.00,3.00,50.00,Boston,MA",
                "101,2024-01-05 14:03:09,23.97,1.53,25.50,Worcester,MA",
                "",
                "TOTAL,2 orders,,4.53,75.50,,",
            ]
        );
    }

    #[test]
    fn test_render_quotes_csv_significant_characters() {
        let report = Report {
            orders: vec![order(7, "Boston, \"Back Bay\"", dec!(1), dec!(0), dec!(1))],
            total_sales: dec!(1),
            total_tax: dec!(0),
            order_count: 1,
        };

        let bytes = render(&report).unwrap();

        assert!(as_text(&bytes).contains("\"Boston, \"\"Back Bay\"\"\",MA"));
    }

    #[test]
    fn test_render_keeps_non_ascii_city_names() {
        let report = Report {
            orders: vec![order(8, "Sainte-Thérèse", dec!(1), dec!(0), dec!(1))],
            total_sales: dec!(1),
            total_tax: dec!(0),
            order_count: 1,
        };

        let bytes = render(&report).unwrap();

        assert!(as_text(&bytes).contains(",Sainte-Thérèse,MA\n"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let report = two_order_report();
        assert_eq!(render(&report).unwrap(), render(&report).unwrap());
    }

    #[test]
    fn test_render_round_trips_through_csv_reader() {
        let report = Report {
            orders: vec![
                order(1, "Line\nBreak", dec!(19.999), dec!(1.25), dec!(21.249)),
                order(2, "Quote \"Town\"", dec!(5), dec!(0.31), dec!(5.31)),
            ],
            total_sales: dec!(26.559),
            total_tax: dec!(1.56),
            order_count: 2,
        };
        let bytes = render(&report).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(&bytes[UTF8_BOM.len()..]);
        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();

        // the reader drops the blank separator line
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], HEADER.map(str::to_string).to_vec());
        assert_eq!(
            rows[1],
            vec!["1", "2024-01-05 14:03:09", "20.00", "1.25", "21.25", "Line\nBreak", "MA"]
        );
        assert_eq!(
            rows[2],
            vec!["2", "2024-01-05 14:03:09", "5.00", "0.31", "5.31", "Quote \"Town\"", "MA"]
        );
        assert_eq!(rows[3], vec!["TOTAL", "2 orders", "", "1.56", "26.56", "", ""]);
        assert!(as_text(&bytes).contains("\n\nTOTAL,"));
    }
}

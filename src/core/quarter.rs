use crate::domain::model::QuarterRange;
use crate::utils::error::{ReportError, Result};
use chrono::{NaiveDate, NaiveTime};

/// (first month, first day) and (last month, last day) of each quarter.
const QUARTER_BOUNDS: [((u32, u32), (u32, u32)); 4] = [
    ((1, 1), (3, 31)),
    ((4, 1), (6, 30)),
    ((7, 1), (9, 30)),
    ((10, 1), (12, 31)),
];

/// Maps a calendar quarter to its inclusive timestamp range, from
/// 00:00:00 on the first day to 23:59:59 on the last.
///
/// Any year chrono can represent is accepted, including 1900 or 9999; such
/// periods simply match no orders.
pub fn resolve(quarter: u32, year: i32) -> Result<QuarterRange> {
    let index = quarter
        .checked_sub(1)
        .filter(|i| *i < 4)
        .ok_or(ReportError::InvalidQuarter { quarter })?;
    let ((start_month, start_day), (end_month, end_day)) = QUARTER_BOUNDS[index as usize];

    let start_date = NaiveDate::from_ymd_opt(year, start_month, start_day)
        .ok_or(ReportError::InvalidYear { year })?;
    let end_date = NaiveDate::from_ymd_opt(year, end_month, end_day)
        .ok_or(ReportError::InvalidYear { year })?;

    Ok(QuarterRange {
        start: start_date.and_time(NaiveTime::MIN),
        end: end_date.and_hms_opt(23, 59, 59).ok_or(ReportError::InvalidYear { year })?,
    })
}

//! Human-readable summary lines for an [`AggregationResult`].

use crate::aggregate::AggregationResult;
use crate::currency::{NumericFormat, format_amount};
use crate::table::format_car;

/// Line break used when the summary goes into the HTML document.
pub const HTML_LINE_BREAK: &str = "<br/>";

/// Produces the three summary lines: revenue leader, sales leader, top year.
pub fn summarize(result: &AggregationResult<'_>, format: &NumericFormat) -> [String; 3] {
    let revenue = &result.revenue_leader;
    [
        format!(
            "The {} generated the most revenue: {}.",
            format_car(&revenue.record.car),
            format_amount(revenue.revenue, format)
        ),
        format!(
            "The {} had the most sales: {}.",
            result.sales_leader.car.model, result.sales_leader.total_sales
        ),
        format!(
            "The most popular year was {} with {} sales.",
            result.top_year.year, result.top_year.count
        ),
    ]
}

pub fn join_lines(lines: &[String], delimiter: &str) -> String {
    lines.join(delimiter)
}

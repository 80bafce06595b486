//! Chart data preparation and the SVG chart components.
//!
//! Charts are drawn with plain SVG primitives; entries without a usable
//! date are left out of every grouping.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use yew::prelude::*;

use crate::model::{parse_date, Entry};

const INCOME_COLOR: &str = "#173E63";
const EXPENSE_COLOR: &str = "#dc2626";
const ACCENT_COLOR: &str = "#1D617A";

#[derive(Clone, PartialEq, Debug)]
pub struct MonthlyTotals {
    pub label: String,
    pub income: f64,
    pub expense: f64,
}

/// Income and expense summed per calendar month, oldest first.
pub fn monthly_breakdown(entries: &[Entry]) -> Vec<MonthlyTotals> {
    let mut buckets: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for entry in entries {
        let Some(date) = parse_date(&entry.date) else {
            continue;
        };
        let Some(month) = date.with_day(1) else {
            continue;
        };
        let slot = buckets.entry(month).or_insert((0.0, 0.0));
        if entry.income {
            slot.0 += entry.amount;
        }
        if entry.expense {
            slot.1 += entry.amount;
        }
    }
    buckets
        .into_iter()
        .map(|(month, (income, expense))| MonthlyTotals {
            label: month.format("%B %Y").to_string(),
            income,
            expense,
        })
        .collect()
}

/// Net amount (income minus expense) per half-month bucket. Labels run over
/// every 1st and 15th from the first dated entry's month through the last's;
/// buckets with no entries read zero.
pub fn fortnight_series(entries: &[Entry]) -> Vec<(String, f64)> {
    let mut net: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut first: Option<NaiveDate> = None;
    let mut last: Option<NaiveDate> = None;
    for entry in entries {
        let Some(date) = parse_date(&entry.date) else {
            continue;
        };
        let Some(bucket) = date.with_day(if date.day() <= 15 { 1 } else { 15 }) else {
            continue;
        };
        let slot = net.entry(bucket).or_insert(0.0);
        if entry.income {
            *slot += entry.amount;
        }
        if entry.expense {
            *slot -= entry.amount;
        }
        first = Some(first.map_or(date, |d| d.min(date)));
        last = Some(last.map_or(date, |d| d.max(date)));
    }
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };
    fortnight_marks(first, last)
        .into_iter()
        .map(|mark| {
            let value = net.get(&mark).copied().unwrap_or(0.0);
            (mark.format("%Y-%m-%d").to_string(), value)
        })
        .collect()
}

/// Every 1st and 15th from `start`'s month through `end`'s month.
fn fortnight_marks(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut marks = Vec::new();
    let Some(mut cursor) = start.with_day(1) else {
        return marks;
    };
    let Some(end_month) = end.with_day(1) else {
        return marks;
    };
    while cursor <= end_month {
        marks.push(cursor);
        if let Some(mid) = cursor.with_day(15) {
            marks.push(mid);
        }
        let next = if cursor.month() == 12 {
            NaiveDate::from_ymd_opt(cursor.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(cursor.year(), cursor.month() + 1, 1)
        };
        match next {
            Some(month) => cursor = month,
            None => break,
        }
    }
    marks
}

#[derive(Properties, PartialEq)]
pub struct BarChartProps {
    pub data: Vec<MonthlyTotals>,
}

#[function_component(BarChart)]
pub fn bar_chart(props: &BarChartProps) -> Html {
    if props.data.is_empty() {
        return html! {
            <p class="text-sm text-muted-foreground">{"No dated entries to chart."}</p>
        };
    }

    let max = props
        .data
        .iter()
        .map(|month| month.income.max(month.expense))
        .fold(0.0f64, f64::max);
    let scale = |value: f64| -> f64 {
        if max > 0.0 {
            value / max * 140.0
        } else {
            0.0
        }
    };
    let width = props.data.len() * 64 + 16;

    html! {
        <div>
            <div class="flex items-center gap-4 mb-2 text-xs text-muted-foreground">
                <span class="flex items-center gap-1">
                    <span class="w-3 h-3 rounded-sm inline-block" style={format!("background: {INCOME_COLOR}")}></span>
                    {"Income"}
                </span>
                <span class="flex items-center gap-1">
                    <span class="w-3 h-3 rounded-sm inline-block" style={format!("background: {EXPENSE_COLOR}")}></span>
                    {"Expense"}
                </span>
            </div>
            <svg viewBox={format!("0 0 {width} 184")} class="w-full" role="img">
                { for props.data.iter().enumerate().map(|(i, month)| {
                    let x0 = 16 + i * 64;
                    let income_h = scale(month.income);
                    let expense_h = scale(month.expense);
                    html! {
                        <g>
                            <rect
                                x={x0.to_string()}
                                y={format!("{:.1}", 160.0 - income_h)}
                                width="20"
                                height={format!("{:.1}", income_h)}
                                fill={INCOME_COLOR}
                            />
                            <rect
                                x={(x0 + 24).to_string()}
                                y={format!("{:.1}", 160.0 - expense_h)}
                                width="20"
                                height={format!("{:.1}", expense_h)}
                                fill={EXPENSE_COLOR}
                            />
                            <text
                                x={(x0 + 22).to_string()}
                                y="174"
                                font-size="7"
                                text-anchor="middle"
                                fill="#64748b"
                            >
                                { month.label.clone() }
                            </text>
                        </g>
                    }
                }) }
            </svg>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PieChartProps {
    pub income: f64,
    pub expense: f64,
}

#[function_component(PieChart)]
pub fn pie_chart(props: &PieChartProps) -> Html {
    let total = props.income + props.expense;
    if total <= 0.0 {
        return html! {
            <p class="text-sm text-muted-foreground">{"No amounts to chart."}</p>
        };
    }

    let share = props.income / total;
    let radius = 38.0;
    let circumference = 2.0 * std::f64::consts::PI * radius;
    let dash = share * circumference;

    html! {
        <div class="flex items-center gap-6">
            <div class="relative flex items-center justify-center shrink-0">
                <svg class="w-24 h-24 transform -rotate-90" role="img">
                    <circle cx="48" cy="48" r={radius.to_string()} stroke={EXPENSE_COLOR} stroke-width="12" fill="transparent" />
                    <circle cx="48" cy="48" r={radius.to_string()} stroke={INCOME_COLOR} stroke-width="12" fill="transparent" stroke-dasharray={format!("{dash:.2} {circumference:.2}")} />
                </svg>
                <div class="absolute inset-0 flex items-center justify-center">
                    <span class="text-sm font-black text-[#173E63]">{ format!("{}%", (share * 100.0).round() as i32) }</span>
                </div>
            </div>
            <div class="space-y-1 text-sm">
                <p class="flex items-center gap-2">
                    <span class="w-3 h-3 rounded-sm inline-block" style={format!("background: {INCOME_COLOR}")}></span>
                    { format!("Income {}", crate::model::format_amount(props.income)) }
                </p>
                <p class="flex items-center gap-2">
                    <span class="w-3 h-3 rounded-sm inline-block" style={format!("background: {EXPENSE_COLOR}")}></span>
                    { format!("Expense {}", crate::model::format_amount(props.expense)) }
                </p>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LineChartProps {
    pub points: Vec<(String, f64)>,
}

#[function_component(LineChart)]
pub fn line_chart(props: &LineChartProps) -> Html {
    if props.points.is_empty() {
        return html! {
            <p class="text-sm text-muted-foreground">{"No dated entries to chart."}</p>
        };
    }

    let width = (props.points.len().saturating_sub(1)) * 48 + 32;
    let min = props.points.iter().map(|(_, v)| *v).fold(0.0f64, f64::min);
    let max = props.points.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let range = if max - min > 0.0 { max - min } else { 1.0 };
    let y = |value: f64| -> f64 { 10.0 + (max - value) / range * 86.0 };
    let x = |index: usize| -> f64 { 16.0 + index as f64 * 48.0 };

    let path = props
        .points
        .iter()
        .enumerate()
        .map(|(i, (_, value))| format!("{:.1},{:.1}", x(i), y(*value)))
        .collect::<Vec<_>>()
        .join(" ");
    let zero = y(0.0);

    html! {
        <svg viewBox={format!("0 0 {width} 120")} class="w-full" role="img">
            <line x1="8" y1={format!("{zero:.1}")} x2={(width - 8).to_string()} y2={format!("{zero:.1}")} stroke="#e2e8f0" stroke-width="1" />
            <polyline points={path} fill="none" stroke={ACCENT_COLOR} stroke-width="2" />
            { for props.points.iter().enumerate().map(|(i, (label, value))| html! {
                <g>
                    <circle cx={format!("{:.1}", x(i))} cy={format!("{:.1}", y(*value))} r="2" fill={ACCENT_COLOR} />
                    <text x={format!("{:.1}", x(i))} y="114" font-size="6" text-anchor="middle" fill="#64748b">
                        { label.clone() }
                    </text>
                </g>
            }) }
        </svg>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, amount: f64, income: bool, expense: bool) -> Entry {
        Entry {
            id: "rec".to_string(),
            date: date.to_string(),
            amount,
            category: "Misc".to_string(),
            description: String::new(),
            income,
            expense,
        }
    }

    #[test]
    fn months_group_chronologically_with_readable_labels() {
        let entries = vec![
            entry("2026-02-10", 30.0, false, true),
            entry("2025-12-01", 100.0, true, false),
            entry("2026-02-20", 20.0, true, false),
            entry("bogus", 999.0, true, false),
        ];
        let months = monthly_breakdown(&entries);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].label, "December 2025");
        assert_eq!(months[0].income, 100.0);
        assert_eq!(months[1].label, "February 2026");
        assert_eq!(months[1].income, 20.0);
        assert_eq!(months[1].expense, 30.0);
    }

    #[test]
    fn fortnight_buckets_split_on_the_fifteenth() {
        let entries = vec![
            entry("2026-01-15", 10.0, true, false),
            entry("2026-01-16", 4.0, false, true),
        ];
        let series = fortnight_series(&entries);
        assert_eq!(
            series,
            vec![
                ("2026-01-01".to_string(), 10.0),
                ("2026-01-15".to_string(), -4.0),
            ]
        );
    }

    #[test]
    fn series_zero_fills_the_span_between_first_and_last_entry() {
        let entries = vec![
            entry("2026-01-05", 10.0, true, false),
            entry("2026-02-20", 5.0, false, true),
        ];
        let series = fortnight_series(&entries);
        let labels: Vec<&str> = series.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["2026-01-01", "2026-01-15", "2026-02-01", "2026-02-15"]
        );
        assert_eq!(series[0].1, 10.0);
        assert_eq!(series[1].1, 0.0);
        assert_eq!(series[2].1, 0.0);
        assert_eq!(series[3].1, -5.0);
    }

    #[test]
    fn undated_entries_produce_no_series() {
        let entries = vec![entry("", 10.0, true, false)];
        assert!(fortnight_series(&entries).is_empty());
    }

    #[test]
    fn marks_cross_year_boundaries() {
        let start = NaiveDate::from_ymd_opt(2025, 12, 20).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap();
        let marks = fortnight_marks(start, end);
        let labels: Vec<String> = marks
            .iter()
            .map(|mark| mark.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(
            labels,
            vec!["2025-12-01", "2025-12-15", "2026-01-01", "2026-01-15"]
        );
    }
}

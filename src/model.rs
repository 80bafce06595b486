use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reserved category: the sum of these entries seeds the running balance.
pub const INITIAL_BALANCE_CATEGORY: &str = "Initial Balance";

/// Category substituted when the store holds no value for a record.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One income or expense record, as held by the tabular store.
///
/// `date` stays a raw string: the store may hold no value or one that does
/// not parse, and such entries are still listed, just excluded from
/// date-bounded filtering and charting.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub income: bool,
    pub expense: bool,
}

/// Field set submitted when creating a record.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct NewEntry {
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub income: bool,
    pub expense: bool,
}

/// Aggregates over a slice of entries.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Totals {
    pub count: usize,
    pub income: f64,
    pub expense: f64,
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

pub fn totals(entries: &[Entry]) -> Totals {
    let mut result = Totals {
        count: entries.len(),
        ..Totals::default()
    };
    for entry in entries {
        if entry.income {
            result.income += entry.amount;
        }
        if entry.expense {
            result.expense += entry.amount;
        }
    }
    result
}

/// Sum of every reserved initial-balance entry.
pub fn initial_balance(entries: &[Entry]) -> f64 {
    entries
        .iter()
        .filter(|entry| entry.category == INITIAL_BALANCE_CATEGORY)
        .map(|entry| entry.amount)
        .sum()
}

/// Distinct categories in first-seen order.
pub fn categories(entries: &[Entry]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for entry in entries {
        if !entry.category.is_empty() && !seen.iter().any(|known| known == &entry.category) {
            seen.push(entry.category.clone());
        }
    }
    seen
}

fn compare_dated(a: &Entry, b: &Entry) -> Ordering {
    match (parse_date(&a.date), parse_date(&b.date)) {
        (Some(da), Some(db)) => da.cmp(&db).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}

/// Oldest first; entries without a usable date sink to the end.
pub fn sort_ascending(entries: &mut [Entry]) {
    entries.sort_by(compare_dated);
}

/// Newest first; entries without a usable date sink to the end.
pub fn sort_recent_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| match (parse_date(&a.date), parse_date(&b.date)) {
        (Some(da), Some(db)) => db.cmp(&da).then_with(|| b.id.cmp(&a.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.id.cmp(&a.id),
    });
}

/// User-selected listing filter. Fields hold the raw form values; empty
/// means "no constraint".
#[derive(Clone, PartialEq, Debug, Default)]
pub struct EntryFilter {
    pub from: String,
    pub to: String,
    pub category: String,
    pub search: String,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        let date = parse_date(&entry.date);
        if let Some(from) = parse_date(&self.from) {
            match date {
                Some(d) if d >= from => {}
                _ => return false,
            }
        }
        if let Some(to) = parse_date(&self.to) {
            match date {
                Some(d) if d <= to => {}
                _ => return false,
            }
        }
        if !self.category.is_empty() && entry.category != self.category {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !entry.description.to_lowercase().contains(&needle)
            && !entry.category.to_lowercase().contains(&needle)
        {
            return false;
        }
        true
    }

    pub fn apply(&self, entries: &[Entry]) -> Vec<Entry> {
        entries
            .iter()
            .filter(|entry| self.matches(entry))
            .cloned()
            .collect()
    }
}

fn format_with_commas(value: i64) -> String {
    let digits = value.abs().to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

/// `$1,234.56` style, leading `-` for negatives.
pub fn format_amount(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as i64;
    format!("{}${}.{:02}", sign, format_with_commas(cents / 100), cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, date: &str, amount: f64, category: &str, income: bool, expense: bool) -> Entry {
        Entry {
            id: id.to_string(),
            date: date.to_string(),
            amount,
            category: category.to_string(),
            description: format!("entry {id}"),
            income,
            expense,
        }
    }

    #[test]
    fn totals_split_by_flag() {
        let entries = vec![
            entry("rec1", "2026-01-02", 100.0, "Salary", true, false),
            entry("rec2", "2026-01-03", 40.5, "Food", false, true),
            entry("rec3", "2026-01-04", 9.5, "Food", false, true),
            entry("rec4", "", 7.0, "Misc", false, false),
        ];
        let t = totals(&entries);
        assert_eq!(t.count, 4);
        assert_eq!(t.income, 100.0);
        assert_eq!(t.expense, 50.0);
    }

    #[test]
    fn initial_balance_sums_every_reserved_entry() {
        let entries = vec![
            entry("rec1", "2026-01-01", 200.0, INITIAL_BALANCE_CATEGORY, false, false),
            entry("rec2", "2026-02-01", 50.0, INITIAL_BALANCE_CATEGORY, false, false),
            entry("rec3", "2026-02-02", 10.0, "Food", false, true),
        ];
        assert_eq!(initial_balance(&entries), 250.0);
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let entries = vec![
            entry("rec1", "2026-01-01", 1.0, "Food", false, true),
            entry("rec2", "2026-01-02", 2.0, "Rent", false, true),
            entry("rec3", "2026-01-03", 3.0, "Food", false, true),
            entry("rec4", "2026-01-04", 4.0, "", false, true),
        ];
        assert_eq!(categories(&entries), vec!["Food", "Rent"]);
    }

    #[test]
    fn ascending_sort_puts_undated_last() {
        let mut entries = vec![
            entry("rec3", "not a date", 1.0, "Misc", false, true),
            entry("rec2", "2026-03-01", 1.0, "Misc", false, true),
            entry("rec1", "2026-01-15", 1.0, "Misc", false, true),
        ];
        sort_ascending(&mut entries);
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["rec1", "rec2", "rec3"]);
    }

    #[test]
    fn recent_first_breaks_ties_by_id() {
        let mut entries = vec![
            entry("recA", "2026-03-01", 1.0, "Misc", false, true),
            entry("recB", "2026-03-01", 1.0, "Misc", false, true),
            entry("recC", "2026-04-01", 1.0, "Misc", false, true),
        ];
        sort_recent_first(&mut entries);
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["recC", "recB", "recA"]);
    }

    #[test]
    fn date_bounds_exclude_undated_entries() {
        let filter = EntryFilter {
            from: "2026-01-01".to_string(),
            ..EntryFilter::default()
        };
        assert!(filter.matches(&entry("rec1", "2026-01-01", 1.0, "Food", false, true)));
        assert!(!filter.matches(&entry("rec2", "2025-12-31", 1.0, "Food", false, true)));
        assert!(!filter.matches(&entry("rec3", "", 1.0, "Food", false, true)));
    }

    #[test]
    fn unbounded_filter_keeps_undated_entries() {
        let filter = EntryFilter::default();
        assert!(filter.matches(&entry("rec1", "", 1.0, "Food", false, true)));
    }

    #[test]
    fn category_filter_is_exact() {
        let filter = EntryFilter {
            category: "Food".to_string(),
            ..EntryFilter::default()
        };
        assert!(filter.matches(&entry("rec1", "2026-01-01", 1.0, "Food", false, true)));
        assert!(!filter.matches(&entry("rec2", "2026-01-01", 1.0, "Foodstuff", false, true)));
    }

    #[test]
    fn search_matches_description_and_category_case_insensitively() {
        let mut groceries = entry("rec1", "2026-01-01", 1.0, "Food", false, true);
        groceries.description = "Weekly Groceries".to_string();
        let rent = entry("rec2", "2026-01-01", 1.0, "Rent", false, true);

        let filter = EntryFilter {
            search: "groceries".to_string(),
            ..EntryFilter::default()
        };
        assert!(filter.matches(&groceries));
        assert!(!filter.matches(&rent));

        let by_category = EntryFilter {
            search: "RENT".to_string(),
            ..EntryFilter::default()
        };
        assert!(by_category.matches(&rent));
    }

    #[test]
    fn amounts_format_with_separators_and_cents() {
        assert_eq!(format_amount(0.0), "$0.00");
        assert_eq!(format_amount(1234.5), "$1,234.50");
        assert_eq!(format_amount(-20.0), "-$20.00");
        assert_eq!(format_amount(1_000_000.999), "$1,000,001.00");
    }
}

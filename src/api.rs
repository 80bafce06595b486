//! Client for the hosted tabular-data API holding the records.
//!
//! The store speaks a records/fields JSON dialect: listing returns pages of
//! `{ id, fields }` objects plus an `offset` continuation token, creation
//! takes `{ records: [{ fields }] }`, deletion is per-record-id.

use std::cell::Cell;

use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::model::{Entry, NewEntry, UNCATEGORIZED};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] gloo_net::Error),
    #[error("request failed with status {0}")]
    Status(u16),
}

/// Minimum spacing between delete requests; the provider rate-limits
/// bursts of writes.
const DELETE_SPACING_MS: f64 = 500.0;

thread_local! {
    static NEXT_DELETE_SLOT: Cell<f64> = Cell::new(0.0);
}

#[derive(Deserialize)]
struct RecordPage {
    #[serde(default)]
    records: Vec<Record>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Deserialize)]
struct Record {
    id: String,
    #[serde(default)]
    fields: FieldsIn,
}

#[derive(Default, Deserialize)]
struct FieldsIn {
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Amount")]
    amount: Option<f64>,
    #[serde(rename = "Category")]
    category: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "Income")]
    income: Option<bool>,
    #[serde(rename = "Expense")]
    expense: Option<bool>,
}

#[derive(Serialize)]
struct CreateBody<'a> {
    records: Vec<CreateRecord<'a>>,
}

#[derive(Serialize)]
struct CreateRecord<'a> {
    fields: FieldsOut<'a>,
}

#[derive(Serialize)]
struct FieldsOut<'a> {
    #[serde(rename = "Date")]
    date: &'a str,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Income")]
    income: bool,
    #[serde(rename = "Expense")]
    expense: bool,
}

fn entry_from_record(record: Record) -> Entry {
    Entry {
        id: record.id,
        date: record.fields.date.unwrap_or_default(),
        amount: record.fields.amount.unwrap_or(0.0),
        category: record
            .fields
            .category
            .unwrap_or_else(|| UNCATEGORIZED.to_string()),
        description: record.fields.description.unwrap_or_default(),
        income: record.fields.income.unwrap_or(false),
        expense: record.fields.expense.unwrap_or(false),
    }
}

fn bearer() -> String {
    format!("Bearer {}", config::TABLE_TOKEN)
}

/// Every record in the table, following continuation tokens to the end.
pub async fn fetch_entries() -> Result<Vec<Entry>, ApiError> {
    let mut entries = Vec::new();
    let mut offset: Option<String> = None;
    loop {
        let url = match &offset {
            Some(token) => format!("{}?offset={}", config::TABLE_ENDPOINT, token),
            None => config::TABLE_ENDPOINT.to_string(),
        };
        let resp = Request::get(&url)
            .header("Authorization", &bearer())
            .send()
            .await?;
        if !resp.ok() {
            return Err(ApiError::Status(resp.status()));
        }
        let page: RecordPage = resp.json().await?;
        entries.extend(page.records.into_iter().map(entry_from_record));
        match page.offset {
            Some(token) if !token.is_empty() => offset = Some(token),
            _ => break,
        }
    }
    log::debug!("fetched {} entries", entries.len());
    Ok(entries)
}

/// Distinct categories currently present in the table.
pub async fn fetch_categories() -> Result<Vec<String>, ApiError> {
    let entries = fetch_entries().await?;
    Ok(crate::model::categories(&entries))
}

/// Create one record; the store echoes back the created records.
pub async fn create_entry(entry: &NewEntry) -> Result<Vec<Entry>, ApiError> {
    let body = CreateBody {
        records: vec![CreateRecord {
            fields: FieldsOut {
                date: &entry.date,
                amount: entry.amount,
                category: &entry.category,
                description: &entry.description,
                income: entry.income,
                expense: entry.expense,
            },
        }],
    };
    let resp = Request::post(config::TABLE_ENDPOINT)
        .header("Authorization", &bearer())
        .json(&body)?
        .send()
        .await?;
    if !resp.ok() {
        return Err(ApiError::Status(resp.status()));
    }
    let page: RecordPage = resp.json().await?;
    Ok(page.records.into_iter().map(entry_from_record).collect())
}

/// Delete one record. Consecutive deletes are spaced `DELETE_SPACING_MS`
/// apart; each caller reserves the next slot before yielding, so bursts
/// drain strictly one at a time.
pub async fn delete_entry(id: &str) -> Result<(), ApiError> {
    wait_for_delete_slot().await;
    let url = format!("{}/{}", config::TABLE_ENDPOINT, id);
    let resp = Request::delete(&url)
        .header("Authorization", &bearer())
        .send()
        .await?;
    if !resp.ok() {
        return Err(ApiError::Status(resp.status()));
    }
    Ok(())
}

async fn wait_for_delete_slot() {
    let now = js_sys::Date::now();
    let slot = NEXT_DELETE_SLOT.with(|next| {
        let slot = next.get().max(now);
        next.set(slot + DELETE_SPACING_MS);
        slot
    });
    let wait = slot - now;
    if wait > 0.0 {
        gloo_timers::future::TimeoutFuture::new(wait as u32).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_decode_to_defaults() {
        let raw = r#"{
            "records": [
                {"id": "rec123", "fields": {"Amount": 12.5, "Expense": true}},
                {"id": "rec456", "fields": {}}
            ]
        }"#;
        let page: RecordPage = serde_json::from_str(raw).unwrap();
        assert!(page.offset.is_none());

        let entries: Vec<Entry> = page.records.into_iter().map(entry_from_record).collect();
        assert_eq!(entries[0].id, "rec123");
        assert_eq!(entries[0].amount, 12.5);
        assert!(entries[0].expense);
        assert!(!entries[0].income);
        assert_eq!(entries[0].category, UNCATEGORIZED);
        assert_eq!(entries[0].date, "");
        assert_eq!(entries[1].amount, 0.0);
    }

    #[test]
    fn continuation_token_is_surfaced() {
        let raw = r#"{"records": [], "offset": "itrNextPage"}"#;
        let page: RecordPage = serde_json::from_str(raw).unwrap();
        assert_eq!(page.offset.as_deref(), Some("itrNextPage"));
    }

    #[test]
    fn created_records_serialize_with_store_field_names() {
        let body = CreateBody {
            records: vec![CreateRecord {
                fields: FieldsOut {
                    date: "2026-08-01",
                    amount: 42.0,
                    category: "Food",
                    description: "lunch",
                    income: false,
                    expense: true,
                },
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        let fields = &json["records"][0]["fields"];
        assert_eq!(fields["Date"], "2026-08-01");
        assert_eq!(fields["Amount"], 42.0);
        assert_eq!(fields["Category"], "Food");
        assert_eq!(fields["Description"], "lunch");
        assert_eq!(fields["Income"], false);
        assert_eq!(fields["Expense"], true);
    }
}

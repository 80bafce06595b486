//! Time-based localStorage cache for fetched records.
//!
//! Values are wrapped in a `{ data, timestamp }` envelope and considered
//! usable while younger than the TTL. There is no invalidation beyond
//! overwrite and explicit clearing.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const ENTRIES_KEY: &str = "entries";
pub const CATEGORIES_KEY: &str = "categories";

pub const DEFAULT_TTL_MS: f64 = 3_600_000.0;

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
    timestamp: f64,
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    data: &'a T,
    timestamp: f64,
}

pub fn is_fresh(timestamp: f64, now: f64, ttl_ms: f64) -> bool {
    now - timestamp < ttl_ms
}

/// Cached value for `key`, if present and younger than `ttl_ms`.
pub fn load<T: DeserializeOwned>(key: &str, ttl_ms: f64) -> Option<T> {
    let raw = read_item(key)?;
    let envelope: Envelope<T> = serde_json::from_str(&raw).ok()?;
    if is_fresh(envelope.timestamp, js_sys::Date::now(), ttl_ms) {
        log::debug!("cache hit for {key}");
        Some(envelope.data)
    } else {
        log::debug!("cache expired for {key}");
        None
    }
}

pub fn store<T: Serialize>(key: &str, data: &T) {
    let envelope = EnvelopeRef {
        data,
        timestamp: js_sys::Date::now(),
    };
    if let Ok(raw) = serde_json::to_string(&envelope) {
        write_item(key, &raw);
    }
}

pub fn clear(key: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

fn read_item(key: &str) -> Option<String> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    storage.get_item(key).ok()?
}

fn write_item(key: &str, value: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freshness_is_strictly_inside_the_ttl() {
        assert!(is_fresh(0.0, DEFAULT_TTL_MS - 1.0, DEFAULT_TTL_MS));
        assert!(!is_fresh(0.0, DEFAULT_TTL_MS, DEFAULT_TTL_MS));
        assert!(!is_fresh(0.0, DEFAULT_TTL_MS + 1.0, DEFAULT_TTL_MS));
    }

    #[test]
    fn clock_skew_back_in_time_still_counts_as_fresh() {
        assert!(is_fresh(1_000.0, 500.0, DEFAULT_TTL_MS));
    }
}

//! CSV export of the currently displayed records.

use wasm_bindgen::{JsCast, JsValue};

use crate::model::Entry;

pub const EXPORT_FILENAME: &str = "records.csv";

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

pub fn entries_to_csv(entries: &[Entry]) -> csv::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Date", "Amount", "Category", "Description", "Income", "Expense"])?;
    for entry in entries {
        let amount = entry.amount.to_string();
        writer.write_record([
            entry.date.as_str(),
            amount.as_str(),
            entry.category.as_str(),
            entry.description.as_str(),
            yes_no(entry.income),
            yes_no(entry.expense),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Hand the contents to the browser as a file download.
pub fn download_csv(filename: &str, contents: &str) {
    if let Err(err) = trigger_download(filename, contents) {
        log::error!("csv download failed: {err:?}");
    }
}

fn trigger_download(filename: &str, contents: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let parts = js_sys::Array::of1(&JsValue::from_str(contents));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("text/csv;charset=utf-8;");
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();
    web_sys::Url::revoke_object_url(&url)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, amount: f64, description: &str, income: bool) -> Entry {
        Entry {
            id: "rec1".to_string(),
            date: date.to_string(),
            amount,
            category: "Food".to_string(),
            description: description.to_string(),
            income,
            expense: !income,
        }
    }

    #[test]
    fn header_and_flag_rendering() {
        let csv = entries_to_csv(&[entry("2026-08-01", 12.5, "lunch", false)]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Date,Amount,Category,Description,Income,Expense")
        );
        assert_eq!(lines.next(), Some("2026-08-01,12.5,Food,lunch,No,Yes"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn descriptions_with_commas_are_quoted() {
        let csv = entries_to_csv(&[entry("2026-08-01", 3.0, "coffee, to go", true)]).unwrap();
        assert!(csv.contains("\"coffee, to go\""));
    }

    #[test]
    fn empty_input_yields_only_the_header() {
        let csv = entries_to_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), "Date,Amount,Category,Description,Income,Expense");
    }
}

use crate::models::Row;
use serde::{Deserialize, Serialize};

pub(crate) const ROWS_KEY: &str = "slate_grid_rows";
pub(crate) const PAGE_SIZE_KEY: &str = "slate_grid_page_size";

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn clear_storage_key(key: &str) {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.remove_item(key);
    }
}

pub(crate) fn load_rows() -> Option<Vec<Row>> {
    load_json_from_storage(ROWS_KEY)
}

pub(crate) fn save_rows(rows: &[Row]) {
    save_json_to_storage(ROWS_KEY, &rows);
}

pub(crate) fn load_page_size() -> Option<usize> {
    load_json_from_storage(PAGE_SIZE_KEY)
}

pub(crate) fn save_page_size(page_size: usize) {
    save_json_to_storage(PAGE_SIZE_KEY, &page_size);
}

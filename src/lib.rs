mod app;
mod components;
mod grid;
mod loading;
mod models;
mod pages;
mod state;
mod storage;

use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::models::Row;
    use crate::storage;
    use serde_json::json;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_rows_storage_roundtrip() {
        storage::clear_storage_key(storage::ROWS_KEY);
        assert!(storage::load_rows().is_none());

        let rows: Vec<Row> = match json!([{"id": 1, "name": "Ada"}]) {
            serde_json::Value::Array(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    serde_json::Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        };
        storage::save_rows(&rows);

        let loaded = storage::load_rows().expect("rows should load from localStorage");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0]["name"], "Ada");

        storage::clear_storage_key(storage::ROWS_KEY);
    }

    #[wasm_bindgen_test]
    fn test_page_size_storage_roundtrip() {
        storage::clear_storage_key(storage::PAGE_SIZE_KEY);
        assert!(storage::load_page_size().is_none());

        storage::save_page_size(25);
        assert_eq!(storage::load_page_size(), Some(25));

        storage::clear_storage_key(storage::PAGE_SIZE_KEY);
        assert!(storage::load_page_size().is_none());
    }
}

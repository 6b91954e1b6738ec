use crate::models::{CellRef, Row};
use crate::storage::load_page_size;
use leptos::prelude::*;

pub(crate) const DEFAULT_PAGE_SIZE: usize = 10;

/// Grid-wide state owned by the hosting page, not by any cell.
///
/// `editing_cell` is the single edit-mode pointer: at most one field group
/// is active at a time, and pointing it at a new cell implicitly exits the
/// previous one. `edit_buffer` is the in-progress working copy of the row
/// being edited; field edits land here and reach `rows` only on commit.
#[derive(Clone)]
pub(crate) struct GridState {
    pub rows: RwSignal<Vec<Row>>,
    pub editing_cell: RwSignal<Option<CellRef>>,
    pub focused_cell: RwSignal<Option<CellRef>>,
    pub edit_buffer: RwSignal<Option<Row>>,

    /// Rows shown per page (persisted preference).
    pub page_size: RwSignal<usize>,

    /// Grid-wide fallbacks for columns without an explicit flag.
    pub editable_default: bool,
    pub resizable_default: bool,
}

impl GridState {
    pub fn new() -> Self {
        let page_size = load_page_size().unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            rows: RwSignal::new(vec![]),
            editing_cell: RwSignal::new(None),
            focused_cell: RwSignal::new(None),
            edit_buffer: RwSignal::new(None),
            page_size: RwSignal::new(page_size),
            editable_default: true,
            resizable_default: true,
        }
    }
}

impl Default for GridState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct GridContext(pub GridState);

use leptos::prelude::*;
use serde_json::Value;

/// A grid row: one JSON object, column name -> value.
///
/// Kept as raw JSON to avoid coupling the grid to a fixed record schema;
/// cells coerce values to strings for display.
pub(crate) type Row = serde_json::Map<String, Value>;

/// The single "which cell is in edit mode" pointer owned by the grid.
/// Entering edit on a new cell implicitly exits the previous one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CellRef {
    pub row_index: usize,
    pub column: String,
}

impl CellRef {
    pub fn new(row_index: usize, column: &str) -> Self {
        Self {
            row_index,
            column: column.to_string(),
        }
    }
}

/// Closed set of editor kinds a field can render as.
///
/// Anything we don't recognize is carried as `Other` and renders an empty
/// placeholder slot instead of failing the whole edit group.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum EditorKind {
    #[default]
    Text,
    Select,
    Other(String),
}

impl EditorKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "text" => EditorKind::Text,
            "select" => EditorKind::Select,
            other => EditorKind::Other(other.to_string()),
        }
    }
}

/// One underlying column of a concatenated cell.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub(crate) struct ConcatPart {
    pub name: String,
    pub editor: Option<EditorKind>,
    pub options: Option<Vec<String>>,
}

/// A cell backed by several underlying columns, edited as one field group.
/// `editors`/`options` are cell-level positional fallbacks used when a part
/// carries no metadata of its own.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub(crate) struct ConcatColumn {
    pub parts: Vec<ConcatPart>,
    pub editors: Vec<EditorKind>,
    pub options: Vec<Vec<String>>,
}

/// Column definition as seen by the cell layer.
///
/// `render` is the optional custom renderer: it receives the formatted
/// (working) row and the base row and its output is used verbatim.
#[derive(Clone)]
pub(crate) struct Column {
    pub name: String,
    pub title: String,
    pub editor: EditorKind,
    pub options: Vec<String>,
    pub editable: Option<bool>,
    pub resizable: Option<bool>,
    pub fixed: bool,
    pub width: f64,
    pub concat: Option<ConcatColumn>,
    pub render: Option<Callback<(Row, Row), AnyView>>,
}

impl Column {
    pub fn text(name: &str, title: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            editor: EditorKind::Text,
            options: vec![],
            editable: None,
            resizable: None,
            fixed: false,
            width: 160.0,
            concat: None,
            render: None,
        }
    }

    pub fn select(name: &str, title: &str, options: Vec<String>) -> Self {
        Self {
            editor: EditorKind::Select,
            options,
            ..Self::text(name, title)
        }
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = Some(editable);
        self
    }
}

/// One editable field of a cell's edit group. Insertion order is the
/// tab-traversal order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FieldDescriptor {
    pub column_name: String,
    pub editor: EditorKind,
    pub options: Vec<String>,
}

/// Column-metadata resolution: a part's own editor kind wins, else the
/// cell-level fallback at the same position, else plain text.
pub(crate) fn resolve_editor_kind(
    own: Option<&EditorKind>,
    fallback: Option<&EditorKind>,
) -> EditorKind {
    own.or(fallback).cloned().unwrap_or_default()
}

pub(crate) fn resolve_editor_items(
    own: Option<&[String]>,
    fallback: Option<&[String]>,
) -> Vec<String> {
    own.or(fallback).map(|xs| xs.to_vec()).unwrap_or_default()
}

/// A column's effective `editable` flag: its own explicit boolean if set,
/// else the grid-wide default. Same pattern for `resizable`.
pub(crate) fn effective_editable(column: &Column, grid_default: bool) -> bool {
    column.editable.unwrap_or(grid_default)
}

pub(crate) fn effective_resizable(column: &Column, grid_default: bool) -> bool {
    column.resizable.unwrap_or(grid_default)
}

/// String coercion for Static mode text and its tooltip/title.
pub(crate) fn display_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

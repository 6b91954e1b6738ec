//! Cell interaction layer: everything that happens inside one grid cell.
//!
//! The pure pieces (mode resolution, field descriptors, fixed-column offsets,
//! the navigation state machines in [`field_nav`] and [`dropdown_nav`]) are
//! plain functions; [`GridCell`] is the thin component that wires them to DOM
//! events and the shared [`GridState`](crate::state::GridState).

pub(crate) mod dropdown_nav;
pub(crate) mod field_nav;

use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;

use crate::components::hooks::use_random::use_random_id_for;
use crate::components::ui::FieldEditor;
use crate::models::{
    display_text, effective_editable, resolve_editor_items, resolve_editor_kind, CellRef, Column,
    FieldDescriptor, Row,
};
use crate::state::GridContext;
use field_nav::{field_blur, field_click, field_key, NavKey, SessionState};

/// How a cell renders right now. Edit wins over a custom renderer, which
/// wins over the plain text fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CellMode {
    Edit,
    Custom,
    Static,
}

pub(crate) fn cell_mode(editable: bool, is_editing: bool, has_renderer: bool) -> CellMode {
    if editable && is_editing {
        CellMode::Edit
    } else if has_renderer {
        CellMode::Custom
    } else {
        CellMode::Static
    }
}

/// The ordered field group a cell edits. A concatenated column yields one
/// field per part, resolving each part's editor/options against the
/// cell-level positional fallbacks; a plain column yields a single field.
pub(crate) fn build_field_descriptors(column: &Column) -> Vec<FieldDescriptor> {
    match &column.concat {
        Some(concat) => concat
            .parts
            .iter()
            .enumerate()
            .map(|(i, part)| FieldDescriptor {
                column_name: part.name.clone(),
                editor: resolve_editor_kind(part.editor.as_ref(), concat.editors.get(i)),
                options: resolve_editor_items(
                    part.options.as_deref(),
                    concat.options.get(i).map(|opts| opts.as_slice()),
                ),
            })
            .collect(),
        None => vec![FieldDescriptor {
            column_name: column.name.clone(),
            editor: column.editor.clone(),
            options: column.options.clone(),
        }],
    }
}

/// Sticky positioning for a fixed column: offset is the sum of the widths of
/// the fixed columns before it, and the last fixed column carries the
/// separator edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FixedCellStyle {
    pub left: f64,
    pub z_index: i32,
    pub is_last_fixed: bool,
}

impl FixedCellStyle {
    pub fn css(&self) -> String {
        format!(
            "position: sticky; left: {}px; z-index: {};",
            self.left, self.z_index
        )
    }
}

pub(crate) fn fixed_cell_style(columns: &[Column], index: usize) -> Option<FixedCellStyle> {
    let column = columns.get(index)?;
    if !column.fixed {
        return None;
    }
    let left = columns[..index]
        .iter()
        .filter(|c| c.fixed)
        .map(|c| c.width)
        .sum();
    let is_last_fixed = columns[index + 1..].iter().all(|c| !c.fixed);
    Some(FixedCellStyle {
        left,
        z_index: 2,
        is_last_fixed,
    })
}

/// Host callbacks a cell drives. The host owns the rows and the working
/// copy; the cell only reports what happened and with which field group.
#[derive(Clone, Copy)]
pub(crate) struct CellHandlers {
    /// `(base_row_index, fields, is_exiting)`: merge the working copy back
    /// into the row; `is_exiting` asks the host to close the session too.
    pub commit_changes: Callback<(usize, Vec<FieldDescriptor>, bool)>,
    /// Discard the working copy and close the session.
    pub revert_changes: Callback<Vec<FieldDescriptor>>,
    /// `(column_name, new_value)`: one field of the working copy changed.
    pub on_cell_change: Callback<(String, String)>,
    /// `(column_name, row_index, base_row_index)`: the user asked to edit.
    pub on_cell_edit: Callback<(String, usize, usize)>,
}

pub(crate) fn field_dom_id(group_id: &str, index: usize) -> String {
    format!("{group_id}_field_{index}")
}

fn focus_field(group_id: &str, index: usize) {
    let id = field_dom_id(group_id, index);
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if let Some(element) = document.get_element_by_id(&id) {
        if let Ok(element) = element.dyn_into::<web_sys::HtmlElement>() {
            let _ = element.focus();
        }
    }
}

/// The editors mount after the effect that requests focus runs; defer the
/// focus call one tick so the element exists.
fn focus_field_next_tick(group_id: String, index: usize) {
    let callback = Closure::once_into_js(move || focus_field(&group_id, index));
    if let Some(window) = web_sys::window() {
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                0,
            );
    }
}

/// One data cell. Mode priority is Edit, then the column's custom renderer,
/// then plain text; `row_index` is the position on the current page and
/// `base_row_index` the position in the full row set.
#[component]
pub fn GridCell(
    column: Column,
    row_index: usize,
    base_row_index: usize,
    #[prop(optional_no_strip)] fixed_style: Option<FixedCellStyle>,
) -> impl IntoView {
    let GridContext(grid) = expect_context::<GridContext>();
    let handlers = expect_context::<CellHandlers>();

    let column = StoredValue::new(column);
    let group_id = StoredValue::new(use_random_id_for("cell"));
    // Fresh per edit session; a stale `is_navigating` from a previous
    // session must never swallow a real blur.
    let session = StoredValue::new(SessionState::default());

    let is_editing = Memo::new(move |_| {
        grid.editing_cell.get().is_some_and(|cell| {
            cell.row_index == base_row_index && column.with_value(|c| cell.column == c.name)
        })
    });

    Effect::new(move |_| {
        if is_editing.get() {
            session.set_value(SessionState {
                focused_field: 0,
                ..SessionState::default()
            });
            focus_field_next_tick(group_id.get_value(), 0);
        }
    });

    let start_edit = move || {
        let editable = column.with_value(|c| effective_editable(c, grid.editable_default));
        if editable && !is_editing.get_untracked() {
            let name = column.with_value(|c| c.name.clone());
            handlers.on_cell_edit.run((name, row_index, base_row_index));
        }
    };

    let handle_mousedown = move |ev: web_sys::MouseEvent| {
        // A link inside a cell must not steal focus from an active editor
        // elsewhere in the grid; navigation still goes through click.
        let on_anchor = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlAnchorElement>().ok())
            .is_some();
        if on_anchor {
            ev.prevent_default();
            return;
        }
        let editable = column.with_value(|c| effective_editable(c, grid.editable_default));
        if !editable && ev.button() == 0 {
            ev.prevent_default();
        }
    };

    let is_focused = move || {
        grid.focused_cell.get().is_some_and(|cell| {
            cell.row_index == base_row_index && column.with_value(|c| cell.column == c.name)
        })
    };

    let handle_focusin = move |_ev: web_sys::FocusEvent| {
        let name = column.with_value(|c| c.name.clone());
        grid.focused_cell.set(Some(CellRef::new(base_row_index, &name)));
    };
    let handle_focusout = move |_ev: web_sys::FocusEvent| {
        grid.focused_cell.set(None);
    };

    let is_last_fixed = fixed_style.is_some_and(|s| s.is_last_fixed);
    let base_class = "relative flex min-h-9 shrink-0 items-center overflow-hidden bg-background px-2 py-1 text-sm";
    let cell_class = if is_last_fixed {
        tw_merge!(base_class, "border-r-2 border-border")
    } else {
        base_class.to_string()
    };
    let width = column.with_value(|c| c.width);
    let style = match fixed_style {
        Some(s) => format!("width: {width}px; {}", s.css()),
        None => format!("width: {width}px;"),
    };

    let body = move || {
        let editable = column.with_value(|c| effective_editable(c, grid.editable_default));
        let has_renderer = column.with_value(|c| c.render.is_some());
        match cell_mode(editable, is_editing.get(), has_renderer) {
            CellMode::Edit => {
                let descriptors = column.with_value(build_field_descriptors);
                if descriptors.is_empty() {
                    return ().into_any();
                }
                let count = descriptors.len();
                let gid = group_id.get_value();
                // Untracked on purpose: a non-exiting commit rewrites `rows`
                // and the buffer, and re-rendering here would remount the
                // inputs and drop focus mid-session.
                let working: Row = grid.edit_buffer.get_untracked().unwrap_or_else(|| {
                    grid.rows
                        .with_untracked(|rows| rows.get(base_row_index).cloned())
                        .unwrap_or_default()
                });

                let fields = descriptors
                    .into_iter()
                    .enumerate()
                    .map(|(i, descriptor)| {
                        let value = display_text(working.get(&descriptor.column_name));
                        let field_id = field_dom_id(&gid, i);
                        let change_column = descriptor.column_name.clone();

                        let on_change = Callback::new(move |v: String| {
                            handlers.on_cell_change.run((change_column.clone(), v));
                        });
                        let on_keydown = Callback::new(move |ev: web_sys::KeyboardEvent| {
                            let key = NavKey::parse(&ev.key());
                            let action = session
                                .try_update_value(|s| {
                                    field_key(s, key, ev.shift_key(), i, count)
                                })
                                .unwrap_or_default();
                            if action.prevent_default {
                                ev.prevent_default();
                            }
                            // Focus first: the blur it triggers is suppressed
                            // while `is_navigating` is still set.
                            if let Some(next) = action.focus {
                                focus_field(&group_id.get_value(), next);
                            }
                            if action.revert {
                                handlers
                                    .revert_changes
                                    .run(column.with_value(build_field_descriptors));
                            }
                            if let Some(is_exiting) = action.commit {
                                handlers.commit_changes.run((
                                    base_row_index,
                                    column.with_value(build_field_descriptors),
                                    is_exiting,
                                ));
                            }
                        });
                        let on_blur = Callback::new(move |_: ()| {
                            if let Some(is_exiting) = session
                                .try_update_value(|s| field_blur(s, i, count))
                                .flatten()
                            {
                                handlers.commit_changes.run((
                                    base_row_index,
                                    column.with_value(build_field_descriptors),
                                    is_exiting,
                                ));
                            }
                        });
                        let on_click = Callback::new(move |ev: web_sys::MouseEvent| {
                            ev.prevent_default();
                            let _ = session.try_update_value(|s| field_click(s, i));
                            focus_field(&group_id.get_value(), i);
                        });
                        // Runs before the blur of the previously focused
                        // field; the click above manages commit itself.
                        let on_mousedown = Callback::new(move |_: ()| {
                            let _ = session.try_update_value(|s| s.prevent_blur = true);
                        });

                        view! {
                            <FieldEditor
                                descriptor=descriptor
                                value=value
                                id=field_id
                                autofocus={i == 0}
                                on_change=on_change
                                on_keydown=on_keydown
                                on_blur=on_blur
                                on_click=on_click
                                on_mousedown=on_mousedown
                            />
                        }
                    })
                    .collect_view();

                view! {
                    <div data-name="GridCellEditGroup" class="flex w-full items-center gap-1">
                        {fields}
                    </div>
                }
                .into_any()
            }
            CellMode::Custom => {
                let base = grid
                    .rows
                    .with(|rows| rows.get(base_row_index).cloned())
                    .unwrap_or_default();
                let working = grid
                    .editing_cell
                    .get()
                    .filter(|cell| cell.row_index == base_row_index)
                    .and_then(|_| grid.edit_buffer.get())
                    .unwrap_or_else(|| base.clone());
                match column.with_value(|c| c.render) {
                    Some(render) => render.run((working, base)),
                    None => ().into_any(),
                }
            }
            CellMode::Static => {
                let name = column.with_value(|c| c.name.clone());
                let text = grid
                    .rows
                    .with(|rows| display_text(rows.get(base_row_index).and_then(|r| r.get(&name))));
                view! {
                    <span class="block w-full truncate" title=text.clone()>
                        {text.clone()}
                    </span>
                }
                .into_any()
            }
        }
    };

    view! {
        <div
            data-name="GridCell"
            role="gridcell"
            class=cell_class
            class=("ring-1", is_focused)
            class=("ring-ring", is_focused)
            style=style
            on:dblclick=move |_ev: web_sys::MouseEvent| start_edit()
            on:touchend=move |_ev: web_sys::TouchEvent| start_edit()
            on:mousedown=handle_mousedown
            on:focusin=handle_focusin
            on:focusout=handle_focusout
        >
            {body}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConcatColumn, ConcatPart, EditorKind};

    #[test]
    fn test_cell_mode_priority() {
        assert_eq!(cell_mode(true, true, true), CellMode::Edit);
        assert_eq!(cell_mode(true, true, false), CellMode::Edit);
        // Not editable: editing state is ignored.
        assert_eq!(cell_mode(false, true, true), CellMode::Custom);
        assert_eq!(cell_mode(true, false, true), CellMode::Custom);
        assert_eq!(cell_mode(true, false, false), CellMode::Static);
        assert_eq!(cell_mode(false, false, false), CellMode::Static);
    }

    #[test]
    fn test_plain_column_yields_single_descriptor() {
        let col = Column::select(
            "role",
            "Role",
            vec!["admin".to_string(), "viewer".to_string()],
        );
        let fields = build_field_descriptors(&col);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].column_name, "role");
        assert_eq!(fields[0].editor, EditorKind::Select);
        assert_eq!(fields[0].options, vec!["admin", "viewer"]);
    }

    #[test]
    fn test_concat_column_resolves_per_part_metadata_first() {
        let mut col = Column::text("contact", "Contact");
        col.concat = Some(ConcatColumn {
            parts: vec![
                ConcatPart {
                    name: "email".to_string(),
                    editor: Some(EditorKind::Select),
                    options: Some(vec!["a@x".to_string()]),
                },
                ConcatPart {
                    name: "phone".to_string(),
                    editor: None,
                    options: None,
                },
            ],
            editors: vec![EditorKind::Text, EditorKind::Select],
            options: vec![vec![], vec!["1".to_string(), "2".to_string()]],
        });

        let fields = build_field_descriptors(&col);
        assert_eq!(fields.len(), 2);
        // Part metadata wins over the positional fallback.
        assert_eq!(fields[0].editor, EditorKind::Select);
        assert_eq!(fields[0].options, vec!["a@x"]);
        // Missing part metadata takes the fallback at the same position.
        assert_eq!(fields[1].column_name, "phone");
        assert_eq!(fields[1].editor, EditorKind::Select);
        assert_eq!(fields[1].options, vec!["1", "2"]);
    }

    #[test]
    fn test_concat_part_beyond_fallbacks_defaults_to_text() {
        let mut col = Column::text("pair", "Pair");
        col.concat = Some(ConcatColumn {
            parts: vec![
                ConcatPart {
                    name: "left".to_string(),
                    ..ConcatPart::default()
                },
                ConcatPart {
                    name: "right".to_string(),
                    ..ConcatPart::default()
                },
            ],
            editors: vec![EditorKind::Select],
            options: vec![],
        });

        let fields = build_field_descriptors(&col);
        assert_eq!(fields[0].editor, EditorKind::Select);
        assert_eq!(fields[1].editor, EditorKind::Text);
        assert!(fields[1].options.is_empty());
    }

    #[test]
    fn test_concat_with_no_parts_yields_empty_group() {
        let mut col = Column::text("ghost", "Ghost");
        col.concat = Some(ConcatColumn::default());
        assert!(build_field_descriptors(&col).is_empty());
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::text("id", "Id").fixed().width(60.0),
            Column::text("name", "Name").fixed().width(140.0),
            Column::text("note", "Note").width(200.0),
        ]
    }

    #[test]
    fn test_fixed_cell_style_accumulates_fixed_widths_only() {
        let cols = columns();
        let first = fixed_cell_style(&cols, 0).unwrap();
        assert_eq!(first.left, 0.0);
        assert!(!first.is_last_fixed);

        let second = fixed_cell_style(&cols, 1).unwrap();
        assert_eq!(second.left, 60.0);
        assert!(second.is_last_fixed);
        assert_eq!(second.z_index, 2);
    }

    #[test]
    fn test_non_fixed_column_has_no_sticky_style() {
        let cols = columns();
        assert_eq!(fixed_cell_style(&cols, 2), None);
        assert_eq!(fixed_cell_style(&cols, 99), None);
    }

    #[test]
    fn test_fixed_cell_style_css() {
        let style = FixedCellStyle {
            left: 60.0,
            z_index: 2,
            is_last_fixed: true,
        };
        assert_eq!(style.css(), "position: sticky; left: 60px; z-index: 2;");
    }

    #[test]
    fn test_field_dom_id_is_group_scoped() {
        assert_eq!(field_dom_id("cell_slate_grid_7", 2), "cell_slate_grid_7_field_2");
    }
}

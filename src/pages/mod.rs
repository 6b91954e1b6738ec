use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::{json, Value};

use crate::components::ui::{Button, ButtonSize, ButtonVariant, Dropdown, Spinner};
use crate::grid::{fixed_cell_style, CellHandlers, GridCell};
use crate::loading;
use crate::models::{
    display_text, effective_resizable, CellRef, Column, ConcatColumn, ConcatPart, EditorKind,
    FieldDescriptor, Row,
};
use crate::state::GridContext;
use crate::storage;

fn sample_rows() -> Vec<Row> {
    let people = [
        ("Ada Lovelace", "admin", "ada@example.com", "555-0100", "Prefers async review"),
        ("Grace Hopper", "editor", "grace@example.com", "555-0101", "Owns the release notes"),
        ("Alan Turing", "viewer", "alan@example.com", "555-0102", ""),
        ("Edsger Dijkstra", "editor", "edsger@example.com", "555-0103", "No meetings before noon"),
        ("Barbara Liskov", "admin", "barbara@example.com", "555-0104", ""),
        ("Donald Knuth", "viewer", "donald@example.com", "555-0105", "Replies by letter"),
        ("Margaret Hamilton", "editor", "margaret@example.com", "555-0106", ""),
        ("Tony Hoare", "viewer", "tony@example.com", "555-0107", ""),
        ("Frances Allen", "editor", "frances@example.com", "555-0108", "Compiler questions welcome"),
        ("John Backus", "viewer", "john@example.com", "555-0109", ""),
        ("Niklaus Wirth", "editor", "niklaus@example.com", "555-0110", ""),
        ("Radia Perlman", "admin", "radia@example.com", "555-0111", "Network on-call"),
    ];

    people
        .iter()
        .enumerate()
        .map(|(i, (name, role, email, phone, notes))| {
            let slug = name.split_whitespace().next().unwrap_or("").to_lowercase();
            match json!({
                "id": i + 1,
                "name": name,
                "role": role,
                "email": email,
                "phone": phone,
                "profile": format!("https://example.com/u/{slug}"),
                "mood": "",
                "notes": notes,
            }) {
                Value::Object(map) => map,
                _ => Row::new(),
            }
        })
        .collect()
}

fn grid_columns() -> Vec<Column> {
    let mut contact = Column::text("contact", "Contact").width(280.0);
    contact.concat = Some(ConcatColumn {
        parts: vec![
            ConcatPart {
                name: "email".to_string(),
                editor: None,
                options: None,
            },
            ConcatPart {
                name: "phone".to_string(),
                editor: None,
                options: None,
            },
        ],
        editors: vec![EditorKind::Text, EditorKind::Text],
        options: vec![],
    });

    let mut profile = Column::text("profile", "Profile").width(220.0).editable(false);
    profile.render = Some(Callback::new(|(working, _base): (Row, Row)| {
        let href = display_text(working.get("profile"));
        view! {
            <a href=href.clone() target="_blank" class="truncate text-primary underline">
                {href.clone()}
            </a>
        }
        .into_any()
    }));

    // Editor kind the field layer doesn't recognize; edit mode shows an
    // empty slot for it instead of a broken group.
    let mut mood = Column::text("mood", "Mood").width(100.0);
    mood.editor = EditorKind::parse("emoji-picker");

    let mut id = Column::text("id", "Id").fixed().width(60.0).editable(false);
    id.resizable = Some(false);

    vec![
        id,
        Column::text("name", "Name").fixed().width(160.0),
        Column::select(
            "role",
            "Role",
            vec![
                "admin".to_string(),
                "editor".to_string(),
                "viewer".to_string(),
            ],
        ),
        contact,
        profile,
        mood,
        Column::text("notes", "Notes").width(260.0),
    ]
}

/// Demo page hosting the grid: owns the rows, the working copy, pagination
/// and persistence. Cells only see the [`CellHandlers`] callbacks.
#[component]
pub fn GridPage() -> impl IntoView {
    let GridContext(grid) = expect_context::<GridContext>();

    if grid.rows.with_untracked(|rows| rows.is_empty()) {
        grid.rows.set(storage::load_rows().unwrap_or_else(sample_rows));
    }

    let columns = StoredValue::new(grid_columns());
    let page = RwSignal::new(0usize);
    // Commits rewrite `rows` in place; the row list below keys off this memo
    // so an in-place rewrite doesn't remount every cell (and the active
    // editor with it).
    let row_count = Memo::new(move |_| grid.rows.with(|rows| rows.len()));

    let persist_rows = move || {
        let rows = grid.rows.get_untracked();
        spawn_local(loading::global().track(async move {
            storage::save_rows(&rows);
        }));
    };

    let on_cell_edit =
        Callback::new(move |(column_name, _row_index, base_row_index): (String, usize, usize)| {
            let snapshot = grid
                .rows
                .with_untracked(|rows| rows.get(base_row_index).cloned())
                .unwrap_or_default();
            grid.edit_buffer.set(Some(snapshot));
            grid.editing_cell
                .set(Some(CellRef::new(base_row_index, &column_name)));
        });

    let on_cell_change = Callback::new(move |(column_name, value): (String, String)| {
        grid.edit_buffer.update(|buffer| {
            if let Some(row) = buffer {
                row.insert(column_name, Value::String(value));
            }
        });
    });

    let commit_changes = Callback::new(
        move |(base_row_index, fields, is_exiting): (usize, Vec<FieldDescriptor>, bool)| {
            if let Some(buffer) = grid.edit_buffer.get_untracked() {
                grid.rows.update(|rows| {
                    if let Some(row) = rows.get_mut(base_row_index) {
                        for field in &fields {
                            if let Some(value) = buffer.get(&field.column_name) {
                                row.insert(field.column_name.clone(), value.clone());
                            }
                        }
                    }
                });
                persist_rows();
            }
            if is_exiting {
                grid.editing_cell.set(None);
                grid.edit_buffer.set(None);
            }
        },
    );

    let revert_changes = Callback::new(move |_fields: Vec<FieldDescriptor>| {
        grid.edit_buffer.set(None);
        grid.editing_cell.set(None);
    });

    provide_context(CellHandlers {
        commit_changes,
        revert_changes,
        on_cell_change,
        on_cell_edit,
    });

    let busy = RwSignal::new(loading::global().get_loading());
    let subscription =
        StoredValue::new(Some(loading::global().subscribe(move |b| busy.set(b))));
    on_cleanup(move || {
        if let Some(sub) = subscription.try_update_value(|s| s.take()).flatten() {
            sub.unsubscribe();
        }
    });

    let page_size_value = RwSignal::new(grid.page_size.get_untracked().to_string());
    let on_page_size = Callback::new(move |value: String| {
        if let Ok(size) = value.parse::<usize>() {
            grid.page_size.set(size);
            page.set(0);
            storage::save_page_size(size);
        }
    });

    let prev_page = move |_ev: web_sys::MouseEvent| {
        page.update(|p| *p = p.saturating_sub(1));
    };
    let next_page = move |_ev: web_sys::MouseEvent| {
        let size = grid.page_size.get_untracked().max(1);
        let last = row_count.get_untracked().saturating_sub(1) / size;
        page.update(|p| *p = (*p + 1).min(last));
    };

    view! {
        <div data-name="GridPage" class="flex flex-col gap-4 p-6">
            <div class="flex items-center justify-between">
                <h1 class="text-lg font-semibold">"Team directory"</h1>
                <div class="flex items-center gap-3">
                    <Show when=move || busy.get()>
                        <Spinner />
                    </Show>
                    <Dropdown
                        options=vec!["5".to_string(), "10".to_string(), "25".to_string()]
                        value=page_size_value
                        on_select=on_page_size
                        aria_label="Rows per page"
                    />
                </div>
            </div>

            <div class="overflow-x-auto rounded-md border border-border">
                <div role="grid" class="w-max min-w-full">
                    <div role="row" class="flex border-b border-border">
                        {move || {
                            columns
                                .with_value(|cols| {
                                    cols.iter()
                                        .enumerate()
                                        .map(|(i, col)| {
                                            let style = match fixed_cell_style(cols, i) {
                                                Some(fs) => {
                                                    format!("width: {}px; {}", col.width, fs.css())
                                                }
                                                None => format!("width: {}px;", col.width),
                                            };
                                            // CSS `resize` needs overflow to be clipped.
                                            let header_class = if effective_resizable(
                                                col,
                                                grid.resizable_default,
                                            ) {
                                                "shrink-0 resize-x overflow-hidden bg-muted px-2 py-2 text-left text-sm font-medium"
                                            } else {
                                                "shrink-0 bg-muted px-2 py-2 text-left text-sm font-medium"
                                            };
                                            view! {
                                                <div
                                                    role="columnheader"
                                                    class=header_class
                                                    style=style
                                                >
                                                    {col.title.clone()}
                                                </div>
                                            }
                                        })
                                        .collect_view()
                                })
                        }}
                    </div>

                    {move || {
                        let size = grid.page_size.get().max(1);
                        let start = page.get() * size;
                        let end = (start + size).min(row_count.get());
                        (start..end)
                            .map(|base_row_index| {
                                let row_index = base_row_index - start;
                                view! {
                                    <div role="row" class="flex border-b border-border last:border-b-0">
                                        {columns
                                            .with_value(|cols| {
                                                cols.iter()
                                                    .enumerate()
                                                    .map(|(i, col)| {
                                                        view! {
                                                            <GridCell
                                                                column=col.clone()
                                                                row_index=row_index
                                                                base_row_index=base_row_index
                                                                fixed_style=fixed_cell_style(cols, i)
                                                            />
                                                        }
                                                    })
                                                    .collect_view()
                                            })}
                                    </div>
                                }
                            })
                            .collect_view()
                    }}
                </div>
            </div>

            <div class="flex items-center justify-end gap-2">
                <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=prev_page>
                    "Previous"
                </Button>
                <span class="text-sm text-muted-foreground">
                    {move || format!("Page {}", page.get() + 1)}
                </span>
                <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=next_page>
                    "Next"
                </Button>
            </div>
        </div>
    }
}

use crate::models::{EditorKind, FieldDescriptor};
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Labeled-input primitive for one field of a cell's edit group.
///
/// Renders a text input or a select-like control from the descriptor and
/// exposes the value/change/blur/keydown/click hooks the field navigation
/// layer wires up. The value is uncontrolled: `value` seeds the element and
/// every further keystroke reaches the host through `on_change` only, so the
/// editor never remounts (and never drops focus) mid-session.
#[component]
pub fn FieldEditor(
    descriptor: FieldDescriptor,
    #[prop(into)] value: String,
    #[prop(into)] id: String,
    #[prop(optional)] autofocus: bool,
    #[prop(into)] on_change: Callback<String>,
    #[prop(into)] on_keydown: Callback<web_sys::KeyboardEvent>,
    #[prop(into)] on_blur: Callback<()>,
    #[prop(into)] on_click: Callback<web_sys::MouseEvent>,
    #[prop(optional, into)] on_mousedown: Option<Callback<()>>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "h-8 w-full min-w-0 rounded-md border border-input bg-transparent px-2 py-1 text-sm outline-none transition-[color,box-shadow]",
        "focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2"
    );

    let handle_change = move |ev: web_sys::Event| on_change.run(event_target_value(&ev));
    let handle_keydown = move |ev: web_sys::KeyboardEvent| on_keydown.run(ev);
    let handle_blur = move |_ev: web_sys::FocusEvent| on_blur.run(());
    let handle_click = move |ev: web_sys::MouseEvent| on_click.run(ev);
    // Interactions inside the edit group must not reach row-level
    // outside-click-closes handlers. The hook runs before any blur the
    // press causes elsewhere in the group.
    let handle_mousedown = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        if let Some(cb) = on_mousedown {
            cb.run(());
        }
    };

    match descriptor.editor {
        EditorKind::Text => view! {
            <input
                data-name="FieldEditor"
                type="text"
                id=id
                class=merged_class
                value=value
                autofocus=autofocus
                on:input=handle_change
                on:keydown=handle_keydown
                on:blur=handle_blur
                on:click=handle_click
                on:mousedown=handle_mousedown
            />
        }
        .into_any(),
        EditorKind::Select => {
            let current = value.clone();
            view! {
                <select
                    data-name="FieldEditor"
                    id=id
                    class=merged_class
                    autofocus=autofocus
                    on:change=handle_change
                    on:keydown=handle_keydown
                    on:blur=handle_blur
                    on:click=handle_click
                    on:mousedown=handle_mousedown
                >
                    {descriptor
                        .options
                        .iter()
                        .map(|opt| {
                            let selected = *opt == current;
                            view! {
                                <option value=opt.clone() selected=selected>
                                    {opt.clone()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            }
            .into_any()
        }
        // Unknown editor kinds mount an empty slot instead of failing the
        // whole edit group.
        EditorKind::Other(_) => view! {
            <span data-name="FieldEditor" class="inline-block h-8 w-full" id=id></span>
        }
        .into_any(),
    }
}

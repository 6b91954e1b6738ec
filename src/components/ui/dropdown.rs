use icons::{Check, ChevronDown};
use leptos::prelude::*;
use strum::AsRefStr;
use tw_merge::*;

use crate::components::hooks::use_random::use_random_id_for;
use crate::grid::dropdown_nav::{dropdown_key, DropdownState};
use crate::grid::field_nav::NavKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr)]
pub enum DropdownPosition {
    #[default]
    Below,
    Above,
}

/// Controlled single-value dropdown. The trigger owns focus; keyboard
/// handling goes through [`dropdown_key`], so Enter/Space/arrows/Escape/Tab
/// behave the same here as in every other popup widget.
#[component]
pub fn Dropdown(
    #[prop(into)] options: Vec<String>,
    #[prop(into)] value: RwSignal<String>,
    #[prop(optional, into)] on_select: Option<Callback<String>>,
    #[prop(optional, into)] class: String,
    #[prop(default = DropdownPosition::default())] position: DropdownPosition,
    #[prop(default = "Options".into(), into)] aria_label: String,
) -> impl IntoView {
    let trigger_id = use_random_id_for("dropdown");
    let options = StoredValue::new(options);

    let open = RwSignal::new(false);
    // Highlighted option, -1 = none.
    let focused_index = RwSignal::new(-1i32);

    let choose = move |index: usize| {
        let Some(opt) = options.with_value(|opts| opts.get(index).cloned()) else {
            return;
        };
        value.set(opt.clone());
        if let Some(cb) = on_select {
            cb.run(opt);
        }
        open.set(false);
        focused_index.set(-1);
    };

    let handle_keydown = move |ev: web_sys::KeyboardEvent| {
        let state = DropdownState {
            open: open.get_untracked(),
            focused_index: focused_index.get_untracked(),
        };
        let count = options.with_value(|opts| opts.len());
        let transition = dropdown_key(NavKey::parse(&ev.key()), state, count, true);

        if transition.prevent_default {
            ev.prevent_default();
        }
        if let Some(next_open) = transition.open {
            open.set(next_open);
            if !next_open {
                focused_index.set(-1);
            }
        }
        if let Some(idx) = transition.focused_index {
            focused_index.set(idx);
        }
        if let Some(index) = transition.choose {
            choose(index);
        }
    };

    let handle_trigger_click = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let next = !open.get_untracked();
        open.set(next);
        if !next {
            focused_index.set(-1);
        }
    };

    // Option rows prevent default on mousedown so the trigger keeps focus
    // and this blur only fires when the user really leaves the widget.
    let handle_trigger_blur = move |_ev: web_sys::FocusEvent| {
        open.set(false);
        focused_index.set(-1);
    };

    let trigger_class = tw_merge!(
        "w-full p-2 h-9 inline-flex items-center justify-between gap-2 text-sm font-medium whitespace-nowrap rounded-md transition-colors focus:outline-none focus:ring-1 focus:ring-ring disabled:cursor-not-allowed disabled:opacity-50 [&_svg:not([class*='size-'])]:size-4 border bg-background border-input hover:bg-accent hover:text-accent-foreground",
        class
    );

    let content_class = "w-full min-w-[120px] overflow-auto z-50 p-1 rounded-md border bg-card shadow-md h-fit max-h-[300px] absolute top-[calc(100%+4px)] left-0 data-[position=Above]:top-auto data-[position=Above]:bottom-[calc(100%+4px)]";

    view! {
        <div data-name="Dropdown" class="relative w-fit">
            <button
                type="button"
                data-name="DropdownTrigger"
                id=trigger_id
                class=trigger_class
                aria-haspopup="listbox"
                aria-expanded=move || open.get().to_string()
                on:keydown=handle_keydown
                on:click=handle_trigger_click
                on:blur=handle_trigger_blur
            >
                <span class="truncate">{move || value.get()}</span>
                <ChevronDown class="text-muted-foreground" />
            </button>

            <Show when=move || open.get()>
                <ul
                    data-name="DropdownContent"
                    role="listbox"
                    aria-label=aria_label.clone()
                    class=content_class
                    data-position=position.as_ref().to_string()
                >
                    {move || {
                        options
                            .with_value(|opts| {
                                opts.iter()
                                    .cloned()
                                    .enumerate()
                                    .map(|(i, opt)| {
                                        let label = opt.clone();
                                        let is_focused = move || focused_index.get() == i as i32;
                                        let is_current = move || value.get() == opt;
                                        view! {
                                            <li
                                                data-name="DropdownOption"
                                                role="option"
                                                class="group inline-flex gap-2 items-center w-full rounded-sm px-2 py-1.5 text-sm cursor-pointer transition-colors duration-200 text-popover-foreground hover:bg-accent hover:text-accent-foreground aria-selected:bg-accent [&_svg:not([class*='size-'])]:size-4"
                                                aria-selected=move || {
                                                    (is_focused() || is_current()).to_string()
                                                }
                                                on:mousedown=|ev: web_sys::MouseEvent| {
                                                    ev.prevent_default()
                                                }
                                                on:click=move |_| choose(i)
                                            >
                                                {label}
                                                <Check class="ml-auto opacity-0 size-4 text-muted-foreground group-aria-selected:opacity-100" />
                                            </li>
                                        }
                                    })
                                    .collect_view()
                            })
                    }}
                </ul>
            </Show>
        </div>
    }
}

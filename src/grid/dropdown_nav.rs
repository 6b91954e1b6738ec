//! Keyboard navigation shared by every popup/select-like widget (grid
//! column dropdown, page-size selector, option lists).
//!
//! Pure transition function from `(state, key)` to effects; the widget owns
//! the `open`/`focused_index` signals and applies the transition.

use super::field_nav::NavKey;

/// Externally owned dropdown state, read at keydown time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DropdownState {
    pub open: bool,
    /// Highlighted option, -1 = none.
    pub focused_index: i32,
}

/// Effects to apply. `None` fields mean "leave as is"; `choose` carries the
/// option index to hand to the widget's selection callback (applied through
/// `options.get(..)`, so a stale out-of-range index degrades to a no-op).
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct DropdownTransition {
    pub prevent_default: bool,
    pub open: Option<bool>,
    pub focused_index: Option<i32>,
    pub choose: Option<usize>,
}

/// Wraparound is modular over the full option count. With zero options the
/// arrows keep the open state untouched (the modulus is undefined); default
/// is still prevented so the page does not scroll under the widget.
pub(crate) fn dropdown_key(
    key: NavKey,
    state: DropdownState,
    option_count: usize,
    is_controlled: bool,
) -> DropdownTransition {
    match key {
        NavKey::Enter | NavKey::Space => {
            if !state.open {
                DropdownTransition {
                    prevent_default: true,
                    open: Some(true),
                    focused_index: Some(0),
                    ..DropdownTransition::default()
                }
            } else if state.focused_index >= 0 {
                DropdownTransition {
                    prevent_default: true,
                    choose: Some(state.focused_index as usize),
                    ..DropdownTransition::default()
                }
            } else {
                DropdownTransition {
                    prevent_default: true,
                    ..DropdownTransition::default()
                }
            }
        }
        NavKey::ArrowDown | NavKey::ArrowUp => {
            if option_count == 0 {
                return DropdownTransition {
                    prevent_default: true,
                    ..DropdownTransition::default()
                };
            }
            let step = if key == NavKey::ArrowDown { 1 } else { -1 };
            let next = (state.focused_index + step).rem_euclid(option_count as i32);
            DropdownTransition {
                prevent_default: true,
                open: Some(true),
                focused_index: Some(next),
                ..DropdownTransition::default()
            }
        }
        NavKey::Escape => DropdownTransition {
            prevent_default: is_controlled,
            open: Some(false),
            ..DropdownTransition::default()
        },
        // Default browser tab behavior proceeds; only the popup closes.
        NavKey::Tab => DropdownTransition {
            open: Some(false),
            ..DropdownTransition::default()
        },
        _ => DropdownTransition::default(),
    }
}

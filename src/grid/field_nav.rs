//! Keyboard/focus navigation inside one cell's edit group.
//!
//! Pure state machine: the component layer owns a `SessionState` signal per
//! edit session and applies the returned actions (preventDefault, focus
//! moves, commit/revert callbacks). Nothing in here touches the DOM.

/// Keys the cell layer reacts to, parsed from `KeyboardEvent::key()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NavKey {
    Enter,
    Tab,
    Escape,
    Space,
    ArrowUp,
    ArrowDown,
    Other,
}

impl NavKey {
    pub fn parse(key: &str) -> Self {
        match key {
            "Enter" => NavKey::Enter,
            "Tab" => NavKey::Tab,
            "Escape" => NavKey::Escape,
            " " | "Spacebar" => NavKey::Space,
            "ArrowUp" => NavKey::ArrowUp,
            "ArrowDown" => NavKey::ArrowDown,
            _ => NavKey::Other,
        }
    }
}

/// Transient per-edit-session state. Created when a cell enters edit mode,
/// reset when the session ends, so a stale `is_navigating` can never
/// suppress the first blur of a later session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SessionState {
    /// True for the duration of a programmatic focus move (Tab/Enter/click);
    /// suppresses the spurious commit from the blur that move causes.
    pub is_navigating: bool,
    /// True while a click that manages commit itself is in flight.
    pub prevent_blur: bool,
    /// Field with logical focus, -1 = none.
    pub focused_field: i32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            is_navigating: false,
            prevent_blur: false,
            focused_field: -1,
        }
    }
}

/// What the component layer must do after a keydown.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct KeyAction {
    pub prevent_default: bool,
    /// Move logical focus to this field, if any.
    pub focus: Option<usize>,
    /// Invoke commit with this `is_exiting` flag.
    pub commit: Option<bool>,
    /// Invoke revert (discard the working copy).
    pub revert: bool,
}

/// Enter/Tab navigate (shift reverses) and always commit; the commit is an
/// exit exactly when the move target falls outside the group. Escape reverts
/// and never commits. Any other key passes through untouched.
pub(crate) fn field_key(
    state: &mut SessionState,
    key: NavKey,
    shift: bool,
    field_index: usize,
    field_count: usize,
) -> KeyAction {
    match key {
        NavKey::Enter | NavKey::Tab => {
            state.is_navigating = true;

            let next = if shift {
                field_index as i64 - 1
            } else {
                field_index as i64 + 1
            };
            let in_range = next >= 0 && (next as usize) < field_count;

            let mut action = KeyAction {
                prevent_default: true,
                ..KeyAction::default()
            };
            if in_range {
                state.focused_field = next as i32;
                action.focus = Some(next as usize);
            }
            action.commit = Some(!in_range);
            action
        }
        NavKey::Escape => KeyAction {
            prevent_default: true,
            revert: true,
            ..KeyAction::default()
        },
        _ => KeyAction::default(),
    }
}

/// Blur decision. `None` means the blur was caused by a controller-initiated
/// focus move or an in-flight click: both flags are cleared and no commit
/// happens. Otherwise `Some(is_exiting)`: a real blur from the first or last
/// field is treated as leaving the group; a middle-field blur still commits
/// but keeps the group open. (That middle-field case can leave the editor
/// open on a true outside click; kept as observed in the original behavior.)
pub(crate) fn field_blur(
    state: &mut SessionState,
    field_index: usize,
    field_count: usize,
) -> Option<bool> {
    if state.is_navigating || state.prevent_blur {
        state.is_navigating = false;
        state.prevent_blur = false;
        return None;
    }
    Some(field_index == 0 || field_index + 1 == field_count)
}

/// A click inside the group moves logical focus itself; flag the move so the
/// resulting blur on the previously focused field cannot double-commit.
pub(crate) fn field_click(state: &mut SessionState, field_index: usize) {
    state.is_navigating = true;
    state.focused_field = field_index as i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionState {
        SessionState::default()
    }

    #[test]
    fn test_nav_key_parse() {
        assert_eq!(NavKey::parse("Enter"), NavKey::Enter);
        assert_eq!(NavKey::parse("Tab"), NavKey::Tab);
        assert_eq!(NavKey::parse("Escape"), NavKey::Escape);
        assert_eq!(NavKey::parse(" "), NavKey::Space);
        assert_eq!(NavKey::parse("a"), NavKey::Other);
        assert_eq!(NavKey::parse("ArrowDown"), NavKey::ArrowDown);
    }

    #[test]
    fn test_tab_from_first_of_three_moves_forward_and_commits_open() {
        // Fields [name, age, email], focused on name (index 0), Tab.
        let mut s = session();
        let action = field_key(&mut s, NavKey::Tab, false, 0, 3);
        assert!(action.prevent_default);
        assert_eq!(action.focus, Some(1));
        assert_eq!(action.commit, Some(false));
        assert!(!action.revert);
        assert!(s.is_navigating);
        assert_eq!(s.focused_field, 1);
    }

    #[test]
    fn test_tab_from_last_field_exits_without_focus_move() {
        // Focused on email (index 2), Tab without shift.
        let mut s = session();
        let action = field_key(&mut s, NavKey::Tab, false, 2, 3);
        assert_eq!(action.focus, None);
        assert_eq!(action.commit, Some(true));
        assert_eq!(s.focused_field, -1);
    }

    #[test]
    fn test_tab_from_any_middle_field_never_exits() {
        for i in 0..4 {
            let mut s = session();
            let action = field_key(&mut s, NavKey::Tab, false, i, 5);
            assert_eq!(action.commit, Some(false), "field {i}");
        }
    }

    #[test]
    fn test_shift_tab_from_first_field_exits_backward() {
        let mut s = session();
        let action = field_key(&mut s, NavKey::Enter, true, 0, 3);
        assert_eq!(action.focus, None);
        assert_eq!(action.commit, Some(true));
    }

    #[test]
    fn test_shift_tab_from_middle_moves_backward() {
        let mut s = session();
        let action = field_key(&mut s, NavKey::Tab, true, 2, 3);
        assert_eq!(action.focus, Some(1));
        assert_eq!(action.commit, Some(false));
    }

    #[test]
    fn test_enter_behaves_like_tab() {
        let mut s = session();
        let action = field_key(&mut s, NavKey::Enter, false, 1, 3);
        assert_eq!(action.focus, Some(2));
        assert_eq!(action.commit, Some(false));
    }

    #[test]
    fn test_escape_reverts_and_never_commits() {
        let mut s = session();
        let action = field_key(&mut s, NavKey::Escape, false, 1, 3);
        assert!(action.prevent_default);
        assert!(action.revert);
        assert_eq!(action.commit, None);
        assert!(!s.is_navigating);
    }

    #[test]
    fn test_character_keys_have_no_effect() {
        let mut s = session();
        let action = field_key(&mut s, NavKey::Other, false, 1, 3);
        assert_eq!(action, KeyAction::default());
        assert_eq!(s, session());
    }

    #[test]
    fn test_blur_after_navigation_is_suppressed_and_clears_flags() {
        let mut s = session();
        let _ = field_key(&mut s, NavKey::Tab, false, 0, 3);
        assert!(s.is_navigating);

        assert_eq!(field_blur(&mut s, 0, 3), None);
        assert!(!s.is_navigating);
        assert!(!s.prevent_blur);

        // Next real blur commits normally.
        assert_eq!(field_blur(&mut s, 0, 3), Some(true));
    }

    #[test]
    fn test_blur_with_prevent_blur_is_suppressed() {
        let mut s = SessionState {
            prevent_blur: true,
            ..SessionState::default()
        };
        assert_eq!(field_blur(&mut s, 1, 3), None);
        assert!(!s.prevent_blur);
    }

    #[test]
    fn test_real_blur_exits_from_first_or_last_field_only() {
        let mut s = session();
        assert_eq!(field_blur(&mut s, 0, 3), Some(true));
        assert_eq!(field_blur(&mut s, 2, 3), Some(true));
        // Middle-field blur commits without exiting.
        assert_eq!(field_blur(&mut s, 1, 3), Some(false));
    }

    #[test]
    fn test_single_field_group_always_exits_on_blur() {
        let mut s = session();
        assert_eq!(field_blur(&mut s, 0, 1), Some(true));
    }

    #[test]
    fn test_click_flags_navigation_and_moves_focus() {
        let mut s = session();
        field_click(&mut s, 2);
        assert!(s.is_navigating);
        assert_eq!(s.focused_field, 2);

        // The blur triggered by the click's own focus change is swallowed.
        assert_eq!(field_blur(&mut s, 0, 3), None);
    }
}

pub mod button;
pub mod dropdown;
pub mod field_editor;
pub mod spinner;

// Re-export component symbols so callers can `use crate::components::ui::Dropdown` etc.
pub use button::*;
pub use dropdown::*;
pub use field_editor::*;
pub use spinner::*;

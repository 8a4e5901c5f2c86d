pub mod cursor_fix;
pub mod element;

pub use cursor_fix::{CursorFixHandle, attach_invisible_cursor_fix};
pub use element::{Element, ElementKind, FocusEvent, ListenerId};

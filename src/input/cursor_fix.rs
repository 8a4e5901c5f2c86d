use crate::input::element::{Element, FocusEvent, ListenerId, WeakElement};

/// Value briefly written to the input to force the caret to be laid out again
const MARKER_VALUE: &str = "x";

/// Listener registration for [`attach_invisible_cursor_fix`].
///
/// [`release`](CursorFixHandle::release) removes the listener and may be
/// called any number of times. Dropping the handle releases it as well.
pub struct CursorFixHandle {
    element: WeakElement,
    listener: Option<ListenerId>,
}

impl CursorFixHandle {
    pub fn release(&mut self) {
        let Some(id) = self.listener.take() else {
            return;
        };
        // A discarded element took its listeners with it
        if let Some(element) = self.element.upgrade() {
            element.remove_focus_listener(id);
            tracing::trace!("released invisible cursor fix");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }
}

impl Drop for CursorFixHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// Work around the caret disappearing from a text input after typing,
/// deleting everything, tabbing away and shift-tabbing back (seen in
/// WebKit). On every focus the input's value is rewritten to itself through
/// a throwaway value, which makes the caret render again.
pub fn attach_invisible_cursor_fix(input: &Element) -> CursorFixHandle {
    let id = input.add_focus_listener(rewrite_value_on_focus);
    CursorFixHandle {
        element: input.downgrade(),
        listener: Some(id),
    }
}

fn rewrite_value_on_focus(event: &FocusEvent) {
    if !event.target.is_text_input() {
        return;
    }
    let value = event.target.value();
    event.target.set_value(MARKER_VALUE);
    event.target.set_value(&value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::element::ElementKind;

    #[test]
    fn focus_keeps_value_and_relayouts_caret() {
        let input = Element::text_input();
        input.set_value("hello");
        let before = input.caret_generation();

        let _fix = attach_invisible_cursor_fix(&input);
        input.focus();

        assert_eq!(input.value(), "hello");
        assert_eq!(input.caret(), 5);
        assert_eq!(input.caret_generation(), before + 2);
    }

    #[test]
    fn release_stops_the_handler() {
        let input = Element::text_input();
        input.set_value("hello");
        let mut fix = attach_invisible_cursor_fix(&input);
        fix.release();
        assert!(!fix.is_attached());

        let before = input.caret_generation();
        input.focus();
        assert_eq!(input.caret_generation(), before);
        assert_eq!(input.focus_listener_count(), 0);
    }

    #[test]
    fn release_is_idempotent() {
        let input = Element::text_input();
        let other = input.add_focus_listener(|_| {});
        let mut fix = attach_invisible_cursor_fix(&input);
        fix.release();
        fix.release();
        drop(fix);
        // unrelated listeners survive
        assert_eq!(input.focus_listener_count(), 1);
        assert!(input.remove_focus_listener(other));
    }

    #[test]
    fn dropping_the_handle_releases() {
        let input = Element::text_input();
        {
            let _fix = attach_invisible_cursor_fix(&input);
            assert_eq!(input.focus_listener_count(), 1);
        }
        assert_eq!(input.focus_listener_count(), 0);
    }

    #[test]
    fn handle_outliving_its_element_is_harmless() {
        let input = Element::text_input();
        let mut fix = attach_invisible_cursor_fix(&input);
        drop(input);
        fix.release();
        assert!(!fix.is_attached());
    }

    #[test]
    fn ignores_non_text_targets() {
        let button = Element::new(ElementKind::Button);
        button.set_value("Save");
        let before = button.caret_generation();
        let _fix = attach_invisible_cursor_fix(&button);
        button.focus();
        assert_eq!(button.caret_generation(), before);
    }
}

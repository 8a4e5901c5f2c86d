use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    TextInput,
    Button,
    Other,
}

/// Identifies a registered focus listener on one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A focus event as delivered to listeners.
pub struct FocusEvent {
    pub target: Element,
}

type FocusListener = Rc<dyn Fn(&FocusEvent)>;

struct ElementState {
    kind: ElementKind,
    value: String,
    caret: usize,
    caret_generation: u64,
    focused: bool,
    listeners: Vec<(ListenerId, FocusListener)>,
    next_listener_id: u64,
}

/// Handle to a UI element living on the UI thread.
///
/// Clones share the same element. Writing the value moves the caret to the
/// end and bumps the caret generation, which is what the toolkit uses to
/// decide that the caret has to be laid out again.
#[derive(Clone)]
pub struct Element {
    state: Rc<RefCell<ElementState>>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            state: Rc::new(RefCell::new(ElementState {
                kind,
                value: String::new(),
                caret: 0,
                caret_generation: 0,
                focused: false,
                listeners: Vec::new(),
                next_listener_id: 0,
            })),
        }
    }

    pub fn text_input() -> Self {
        Self::new(ElementKind::TextInput)
    }

    pub fn kind(&self) -> ElementKind {
        self.state.borrow().kind
    }

    pub fn is_text_input(&self) -> bool {
        self.kind() == ElementKind::TextInput
    }

    pub fn value(&self) -> String {
        self.state.borrow().value.clone()
    }

    pub fn set_value(&self, value: &str) {
        let mut state = self.state.borrow_mut();
        state.value = value.to_string();
        state.caret = state.value.chars().count();
        state.caret_generation += 1;
    }

    /// Caret position in characters
    pub fn caret(&self) -> usize {
        self.state.borrow().caret
    }

    pub fn caret_generation(&self) -> u64 {
        self.state.borrow().caret_generation
    }

    pub fn is_focused(&self) -> bool {
        self.state.borrow().focused
    }

    pub fn blur(&self) {
        self.state.borrow_mut().focused = false;
    }

    pub fn add_focus_listener(&self, listener: impl Fn(&FocusEvent) + 'static) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = ListenerId(state.next_listener_id);
        state.next_listener_id += 1;
        state.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Returns false if the listener was not registered
    pub fn remove_focus_listener(&self, id: ListenerId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.listeners.len();
        state.listeners.retain(|(listener_id, _)| *listener_id != id);
        state.listeners.len() != before
    }

    pub fn focus_listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Focus the element and dispatch a focus event to its listeners.
    pub fn focus(&self) {
        // Listeners may write to the element, so no borrow is held while they run
        let listeners: Vec<FocusListener> = {
            let mut state = self.state.borrow_mut();
            state.focused = true;
            state.listeners.iter().map(|(_, l)| Rc::clone(l)).collect()
        };
        let event = FocusEvent {
            target: self.clone(),
        };
        for listener in listeners {
            listener(&event);
        }
    }

    pub(crate) fn downgrade(&self) -> WeakElement {
        WeakElement(Rc::downgrade(&self.state))
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Element")
            .field("kind", &state.kind)
            .field("value", &state.value)
            .field("caret", &state.caret)
            .field("focused", &state.focused)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

/// Non-owning element reference, so handles don't keep discarded elements alive
pub(crate) struct WeakElement(std::rc::Weak<RefCell<ElementState>>);

impl WeakElement {
    pub(crate) fn upgrade(&self) -> Option<Element> {
        self.0.upgrade().map(|state| Element { state })
    }
}

//! Matching keyboard and mouse events against declared shortcuts.
//!
//! A shortcut is a key plus a [`ShortcutSpec`] naming the modifiers that must
//! be held. Matching is exact: a modifier that is pressed but not asked for
//! makes the event a non-match.
//!
//! `cmd_or_ctrl` is the platform primary modifier. It is Command (reported by
//! crossterm as `SUPER`) on Apple platforms and Ctrl everywhere else, see
//! [`primary_modifier_target`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::utils::Platform;

/// Modifiers a shortcut asks for. Unset fields mean "must not be held".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd_or_ctrl: Option<bool>,
}

impl ShortcutSpec {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn cmd_or_ctrl() -> Self {
        Self {
            cmd_or_ctrl: Some(true),
            ..Self::default()
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = Some(true);
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = Some(true);
        self
    }

    pub fn with_cmd_or_ctrl(mut self) -> Self {
        self.cmd_or_ctrl = Some(true);
        self
    }
}

/// The four modifier flags observed on an input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModifierState {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl From<KeyModifiers> for ModifierState {
    fn from(modifiers: KeyModifiers) -> Self {
        Self {
            shift: modifiers.contains(KeyModifiers::SHIFT),
            alt: modifiers.contains(KeyModifiers::ALT),
            ctrl: modifiers.contains(KeyModifiers::CONTROL),
            meta: modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META),
        }
    }
}

/// Anything an observed modifier state can be read from.
pub trait ModifierSource {
    fn modifier_state(&self) -> ModifierState;
}

impl ModifierSource for ModifierState {
    fn modifier_state(&self) -> ModifierState {
        *self
    }
}

impl ModifierSource for KeyModifiers {
    fn modifier_state(&self) -> ModifierState {
        ModifierState::from(*self)
    }
}

impl ModifierSource for KeyEvent {
    fn modifier_state(&self) -> ModifierState {
        ModifierState::from(self.modifiers)
    }
}

impl ModifierSource for MouseEvent {
    fn modifier_state(&self) -> ModifierState {
        ModifierState::from(self.modifiers)
    }
}

/// Which of Ctrl/Meta the primary modifier resolves to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrimaryModifier {
    pub ctrl: bool,
    pub meta: bool,
}

/// Resolve the primary modifier for `platform`. When `requested` is false
/// neither Ctrl nor Meta is expected.
pub fn primary_modifier_target(platform: Platform, requested: bool) -> PrimaryModifier {
    PrimaryModifier {
        ctrl: requested && !platform.is_apple(),
        meta: requested && platform.is_apple(),
    }
}

/// Shortcut matcher bound to a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutMatcher {
    platform: Platform,
}

impl Default for ShortcutMatcher {
    fn default() -> Self {
        Self::current()
    }
}

impl ShortcutMatcher {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Matcher for the platform this process runs on
    pub fn current() -> Self {
        Self::new(Platform::current())
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The exact modifier state `spec` asks for on this platform
    pub fn target(&self, spec: &ShortcutSpec) -> ModifierState {
        let primary = primary_modifier_target(self.platform, spec.cmd_or_ctrl.unwrap_or(false));
        ModifierState {
            shift: spec.shift.unwrap_or(false),
            alt: spec.alt.unwrap_or(false),
            ctrl: primary.ctrl,
            meta: primary.meta,
        }
    }

    /// True iff the event's modifiers are exactly the ones `spec` asks for.
    pub fn check_modifiers<E: ModifierSource + ?Sized>(
        &self,
        event: &E,
        spec: &ShortcutSpec,
    ) -> bool {
        event.modifier_state() == self.target(spec)
    }

    /// True iff the event's key equals `key` (case-insensitive) and its
    /// modifiers match `spec`.
    pub fn check_shortcut(&self, event: &KeyEvent, key: &str, spec: &ShortcutSpec) -> bool {
        key_matches(event.code, key) && self.check_modifiers(event, spec)
    }
}

/// [`ShortcutMatcher::check_modifiers`] on the detected platform.
pub fn check_modifiers<E: ModifierSource + ?Sized>(event: &E, spec: &ShortcutSpec) -> bool {
    ShortcutMatcher::current().check_modifiers(event, spec)
}

/// [`ShortcutMatcher::check_shortcut`] on the detected platform.
pub fn check_shortcut(event: &KeyEvent, key: &str, spec: &ShortcutSpec) -> bool {
    ShortcutMatcher::current().check_shortcut(event, key, spec)
}

/// Name of the key in DOM `KeyboardEvent.key` terms
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::F(n) => return Some(format!("F{}", n)),
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Escape",
        KeyCode::Backspace => "Backspace",
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Delete => "Delete",
        KeyCode::Insert => "Insert",
        _ => return None,
    };
    Some(name.to_string())
}

/// Other spellings accepted for a key in shortcut definitions
fn key_aliases(code: KeyCode) -> &'static [&'static str] {
    match code {
        KeyCode::Char(' ') => &["Space", "Spacebar"],
        KeyCode::Enter => &["Return"],
        KeyCode::Esc => &["Esc"],
        KeyCode::BackTab => &["BackTab"],
        KeyCode::Left => &["Left"],
        KeyCode::Right => &["Right"],
        KeyCode::Up => &["Up"],
        KeyCode::Down => &["Down"],
        KeyCode::Delete => &["Del"],
        _ => &[],
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_uppercase() == b.to_uppercase()
}

/// Case-insensitive comparison of an event key against a key name.
pub fn key_matches(code: KeyCode, key: &str) -> bool {
    match key_name(code) {
        Some(name) => {
            eq_ignore_case(&name, key)
                || key_aliases(code).iter().any(|alias| eq_ignore_case(alias, key))
        }
        None => false,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShortcutError {
    #[error("Empty shortcut")]
    Empty,
    #[error("Unknown modifier '{0}'")]
    UnknownModifier(String),
    #[error("Shortcut '{0}' has no key")]
    MissingKey(String),
}

/// A key plus the modifiers it needs, parsed from an accelerator string such
/// as `CmdOrCtrl+Shift+N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: String,
    pub spec: ShortcutSpec,
}

impl Shortcut {
    pub fn new(key: impl Into<String>, spec: ShortcutSpec) -> Self {
        Self {
            key: key.into(),
            spec,
        }
    }

    pub fn matches(&self, matcher: &ShortcutMatcher, event: &KeyEvent) -> bool {
        matcher.check_shortcut(event, &self.key, &self.spec)
    }

    /// Human-readable label using the platform's modifier names
    pub fn display(&self, platform: Platform) -> String {
        let mut parts = Vec::new();
        if self.spec.cmd_or_ctrl.unwrap_or(false) {
            parts.push(platform.primary_modifier_label().to_string());
        }
        if self.spec.alt.unwrap_or(false) {
            parts.push(if platform.is_apple() { "Opt" } else { "Alt" }.to_string());
        }
        if self.spec.shift.unwrap_or(false) {
            parts.push("Shift".to_string());
        }
        let key = if self.key.chars().count() == 1 {
            self.key.to_uppercase()
        } else {
            self.key.clone()
        };
        parts.push(key);
        parts.join("+")
    }
}

impl FromStr for Shortcut {
    type Err = ShortcutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ShortcutError::Empty);
        }

        // "Ctrl++" binds the plus key
        let (modifiers, key) = match s.strip_suffix("++") {
            Some(rest) => (rest, "+"),
            None => match s.rsplit_once('+') {
                Some((modifiers, key)) => (modifiers, key.trim()),
                None => ("", s),
            },
        };
        if key.is_empty() {
            return Err(ShortcutError::MissingKey(s.to_string()));
        }

        let mut spec = ShortcutSpec::none();
        for modifier in modifiers.split('+').map(str::trim).filter(|m| !m.is_empty()) {
            match modifier.to_ascii_lowercase().as_str() {
                "cmdorctrl" | "commandorcontrol" | "primary" => spec.cmd_or_ctrl = Some(true),
                "shift" => spec.shift = Some(true),
                "alt" | "option" | "opt" => spec.alt = Some(true),
                _ => return Err(ShortcutError::UnknownModifier(modifier.to_string())),
            }
        }

        Ok(Shortcut::new(key, spec))
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.spec.cmd_or_ctrl.unwrap_or(false) {
            write!(f, "CmdOrCtrl+")?;
        }
        if self.spec.alt.unwrap_or(false) {
            write!(f, "Alt+")?;
        }
        if self.spec.shift.unwrap_or(false) {
            write!(f, "Shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

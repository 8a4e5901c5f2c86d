use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, KeyboardEnhancementFlags, MouseEvent, MouseEventKind,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement};
use std::io::{self, Write};

use crate::config::Config;
use crate::shortcut::{ModifierSource, ModifierState, Shortcut, ShortcutMatcher};
use crate::terminal::error::TerminalError;

/// Guard that restores the terminal even if the loop panics, so the user's
/// shell is not left in raw mode.
struct TerminalGuard {
    raw_mode_enabled: bool,
    mouse_capture_enabled: bool,
    keyboard_enhanced: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        let mut guard = Self {
            raw_mode_enabled: true,
            mouse_capture_enabled: false,
            keyboard_enhanced: false,
        };

        let mut stdout = io::stdout();
        execute!(stdout, EnableMouseCapture)?;
        guard.mouse_capture_enabled = true;

        // Without the kitty protocol the Command/Super key is never reported
        if supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
                )
            )?;
            guard.keyboard_enhanced = true;
        } else {
            tracing::info!("terminal does not report the Super key; Cmd shortcuts will not match");
        }

        Ok(guard)
    }

    /// Restore terminal state; the guard does nothing on drop afterwards
    fn restore(&mut self) -> Result<(), TerminalError> {
        let mut stdout = io::stdout();
        if self.keyboard_enhanced {
            execute!(stdout, PopKeyboardEnhancementFlags)?;
            self.keyboard_enhanced = false;
        }
        if self.mouse_capture_enabled {
            execute!(stdout, DisableMouseCapture)?;
            self.mouse_capture_enabled = false;
        }
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already on a cleanup path, errors have nowhere to go
        let mut stdout = io::stdout();
        if self.keyboard_enhanced {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        if self.mouse_capture_enabled {
            let _ = execute!(stdout, DisableMouseCapture);
        }
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
    }
}

/// Configured shortcuts bound to the matcher they are checked with.
pub struct KeyTester {
    matcher: ShortcutMatcher,
    bindings: Vec<(&'static str, Shortcut)>,
}

impl KeyTester {
    pub fn from_config(config: &Config) -> Result<Self, TerminalError> {
        Ok(Self::new(config.matcher(), config.shortcuts.parse_all()?))
    }

    pub fn new(matcher: ShortcutMatcher, bindings: Vec<(&'static str, Shortcut)>) -> Self {
        Self { matcher, bindings }
    }

    /// Actions whose shortcut matches `event`
    pub fn matching_actions(&self, event: &KeyEvent) -> Vec<&'static str> {
        self.bindings
            .iter()
            .filter(|(_, shortcut)| shortcut.matches(&self.matcher, event))
            .map(|(action, _)| *action)
            .collect()
    }

    pub fn is_quit(&self, event: &KeyEvent) -> bool {
        if event.code == KeyCode::Esc
            || (event.code == KeyCode::Char('c') && event.modifiers == KeyModifiers::CONTROL)
        {
            return true;
        }
        self.matching_actions(event).contains(&"quit")
    }

    /// One line of output describing a key press
    pub fn describe_key(&self, event: &KeyEvent) -> String {
        let actions = self.matching_actions(event);
        let matched = if actions.is_empty() {
            "no shortcut".to_string()
        } else {
            actions.join(", ")
        };
        format!(
            "{:?} [{}] -> {}",
            event.code,
            format_modifiers(event.modifier_state()),
            matched
        )
    }

    /// One line of output describing a mouse click
    pub fn describe_mouse(&self, event: &MouseEvent) -> String {
        format!(
            "click at {},{} [{}]",
            event.column,
            event.row,
            format_modifiers(event.modifier_state())
        )
    }

    /// Shortcut legend for the configured platform
    pub fn legend(&self) -> Vec<String> {
        self.bindings
            .iter()
            .map(|(action, shortcut)| {
                format!("{:<16} {}", action, shortcut.display(self.matcher.platform()))
            })
            .collect()
    }
}

fn format_modifiers(state: ModifierState) -> String {
    let names: Vec<&str> = [
        (state.ctrl, "ctrl"),
        (state.meta, "meta"),
        (state.alt, "alt"),
        (state.shift, "shift"),
    ]
    .into_iter()
    .filter(|(held, _)| *held)
    .map(|(_, name)| name)
    .collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join("+")
    }
}

fn print_line(out: &mut impl Write, line: &str) -> io::Result<()> {
    // Raw mode: no implicit carriage return
    write!(out, "{}\r\n", line)?;
    out.flush()
}

/// Print which configured shortcuts each key press or click matches, until
/// the quit shortcut or Esc is pressed.
pub fn run_key_tester(tester: KeyTester) -> Result<(), TerminalError> {
    let mut stdout = io::stdout();
    for line in tester.legend() {
        print_line(&mut stdout, &line)?;
    }
    print_line(&mut stdout, "Press keys to test them, Esc to quit.")?;

    let mut guard = TerminalGuard::new()?;

    loop {
        match event::read()? {
            // Only Press events, Windows also reports releases
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                print_line(&mut stdout, &tester.describe_key(&key_event))?;
                if tester.is_quit(&key_event) {
                    break;
                }
            }
            Event::Mouse(mouse_event) => {
                if let MouseEventKind::Down(_) = mouse_event.kind {
                    print_line(&mut stdout, &tester.describe_mouse(&mouse_event))?;
                }
            }
            _ => {}
        }
    }

    guard.restore()?;
    Ok(())
}

pub mod cli;
pub mod config;
pub mod cron_text;
pub mod host;
pub mod input;
pub mod logging;
pub mod models;
pub mod shortcut;
pub mod terminal;
pub mod utils;

pub use config::Config;
pub use cron_text::{format_cron, get_cron_text};
pub use host::{Host, HostClient};
pub use input::attach_invisible_cursor_fix;
pub use models::{Group, Repeat};
pub use shortcut::{ShortcutMatcher, ShortcutSpec, check_modifiers, check_shortcut};
pub use utils::{Platform, Profile};

pub mod error;
pub mod events;

pub use error::TerminalError;
pub use events::{KeyTester, run_key_tester};

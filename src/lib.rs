pub mod ai;
pub mod app;
pub mod config;
pub mod executor;
pub mod logging;
pub mod session;
pub mod shell;
pub mod theme;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use ai::{AIError, ChatClient, CommandTranslator, TranslationContext};
pub use config::Config;
pub use executor::{CommandExecutor, CommandOutput, ShellExecutor};
pub use session::{route, HistoryEntry, Mode, Outcome, Route, Session};
pub use shell::ShellType;

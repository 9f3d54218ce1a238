//! Mode routing and the in-memory session history.
//!
//! Every submitted line becomes exactly one [`HistoryEntry`]. In [`Mode::Regular`] the line
//! is the command; in [`Mode::Ai`] it is first handed to a [`CommandTranslator`] and the
//! suggestion is used verbatim. A failed translation is recorded without running anything.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::ai::{AIError, CommandTranslator, TranslationContext};
use crate::executor::validation::BLOCKED_MESSAGE;
use crate::executor::{CommandExecutor, CommandValidator, DirectoryCommand, ExecError};
use crate::shell::{self, ShellType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Regular,
    Ai,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Regular => Mode::Ai,
            Mode::Ai => Mode::Regular,
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            Mode::Regular => ">",
            Mode::Ai => "AI>",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Regular => write!(f, "regular"),
            Mode::Ai => write!(f, "ai"),
        }
    }
}

/// Where an input line goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Execute(String),
    Translate(String),
}

pub fn route(input: &str, mode: Mode) -> Route {
    match mode {
        Mode::Regular => Route::Execute(input.to_string()),
        Mode::Ai => Route::Translate(input.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Executed { exit_status: Option<i32> },
    Blocked,
    /// Handled in-process; `changed` is false for `cd` with no target and for failures.
    Directory { changed: bool },
    NothingToRun,
    TranslationFailed,
    Cancelled,
    TimedOut,
    SpawnFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub input: String,
    pub mode: Mode,
    /// `None` when no command could be resolved.
    pub resolved: Option<String>,
    pub outcome: Outcome,
    pub output: String,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
}

/// A routed input line, ready to be run or cancelled.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub input: String,
    pub mode: Mode,
    pub command: Result<String, AIError>,
}

pub struct Session {
    mode: Mode,
    cwd: PathBuf,
    shell: ShellType,
    history: Vec<HistoryEntry>,
    validator: CommandValidator,
    executor: Box<dyn CommandExecutor>,
    translator: Option<Box<dyn CommandTranslator>>,
}

impl Session {
    pub fn new(
        cwd: PathBuf,
        shell: ShellType,
        validator: CommandValidator,
        executor: Box<dyn CommandExecutor>,
    ) -> Self {
        Self {
            mode: Mode::Regular,
            cwd,
            shell,
            history: Vec::new(),
            validator,
            executor,
            translator: None,
        }
    }

    pub fn with_translator(mut self, translator: Box<dyn CommandTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn set_regular(&mut self) {
        self.mode = Mode::Regular;
    }

    /// Switches to AI mode, building the translator with `make` on first use.
    /// On failure the mode is left unchanged.
    pub fn enable_ai<F>(&mut self, make: F) -> Result<(), AIError>
    where
        F: FnOnce() -> Result<Box<dyn CommandTranslator>, AIError>,
    {
        if self.translator.is_none() {
            self.translator = Some(make()?);
            tracing::info!("translator initialised");
        }
        self.mode = Mode::Ai;
        Ok(())
    }

    pub fn toggle<F>(&mut self, make: F) -> Result<Mode, AIError>
    where
        F: FnOnce() -> Result<Box<dyn CommandTranslator>, AIError>,
    {
        match self.mode.toggled() {
            Mode::Ai => self.enable_ai(make)?,
            Mode::Regular => self.set_regular(),
        }
        Ok(self.mode)
    }

    fn context(&self) -> TranslationContext {
        TranslationContext {
            shell_name: self.shell.get_shell_name().to_string(),
            os: shell::os_name().to_string(),
            cwd: self.cwd.clone(),
        }
    }

    /// Routes `input` under the current mode, translating it if needed.
    pub async fn resolve(&self, input: &str) -> Resolution {
        let mode = self.mode;
        let command = match route(input, mode) {
            Route::Execute(command) => Ok(command),
            Route::Translate(text) => match &self.translator {
                Some(translator) => translator.translate(&text, &self.context()).await,
                None => Err(AIError::ConfigurationError(
                    "AI mode is not available".to_string(),
                )),
            },
        };

        tracing::debug!(%mode, input, resolved = ?command, "routed input");

        Resolution {
            input: input.to_string(),
            mode,
            command,
        }
    }

    /// Runs a resolution, or records its translation failure, and appends the entry.
    pub async fn complete(&mut self, resolution: Resolution) -> &HistoryEntry {
        let Resolution {
            input,
            mode,
            command,
        } = resolution;

        let entry = match command {
            Ok(command) => {
                let (outcome, output, success) = self.run_command(&command).await;
                new_entry(input, mode, Some(command), outcome, output, success)
            }
            Err(error) => {
                tracing::warn!(input = input.as_str(), "translation failed: {}", error);
                new_entry(
                    input,
                    mode,
                    None,
                    Outcome::TranslationFailed,
                    format!("AI error: {}", error),
                    false,
                )
            }
        };

        self.push(entry)
    }

    /// Records a resolved command the user chose not to run.
    pub fn cancel(&mut self, resolution: Resolution) -> &HistoryEntry {
        let entry = new_entry(
            resolution.input,
            resolution.mode,
            resolution.command.ok(),
            Outcome::Cancelled,
            "Command cancelled".to_string(),
            false,
        );
        self.push(entry)
    }

    pub async fn submit(&mut self, input: &str) -> &HistoryEntry {
        let resolution = self.resolve(input).await;
        self.complete(resolution).await
    }

    async fn run_command(&mut self, command: &str) -> (Outcome, String, bool) {
        if command.trim().is_empty() {
            return (Outcome::NothingToRun, String::new(), false);
        }

        if self.validator.is_dangerous(command) {
            return (Outcome::Blocked, BLOCKED_MESSAGE.to_string(), false);
        }

        if let Some(directory_command) = DirectoryCommand::parse(command) {
            let result = directory_command.apply(&self.cwd);
            let changed = result.new_dir.is_some();
            if let Some(new_dir) = result.new_dir {
                tracing::debug!(from = %self.cwd.display(), to = %new_dir.display(), "changed directory");
                self.cwd = new_dir;
            }
            return (Outcome::Directory { changed }, result.message, result.success);
        }

        match self.executor.execute(command, &self.cwd).await {
            Ok(output) => {
                let outcome = Outcome::Executed {
                    exit_status: output.exit_status,
                };
                if output.success() {
                    (outcome, output.stdout, true)
                } else {
                    let detail = if !output.stderr.is_empty() {
                        output.stderr
                    } else if !output.stdout.is_empty() {
                        output.stdout
                    } else {
                        match output.exit_status {
                            Some(code) => format!("exit status {}", code),
                            None => "terminated by signal".to_string(),
                        }
                    };
                    (outcome, format!("Error: {}", detail), false)
                }
            }
            Err(e @ ExecError::TimedOut(_)) => (Outcome::TimedOut, e.to_string(), false),
            Err(e @ ExecError::Spawn(_)) => (Outcome::SpawnFailed, e.to_string(), false),
        }
    }

    fn push(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        self.history.push(entry);
        &self.history[self.history.len() - 1]
    }
}

fn new_entry(
    input: String,
    mode: Mode,
    resolved: Option<String>,
    outcome: Outcome,
    output: String,
    success: bool,
) -> HistoryEntry {
    HistoryEntry {
        input,
        mode,
        resolved,
        outcome,
        output,
        success,
        timestamp: Utc::now(),
    }
}

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::ai::{AIError, CommandTranslator, TranslationContext};
use crate::executor::{CommandExecutor, CommandOutput, CommandValidator, ExecError};
use crate::session::Session;
use crate::shell::ShellType;


/// Records every command it is asked to run and replies with a canned output.
#[derive(Clone, Default)]
pub(crate) struct FakeExecutor {
    pub calls: Arc<Mutex<Vec<(String, PathBuf)>>>,
    pub exit_status: i32,
    pub timed_out: bool,
}

impl FakeExecutor {
    pub fn commands(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }
}

#[async_trait]
impl CommandExecutor for FakeExecutor {
    async fn execute(&self, command: &str, cwd: &Path) -> Result<CommandOutput, ExecError> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), cwd.to_path_buf()));

        if self.timed_out {
            return Err(ExecError::TimedOut(std::time::Duration::from_secs(30)));
        }

        let failed = self.exit_status != 0;
        Ok(CommandOutput {
            stdout: if failed { String::new() } else { format!("ran: {}", command) },
            stderr: if failed { "command not found".to_string() } else { String::new() },
            exit_status: Some(self.exit_status),
        })
    }
}

/// Returns a fixed reply and counts calls.
#[derive(Clone)]
pub(crate) struct FakeTranslator {
    pub reply: Result<String, AIError>,
    pub calls: Arc<Mutex<Vec<(String, TranslationContext)>>>,
}

impl FakeTranslator {
    pub fn replying(command: &str) -> Self {
        Self {
            reply: Ok(command.to_string()),
            calls: Arc::default(),
        }
    }

    pub fn failing(error: AIError) -> Self {
        Self {
            reply: Err(error),
            calls: Arc::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CommandTranslator for FakeTranslator {
    async fn translate(&self, input: &str, context: &TranslationContext) -> Result<String, AIError> {
        self.calls
            .lock()
            .unwrap()
            .push((input.to_string(), context.clone()));
        self.reply.clone()
    }
}

pub(crate) fn session_with(executor: &FakeExecutor, cwd: &Path) -> Session {
    Session::new(
        cwd.to_path_buf(),
        ShellType::Bash,
        CommandValidator::new(&[]).unwrap(),
        Box::new(executor.clone()),
    )
}

/// Session already in AI mode backed by `translator`.
pub(crate) fn ai_session(executor: &FakeExecutor, translator: &FakeTranslator, cwd: &Path) -> Session {
    let mut session = session_with(executor, cwd);
    let translator = translator.clone();
    session
        .enable_ai(move || Ok(Box::new(translator)))
        .unwrap();
    session
}

use anyhow::Result;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::ai::{AIError, ChatClient, CommandTranslator};
use crate::config::{AIConfig, Config};
use crate::executor::{CommandValidator, ShellExecutor};
use crate::session::{HistoryEntry, Mode, Outcome, Session};
use crate::shell::ShellType;
use crate::theme::{self, Theme};

type InputLines = Lines<BufReader<Stdin>>;

/// Lines handled by the terminal itself rather than routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Ai,
    Regular,
    Toggle,
    History,
    Help,
    Exit,
}

impl Builtin {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "/ai" => Some(Self::Ai),
            "/cmd" => Some(Self::Regular),
            "/mode" => Some(Self::Toggle),
            "/history" => Some(Self::History),
            "/help" => Some(Self::Help),
            "exit" | "quit" => Some(Self::Exit),
            _ => None,
        }
    }
}

const HELP: &str = "\
/ai       switch to AI mode (natural language)
/cmd      switch to regular mode (shell commands)
/mode     toggle between the two modes
/history  list this session's commands
exit      leave";

pub struct App {
    session: Session,
    config: Config,
    theme: Theme,
}

fn make_translator(config: &AIConfig) -> Result<Box<dyn CommandTranslator>, AIError> {
    Ok(Box::new(ChatClient::new(config)?))
}

impl App {
    pub fn new(config: Config, cwd: PathBuf) -> Result<Self> {
        let shell_type = ShellType::detect();
        let validator = CommandValidator::new(&config.security.blocked_commands)?;
        let executor = ShellExecutor::new(shell_type, config.security.command_timeout());
        let session = Session::new(cwd, shell_type, validator, Box::new(executor));
        let theme = Theme::named(config.display.theme);

        Ok(Self {
            session,
            config,
            theme,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn run(&mut self, start_in_ai: bool) -> Result<()> {
        println!("{}", self.theme.ai_prompt.apply("aicmd - AI powered terminal"));
        println!(
            "{}",
            self.theme
                .info
                .apply(&format!("Shell: {}  |  /help for commands", ShellType::detect().get_shell_name()))
        );
        println!();

        if start_in_ai {
            self.switch(Builtin::Ai);
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            self.print_prompt()?;

            let Some(line) = next_input(&mut lines).await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match Builtin::parse(line) {
                Some(Builtin::Exit) => break,
                Some(Builtin::History) => self.print_history(),
                Some(Builtin::Help) => println!("{}", HELP),
                Some(builtin) => self.switch(builtin),
                None => self.handle_input(line, &mut lines).await?,
            }
        }

        Ok(())
    }

    fn print_prompt(&self) -> io::Result<()> {
        let mode = self.session.mode();
        let scheme = match mode {
            Mode::Regular => &self.theme.prompt,
            Mode::Ai => &self.theme.ai_prompt,
        };
        print!(
            "{} {} ",
            self.theme.info.apply(&self.session.cwd().display().to_string()),
            scheme.apply(mode.prompt())
        );
        io::stdout().flush()
    }

    fn switch(&mut self, builtin: Builtin) {
        let ai_config = &self.config.ai;
        let result = match builtin {
            Builtin::Ai => self.session.enable_ai(|| make_translator(ai_config)),
            Builtin::Regular => {
                self.session.set_regular();
                Ok(())
            }
            _ => self.session.toggle(|| make_translator(ai_config)).map(|_| ()),
        };

        match result {
            Ok(()) => match self.session.mode() {
                Mode::Ai => println!(
                    "{}",
                    self.theme.ai_prompt.apply("AI mode enabled - enter natural language commands")
                ),
                Mode::Regular => println!("{}", self.theme.info.apply("Command mode enabled")),
            },
            Err(e) => {
                eprintln!(
                    "{}",
                    self.theme.error.apply(&format!("Could not initialize AI client: {}", e))
                );
            }
        }
    }

    async fn handle_input(&mut self, line: &str, lines: &mut InputLines) -> Result<()> {
        if self.session.mode() == Mode::Ai {
            println!("{}", self.theme.info.apply("Processing with AI..."));
        }

        let resolution = self.session.resolve(line).await;

        if resolution.mode == Mode::Ai {
            if let Ok(command) = &resolution.command {
                println!("{}", self.theme.info.apply("AI suggests the following command:"));
                println!("{}", self.theme.suggestion.apply(&format!("$ {}", command)));

                if self.config.security.confirm_ai_commands && !confirm(lines).await? {
                    let entry = self.session.cancel(resolution);
                    println!("{}", self.theme.info.apply(&entry.output));
                    return Ok(());
                }
            }
        }

        let entry = self.session.complete(resolution).await;
        render(&self.theme, entry);
        Ok(())
    }

    fn print_history(&self) {
        for (i, entry) in self.session.history().iter().enumerate() {
            let marker = if entry.success { " " } else { "!" };
            let resolved = match &entry.resolved {
                Some(command) if entry.mode == Mode::Ai => format!("{}  ->  {}", entry.input, command),
                _ => entry.input.clone(),
            };
            println!(
                "{:>4}{} {} [{}] {}",
                i + 1,
                marker,
                entry.timestamp.format("%H:%M:%S"),
                entry.mode,
                resolved
            );
        }
    }
}

/// Next line of input. Lines that are not valid UTF-8 are reported and skipped;
/// other read errors are returned.
async fn next_input<R>(lines: &mut Lines<R>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match lines.next_line().await {
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                tracing::warn!("discarding input line: {}", e);
                eprintln!("Input error: {}", e);
            }
            other => return other,
        }
    }
}

async fn confirm(lines: &mut InputLines) -> Result<bool> {
    print!("Run this command? [y/N] ");
    io::stdout().flush()?;

    let answer = next_input(lines).await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn render(theme: &Theme, entry: &HistoryEntry) {
    if entry.output.is_empty() {
        return;
    }

    if !entry.success {
        eprintln!("{}", theme.error.apply(&entry.output));
        return;
    }

    let listing = matches!(entry.outcome, Outcome::Executed { .. })
        && entry
            .resolved
            .as_deref()
            .is_some_and(theme::is_directory_listing);

    if listing {
        println!("{}", theme.format_listing(&entry.output));
    } else {
        println!("{}", entry.output);
    }
}

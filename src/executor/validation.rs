use anyhow::Result;
use regex::{Regex, RegexBuilder};

const BLOCKED_COMMANDS: &[&str] = &["rm -rf /", "rmdir /s /q c:", "del /f /s /q"];

const DANGER_PATTERNS: &[&str] = &[
    r"rm\s+-rf\s+[/\\]",
    r"rmdir\s+/s\s+/q\s+[c-z]:",
    r"(^|[\s;&|])format(\s|$)",
    r"format\s+[c-z]:",
    r"del\s+/[fqs]+\s+[/\\]",
];

pub const BLOCKED_MESSAGE: &str =
    "Command blocked for safety reasons. Please use a less destructive alternative.";

/// Refuses destructive command lines before they reach a shell.
#[derive(Debug)]
pub struct CommandValidator {
    blocked: Vec<String>,
    patterns: Vec<Regex>,
}

impl CommandValidator {
    /// `extra` entries are matched as case-insensitive substrings, like the built-in list.
    pub fn new(extra: &[String]) -> Result<Self> {
        let blocked = BLOCKED_COMMANDS
            .iter()
            .map(|s| s.to_string())
            .chain(
                extra
                    .iter()
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty()),
            )
            .collect();

        let patterns = DANGER_PATTERNS
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { blocked, patterns })
    }

    pub fn is_dangerous(&self, command: &str) -> bool {
        let lowered = command.to_lowercase();

        if let Some(entry) = self.blocked.iter().find(|b| lowered.contains(b.as_str())) {
            tracing::warn!(command, entry = entry.as_str(), "blocked command");
            return true;
        }

        if let Some(pattern) = self.patterns.iter().find(|p| p.is_match(&lowered)) {
            tracing::warn!(command, pattern = pattern.as_str(), "blocked command");
            return true;
        }

        false
    }
}

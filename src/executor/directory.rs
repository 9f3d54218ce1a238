use directories::BaseDirs;
use std::path::{Component, Path, PathBuf};

/// Commands that act on the session's working directory instead of a child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCommand {
    Show,
    Change(String),
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryOutcome {
    pub message: String,
    pub success: bool,
    pub new_dir: Option<PathBuf>,
}

/// Characters that make a line something only the shell can run.
const CONTROL_CHARS: &[char] = &[';', '&', '|', '<', '>', '`', '\n'];

impl DirectoryCommand {
    /// Only a bare `cd [target]` is handled in-process. Chained, redirected or
    /// unparsable lines go to the shell untouched.
    pub fn parse(command: &str) -> Option<Self> {
        if command.contains(CONTROL_CHARS) || command.contains("$(") {
            return None;
        }

        // Backslash is a path separator on Windows, not an escape.
        let command = if cfg!(windows) {
            command.replace('\\', "/")
        } else {
            command.to_string()
        };

        let tokens = shell_words::split(&command).ok()?;
        let (base, rest) = tokens.split_first()?;
        let base = base.to_lowercase();

        match (base.as_str(), rest) {
            ("cd" | "chdir", []) => Some(Self::Show),
            ("cd" | "chdir", [target]) => Some(Self::Change(target.clone())),
            ("pushd" | "popd", _) => Some(Self::Unsupported(base)),
            _ => None,
        }
    }

    pub fn apply(&self, cwd: &Path) -> DirectoryOutcome {
        match self {
            Self::Show => DirectoryOutcome {
                message: cwd.display().to_string(),
                success: true,
                new_dir: None,
            },
            Self::Change(target) => {
                let new_dir = normalize(&resolve_target(cwd, target));

                if new_dir.is_dir() {
                    DirectoryOutcome {
                        message: format!("Changed directory to: {}", new_dir.display()),
                        success: true,
                        new_dir: Some(new_dir),
                    }
                } else {
                    DirectoryOutcome {
                        message: format!("The system cannot find the path specified: {}", target),
                        success: false,
                        new_dir: None,
                    }
                }
            }
            Self::Unsupported(name) => DirectoryOutcome {
                message: format!("Command {} not fully implemented.", name),
                success: false,
                new_dir: None,
            },
        }
    }
}

fn resolve_target(cwd: &Path, target: &str) -> PathBuf {
    if target == "~" || target.starts_with("~/") {
        if let Some(dirs) = BaseDirs::new() {
            let rest = target.trim_start_matches('~').trim_start_matches('/');
            return dirs.home_dir().join(rest);
        }
    }

    let path = Path::new(target);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Lexical normalisation: folds `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

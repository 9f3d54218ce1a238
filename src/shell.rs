use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    PowerShell,
    Cmd,
}

impl ShellType {
    pub fn detect() -> Self {
        if cfg!(windows) {
            // PSModulePath is only populated inside PowerShell sessions
            if let Ok(module_path) = env::var("PSModulePath") {
                if !module_path.is_empty() {
                    return ShellType::PowerShell;
                }
            }
            ShellType::Cmd
        } else {
            ShellType::Bash
        }
    }

    /// Program and leading arguments; the command line is appended as the last argument.
    pub fn get_shell_command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            ShellType::Bash => {
                if which::which("bash").is_ok() {
                    ("bash", &["-c"])
                } else {
                    ("sh", &["-c"])
                }
            }
            ShellType::PowerShell => ("powershell", &["-NoProfile", "-Command"]),
            ShellType::Cmd => ("cmd", &["/C"]),
        }
    }

    pub fn get_shell_name(&self) -> &'static str {
        match self {
            ShellType::Bash => "Bash",
            ShellType::PowerShell => "PowerShell",
            ShellType::Cmd => "Command Prompt",
        }
    }
}

/// Human readable operating system name for prompts.
pub fn os_name() -> &'static str {
    match env::consts::OS {
        "windows" => "Windows",
        "macos" => "macOS",
        "linux" => "Linux",
        other => other,
    }
}

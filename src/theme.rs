pub use colored::{Color, Colorize};

use crate::config::ThemeName;

#[derive(Debug, Clone, Default)]
pub struct ColorScheme {
    pub foreground: Option<Color>,
    pub bold: bool,
}

const fn rgb(r: u8, g: u8, b: u8) -> Option<Color> {
    Some(Color::TrueColor { r, g, b })
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub prompt: ColorScheme,
    pub ai_prompt: ColorScheme,
    pub info: ColorScheme,
    pub suggestion: ColorScheme,
    pub error: ColorScheme,
    pub directory: ColorScheme,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            prompt: ColorScheme {
                foreground: rgb(220, 220, 240),
                bold: false,
            },
            ai_prompt: ColorScheme {
                foreground: rgb(0x89, 0xD2, 0x87),
                bold: true,
            },
            info: ColorScheme {
                foreground: rgb(0x6E, 0x9E, 0xFF),
                bold: false,
            },
            suggestion: ColorScheme {
                foreground: rgb(0x6E, 0xDD, 0xDD),
                bold: false,
            },
            error: ColorScheme {
                foreground: rgb(0xFF, 0x6E, 0x6E),
                bold: false,
            },
            directory: ColorScheme {
                foreground: rgb(0x80, 0xBF, 0xFF),
                bold: true,
            },
        }
    }
}

impl Theme {
    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::default(),
            ThemeName::Light => Self::light(),
            ThemeName::Monochrome => Self::monochrome(),
        }
    }

    pub fn light() -> Self {
        let plain = |color: Color, bold: bool| ColorScheme {
            foreground: Some(color),
            bold,
        };
        Self {
            prompt: plain(Color::Black, false),
            ai_prompt: plain(Color::Green, true),
            info: plain(Color::Blue, false),
            suggestion: plain(Color::Cyan, false),
            error: plain(Color::Red, false),
            directory: plain(Color::Blue, true),
        }
    }

    pub fn monochrome() -> Self {
        let bold = ColorScheme {
            foreground: None,
            bold: true,
        };
        Self {
            prompt: ColorScheme::default(),
            ai_prompt: bold.clone(),
            info: ColorScheme::default(),
            suggestion: ColorScheme::default(),
            error: bold.clone(),
            directory: bold,
        }
    }

    /// Highlights `<DIR>` markers in Windows style directory listings.
    pub fn format_listing(&self, output: &str) -> String {
        output
            .lines()
            .map(|line| match line.split_once("<DIR>") {
                Some((before, after)) => {
                    format!("{}{}{}", before, self.directory.apply("<DIR>"), after)
                }
                None => line.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ColorScheme {
    pub fn apply(&self, text: &str) -> colored::ColoredString {
        let mut colored_text: colored::ColoredString = text.into();

        if let Some(fg) = &self.foreground {
            colored_text = colored_text.color(*fg);
        }
        if self.bold {
            colored_text = colored_text.bold();
        }

        colored_text
    }
}

/// True for `dir`/`ls` invocations whose output gets listing formatting.
pub fn is_directory_listing(command: &str) -> bool {
    let command = command.trim().to_lowercase();
    command == "dir" || command == "ls" || command.starts_with("dir ") || command.starts_with("ls ")
}

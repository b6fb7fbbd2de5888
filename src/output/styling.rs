use console::{Style, StyledObject};

/// Styling helpers for terminal output.
///
/// Everything written by the channel lands on stderr, so colors follow the
/// stderr terminal detection rather than stdout's.
pub fn muted_style() -> Style {
    Style::new().dim().for_stderr()
}

pub fn grey(text: impl std::fmt::Display) -> StyledObject<String> {
    Style::new().black().bright().for_stderr().apply_to(text.to_string())
}

pub fn bold(text: impl std::fmt::Display) -> StyledObject<String> {
    Style::new().bold().for_stderr().apply_to(text.to_string())
}

pub fn yellow(text: impl std::fmt::Display) -> StyledObject<String> {
    Style::new().yellow().for_stderr().apply_to(text.to_string())
}

pub fn bold_yellow(text: impl std::fmt::Display) -> StyledObject<String> {
    Style::new()
        .bold()
        .yellow()
        .for_stderr()
        .apply_to(text.to_string())
}

pub fn red(text: impl std::fmt::Display) -> StyledObject<String> {
    Style::new().red().for_stderr().apply_to(text.to_string())
}

pub fn cyan(text: impl std::fmt::Display) -> StyledObject<String> {
    Style::new().cyan().for_stderr().apply_to(text.to_string())
}

pub fn link_style() -> Style {
    Style::new().cyan().underlined().for_stderr()
}

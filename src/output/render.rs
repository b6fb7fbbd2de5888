//! Box and hyperlink rendering.
//!
//! Both helpers return plain strings; writing them out is the channel's job.

use console::{measure_text_width, Color, Style};

use super::styling::link_style;

/// Spacing between the border and the boxed text, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl Padding {
    pub const fn new(top: usize, bottom: usize, left: usize, right: usize) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BorderStyle {
    #[default]
    Single,
    Round,
    Double,
    Bold,
}

struct BorderChars {
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    horizontal: char,
    vertical: char,
}

impl BorderStyle {
    fn chars(self) -> BorderChars {
        let (top_left, top_right, bottom_left, bottom_right, horizontal, vertical) = match self {
            Self::Single => ('┌', '┐', '└', '┘', '─', '│'),
            Self::Round => ('╭', '╮', '╰', '╯', '─', '│'),
            Self::Double => ('╔', '╗', '╚', '╝', '═', '║'),
            Self::Bold => ('┏', '┓', '┗', '┛', '━', '┃'),
        };
        BorderChars {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
            horizontal,
            vertical,
        }
    }
}

/// Styling for bordered boxes, as used by warnings.
///
/// Callers override individual fields on top of [`BoxOptions::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxOptions {
    pub padding: Padding,
    pub border_color: Option<Color>,
    pub border_style: BorderStyle,
}

impl Default for BoxOptions {
    fn default() -> Self {
        Self {
            padding: Padding::new(0, 0, 1, 1),
            border_color: Some(Color::Yellow),
            border_style: BorderStyle::Single,
        }
    }
}

/// Draws a border around `text`.
///
/// Line widths are measured without ANSI styling or hyperlink escapes so
/// styled content lines up. The result has no trailing newline.
pub fn render_box(text: &str, options: &BoxOptions) -> String {
    let chars = options.border_style.chars();
    let border = match options.border_color {
        Some(color) => Style::new().fg(color).for_stderr(),
        None => Style::new().for_stderr(),
    };

    let lines: Vec<&str> = text.lines().collect();
    let content_width = lines
        .iter()
        .map(|line| visible_width(line))
        .max()
        .unwrap_or(0);
    let inner_width = options.padding.left + content_width + options.padding.right;

    let horizontal = chars.horizontal.to_string().repeat(inner_width);
    let vertical = border.apply_to(chars.vertical).to_string();
    let blank = format!("{vertical}{}{vertical}", " ".repeat(inner_width));

    let mut rows = Vec::with_capacity(lines.len() + options.padding.top + options.padding.bottom + 2);
    rows.push(
        border
            .apply_to(format!("{}{horizontal}{}", chars.top_left, chars.top_right))
            .to_string(),
    );
    rows.extend(std::iter::repeat(blank.clone()).take(options.padding.top));
    for line in &lines {
        rows.push(format!(
            "{vertical}{}{}{}{vertical}",
            " ".repeat(options.padding.left),
            pad_visible(line, content_width),
            " ".repeat(options.padding.right),
        ));
    }
    rows.extend(std::iter::repeat(blank).take(options.padding.bottom));
    rows.push(
        border
            .apply_to(format!("{}{horizontal}{}", chars.bottom_left, chars.bottom_right))
            .to_string(),
    );

    rows.join("\n")
}

/// Removes OSC 8 hyperlink wrappers, keeping the link text.
///
/// Accepts both the `ESC \\` and `BEL` terminators.
fn strip_hyperlinks(text: &str) -> std::borrow::Cow<'_, str> {
    if !text.contains("\x1b]8;") {
        return std::borrow::Cow::Borrowed(text);
    }

    let mut stripped = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("\x1b]8;") {
        stripped.push_str(&rest[..start]);
        let sequence = &rest[start..];
        let end = match (sequence.find("\x1b\\"), sequence.find('\x07')) {
            (Some(st), Some(bel)) if bel < st => bel + 1,
            (Some(st), _) => st + 2,
            (None, Some(bel)) => bel + 1,
            (None, None) => sequence.len(),
        };
        rest = &sequence[end..];
    }
    stripped.push_str(rest);
    std::borrow::Cow::Owned(stripped)
}

/// Display width of `text`, ignoring styling and hyperlink escapes.
pub fn visible_width(text: &str) -> usize {
    measure_text_width(&strip_hyperlinks(text))
}

fn pad_visible(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(visible_width(text));
    format!("{text}{}", " ".repeat(fill))
}

/// Renders a URL for the terminal.
///
/// With `hyperlinks` the URL is wrapped in an OSC 8 sequence so terminals make
/// it clickable; either way the visible text is the URL itself.
pub fn render_link(url: &str, hyperlinks: bool) -> String {
    let visible = link_style().apply_to(url);
    if hyperlinks {
        format!("\x1b]8;;{url}\x1b\\{visible}\x1b]8;;\x1b\\")
    } else {
        visible.to_string()
    }
}

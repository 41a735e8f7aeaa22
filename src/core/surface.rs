//! # Render Surfaces
//!
//! The typewriter writes into an abstract [`Surface`] with three operations:
//! append one visible character, append a line break, append a complete
//! markup tag. Surfaces decide what markup means.
//!
//! - [`MarkupBuffer`]: keeps the markup as a string (`<br>` for breaks).
//! - [`StyledText`]: interprets a small tag set into styled runs. The TUI
//!   draws these and the copy action reads [`StyledText::plain_text`].

/// A render target the typewriter can write into.
pub trait Surface {
    fn append_text(&mut self, ch: char);
    fn append_line_break(&mut self);
    /// `tag` is a whole tag including the angle brackets, e.g. `<strong>`.
    fn append_markup(&mut self, tag: &str);
}

/// Markup-string surface.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MarkupBuffer {
    content: String,
}

impl MarkupBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl Surface for MarkupBuffer {
    fn append_text(&mut self, ch: char) {
        self.content.push(ch);
    }

    fn append_line_break(&mut self) {
        self.content.push_str("<br>");
    }

    fn append_markup(&mut self, tag: &str) {
        self.content.push_str(tag);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
}

/// A stretch of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub style: TextStyle,
}

/// Styled lines built up by the typewriter (or all at once for user messages).
///
/// Recognized tags: `strong`/`b` (bold), `em`/`i` (italic), `br` (line
/// break). Unknown tags are dropped. Nesting is tracked with counters so an
/// unbalanced close tag can't underflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledText {
    lines: Vec<Vec<Run>>,
    bold_depth: u8,
    italic_depth: u8,
}

impl Default for StyledText {
    fn default() -> Self {
        Self::new()
    }
}

impl StyledText {
    pub fn new() -> Self {
        Self {
            lines: vec![Vec::new()],
            bold_depth: 0,
            italic_depth: 0,
        }
    }

    /// Unstyled text, `\n` becomes a line break. No markup is interpreted.
    pub fn plain(text: &str) -> Self {
        let mut styled = Self::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                styled.append_line_break();
            }
            line.chars().for_each(|c| styled.append_text(c));
        }
        styled
    }

    pub fn lines(&self) -> &[Vec<Run>] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// What a reader would select and copy: text only, lines joined by `\n`.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|runs| runs.iter().map(|r| r.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn current_style(&self) -> TextStyle {
        TextStyle {
            bold: self.bold_depth > 0,
            italic: self.italic_depth > 0,
        }
    }
}

impl Surface for StyledText {
    fn append_text(&mut self, ch: char) {
        let style = self.current_style();
        // lines is never empty: new() seeds one line and nothing removes lines
        let Some(line) = self.lines.last_mut() else {
            return;
        };
        match line.last_mut() {
            Some(run) if run.style == style => run.text.push(ch),
            _ => line.push(Run {
                text: ch.to_string(),
                style,
            }),
        }
    }

    fn append_line_break(&mut self) {
        self.lines.push(Vec::new());
    }

    fn append_markup(&mut self, tag: &str) {
        let inner = tag
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_end_matches('/')
            .trim();
        let name = inner
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();

        match name.as_str() {
            "strong" | "b" => self.bold_depth = self.bold_depth.saturating_add(1),
            "/strong" | "/b" => self.bold_depth = self.bold_depth.saturating_sub(1),
            "em" | "i" => self.italic_depth = self.italic_depth.saturating_add(1),
            "/em" | "/i" => self.italic_depth = self.italic_depth.saturating_sub(1),
            "br" => self.append_line_break(),
            other => log::debug!("Ignoring unsupported markup tag: {other}"),
        }
    }
}

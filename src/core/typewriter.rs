//! # Typewriter
//!
//! Progressive rendering as an explicit step function. A [`Typewriter`] is an
//! iterator that yields one [`Emission`] per tick; the session schedules a
//! `Timer::TypewriterStep` between emissions, so pacing is driven by whatever
//! clock feeds `Action::Tick`.
//!
//! ```text
//! "Hi **you**\n\nok"
//!        │ expand_bold
//!        ▼
//! "Hi <strong>you</strong>\n\nok"
//!        │ Typewriter::next()
//!        ▼
//! H · i · ␠ · <strong> · y · o · u · </strong> · ⏎ · ⏎ · o · k
//! ```
//!
//! A tag is buffered until its `>` and emitted as a single unit, so a
//! surface never sees half a tag. Only `<` followed by a letter or `/` opens
//! a tag; a `<` with no `>` before the end of its line is plain text.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::surface::Surface;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));

/// Rewrites every `**inner**` span to `<strong>inner</strong>`.
///
/// Matching is non-greedy and does not cross line breaks.
pub fn expand_bold(text: &str) -> String {
    BOLD.replace_all(text, "<strong>$1</strong>").into_owned()
}

/// One unit of progressive output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    Text(char),
    Markup(String),
    LineBreak,
}

impl Emission {
    pub fn apply_to<S: Surface + ?Sized>(&self, surface: &mut S) {
        match self {
            Emission::Text(c) => surface.append_text(*c),
            Emission::Markup(tag) => surface.append_markup(tag),
            Emission::LineBreak => surface.append_line_break(),
        }
    }
}

/// Step-by-step renderer over preprocessed text.
#[derive(Debug, Clone)]
pub struct Typewriter {
    chars: Vec<char>,
    pos: usize,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        Self {
            chars: expand_bold(text).chars().collect(),
            pos: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Length of the tag starting at `self.pos`, including both brackets.
    fn tag_len(&self) -> Option<usize> {
        let rest = &self.chars[self.pos..];
        let opens_tag = rest
            .get(1)
            .is_some_and(|c| c.is_ascii_alphabetic() || *c == '/');
        if !opens_tag {
            return None;
        }
        let end = rest.iter().position(|&c| c == '>' || c == '\n')?;
        (rest[end] == '>').then_some(end + 1)
    }
}

impl Iterator for Typewriter {
    type Item = Emission;

    fn next(&mut self) -> Option<Emission> {
        let c = *self.chars.get(self.pos)?;
        match c {
            '\n' => {
                self.pos += 1;
                Some(Emission::LineBreak)
            }
            '<' => match self.tag_len() {
                Some(len) => {
                    let tag: String = self.chars[self.pos..self.pos + len].iter().collect();
                    self.pos += len;
                    Some(Emission::Markup(tag))
                }
                None => {
                    self.pos += 1;
                    Some(Emission::Text('<'))
                }
            },
            c => {
                self.pos += 1;
                Some(Emission::Text(c))
            }
        }
    }
}

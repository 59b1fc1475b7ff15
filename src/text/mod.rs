//! Physical line metrics for languages with textual comment syntax
//!
//! The text is consumed character by character. Outside any context every
//! handler is asked whether a context opens; inside one, only the open
//! handler decides when it closes. Comment text is kept per line so the
//! [`CodeRecognizer`] can flag commented-out code.

mod handlers;

pub use handlers::{
    match_end_of_string, ContextKind, LineContextHandler, LiteralValueHandler,
    MultiLineCommentHandler, SingleLineCommentHandler,
};

use crate::metrics::Metric;
use crate::recognizer::CodeRecognizer;
use serde::Serialize;

/// How the comment part of a line was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentClass {
    /// Only markers or whitespace
    Blank,
    Text,
    /// Body recognised as code
    Code,
}

/// One physical line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub number: u32,
    pub has_code: bool,
    pub comment: Option<CommentClass>,
    /// Text outside comments, literals included
    #[serde(skip)]
    pub code: String,
    /// Text outside comments and literals
    #[serde(skip)]
    pub bare_code: String,
}

impl Line {
    pub fn is_blank(&self) -> bool {
        !self.has_code && self.comment.is_none()
    }
}

/// Line totals of one source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineCounts {
    pub lines: u32,
    pub blank_lines: u32,
    pub lines_of_code: u32,
    pub comment_lines: u32,
    pub comment_blank_lines: u32,
    pub commented_out_code_lines: u32,
}

impl LineCounts {
    /// Counts paired with the metric each one feeds
    pub fn as_metrics(&self) -> [(Metric, u32); 6] {
        [
            (Metric::Lines, self.lines),
            (Metric::BlankLines, self.blank_lines),
            (Metric::LinesOfCode, self.lines_of_code),
            (Metric::CommentLines, self.comment_lines),
            (Metric::CommentBlankLines, self.comment_blank_lines),
            (Metric::CommentedOutCodeLines, self.commented_out_code_lines),
        ]
    }
}

/// Classified lines of one text
#[derive(Debug, Clone, Serialize)]
pub struct Source {
    lines: Vec<Line>,
}

struct OpenContext {
    handler: usize,
    text: String,
}

impl Source {
    pub fn from_text(
        text: &str,
        handlers: &[Box<dyn LineContextHandler>],
        recognizer: &CodeRecognizer,
    ) -> Self {
        let mut lines = Vec::new();
        let mut open: Option<OpenContext> = None;

        for (i, raw) in text.lines().enumerate() {
            let mut outside = String::new();
            let mut bare = String::new();
            let mut comment = String::new();
            let mut touched_comment = open
                .as_ref()
                .is_some_and(|ctx| handlers[ctx.handler].kind() == ContextKind::Comment);

            for c in raw.chars() {
                if let Some(ctx) = open.as_mut() {
                    let handler = &handlers[ctx.handler];
                    ctx.text.push(c);
                    match handler.kind() {
                        ContextKind::Comment => comment.push(c),
                        ContextKind::Literal => outside.push(c),
                    }
                    if handler.match_to_end(&ctx.text) {
                        open = None;
                    }
                    continue;
                }

                outside.push(c);
                bare.push(c);
                if let Some((idx, handler)) = handlers
                    .iter()
                    .enumerate()
                    .find(|(_, h)| h.match_to_begin(&outside))
                {
                    let marker = outside.split_off(outside.len() - handler.begin_marker().len());
                    bare.truncate(bare.len() - marker.len());
                    match handler.kind() {
                        ContextKind::Comment => {
                            touched_comment = true;
                            comment.push_str(&marker);
                        }
                        ContextKind::Literal => outside.push_str(&marker),
                    }
                    open = Some(OpenContext {
                        handler: idx,
                        text: marker,
                    });
                }
            }

            if let Some(ctx) = open.as_mut() {
                if handlers[ctx.handler].match_with_end_of_line(&ctx.text) {
                    open = None;
                } else {
                    ctx.text.push('\n');
                }
            }

            let comment = touched_comment.then(|| {
                let body = comment_body(&comment, handlers);
                if body.is_empty() {
                    CommentClass::Blank
                } else if recognizer.is_line_of_code(body) {
                    CommentClass::Code
                } else {
                    CommentClass::Text
                }
            });

            lines.push(Line {
                number: i as u32 + 1,
                has_code: outside.chars().any(|c| !c.is_whitespace()),
                comment,
                code: outside,
                bare_code: bare,
            });
        }

        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Non-comment text of every line that has code
    pub fn code_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|line| line.has_code)
            .map(|line| line.code.as_str())
    }

    /// Like [`code_lines`](Self::code_lines) with literal regions removed
    pub fn bare_code_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|line| line.has_code)
            .map(|line| line.bare_code.as_str())
    }

    pub fn line(&self, number: u32) -> Option<&Line> {
        number
            .checked_sub(1)
            .and_then(|i| self.lines.get(i as usize))
    }

    pub fn counts(&self) -> LineCounts {
        let mut counts = LineCounts {
            lines: self.lines.len() as u32,
            ..LineCounts::default()
        };
        for line in &self.lines {
            if line.has_code {
                counts.lines_of_code += 1;
            }
            match line.comment {
                Some(CommentClass::Blank) => counts.comment_blank_lines += 1,
                Some(CommentClass::Text) => counts.comment_lines += 1,
                Some(CommentClass::Code) => counts.commented_out_code_lines += 1,
                None if line.is_blank() => counts.blank_lines += 1,
                None => {}
            }
        }
        counts
    }
}

/// Comment text of a line without markers or leading decoration
fn comment_body<'a>(comment: &'a str, handlers: &[Box<dyn LineContextHandler>]) -> &'a str {
    let mut body = comment.trim();
    for handler in handlers.iter().filter(|h| h.kind() == ContextKind::Comment) {
        if let Some(end) = handler.end_marker() {
            body = body.strip_suffix(end).unwrap_or(body).trim_end();
        }
    }
    let decoration = |c: char| {
        handlers
            .iter()
            .filter(|h| h.kind() == ContextKind::Comment)
            .any(|h| h.begin_marker().contains(c))
    };
    body.trim_start_matches(decoration).trim()
}

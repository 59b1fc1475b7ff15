//! Line context handlers: comments and literals

/// What a context contributes to a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Comment,
    /// Literal text counts as code
    Literal,
}

/// Recognises one kind of region (comment, string literal) while a line is consumed
/// character by character.
pub trait LineContextHandler: Send + Sync {
    fn kind(&self) -> ContextKind;

    /// Text that opens the context
    fn begin_marker(&self) -> &str;

    /// Text that closes the context, if any
    fn end_marker(&self) -> Option<&str> {
        None
    }

    /// `pending` holds what was consumed outside any context on the current
    /// line. True when the context opens at its end.
    fn match_to_begin(&self, pending: &str) -> bool {
        match_end_of_string(pending, self.begin_marker())
    }

    /// `context` holds everything consumed since the context opened,
    /// begin marker included. True when the context closes at its end.
    fn match_to_end(&self, context: &str) -> bool;

    /// Called at the end of each line while the context is open. True when
    /// the line break closes it.
    fn match_with_end_of_line(&self, context: &str) -> bool;
}

/// True when `pending` ends with `end`
pub fn match_end_of_string(pending: &str, end: &str) -> bool {
    !end.is_empty() && pending.ends_with(end)
}

/// `// ...` or `# ...`
#[derive(Debug, Clone)]
pub struct SingleLineCommentHandler {
    start: String,
}

impl SingleLineCommentHandler {
    pub fn new(start: &str) -> Self {
        Self {
            start: start.to_string(),
        }
    }
}

impl LineContextHandler for SingleLineCommentHandler {
    fn kind(&self) -> ContextKind {
        ContextKind::Comment
    }

    fn begin_marker(&self) -> &str {
        &self.start
    }

    fn match_to_end(&self, _context: &str) -> bool {
        false
    }

    fn match_with_end_of_line(&self, _context: &str) -> bool {
        true
    }
}

/// `/* ... */`, possibly spanning lines
#[derive(Debug, Clone)]
pub struct MultiLineCommentHandler {
    start: String,
    end: String,
}

impl MultiLineCommentHandler {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

impl LineContextHandler for MultiLineCommentHandler {
    fn kind(&self) -> ContextKind {
        ContextKind::Comment
    }

    fn begin_marker(&self) -> &str {
        &self.start
    }

    fn end_marker(&self) -> Option<&str> {
        Some(&self.end)
    }

    fn match_to_end(&self, context: &str) -> bool {
        // "/*/" must not close itself
        context.len() >= self.start.len() + self.end.len() && match_end_of_string(context, &self.end)
    }

    fn match_with_end_of_line(&self, _context: &str) -> bool {
        false
    }
}

/// String or character literal delimited by the same marker on both ends.
/// A delimiter preceded by an odd number of backslashes is escaped.
#[derive(Debug, Clone)]
pub struct LiteralValueHandler {
    delimiter: String,
}

impl LiteralValueHandler {
    pub fn new(delimiter: &str) -> Self {
        Self {
            delimiter: delimiter.to_string(),
        }
    }
}

impl LineContextHandler for LiteralValueHandler {
    fn kind(&self) -> ContextKind {
        ContextKind::Literal
    }

    fn begin_marker(&self) -> &str {
        &self.delimiter
    }

    fn end_marker(&self) -> Option<&str> {
        Some(&self.delimiter)
    }

    fn match_to_end(&self, context: &str) -> bool {
        if context.len() < self.delimiter.len() * 2 || !match_end_of_string(context, &self.delimiter) {
            return false;
        }
        let body = &context[..context.len() - self.delimiter.len()];
        let backslashes = body.chars().rev().take_while(|c| *c == '\\').count();
        backslashes % 2 == 0
    }

    /// Unterminated literals stop at the line break
    fn match_with_end_of_line(&self, _context: &str) -> bool {
        true
    }
}

//! Built-in text parser
//!
//! The "syntax tree" produced here is the file text tagged with its
//! language. That is enough for the line and complexity visitors; hosts with
//! real grammars plug their own [`AstParser`] into the scanner instead.

use crate::error::ParseError;
use crate::recognizer::{CFamilyFootprint, CodeRecognizer, PythonFootprint};
use crate::scanner::AstParser;
use crate::text::{LineContextHandler, LiteralValueHandler, MultiLineCommentHandler, SingleLineCommentHandler};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Languages the text parser understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    CSharp,
    Go,
    Java,
    JavaScript,
    TypeScript,
    Rust,
    Python,
}

/// File extensions handled by [`TextParser`]
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "c", "h", // C
    "cpp", "cc", "cxx", "hpp", "hh", "hxx", // C++
    "cs",   // C#
    "go",   // Go
    "java", // Java
    "js", "jsx", "mjs", "cjs", // JavaScript
    "ts", "tsx", // TypeScript
    "rs",  // Rust
    "py", "pyi", // Python
];

impl Language {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "c" | "h" => Some(Language::C),
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Some(Language::Cpp),
            "cs" => Some(Language::CSharp),
            "go" => Some(Language::Go),
            "java" => Some(Language::Java),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "tsx" => Some(Language::TypeScript),
            "rs" => Some(Language::Rust),
            "py" | "pyi" => Some(Language::Python),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Go => "Go",
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Rust => "Rust",
            Language::Python => "Python",
        }
    }

    /// Comment and literal syntax, in matching priority order
    pub fn context_handlers(&self) -> Vec<Box<dyn LineContextHandler>> {
        match self {
            Language::Python => vec![
                Box::new(SingleLineCommentHandler::new("#")),
                Box::new(LiteralValueHandler::new("\"")),
                Box::new(LiteralValueHandler::new("'")),
            ],
            // 'a is a lifetime, not a literal
            Language::Rust => vec![
                Box::new(SingleLineCommentHandler::new("//")),
                Box::new(MultiLineCommentHandler::new("/*", "*/")),
                Box::new(LiteralValueHandler::new("\"")),
            ],
            _ => vec![
                Box::new(SingleLineCommentHandler::new("//")),
                Box::new(MultiLineCommentHandler::new("/*", "*/")),
                Box::new(LiteralValueHandler::new("\"")),
                Box::new(LiteralValueHandler::new("'")),
            ],
        }
    }

    pub fn recognizer(&self, threshold: f64) -> CodeRecognizer {
        match self {
            Language::Python => CodeRecognizer::new(threshold, PythonFootprint::new()),
            _ => CodeRecognizer::new(threshold, CFamilyFootprint::new()),
        }
    }

    /// Keywords that open a decision point
    pub fn branch_keywords(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["if", "elif", "for", "while", "except", "and", "or", "case"],
            Language::Go => &["if", "for", "case", "select"],
            Language::Rust => &["if", "for", "while", "loop", "match"],
            _ => &["if", "for", "while", "case", "catch"],
        }
    }

    /// Operators that add a decision point
    pub fn branch_operators(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &[],
            Language::Rust | Language::Go => &["&&", "||"],
            _ => &["&&", "||", "?"],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A file's text and language
#[derive(Debug, Clone)]
pub struct SourceText {
    pub path: PathBuf,
    pub language: Language,
    pub text: String,
}

/// Reads files as UTF-8 text
#[derive(Debug, Default, Clone)]
pub struct TextParser {
    root: Option<PathBuf>,
}

impl TextParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root` when reading
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Tag already-loaded text, for callers that do not read from disk
    pub fn parse_text(path: &Path, text: impl Into<String>) -> Result<SourceText, ParseError> {
        let language = Language::from_path(path)
            .ok_or_else(|| ParseError::new(format!("unsupported file type: {}", path.display())))?;
        Ok(SourceText {
            path: path.to_path_buf(),
            language,
            text: text.into(),
        })
    }
}

impl AstParser for TextParser {
    type Ast = SourceText;

    fn parse(&mut self, path: &Path) -> Result<SourceText, ParseError> {
        let text = match &self.root {
            Some(root) => std::fs::read_to_string(root.join(path))?,
            None => std::fs::read_to_string(path)?,
        };
        Self::parse_text(path, text)
    }
}

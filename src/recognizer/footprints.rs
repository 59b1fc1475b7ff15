//! Footprints for the languages the text parser knows about

use super::detectors::{CamelCaseDetector, ContainsDetector, EndWithDetector, KeywordsDetector, RegexDetector};
use super::{Detector, LanguageFootprint};

const C_FAMILY_KEYWORDS: &[&str] = &[
    "abstract", "auto", "bool", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "delete", "do", "double", "else", "enum", "extends", "extern",
    "final", "finally", "float", "fn", "for", "func", "function", "goto", "if", "impl",
    "implements", "import", "instanceof", "int", "interface", "let", "long", "match", "mut", "namespace",
    "new", "null", "package", "private", "protected", "pub", "public", "return", "short", "signed",
    "sizeof", "static", "struct", "super", "switch", "template", "this", "throw", "throws", "try",
    "typedef", "typeof", "union", "unsigned", "use", "var", "void", "volatile", "while",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "False", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "None", "nonlocal", "not", "or", "pass", "raise", "return", "True", "try", "while",
    "with", "yield",
];

/// C, C++, Java, C#, JavaScript/TypeScript, Go and Rust
pub struct CFamilyFootprint {
    detectors: Vec<Box<dyn Detector>>,
}

impl CFamilyFootprint {
    pub fn new() -> Self {
        Self {
            detectors: vec![
                Box::new(EndWithDetector::new(0.95, &['}', ';', '{'])),
                Box::new(KeywordsDetector::new(0.7, &["||", "&&"])),
                Box::new(KeywordsDetector::new(0.3, C_FAMILY_KEYWORDS)),
                Box::new(ContainsDetector::new(
                    0.95,
                    &["++", "for(", "if(", "while(", "catch(", "switch(", "try{", "else{"],
                )),
                Box::new(CamelCaseDetector::new(0.5)),
            ],
        }
    }
}

impl Default for CFamilyFootprint {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageFootprint for CFamilyFootprint {
    fn detectors(&self) -> &[Box<dyn Detector>] {
        &self.detectors
    }
}

/// Python
pub struct PythonFootprint {
    detectors: Vec<Box<dyn Detector>>,
}

impl PythonFootprint {
    pub fn new() -> Self {
        Self {
            detectors: vec![
                Box::new(EndWithDetector::new(0.95, &[':', ')', ']'])),
                Box::new(KeywordsDetector::new(0.3, PYTHON_KEYWORDS)),
                Box::new(ContainsDetector::new(0.95, &["self.", "+=", "-=", "==", "!=", "__"])),
                Box::new(
                    RegexDetector::new(0.95, r"^\s*(def|class)\s+\w+").expect("valid regex"),
                ),
                Box::new(
                    RegexDetector::new(0.7, r"^\s*(import|from)\s+[\w.]+").expect("valid regex"),
                ),
            ],
        }
    }
}

impl Default for PythonFootprint {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageFootprint for PythonFootprint {
    fn detectors(&self) -> &[Box<dyn Detector>] {
        &self.detectors
    }
}

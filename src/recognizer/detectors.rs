//! Built-in line feature detectors

use super::Detector;
use regex::Regex;

/// Characters that separate keyword tokens
const TOKEN_DELIMITERS: &[char] = &['(', ')', ',', '{', '}', ';', '[', ']', '.', ':'];

/// Matches once when the trimmed line ends with one of the given characters
#[derive(Debug, Clone)]
pub struct EndWithDetector {
    probability: f64,
    endings: Vec<char>,
}

impl EndWithDetector {
    pub fn new(probability: f64, endings: &[char]) -> Self {
        Self {
            probability,
            endings: endings.to_vec(),
        }
    }
}

impl Detector for EndWithDetector {
    fn probability(&self) -> f64 {
        self.probability
    }

    fn scan(&self, line: &str) -> usize {
        match line.trim_end().chars().last() {
            Some(last) if self.endings.contains(&last) => 1,
            _ => 0,
        }
    }
}

/// Counts tokens equal to one of the keywords
#[derive(Debug, Clone)]
pub struct KeywordsDetector {
    probability: f64,
    keywords: Vec<String>,
    case_insensitive: bool,
}

impl KeywordsDetector {
    pub fn new(probability: f64, keywords: &[&str]) -> Self {
        Self {
            probability,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            case_insensitive: false,
        }
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self.keywords = self.keywords.iter().map(|k| k.to_lowercase()).collect();
        self
    }
}

impl Detector for KeywordsDetector {
    fn probability(&self) -> f64 {
        self.probability
    }

    fn scan(&self, line: &str) -> usize {
        line.split(|c: char| c.is_whitespace() || TOKEN_DELIMITERS.contains(&c))
            .filter(|token| !token.is_empty())
            .filter(|token| {
                if self.case_insensitive {
                    self.keywords.contains(&token.to_lowercase())
                } else {
                    self.keywords.iter().any(|k| k == token)
                }
            })
            .count()
    }
}

/// Counts occurrences of fragments in the line with whitespace stripped
#[derive(Debug, Clone)]
pub struct ContainsDetector {
    probability: f64,
    needles: Vec<String>,
}

impl ContainsDetector {
    pub fn new(probability: f64, needles: &[&str]) -> Self {
        Self {
            probability,
            needles: needles
                .iter()
                .map(|n| n.chars().filter(|c| !c.is_whitespace()).collect())
                .collect(),
        }
    }
}

impl Detector for ContainsDetector {
    fn probability(&self) -> f64 {
        self.probability
    }

    fn scan(&self, line: &str) -> usize {
        let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        self.needles
            .iter()
            .filter(|needle| !needle.is_empty())
            .map(|needle| compact.matches(needle.as_str()).count())
            .sum()
    }
}

/// Matches once when a lowercase letter is directly followed by an uppercase one
#[derive(Debug, Clone)]
pub struct CamelCaseDetector {
    probability: f64,
}

impl CamelCaseDetector {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }
}

impl Detector for CamelCaseDetector {
    fn probability(&self) -> f64 {
        self.probability
    }

    fn scan(&self, line: &str) -> usize {
        let mut previous_lower = false;
        for c in line.chars() {
            if previous_lower && c.is_uppercase() {
                return 1;
            }
            previous_lower = c.is_lowercase();
        }
        0
    }
}

/// Counts non-overlapping matches of a regular expression
#[derive(Debug, Clone)]
pub struct RegexDetector {
    probability: f64,
    pattern: Regex,
}

impl RegexDetector {
    pub fn new(probability: f64, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            probability,
            pattern: Regex::new(pattern)?,
        })
    }
}

impl Detector for RegexDetector {
    fn probability(&self) -> f64 {
        self.probability
    }

    fn scan(&self, line: &str) -> usize {
        self.pattern.find_iter(line).count()
    }
}

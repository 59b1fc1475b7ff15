//! `codeweave classify`: score lines with the code recognizer

use anyhow::{bail, Context, Result};
use codeweave::parsers::Language;
use console::style;
use std::io::Read;
use std::path::Path;

pub fn run(file: Option<&Path>, language: Option<&str>, threshold: f64, code_only: bool) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let language = resolve_language(file, language)?;
    let recognizer = language.recognizer(threshold);

    if code_only {
        for line in recognizer.extract_code_lines(text.lines()) {
            println!("{}", line);
        }
        return Ok(());
    }

    for (i, line) in text.lines().enumerate() {
        let probability = recognizer.recognition(line);
        let verdict = if recognizer.is_line_of_code(line) {
            style("code ").green()
        } else {
            style("prose").dim()
        };
        println!(
            "{:>5} {:.3} {} {}",
            style(i + 1).dim(),
            probability,
            verdict,
            line
        );
    }
    Ok(())
}

/// `--language` wins, then the file extension, then C
fn resolve_language(file: Option<&Path>, language: Option<&str>) -> Result<Language> {
    if let Some(ext) = language {
        return match Language::from_extension(ext.trim_start_matches('.')) {
            Some(lang) => Ok(lang),
            None => bail!("Unknown language extension: {}", ext),
        };
    }
    Ok(file.and_then(Language::from_path).unwrap_or(Language::C))
}

use std::error::Error;
use std::io::IsTerminal;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use regex::Regex;

use super::MfiError;

/// Formats MfiError for CLI output
pub struct ErrorFormatter {
    verbose: bool,
    use_color: bool,
}

impl ErrorFormatter {
    /// Creates a new ErrorFormatter with default TTY detection
    pub fn new(verbose: bool) -> Self {
        Self::with_color_detection(verbose, Self::default_should_use_color)
    }

    /// Creates a new ErrorFormatter with injectable TTY detection for testing
    pub fn with_color_detection(verbose: bool, detect_color: fn() -> bool) -> Self {
        let use_color = detect_color();
        Self { verbose, use_color }
    }

    fn default_should_use_color() -> bool {
        std::io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err()
    }

    /// Formats the error for display
    ///
    /// The first line is `error[CODE]: message`. Aggregate errors keep one
    /// indented line per failed manifest below it.
    pub fn format(&self, error: &MfiError) -> String {
        let mut output = format!("error[{}]: {}", error.code().as_str(), error);

        if self.verbose {
            output.push_str("\n  |");
            output.push_str(&format!("\n  | Cause: {}", error.code().cause()));

            let chain = Self::format_source_chain(error);
            if !chain.is_empty() {
                output.push_str("\n  |");
                output.push_str(&format!("\n  | Source chain:\n{}", chain));
            }
        }

        let masked = Self::mask_query_params(&output);

        if self.use_color {
            Self::apply_color(&masked)
        } else {
            masked
        }
    }

    fn format_source_chain(error: &MfiError) -> String {
        let mut chain = Vec::new();
        let mut current: Option<&(dyn Error + 'static)> = error.source();

        while let Some(err) = current {
            chain.push(format!("  |   - {}", err));
            current = err.source();
        }

        chain.join("\n")
    }

    /// Masks query parameter values of URLs: ?foo=xxx&bar=yyy -> ?foo=***&bar=***
    fn mask_query_params(text: &str) -> String {
        static QUERY_RE: OnceLock<Option<Regex>> = OnceLock::new();
        let re = QUERY_RE.get_or_init(|| Regex::new(r"([?&])([^=&\s]+)=([^&\s]+)").ok());
        match re {
            Some(re) => re.replace_all(text, "$1$2=***").to_string(),
            None => text.to_string(),
        }
    }

    fn apply_color(text: &str) -> String {
        let mut result = String::new();

        for line in text.lines() {
            if !result.is_empty() {
                result.push('\n');
            }

            if line.starts_with("error[") {
                let bracket_end = line.find(']').map(|i| i + 1).unwrap_or(0);
                let (prefix, rest) = line.split_at(bracket_end);
                result.push_str(&format!("{}{}", prefix.red().bold(), rest.bold()));
            } else if line.starts_with("  | Cause:") {
                result.push_str(&line.yellow().to_string());
            } else if line.starts_with("  |   -") {
                result.push_str(&line.dimmed().to_string());
            } else {
                result.push_str(line);
            }
        }

        result
    }
}

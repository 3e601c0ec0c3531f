//! Placeholder substitution for query templates.
//!
//! Templates reference values as `${name}`. Only the keys below are known;
//! anything else is copied through untouched.

use synth_core::TimeRange;

pub const TIME_LEFT_BORDER: &str = "time_left_border";
pub const TIME_RIGHT_BORDER: &str = "time_right_border";
pub const FILTER_BLOCK: &str = "filter_block";
pub const FILTER_AND_BLOCK: &str = "filter_and_block";
pub const FILTER_OR_BLOCK: &str = "filter_or_block";

const OPEN: &str = "${";
const CLOSE: char = '}';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("Query template is empty")]
    EmptyTemplate,
}

/// Values substituted into every template of one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    left: String,
    right: String,
    filter_block: String,
    filter_and_block: String,
    filter_or_block: String,
}

impl Placeholders {
    pub fn new(range: &TimeRange, filter: Option<&str>) -> Self {
        let (filter_block, filter_and_block, filter_or_block) = match filter {
            Some(f) => (format!("({f})"), format!("AND ({f})"), format!("OR ({f})")),
            None => (String::new(), String::new(), String::new()),
        };
        Self {
            left: range.left().to_string(),
            right: range.right().to_string(),
            filter_block,
            filter_and_block,
            filter_or_block,
        }
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            TIME_LEFT_BORDER => Some(self.left.as_str()),
            TIME_RIGHT_BORDER => Some(self.right.as_str()),
            FILTER_BLOCK => Some(self.filter_block.as_str()),
            FILTER_AND_BLOCK => Some(self.filter_and_block.as_str()),
            FILTER_OR_BLOCK => Some(self.filter_or_block.as_str()),
            _ => None,
        }
    }

    /// Substitute known placeholders in `template`.
    pub fn render(&self, template: &str) -> Result<String, TemplateError> {
        if template.trim().is_empty() {
            return Err(TemplateError::EmptyTemplate);
        }

        let mut output = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find(OPEN) {
            output.push_str(&rest[..start]);
            let after_open = &rest[start + OPEN.len()..];

            let Some(end) = after_open.find(CLOSE) else {
                // Unterminated: keep the remainder as is
                output.push_str(&rest[start..]);
                return Ok(output);
            };

            let key = &after_open[..end];
            match self.lookup(key) {
                Some(value) => output.push_str(value),
                None => {
                    output.push_str(OPEN);
                    output.push_str(key);
                    output.push(CLOSE);
                }
            }
            rest = &after_open[end + 1..];
        }

        output.push_str(rest);
        Ok(output)
    }
}

/// Render a single template.
pub fn render(
    template: &str,
    range: &TimeRange,
    filter: Option<&str>,
) -> Result<String, TemplateError> {
    Placeholders::new(range, filter).render(template)
}

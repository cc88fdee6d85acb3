//! `{{ path }}` resolution

use crate::env::Environment;
use crate::escape::escape;
use crate::parser::{scan, Directive};

use super::splice;

/// Replace every `{{ path }}` tag with its escaped value
///
/// Unresolved paths render as the empty string.
pub fn interpolate(text: &str, env: &Environment) -> String {
    substitute(text, env, |value| value)
}

/// Splice `emit(escaped value)` over every interpolation tag in `text`
fn substitute(text: &str, env: &Environment, mut emit: impl FnMut(String) -> String) -> String {
    let replacements: Vec<_> = scan(text)
        .into_iter()
        .filter_map(|d| match &d.node {
            Directive::Interpolate { path } => {
                let value = env.lookup(path).map(|v| v.to_text()).unwrap_or_default();
                Some((d.span, emit(escape(&value))))
            }
            _ => None,
        })
        .collect();

    if replacements.is_empty() {
        return text.to_string();
    }
    splice(text, replacements)
}

// Private-use code points delimiting a slot reference
const SLOT_OPEN: char = '\u{E000}';
const SLOT_CLOSE: char = '\u{E001}';

/// Interpolated values for one render, kept out of the scanned text
#[derive(Debug, Default)]
pub(super) struct Slots {
    values: Vec<String>,
}

impl Slots {
    /// Interpolate `text`, leaving a placeholder for each non-empty value
    pub(super) fn interpolate(&mut self, text: &str, env: &Environment) -> String {
        substitute(text, env, |value| self.hold(value))
    }

    fn hold(&mut self, value: String) -> String {
        if value.is_empty() {
            return value;
        }
        self.values.push(value);
        format!("{}{}{}", SLOT_OPEN, self.values.len() - 1, SLOT_CLOSE)
    }

    /// Replace placeholders with their values; restored values are not rescanned
    pub(super) fn restore(&self, text: &str) -> String {
        if self.values.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find(SLOT_OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + SLOT_OPEN.len_utf8()..];
            let slot = after.find(SLOT_CLOSE).and_then(|end| {
                let index: usize = after[..end].parse().ok()?;
                Some((self.values.get(index)?, end))
            });
            match slot {
                Some((value, end)) => {
                    out.push_str(value);
                    rest = &after[end + SLOT_CLOSE.len_utf8()..];
                }
                None => {
                    out.push(SLOT_OPEN);
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

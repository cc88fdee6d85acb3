//! Render driver: resolves every directive in a template
//!
//! Each call runs a fixed pipeline over the text:
//!
//! 1. includes are fetched and rendered in place
//! 2. `for` loops are expanded, one recursive render per iteration
//! 3. `{{ path }}` tags are resolved and escaped into value slots
//! 4. `if` chains are evaluated and the winning branch rendered in place
//! 5. stray branch markers are stripped and lines are trimmed
//!
//! Loop bodies, winning branches and included content re-enter the pipeline
//! with their own environment, so a render is a recursive walk bounded by
//! [`RenderConfig::max_depth`].
//!
//! Interpolated values never re-enter the text that later phases scan. Each
//! one is held in a `Slots` table and the text carries a placeholder; the
//! placeholders are filled in once, after the outermost frame finishes. A
//! value that looks like `{% endif %}` therefore stays literal text.

mod conditionals;
mod includes;
mod interpolate;
mod loops;

pub use interpolate::interpolate;

use interpolate::Slots;

use crate::config::RenderConfig;
use crate::env::Environment;
use crate::parser::{scan, Directive, Span};
use crate::source::TemplateSource;

/// Renders templates against a source of includable content
///
/// Holds no per-render state; every call gets its environment explicitly.
pub struct Renderer<'a> {
    source: &'a dyn TemplateSource,
    config: &'a RenderConfig,
}

impl<'a> Renderer<'a> {
    pub fn new(source: &'a dyn TemplateSource, config: &'a RenderConfig) -> Self {
        Self { source, config }
    }

    /// Render `template` against `env`
    pub fn render(&self, template: &str, env: &Environment) -> String {
        let mut slots = Slots::default();
        let text = self.render_frame(template, env, 0, &mut slots);
        slots.restore(&text)
    }

    fn render_frame(
        &self,
        template: &str,
        env: &Environment,
        depth: usize,
        slots: &mut Slots,
    ) -> String {
        if depth > self.config.max_depth {
            tracing::warn!(
                max_depth = self.config.max_depth,
                "render depth exceeded; leaving nested content unrendered"
            );
            return template.to_string();
        }

        let text = self.expand_includes(template, env, depth, slots);
        let text = self.expand_loops(text, env, depth, slots);
        let text = slots.interpolate(&text, env);
        let text = self.expand_conditionals(text, env, depth, slots);
        cleanup(&text)
    }
}

/// Replace byte ranges of `text`; ranges must be ascending and disjoint
fn splice(text: &str, replacements: Vec<(Span, String)>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (span, replacement) in replacements {
        out.push_str(&text[cursor..span.start]);
        out.push_str(&replacement);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Strip orphaned branch markers, trim every line and drop blank lines
fn cleanup(text: &str) -> String {
    let orphans: Vec<(Span, String)> = scan(text)
        .into_iter()
        .filter(|d| {
            matches!(
                d.node,
                Directive::ElseIf { .. } | Directive::Else | Directive::EndIf
            )
        })
        .map(|d| (d.span, String::new()))
        .collect();

    let text = if orphans.is_empty() {
        text.to_string()
    } else {
        splice(text, orphans)
    };

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

//! `{% for item in path %}` expansion

use crate::env::Environment;
use crate::parser::{find_blocks, scan, BlockKind, Directive};
use crate::value::Value;

use super::{splice, Renderer, Slots};

impl Renderer<'_> {
    /// Expand loops until a pass changes nothing or the pass cap is hit
    ///
    /// Loops over values that are neither Sequences nor Mappings stay in the
    /// text untouched.
    pub(super) fn expand_loops(
        &self,
        mut text: String,
        env: &Environment,
        depth: usize,
        slots: &mut Slots,
    ) -> String {
        for _ in 0..self.config.pass_cap {
            let directives = scan(&text);
            let mut replacements = Vec::new();

            for block in find_blocks(&directives, BlockKind::Loop) {
                let Directive::For { item, path } = &directives[block.open].node else {
                    continue;
                };
                let body = &text[block.body(&directives)];
                if let Some(expanded) = self.expand_loop(item, path, body, env, depth, slots) {
                    replacements.push((block.span(&directives), expanded));
                }
            }

            if replacements.is_empty() {
                return text;
            }
            text = splice(&text, replacements);
        }

        tracing::debug!(
            pass_cap = self.config.pass_cap,
            "loop pass cap reached; remaining loops left as text"
        );
        text
    }

    /// Render `body` once per entry of the collection at `path`
    fn expand_loop(
        &self,
        item: &str,
        path: &str,
        body: &str,
        env: &Environment,
        depth: usize,
        slots: &mut Slots,
    ) -> Option<String> {
        let entries: Vec<&Value> = match env.lookup(path) {
            Some(Value::Sequence(items)) => items.iter().collect(),
            Some(Value::Mapping(map)) => map.values().collect(),
            other => {
                tracing::debug!(path, found = ?other, "loop target is not iterable");
                return None;
            }
        };

        let len = entries.len();
        let rendered = entries
            .into_iter()
            .enumerate()
            .map(|(position, value)| {
                let scope = env.iteration(item, path, value, position, len);
                self.render_frame(body, &scope, depth + 1, slots)
            })
            .collect();
        Some(rendered)
    }
}

//! `{% if %}` / `{% elseif %}` / `{% else %}` / `{% endif %}` expansion

use crate::env::Environment;
use crate::eval::evaluate;
use crate::parser::{find_blocks, scan, Block, BlockKind, Directive, Spanned};

use super::{splice, Renderer, Slots};

/// One branch of an if-chain; `condition` is `None` for `else`
#[derive(Debug, Clone, PartialEq)]
struct Branch<'t> {
    condition: Option<&'t str>,
    body: &'t str,
}

/// Split a balanced if-block into its branches, in source order
///
/// Anything after the first `else` is unreachable and dropped.
fn branches<'t>(text: &'t str, directives: &'t [Spanned<Directive>], block: &Block) -> Vec<Branch<'t>> {
    let mut bounds: Vec<usize> = Vec::with_capacity(block.markers.len() + 2);
    bounds.push(block.open);
    bounds.extend(&block.markers);
    bounds.push(block.close);

    let mut out = Vec::new();
    for pair in bounds.windows(2) {
        let (head, next) = (&directives[pair[0]], &directives[pair[1]]);
        let body = &text[head.span.end..next.span.start];
        match &head.node {
            Directive::If { condition } | Directive::ElseIf { condition } => out.push(Branch {
                condition: Some(condition.as_str()),
                body,
            }),
            Directive::Else => {
                out.push(Branch {
                    condition: None,
                    body,
                });
                break;
            }
            _ => {}
        }
    }
    out
}

impl Renderer<'_> {
    /// Expand if-chains until the text stops changing or the pass cap is hit
    pub(super) fn expand_conditionals(
        &self,
        mut text: String,
        env: &Environment,
        depth: usize,
        slots: &mut Slots,
    ) -> String {
        for _ in 0..self.config.pass_cap {
            let directives = scan(&text);
            let blocks = find_blocks(&directives, BlockKind::Conditional);
            if blocks.is_empty() {
                return text;
            }

            let replacements: Vec<_> = blocks
                .iter()
                .map(|block| {
                    let winner = branches(&text, &directives, block)
                        .into_iter()
                        .find(|b| b.condition.map_or(true, |c| evaluate(c, env)))
                        .map_or("", |b| b.body);
                    let rendered = self.render_frame(winner.trim(), env, depth + 1, slots);
                    (block.span(&directives), rendered.trim().to_string())
                })
                .collect();

            let next = splice(&text, replacements);
            if next == text {
                return text;
            }
            text = next;
        }

        tracing::debug!(
            pass_cap = self.config.pass_cap,
            "conditional pass cap reached; remaining conditionals left as text"
        );
        text
    }
}

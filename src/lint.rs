//! Static checks for template text
//!
//! Rendering is total: malformed directives are left as text, unmatched
//! markers are stripped and bad conditions are false. [`lint`] reports those
//! cases up front so authors can see what the engine will silently do.

use crate::error::Diagnostic;
use crate::parser::{parse_condition, scan, Directive, Spanned};

/// Report malformed and unbalanced directives in `template`
///
/// Diagnostics come back ordered by position.
pub fn lint(template: &str) -> Vec<Diagnostic> {
    let directives = scan(template);
    let mut diagnostics = Vec::new();

    check_malformed(template, &directives, &mut diagnostics);
    check_blocks(&directives, &mut diagnostics);
    check_conditions(template, &directives, &mut diagnostics);

    diagnostics.sort_by_key(|d| (d.span.start, d.span.end));
    diagnostics
}

fn check_malformed(template: &str, directives: &[Spanned<Directive>], out: &mut Vec<Diagnostic>) {
    for d in directives {
        if d.node != Directive::Malformed {
            continue;
        }
        let text = &template[d.span.clone()];
        let diag = if text.starts_with("{{") {
            Diagnostic::new(d.span.clone(), "unrecognized expression is left as text")
                .with_help("expected `{{ path }}` or `{{ inc('name') }}`")
        } else {
            Diagnostic::new(d.span.clone(), "unrecognized statement is left as text").with_help(
                "expected for/endfor, if/elseif/else/endif",
            )
        };
        out.push(diag);
    }
}

/// Pair openers with closers on one stack shared by loops and conditionals
///
/// Rendering matches each family on its own, so a closer that crosses an
/// open block of the other family splits that block in the output.
fn check_blocks(directives: &[Spanned<Directive>], out: &mut Vec<Diagnostic>) {
    // (opener, saw_else)
    let mut open: Vec<(&Spanned<Directive>, bool)> = Vec::new();
    for d in directives {
        match &d.node {
            Directive::For { .. } | Directive::If { .. } => open.push((d, false)),
            Directive::EndFor | Directive::EndIf => {
                let opener = if d.node == Directive::EndFor { "for" } else { "if" };
                match open.iter().rposition(|(o, _)| o.node.keyword() == opener) {
                    None => {
                        let help = if opener == "for" {
                            "it is left in the output as text"
                        } else {
                            "it is stripped from the output"
                        };
                        out.push(
                            Diagnostic::new(
                                d.span.clone(),
                                format!("`{}` without a matching `{}`", d.node.keyword(), opener),
                            )
                            .with_help(help),
                        );
                    }
                    Some(i) => {
                        if let Some((inner, _)) = open.get(i + 1) {
                            out.push(crossing(d, opener, inner));
                        }
                        open.remove(i);
                    }
                }
            }
            Directive::ElseIf { .. } | Directive::Else => {
                let Some(i) = open
                    .iter()
                    .rposition(|(o, _)| matches!(o.node, Directive::If { .. }))
                else {
                    out.push(
                        Diagnostic::new(
                            d.span.clone(),
                            format!("`{}` outside of an `if` block", d.node.keyword()),
                        )
                        .with_help("it is stripped from the output"),
                    );
                    continue;
                };

                if let Some((inner, _)) = open.get(i + 1) {
                    out.push(crossing(d, "if", inner));
                } else if open[i].1 {
                    out.push(Diagnostic::new(
                        d.span.clone(),
                        format!("`{}` after `else` is unreachable", d.node.keyword()),
                    ));
                }
                if d.node == Directive::Else {
                    open[i].1 = true;
                }
            }
            _ => {}
        }
    }

    for (d, _) in open {
        let diag = match d.node {
            Directive::For { .. } => Diagnostic::new(d.span.clone(), "`for` is never closed")
                .with_help("add `{% endfor %}`; the loop is left unexpanded"),
            _ => Diagnostic::new(d.span.clone(), "`if` is never closed")
                .with_help("add `{% endif %}`; the block is left unexpanded"),
        };
        out.push(diag);
    }
}

/// `d` belongs to an `opener` block outside the still-open `inner` block
fn crossing(d: &Spanned<Directive>, opener: &str, inner: &Spanned<Directive>) -> Diagnostic {
    Diagnostic::new(
        d.span.clone(),
        format!(
            "`{}` belongs to an `{}` outside the open `{}`",
            d.node.keyword(),
            opener,
            inner.node.keyword()
        ),
    )
    .with_help(format!(
        "close the inner `{}` first; blocks must nest",
        inner.node.keyword()
    ))
}

fn check_conditions(template: &str, directives: &[Spanned<Directive>], out: &mut Vec<Diagnostic>) {
    for d in directives {
        let condition = match &d.node {
            Directive::If { condition } | Directive::ElseIf { condition } => condition,
            _ => continue,
        };
        let Err(errors) = parse_condition(condition) else {
            continue;
        };

        // map the condition-relative span back into the template
        let base = template[d.span.clone()]
            .find(condition.as_str())
            .map_or(d.span.start, |offset| d.span.start + offset);
        for err in errors {
            let start = (base + err.span.start).min(d.span.end);
            let end = (base + err.span.end).clamp(start, d.span.end);
            out.push(
                Diagnostic::new(start..end, format!("invalid condition: {}", err.message))
                    .with_help("this condition always evaluates to false"),
            );
        }
    }
}

//! Directive discovery over the chunk stream
//!
//! [`scan`] turns template text into a flat list of spanned directives.
//! [`find_blocks`] pairs openers with their balanced closers so that loop and
//! conditional expansion always see complete, correctly nested spans.

use std::collections::HashSet;

use crate::parser::ast::{Directive, Span, Spanned};
use crate::parser::lexer::{chunks, is_path, tokenize, Chunk, Token};

/// Scan template text into spanned directives, in order
pub fn scan(text: &str) -> Vec<Spanned<Directive>> {
    chunks(text)
        .map(|(chunk, span)| {
            let directive = match chunk {
                Chunk::Text | Chunk::Brace => Directive::Text,
                Chunk::Output => classify_output(&text[span.start + 2..span.end - 2]),
                Chunk::Tag => classify_tag(&text[span.start + 2..span.end - 2]),
            };
            Spanned::new(directive, span)
        })
        .collect()
}

fn classify_output(inner: &str) -> Directive {
    let Ok(tokens) = tokenize(inner) else {
        return Directive::Malformed;
    };
    let tokens: Vec<Token> = tokens.into_iter().map(|(t, _)| t).collect();

    match tokens.as_slice() {
        [Token::Word(path)] if is_path(path) => Directive::Interpolate { path: path.clone() },
        [Token::Word(func), Token::ParenOpen, Token::Str(name), Token::ParenClose]
            if func == "inc" && !name.is_empty() && !name.contains(['\'', '"']) =>
        {
            Directive::Include { name: name.clone() }
        }
        _ => Directive::Malformed,
    }
}

fn classify_tag(inner: &str) -> Directive {
    let inner = inner.trim();
    let (keyword, rest) = match inner.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (inner, ""),
    };

    match (keyword, rest.is_empty()) {
        ("for", false) => classify_for(rest),
        ("endfor", true) => Directive::EndFor,
        ("if", false) => Directive::If {
            condition: rest.to_string(),
        },
        ("elseif", _) => Directive::ElseIf {
            condition: rest.to_string(),
        },
        ("else", true) => Directive::Else,
        ("endif", true) => Directive::EndIf,
        _ => Directive::Malformed,
    }
}

fn classify_for(rest: &str) -> Directive {
    let Ok(tokens) = tokenize(rest) else {
        return Directive::Malformed;
    };
    let tokens: Vec<Token> = tokens.into_iter().map(|(t, _)| t).collect();

    match tokens.as_slice() {
        [Token::Word(item), Token::Word(kw), Token::Word(path)]
            if kw == "in" && !item.contains('.') && is_path(path) =>
        {
            Directive::For {
                item: item.clone(),
                path: path.clone(),
            }
        }
        _ => Directive::Malformed,
    }
}

/// Which opener/closer family to match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// `for` ... `endfor`
    Loop,
    /// `if` ... `elseif`/`else` ... `endif`
    Conditional,
}

impl BlockKind {
    fn opens(self, d: &Directive) -> bool {
        match self {
            BlockKind::Loop => matches!(d, Directive::For { .. }),
            BlockKind::Conditional => matches!(d, Directive::If { .. }),
        }
    }

    fn closes(self, d: &Directive) -> bool {
        match self {
            BlockKind::Loop => matches!(d, Directive::EndFor),
            BlockKind::Conditional => matches!(d, Directive::EndIf),
        }
    }

    fn splits(self, d: &Directive) -> bool {
        self == BlockKind::Conditional && matches!(d, Directive::ElseIf { .. } | Directive::Else)
    }
}

/// A balanced top-level block, as indices into a directive list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Index of the opening directive
    pub open: usize,
    /// Index of the matching closing directive
    pub close: usize,
    /// Branch markers (`elseif`/`else`) belonging to this block, in order
    pub markers: Vec<usize>,
}

impl Block {
    /// Byte range from the start of the opener to the end of the closer
    pub fn span(&self, directives: &[Spanned<Directive>]) -> Span {
        directives[self.open].span.start..directives[self.close].span.end
    }

    /// Byte range strictly between the opener and the closer
    pub fn body(&self, directives: &[Spanned<Directive>]) -> Span {
        directives[self.open].span.end..directives[self.close].span.start
    }
}

/// Find the outermost balanced blocks of `kind`, left to right
///
/// Closers without an opener are ignored. Openers that never close are
/// treated as plain text and matching is retried without them, so one
/// unterminated tag does not hide the complete blocks around it.
pub fn find_blocks(directives: &[Spanned<Directive>], kind: BlockKind) -> Vec<Block> {
    let mut unterminated: HashSet<usize> = HashSet::new();

    loop {
        let mut stack: Vec<usize> = Vec::new();
        let mut markers = Vec::new();
        let mut blocks = Vec::new();

        for (i, d) in directives.iter().enumerate() {
            if unterminated.contains(&i) {
                continue;
            }
            if kind.opens(&d.node) {
                stack.push(i);
            } else if kind.closes(&d.node) {
                if let Some(open) = stack.pop() {
                    if stack.is_empty() {
                        blocks.push(Block {
                            open,
                            close: i,
                            markers: std::mem::take(&mut markers),
                        });
                    }
                }
            } else if stack.len() == 1 && kind.splits(&d.node) {
                markers.push(i);
            }
        }

        if stack.is_empty() {
            return blocks;
        }
        unterminated.extend(stack);
    }
}

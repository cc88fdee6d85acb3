//! Syntax types for template directives and conditions

use crate::value::{parse_numeric, Value};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A node paired with its byte range in the text it was scanned from
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// One piece of scanned template text
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Literal text
    Text,
    /// A `{{ ... }}` or `{% ... %}` tag that is not a known directive; kept literally
    Malformed,
    /// `{{ path }}`
    Interpolate { path: String },
    /// `{{ inc('name') }}`
    Include { name: String },
    /// `{% for item in path %}`
    For { item: String, path: String },
    /// `{% endfor %}`
    EndFor,
    /// `{% if condition %}`
    If { condition: String },
    /// `{% elseif condition %}`
    ElseIf { condition: String },
    /// `{% else %}`
    Else,
    /// `{% endif %}`
    EndIf,
}

impl Directive {
    /// Short name used in diagnostics
    pub fn keyword(&self) -> &'static str {
        match self {
            Directive::Text => "text",
            Directive::Malformed => "tag",
            Directive::Interpolate { .. } => "interpolation",
            Directive::Include { .. } => "inc",
            Directive::For { .. } => "for",
            Directive::EndFor => "endfor",
            Directive::If { .. } => "if",
            Directive::ElseIf { .. } => "elseif",
            Directive::Else => "else",
            Directive::EndIf => "endif",
        }
    }
}

/// Comparison operators usable in conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `===`
    StrictEq,
    /// `==`
    LooseEq,
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `>=`
    GreaterOrEqual,
    /// `<=`
    LessOrEqual,
}

/// Literal on either side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Quoted string or bare word
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Literal {
    /// Interpret an unquoted word: `true`/`false`, a number, or bare text
    pub fn from_word(word: &str) -> Self {
        match word {
            "true" => Literal::Bool(true),
            "false" => Literal::Bool(false),
            _ => match parse_numeric(word) {
                Some(n) => Literal::Number(n),
                None => Literal::Text(word.to_string()),
            },
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Literal::Text(s) => Value::String(s.clone()),
            Literal::Number(n) => Value::Number(*n),
            Literal::Bool(b) => Value::Boolean(*b),
        }
    }
}

/// Something a condition can test: a variable path or a constant
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Path(String),
    Literal(Literal),
}

impl Operand {
    /// Numbers and `true`/`false` are constants; any other word is a path
    pub fn from_word(word: &str) -> Self {
        match Literal::from_word(word) {
            Literal::Text(path) => Operand::Path(path),
            literal => Operand::Literal(literal),
        }
    }
}

/// The test inside an atom
#[derive(Debug, Clone, PartialEq)]
pub enum Test {
    Comparison {
        left: Operand,
        op: CompareOp,
        right: Literal,
    },
    Truthiness(Operand),
}

/// `['!'] test`
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub negated: bool,
    pub test: Test,
}

/// Atoms joined by `&&`
#[derive(Debug, Clone, PartialEq)]
pub struct Conjunction(pub Vec<Atom>);

/// Conjunctions joined by `||`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition(pub Vec<Conjunction>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_from_word() {
        assert_eq!(Literal::from_word("true"), Literal::Bool(true));
        assert_eq!(Literal::from_word("false"), Literal::Bool(false));
        assert_eq!(Literal::from_word("2.5"), Literal::Number(2.5));
        assert_eq!(
            Literal::from_word("active"),
            Literal::Text("active".to_string())
        );
    }

    #[test]
    fn test_operand_from_word() {
        assert_eq!(
            Operand::from_word("user.age"),
            Operand::Path("user.age".to_string())
        );
        assert_eq!(
            Operand::from_word("5"),
            Operand::Literal(Literal::Number(5.0))
        );
        assert_eq!(
            Operand::from_word("false"),
            Operand::Literal(Literal::Bool(false))
        );
    }
}

//! Condition parser using chumsky
//!
//! ```text
//! condition   := conjunction ('||' conjunction)*
//! conjunction := atom ('&&' atom)*
//! atom        := ['!'] operand [operator literal]
//! ```

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::{tokenize, Token};
use crate::value::parse_numeric;

/// A condition that could not be lexed or parsed
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionError {
    /// Byte range within the condition text
    pub span: Span,
    pub message: String,
}

impl std::fmt::Display for ConditionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {:?}", self.message, self.span)
    }
}

/// Parse the text of an `if`/`elseif` condition
pub fn parse_condition(input: &str) -> Result<Condition, Vec<ConditionError>> {
    let len = input.len();

    let tokens = tokenize(input).map_err(|span| {
        vec![ConditionError {
            message: format!("unexpected character '{}'", &input[span.clone()]),
            span,
        }]
    })?;

    let token_iter = tokens.into_iter().map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    condition_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(convert_error).collect())
}

fn convert_error(err: Rich<'_, Token>) -> ConditionError {
    let message = match err.found() {
        Some(tok) => format!("unexpected {}", describe_token(tok)),
        None => "unexpected end of condition".to_string(),
    };
    ConditionError {
        span: err.span().into_range(),
        message,
    }
}

/// Format a token for human-readable error messages
fn describe_token(tok: &Token) -> String {
    match tok {
        Token::Word(w) => format!("word '{}'", w),
        Token::Str(s) => format!("string '{}'", s),
        Token::StrictEq => "'==='".to_string(),
        Token::LooseEq => "'=='".to_string(),
        Token::GreaterOrEqual => "'>='".to_string(),
        Token::LessOrEqual => "'<='".to_string(),
        Token::Greater => "'>'".to_string(),
        Token::Less => "'<'".to_string(),
        Token::And => "'&&'".to_string(),
        Token::Or => "'||'".to_string(),
        Token::Bang => "'!'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::ParenOpen => "'(' (grouping is not supported)".to_string(),
        Token::ParenClose => "')'".to_string(),
    }
}

fn condition_parser<'a, I>() -> impl Parser<'a, I, Condition, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let word = select! {
        Token::Word(w) => w,
    };

    // `-` followed by an unsigned number
    let negative = just(Token::Minus)
        .ignore_then(word.clone())
        .try_map(|w, span| match parse_numeric(&w) {
            Some(n) => Ok(-n),
            None => Err(Rich::custom(span, "expected a number after '-'")),
        });

    let literal = choice((
        select! { Token::Str(s) => Literal::Text(s) },
        negative.clone().map(Literal::Number),
        word.clone().map(|w| Literal::from_word(&w)),
    ));

    let operand = choice((
        select! { Token::Str(s) => Operand::Literal(Literal::Text(s)) },
        negative.map(|n| Operand::Literal(Literal::Number(n))),
        word.map(|w| Operand::from_word(&w)),
    ));

    let operator = select! {
        Token::StrictEq => CompareOp::StrictEq,
        Token::LooseEq => CompareOp::LooseEq,
        Token::Greater => CompareOp::Greater,
        Token::Less => CompareOp::Less,
        Token::GreaterOrEqual => CompareOp::GreaterOrEqual,
        Token::LessOrEqual => CompareOp::LessOrEqual,
    };

    let test = operand
        .then(operator.then(literal).or_not())
        .map(|(left, comparison)| match comparison {
            Some((op, right)) => Test::Comparison { left, op, right },
            None => Test::Truthiness(left),
        });

    let atom = just(Token::Bang)
        .or_not()
        .then(test)
        .map(|(bang, test)| Atom {
            negated: bang.is_some(),
            test,
        });

    let conjunction = atom
        .separated_by(just(Token::And))
        .at_least(1)
        .collect::<Vec<_>>()
        .map(Conjunction);

    conjunction
        .separated_by(just(Token::Or))
        .at_least(1)
        .collect::<Vec<_>>()
        .map(Condition)
        .then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> Operand {
        Operand::Path(p.to_string())
    }

    fn single(condition: &Condition) -> &Test {
        assert_eq!(condition.0.len(), 1);
        assert_eq!(condition.0[0].0.len(), 1);
        &condition.0[0].0[0].test
    }

    #[test]
    fn test_parse_truthiness() {
        let c = parse_condition("user.active").expect("Should parse");
        assert_eq!(single(&c), &Test::Truthiness(path("user.active")));
    }

    #[test]
    fn test_parse_comparison() {
        let c = parse_condition("age >= 18").expect("Should parse");
        assert_eq!(
            single(&c),
            &Test::Comparison {
                left: path("age"),
                op: CompareOp::GreaterOrEqual,
                right: Literal::Number(18.0),
            }
        );
    }

    #[test]
    fn test_parse_quoted_operands() {
        let c = parse_condition(r#""5" > '3'"#).expect("Should parse");
        assert_eq!(
            single(&c),
            &Test::Comparison {
                left: Operand::Literal(Literal::Text("5".to_string())),
                op: CompareOp::Greater,
                right: Literal::Text("3".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_negative_literal() {
        let c = parse_condition("delta < -2").expect("Should parse");
        assert_eq!(
            single(&c),
            &Test::Comparison {
                left: path("delta"),
                op: CompareOp::Less,
                right: Literal::Number(-2.0),
            }
        );
    }

    #[test]
    fn test_parse_negation() {
        let c = parse_condition("!false").expect("Should parse");
        assert!(c.0[0].0[0].negated);
        assert_eq!(
            c.0[0].0[0].test,
            Test::Truthiness(Operand::Literal(Literal::Bool(false)))
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let c = parse_condition("a && b || c && !d || e").expect("Should parse");
        let shape: Vec<usize> = c.0.iter().map(|conj| conj.0.len()).collect();
        assert_eq!(shape, vec![2, 2, 1]);
        assert!(c.0[1].0[1].negated);
    }

    #[test]
    fn test_reject_parentheses() {
        let errs = parse_condition("(a || b) && c").unwrap_err();
        assert!(errs[0].message.contains("grouping"));
    }

    #[test]
    fn test_reject_unknown_operator() {
        assert!(parse_condition("a != b").is_err());
        assert!(parse_condition("a + 1 > 2").is_err());
    }

    #[test]
    fn test_reject_empty_and_dangling() {
        assert!(parse_condition("").is_err());
        assert!(parse_condition("a &&").is_err());
        assert!(parse_condition("a ==").is_err());
    }
}

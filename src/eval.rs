//! Condition evaluation against an environment

use crate::env::Environment;
use crate::parser::{parse_condition, Atom, CompareOp, Condition, Literal, Operand, Test};
use crate::value::Value;

/// Evaluate the text of an `if`/`elseif` condition
///
/// Conditions that fail to parse are false.
pub fn evaluate(condition: &str, env: &Environment) -> bool {
    match parse_condition(condition) {
        Ok(parsed) => parsed.evaluate(env),
        Err(errors) => {
            tracing::debug!(
                condition,
                error = %errors[0],
                "unparseable condition evaluates to false"
            );
            false
        }
    }
}

impl Condition {
    /// True when any conjunction has all of its atoms true
    pub fn evaluate(&self, env: &Environment) -> bool {
        self.0
            .iter()
            .any(|conj| conj.0.iter().all(|atom| atom.evaluate(env)))
    }
}

impl Atom {
    pub fn evaluate(&self, env: &Environment) -> bool {
        let result = match &self.test {
            Test::Truthiness(operand) => operand_value(operand, env).is_truthy(),
            Test::Comparison { left, op, right } => compare(&operand_value(left, env), *op, right),
        };
        result != self.negated
    }
}

fn operand_value(operand: &Operand, env: &Environment) -> Value {
    match operand {
        Operand::Path(path) => env.resolve(path),
        Operand::Literal(literal) => literal.to_value(),
    }
}

fn literal_number(literal: &Literal) -> Option<f64> {
    match literal {
        Literal::Number(n) => Some(*n),
        Literal::Text(s) => crate::value::parse_numeric(s),
        Literal::Bool(_) => None,
    }
}

/// Compare a resolved value with a literal
pub fn compare(left: &Value, op: CompareOp, right: &Literal) -> bool {
    if let (Some(l), Some(r)) = (left.as_number(), literal_number(right)) {
        return match op {
            CompareOp::StrictEq | CompareOp::LooseEq => l == r,
            CompareOp::Greater => l > r,
            CompareOp::Less => l < r,
            CompareOp::GreaterOrEqual => l >= r,
            CompareOp::LessOrEqual => l <= r,
        };
    }

    match op {
        CompareOp::StrictEq => strict_eq(left, right),
        CompareOp::LooseEq => loose_eq(left, right),
        // ordering needs numbers on both sides
        _ => false,
    }
}

fn strict_eq(left: &Value, right: &Literal) -> bool {
    match (left, right) {
        (Value::String(l), Literal::Text(r)) => l == r,
        (Value::Boolean(l), Literal::Bool(r)) => l == r,
        (Value::Number(l), Literal::Number(r)) => l == r,
        _ => false,
    }
}

fn loose_eq(left: &Value, right: &Literal) -> bool {
    match (left, right) {
        (_, Literal::Bool(r)) => left.is_truthy() == *r,
        (Value::Sequence(_) | Value::Mapping(_), _) => false,
        (Value::Boolean(l), Literal::Text(r)) => *l == Value::String(r.clone()).is_truthy(),
        (Value::Null | Value::Boolean(_), Literal::Number(r)) => left.is_truthy() == (*r != 0.0),
        (_, Literal::Text(r)) => left.to_text() == *r,
        (_, Literal::Number(r)) => left.to_text() == crate::value::format_number(*r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Environment {
        Environment::new()
            .with("x", "y")
            .with("z", 1)
            .with("a", 1)
            .with("b", 5)
            .with("five", "5")
            .with("name", "Ada")
            .with("flag", true)
            .with("off", false)
            .with("empty", "")
            .with("items", vec![1, 2])
            .with("none", Vec::<i32>::new())
    }

    fn check(condition: &str) -> bool {
        evaluate(condition, &env())
    }

    #[test]
    fn test_numeric_comparison_of_quoted_numbers() {
        assert!(check(r#""5" > "3""#));
        assert!(check("five > 3"));
        assert!(check("five == 5"));
        assert!(check("five === '5'"));
        assert!(check("b >= 5"));
        assert!(check("b <= 5"));
        assert!(!check("b < 5"));
        assert!(check("b > -1"));
    }

    #[test]
    fn test_non_numeric_ordering_is_false() {
        assert!(!check(r#""a" > "b""#));
        assert!(!check(r#""b" > "a""#));
        assert!(!check("name < 'Z'"));
        assert!(!check("missing >= 0"));
    }

    #[test]
    fn test_negation() {
        assert!(check("!false"));
        assert!(!check("!true"));
        assert!(check("!missing"));
        assert!(!check("!flag"));
        assert!(check("!name == 'Bob'"));
    }

    #[test]
    fn test_and_or() {
        assert!(check("x == 'y' && z == 1"));
        assert!(!check("x == 'y' && z == 2"));
        assert!(!check("x == 'n' && z == 1"));
        assert!(check("a==1 || b==2"));
        assert!(check("a==2 || b==5"));
        assert!(!check("a==2 || b==2"));
        assert!(check("a==2 && b==2 || flag"));
    }

    #[test]
    fn test_strict_equality() {
        assert!(check("name === 'Ada'"));
        assert!(check("flag === true"));
        assert!(!check("flag === 'true'"));
        assert!(!check("missing === ''"));
    }

    #[test]
    fn test_loose_equality() {
        assert!(check("name == Ada"));
        assert!(check("flag == true"));
        assert!(check("off == false"));
        assert!(check("missing == ''"));
        assert!(check("empty == false"));
        assert!(check("items == true"));
        assert!(!check("items == 'Array'"));
        assert!(check("missing == 0"));
    }

    #[test]
    fn test_truthiness() {
        assert!(check("name"));
        assert!(check("items"));
        assert!(!check("none"));
        assert!(!check("empty"));
        assert!(!check("off"));
        assert!(!check("missing"));
    }

    #[test]
    fn test_unparseable_condition_is_false() {
        assert!(!check("a != 1"));
        assert!(!check("(a == 1)"));
        assert!(!check(""));
    }
}

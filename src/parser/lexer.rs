//! Lexers for template text and directive contents using logos
//!
//! Lexing happens in two layers. [`Chunk`] splits raw template text into
//! output tags (`{{ ... }}`), statement tags (`{% ... %}`) and literal text.
//! [`Token`] then tokenizes the inside of a tag: paths, quoted strings and
//! the comparison and boolean operators used by conditions.

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Top-level pieces of template text
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk {
    /// `{{ ... }}`
    #[token("{{", |lex| close_with(lex, "}}"))]
    Output,

    /// `{% ... %}`
    #[token("{%", |lex| close_with(lex, "%}"))]
    Tag,

    #[regex(r"[^{]+")]
    Text,

    /// A brace that does not open a complete tag
    #[token("{")]
    Brace,
}

/// Tokens inside a tag
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Comparison operators (longer first)
    #[token("===")]
    StrictEq,
    #[token("==")]
    LooseEq,
    #[token(">=")]
    GreaterOrEqual,
    #[token("<=")]
    LessOrEqual,
    #[token(">")]
    Greater,
    #[token("<")]
    Less,

    // Boolean operators
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("!")]
    Bang,

    #[token("-")]
    Minus,

    // Delimiters
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,

    /// Paths, keywords, bare words and unsigned numbers
    #[regex(r"[a-zA-Z0-9_.]+", |lex| lex.slice().to_string(), priority = 1)]
    Word(String),

    #[regex(r#""[^"]*""#, unquote)]
    #[regex(r"'[^']*'", unquote)]
    Str(String),
}

/// Extend the current chunk through the next `closer`; an unclosed opener is an error
fn close_with(lex: &mut logos::Lexer<Chunk>, closer: &str) -> bool {
    match lex.remainder().find(closer) {
        Some(end) => {
            lex.bump(end + closer.len());
            true
        }
        None => false,
    }
}

fn unquote(lex: &mut logos::Lexer<Token>) -> String {
    let s = lex.slice();
    s[1..s.len() - 1].to_string()
}

/// Split template text into chunks with spans
///
/// An opener without its closer comes back as [`Chunk::Text`].
pub fn chunks(input: &str) -> impl Iterator<Item = (Chunk, Span)> + '_ {
    Chunk::lexer(input)
        .spanned()
        .map(|(chunk, span)| (chunk.unwrap_or(Chunk::Text), span))
}

/// Tokenize the contents of a tag
///
/// Fails with the span of the first unrecognized character.
pub fn tokenize(input: &str) -> Result<Vec<(Token, Span)>, Span> {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| match tok {
            Ok(t) => Ok((t, span)),
            Err(()) => Err(span),
        })
        .collect()
}

/// True for text accepted as a variable path (`[a-zA-Z0-9._]+`)
pub fn is_path(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<(Chunk, &str)> {
        chunks(input).map(|(c, span)| (c, &input[span])).collect()
    }

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input)
            .expect("Should tokenize")
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_chunks_split_tags_and_text() {
        assert_eq!(
            kinds("Hi {{ name }}!{% if x %}y{% endif %}"),
            vec![
                (Chunk::Text, "Hi "),
                (Chunk::Output, "{{ name }}"),
                (Chunk::Text, "!"),
                (Chunk::Tag, "{% if x %}"),
                (Chunk::Text, "y"),
                (Chunk::Tag, "{% endif %}"),
            ]
        );
    }

    #[test]
    fn test_adjacent_tags_do_not_merge() {
        assert_eq!(
            kinds("{{a}}{{b}}"),
            vec![(Chunk::Output, "{{a}}"), (Chunk::Output, "{{b}}")]
        );
    }

    #[test]
    fn test_unterminated_tag_is_text() {
        let pieces = kinds("a { b {{ c");
        assert!(pieces
            .iter()
            .all(|(c, _)| matches!(c, Chunk::Text | Chunk::Brace)));
        let joined: String = pieces.iter().map(|(_, s)| *s).collect();
        assert_eq!(joined, "a { b {{ c");
    }

    #[test]
    fn test_operators_longest_first() {
        assert_eq!(
            tokens("=== == >= <= > < && || !"),
            vec![
                Token::StrictEq,
                Token::LooseEq,
                Token::GreaterOrEqual,
                Token::LessOrEqual,
                Token::Greater,
                Token::Less,
                Token::And,
                Token::Or,
                Token::Bang,
            ]
        );
    }

    #[test]
    fn test_words_and_strings() {
        assert_eq!(
            tokens(r#"user.name == 'Ada' && n > 2.5 || s == "x y""#),
            vec![
                Token::Word("user.name".to_string()),
                Token::LooseEq,
                Token::Str("Ada".to_string()),
                Token::And,
                Token::Word("n".to_string()),
                Token::Greater,
                Token::Word("2.5".to_string()),
                Token::Or,
                Token::Word("s".to_string()),
                Token::LooseEq,
                Token::Str("x y".to_string()),
            ]
        );
    }

    #[test]
    fn test_include_call() {
        assert_eq!(
            tokens("inc('header')"),
            vec![
                Token::Word("inc".to_string()),
                Token::ParenOpen,
                Token::Str("header".to_string()),
                Token::ParenClose,
            ]
        );
    }

    #[test]
    fn test_negative_number() {
        assert_eq!(
            tokens("-3"),
            vec![Token::Minus, Token::Word("3".to_string())]
        );
    }

    #[test]
    fn test_unknown_character_fails() {
        assert_eq!(tokenize("a != b"), Err(3..4));
    }

    #[test]
    fn test_is_path() {
        assert!(is_path("user.name"));
        assert!(is_path("items.0"));
        assert!(!is_path(""));
        assert!(!is_path("user-name"));
    }
}

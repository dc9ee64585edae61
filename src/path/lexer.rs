//! Lexer for SVG path data using logos

use logos::Logos;

use crate::error::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\x0C,]+")]
pub enum Token {
    #[regex(r"[MmLlHhVvCcSsQqTtAaZz]", |lex| lex.slice().chars().next())]
    Command(char),

    // Signs and dots split adjacent numbers: "10-5" is two tokens, "1.5.5" is "1.5" ".5".
    // Literals that overflow to infinity are rejected.
    #[regex(r"[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| {
        lex.slice().parse::<f64>().ok().filter(|v| v.is_finite())
    })]
    Number(f64),
}

/// A lexed item: either a token or the span of a character the lexer rejected
pub type Lexed = (Result<Token, ()>, Span);

/// Lex path data into tokens with spans, keeping lexing errors in place
pub fn lex(input: &str) -> Vec<Lexed> {
    Token::lexer(input).spanned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).into_iter().filter_map(|(t, _)| t.ok()).collect()
    }

    #[test]
    fn test_commands_and_numbers() {
        assert_eq!(
            tokens("M 10,20 L30 40"),
            vec![
                Token::Command('M'),
                Token::Number(10.0),
                Token::Number(20.0),
                Token::Command('L'),
                Token::Number(30.0),
                Token::Number(40.0),
            ]
        );
    }

    #[test]
    fn test_compact_numbers() {
        assert_eq!(
            tokens("10-5.5.25"),
            vec![Token::Number(10.0), Token::Number(-5.5), Token::Number(0.25)]
        );
    }

    #[test]
    fn test_exponent() {
        assert_eq!(tokens("1e2 -2.5E-1"), vec![Token::Number(100.0), Token::Number(-0.25)]);
    }

    #[test]
    fn test_command_glued_to_number() {
        assert_eq!(
            tokens("m1 2z"),
            vec![
                Token::Command('m'),
                Token::Number(1.0),
                Token::Number(2.0),
                Token::Command('z'),
            ]
        );
    }

    #[test]
    fn test_overflowing_literal_is_error() {
        let lexed = lex("1e999");
        assert_eq!(lexed.len(), 1);
        assert!(lexed[0].0.is_err());
        assert_eq!(lexed[0].1, 0..5);
    }

    #[test]
    fn test_invalid_character_is_kept_as_error() {
        let lexed = lex("M 1 x");
        let (last, span) = lexed.last().cloned().unwrap();
        assert!(last.is_err());
        assert_eq!(span, 4..5);
    }
}

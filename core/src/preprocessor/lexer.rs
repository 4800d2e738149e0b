//! Tokenizer for the custom-operator preprocessor.
//!
//! The token set is deliberately coarse: the preprocessor only needs to
//! tell keywords, identifiers, strings, and comparison operators apart.
//! Everything it does not understand passes through byte-for-byte, so
//! the output is always valid input for a real JavaScript parser whenever
//! the input was.

use ecow::EcoString;
use logos::Logos;

/// Raw token classes. Keyword tokens win ties against `Ident` by
/// priority; longer identifier matches (`island`, `nothing`) win by
/// length, which is what keeps keywords from firing inside words.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t\r\n]+")]
    Space,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    #[regex(r"'(?:[^'\\]|\\.)*'")]
    #[regex(r"`(?:[^`\\]|\\.)*`")]
    Str,

    #[regex(r"[0-9]+(?:\.[0-9]+)?", priority = 5)]
    Number,

    #[token("is", priority = 10)]
    Is,
    #[token("isnt", priority = 10)]
    Isnt,
    #[token("and", priority = 10)]
    And,
    #[token("or", priority = 10)]
    Or,
    #[token("not", priority = 10)]
    Not,

    #[regex(r"===|==|!==|!=|<=|>=|<|>", priority = 5)]
    Comparison,

    #[regex(r"\?\?|&&|\|\|", priority = 5)]
    Logical,

    #[regex(r"!+", priority = 4)]
    Bang,

    /// Identifiers, including dotted paths and hyphenated names.
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$-]*(?:\.[A-Za-z_$][A-Za-z0-9_$-]*)*", priority = 3)]
    Ident,

    #[token("\u{feff}", priority = 10)]
    Bom,

    /// Anything else, passed through untouched.
    #[regex(r".", priority = 1)]
    Text,
}

/// One token with its source text and, once the rewrite pass has run,
/// the text to emit instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: EcoString,
    pub output: Option<EcoString>,
}

/// Split source text into tokens. Total: unrecognizable bytes come back
/// as `Text` tokens rather than errors.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    while let Some(result) = lexer.next() {
        let slice = lexer.slice();
        let token = match result {
            Ok(TokenKind::Space) => Token {
                kind: TokenKind::Space,
                value: slice.replace('\t', "  ").into(),
                output: None,
            },
            Ok(TokenKind::Bom) => Token {
                kind: TokenKind::Bom,
                value: slice.into(),
                output: Some(EcoString::new()),
            },
            Ok(kind) => Token {
                kind,
                value: slice.into(),
                output: None,
            },
            Err(()) => Token {
                kind: TokenKind::Text,
                value: slice.into(),
                output: None,
            },
        };
        tokens.push(token);
    }
    tokens
}

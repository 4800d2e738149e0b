//! The rewrite pass: word operators to JavaScript operators.

use ecow::EcoString;

use super::lexer::{tokenize, Token, TokenKind};

/// Which word operators the pass rewrites.
#[derive(Debug, Clone, Default)]
pub struct RewriteOptions {
    /// Allowlist of enabled keywords (`"is"`, `"isnt"`, `"is not"`,
    /// `"not"`, `"and"`, `"or"`, `"defined"`). `None` enables all of
    /// them; listing both `is` and `not` implies `is not`.
    pub operators: Option<Vec<EcoString>>,
}

impl RewriteOptions {
    fn enabled(&self, name: &str) -> bool {
        let Some(ops) = &self.operators else {
            return true;
        };
        if ops.iter().any(|op| op == name) {
            return true;
        }
        name == "is not"
            && ops.iter().any(|op| op == "is")
            && ops.iter().any(|op| op == "not")
    }
}

/// Rewrite word operators in `source` and return the new expression
/// text.
///
/// # Example
///
/// ```
/// use estree_eval_core::preprocessor::{rewrite, RewriteOptions};
///
/// let out = rewrite("a is not b and c is defined", &RewriteOptions::default());
/// assert_eq!(out, "a !== b && c !== undefined");
/// ```
pub fn rewrite(source: &str, options: &RewriteOptions) -> String {
    let mut tokens = tokenize(source);
    apply_operators(&mut tokens, options);
    render(&tokens)
}

/// Join tokens back into text, preferring rewritten output.
pub fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| token.output.as_deref().unwrap_or(token.value.as_str()))
        .collect()
}

fn next_significant(tokens: &[Token], from: usize) -> Option<usize> {
    tokens
        .iter()
        .enumerate()
        .skip(from + 1)
        .find(|(_, token)| token.kind != TokenKind::Space)
        .map(|(i, _)| i)
}

fn prev_significant(tokens: &[Token], from: usize) -> Option<usize> {
    tokens[..from]
        .iter()
        .enumerate()
        .rev()
        .find(|(_, token)| token.kind != TokenKind::Space)
        .map(|(i, _)| i)
}

fn apply_operators(tokens: &mut [Token], options: &RewriteOptions) {
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i].kind {
            // A keyword with nothing after it is an identifier, not an
            // operator, so `a is` stays untouched.
            TokenKind::Is if options.enabled("is") => {
                let Some(next) = next_significant(tokens, i) else {
                    i += 1;
                    continue;
                };
                if tokens[next].kind == TokenKind::Not && options.enabled("is not") {
                    tokens[i].output = Some("!==".into());
                    for token in &mut tokens[i + 1..=next] {
                        token.output = Some(EcoString::new());
                    }
                    i = next + 1;
                    continue;
                }
                tokens[i].output = Some("===".into());
            }
            TokenKind::Isnt if options.enabled("isnt") => {
                if next_significant(tokens, i).is_some() {
                    tokens[i].output = Some("!==".into());
                }
            }
            TokenKind::And if options.enabled("and") => {
                if next_significant(tokens, i).is_some() {
                    tokens[i].output = Some("&&".into());
                }
            }
            TokenKind::Or if options.enabled("or") => {
                if next_significant(tokens, i).is_some() {
                    tokens[i].output = Some("||".into());
                }
            }
            TokenKind::Not if options.enabled("not") => {
                if next_significant(tokens, i).is_some() {
                    tokens[i].output = Some("!".into());
                    // `not x` → `!x`: one following space folds away.
                    if tokens.get(i + 1).map(|t| t.kind) == Some(TokenKind::Space) {
                        tokens[i + 1].output = Some(EcoString::new());
                    }
                }
            }
            TokenKind::Ident
                if tokens[i].value == "defined" && options.enabled("defined") =>
            {
                // `x is defined` → `x !== undefined`: flip the preceding
                // equality and substitute the spelling.
                if let Some(prev) = prev_significant(tokens, i) {
                    if let Some(flipped) = flip_equality(&tokens[prev]) {
                        tokens[prev].output = Some(flipped);
                        tokens[i].output = Some("undefined".into());
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
}

/// `===` ↔ `!==`, `==` ↔ `!=`, including already-rewritten keyword
/// tokens. `None` for anything that is not an equality test.
fn flip_equality(token: &Token) -> Option<EcoString> {
    if !matches!(
        token.kind,
        TokenKind::Comparison | TokenKind::Is | TokenKind::Isnt
    ) {
        return None;
    }
    let text = token.output.as_deref().unwrap_or(token.value.as_str());
    let mut chars = text.chars();
    let flipped = match chars.next()? {
        '=' => '!',
        '!' => '=',
        _ => return None,
    };
    Some(ecow::eco_format!("{flipped}{}", chars.as_str()))
}

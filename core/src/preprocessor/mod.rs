//! The custom-operator preprocessor.
//!
//! A text-to-text pass that runs *before* parsing and rewrites word
//! operators into their JavaScript spellings:
//!
//! | input        | output  |
//! |--------------|---------|
//! | `is`         | `===`   |
//! | `isnt`, `is not` | `!==` |
//! | `and`        | `&&`    |
//! | `or`         | `\|\|`  |
//! | `not`        | `!`     |
//! | `x is defined` | `x !== undefined` |
//!
//! Keywords only rewrite when they sit in operator position: a keyword
//! at the end of the input, or one embedded in a longer identifier, is
//! left alone. Strings, numbers, and anything unrecognized pass through
//! unchanged.

mod lexer;
mod rewrite;

pub use lexer::{tokenize, Token, TokenKind};
pub use rewrite::{render, rewrite, RewriteOptions};

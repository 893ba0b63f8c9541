//! SQL Lexer/Tokenizer
//!
//! Normalizes raw SQL text and turns it into a stream of spanned tokens.
//! Spans index into the normalized text so every clause can be sliced back
//! out verbatim.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::{normalize, Lexer};

//! GDB/MI wire protocol.
//!
//! A line of debugger output is lexed into [`Token`]s by [`Lexer`] and turned
//! into a typed [`Output`](gdbmi_types::Output) by [`parse`]. The outbound
//! direction lives in [`command`].

pub mod command;
pub mod error;
pub mod escape;
pub mod lexer;
pub mod parser;

pub use error::{ParseError, Result};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::parse;

//! Lexer, parser and AST for the mew source-to-C transpiler.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{BinOpKind, EndChar, Node, Operation};
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenKind};

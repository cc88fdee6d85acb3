//! Lexing, scanning and condition parsing for the directive language

pub mod ast;
mod grammar;
pub mod lexer;
pub mod scan;

pub use ast::*;
pub use grammar::{parse_condition, ConditionError};
pub use scan::{find_blocks, scan, Block, BlockKind};

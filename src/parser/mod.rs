//! Syntactic analysis: folding the token stream into the document AST.

mod builder;

pub use builder::{parse, DocumentBuilder};

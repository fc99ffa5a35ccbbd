/// Auto-completion combinators — compute the furthest common completion of
/// a partial input line.
pub mod complete;
/// JSON serialization helpers for engine results.
pub mod dump;
/// Character-class scanners shared by both combinator algebras.
pub mod lexer;
/// Parsing combinators — recognize a command invocation on an input line.
pub mod parse;

//! Source tracking primitives shared by every pass.

mod span;

pub use span::{FileId, SourceFile, SourceMap, Span};

//! Source locations and the file table behind them.
//!
//! A [`Span`] is a compact, copyable byte range into one registered source
//! file. Nodes carry spans by value, fixed at construction; everything
//! needed to render a human-readable location (path, line, column, source
//! snippet) is looked up through the [`SourceMap`] at diagnostic time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Index of a registered source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub u16);

/// Byte range in one source file.
///
/// Spans are plain values: once a node is constructed its span never
/// changes, and cloning a tree copies spans rather than sharing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// File this span points into.
    pub file: FileId,
    /// Byte offset of the first character.
    pub start: u32,
    /// Byte offset one past the last character.
    pub end: u32,
}

impl Span {
    /// Creates a span over `start..end` in `file`.
    pub fn new(file: FileId, start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "inverted span {start}..{end}");
        Self { file, start, end }
    }

    /// Zero-length span at the start of a file, for synthesized nodes.
    pub fn detached(file: FileId) -> Self {
        Self::new(file, 0, 0)
    }

    /// Span covering both `self` and `other`.
    ///
    /// # Panics
    ///
    /// Panics if the spans point into different files.
    pub fn to(self, other: Span) -> Span {
        assert_eq!(self.file, other.file, "cannot join spans across files");
        Span {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length in bytes.
    pub fn len(self) -> u32 {
        self.end - self.start
    }

    /// Whether the span covers no text.
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// One registered source file with a precomputed line index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path as given at registration.
    pub path: PathBuf,
    /// Full source text.
    pub text: String,
    // Byte offset of each line start; last entry is the text length.
    line_starts: Vec<u32>,
}

impl SourceFile {
    fn new(path: PathBuf, text: String) -> Self {
        let mut line_starts = vec![0u32];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset as u32 + 1);
            }
        }
        if line_starts.last() != Some(&(text.len() as u32)) {
            line_starts.push(text.len() as u32);
        }
        Self {
            path,
            text,
            line_starts,
        }
    }

    /// 1-based (line, column) of a byte offset.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        }
        .min(self.line_count().saturating_sub(1));
        (
            line_idx as u32 + 1,
            offset - self.line_starts[line_idx] + 1,
        )
    }

    /// Text of a 1-based line, without interpreting the trailing newline.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let idx = line.checked_sub(1)? as usize;
        let start = *self.line_starts.get(idx)? as usize;
        let end = *self.line_starts.get(idx + 1)? as usize;
        Some(self.text[start..end].trim_end_matches('\n'))
    }

    /// Number of lines in the file.
    pub fn line_count(&self) -> usize {
        self.line_starts.len() - 1
    }
}

/// Registry of every source file in a compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file and returns its id.
    pub fn add(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> FileId {
        assert!(self.files.len() < u16::MAX as usize, "too many source files");
        let id = FileId(self.files.len() as u16);
        self.files.push(SourceFile::new(path.into(), text.into()));
        id
    }

    /// The file a span points into.
    pub fn file(&self, span: Span) -> &SourceFile {
        &self.files[span.file.0 as usize]
    }

    /// Path of the file a span points into.
    pub fn path(&self, span: Span) -> &Path {
        &self.file(span).path
    }

    /// Source text covered by a span.
    pub fn snippet(&self, span: Span) -> &str {
        &self.file(span).text[span.start as usize..span.end as usize]
    }

    /// 1-based (line, column) of a span's start.
    pub fn line_col(&self, span: Span) -> (u32, u32) {
        self.file(span).line_col(span.start)
    }
}

//! Byte ranges into HDL source text.
//!
//! A `Span` covers one syntactic element — a token, a slice expression, a
//! part statement, a whole module declaration. The parser grows statement
//! spans by [`join`](Span::join)ing the span of the first token with the
//! span of the last, and diagnostics point at the offending construct by
//! carrying its span.

use crate::file_id::FileId;
use serde::{Deserialize, Serialize};

/// A byte range within one piece of registered source text. `start` is
/// inclusive, `end` exclusive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// The source the range points into.
    pub file: FileId,
    /// First byte of the range.
    pub start: u32,
    /// One past the last byte of the range.
    pub end: u32,
}

impl Span {
    /// The span used when a diagnostic has no source location.
    pub const DUMMY: Span = Span {
        file: FileId::UNKNOWN,
        start: 0,
        end: 0,
    };

    /// A span covering `start..end` of the given source.
    pub fn new(file: FileId, start: u32, end: u32) -> Self {
        Self { file, start, end }
    }

    /// A zero-width span at one position, used for end-of-file tokens.
    pub fn point(file: FileId, offset: u32) -> Self {
        Self {
            file,
            start: offset,
            end: offset,
        }
    }

    /// The smallest span covering both `self` and `other`.
    ///
    /// Joining with a dummy span returns the located side, so synthesized
    /// elements never erase a real location. Both located spans must point
    /// into the same source.
    pub fn join(self, other: Span) -> Span {
        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return self;
        }
        debug_assert_eq!(self.file, other.file, "joined spans from different sources");
        Span {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns `true` if this span carries no source location.
    pub fn is_dummy(&self) -> bool {
        self.file.is_unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hdl() -> FileId {
        FileId::from_raw(1)
    }

    #[test]
    fn construct() {
        // "module" at the start of a declaration.
        let s = Span::new(hdl(), 0, 6);
        assert_eq!(s.start, 0);
        assert_eq!(s.end, 6);
        assert!(!s.is_dummy());
    }

    #[test]
    fn join_covers_a_statement() {
        // `Nand(a, b) -> out`: joining the `Nand` token with the `out`
        // token covers the whole part statement.
        let first = Span::new(hdl(), 0, 4);
        let last = Span::new(hdl(), 14, 17);
        let stmt = first.join(last);
        assert_eq!(stmt.start, 0);
        assert_eq!(stmt.end, 17);
    }

    #[test]
    fn join_is_order_independent() {
        let a = Span::new(hdl(), 5, 15);
        let b = Span::new(hdl(), 10, 25);
        assert_eq!(a.join(b), b.join(a));
    }

    #[test]
    fn join_with_dummy_keeps_the_location() {
        let located = Span::new(hdl(), 3, 9);
        assert_eq!(located.join(Span::DUMMY), located);
        assert_eq!(Span::DUMMY.join(located), located);
        assert!(Span::DUMMY.join(Span::DUMMY).is_dummy());
    }

    #[test]
    fn point_span_is_empty() {
        let eof = Span::point(hdl(), 42);
        assert_eq!(eof.start, eof.end);
        assert!(!eof.is_dummy());
    }

    #[test]
    fn dummy_span() {
        assert!(Span::DUMMY.is_dummy());
        assert!(!Span::point(hdl(), 0).is_dummy());
    }

    #[test]
    fn serde_roundtrip() {
        let s = Span::new(hdl(), 10, 20);
        let json = serde_json::to_string(&s).unwrap();
        let back: Span = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}

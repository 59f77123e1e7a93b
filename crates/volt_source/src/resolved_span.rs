//! Spans resolved to display positions.

use std::fmt;
use std::path::PathBuf;

/// A span resolved to 1-indexed line/column positions, ready for display
/// in a diagnostic header.
///
/// Produced by [`SourceDb::resolve_span`](crate::SourceDb::resolve_span);
/// `Display` prints the conventional `path:line:column` form that editors
/// and terminals turn into jump targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// The path (or synthetic name) of the source.
    pub path: PathBuf,
    /// Line of the first covered byte.
    pub line: u32,
    /// Column of the first covered byte.
    pub column: u32,
    /// Line of the last covered byte.
    pub end_line: u32,
    /// Column of the last covered byte.
    pub end_column: u32,
}

impl fmt::Display for ResolvedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_a_jump_target() {
        let rs = ResolvedSpan {
            path: PathBuf::from("demos/adder8.hdl"),
            line: 31,
            column: 5,
            end_line: 31,
            end_column: 20,
        };
        assert_eq!(format!("{rs}"), "demos/adder8.hdl:31:5");
    }

    #[test]
    fn display_shows_only_the_start_of_a_multiline_span() {
        // A module declaration spanning several lines still points at its
        // opening line.
        let rs = ResolvedSpan {
            path: PathBuf::from("computer.hdl"),
            line: 120,
            column: 1,
            end_line: 168,
            end_column: 2,
        };
        assert_eq!(format!("{rs}"), "computer.hdl:120:1");
    }
}

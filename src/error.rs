//! Errors for malformed layer placeholder text

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::shape::Layer;

/// Character range in the concatenated 24-character layer text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid placeholder '{ch}' at position {position} ({layer} layer)")]
    InvalidCharacter {
        ch: char,
        /// Index into the concatenated top + bottom text
        position: usize,
        layer: Layer,
    },

    #[error("{layer} layer must have 12 placeholders, found {len}")]
    InvalidLength { layer: Layer, len: usize },
}

impl ParseError {
    /// Source range the error points at, if it points at a single character
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::InvalidCharacter { position, .. } => Some(*position..*position + 1),
            ParseError::InvalidLength { .. } => None,
        }
    }

    /// Format the error with source context using ariadne.
    ///
    /// `source` is the top layer text followed directly by the bottom layer text.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span().unwrap_or(0..source.chars().count());
        let note = match self {
            ParseError::InvalidCharacter { .. } => {
                "expected a hex digit or one of R, E, C, W, X, Y, Z".to_string()
            }
            ParseError::InvalidLength { layer, len } => {
                format!("the {} layer has {} placeholders", layer, len)
            }
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(note)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_character_display() {
        let err = ParseError::InvalidCharacter {
            ch: 'Q',
            position: 3,
            layer: Layer::Top,
        };
        insta::assert_snapshot!(err.to_string(), @"invalid placeholder 'Q' at position 3 (top layer)");
        assert_eq!(err.span(), Some(3..4));
    }

    #[test]
    fn test_invalid_length_display() {
        let err = ParseError::InvalidLength {
            layer: Layer::Bottom,
            len: 11,
        };
        insta::assert_snapshot!(err.to_string(), @"bottom layer must have 12 placeholders, found 11");
        assert_eq!(err.span(), None);
    }

    #[test]
    fn test_format_mentions_character() {
        let err = ParseError::InvalidCharacter {
            ch: 'Q',
            position: 3,
            layer: Layer::Top,
        };
        let report = err.format("RRRQRRRRRRRRRRRRRRRRRRRR", "layers");
        assert!(report.contains("invalid placeholder 'Q'"));
    }
}

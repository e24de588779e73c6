//! Error handling for MangoView
//!
//! Provides error types for the layers that can actually fail:
//! - Page errors (metadata parsing and load-time validation)
//! - Load errors (fetching page metadata from a source)
//!
//! Geometry queries and selection transitions never fail; a missed hit is a
//! normal outcome, not an error. All error types use `thiserror`.

use thiserror::Error;

/// Page metadata error type
///
/// Raised while parsing or validating a page. A page that fails validation
/// is rejected as a whole so no interaction ever runs against inconsistent
/// geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    /// Metadata is not valid JSON or does not match the page layout
    #[error("Malformed page metadata: {reason}")]
    Malformed {
        /// The parser message.
        reason: String,
    },

    /// A symbol box is non-finite or inverted
    #[error("Invalid box for symbol {symbol} in paragraph {paragraph}")]
    InvalidSymbolBox {
        /// Paragraph index.
        paragraph: usize,
        /// Symbol index within the paragraph.
        symbol: usize,
    },

    /// A cluster box is non-finite or inverted
    #[error("Invalid box for cluster {cluster}")]
    InvalidClusterBox {
        /// Cluster index.
        cluster: usize,
    },

    /// A hint span is empty or runs past the paragraph's symbols
    #[error("Invalid hint [{begin}, {end}) in paragraph {paragraph} with {len} symbols")]
    InvalidHintRange {
        /// Paragraph index.
        paragraph: usize,
        /// First symbol of the span.
        begin: usize,
        /// One past the last symbol of the span.
        end: usize,
        /// Number of symbols in the paragraph.
        len: usize,
    },

    /// A cluster lists a paragraph index that does not exist
    #[error("Cluster {cluster} references missing paragraph {paragraph}")]
    UnknownParagraph {
        /// Cluster index.
        cluster: usize,
        /// The out-of-range paragraph index.
        paragraph: usize,
    },

    /// A paragraph is not covered by any cluster
    #[error("Paragraph {paragraph} belongs to no cluster")]
    UnclusteredParagraph {
        /// Paragraph index.
        paragraph: usize,
    },

    /// A paragraph is claimed by more than one cluster
    #[error("Paragraph {paragraph} belongs to clusters {first} and {second}")]
    AmbiguousCluster {
        /// Paragraph index.
        paragraph: usize,
        /// First cluster claiming it.
        first: usize,
        /// Second cluster claiming it.
        second: usize,
    },
}

/// Page loading error type
///
/// Represents failures of a page source. The viewer recovers from all of
/// them by staying on the last good page.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    /// The page does not exist in the source
    #[error("Page {index} not found")]
    NotFound {
        /// Requested page index.
        index: usize,
    },

    /// Reading the metadata failed
    #[error("Failed to read page {index}: {reason}")]
    Io {
        /// Requested page index.
        index: usize,
        /// The I/O error message.
        reason: String,
    },

    /// Metadata was read but rejected
    #[error("Page {index} rejected: {source}")]
    Invalid {
        /// Requested page index.
        index: usize,
        /// Why the page was rejected.
        #[source]
        source: PageError,
    },
}

impl LoadError {
    /// Page index the failed request was for.
    pub fn index(&self) -> usize {
        match self {
            LoadError::NotFound { index }
            | LoadError::Io { index, .. }
            | LoadError::Invalid { index, .. } => *index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_error_display() {
        let err = PageError::AmbiguousCluster {
            paragraph: 3,
            first: 0,
            second: 2,
        };
        assert_eq!(err.to_string(), "Paragraph 3 belongs to clusters 0 and 2");

        let err = PageError::InvalidHintRange {
            paragraph: 1,
            begin: 4,
            end: 4,
            len: 6,
        };
        assert_eq!(
            err.to_string(),
            "Invalid hint [4, 4) in paragraph 1 with 6 symbols"
        );
    }

    #[test]
    fn test_load_error_index() {
        let err = LoadError::Invalid {
            index: 7,
            source: PageError::UnclusteredParagraph { paragraph: 0 },
        };
        assert_eq!(err.index(), 7);
        assert_eq!(
            err.to_string(),
            "Page 7 rejected: Paragraph 0 belongs to no cluster"
        );
    }
}

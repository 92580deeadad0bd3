//! Data errors raised while interpreting EDR payloads.

use thiserror::Error;

use crate::responses::ResponseKind;

/// Errors caused by the content of a response rather than its transport.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EdrError {
    /// The body's `type` tag is missing or not one of the known shapes.
    #[error("Unrecognized response shape: {}", describe_tag(.found))]
    UnrecognizedShape {
        /// The observed tag, if there was a string tag at all.
        found: Option<String>,
    },

    /// The tag was recognized but the body does not decode as that shape.
    #[error("Malformed {kind} response: {message}")]
    MalformedResponse { kind: ResponseKind, message: String },

    /// A valid shape arrived where another one was required.
    #[error("Expected {expected} response, got {found}")]
    UnexpectedShape {
        expected: ResponseKind,
        found: ResponseKind,
    },

    /// A metadata document (collection, collection list) that does not decode.
    #[error("Malformed {what} document: {message}")]
    MalformedDocument { what: String, message: String },

    /// A paging link whose href cannot be resolved to a URL.
    #[error("Invalid link: {0}")]
    InvalidLink(String),

    /// A location feature without an identifier.
    #[error("Location feature without id in collection: {0}")]
    MissingIdentifier(String),

    /// A next link pointing at a page already fetched in this query.
    #[error("Pagination cycle: {0} was already fetched")]
    PaginationCycle(String),

    /// More pages than the configured limit.
    #[error("Page limit exceeded: more than {0} pages")]
    PageLimitExceeded(usize),

    /// A temporal bound that is not an RFC 3339 timestamp.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

fn describe_tag(found: &Option<String>) -> String {
    match found {
        Some(tag) => format!("type \"{}\"", tag),
        None => "missing type".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EdrError::UnrecognizedShape {
            found: Some("Other".to_string()),
        };
        assert_eq!(err.to_string(), "Unrecognized response shape: type \"Other\"");

        let err = EdrError::UnrecognizedShape { found: None };
        assert!(err.to_string().contains("missing type"));
    }

    #[test]
    fn test_unexpected_shape_display() {
        let err = EdrError::UnexpectedShape {
            expected: ResponseKind::FeatureCollection,
            found: ResponseKind::Coverage,
        };
        let display = format!("{}", err);
        assert!(display.contains("FeatureCollection"));
        assert!(display.contains("Coverage"));
    }

    #[test]
    fn test_paging_errors_display() {
        assert!(EdrError::PageLimitExceeded(5).to_string().contains("5 pages"));
        assert!(EdrError::PaginationCycle("https://edr.example/p1".to_string())
            .to_string()
            .contains("https://edr.example/p1"));
    }
}

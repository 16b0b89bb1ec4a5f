//! Purpose: Structural validation of boundary-level conversion requests.
//! Exports: `validate_request`, `validate_document`, `validate_separators`.
//! Role: Shared checks run before dispatching to the codecs; codecs re-check
//! only what they need operationally.
//! Invariants: Error messages are stable and surfaced to callers verbatim.
//! Invariants: Validation never mutates the request; it reports the first failure.

use crate::api::document::{ConversionRequest, Document, Format};
use crate::core::error::{Error, ErrorKind};

/// Checks a generic conversion request: document shape, same-format rejection,
/// and mandatory separators when the target is the text format.
pub fn validate_request(request: &ConversionRequest) -> Result<(), Error> {
    validate_document(&request.document)?;

    if request.document.format() == request.target_format {
        return Err(Error::new(ErrorKind::InvalidArgument)
            .with_message("Target format cannot be the same as source format"));
    }

    if request.target_format == Format::Text {
        let has_both = request
            .segment_separator
            .as_deref()
            .is_some_and(|separator| !separator.is_empty())
            && request
                .element_separator
                .as_deref()
                .is_some_and(|separator| !separator.is_empty());
        if !has_both {
            return Err(Error::new(ErrorKind::InvalidArgument).with_message(
                "Segment and element separators are required when converting to text format",
            ));
        }
    }

    Ok(())
}

/// Checks the variant-specific payload: non-empty content for text and xml
/// documents, non-empty separators on the text variant.
pub fn validate_document(document: &Document) -> Result<(), Error> {
    match document {
        Document::Text {
            content,
            segment_separator,
            element_separator,
        } => {
            if content.is_empty() {
                return Err(Error::new(ErrorKind::InvalidArgument)
                    .with_message("Content cannot be empty"));
            }
            if segment_separator.is_empty() {
                return Err(Error::new(ErrorKind::InvalidArgument)
                    .with_message("Segment separator is required"));
            }
            if element_separator.is_empty() {
                return Err(Error::new(ErrorKind::InvalidArgument)
                    .with_message("Element separator is required"));
            }
        }
        Document::Json { .. } => {}
        Document::Xml { content } => {
            if content.is_empty() {
                return Err(Error::new(ErrorKind::InvalidArgument)
                    .with_message("XML content cannot be empty"));
            }
        }
    }
    Ok(())
}

/// Checks the separator pair supplied to a direct text conversion: both
/// non-empty and mutually distinct.
pub fn validate_separators(segment_separator: &str, element_separator: &str) -> Result<(), Error> {
    if segment_separator.is_empty() {
        return Err(
            Error::new(ErrorKind::InvalidArgument).with_message("Segment separator is required")
        );
    }
    if element_separator.is_empty() {
        return Err(
            Error::new(ErrorKind::InvalidArgument).with_message("Element separator is required")
        );
    }
    if segment_separator == element_separator {
        return Err(Error::new(ErrorKind::InvalidArgument)
            .with_message("Segment and element separators must be different"));
    }
    Ok(())
}

//! Purpose: Parse and serialize the delimited positional text format.
//! Exports: `parse`, `serialize`.
//! Role: Text side of the codec trio; the only producer that splits raw input.
//! Invariants: Parsing preserves empty elements produced by adjacent separators.
//! Invariants: Serialized output always ends with one trailing segment separator.

use crate::core::error::{Error, ErrorKind};
use crate::core::segment::{ParsedDocument, Segment};

/// Splits `content` on `segment_separator`, discards empty/whitespace-only
/// fragments, then splits each remaining fragment on `element_separator`;
/// the first piece names the segment and the rest are its elements.
pub fn parse(
    content: &str,
    segment_separator: &str,
    element_separator: &str,
) -> Result<ParsedDocument, Error> {
    if content.is_empty() || segment_separator.is_empty() || element_separator.is_empty() {
        return Err(Error::new(ErrorKind::InvalidArgument)
            .with_message("Content and separators are required"));
    }

    let segments = content
        .split(segment_separator)
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            let mut pieces = raw.split(element_separator);
            // `split` always yields at least one piece, even for "".
            let name = pieces.next().unwrap_or_default().to_string();
            let elements = pieces.map(str::to_string).collect();
            Segment { name, elements }
        })
        .collect();

    Ok(ParsedDocument { segments })
}

/// Joins `[name, elements...]` with the element separator and segments with
/// the segment separator, appending one trailing segment separator as the
/// text format's convention requires for round-tripping.
pub fn serialize(
    document: &ParsedDocument,
    segment_separator: &str,
    element_separator: &str,
) -> Result<String, Error> {
    if document.is_empty() {
        return Err(Error::new(ErrorKind::EmptyInput).with_message("No segments to convert"));
    }

    let body = document
        .segments
        .iter()
        .map(|segment| {
            let mut parts = Vec::with_capacity(segment.elements.len() + 1);
            parts.push(segment.name.as_str());
            parts.extend(segment.elements.iter().map(String::as_str));
            parts.join(element_separator)
        })
        .collect::<Vec<_>>()
        .join(segment_separator);

    Ok(format!("{body}{segment_separator}"))
}

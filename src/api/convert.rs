//! Purpose: Orchestrate conversions between the three document forms.
//! Exports: `convert`, `convert_to_text`, `convert_to_json`, `convert_to_xml`,
//! `parse_document`.
//! Role: Stateless single-shot pipeline: validate, parse source, serialize target.
//! Invariants: Same-format requests are rejected before any parsing happens.
//! Invariants: Codec failures inside the generic dispatch surface as
//! `ConversionFailed` with the underlying message preserved.

use crate::api::document::{ConversionRequest, Document, Format};
use crate::api::validation::{validate_document, validate_request, validate_separators};
use crate::core::error::{Error, ErrorKind};
use crate::core::segment::ParsedDocument;
use crate::core::{grouped, markup, text};

/// Parses any tagged document into the segment model.
pub fn parse_document(document: &Document) -> Result<ParsedDocument, Error> {
    match document {
        Document::Text {
            content,
            segment_separator,
            element_separator,
        } => text::parse(content, segment_separator, element_separator),
        Document::Json { content } => grouped::to_model(content),
        Document::Xml { content } => markup::to_model(content),
    }
}

/// Generic dispatch: validates the request, parses the source, serializes to
/// the target. Any codec failure is wrapped as `ConversionFailed`.
pub fn convert(request: &ConversionRequest) -> Result<Document, Error> {
    validate_request(request)?;

    let result = match request.target_format {
        Format::Text => {
            // validate_request guarantees both separators are present.
            let segment_separator = request.segment_separator.as_deref().unwrap_or_default();
            let element_separator = request.element_separator.as_deref().unwrap_or_default();
            convert_to_text(&request.document, segment_separator, element_separator)
        }
        Format::Json => convert_to_json(&request.document),
        Format::Xml => convert_to_xml(&request.document),
    };

    result.map_err(wrap_failure)
}

/// Direct text conversion: requires distinct, non-empty separators and skips
/// the same-format rule.
pub fn convert_to_text(
    document: &Document,
    segment_separator: &str,
    element_separator: &str,
) -> Result<Document, Error> {
    validate_separators(segment_separator, element_separator)?;
    validate_document(document)?;
    let parsed = parse_document(document)?;
    let content = text::serialize(&parsed, segment_separator, element_separator)?;
    Ok(Document::Text {
        content,
        segment_separator: segment_separator.to_string(),
        element_separator: element_separator.to_string(),
    })
}

/// Direct grouped JSON conversion; skips the same-format rule.
pub fn convert_to_json(document: &Document) -> Result<Document, Error> {
    validate_document(document)?;
    let parsed = parse_document(document)?;
    let content = grouped::from_model(&parsed)?;
    Ok(Document::Json { content })
}

/// Direct XML conversion; skips the same-format rule.
pub fn convert_to_xml(document: &Document) -> Result<Document, Error> {
    validate_document(document)?;
    let parsed = parse_document(document)?;
    let content = markup::from_model(&parsed)?;
    Ok(Document::Xml { content })
}

fn wrap_failure(err: Error) -> Error {
    // InvalidArgument from separator validation is a request problem, not a
    // codec failure; let it through untouched.
    if err.kind() == ErrorKind::InvalidArgument {
        return err;
    }
    let message = err.message().unwrap_or("Unknown error").to_string();
    Error::new(ErrorKind::ConversionFailed)
        .with_message(format!("Conversion failed: {message}"))
        .with_source(err)
}

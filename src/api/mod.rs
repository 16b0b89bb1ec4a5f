//! Purpose: Define the stable public API boundary for triform.
//! Exports: Document types, conversion entry points, validation helpers.
//! Role: Public surface consumed by the CLI, the HTTP server, and tests.
//! Invariants: Conversion entry points are stateless pure functions.
//! Invariants: Wire-level names stay stable once published.

pub mod convert;
pub mod document;
pub mod validation;

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::segment::{ParsedDocument, Segment};
pub use convert::{convert, convert_to_json, convert_to_text, convert_to_xml, parse_document};
pub use document::{ConversionRequest, Document, Format, GroupedContent};
pub use validation::{validate_document, validate_request, validate_separators};

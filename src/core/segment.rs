//! Purpose: Hold the format-neutral intermediate representation.
//! Exports: `Segment`, `ParsedDocument`.
//! Role: Pure data shared by all three codecs; no behavior beyond construction.
//! Invariants: Element order is positional and preserved exactly by every codec.
//! Invariants: The empty string is a meaningful element value, not absence.

/// One named record: a segment name plus its positional element values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Segment {
    pub name: String,
    pub elements: Vec<String>,
}

impl Segment {
    pub fn new(name: impl Into<String>, elements: Vec<String>) -> Self {
        Self {
            name: name.into(),
            elements,
        }
    }
}

/// An ordered sequence of segments. Segment order is significant; segments
/// sharing a name need not be contiguous.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParsedDocument {
    pub segments: Vec<Segment>,
}

impl ParsedDocument {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

//! Purpose: Convert between the segment model and the XML document form.
//! Exports: `from_model`, `to_model`.
//! Role: XML side of the codec trio; emits a fixed `<root>` wrapper document.
//! Invariants: Escaping runs ampersand-first, so literal entities re-escape.
//! Invariants: Reconstruction reads each segment's children in document order,
//! never re-sorted by tag name (numeric suffixes above 9 would sort wrong).

use crate::core::error::{Error, ErrorKind};
use crate::core::segment::{ParsedDocument, Segment};

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>";

/// Emits the declaration header and a `<root>` element holding one child
/// element per segment, each with numbered `<name><i+1>` grandchildren.
/// Indentation is cosmetic (2 spaces for segments, 4 for elements) but
/// matches the reference output byte for byte.
pub fn from_model(document: &ParsedDocument) -> Result<String, Error> {
    if document.is_empty() {
        return Err(Error::new(ErrorKind::EmptyInput).with_message("No segments to convert"));
    }

    let mut xml = String::new();
    xml.push_str(DECLARATION);
    xml.push_str("\n<root>\n");
    for segment in &document.segments {
        xml.push_str(&format!("  <{}>\n", segment.name));
        for (index, element) in segment.elements.iter().enumerate() {
            let tag = format!("{}{}", segment.name, index + 1);
            xml.push_str(&format!("    <{tag}>{}</{tag}>\n", escape_text(element)));
        }
        xml.push_str(&format!("  </{}>\n", segment.name));
    }
    xml.push_str("</root>");

    Ok(xml)
}

/// Parses the document and rebuilds segments. Occurrences are grouped under
/// their tag name in first-appearance order; within one occurrence the
/// element values are taken in document order.
pub fn to_model(content: &str) -> Result<ParsedDocument, Error> {
    let parsed = roxmltree::Document::parse(content).map_err(|err| {
        Error::new(ErrorKind::InvalidStructure)
            .with_message(format!("Failed to parse XML: {err}"))
            .with_source(err)
    })?;

    let root = parsed.root_element();
    if root.tag_name().name() != "root" {
        return Err(Error::new(ErrorKind::InvalidStructure)
            .with_message("Invalid XML structure: missing root element"));
    }

    // Group occurrences by tag name, names kept in first-appearance order.
    let mut groups: Vec<(String, Vec<Segment>)> = Vec::new();
    for child in root.children().filter(|node| node.is_element()) {
        let name = child.tag_name().name().to_string();
        let elements = child
            .children()
            .filter(|node| node.is_element())
            .map(|node| node.text().unwrap_or_default().to_string())
            .collect();
        let segment = Segment {
            name: name.clone(),
            elements,
        };
        match groups.iter_mut().find(|(group_name, _)| *group_name == name) {
            Some((_, occurrences)) => occurrences.push(segment),
            None => groups.push((name, vec![segment])),
        }
    }

    let segments = groups
        .into_iter()
        .flat_map(|(_, occurrences)| occurrences)
        .collect();

    Ok(ParsedDocument { segments })
}

// Fixed replacement order: ampersand first, so a literal "&amp;" in input
// becomes "&amp;amp;" in output.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::{from_model, to_model};
    use crate::core::error::ErrorKind;
    use crate::core::segment::{ParsedDocument, Segment};

    #[test]
    fn emits_reference_layout() {
        let doc = ParsedDocument::new(vec![Segment::new("BEG", vec!["00".into(), "NE".into()])]);
        let xml = from_model(&doc).expect("xml");
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n\
             <root>\n\
             \x20 <BEG>\n\
             \x20   <BEG1>00</BEG1>\n\
             \x20   <BEG2>NE</BEG2>\n\
             \x20 </BEG>\n\
             </root>"
        );
    }

    #[test]
    fn escapes_markup_characters() {
        let doc = ParsedDocument::new(vec![Segment::new(
            "MSG",
            vec!["<script>alert(\"xss\")</script>".into()],
        )]);
        let xml = from_model(&doc).expect("xml");
        assert!(xml.contains("<MSG1>&lt;script&gt;alert(&quot;xss&quot;)&lt;/script&gt;</MSG1>"));
    }

    #[test]
    fn literal_entity_is_escaped_again() {
        let doc = ParsedDocument::new(vec![Segment::new("MSG", vec!["&amp;".into()])]);
        let xml = from_model(&doc).expect("xml");
        assert!(xml.contains("<MSG1>&amp;amp;</MSG1>"));
    }

    #[test]
    fn empty_document_is_rejected() {
        let err = from_model(&ParsedDocument::default()).expect_err("expected error");
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn parses_back_to_model() {
        let doc = ParsedDocument::new(vec![
            Segment::new("BEG", vec!["00".into(), "NE".into()]),
            Segment::new("PO1", vec!["1".into(), "10".into(), "EA".into()]),
        ]);
        let xml = from_model(&doc).expect("xml");
        let rebuilt = to_model(&xml).expect("model");
        assert_eq!(rebuilt, doc);
    }

    #[test]
    fn empty_elements_survive_round_trip() {
        let doc = ParsedDocument::new(vec![Segment::new(
            "REF",
            vec!["a".into(), "".into(), "c".into()],
        )]);
        let xml = from_model(&doc).expect("xml");
        let rebuilt = to_model(&xml).expect("model");
        assert_eq!(rebuilt, doc);
    }

    #[test]
    fn double_digit_elements_keep_document_order() {
        let elements: Vec<String> = (1..=12).map(|index| format!("v{index}")).collect();
        let doc = ParsedDocument::new(vec![Segment::new("PO1", elements.clone())]);
        let xml = from_model(&doc).expect("xml");
        // Child tags run PO11..PO112; a lexicographic re-sort would put
        // PO110 before PO12. Document order keeps positions intact.
        let rebuilt = to_model(&xml).expect("model");
        assert_eq!(rebuilt.segments[0].elements, elements);
    }

    #[test]
    fn repeated_tags_group_in_first_appearance_order() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<root>\n\
                   <PO1><PO11>1</PO11></PO1>\n\
                   <CTT><CTT1>x</CTT1></CTT>\n\
                   <PO1><PO11>2</PO11></PO1>\n\
                   </root>";
        let doc = to_model(xml).expect("model");
        assert_eq!(
            doc.segments,
            vec![
                Segment::new("PO1", vec!["1".into()]),
                Segment::new("PO1", vec!["2".into()]),
                Segment::new("CTT", vec!["x".into()]),
            ]
        );
    }

    #[test]
    fn unescapes_entities_on_parse() {
        let xml = "<root><MSG><MSG1>&lt;b&gt;&amp;&quot;</MSG1></MSG></root>";
        let doc = to_model(xml).expect("model");
        assert_eq!(doc.segments[0].elements, vec!["<b>&\""]);
    }

    #[test]
    fn wrong_root_name_is_invalid_structure() {
        let err = to_model("<data><A><A1>1</A1></A></data>").expect_err("expected error");
        assert_eq!(err.kind(), ErrorKind::InvalidStructure);
        assert_eq!(
            err.message(),
            Some("Invalid XML structure: missing root element")
        );
    }

    #[test]
    fn malformed_markup_is_invalid_structure() {
        let err = to_model("<root><A>").expect_err("expected error");
        assert_eq!(err.kind(), ErrorKind::InvalidStructure);
    }
}

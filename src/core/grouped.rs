//! Purpose: Convert between the segment model and the grouped JSON form.
//! Exports: `from_model`, `to_model`.
//! Role: JSON side of the codec trio; groups segments by name, numbers elements.
//! Invariants: Field keys follow `<name><1-based index>`; numbering is contiguous on output.
//! Invariants: Map key order is insertion order (serde_json `preserve_order`).
//! Notes: Reconstruction tolerates sparse keys by filling empty strings up to
//! the highest numeric suffix found, so positions stay meaningful.

use serde_json::{Map, Value};

use crate::core::error::{Error, ErrorKind};
use crate::core::segment::{ParsedDocument, Segment};

/// Groups segments under their name, in first-occurrence order; each segment
/// becomes an object mapping `<name><i+1>` to `elements[i]`.
pub fn from_model(document: &ParsedDocument) -> Result<Map<String, Value>, Error> {
    if document.is_empty() {
        return Err(Error::new(ErrorKind::EmptyInput).with_message("No segments to convert"));
    }

    let mut grouped = Map::new();
    for segment in &document.segments {
        let mut object = Map::new();
        for (index, element) in segment.elements.iter().enumerate() {
            object.insert(
                format!("{}{}", segment.name, index + 1),
                Value::String(element.clone()),
            );
        }

        if let Some(Value::Array(items)) = grouped.get_mut(&segment.name) {
            items.push(Value::Object(object));
        } else {
            grouped.insert(
                segment.name.clone(),
                Value::Array(vec![Value::Object(object)]),
            );
        }
    }

    Ok(grouped)
}

/// Rebuilds segments from grouped content: top-level keys in insertion order,
/// then each segment object in array order. Elements come back as positions
/// `1..=k` where `k` is the highest numeric suffix among the object's keys;
/// missing positions become empty strings.
pub fn to_model(content: &Map<String, Value>) -> Result<ParsedDocument, Error> {
    let mut segments = Vec::new();

    for (name, group) in content {
        let items = group.as_array().ok_or_else(|| {
            Error::new(ErrorKind::InvalidStructure)
                .with_message(format!("segment group \"{name}\" must be an array"))
        })?;

        for item in items {
            let object = item.as_object().ok_or_else(|| {
                Error::new(ErrorKind::InvalidStructure)
                    .with_message(format!("segment group \"{name}\" must contain objects"))
            })?;
            segments.push(Segment {
                name: name.clone(),
                elements: elements_from_object(name, object),
            });
        }
    }

    Ok(ParsedDocument { segments })
}

fn elements_from_object(name: &str, object: &Map<String, Value>) -> Vec<String> {
    let max_index = object
        .keys()
        .filter_map(|key| key.strip_prefix(name))
        .map(|suffix| suffix.parse::<usize>().unwrap_or(0))
        .max()
        .unwrap_or(0);

    (1..=max_index)
        .map(|index| {
            object
                .get(&format!("{name}{index}"))
                .map(element_text)
                .unwrap_or_default()
        })
        .collect()
}

// Grouped values are strings by contract; anything else is rendered as its
// JSON text so a slightly off producer still round-trips positionally.
fn element_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{from_model, to_model};
    use crate::core::error::ErrorKind;
    use crate::core::segment::{ParsedDocument, Segment};
    use serde_json::{Map, Value, json};

    fn grouped_from_json(value: Value) -> Map<String, Value> {
        value.as_object().expect("object").clone()
    }

    #[test]
    fn numbers_elements_from_one() {
        let doc = ParsedDocument::new(vec![Segment::new(
            "AddressID",
            vec!["42".into(), "108".into(), "3".into(), "14".into()],
        )]);
        let grouped = from_model(&doc).expect("grouped");
        let expected = json!({
            "AddressID": [
                {"AddressID1": "42", "AddressID2": "108", "AddressID3": "3", "AddressID4": "14"}
            ]
        });
        assert_eq!(Value::Object(grouped), expected);
    }

    #[test]
    fn repeated_names_accumulate_in_order() {
        let doc = ParsedDocument::new(vec![
            Segment::new("PO1", vec!["1".into()]),
            Segment::new("CTT", vec!["2".into()]),
            Segment::new("PO1", vec!["3".into()]),
        ]);
        let grouped = from_model(&doc).expect("grouped");
        let po1 = grouped.get("PO1").and_then(Value::as_array).expect("PO1");
        assert_eq!(po1.len(), 2);
        assert_eq!(po1[0]["PO11"], "1");
        assert_eq!(po1[1]["PO11"], "3");
        // First-occurrence order of names is preserved at the top level.
        let keys: Vec<&String> = grouped.keys().collect();
        assert_eq!(keys, vec!["PO1", "CTT"]);
    }

    #[test]
    fn empty_document_is_rejected() {
        let err = from_model(&ParsedDocument::default()).expect_err("expected error");
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn rebuilds_segments_in_insertion_order() {
        let grouped = grouped_from_json(json!({
            "BEG": [{"BEG1": "00", "BEG2": "NE"}],
            "PO1": [{"PO11": "1"}, {"PO11": "2"}]
        }));
        let doc = to_model(&grouped).expect("model");
        assert_eq!(
            doc.segments,
            vec![
                Segment::new("BEG", vec!["00".into(), "NE".into()]),
                Segment::new("PO1", vec!["1".into()]),
                Segment::new("PO1", vec!["2".into()]),
            ]
        );
    }

    #[test]
    fn sparse_keys_fill_with_empty_strings() {
        let grouped = grouped_from_json(json!({
            "REF": [{"REF1": "a", "REF4": "d"}]
        }));
        let doc = to_model(&grouped).expect("model");
        assert_eq!(doc.segments[0].elements, vec!["a", "", "", "d"]);
    }

    #[test]
    fn unparseable_suffixes_count_as_zero() {
        let grouped = grouped_from_json(json!({
            "REF": [{"REFx": "junk", "REF2": "b"}]
        }));
        let doc = to_model(&grouped).expect("model");
        assert_eq!(doc.segments[0].elements, vec!["", "b"]);
    }

    #[test]
    fn object_without_numbered_keys_yields_no_elements() {
        let grouped = grouped_from_json(json!({"REF": [{}]}));
        let doc = to_model(&grouped).expect("model");
        assert_eq!(doc.segments[0].elements, Vec::<String>::new());
    }

    #[test]
    fn double_digit_suffixes_are_ordered_numerically() {
        let mut object = Map::new();
        for index in 1..=12 {
            object.insert(format!("PO1{index}"), Value::String(index.to_string()));
        }
        let mut grouped = Map::new();
        grouped.insert("PO1".to_string(), json!([object]));

        let doc = to_model(&grouped).expect("model");
        let expected: Vec<String> = (1..=12).map(|index| index.to_string()).collect();
        assert_eq!(doc.segments[0].elements, expected);
    }

    #[test]
    fn non_array_group_is_invalid_structure() {
        let grouped = grouped_from_json(json!({"REF": {"REF1": "a"}}));
        let err = to_model(&grouped).expect_err("expected error");
        assert_eq!(err.kind(), ErrorKind::InvalidStructure);
    }

    #[test]
    fn grouped_round_trips_ordering_within_names() {
        let doc = ParsedDocument::new(vec![
            Segment::new("A", vec!["1".into(), "".into()]),
            Segment::new("B", vec![]),
            Segment::new("A", vec!["2".into()]),
        ]);
        let rebuilt = to_model(&from_model(&doc).expect("grouped")).expect("model");
        // Grouping collapses interleaving: both A segments come back adjacent.
        assert_eq!(
            rebuilt.segments,
            vec![
                Segment::new("A", vec!["1".into(), "".into()]),
                Segment::new("A", vec!["2".into()]),
                Segment::new("B", vec![]),
            ]
        );
    }
}

//! Traversal of flat exports: `{entries: [entry]}`.

use std::iter::Enumerate;
use std::slice;

use serde_json::Value;

use super::config::FlatFields;
use super::error::ShapeError;
use super::label::{LabelError, ScalarLabel, min_band_gap};
use super::naming::RecordKey;
use super::structure_field;
use crate::io::json_kind;

#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry<'a> {
    /// 1-based position in the entry list.
    pub entry_number: usize,
    pub material_id: Option<&'a str>,
    pub structure: Option<&'a Value>,
    pub label: Result<ScalarLabel, LabelError>,
}

impl<'a> FlatEntry<'a> {
    pub fn key(&self) -> RecordKey<'a> {
        RecordKey::Flat {
            entry: self.entry_number,
            material_id: self.material_id,
        }
    }
}

pub struct FlatTraversal<'a> {
    fields: &'a FlatFields,
    entries: Enumerate<slice::Iter<'a, Value>>,
}

/// Starts a traversal over the entry list.
///
/// A missing, `null`, or empty list is [`ShapeError::NoEntries`]; the caller
/// skips the whole file in that case.
pub fn traverse<'a>(doc: &'a Value, fields: &'a FlatFields) -> Result<FlatTraversal<'a>, ShapeError> {
    let object = doc.as_object().ok_or(ShapeError::NotAnObject {
        found: json_kind(doc),
    })?;
    let entries = match object.get(&fields.entries) {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => {
            return Err(ShapeError::NotAList {
                field: fields.entries.clone(),
                found: json_kind(other),
            });
        }
    };
    if entries.is_empty() {
        return Err(ShapeError::NoEntries {
            field: fields.entries.clone(),
        });
    }
    Ok(FlatTraversal {
        fields,
        entries: entries.iter().enumerate(),
    })
}

impl<'a> Iterator for FlatTraversal<'a> {
    type Item = FlatEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, entry) = self.entries.next()?;
        let material_id = entry
            .get(&self.fields.data)
            .and_then(|data| data.get(&self.fields.material_id))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty());
        Some(FlatEntry {
            entry_number: index + 1,
            material_id,
            structure: structure_field(entry, &self.fields.structure),
            label: min_band_gap(entry, self.fields),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl ExactSizeIterator for FlatTraversal<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entries_are_numbered_from_one() {
        let fields = FlatFields::default();
        let doc = json!({"entries": [
            {"structure": {"a": 1}, "data": {"mat_id": "mp-1", "band_gap_dir": 1.2, "band_gap_ind": 0.8}},
            {"structure": {"a": 1}, "data": {"band_gap_dir": 0.5, "band_gap_ind": 0.9}},
        ]});
        let traversal = traverse(&doc, &fields).unwrap();
        assert_eq!(traversal.len(), 2);
        let entries: Vec<_> = traversal.collect();

        assert_eq!(entries[0].entry_number, 1);
        assert_eq!(entries[0].material_id, Some("mp-1"));
        assert_eq!(entries[0].label.as_ref().unwrap().to_string(), "0.8");
        assert_eq!(
            entries[1].key(),
            RecordKey::Flat {
                entry: 2,
                material_id: None
            }
        );
    }

    #[test]
    fn non_string_material_id_is_absent() {
        let fields = FlatFields::default();
        let doc = json!({"entries": [{"data": {"mat_id": 42}}]});
        let entry = traverse(&doc, &fields).unwrap().next().unwrap();
        assert_eq!(entry.material_id, None);
        assert!(entry.structure.is_none());
    }

    #[test]
    fn missing_or_empty_entries_is_no_entries() {
        let fields = FlatFields::default();
        for doc in [json!({}), json!({"entries": []}), json!({"entries": null})] {
            assert_eq!(
                traverse(&doc, &fields).err(),
                Some(ShapeError::NoEntries {
                    field: "entries".into()
                })
            );
        }
    }

    #[test]
    fn malformed_documents_are_rejected() {
        let fields = FlatFields::default();
        let doc = json!({"entries": {"a": 1}});
        assert!(matches!(
            traverse(&doc, &fields).err(),
            Some(ShapeError::NotAList { found: "an object", .. })
        ));
        let doc = json!("entries");
        assert!(matches!(
            traverse(&doc, &fields).err(),
            Some(ShapeError::NotAnObject { .. })
        ));
    }
}

//! Traversal of nested exports: `{group: [entry{steps: [step]}]}`.
//!
//! Every step is visited in document order. Groups and entries that cannot
//! be descended into are reported as skip events rather than aborting the
//! walk, so a consumer can account for every level of the hierarchy.

use std::fmt;
use std::iter::Enumerate;
use std::slice;

use serde_json::{Map, Value};

use super::config::NestedFields;
use super::error::ShapeError;
use super::label::{LabelError, ScalarLabel, energy};
use super::naming::RecordKey;
use super::structure_field;
use crate::io::json_kind;

/// Why a group or entry produced no steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The list is missing, `null`, or empty.
    Empty,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Empty => f.write_str("no entries"),
            SkipReason::WrongType { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NestedStep<'a> {
    pub group: &'a str,
    pub entry_index: usize,
    pub step_index: usize,
    /// The structure dictionary, if present and non-empty.
    pub structure: Option<&'a Value>,
    pub label: Result<ScalarLabel, LabelError>,
}

impl<'a> NestedStep<'a> {
    pub fn key(&self) -> RecordKey<'a> {
        RecordKey::Nested {
            group: self.group,
            entry: self.entry_index,
            step: self.step_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NestedEvent<'a> {
    Step(NestedStep<'a>),
    SkippedGroup {
        group: &'a str,
        reason: SkipReason,
    },
    SkippedEntry {
        group: &'a str,
        entry_index: usize,
        reason: SkipReason,
    },
}

/// Lazy walk over a nested document, yielding [`NestedEvent`]s.
pub struct NestedTraversal<'a> {
    fields: &'a NestedFields,
    groups: serde_json::map::Iter<'a>,
    entries: Option<Cursor<'a>>,
    steps: Option<StepCursor<'a>>,
}

struct Cursor<'a> {
    group: &'a str,
    iter: Enumerate<slice::Iter<'a, Value>>,
}

struct StepCursor<'a> {
    group: &'a str,
    entry_index: usize,
    iter: Enumerate<slice::Iter<'a, Value>>,
}

/// Starts a traversal. Fails only if the document is not a JSON object.
pub fn traverse<'a>(
    doc: &'a Value,
    fields: &'a NestedFields,
) -> Result<NestedTraversal<'a>, ShapeError> {
    let groups: &Map<String, Value> = doc.as_object().ok_or(ShapeError::NotAnObject {
        found: json_kind(doc),
    })?;
    Ok(NestedTraversal {
        fields,
        groups: groups.iter(),
        entries: None,
        steps: None,
    })
}

impl<'a> Iterator for NestedTraversal<'a> {
    type Item = NestedEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let fields = self.fields;
        loop {
            if let Some(cursor) = &mut self.steps {
                if let Some((step_index, step)) = cursor.iter.next() {
                    return Some(NestedEvent::Step(NestedStep {
                        group: cursor.group,
                        entry_index: cursor.entry_index,
                        step_index,
                        structure: structure_field(step, &fields.structure),
                        label: energy(step, fields),
                    }));
                }
                self.steps = None;
            }

            if let Some(cursor) = &mut self.entries {
                if let Some((entry_index, entry)) = cursor.iter.next() {
                    let group = cursor.group;
                    match steps_of(entry, fields) {
                        Ok(steps) => {
                            self.steps = Some(StepCursor {
                                group,
                                entry_index,
                                iter: steps.iter().enumerate(),
                            });
                            continue;
                        }
                        Err(reason) => {
                            return Some(NestedEvent::SkippedEntry {
                                group,
                                entry_index,
                                reason,
                            });
                        }
                    }
                }
                self.entries = None;
            }

            let (group, value) = self.groups.next()?;
            match non_empty_list(value) {
                Ok(entries) => {
                    self.entries = Some(Cursor {
                        group,
                        iter: entries.iter().enumerate(),
                    });
                }
                Err(reason) => {
                    return Some(NestedEvent::SkippedGroup { group, reason });
                }
            }
        }
    }
}

fn steps_of<'a>(entry: &'a Value, fields: &NestedFields) -> Result<&'a [Value], SkipReason> {
    match entry {
        Value::Object(map) => match map.get(&fields.steps) {
            Some(steps) => non_empty_list(steps),
            None => Err(SkipReason::Empty),
        },
        other => Err(SkipReason::WrongType {
            expected: "an object",
            found: json_kind(other),
        }),
    }
}

fn non_empty_list(value: &Value) -> Result<&[Value], SkipReason> {
    match value {
        Value::Null => Err(SkipReason::Empty),
        Value::Array(items) if items.is_empty() => Err(SkipReason::Empty),
        Value::Array(items) => Ok(items),
        other => Err(SkipReason::WrongType {
            expected: "a list",
            found: json_kind(other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn steps(events: &[NestedEvent<'_>]) -> Vec<(String, usize, usize)> {
        events
            .iter()
            .filter_map(|e| match e {
                NestedEvent::Step(s) => Some((s.group.to_string(), s.entry_index, s.step_index)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn visits_every_step_in_document_order() {
        let fields = NestedFields::default();
        let mut doc = Map::new();
        for g in ["b", "a", "c"] {
            let entries: Vec<Value> = (0..2)
                .map(|_| {
                    json!({"steps": (0..3).map(|s| json!({"energy": s})).collect::<Vec<_>>()})
                })
                .collect();
            doc.insert(g.to_string(), Value::Array(entries));
        }
        let doc = Value::Object(doc);

        let events: Vec<_> = traverse(&doc, &fields).unwrap().collect();
        let visited = steps(&events);
        assert_eq!(visited.len(), 3 * 2 * 3);
        assert_eq!(visited[0], ("b".to_string(), 0, 0));
        assert_eq!(visited[3], ("b".to_string(), 1, 0));
        assert_eq!(visited[6], ("a".to_string(), 0, 0));
        assert_eq!(visited[17], ("c".to_string(), 1, 2));
    }

    #[test]
    fn step_carries_structure_and_label() {
        let fields = NestedFields::default();
        let doc = json!({"g": [{"steps": [
            {"structure": {"sites": []}, "energy": -5.3},
            {"structure": {}, "energy": "n/a"},
        ]}]});
        let events: Vec<_> = traverse(&doc, &fields).unwrap().collect();
        let NestedEvent::Step(first) = &events[0] else {
            panic!("expected a step");
        };
        assert!(first.structure.is_some());
        assert_eq!(first.label.as_ref().unwrap().to_string(), "-5.3");
        assert_eq!(
            first.key(),
            RecordKey::Nested {
                group: "g",
                entry: 0,
                step: 0
            }
        );

        let NestedEvent::Step(second) = &events[1] else {
            panic!("expected a step");
        };
        assert!(second.structure.is_none());
        assert!(matches!(second.label, Err(LabelError::NotNumeric { .. })));
    }

    #[test]
    fn empty_and_malformed_levels_become_skip_events() {
        let fields = NestedFields::default();
        let doc = json!({
            "empty": [],
            "scalar": 3,
            "g": [
                {"steps": []},
                "not an entry",
                {"other": 1},
                {"steps": [{"energy": 1.0}]}
            ]
        });
        let events: Vec<_> = traverse(&doc, &fields).unwrap().collect();
        assert_eq!(
            events[0],
            NestedEvent::SkippedGroup {
                group: "empty",
                reason: SkipReason::Empty
            }
        );
        assert_eq!(
            events[1],
            NestedEvent::SkippedGroup {
                group: "scalar",
                reason: SkipReason::WrongType {
                    expected: "a list",
                    found: "a number"
                }
            }
        );
        assert!(matches!(
            events[2],
            NestedEvent::SkippedEntry {
                entry_index: 0,
                reason: SkipReason::Empty,
                ..
            }
        ));
        assert!(matches!(
            events[3],
            NestedEvent::SkippedEntry {
                entry_index: 1,
                reason: SkipReason::WrongType { .. },
                ..
            }
        ));
        assert!(matches!(
            events[4],
            NestedEvent::SkippedEntry { entry_index: 2, .. }
        ));
        assert_eq!(steps(&events), vec![("g".to_string(), 3, 0)]);
        assert_eq!(events.len(), 6);
    }

    #[test]
    fn non_object_document_is_rejected() {
        let fields = NestedFields::default();
        let doc = json!([1, 2]);
        assert_eq!(
            traverse(&doc, &fields).err(),
            Some(ShapeError::NotAnObject { found: "a list" })
        );
    }

    #[test]
    fn custom_field_names_are_honored() {
        let fields = NestedFields {
            steps: "ionic_steps".into(),
            structure: "geom".into(),
            energy: "e".into(),
        };
        let doc = json!({"g": [{"ionic_steps": [{"geom": {"a": 1}, "e": 2}]}]});
        let events: Vec<_> = traverse(&doc, &fields).unwrap().collect();
        let NestedEvent::Step(step) = &events[0] else {
            panic!("expected a step");
        };
        assert!(step.structure.is_some());
        assert_eq!(step.label.as_ref().unwrap().to_string(), "2");
    }
}

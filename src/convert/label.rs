//! Scalar label resolution.

use std::fmt;

use serde_json::{Number, Value};
use thiserror::Error;

use super::config::{FlatFields, NestedFields};
use crate::io::json_kind;

/// Why a record has no usable label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("missing '{field}'")]
    Missing { field: String },

    #[error("'{field}' is {found}, not a number")]
    NotNumeric { field: String, found: &'static str },
}

/// A numeric label that renders with the exact text it had in the source JSON,
/// exponent notation included (`1e-05` stays `1e-05`).
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarLabel(Number);

impl ScalarLabel {
    /// Reads `field` from `object`. `null` counts as missing.
    pub fn from_field(object: &Value, field: &str) -> Result<Self, LabelError> {
        match object.get(field) {
            None | Some(Value::Null) => Err(LabelError::Missing {
                field: field.to_string(),
            }),
            Some(Value::Number(n)) => Ok(Self(n.clone())),
            Some(other) => Err(LabelError::NotNumeric {
                field: field.to_string(),
                found: json_kind(other),
            }),
        }
    }

    pub fn value(&self) -> f64 {
        self.0.as_f64().unwrap_or(f64::NAN)
    }

    /// The smaller of two labels; ties keep `self`.
    pub fn min(self, other: Self) -> Self {
        if other.value() < self.value() {
            other
        } else {
            self
        }
    }
}

impl From<Number> for ScalarLabel {
    fn from(n: Number) -> Self {
        Self(n)
    }
}

impl fmt::Display for ScalarLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The energy of a nested-schema relaxation step.
pub fn energy(step: &Value, fields: &NestedFields) -> Result<ScalarLabel, LabelError> {
    ScalarLabel::from_field(step, &fields.energy)
}

/// The smaller of the direct and indirect band gaps of a flat-schema entry.
pub fn min_band_gap(entry: &Value, fields: &FlatFields) -> Result<ScalarLabel, LabelError> {
    let data = match entry.get(&fields.data) {
        Some(data) if data.is_object() => data,
        _ => {
            return Err(LabelError::Missing {
                field: fields.data.clone(),
            });
        }
    };
    let direct = ScalarLabel::from_field(data, &fields.direct_gap)?;
    let indirect = ScalarLabel::from_field(data, &fields.indirect_gap)?;
    Ok(direct.min(indirect))
}

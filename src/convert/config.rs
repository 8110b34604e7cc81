use serde::Deserialize;
use std::sync::OnceLock;

use super::error::Error;
use super::naming::DEFAULT_PREFIX;

const DEFAULT_FIELDS_TOML: &str = include_str!("../../resources/default.fields.toml");

static DEFAULT_FIELDS: OnceLock<FieldNames> = OnceLock::new();

/// Which of the two export layouts an input directory holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// `{group: [{steps: [{structure, energy}]}]}`
    Nested,
    /// `{entries: [{structure, data: {mat_id, band_gap_dir, band_gap_ind}}]}`
    Flat,
}

#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub schema: Schema,
    pub prefix: String,
    pub fields: FieldNames,
    pub write_markers: bool,
}

impl ConvertConfig {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            prefix: DEFAULT_PREFIX.to_string(),
            fields: FieldNames::default(),
            write_markers: false,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// JSON field names read by the traversals.
///
/// Every key falls back to its default individually, so an override file
/// only needs to name the fields that differ.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldNames {
    #[serde(default)]
    pub nested: NestedFields,
    #[serde(default)]
    pub flat: FlatFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NestedFields {
    #[serde(default = "default_steps")]
    pub steps: String,
    #[serde(default = "default_structure")]
    pub structure: String,
    #[serde(default = "default_energy")]
    pub energy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlatFields {
    #[serde(default = "default_entries")]
    pub entries: String,
    #[serde(default = "default_structure")]
    pub structure: String,
    #[serde(default = "default_data")]
    pub data: String,
    #[serde(default = "default_material_id")]
    pub material_id: String,
    #[serde(default = "default_direct_gap")]
    pub direct_gap: String,
    #[serde(default = "default_indirect_gap")]
    pub indirect_gap: String,
}

fn default_steps() -> String {
    "steps".into()
}
fn default_structure() -> String {
    "structure".into()
}
fn default_energy() -> String {
    "energy".into()
}
fn default_entries() -> String {
    "entries".into()
}
fn default_data() -> String {
    "data".into()
}
fn default_material_id() -> String {
    "mat_id".into()
}
fn default_direct_gap() -> String {
    "band_gap_dir".into()
}
fn default_indirect_gap() -> String {
    "band_gap_ind".into()
}

impl Default for NestedFields {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            structure: default_structure(),
            energy: default_energy(),
        }
    }
}

impl Default for FlatFields {
    fn default() -> Self {
        Self {
            entries: default_entries(),
            structure: default_structure(),
            data: default_data(),
            material_id: default_material_id(),
            direct_gap: default_direct_gap(),
            indirect_gap: default_indirect_gap(),
        }
    }
}

impl FieldNames {
    /// Parses `custom_toml` if given, otherwise returns the bundled defaults.
    pub fn load(custom_toml: Option<&str>) -> Result<Self, Error> {
        match custom_toml {
            Some(text) => Ok(toml::from_str(text)?),
            None => Ok(default_field_names().clone()),
        }
    }
}

impl Default for FieldNames {
    fn default() -> Self {
        default_field_names().clone()
    }
}

pub fn default_field_names() -> &'static FieldNames {
    DEFAULT_FIELDS.get_or_init(|| {
        toml::from_str(DEFAULT_FIELDS_TOML)
            .expect("Failed to parse embedded default field names. This is a library bug.")
    })
}

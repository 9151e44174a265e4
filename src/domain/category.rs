//! Category field definitions and the schema the admin UI consumes
//!
//! A [`CategoryDefinition`] is what operators write under
//! `config/categories/`. [`CategoryDefinition::to_schema`] turns it into the
//! [`CategorySchema`] body of `GET /api/industry/category-fields/`, where the
//! fields appear both flat and grouped by section.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Section used when a field does not name one
pub const DEFAULT_SECTION: &str = "general";

/// Field types the admin UI knows how to render
pub const KNOWN_FIELD_TYPES: &[&str] = &[
    "text",
    "number",
    "date",
    "decimal",
    "boolean",
    "select",
    "multiselect",
    "textarea",
    "file",
];

pub const KNOWN_WIDTHS: &[&str] = &["full", "half", "third"];

/// Keys the product form binds to its own base inputs; category fields
/// share the same value map and may not reuse them
pub const RESERVED_FIELD_KEYS: &[&str] = &["name", "sku"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OptionDefinition {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FieldDefinition {
    pub key: String,
    pub label: String,
    /// Kept as a string so types the UI does not know yet can still be served
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_section")]
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, alias = "helpText", skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDefinition>,
}

fn default_section() -> String {
    DEFAULT_SECTION.to_string()
}

impl FieldDefinition {
    pub fn is_known_type(&self) -> bool {
        KNOWN_FIELD_TYPES.contains(&self.field_type.as_str())
    }

    pub fn takes_options(&self) -> bool {
        matches!(self.field_type.as_str(), "select" | "multiselect")
    }
}

/// Extra product fields of one industry category, as configured on disk
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryDefinition {
    /// Stable category id, e.g. `pharmacy`
    pub category: String,
    #[serde(alias = "categoryName")]
    pub category_name: String,
    /// Tenants whose products use this category
    #[serde(default)]
    pub tenants: Vec<String>,
    /// Tab order; sections not listed follow in order of first use
    #[serde(default)]
    pub section_order: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl CategoryDefinition {
    /// Section names in display order, only those that hold fields
    pub fn section_names(&self) -> Vec<String> {
        let used = |name: &str| self.fields.iter().any(|f| f.section == name);

        let mut names: Vec<String> = Vec::new();
        for name in &self.section_order {
            if used(name) && !names.contains(name) {
                names.push(name.clone());
            }
        }
        for field in &self.fields {
            if !names.contains(&field.section) {
                names.push(field.section.clone());
            }
        }
        names
    }

    pub fn to_schema(&self) -> CategorySchema {
        let sections = self
            .section_names()
            .into_iter()
            .map(|name| {
                let fields = self
                    .fields
                    .iter()
                    .filter(|f| f.section == name)
                    .cloned()
                    .collect();
                (name, fields)
            })
            .collect::<Vec<_>>();

        let fields = sections
            .iter()
            .flat_map(|(_, fields): &(String, Vec<FieldDefinition>)| fields.iter().cloned())
            .collect();

        CategorySchema {
            category: self.category.clone(),
            category_name: self.category_name.clone(),
            sections: SectionMap(sections),
            fields,
        }
    }
}

/// Section name → fields, serialized as a JSON object in display order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionMap(pub Vec<(String, Vec<FieldDefinition>)>);

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, fields) in &self.0 {
            map.serialize_entry(name, fields)?;
        }
        map.end()
    }
}

/// Response body of the category fields endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySchema {
    pub category: String,
    pub category_name: String,
    pub sections: SectionMap,
    pub fields: Vec<FieldDefinition>,
}

//! Wire types for tenant category field schemas

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Section a field lands in when the server omits one.
pub const DEFAULT_SECTION: &str = "general";

/// Current value of every field, keyed by field key. Owned by the parent form.
pub type FormValues = HashMap<String, Value>;

/// Validation message per field key. Owned by the parent form.
pub type FormErrors = HashMap<String, String>;

/// Payload of the change callback: `(field key, new value)`.
pub type FieldChange = (String, Value);

// ============================================================================
// Field Type
// ============================================================================

/// Control type of a category field.
///
/// Unrecognized type strings are kept in [`FieldType::Unknown`] instead of
/// failing the whole schema decode; the renderer skips those fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Number,
    Date,
    Decimal,
    Boolean,
    Select,
    MultiSelect,
    TextArea,
    File,
    Unknown(String),
}

impl FieldType {
    pub fn parse(s: &str) -> Self {
        match s {
            "text" => FieldType::Text,
            "number" => FieldType::Number,
            "date" => FieldType::Date,
            "decimal" => FieldType::Decimal,
            "boolean" => FieldType::Boolean,
            "select" => FieldType::Select,
            "multiselect" => FieldType::MultiSelect,
            "textarea" => FieldType::TextArea,
            "file" => FieldType::File,
            other => FieldType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Decimal => "decimal",
            FieldType::Boolean => "boolean",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multiselect",
            FieldType::TextArea => "textarea",
            FieldType::File => "file",
            FieldType::Unknown(other) => other,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FieldType::parse(&raw))
    }
}

// ============================================================================
// Field Descriptor
// ============================================================================

/// Layout hint; unknown values fall back to full width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldWidth {
    #[default]
    Full,
    Half,
    Third,
}

impl<'de> Deserialize<'de> for FieldWidth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match String::deserialize(deserializer)?.as_str() {
            "half" => FieldWidth::Half,
            "third" => FieldWidth::Third,
            _ => FieldWidth::Full,
        })
    }
}

impl FieldWidth {
    /// Column span in the six-column field grid
    pub fn grid_class(self) -> &'static str {
        match self {
            FieldWidth::Full => "col-span-6",
            FieldWidth::Half => "col-span-6 md:col-span-3",
            FieldWidth::Third => "col-span-6 md:col-span-2",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Numbers and booleans are kept as their JSON text
    #[serde(deserialize_with = "scalar_as_string")]
    pub value: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub label: String,
}

/// One server-defined field of the tenant's category
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required: bool,
    #[serde(default = "default_section")]
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, alias = "helpText", skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<FieldWidth>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub options: Vec<FieldOption>,
}

fn default_section() -> String {
    DEFAULT_SECTION.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn scalar_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}

/// Field list that drops entries which do not decode, so one malformed
/// descriptor leaves the rest of the form usable
fn lenient_fields<'de, D>(deserializer: D) -> Result<Vec<FieldDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<FieldDescriptor>(entry) {
            Ok(field) => Some(field),
            Err(e) => {
                log::warn!("Skipping malformed category field: {}", e);
                None
            }
        })
        .collect())
}

/// Adapter so map values go through [`lenient_fields`]
struct LenientFields(Vec<FieldDescriptor>);

impl<'de> Deserialize<'de> for LenientFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient_fields(deserializer).map(LenientFields)
    }
}

impl FieldDescriptor {
    pub fn width(&self) -> FieldWidth {
        self.width.unwrap_or_default()
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Section name → fields, in the order the server sent them.
///
/// The wire format is a JSON object; its key order is the tab order, so it is
/// decoded into a vector rather than a hash map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sections(Vec<(String, Vec<FieldDescriptor>)>);

impl Sections {
    pub fn new(entries: Vec<(String, Vec<FieldDescriptor>)>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&[FieldDescriptor]> {
        self.0
            .iter()
            .find(|(section, _)| section == name)
            .map(|(_, fields)| fields.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldDescriptor])> {
        self.0
            .iter()
            .map(|(name, fields)| (name.as_str(), fields.as_slice()))
    }
}

impl Serialize for Sections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, fields) in &self.0 {
            map.serialize_entry(name, fields)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Sections {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SectionsVisitor;

        impl<'de> Visitor<'de> for SectionsVisitor {
            type Value = Sections;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of section name to field list")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Sections, E> {
                Ok(Sections::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Sections, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, LenientFields(fields))) =
                    access.next_entry::<String, LenientFields>()?
                {
                    entries.push((name, fields));
                }
                Ok(Sections(entries))
            }
        }

        deserializer.deserialize_any(SectionsVisitor)
    }
}

// ============================================================================
// Schema Response
// ============================================================================

/// Body of `GET /industry/category-fields/`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub category: String,
    #[serde(alias = "categoryName")]
    pub category_name: String,
    #[serde(default)]
    pub sections: Sections,
    #[serde(default, deserialize_with = "lenient_fields")]
    pub fields: Vec<FieldDescriptor>,
}

/// A disagreement between the flat and the sectioned view of a schema
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConsistencyIssue {
    #[error("Duplicate field key: {0}")]
    DuplicateKey(String),

    #[error("Field '{0}' is not listed in any section")]
    MissingFromSections(String),

    #[error("Field '{key}' is listed in section '{section}' but not in the field list")]
    MissingFromFields { key: String, section: String },

    #[error("Field '{key}' declares section '{declared}' but is listed under '{listed}'")]
    SectionMismatch {
        key: String,
        declared: String,
        listed: String,
    },
}

impl SchemaResponse {
    /// True when the tenant has no category-specific fields to show
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.sections.iter().all(|(_, fields)| fields.is_empty())
    }

    /// Check that `fields` and `sections` describe the same partition.
    ///
    /// Returns every issue found; an empty vector means the schema is consistent.
    pub fn check_consistency(&self) -> Vec<ConsistencyIssue> {
        let mut issues = Vec::new();

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.key.as_str()) {
                issues.push(ConsistencyIssue::DuplicateKey(field.key.clone()));
            }
        }

        let mut listed: HashMap<&str, &str> = HashMap::new();
        for (section, fields) in self.sections.iter() {
            for field in fields {
                if listed.insert(field.key.as_str(), section).is_some() {
                    issues.push(ConsistencyIssue::DuplicateKey(field.key.clone()));
                }
                if !seen.contains(field.key.as_str()) {
                    issues.push(ConsistencyIssue::MissingFromFields {
                        key: field.key.clone(),
                        section: section.to_string(),
                    });
                }
            }
        }

        for field in &self.fields {
            match listed.get(field.key.as_str()) {
                None => issues.push(ConsistencyIssue::MissingFromSections(field.key.clone())),
                Some(section) if *section != field.section => {
                    issues.push(ConsistencyIssue::SectionMismatch {
                        key: field.key.clone(),
                        declared: field.section.clone(),
                        listed: section.to_string(),
                    })
                }
                Some(_) => {}
            }
        }

        issues
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn field(key: &str, field_type: &str, section: &str) -> FieldDescriptor {
        FieldDescriptor {
            key: key.to_string(),
            label: key.to_uppercase(),
            field_type: FieldType::parse(field_type),
            required: false,
            section: section.to_string(),
            placeholder: None,
            help_text: None,
            width: None,
            options: Vec::new(),
        }
    }

    pub(crate) fn schema(sections: Vec<(&str, Vec<FieldDescriptor>)>) -> SchemaResponse {
        let fields = sections
            .iter()
            .flat_map(|(_, fields)| fields.iter().cloned())
            .collect();
        SchemaResponse {
            category: "pharmacy".to_string(),
            category_name: "Pharmacy".to_string(),
            sections: Sections::new(
                sections
                    .into_iter()
                    .map(|(name, fields)| (name.to_string(), fields))
                    .collect(),
            ),
            fields,
        }
    }

    #[test]
    fn test_decode_preserves_section_order() {
        let body = r#"{
            "category": "apparel",
            "category_name": "Apparel",
            "sections": {
                "sizing": [{ "key": "size", "label": "Size", "type": "text", "section": "sizing" }],
                "general": [{ "key": "brand", "label": "Brand", "type": "text" }],
                "care": [{ "key": "wash", "label": "Wash", "type": "textarea", "section": "care" }]
            },
            "fields": []
        }"#;

        let parsed: SchemaResponse = serde_json::from_str(body).unwrap();
        let names: Vec<&str> = parsed.sections.names().collect();
        assert_eq!(names, vec!["sizing", "general", "care"]);
        assert_eq!(parsed.sections.get("general").unwrap()[0].section, "general");
    }

    #[test]
    fn test_decode_unknown_type_and_width() {
        let body = json!({
            "key": "rating",
            "label": "Rating",
            "type": "stars",
            "width": "quarter",
            "helpText": "1 to 5"
        });

        let parsed: FieldDescriptor = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.field_type, FieldType::Unknown("stars".to_string()));
        assert_eq!(parsed.width(), FieldWidth::Full);
        assert_eq!(parsed.help_text.as_deref(), Some("1 to 5"));
        assert_eq!(parsed.section, DEFAULT_SECTION);
    }

    #[test]
    fn test_decode_camel_case_category_name() {
        let body = json!({ "category": "grocery", "categoryName": "Grocery", "sections": null });
        let parsed: SchemaResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.category_name, "Grocery");
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_decode_null_options_as_empty() {
        let body = r#"{
            "category": "apparel",
            "category_name": "Apparel",
            "fields": [{ "key": "brand", "label": "Brand", "type": "text", "options": null, "required": null }]
        }"#;

        let parsed: SchemaResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.fields[0].options.is_empty());
        assert!(!parsed.fields[0].required);
    }

    #[test]
    fn test_decode_numeric_option_values_as_text() {
        let body = r#"{ "key": "size", "label": "Size", "type": "select",
            "options": [{ "value": 6, "label": "Six" }, { "value": 7.5, "label": 7.5 }, { "value": "xl", "label": "XL" }] }"#;

        let parsed: FieldDescriptor = serde_json::from_str(body).unwrap();
        let values: Vec<&str> = parsed.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["6", "7.5", "xl"]);
        assert_eq!(parsed.options[1].label, "7.5");
    }

    #[test]
    fn test_malformed_field_does_not_sink_schema() {
        let body = r#"{
            "category": "pharmacy",
            "category_name": "Pharmacy",
            "sections": {
                "general": [
                    { "label": "No key", "type": "text" },
                    { "key": "strength", "label": "Strength", "type": "text" }
                ]
            },
            "fields": [
                { "key": "bad", "label": "Bad", "type": "select", "options": [{ "value": [1], "label": "x" }] },
                { "key": "strength", "label": "Strength", "type": "text" }
            ]
        }"#;

        let parsed: SchemaResponse = serde_json::from_str(body).unwrap();
        let keys: Vec<&str> = parsed.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["strength"]);
        assert_eq!(parsed.sections.get("general").unwrap().len(), 1);
        assert!(parsed.check_consistency().is_empty());
    }

    #[test]
    fn test_consistent_schema_has_no_issues() {
        let s = schema(vec![
            ("general", vec![field("f1", "text", "general"), field("f2", "number", "general")]),
            ("billing", vec![field("f3", "decimal", "billing")]),
        ]);
        assert!(s.check_consistency().is_empty());
        assert!(!s.is_empty());
    }

    #[test]
    fn test_inconsistent_schema_reports_issues() {
        let mut s = schema(vec![("general", vec![field("f1", "text", "general")])]);
        s.fields.push(field("f1", "text", "general"));
        s.fields.push(field("orphan", "text", "general"));

        let issues = s.check_consistency();
        assert!(issues.contains(&ConsistencyIssue::DuplicateKey("f1".to_string())));
        assert!(issues.contains(&ConsistencyIssue::MissingFromSections("orphan".to_string())));
    }
}

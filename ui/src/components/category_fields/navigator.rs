//! Section navigation for multi-section schemas

use super::types::{FieldDescriptor, SchemaResponse, DEFAULT_SECTION};

/// Which section tab is visible.
///
/// Starts on [`DEFAULT_SECTION`] whether or not the schema has such a section;
/// the only transition is the user picking a tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionNavigator {
    active: String,
}

impl Default for SectionNavigator {
    fn default() -> Self {
        Self {
            active: DEFAULT_SECTION.to_string(),
        }
    }
}

/// One tab of the section bar
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionTab {
    pub name: String,
    pub label: String,
    pub field_count: usize,
    pub active: bool,
}

/// What to draw for a schema in the navigator's current state
#[derive(Clone, Debug, PartialEq)]
pub enum SectionLayout<'a> {
    /// Zero or one section: every field, no tab bar
    Flat { fields: &'a [FieldDescriptor] },
    /// Several sections: the tab bar plus the active section's fields
    Tabbed {
        tabs: Vec<SectionTab>,
        fields: &'a [FieldDescriptor],
    },
}

impl<'a> SectionLayout<'a> {
    pub fn fields(&self) -> &'a [FieldDescriptor] {
        match self {
            SectionLayout::Flat { fields } | SectionLayout::Tabbed { fields, .. } => fields,
        }
    }

    pub fn tabs(&self) -> &[SectionTab] {
        match self {
            SectionLayout::Flat { .. } => &[],
            SectionLayout::Tabbed { tabs, .. } => tabs,
        }
    }
}

impl SectionNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn select(&mut self, section: impl Into<String>) {
        self.active = section.into();
    }

    pub fn layout<'a>(&self, schema: &'a SchemaResponse) -> SectionLayout<'a> {
        if schema.sections.len() <= 1 {
            return SectionLayout::Flat {
                fields: &schema.fields,
            };
        }

        let tabs = schema
            .sections
            .iter()
            .map(|(name, fields)| SectionTab {
                name: name.to_string(),
                label: humanize_section(name),
                field_count: fields.len(),
                active: name == self.active,
            })
            .collect();

        SectionLayout::Tabbed {
            tabs,
            fields: schema.sections.get(&self.active).unwrap_or(&[]),
        }
    }
}

/// `billing_info` → `Billing Info`
pub fn humanize_section(name: &str) -> String {
    name.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::domain::category::{
    CategoryDefinition, FieldDefinition, KNOWN_WIDTHS, RESERVED_FIELD_KEYS,
};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Cross-reference error: {0}")]
    CrossReference(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct CategoryValidator;

impl CategoryValidator {
    pub fn validate(definitions: &[CategoryDefinition]) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for definition in definitions {
            errors.extend(Self::validate_definition(definition));
        }

        errors.extend(Self::validate_tenants(definitions));

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_definition(definition: &CategoryDefinition) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if definition.category.trim().is_empty() {
            errors.push(ValidationError::MissingField("category".to_string()));
        }
        let category = definition.category.as_str();

        let mut keys = HashSet::new();
        for (index, field) in definition.fields.iter().enumerate() {
            if field.key.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!(
                    "{}.fields[{}].key",
                    category, index
                )));
                continue;
            }
            if !keys.insert(field.key.as_str()) {
                errors.push(ValidationError::Duplicate(format!(
                    "field key '{}' in category '{}'",
                    field.key, category
                )));
            }
            errors.extend(Self::validate_field(category, field));
        }

        errors
    }

    fn validate_field(category: &str, field: &FieldDefinition) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let path = format!("{}.{}", category, field.key);

        if RESERVED_FIELD_KEYS.contains(&field.key.as_str()) {
            errors.push(ValidationError::InvalidValue {
                field: format!("{}.key", path),
                reason: format!(
                    "'{}' is reserved for the product form's base fields",
                    field.key
                ),
            });
        }

        if !field.is_known_type() {
            tracing::warn!(
                "Field {} has type '{}' which the admin UI does not render",
                path,
                field.field_type
            );
        }

        if let Some(width) = &field.width {
            if !KNOWN_WIDTHS.contains(&width.as_str()) {
                errors.push(ValidationError::InvalidValue {
                    field: format!("{}.width", path),
                    reason: format!("Unknown width '{}', expected one of {:?}", width, KNOWN_WIDTHS),
                });
            }
        }

        if !field.takes_options() {
            if !field.options.is_empty() {
                errors.push(ValidationError::InvalidValue {
                    field: format!("{}.options", path),
                    reason: format!("Options are not allowed on '{}' fields", field.field_type),
                });
            }
            return errors;
        }

        if field.options.is_empty() {
            errors.push(ValidationError::MissingField(format!("{}.options", path)));
        }

        let mut values = HashSet::new();
        for option in &field.options {
            if option.value.is_empty() {
                errors.push(ValidationError::InvalidValue {
                    field: format!("{}.options", path),
                    reason: format!(
                        "Option '{}' has an empty value, which is reserved for no selection",
                        option.label
                    ),
                });
            } else if !values.insert(option.value.as_str()) {
                errors.push(ValidationError::Duplicate(format!(
                    "option value '{}' in {}",
                    option.value, path
                )));
            }
        }

        errors
    }

    fn validate_tenants(definitions: &[CategoryDefinition]) -> Vec<ValidationError> {
        let mut owners: HashMap<&str, &str> = HashMap::new();
        let mut errors = Vec::new();

        for definition in definitions {
            for tenant in &definition.tenants {
                match owners.get(tenant.as_str()) {
                    Some(owner) => errors.push(ValidationError::CrossReference(format!(
                        "Tenant '{}' is assigned to both '{}' and '{}'",
                        tenant, owner, definition.category
                    ))),
                    None => {
                        owners.insert(tenant, &definition.category);
                    }
                }
            }
        }

        errors
    }
}

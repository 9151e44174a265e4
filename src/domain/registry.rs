use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use super::category::{CategoryDefinition, CategorySchema};

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),

    #[error("Tenant '{tenant}' is assigned to both '{first}' and '{second}'")]
    DuplicateTenant {
        tenant: String,
        first: String,
        second: String,
    },
}

/// Prebuilt category schemas indexed by tenant
#[derive(Debug, Default)]
pub struct CategoryRegistry {
    schemas: HashMap<String, CategorySchema>,
    tenants: HashMap<String, String>,
    default_tenant: Option<String>,
}

pub type SharedRegistry = Arc<RwLock<CategoryRegistry>>;

impl CategoryRegistry {
    pub fn build(
        definitions: &[CategoryDefinition],
        default_tenant: Option<String>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self {
            default_tenant,
            ..Self::default()
        };

        for definition in definitions {
            if registry.schemas.contains_key(&definition.category) {
                return Err(RegistryError::DuplicateCategory(definition.category.clone()));
            }
            for tenant in &definition.tenants {
                if let Some(first) = registry.tenants.get(tenant) {
                    return Err(RegistryError::DuplicateTenant {
                        tenant: tenant.clone(),
                        first: first.clone(),
                        second: definition.category.clone(),
                    });
                }
                registry
                    .tenants
                    .insert(tenant.clone(), definition.category.clone());
            }
            registry
                .schemas
                .insert(definition.category.clone(), definition.to_schema());
        }

        Ok(registry)
    }

    pub fn shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Schema for `tenant`, falling back to the default tenant when no
    /// tenant is given. An unknown tenant has no schema.
    pub fn resolve(&self, tenant: Option<&str>) -> Option<&CategorySchema> {
        let tenant = tenant
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or(self.default_tenant.as_deref())?;
        let category = self.tenants.get(tenant)?;
        self.schemas.get(category)
    }

    pub fn category_count(&self) -> usize {
        self.schemas.len()
    }

    pub fn tenant_count(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::tests::{definition, field};

    fn build_registry(default_tenant: Option<&str>) -> CategoryRegistry {
        CategoryRegistry::build(
            &[
                definition("pharmacy", &["acme", "initech"], vec![field("strength", "text", "dosage")]),
                definition("apparel", &["globex"], vec![field("size", "select", "general")]),
            ],
            default_tenant.map(String::from),
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_by_tenant() {
        let registry = build_registry(None);
        assert_eq!(registry.resolve(Some("initech")).unwrap().category, "pharmacy");
        assert_eq!(registry.resolve(Some("globex")).unwrap().category, "apparel");
        assert!(registry.resolve(Some("umbrella")).is_none());
        assert_eq!(registry.category_count(), 2);
        assert_eq!(registry.tenant_count(), 3);
    }

    #[test]
    fn test_resolve_falls_back_to_default_tenant() {
        let registry = build_registry(Some("globex"));
        assert_eq!(registry.resolve(None).unwrap().category, "apparel");
        assert_eq!(registry.resolve(Some("  ")).unwrap().category, "apparel");
        // An explicit unknown tenant does not fall back
        assert!(registry.resolve(Some("umbrella")).is_none());

        assert!(build_registry(None).resolve(None).is_none());
    }

    #[test]
    fn test_duplicate_tenant_rejected() {
        let result = CategoryRegistry::build(
            &[
                definition("pharmacy", &["acme"], vec![]),
                definition("apparel", &["acme"], vec![]),
            ],
            None,
        );
        assert_eq!(
            result.unwrap_err(),
            RegistryError::DuplicateTenant {
                tenant: "acme".into(),
                first: "pharmacy".into(),
                second: "apparel".into(),
            }
        );
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let result = CategoryRegistry::build(
            &[definition("pharmacy", &["acme"], vec![]), definition("pharmacy", &["globex"], vec![])],
            None,
        );
        assert!(matches!(result, Err(RegistryError::DuplicateCategory(c)) if c == "pharmacy"));
    }
}

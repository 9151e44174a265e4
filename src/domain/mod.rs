pub mod category;
pub mod registry;

pub use category::{CategoryDefinition, CategorySchema, FieldDefinition, OptionDefinition};
pub use registry::{CategoryRegistry, RegistryError, SharedRegistry};

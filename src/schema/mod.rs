//! Entity schema descriptors
//!
//! A typed descriptor tree standing in for runtime reflection: each entity
//! registers its field types once, and dotted search paths are resolved
//! against the tree when converting raw filter values.

pub mod convert;

use std::collections::HashMap;

/// Declared type of a scalar entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Int,
    BigInt,
    Float,
    Bool,
    Date,
    DateTime,
}

/// A field is either a scalar of a declared type or a nested entity.
#[derive(Debug, Clone)]
pub enum FieldDescriptor {
    Scalar(FieldType),
    Nested(EntitySchema),
}

/// Descriptor tree for one entity type.
///
/// # Example
///
/// ```
/// use searchable::{EntitySchema, FieldType};
///
/// let parent = EntitySchema::builder().field("id", FieldType::BigInt).build();
/// let schema = EntitySchema::builder()
///     .field("name", FieldType::Text)
///     .nested("parent", parent)
///     .build();
///
/// assert_eq!(schema.resolve("parent.id"), Some(FieldType::BigInt));
/// assert_eq!(schema.resolve("parent.missing"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntitySchema {
    fields: HashMap<String, FieldDescriptor>,
}

impl EntitySchema {
    pub fn builder() -> EntitySchemaBuilder {
        EntitySchemaBuilder::default()
    }

    /// Walk a dotted path to a scalar field type.
    ///
    /// Returns `None` for an unknown segment, a path that descends through a
    /// scalar, or a path that stops on a nested entity.
    pub fn resolve(&self, path: &str) -> Option<FieldType> {
        let mut current = self;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            match current.fields.get(segment)? {
                FieldDescriptor::Scalar(field_type) => {
                    return if segments.peek().is_none() {
                        Some(*field_type)
                    } else {
                        None
                    };
                }
                FieldDescriptor::Nested(schema) => {
                    segments.peek()?;
                    current = schema;
                }
            }
        }
        None
    }
}

/// Builder for [`EntitySchema`].
#[derive(Debug, Default)]
pub struct EntitySchemaBuilder {
    fields: HashMap<String, FieldDescriptor>,
}

impl EntitySchemaBuilder {
    /// Register a scalar field.
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields
            .insert(name.into(), FieldDescriptor::Scalar(field_type));
        self
    }

    /// Register a nested entity field, enabling dotted paths through it.
    pub fn nested(mut self, name: impl Into<String>, schema: EntitySchema) -> Self {
        self.fields
            .insert(name.into(), FieldDescriptor::Nested(schema));
        self
    }

    pub fn build(self) -> EntitySchema {
        EntitySchema {
            fields: self.fields,
        }
    }
}

//! Response Schema Descriptors
//!
//! Declarative description of the JSON shape a widget expects back.
//! The descriptor is sent to the upstream as its `responseSchema` and can
//! optionally be checked against the parsed response (see
//! [`crate::ai::validation::validate_shape`]).
//!
//! ```ignore
//! let meal = SchemaDescriptor::object()
//!     .required("name", SchemaDescriptor::string("Name of the meal"))
//!     .required("reason", SchemaDescriptor::string("Why this meal"));
//! let plan = SchemaDescriptor::array_of(meal).describe("Meals for the day");
//! ```

use serde_json::{Map, Value, json};

/// One named property of an object schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub schema: SchemaDescriptor,
    pub required: bool,
}

/// Tagged schema tree using the primitive kinds the upstream understands
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaDescriptor {
    String {
        description: Option<String>,
    },
    Number {
        description: Option<String>,
    },
    Boolean {
        description: Option<String>,
    },
    Object {
        description: Option<String>,
        fields: Vec<FieldSpec>,
    },
    Array {
        description: Option<String>,
        items: Box<SchemaDescriptor>,
    },
}

impl SchemaDescriptor {
    pub fn string(description: impl Into<String>) -> Self {
        Self::String {
            description: Some(description.into()),
        }
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::Number {
            description: Some(description.into()),
        }
    }

    pub fn boolean(description: impl Into<String>) -> Self {
        Self::Boolean {
            description: Some(description.into()),
        }
    }

    /// Empty object schema; add properties with [`required`](Self::required)
    /// and [`optional`](Self::optional)
    pub fn object() -> Self {
        Self::Object {
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn array_of(items: SchemaDescriptor) -> Self {
        Self::Array {
            description: None,
            items: Box::new(items),
        }
    }

    /// Set or replace the description
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match &mut self {
            Self::String { description }
            | Self::Number { description }
            | Self::Boolean { description }
            | Self::Object { description, .. }
            | Self::Array { description, .. } => *description = text,
        }
        self
    }

    /// Add a required property. No-op on non-object schemas.
    pub fn required(self, name: impl Into<String>, schema: SchemaDescriptor) -> Self {
        self.field(name, schema, true)
    }

    /// Add an optional property. No-op on non-object schemas.
    pub fn optional(self, name: impl Into<String>, schema: SchemaDescriptor) -> Self {
        self.field(name, schema, false)
    }

    fn field(mut self, name: impl Into<String>, schema: SchemaDescriptor, required: bool) -> Self {
        if let Self::Object { fields, .. } = &mut self {
            fields.push(FieldSpec {
                name: name.into(),
                schema,
                required,
            });
        }
        self
    }

    /// Kind name as used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String { .. } => "string",
            Self::Number { .. } => "number",
            Self::Boolean { .. } => "boolean",
            Self::Object { .. } => "object",
            Self::Array { .. } => "array",
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::String { description }
            | Self::Number { description }
            | Self::Boolean { description }
            | Self::Object { description, .. }
            | Self::Array { description, .. } => description.as_deref(),
        }
    }

    /// Names of required properties, in declaration order
    pub fn required_fields(&self) -> Vec<&str> {
        match self {
            Self::Object { fields, .. } => fields
                .iter()
                .filter(|f| f.required)
                .map(|f| f.name.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Render as the upstream's OpenAPI-subset schema object.
    ///
    /// Type names are upper-case (`STRING`, `OBJECT`, ...). Properties keep
    /// declaration order, mirrored in `propertyOrdering`.
    pub fn to_upstream_schema(&self) -> Value {
        let mut out = Map::new();
        let type_name = match self {
            Self::String { .. } => "STRING",
            Self::Number { .. } => "NUMBER",
            Self::Boolean { .. } => "BOOLEAN",
            Self::Object { .. } => "OBJECT",
            Self::Array { .. } => "ARRAY",
        };
        out.insert("type".to_string(), json!(type_name));

        if let Some(description) = self.description() {
            out.insert("description".to_string(), json!(description));
        }

        match self {
            Self::Object { fields, .. } => {
                let mut properties = Map::new();
                for field in fields {
                    properties.insert(field.name.clone(), field.schema.to_upstream_schema());
                }
                let ordering: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                out.insert("properties".to_string(), Value::Object(properties));
                out.insert("propertyOrdering".to_string(), json!(ordering));

                let required = self.required_fields();
                if !required.is_empty() {
                    out.insert("required".to_string(), json!(required));
                }
            }
            Self::Array { items, .. } => {
                out.insert("items".to_string(), items.to_upstream_schema());
            }
            _ => {}
        }

        Value::Object(out)
    }
}

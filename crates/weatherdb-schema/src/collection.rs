use std::collections::HashSet;

use bson::{Bson, Document, doc};
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::index::IndexDescriptor;

/// `bsonType` aliases understood by `$jsonSchema`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BsonType {
    Double,
    String,
    Object,
    Array,
    BinData,
    ObjectId,
    Bool,
    Date,
    Null,
    Int,
    Long,
    Decimal,
    Timestamp,
}

impl BsonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BsonType::Double => "double",
            BsonType::String => "string",
            BsonType::Object => "object",
            BsonType::Array => "array",
            BsonType::BinData => "binData",
            BsonType::ObjectId => "objectId",
            BsonType::Bool => "bool",
            BsonType::Date => "date",
            BsonType::Null => "null",
            BsonType::Int => "int",
            BsonType::Long => "long",
            BsonType::Decimal => "decimal",
            BsonType::Timestamp => "timestamp",
        }
    }

    /// The alias of a concrete value, or `None` for types the schema cannot name.
    pub fn of(value: &Bson) -> Option<BsonType> {
        match value {
            Bson::Double(_) => Some(BsonType::Double),
            Bson::String(_) => Some(BsonType::String),
            Bson::Document(_) => Some(BsonType::Object),
            Bson::Array(_) => Some(BsonType::Array),
            Bson::Binary(_) => Some(BsonType::BinData),
            Bson::ObjectId(_) => Some(BsonType::ObjectId),
            Bson::Boolean(_) => Some(BsonType::Bool),
            Bson::DateTime(_) => Some(BsonType::Date),
            Bson::Null => Some(BsonType::Null),
            Bson::Int32(_) => Some(BsonType::Int),
            Bson::Int64(_) => Some(BsonType::Long),
            Bson::Decimal128(_) => Some(BsonType::Decimal),
            Bson::Timestamp(_) => Some(BsonType::Timestamp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "bsonType")]
    pub types: Vec<BsonType>,
}

impl Property {
    pub fn new(name: impl Into<String>, types: &[BsonType]) -> Self {
        Self {
            name: name.into(),
            types: types.to_vec(),
        }
    }

    pub fn accepts(&self, value: &Bson) -> bool {
        BsonType::of(value).is_some_and(|t| self.types.contains(&t))
    }

    fn to_document(&self) -> Document {
        // A single alias renders as a string, several as an array.
        let bson_type = match self.types.as_slice() {
            [single] => Bson::String(single.as_str().to_string()),
            many => Bson::Array(
                many.iter()
                    .map(|t| Bson::String(t.as_str().to_string()))
                    .collect(),
            ),
        };
        doc! { "bsonType": bson_type }
    }
}

/// The subset of `$jsonSchema` the bootstrap declares: an object with
/// required fields and a type list per property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSchema {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl JsonSchema {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    pub fn to_document(&self) -> Document {
        let mut properties = Document::new();
        for prop in &self.properties {
            properties.insert(prop.name.clone(), prop.to_document());
        }
        // The engine rejects an empty `required` array.
        let mut schema = doc! { "bsonType": "object" };
        if !self.required.is_empty() {
            schema.insert("required", self.required.clone());
        }
        schema.insert("properties", properties);
        schema
    }

    /// Property names and required entries are unique, and every property
    /// names at least one type.
    fn check(&self) -> Result<(), SchemaError> {
        let mut names = HashSet::new();
        for prop in &self.properties {
            if !names.insert(prop.name.as_str()) {
                return Err(SchemaError::RepeatedProperty(prop.name.clone()));
            }
            if prop.types.is_empty() {
                return Err(SchemaError::UntypedProperty(prop.name.clone()));
            }
        }
        let mut required = HashSet::new();
        for field in &self.required {
            if !required.insert(field.as_str()) {
                return Err(SchemaError::RepeatedRequiredField(field.clone()));
            }
            if !names.contains(field.as_str()) {
                return Err(SchemaError::UndeclaredRequiredField(field.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    Off,
    Strict,
    Moderate,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationLevel::Off => "off",
            ValidationLevel::Strict => "strict",
            ValidationLevel::Moderate => "moderate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationAction {
    Error,
    Warn,
}

impl ValidationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationAction::Error => "error",
            ValidationAction::Warn => "warn",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub schema: JsonSchema,
    pub level: ValidationLevel,
    pub action: ValidationAction,
}

impl Validator {
    pub fn to_document(&self) -> Document {
        doc! { "$jsonSchema": self.schema.to_document() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDescriptor {
    pub name: String,
    #[serde(default)]
    pub validator: Option<Validator>,
    #[serde(default)]
    pub indexes: Vec<IndexDescriptor>,
}

impl CollectionDescriptor {
    pub fn from_json(data: &str) -> Result<Self, SchemaError> {
        let descriptor: CollectionDescriptor = serde_json::from_str(data)?;
        descriptor.check()?;
        Ok(descriptor)
    }

    /// Verify that indexes key on fields the documents actually carry and
    /// that the schema renders to something the engine accepts.
    ///
    /// Without a validator there is nothing to compare against, so only the
    /// shape of each index is checked.
    pub fn check(&self) -> Result<(), SchemaError> {
        for index in &self.indexes {
            let name = index.name();
            if index.keys.is_empty() {
                return Err(SchemaError::EmptyIndex(name));
            }
            let mut seen = HashSet::new();
            for key in &index.keys {
                if !seen.insert(key.field.as_str()) {
                    return Err(SchemaError::RepeatedIndexField {
                        index: name,
                        field: key.field.clone(),
                    });
                }
            }
        }

        let Some(validator) = &self.validator else {
            return Ok(());
        };
        let schema = &validator.schema;
        schema.check()?;

        for index in &self.indexes {
            if let Some(key) = index.keys.iter().find(|k| !schema.declares(&k.field)) {
                return Err(SchemaError::UndeclaredIndexField {
                    index: index.name(),
                    field: key.field.clone(),
                });
            }
        }
        Ok(())
    }

    /// `create` command, with the validator and its policy when present.
    pub fn create_command(&self) -> Document {
        let mut command = doc! { "create": self.name.as_str() };
        if let Some(validator) = &self.validator {
            command.insert("validator", validator.to_document());
            command.insert("validationLevel", validator.level.as_str());
            command.insert("validationAction", validator.action.as_str());
        }
        command
    }
}

use std::fmt;

#[derive(Debug)]
pub enum SchemaError {
    UndeclaredIndexField { index: String, field: String },
    UndeclaredRequiredField(String),
    RepeatedRequiredField(String),
    RepeatedProperty(String),
    UntypedProperty(String),
    EmptyIndex(String),
    RepeatedIndexField { index: String, field: String },
    InvalidDescriptor(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::UndeclaredIndexField { index, field } => {
                write!(f, "index {index} keys on undeclared field: {field}")
            }
            SchemaError::UndeclaredRequiredField(field) => {
                write!(f, "required field is not a declared property: {field}")
            }
            SchemaError::RepeatedRequiredField(field) => {
                write!(f, "required field listed twice: {field}")
            }
            SchemaError::RepeatedProperty(name) => write!(f, "property declared twice: {name}"),
            SchemaError::UntypedProperty(name) => write!(f, "property {name} has no bsonType"),
            SchemaError::EmptyIndex(index) => write!(f, "index {index} has no keys"),
            SchemaError::RepeatedIndexField { index, field } => {
                write!(f, "index {index} repeats field: {field}")
            }
            SchemaError::InvalidDescriptor(msg) => write!(f, "invalid descriptor: {msg}"),
        }
    }
}

impl std::error::Error for SchemaError {}

impl From<serde_json::Error> for SchemaError {
    fn from(e: serde_json::Error) -> Self {
        SchemaError::InvalidDescriptor(e.to_string())
    }
}

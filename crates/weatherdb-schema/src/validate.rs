use std::fmt;

use bson::Document;

use crate::collection::{BsonType, JsonSchema};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingRequired(String),
    WrongType {
        field: String,
        expected: Vec<BsonType>,
        found: Option<BsonType>,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingRequired(field) => write!(f, "missing required field: {field}"),
            Violation::WrongType {
                field,
                expected,
                found,
            } => {
                let expected: Vec<&str> = expected.iter().map(|t| t.as_str()).collect();
                let found = found.map(|t| t.as_str()).unwrap_or("unsupported");
                write!(
                    f,
                    "field {field} has type {found}, expected one of [{}]",
                    expected.join(", ")
                )
            }
        }
    }
}

/// Evaluate `doc` against the schema, returning every violation found.
///
/// Required fields are reported first, in declaration order, followed by
/// type mismatches in property order. Fields the schema does not declare are
/// unconstrained.
pub fn validate(schema: &JsonSchema, doc: &Document) -> Vec<Violation> {
    let mut violations: Vec<Violation> = schema
        .required
        .iter()
        .filter(|field| !doc.contains_key(field.as_str()))
        .map(|field| Violation::MissingRequired(field.clone()))
        .collect();

    for prop in &schema.properties {
        let Some(value) = doc.get(&prop.name) else {
            continue;
        };
        if !prop.accepts(value) {
            violations.push(Violation::WrongType {
                field: prop.name.clone(),
                expected: prop.types.clone(),
                found: BsonType::of(value),
            });
        }
    }
    violations
}

pub fn conforms(schema: &JsonSchema, doc: &Document) -> bool {
    validate(schema, doc).is_empty()
}

mod collection;
mod credential;
mod error;
mod index;
pub mod observations;
mod validate;

pub use collection::{
    BsonType, CollectionDescriptor, JsonSchema, Property, ValidationAction, ValidationLevel,
    Validator,
};
pub use credential::{BuiltinRole, Credential, RoleGrant};
pub use error::SchemaError;
pub use index::{IndexDescriptor, IndexKey, SortOrder};
pub use validate::{Violation, conforms, validate};

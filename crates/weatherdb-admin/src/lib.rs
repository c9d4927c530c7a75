mod admin;
mod error;
mod memory;
mod mongo;

pub use admin::{Admin, CommandKind};
pub use error::{AdminError, codes};
pub use memory::{MemoryAdmin, MemoryCollection, UserRecord, ValidationWarning};
pub use mongo::MongoAdmin;

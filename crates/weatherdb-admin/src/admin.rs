use std::fmt;

use weatherdb_schema::{CollectionDescriptor, Credential, IndexDescriptor};

use crate::error::AdminError;

/// The administrative calls a bootstrap issues against an engine.
///
/// Implementations execute exactly one engine command per call and report
/// engine failures as-is; nothing is retried or checked beforehand.
pub trait Admin {
    /// Create the user on [`Credential::database`] with its single grant.
    fn create_user(&mut self, credential: &Credential) -> Result<(), AdminError>;

    /// Create the collection, attaching its validator and policy if any.
    /// Indexes on the descriptor are not created here.
    fn create_collection(
        &mut self,
        database: &str,
        collection: &CollectionDescriptor,
    ) -> Result<(), AdminError>;

    fn create_index(
        &mut self,
        database: &str,
        collection: &str,
        index: &IndexDescriptor,
    ) -> Result<(), AdminError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    CreateUser,
    CreateCollection,
    CreateIndex,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::CreateUser => "createUser",
            CommandKind::CreateCollection => "create",
            CommandKind::CreateIndex => "createIndexes",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

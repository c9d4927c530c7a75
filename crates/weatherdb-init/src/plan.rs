use std::fmt;

use bson::{Bson, Document};
use tracing::info;
use weatherdb_admin::{Admin, AdminError};
use weatherdb_schema::{CollectionDescriptor, Credential, IndexDescriptor};

use crate::error::InitError;

/// The provisioning sequence for one database, checked for consistency up front.
pub struct Plan {
    credential: Credential,
    collection: CollectionDescriptor,
}

pub enum Step<'a> {
    CreateUser(&'a Credential),
    CreateCollection {
        database: &'a str,
        collection: &'a CollectionDescriptor,
    },
    CreateIndex {
        database: &'a str,
        collection: &'a str,
        index: &'a IndexDescriptor,
    },
}

impl Plan {
    pub fn new(
        credential: Credential,
        collection: CollectionDescriptor,
    ) -> Result<Self, InitError> {
        collection.check()?;
        Ok(Self {
            credential,
            collection,
        })
    }

    pub fn database(&self) -> &str {
        self.credential.database()
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn collection(&self) -> &CollectionDescriptor {
        &self.collection
    }

    /// User first, then the collection, then each of its indexes.
    pub fn steps(&self) -> Vec<Step<'_>> {
        let database = self.database();
        let mut steps = vec![
            Step::CreateUser(&self.credential),
            Step::CreateCollection {
                database,
                collection: &self.collection,
            },
        ];
        steps.extend(self.collection.indexes.iter().map(|index| Step::CreateIndex {
            database,
            collection: &self.collection.name,
            index,
        }));
        steps
    }

    /// The commands the plan issues, as relaxed extended JSON, with the
    /// password masked.
    pub fn render(&self) -> serde_json::Value {
        let steps: Vec<serde_json::Value> = self
            .steps()
            .iter()
            .map(|step| {
                let mut command = step.command();
                if let Step::CreateUser(_) = step {
                    command.insert("pwd", "***");
                }
                serde_json::json!({
                    "database": step.database(),
                    "command": Bson::Document(command).into_relaxed_extjson(),
                })
            })
            .collect();
        serde_json::Value::Array(steps)
    }
}

impl Step<'_> {
    pub fn database(&self) -> &str {
        match self {
            Step::CreateUser(credential) => credential.database(),
            Step::CreateCollection { database, .. } | Step::CreateIndex { database, .. } => {
                *database
            }
        }
    }

    pub fn command(&self) -> Document {
        match self {
            Step::CreateUser(credential) => credential.create_user_command(),
            Step::CreateCollection { collection, .. } => collection.create_command(),
            Step::CreateIndex {
                collection, index, ..
            } => index.create_command(collection),
        }
    }

    pub fn apply<A: Admin + ?Sized>(&self, admin: &mut A) -> Result<(), AdminError> {
        match self {
            Step::CreateUser(credential) => admin.create_user(credential),
            Step::CreateCollection {
                database,
                collection,
            } => admin.create_collection(database, collection),
            Step::CreateIndex {
                database,
                collection,
                index,
            } => admin.create_index(database, collection, index),
        }
    }
}

impl fmt::Display for Step<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::CreateUser(credential) => write!(
                f,
                "createUser {}@{}",
                credential.username(),
                credential.database()
            ),
            Step::CreateCollection {
                database,
                collection,
            } => write!(f, "create {database}.{}", collection.name),
            Step::CreateIndex {
                database,
                collection,
                index,
            } => write!(f, "createIndexes {database}.{collection}.{}", index.name()),
        }
    }
}

/// Run every step in order, stopping at the first failure.
pub fn bootstrap<A: Admin + ?Sized>(admin: &mut A, plan: &Plan) -> Result<(), InitError> {
    for step in plan.steps() {
        info!(database = step.database(), step = %step, "applying");
        step.apply(admin).map_err(|source| InitError::Step {
            step: step.to_string(),
            source,
        })?;
    }
    info!(
        database = plan.database(),
        collection = %plan.collection().name,
        "bootstrap complete"
    );
    Ok(())
}

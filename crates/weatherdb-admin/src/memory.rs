use std::collections::{BTreeMap, HashMap};

use bson::oid::ObjectId;
use bson::{Bson, Document};
use tracing::warn;
use weatherdb_schema::{
    CollectionDescriptor, Credential, IndexDescriptor, RoleGrant, ValidationAction,
    ValidationLevel, Validator, Violation, validate,
};

use crate::admin::{Admin, CommandKind};
use crate::error::{AdminError, codes};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub password: String,
    pub roles: Vec<RoleGrant>,
}

#[derive(Debug, Default)]
pub struct MemoryCollection {
    validator: Option<Validator>,
    indexes: Vec<IndexDescriptor>,
    documents: Vec<Document>,
}

impl MemoryCollection {
    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    pub fn indexes(&self) -> &[IndexDescriptor] {
        &self.indexes
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    fn position(&self, id: &Bson) -> Option<usize> {
        self.documents.iter().position(|d| d.get("_id") == Some(id))
    }
}

#[derive(Debug, Default)]
struct MemoryDatabase {
    users: BTreeMap<String, UserRecord>,
    collections: BTreeMap<String, MemoryCollection>,
}

/// A non-conforming write that was let through because the validator warns.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub namespace: String,
    pub id: Bson,
    pub violations: Vec<Violation>,
}

/// In-process engine with the observable behavior of the three bootstrap
/// commands, plus enough of the write path to exercise validators.
#[derive(Default)]
pub struct MemoryAdmin {
    databases: BTreeMap<String, MemoryDatabase>,
    journal: Vec<(CommandKind, String)>,
    warnings: Vec<ValidationWarning>,
    failures: HashMap<CommandKind, AdminError>,
}

impl MemoryAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next command of `kind` fail with `error`.
    pub fn fail_on(&mut self, kind: CommandKind, error: AdminError) {
        self.failures.insert(kind, error);
    }

    /// Commands applied so far, with the namespace each targeted.
    pub fn journal(&self) -> &[(CommandKind, String)] {
        &self.journal
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub fn user(&self, database: &str, username: &str) -> Option<&UserRecord> {
        self.databases.get(database)?.users.get(username)
    }

    pub fn collection(&self, database: &str, name: &str) -> Option<&MemoryCollection> {
        self.databases.get(database)?.collections.get(name)
    }

    pub fn collection_names(&self, database: &str) -> Vec<String> {
        self.databases
            .get(database)
            .map(|db| db.collections.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn begin(&mut self, kind: CommandKind) -> Result<(), AdminError> {
        match self.failures.remove(&kind) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn database_mut(&mut self, name: &str) -> &mut MemoryDatabase {
        self.databases.entry(name.to_string()).or_default()
    }

    /// Swap the validator on an existing collection, as `collMod` does.
    /// Stored documents are not revalidated.
    pub fn set_validator(
        &mut self,
        database: &str,
        collection: &str,
        validator: Option<Validator>,
    ) -> Result<(), AdminError> {
        let col = self
            .databases
            .get_mut(database)
            .and_then(|db| db.collections.get_mut(collection))
            .ok_or_else(|| {
                AdminError::command(
                    codes::NAMESPACE_NOT_FOUND,
                    "NamespaceNotFound",
                    format!("ns does not exist: {database}.{collection}"),
                )
            })?;
        col.validator = validator;
        Ok(())
    }

    // ── Write path ──────────────────────────────────────────────

    /// Insert a document, assigning an `_id` when it has none.
    ///
    /// Inserts are validated at every level except `off`.
    pub fn insert_one(
        &mut self,
        database: &str,
        collection: &str,
        mut doc: Document,
    ) -> Result<Bson, AdminError> {
        let namespace = format!("{database}.{collection}");
        let col = self
            .database_mut(database)
            .collections
            .entry(collection.to_string())
            .or_default();

        let id = match doc.get("_id") {
            Some(id) => id.clone(),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                doc.insert("_id", id.clone());
                id
            }
        };
        if col.position(&id).is_some() {
            return Err(AdminError::command(
                codes::DUPLICATE_KEY,
                "DuplicateKey",
                format!("E11000 duplicate key error collection: {namespace} _id: {id}"),
            ));
        }

        let violations = match &col.validator {
            Some(v) if v.level != ValidationLevel::Off => validate(&v.schema, &doc),
            _ => Vec::new(),
        };
        let action = col.validator.as_ref().map(|v| v.action);
        let warning = check_write(&namespace, &id, violations, action)?;

        col.documents.push(doc);
        if let Some(w) = warning {
            self.warnings.push(w);
        }
        Ok(id)
    }

    /// Replace the document with `_id == id`. Returns whether one matched.
    ///
    /// Under `moderate`, a document that already violates the validator may be
    /// replaced with anything.
    pub fn replace_one(
        &mut self,
        database: &str,
        collection: &str,
        id: &Bson,
        mut doc: Document,
    ) -> Result<bool, AdminError> {
        let namespace = format!("{database}.{collection}");
        let Some(col) = self
            .databases
            .get_mut(database)
            .and_then(|db| db.collections.get_mut(collection))
        else {
            return Ok(false);
        };
        let Some(pos) = col.position(id) else {
            return Ok(false);
        };
        doc.insert("_id", id.clone());

        let violations = match &col.validator {
            None => Vec::new(),
            Some(v) => match v.level {
                ValidationLevel::Off => Vec::new(),
                ValidationLevel::Strict => validate(&v.schema, &doc),
                ValidationLevel::Moderate => {
                    if validate(&v.schema, &col.documents[pos]).is_empty() {
                        validate(&v.schema, &doc)
                    } else {
                        Vec::new()
                    }
                }
            },
        };
        let action = col.validator.as_ref().map(|v| v.action);
        let warning = check_write(&namespace, id, violations, action)?;

        col.documents[pos] = doc;
        if let Some(w) = warning {
            self.warnings.push(w);
        }
        Ok(true)
    }
}

fn check_write(
    namespace: &str,
    id: &Bson,
    violations: Vec<Violation>,
    action: Option<ValidationAction>,
) -> Result<Option<ValidationWarning>, AdminError> {
    if violations.is_empty() {
        return Ok(None);
    }
    match action {
        Some(ValidationAction::Error) => Err(AdminError::command(
            codes::DOCUMENT_VALIDATION_FAILURE,
            "DocumentValidationFailure",
            format!("Document failed validation: {}", violations[0]),
        )),
        _ => {
            warn!(
                namespace,
                id = %id,
                violations = violations.len(),
                first = %violations[0],
                "document would fail validation"
            );
            Ok(Some(ValidationWarning {
                namespace: namespace.to_string(),
                id: id.clone(),
                violations,
            }))
        }
    }
}

impl Admin for MemoryAdmin {
    fn create_user(&mut self, credential: &Credential) -> Result<(), AdminError> {
        self.begin(CommandKind::CreateUser)?;
        let db = self.database_mut(credential.database());
        if db.users.contains_key(credential.username()) {
            return Err(AdminError::command(
                codes::USER_ALREADY_EXISTS,
                "Location51003",
                format!(
                    "User \"{}@{}\" already exists",
                    credential.username(),
                    credential.database()
                ),
            ));
        }
        db.users.insert(
            credential.username().to_string(),
            UserRecord {
                password: credential.password().to_string(),
                roles: vec![credential.grant()],
            },
        );
        self.journal.push((
            CommandKind::CreateUser,
            format!("{}@{}", credential.username(), credential.database()),
        ));
        Ok(())
    }

    fn create_collection(
        &mut self,
        database: &str,
        collection: &CollectionDescriptor,
    ) -> Result<(), AdminError> {
        self.begin(CommandKind::CreateCollection)?;
        let db = self.database_mut(database);
        if db.collections.contains_key(&collection.name) {
            return Err(AdminError::command(
                codes::NAMESPACE_EXISTS,
                "NamespaceExists",
                format!("Collection {database}.{} already exists.", collection.name),
            ));
        }
        db.collections.insert(
            collection.name.clone(),
            MemoryCollection {
                validator: collection.validator.clone(),
                ..MemoryCollection::default()
            },
        );
        self.journal.push((
            CommandKind::CreateCollection,
            format!("{database}.{}", collection.name),
        ));
        Ok(())
    }

    fn create_index(
        &mut self,
        database: &str,
        collection: &str,
        index: &IndexDescriptor,
    ) -> Result<(), AdminError> {
        self.begin(CommandKind::CreateIndex)?;
        let col = self
            .database_mut(database)
            .collections
            .entry(collection.to_string())
            .or_default();

        let name = index.name();
        let same_keys = col
            .indexes
            .iter()
            .find(|i| i.name() == name)
            .map(|existing| existing.keys == index.keys);
        match same_keys {
            Some(true) => {}
            Some(false) => {
                return Err(AdminError::command(
                    codes::INDEX_KEY_SPECS_CONFLICT,
                    "IndexKeySpecsConflict",
                    format!("An existing index has the same name as the requested index: {name}"),
                ));
            }
            None => col.indexes.push(index.clone()),
        }
        self.journal.push((
            CommandKind::CreateIndex,
            format!("{database}.{collection}.{name}"),
        ));
        Ok(())
    }
}

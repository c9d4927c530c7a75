use std::fs;
use std::path::PathBuf;

use weatherdb_schema::{CollectionDescriptor, Credential, observations};

use crate::error::InitError;

pub const URI_VAR: &str = "MONGO_URI";
pub const DB_VAR: &str = "MONGO_APP_DB";
pub const USER_VAR: &str = "MONGO_APP_USER";
pub const PASSWORD_VAR: &str = "MONGO_APP_PASSWORD";
pub const SCHEMA_FILE_VAR: &str = "MONGO_APP_SCHEMA_FILE";

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DB: &str = "weatherdb";
pub const DEFAULT_USER: &str = "weatherapp";
pub const DEFAULT_PASSWORD: &str = "weatherpass";

/// How unset variables are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMode {
    /// Fall back to the literal defaults.
    Defaults,
    /// Every variable must come from the orchestrator.
    Required,
}

/// Everything the bootstrap reads from its environment, captured once.
#[derive(Clone)]
pub struct InitConfig {
    pub uri: String,
    pub credential: Credential,
    pub schema_file: Option<PathBuf>,
}

impl InitConfig {
    pub fn from_env(mode: EnvMode) -> Result<Self, InitError> {
        Self::from_lookup(mode, |name| std::env::var(name).ok())
    }

    /// Build from an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup<F>(mode: EnvMode, lookup: F) -> Result<Self, InitError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| -> Result<String, InitError> {
            match lookup(name).filter(|v| !v.is_empty()) {
                Some(v) => Ok(v),
                None if mode == EnvMode::Defaults => Ok(default.to_string()),
                None => Err(InitError::MissingVar(name.to_string())),
            }
        };

        let uri = var(URI_VAR, DEFAULT_URI)?;
        let database = var(DB_VAR, DEFAULT_DB)?;
        let username = var(USER_VAR, DEFAULT_USER)?;
        let password = var(PASSWORD_VAR, DEFAULT_PASSWORD)?;
        let schema_file = lookup(SCHEMA_FILE_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            uri,
            credential: Credential::read_write(username, password, database),
            schema_file,
        })
    }

    pub fn database(&self) -> &str {
        self.credential.database()
    }

    /// The collection to provision: the descriptor file if one is configured,
    /// otherwise the built-in observation schema.
    pub fn collection(&self) -> Result<CollectionDescriptor, InitError> {
        let Some(path) = &self.schema_file else {
            return Ok(observations::collection());
        };
        let data = fs::read_to_string(path).map_err(|source| InitError::SchemaFile {
            path: path.clone(),
            source,
        })?;
        Ok(CollectionDescriptor::from_json(&data)?)
    }
}

use std::path::PathBuf;

use weatherdb_admin::AdminError;
use weatherdb_schema::SchemaError;

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("environment variable {0} is not set")]
    MissingVar(String),

    #[error("failed to read schema file {}: {source}", .path.display())]
    SchemaFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("failed to connect: {0}")]
    Connect(#[source] AdminError),

    #[error("step {step} failed: {source}")]
    Step { step: String, source: AdminError },

    #[error("failed to render plan: {0}")]
    Render(#[from] serde_json::Error),
}

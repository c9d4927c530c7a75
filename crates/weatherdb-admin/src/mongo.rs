use bson::{Document, doc};
use mongodb::sync::Client;
use tracing::debug;
use weatherdb_schema::{CollectionDescriptor, Credential, IndexDescriptor};

use crate::admin::Admin;
use crate::error::AdminError;

/// [`Admin`] over a live deployment, using the driver's blocking API.
pub struct MongoAdmin {
    client: Client,
}

impl MongoAdmin {
    /// Connect and ping `admin`, so an unreachable server fails here rather
    /// than on the first step.
    pub fn connect(uri: &str) -> Result<Self, AdminError> {
        let client = Client::with_uri_str(uri)?;
        client.database("admin").run_command(doc! { "ping": 1 }).run()?;
        Ok(Self { client })
    }

    fn run(&self, database: &str, command: Document) -> Result<Document, AdminError> {
        let name = command.keys().next().cloned().unwrap_or_default();
        debug!(database, command = %name, "running command");
        let reply = self.client.database(database).run_command(command).run()?;
        Ok(reply)
    }
}

impl Admin for MongoAdmin {
    fn create_user(&mut self, credential: &Credential) -> Result<(), AdminError> {
        self.run(credential.database(), credential.create_user_command())?;
        Ok(())
    }

    fn create_collection(
        &mut self,
        database: &str,
        collection: &CollectionDescriptor,
    ) -> Result<(), AdminError> {
        self.run(database, collection.create_command())?;
        Ok(())
    }

    fn create_index(
        &mut self,
        database: &str,
        collection: &str,
        index: &IndexDescriptor,
    ) -> Result<(), AdminError> {
        self.run(database, index.create_command(collection))?;
        Ok(())
    }
}

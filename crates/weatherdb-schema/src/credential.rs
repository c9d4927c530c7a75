use std::fmt;

use bson::{Document, doc};

/// The built-in role the application user is granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinRole {
    ReadWrite,
}

impl BuiltinRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinRole::ReadWrite => "readWrite",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    pub role: BuiltinRole,
    pub db: String,
}

/// The application user. The grant is always scoped to `database`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    password: String,
    database: String,
    role: BuiltinRole,
}

impl Credential {
    pub fn read_write(
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            database: database.into(),
            role: BuiltinRole::ReadWrite,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn grant(&self) -> RoleGrant {
        RoleGrant {
            role: self.role,
            db: self.database.clone(),
        }
    }

    /// `createUser` command, run against [`Credential::database`].
    pub fn create_user_command(&self) -> Document {
        let grant = self.grant();
        doc! {
            "createUser": self.username.as_str(),
            "pwd": self.password.as_str(),
            "roles": [{ "role": grant.role.as_str(), "db": grant.db }],
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .field("role", &self.role)
            .finish()
    }
}

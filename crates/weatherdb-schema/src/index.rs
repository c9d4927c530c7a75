use bson::{Document, doc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_i32(&self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexKey {
    pub field: String,
    #[serde(default = "default_order")]
    pub order: SortOrder,
}

fn default_order() -> SortOrder {
    SortOrder::Asc
}

impl IndexKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

/// A single or compound index. Key order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub keys: Vec<IndexKey>,
    #[serde(default)]
    pub name: Option<String>,
}

impl IndexDescriptor {
    pub fn ascending(fields: &[&str]) -> Self {
        Self {
            keys: fields.iter().map(|f| IndexKey::asc(*f)).collect(),
            name: None,
        }
    }

    /// Explicit name, or the engine's default of `field_order` pairs joined by `_`.
    pub fn name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.keys
            .iter()
            .map(|k| format!("{}_{}", k.field, k.order.as_i32()))
            .collect::<Vec<_>>()
            .join("_")
    }

    pub fn key_document(&self) -> Document {
        let mut key = Document::new();
        for k in &self.keys {
            key.insert(k.field.clone(), k.order.as_i32());
        }
        key
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.field.as_str())
    }

    /// `createIndexes` command for this index on `collection`.
    pub fn create_command(&self, collection: &str) -> Document {
        doc! {
            "createIndexes": collection,
            "indexes": [{ "key": self.key_document(), "name": self.name() }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_follows_engine_convention() {
        let idx = IndexDescriptor {
            keys: vec![IndexKey::asc("city"), IndexKey::desc("observed_at")],
            name: None,
        };
        assert_eq!(idx.name(), "city_1_observed_at_-1");
    }

    #[test]
    fn explicit_name_wins() {
        let idx = IndexDescriptor {
            keys: vec![IndexKey::asc("city")],
            name: Some("by_city".into()),
        };
        assert_eq!(idx.name(), "by_city");
    }

    #[test]
    fn key_document_preserves_declaration_order() {
        let idx = IndexDescriptor::ascending(&["observation_time", "city"]);
        let key = idx.key_document();
        let keys: Vec<&String> = key.keys().collect();
        assert_eq!(keys, vec!["observation_time", "city"]);
    }
}

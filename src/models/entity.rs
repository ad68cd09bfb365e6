use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity contract shared by every searchable document
pub trait Entity {
    type Id;

    fn id(&self) -> &Self::Id;

    /// Creation or last mutation instant
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Common identity fields, meant to be `#[serde(flatten)]`ed into documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseEntity<K> {
    pub id: K,
    pub time_stamp: DateTime<Utc>,
}

impl<K> BaseEntity<K> {
    pub fn new(id: K) -> Self {
        Self {
            id,
            time_stamp: Utc::now(),
        }
    }

    pub fn with_timestamp(id: K, time_stamp: DateTime<Utc>) -> Self {
        Self { id, time_stamp }
    }
}

impl<K> Entity for BaseEntity<K> {
    type Id = K;

    fn id(&self) -> &K {
        &self.id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.time_stamp
    }
}

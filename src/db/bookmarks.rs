use crate::db::StoreError;
use chrono::{DateTime, Utc};
use mongodb::bson::{self, Document, oid::ObjectId};
use serde::{Deserialize, Serialize};

pub const COLLECTION: &str = "bookmarks";

/// A bookmark as stored in the `bookmarks` collection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkDocument {
    // Left unset on insert so the store assigns it
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub url: String,
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub collection_id: Option<String>,

    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl BookmarkDocument {
    pub fn to_document(&self) -> Result<Document, StoreError> {
        Ok(bson::to_document(self)?)
    }
}

/// The JSON shape returned by the API.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub collection_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn from_document(document: Document) -> Result<Self, StoreError> {
        Self::try_from(bson::from_document::<BookmarkDocument>(document)?)
    }
}

impl TryFrom<BookmarkDocument> for Bookmark {
    type Error = StoreError;

    fn try_from(document: BookmarkDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: document.id.ok_or(StoreError::MissingId)?.to_hex(),
            url: document.url,
            title: document.title,
            description: document.description,
            tags: document.tags,
            collection_id: document.collection_id,
            created_at: to_chrono(document.created_at),
            updated_at: to_chrono(document.updated_at),
        })
    }
}

fn to_chrono(date_time: bson::DateTime) -> DateTime<Utc> {
    let millis = date_time.timestamp_millis();

    DateTime::from_timestamp_millis(millis).unwrap_or(if millis < 0 { DateTime::<Utc>::MIN_UTC } else { DateTime::<Utc>::MAX_UTC })
}

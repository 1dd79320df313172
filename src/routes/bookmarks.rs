use crate::{
    db::{
        StoreError,
        bookmarks::{Bookmark, BookmarkDocument, COLLECTION},
    },
    error::{AppError, ValidatedBody, ValidatedQuery},
    routes::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use mongodb::bson::{self, Document, Regex, doc};
use regex_syntax::escape;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

pub const MISSING_FIELDS_MESSAGE: &str = "URL and title are required";
pub const INVALID_URL_MESSAGE: &str = "Invalid URL format";

pub async fn list(State(state): State<AppState>, ValidatedQuery(query): ValidatedQuery<ListQuery>) -> Result<Json<Vec<Bookmark>>, AppError> {
    let documents = state.gateway.find(COLLECTION, query.to_filter(), None, Some(doc! { "createdAt": -1 })).await?;

    let bookmarks = documents
        .into_iter()
        .filter_map(|document| match Bookmark::from_document(document) {
            Ok(bookmark) => Some(bookmark),
            Err(error) => {
                warn!("Skipping a stored bookmark that could not be decoded: {error}");
                None
            },
        })
        .collect();

    Ok(Json(bookmarks))
}

pub async fn create(
    State(state): State<AppState>,
    ValidatedBody(payload): ValidatedBody<CreateBookmark>,
) -> Result<(StatusCode, Json<Bookmark>), AppError> {
    let bookmark = payload.into_document()?;

    let id = state.gateway.create(COLLECTION, bookmark.to_document()?).await?;

    let stored = state
        .gateway
        .find_one(COLLECTION, doc! { "_id": id.clone() }, None)
        .await?
        .ok_or_else(|| StoreError::MissingAfterInsert(id.to_string()))?;

    let bookmark = Bookmark::from_document(stored)?;
    info!("Created bookmark {} for {}", bookmark.id, bookmark.url);

    Ok((StatusCode::CREATED, Json(bookmark)))
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub tag: Option<String>,

    #[serde(alias = "collection")]
    pub collection_id: Option<String>,

    pub search: Option<String>,
}

impl ListQuery {
    /// Builds the store filter. Empty parameters impose no constraint, and search text always matches
    /// literally.
    pub fn to_filter(&self) -> Document {
        let mut filter = doc! {};

        if let Some(tag) = non_empty(&self.tag) {
            filter.insert("tags", tag);
        }

        if let Some(collection_id) = non_empty(&self.collection_id) {
            filter.insert("collectionId", collection_id);
        }

        if let Some(search) = non_empty(&self.search) {
            let regex = Regex { pattern: escape(search), options: "i".into() };
            filter.insert("$or", vec![doc! { "title": regex.clone() }, doc! { "description": regex.clone() }, doc! { "url": regex }]);
        }

        filter
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Body of a creation request. Unknown fields, including any client-sent id, are ignored.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookmark {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub collection_id: Option<String>,
}

impl CreateBookmark {
    /// Validates the request and fills in defaults and timestamps.
    pub fn into_document(self) -> Result<BookmarkDocument, AppError> {
        let url = self.url.as_deref().map(str::trim).unwrap_or_default();
        let title = self.title.as_deref().map(str::trim).unwrap_or_default();

        if url.is_empty() || title.is_empty() {
            return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.into()));
        }

        if let Err(error) = Url::parse(url) {
            debug!("Rejected bookmark URL {url:?}: {error}");
            return Err(AppError::Validation(INVALID_URL_MESSAGE.into()));
        }

        let now = bson::DateTime::now();

        Ok(BookmarkDocument {
            id: None,
            url: url.to_string(),
            title: title.to_string(),
            description: self.description.unwrap_or_default(),
            tags: normalize_tags(self.tags.unwrap_or_default()),
            collection_id: self.collection_id.filter(|collection_id| !collection_id.is_empty()),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Trims tags, drops empty ones and keeps the first of any duplicates.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());

    for tag in &tags {
        let tag = tag.trim();

        if !tag.is_empty() && !normalized.iter().any(|existing| existing == tag) {
            normalized.push(tag.to_string());
        }
    }

    normalized
}

use crate::{db::gateway::Gateway, routes::bookmarks::CreateBookmark};
use anyhow::{Context, Result};
use mongodb::bson::Document;
use std::{fs::read_to_string, path::Path};
use tracing::info;

/// Replaces `collection` with the bookmarks listed in the JSON array at `path`.
///
/// Entries go through the same validation as `POST /bookmarks`, and nothing is dropped unless all of
/// them pass.
pub async fn seed_bookmarks<P: AsRef<Path>>(gateway: &Gateway, collection: &str, path: P) -> Result<usize> {
    let path = path.as_ref();

    let contents = read_to_string(path).with_context(|| format!("Could not read seed file {}", path.display()))?;
    let entries: Vec<CreateBookmark> =
        serde_json::from_str(&contents).with_context(|| format!("Seed file {} is not a JSON array of bookmarks", path.display()))?;

    let mut documents: Vec<Document> = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let document = entry.into_document().with_context(|| format!("Entry {index} is invalid"))?;
        documents.push(document.to_document()?);
    }

    let count = documents.len();
    gateway.drop_and_seed(collection, documents).await.with_context(|| format!("Could not seed collection {collection}"))?;

    info!("Seeded {count} bookmarks into {collection}");

    Ok(count)
}

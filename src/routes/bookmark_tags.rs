use crate::{
    db::{StoreError, bookmarks::COLLECTION},
    error::{AppError, ValidatedQuery},
    routes::AppState,
};
use axum::{Json, extract::State};
use mongodb::bson::{Document, doc, from_document};
use serde::{Deserialize, Serialize};

pub async fn handler(State(state): State<AppState>, ValidatedQuery(query): ValidatedQuery<TagQuery>) -> Result<Json<Vec<TagCount>>, AppError> {
    let collection_id = query.collection_id.as_deref().filter(|collection_id| !collection_id.is_empty());
    let documents = state.gateway.aggregate(COLLECTION, tag_count_pipeline(collection_id)).await?;

    let tag_counts = documents.into_iter().map(from_document::<TagCount>).collect::<Result<Vec<TagCount>, _>>().map_err(StoreError::from)?;

    Ok(Json(tag_counts))
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TagQuery {
    #[serde(alias = "collection")]
    collection_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct TagCount {
    pub tag: String,
    pub count: i64,
}

/// Counts bookmarks per tag, most used first, ties broken alphabetically.
fn tag_count_pipeline(collection_id: Option<&str>) -> Vec<Document> {
    let mut pipeline = vec![];

    if let Some(collection_id) = collection_id {
        pipeline.push(doc! { "$match": { "collectionId": collection_id } });
    }

    pipeline.extend([
        doc! { "$unwind": "$tags" },
        doc! { "$group": { "_id": "$tags", "count": { "$sum": 1 } } },
        doc! { "$sort": { "count": -1, "_id": 1 } },
        doc! { "$project": { "_id": 0, "tag": "$_id", "count": 1 } },
    ]);

    pipeline
}

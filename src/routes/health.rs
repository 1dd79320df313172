use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    status: &'static str,
    timestamp: String,
}

pub async fn handler() -> Json<Health> {
    Json(Health { status: "ok", timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true) })
}

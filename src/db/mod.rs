pub mod bookmarks;
pub mod client;
pub mod gateway;

use mongodb::bson::{de::Error as DecodeError, ser::Error as EncodeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not connect to MongoDB database {database}: {source}")]
    Connection {
        database: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),

    #[error("Could not decode document: {0}")]
    Decode(#[from] DecodeError),

    #[error("Could not encode document: {0}")]
    Encode(#[from] EncodeError),

    #[error("Document has no _id")]
    MissingId,

    #[error("Document {0} could not be read back after insert")]
    MissingAfterInsert(String),

    #[cfg_attr(not(test), allow(dead_code))]
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[cfg_attr(not(test), allow(dead_code))]
    #[error("Unsupported query: {0}")]
    Unsupported(String),

    #[cfg_attr(not(test), allow(dead_code))]
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

use crate::{config::SensitiveString, db::StoreError};
use mongodb::{
    Client, Database,
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
};
use tokio::sync::OnceCell;
use tracing::info;

/// Owns the single driver connection for the process.
#[derive(Debug)]
pub struct StoreClient {
    uri: SensitiveString,
    connection: OnceCell<Connection>,
}

#[derive(Debug)]
struct Connection {
    client: Client,
    database: Database,
}

impl StoreClient {
    pub fn new(uri: SensitiveString) -> Self {
        Self { uri, connection: OnceCell::new() }
    }

    /// Connects and pings `database_name` on the first call. Later calls, including ones racing the first,
    /// get the already selected database back, whatever name they pass.
    pub async fn connect(&self, database_name: &str) -> Result<Database, StoreError> {
        let connection = self.connection.get_or_try_init(|| self.open(database_name)).await?;
        Ok(connection.database.clone())
    }

    async fn open(&self, database_name: &str) -> Result<Connection, StoreError> {
        let connection_error = |source: mongodb::error::Error| StoreError::Connection { database: database_name.to_string(), source };

        let mut options = ClientOptions::parse(self.uri.to_string()).await.map_err(connection_error)?;
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).strict(true).deprecation_errors(true).build());

        let client = Client::with_options(options).map_err(connection_error)?;
        let database = client.database(database_name);

        database.run_command(doc! { "ping": 1 }).await.map_err(connection_error)?;
        info!("Successfully connected to MongoDB database: {database_name}");

        Ok(Connection { client, database })
    }

    pub async fn close(&self) {
        if let Some(connection) = self.connection.get() {
            connection.client.clone().shutdown().await;
            info!("Closed MongoDB connection to {}", connection.database.name());
        }
    }
}

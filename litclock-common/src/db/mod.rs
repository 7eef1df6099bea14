//! Database schema, migrations, models and ingestion

pub mod ingest;
pub mod init;
pub mod migrations;
pub mod models;

pub use ingest::*;
pub use init::*;
pub use migrations::*;
pub use models::*;

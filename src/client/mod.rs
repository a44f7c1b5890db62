pub mod error;
pub mod http;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{Fields, Record};

pub use error::{ClientError, ClientResult, ErrorKind};
pub use http::HttpResourceClient;
pub use memory::{Call, MemoryResource};

/// GET/POST/PUT/DELETE against one REST collection.
///
/// Failures are surfaced once; nothing is retried.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Name of the collection, used to tag change notifications.
    fn resource(&self) -> &str;

    async fn list(&self) -> ClientResult<Vec<Record>>;
    async fn create(&self, fields: &Fields) -> ClientResult<Record>;
    async fn update(&self, id: &str, fields: &Fields) -> ClientResult<Record>;
    async fn delete(&self, id: &str) -> ClientResult<()>;
}

pub type SharedClient = Arc<dyn ResourceClient>;

use std::future::Future;
use std::time::Duration;

use tonic::transport::{Channel, Endpoint};

use crate::domain::types::{CategoryId, CategoryName};
use crate::mirror::proto::{CategoryServiceClient, DeleteCategoryRequest, SaveCategoryRequest};
use crate::mirror::{CategoryMirror, MirrorAck, MirrorError, MirrorResult, acknowledge};

/// [`CategoryMirror`] talking to the book service over gRPC.
///
/// Clones share one underlying channel.
#[derive(Clone)]
pub struct GrpcBookMirror {
    client: CategoryServiceClient<Channel>,
    timeout: Duration,
}

impl GrpcBookMirror {
    /// Wrap an existing channel. `timeout` bounds every call.
    pub fn new(channel: Channel, timeout: Duration) -> Self {
        Self {
            client: CategoryServiceClient::new(channel),
            timeout,
        }
    }

    /// Build a client whose connection is established on first use, so the
    /// service can start while the book service is still down.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect_lazy(url: &str, timeout: Duration) -> MirrorResult<Self> {
        let endpoint = Endpoint::from_shared(url.to_string())
            .map_err(|e| MirrorError::Endpoint(e.to_string()))?
            .connect_timeout(timeout)
            .timeout(timeout);
        Ok(Self::new(endpoint.connect_lazy(), timeout))
    }
}

async fn with_deadline<T, F>(timeout: Duration, call: F) -> MirrorResult<T>
where
    F: Future<Output = Result<tonic::Response<T>, tonic::Status>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(response) => Ok(response?.into_inner()),
        Err(_) => Err(MirrorError::Timeout(timeout)),
    }
}

impl CategoryMirror for GrpcBookMirror {
    fn mirror(
        &self,
        id: CategoryId,
        name: &CategoryName,
    ) -> impl Future<Output = MirrorResult<MirrorAck>> + Send {
        let mut client = self.client.clone();
        let timeout = self.timeout;
        let request = SaveCategoryRequest {
            category_id: i64::from(id.get()),
            name: name.to_string(),
        };

        async move {
            let response = with_deadline(timeout, client.save_category(request)).await?;
            acknowledge(response.success, response.message)
        }
    }

    fn retract(&self, id: CategoryId) -> impl Future<Output = MirrorResult<MirrorAck>> + Send {
        let mut client = self.client.clone();
        let timeout = self.timeout;
        let request = DeleteCategoryRequest {
            category_id: i64::from(id.get()),
        };

        async move {
            let response = with_deadline(timeout, client.delete_category(request)).await?;
            acknowledge(response.success, response.message)
        }
    }
}

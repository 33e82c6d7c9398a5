//! Client side of the book service's category mirror.
//!
//! Every local category write is propagated to the book service through
//! [`CategoryMirror`]. An error from either call means "not acknowledged",
//! which is not the same as "not applied": a request can reach the book
//! service and have its answer lost on the way back. Callers cannot tell
//! those cases apart and must not assume the remote side is unchanged.
//!
//! The RPCs carry no idempotency key. If a transport layer below the client
//! retries a call, the book service may apply the same save twice and nothing
//! here can detect it.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::domain::types::{CategoryId, CategoryName};

pub mod grpc;
pub mod proto;

pub use grpc::GrpcBookMirror;

/// Successful acknowledgement from the book service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorAck {
    pub message: String,
}

/// Reasons a mirror call was not acknowledged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MirrorError {
    /// The book service answered with `success = false`.
    #[error("book service rejected the request: {0}")]
    Rejected(String),
    /// The call failed at the transport or RPC level.
    #[error("book service call failed: {0}")]
    Transport(String),
    /// No answer arrived before the deadline.
    #[error("book service did not answer within {0:?}")]
    Timeout(Duration),
    /// The configured endpoint could not be parsed.
    #[error("invalid book service endpoint: {0}")]
    Endpoint(String),
}

pub type MirrorResult<T> = Result<T, MirrorError>;

impl From<tonic::Status> for MirrorError {
    fn from(status: tonic::Status) -> Self {
        MirrorError::Transport(format!("{:?}: {}", status.code(), status.message()))
    }
}

/// Propagates category state to the book service.
///
/// Each call is issued once; retry policy, if any, belongs to the transport.
/// Dropping the returned future abandons the call.
pub trait CategoryMirror {
    /// Push the full current state of a category.
    fn mirror(
        &self,
        id: CategoryId,
        name: &CategoryName,
    ) -> impl Future<Output = MirrorResult<MirrorAck>> + Send;

    /// Tell the book service the category was deleted.
    fn retract(&self, id: CategoryId) -> impl Future<Output = MirrorResult<MirrorAck>> + Send;
}

/// Turn the `(success, message)` pair returned by the book service into a
/// result.
pub(crate) fn acknowledge(success: bool, message: String) -> MirrorResult<MirrorAck> {
    if success {
        Ok(MirrorAck { message })
    } else {
        Err(MirrorError::Rejected(message))
    }
}

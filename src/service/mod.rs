// src/service/mod.rs

use crate::errors::Result;
use crate::models::{PipelineRequest, PipelineResponse, ServiceHealth};

pub mod http;

pub use http::HttpGenerationService;

/// The remote service that runs generate, review and refine in one call.
///
/// Implementations resolve to the parsed response and the request latency in
/// milliseconds. A response with `success: false` is still `Ok`; the caller
/// decides how to surface it.
pub trait GenerationService: Send + Sync {
    fn generate(
        &self,
        request: &PipelineRequest,
    ) -> impl std::future::Future<Output = Result<(PipelineResponse, u64)>> + Send;

    fn health(&self) -> impl std::future::Future<Output = Result<ServiceHealth>> + Send;
}

// src/service/http.rs

use reqwest::Client;
use std::time::Instant;

use crate::config::AppConfig;
use crate::errors::{PipelineError, Result};
use crate::models::{PipelineRequest, PipelineResponse, ServiceHealth};
use crate::service::GenerationService;

/// Talks to the generation service over HTTP.
#[derive(Clone)]
pub struct HttpGenerationService {
    client: Client,
    api_base: String,
}

impl HttpGenerationService {
    pub fn new(client: Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }

    /// Builds the client from configuration, applying the timeout if one is set.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(builder.build()?, config.api_base.clone()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }
}

impl GenerationService for HttpGenerationService {
    async fn generate(&self, request: &PipelineRequest) -> Result<(PipelineResponse, u64)> {
        let url = self.url("generate");

        log::info!("Calling generation service: {} (grade {}, topic {:?})", url, request.grade, request.topic);

        let start = Instant::now();

        let resp = self.client.post(&url).json(request).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        log::info!("Generation service responded {} ({}ms)", status, latency_ms);

        match serde_json::from_str::<PipelineResponse>(&body) {
            Ok(mut parsed) => {
                // A JSON error body still carries the message meant for the user.
                if !status.is_success() {
                    parsed.success = false;
                }
                Ok((parsed, latency_ms))
            }
            Err(_) if !status.is_success() => Err(PipelineError::ApiError {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(PipelineError::JsonParse(e)),
        }
    }

    async fn health(&self) -> Result<ServiceHealth> {
        let url = self.url("health");
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(PipelineError::ApiError {
                status: status.as_u16(),
                body: error_body,
            });
        }

        Ok(resp.json().await?)
    }
}

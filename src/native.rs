//! Native transport for the CLI and other non-browser embedders.

use std::time::Duration;

use futures::future::LocalBoxFuture;

use crate::transport::{ApiRequest, ApiResponse, ApiTransport, Method, TransportError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct NativeTransport {
    client: reqwest::Client,
}

impl NativeTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| TransportError {
                message: err.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl ApiTransport for NativeTransport {
    fn send(&self, request: ApiRequest) -> LocalBoxFuture<'static, Result<ApiResponse, TransportError>> {
        let client = self.client.clone();
        Box::pin(async move {
            let builder = match request.method {
                Method::Post => client.post(&request.url),
                Method::Put => client.put(&request.url),
            };
            let builder = match request.body {
                Some(body) => builder
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(body),
                None => builder,
            };
            let response = builder.send().await.map_err(|err| TransportError {
                message: err.to_string(),
            })?;

            let status = response.status();
            let status_text = status.canonical_reason().unwrap_or_default().to_string();
            let body = response.text().await.unwrap_or_default();
            Ok(ApiResponse {
                status: status.as_u16(),
                status_text,
                body,
            })
        })
    }
}

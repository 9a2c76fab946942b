//! Browser transport over the fetch API.

use futures::future::LocalBoxFuture;
use gloo::net::http::Request;

use crate::transport::{ApiRequest, ApiResponse, ApiTransport, Method, TransportError};

pub struct FetchTransport;

impl ApiTransport for FetchTransport {
    fn send(&self, request: ApiRequest) -> LocalBoxFuture<'static, Result<ApiResponse, TransportError>> {
        Box::pin(async move {
            let builder = match request.method {
                Method::Post => Request::post(&request.url),
                Method::Put => Request::put(&request.url),
            };
            let sent = match request.body {
                Some(body) => builder
                    .header("content-type", "application/json")
                    .body(body)
                    .map_err(|err| TransportError {
                        message: err.to_string(),
                    })?
                    .send()
                    .await,
                None => builder.send().await,
            };
            let response = sent.map_err(|err| TransportError {
                message: err.to_string(),
            })?;

            let status = response.status();
            let status_text = response.status_text();
            let body = response.text().await.unwrap_or_default();
            Ok(ApiResponse {
                status,
                status_text,
                body,
            })
        })
    }
}

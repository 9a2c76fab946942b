//! Session-scoped persistence client. Lazily creates the server-side
//! editing session and pushes document updates to it.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{LocalBoxFuture, Shared};
use futures::FutureExt;
use thiserror::Error;
use tracing::{debug, info, warn};

use todana_core::{
    ApiErrorBody, CabinetEntry, NestingRequest, NestingSolution, Project, SessionCreated, SessionId,
};

use crate::config::ClientConfig;
use crate::transport::{ApiRequest, ApiResponse, ApiTransport, Method};

/// The session-creation request failed. Cloneable because it is shared
/// across every caller waiting on the same in-flight creation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session creation failed: {message}")]
pub struct SessionCreationError {
    pub message: String,
}

/// A persist request failed after a session existed. The message comes
/// from the server's structured error body when present, otherwise from
/// the transport status text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyncError {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Session(#[from] SessionCreationError),
    #[error("sync failed: {0}")]
    Sync(#[from] SyncError),
}

type CreateFuture = Shared<LocalBoxFuture<'static, Result<SessionId, SessionCreationError>>>;

pub struct SessionClient {
    transport: Rc<dyn ApiTransport>,
    base_url: String,
    session: RefCell<Option<SessionId>>,
    inflight: RefCell<Option<CreateFuture>>,
}

impl SessionClient {
    pub fn new(transport: Rc<dyn ApiTransport>, config: &ClientConfig) -> Rc<Self> {
        Rc::new(Self {
            transport,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            session: RefCell::new(None),
            inflight: RefCell::new(None),
        })
    }

    /// The session id, if one has been established.
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.borrow().clone()
    }

    /// Adopt an id issued earlier (another run, another tool). No-op when a
    /// session is already held: the id is never reissued while non-null.
    pub fn adopt_session(&self, id: SessionId) {
        let mut session = self.session.borrow_mut();
        if session.is_none() {
            *session = Some(id);
        }
    }

    /// Idempotent: returns the held id without a network call when present,
    /// otherwise issues exactly one creation request. Concurrent callers
    /// before the first response resolves share that request, so at most
    /// one session is ever created. A failed attempt clears the in-flight
    /// slot; retrying is the caller's decision.
    pub async fn ensure_session(&self) -> Result<SessionId, SessionCreationError> {
        if let Some(id) = self.session.borrow().clone() {
            return Ok(id);
        }

        let create = {
            let mut inflight = self.inflight.borrow_mut();
            match inflight.as_ref() {
                Some(pending) => pending.clone(),
                None => {
                    let future = Self::create_session(Rc::clone(&self.transport), self.base_url.clone())
                        .boxed_local()
                        .shared();
                    *inflight = Some(future.clone());
                    future
                }
            }
        };

        let result = create.clone().await;

        {
            let mut inflight = self.inflight.borrow_mut();
            if inflight.as_ref().is_some_and(|pending| pending.ptr_eq(&create)) {
                *inflight = None;
            }
        }
        if let Ok(id) = &result {
            let mut session = self.session.borrow_mut();
            if session.is_none() {
                *session = Some(id.clone());
            }
        }
        result
    }

    async fn create_session(
        transport: Rc<dyn ApiTransport>,
        base_url: String,
    ) -> Result<SessionId, SessionCreationError> {
        debug!("creating editing session");
        let request = ApiRequest {
            method: Method::Post,
            url: format!("{base_url}/sessions"),
            body: None,
        };
        let response = transport
            .send(request)
            .await
            .map_err(|err| SessionCreationError { message: err.message })?;
        if !response.is_success() {
            return Err(SessionCreationError {
                message: error_message(&response),
            });
        }
        let created: SessionCreated =
            serde_json::from_str(&response.body).map_err(|err| SessionCreationError {
                message: format!("malformed session response: {err}"),
            })?;
        let id = SessionId::parse(&created.id).map_err(|err| SessionCreationError {
            message: err.to_string(),
        })?;
        info!(session = %id, "session established");
        Ok(id)
    }

    /// Persist the whole document.
    pub async fn update_project(&self, project: &Project) -> Result<(), ClientError> {
        let body = encode_body(project)?;
        self.request(Method::Put, "project".to_string(), Some(body))
            .await?;
        Ok(())
    }

    /// Persist one cabinet entry by its position in the sequence.
    pub async fn update_cabinet(&self, index: usize, entry: &CabinetEntry) -> Result<(), ClientError> {
        let body = encode_body(entry)?;
        self.request(Method::Put, format!("cabinets/{index}"), Some(body))
            .await?;
        Ok(())
    }

    /// Ask the nesting service to pack the cut list onto stock sheets.
    pub async fn request_nesting(&self, request: &NestingRequest) -> Result<NestingSolution, ClientError> {
        let body = encode_body(request)?;
        let value = self
            .request(Method::Post, "nesting".to_string(), Some(body))
            .await?
            .ok_or_else(|| SyncError {
                message: "empty nesting response".to_string(),
            })?;
        let solution = serde_json::from_value(value).map_err(|err| SyncError {
            message: format!("malformed nesting response: {err}"),
        })?;
        Ok(solution)
    }

    async fn request(
        &self,
        method: Method,
        path: String,
        body: Option<String>,
    ) -> Result<Option<serde_json::Value>, ClientError> {
        let id = self.ensure_session().await?;
        let request = ApiRequest {
            method,
            url: format!("{}/sessions/{}/{}", self.base_url, id, path),
            body,
        };
        debug!(method = request.method.as_str(), url = %request.url, "persist request");
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|err| SyncError { message: err.message })?;
        if !response.is_success() {
            let message = error_message(&response);
            warn!(status = response.status, %message, "persist request failed");
            return Err(SyncError { message }.into());
        }
        if response.body.is_empty() {
            return Ok(None);
        }
        let value = serde_json::from_str(&response.body).map_err(|err| SyncError {
            message: format!("malformed response body: {err}"),
        })?;
        Ok(Some(value))
    }
}

fn encode_body<T: serde::Serialize>(value: &T) -> Result<String, SyncError> {
    serde_json::to_string(value).map_err(|err| SyncError {
        message: format!("failed to encode request body: {err}"),
    })
}

fn error_message(response: &ApiResponse) -> String {
    if let Ok(body) = serde_json::from_str::<ApiErrorBody>(&response.body) {
        return body.error;
    }
    if response.status_text.is_empty() {
        format!("http status {}", response.status)
    } else {
        response.status_text.clone()
    }
}

//! HTTP seam for the session client. The client only sees this trait;
//! adapters exist for the browser fetch API ([`crate::fetch`]), native
//! use ([`crate::native`]), and tests ([`ScriptedTransport`]).

use futures::future::LocalBoxFuture;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

/// A request about to go over the wire. `body`, when present, is already
/// JSON and travels with a `content-type: application/json` header; an
/// absent body sends neither body nor header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response (network failure, refused
/// connection, malformed URL).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

pub trait ApiTransport {
    fn send(&self, request: ApiRequest) -> LocalBoxFuture<'static, Result<ApiResponse, TransportError>>;
}

#[cfg(feature = "testing")]
pub use scripted::ScriptedTransport;

#[cfg(feature = "testing")]
mod scripted {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use futures::channel::oneshot;
    use futures::future::LocalBoxFuture;

    use super::{ApiRequest, ApiResponse, ApiTransport, TransportError};

    type Reply = Result<ApiResponse, TransportError>;

    enum Scripted {
        Ready(Reply),
        Deferred(oneshot::Receiver<Reply>),
    }

    /// Test double: records every request and answers from a script, in
    /// order. A deferred entry stays pending until its sender fires, which
    /// lets tests hold a request open across concurrent callers.
    #[derive(Default)]
    pub struct ScriptedTransport {
        script: RefCell<VecDeque<Scripted>>,
        requests: RefCell<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Rc<Self> {
            Rc::new(Self::default())
        }

        pub fn push_response(&self, status: u16, status_text: &str, body: &str) {
            self.script
                .borrow_mut()
                .push_back(Scripted::Ready(Ok(ApiResponse {
                    status,
                    status_text: status_text.to_string(),
                    body: body.to_string(),
                })));
        }

        pub fn push_ok(&self, body: &str) {
            self.push_response(200, "OK", body);
        }

        pub fn push_transport_error(&self, message: &str) {
            self.script
                .borrow_mut()
                .push_back(Scripted::Ready(Err(TransportError {
                    message: message.to_string(),
                })));
        }

        /// Queue a reply that resolves only when the returned sender fires.
        pub fn push_deferred(&self) -> oneshot::Sender<Reply> {
            let (sender, receiver) = oneshot::channel();
            self.script
                .borrow_mut()
                .push_back(Scripted::Deferred(receiver));
            sender
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.borrow().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl ApiTransport for ScriptedTransport {
        fn send(&self, request: ApiRequest) -> LocalBoxFuture<'static, Reply> {
            self.requests.borrow_mut().push(request.clone());
            let next = self.script.borrow_mut().pop_front();
            Box::pin(async move {
                match next {
                    Some(Scripted::Ready(reply)) => reply,
                    Some(Scripted::Deferred(receiver)) => match receiver.await {
                        Ok(reply) => reply,
                        Err(_) => Err(TransportError {
                            message: "scripted reply dropped".to_string(),
                        }),
                    },
                    None => Err(TransportError {
                        message: format!("unscripted request: {} {}", request.method.as_str(), request.url),
                    }),
                }
            })
        }
    }
}

//! Client-side state layer for the todana cabinet designer: a reactive
//! project store, a lazily-established server editing session, bounded
//! undo/redo over full-document snapshots, and a toast queue. The nesting
//! optimizer runs server-side; this crate only talks to it.

pub mod config;
pub mod editor;
pub mod history;
pub mod reactive;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod toast;
pub mod transport;

#[cfg(target_arch = "wasm32")]
pub mod fetch;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;

pub use config::{ClientConfig, SyncFailurePolicy, API_BASE_DEFAULT};
pub use editor::{EditError, Editor};
pub use history::{History, HISTORY_LIMIT};
pub use reactive::{Cell, Derived, Subscription};
pub use scheduler::{ManualScheduler, Scheduler, TaskHandle};
pub use session::{ClientError, SessionClient, SessionCreationError, SyncError};
pub use store::ProjectStore;
pub use toast::{Severity, Toast, ToastQueue, TOAST_TTL_MS};
pub use transport::{ApiRequest, ApiResponse, ApiTransport, Method, TransportError};

#[cfg(feature = "testing")]
pub use transport::ScriptedTransport;

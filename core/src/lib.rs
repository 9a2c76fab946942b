pub mod cutlist;
pub mod nesting;
pub mod parts;
pub mod project;
pub mod protocol;
pub mod session_id;
pub mod snapshot;
pub mod validation;

pub use cutlist::{aggregate_rows, CutRow};
pub use nesting::{NestingRequest, NestingSolution, PlacedPart, SheetLayout, SheetSpec};
pub use parts::{derive_parts, Part, PartRole};
pub use project::{CabinetEntry, DoorStyle, Project};
pub use protocol::{ApiErrorBody, SessionCreated};
pub use session_id::{SessionId, SessionIdError};
pub use snapshot::{Snapshot, PROJECT_SNAPSHOT_VERSION};
pub use validation::{validate_project, ValidationIssue, ValidationReport};

use serde::{Deserialize, Serialize};

use crate::project::Project;

pub const PROJECT_SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SnapshotEnvelope {
    version: u32,
    project: Project,
}

/// An immutable serialized copy of the whole project document. Created by
/// the history engine; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn capture(project: &Project) -> Option<Snapshot> {
        let envelope = SnapshotEnvelope {
            version: PROJECT_SNAPSHOT_VERSION,
            project: project.clone(),
        };
        serde_json::to_string(&envelope).ok().map(Snapshot)
    }

    /// Decode back into a project. A version mismatch yields `None`.
    pub fn restore(&self) -> Option<Project> {
        let envelope: SnapshotEnvelope = serde_json::from_str(&self.0).ok()?;
        if envelope.version != PROJECT_SNAPSHOT_VERSION {
            return None;
        }
        Some(envelope.project)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

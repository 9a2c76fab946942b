//! Single source of truth for the currently edited project document. All
//! read access for rendering goes through the exposed cells; writes go
//! through the editing layer so local state and server state advance
//! together.

use todana_core::{NestingSolution, Project};

use crate::reactive::{Cell, Derived};

pub struct ProjectStore {
    project: Cell<Option<Project>>,
    /// Last revision the server confirmed; `None` until a persist succeeds.
    persisted_revision: Cell<Option<u64>>,
    /// Monotonic mutation counter. Never lowered by undo/redo so a revision
    /// number is never reused across history branches.
    revision_counter: std::cell::Cell<u64>,

    cabinet_count: Derived<usize>,
    part_count: Derived<usize>,
    dirty: Derived<bool>,
    has_validation_errors: Derived<bool>,
}

impl ProjectStore {
    pub fn new() -> Self {
        let project = Cell::new(None::<Project>);
        let persisted_revision = Cell::new(None::<u64>);

        let cabinet_count = Derived::map(&project, |project: &Option<Project>| {
            project.as_ref().map_or(0, Project::cabinet_count)
        });
        let part_count = Derived::map(&project, |project: &Option<Project>| {
            project.as_ref().map_or(0, |project| project.parts.len())
        });
        let dirty = Derived::zip(
            &project,
            &persisted_revision,
            |project: &Option<Project>, persisted: &Option<u64>| {
                project
                    .as_ref()
                    .is_some_and(|project| *persisted != Some(project.revision))
            },
        );
        let has_validation_errors = Derived::map(&project, |project: &Option<Project>| {
            project
                .as_ref()
                .and_then(|project| project.validation.as_ref())
                .is_some_and(|report| !report.errors.is_empty())
        });

        Self {
            project,
            persisted_revision,
            revision_counter: std::cell::Cell::new(0),
            cabinet_count,
            part_count,
            dirty,
            has_validation_errors,
        }
    }

    pub fn project(&self) -> &Cell<Option<Project>> {
        &self.project
    }

    pub fn current(&self) -> Option<Project> {
        self.project.get()
    }

    pub fn cabinet_count(&self) -> &Derived<usize> {
        &self.cabinet_count
    }

    pub fn part_count(&self) -> &Derived<usize> {
        &self.part_count
    }

    /// True while local state has diverged from the last server-confirmed
    /// revision. A freshly loaded document is dirty until its first persist
    /// confirms (the server has never seen it).
    pub fn dirty(&self) -> &Derived<bool> {
        &self.dirty
    }

    pub fn has_validation_errors(&self) -> &Derived<bool> {
        &self.has_validation_errors
    }

    pub fn load(&self, project: Project) {
        self.revision_counter
            .set(self.revision_counter.get().max(project.revision));
        self.project.set(Some(project));
    }

    pub fn clear(&self) {
        self.project.set(None);
        self.persisted_revision.set(None);
    }

    /// Apply a local mutation: bump the revision, refresh the derived
    /// collections, and notify. Returns false when no project is loaded.
    pub fn mutate(&self, f: impl FnOnce(&mut Project)) -> bool {
        let Some(mut project) = self.project.get() else {
            return false;
        };
        f(&mut project);
        let revision = self.revision_counter.get() + 1;
        self.revision_counter.set(revision);
        project.revision = revision;
        project.refresh_derived();
        self.project.set(Some(project));
        true
    }

    /// Replace the document verbatim (undo/redo path): no revision bump and
    /// no cache refresh, since the snapshot already carries both.
    pub fn restore(&self, project: Project) {
        self.revision_counter
            .set(self.revision_counter.get().max(project.revision));
        self.project.set(Some(project));
    }

    /// Record that the server confirmed `revision`. The mark tracks the
    /// last *confirmed* write, not the highest one: restoring and
    /// re-persisting an older snapshot makes that snapshot the clean state.
    pub fn mark_persisted(&self, revision: u64) {
        self.persisted_revision.set(Some(revision));
    }

    /// Cache a nesting solution from the server. Not a local edit: the
    /// revision is left alone so the dirty flag is unaffected.
    pub fn set_nesting(&self, solution: NestingSolution) {
        let Some(mut project) = self.project.get() else {
            return;
        };
        project.nesting = Some(solution);
        self.project.set(Some(project));
    }
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

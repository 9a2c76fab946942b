//! Bounded undo/redo history of full-document snapshots, decoupled from
//! the network layer. The editing layer checkpoints *before* applying a
//! mutating operation, so the undo stack holds pre-edit states.

use std::cell::RefCell;
use std::collections::VecDeque;

use todana_core::Snapshot;

use crate::reactive::{Cell, Derived};
use crate::store::ProjectStore;

pub const HISTORY_LIMIT: usize = 50;

pub struct History {
    undo: RefCell<VecDeque<Snapshot>>,
    redo: RefCell<Vec<Snapshot>>,
    depths: Cell<(usize, usize)>,
    can_undo: Derived<bool>,
    can_redo: Derived<bool>,
}

impl History {
    pub fn new() -> Self {
        let depths = Cell::new((0usize, 0usize));
        let can_undo = Derived::map(&depths, |(undo, _)| *undo > 0);
        let can_redo = Derived::map(&depths, |(_, redo)| *redo > 0);
        Self {
            undo: RefCell::new(VecDeque::new()),
            redo: RefCell::new(Vec::new()),
            depths,
            can_undo,
            can_redo,
        }
    }

    pub fn can_undo(&self) -> &Derived<bool> {
        &self.can_undo
    }

    pub fn can_redo(&self) -> &Derived<bool> {
        &self.can_redo
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.borrow().len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.borrow().len()
    }

    /// Checkpoint the current document. No-op when no project is loaded.
    /// Evicts the oldest snapshot beyond [`HISTORY_LIMIT`] and clears the
    /// redo stack: prior redo history is invalid once a new forward edit
    /// is checkpointed.
    pub fn push_snapshot(&self, store: &ProjectStore) {
        let Some(project) = store.current() else {
            return;
        };
        let Some(snapshot) = Snapshot::capture(&project) else {
            return;
        };
        let mut undo = self.undo.borrow_mut();
        undo.push_back(snapshot);
        if undo.len() > HISTORY_LIMIT {
            undo.pop_front();
        }
        drop(undo);
        self.redo.borrow_mut().clear();
        self.sync_depths();
    }

    /// Pop the newest undo snapshot, park the current document on the redo
    /// stack, and restore. Returns false (and changes nothing) when the
    /// undo stack is empty.
    pub fn undo(&self, store: &ProjectStore) -> bool {
        let Some(snapshot) = self.undo.borrow_mut().pop_back() else {
            return false;
        };
        if let Some(current) = store.current().as_ref().and_then(Snapshot::capture) {
            self.redo.borrow_mut().push(current);
        }
        if let Some(project) = snapshot.restore() {
            store.restore(project);
        }
        self.sync_depths();
        true
    }

    pub fn redo(&self, store: &ProjectStore) -> bool {
        let Some(snapshot) = self.redo.borrow_mut().pop() else {
            return false;
        };
        if let Some(current) = store.current().as_ref().and_then(Snapshot::capture) {
            let mut undo = self.undo.borrow_mut();
            undo.push_back(current);
            if undo.len() > HISTORY_LIMIT {
                undo.pop_front();
            }
        }
        if let Some(project) = snapshot.restore() {
            store.restore(project);
        }
        self.sync_depths();
        true
    }

    /// Discard a failed optimistic edit: restore the newest undo snapshot
    /// without touching the redo stack.
    pub fn revert_last(&self, store: &ProjectStore) -> bool {
        let Some(snapshot) = self.undo.borrow_mut().pop_back() else {
            return false;
        };
        if let Some(project) = snapshot.restore() {
            store.restore(project);
        }
        self.sync_depths();
        true
    }

    fn sync_depths(&self) {
        self.depths
            .set((self.undo.borrow().len(), self.redo.borrow().len()));
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

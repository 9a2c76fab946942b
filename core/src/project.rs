use serde::{Deserialize, Serialize};

use crate::cutlist::{aggregate_rows, CutRow};
use crate::nesting::NestingSolution;
use crate::parts::{derive_parts, Part};
use crate::validation::{validate_project, ValidationReport};

pub const PANEL_THICKNESS_DEFAULT_MM: f64 = 18.0;
pub const BACK_PANEL_THICKNESS_MM: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorStyle {
    None,
    Single,
    Double,
}

/// Parameters for one cabinet design. Entries are identified by their
/// position in the owning project's sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CabinetEntry {
    pub name: String,
    pub width_mm: f64,
    pub height_mm: f64,
    pub depth_mm: f64,
    pub panel_thickness_mm: f64,
    pub shelf_count: u32,
    pub door_style: DoorStyle,
    pub has_back_panel: bool,
}

impl Default for CabinetEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            width_mm: 600.0,
            height_mm: 720.0,
            depth_mm: 560.0,
            panel_thickness_mm: PANEL_THICKNESS_DEFAULT_MM,
            shelf_count: 1,
            door_style: DoorStyle::Single,
            has_back_panel: true,
        }
    }
}

/// The root document. `revision` counts local mutations; the cached
/// collections are recomputed by [`Project::refresh_derived`] and the
/// nesting solution is filled in from the nesting service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub revision: u64,
    pub cabinets: Vec<CabinetEntry>,
    pub in_progress: Option<CabinetEntry>,
    pub parts: Vec<Part>,
    pub cut_rows: Vec<CutRow>,
    pub nesting: Option<NestingSolution>,
    pub validation: Option<ValidationReport>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revision: 0,
            cabinets: Vec::new(),
            in_progress: None,
            parts: Vec::new(),
            cut_rows: Vec::new(),
            nesting: None,
            validation: None,
        }
    }

    /// Cabinet count as reported to the user: the committed sequence plus
    /// one if a cabinet is being edited in progress.
    pub fn cabinet_count(&self) -> usize {
        self.cabinets.len() + usize::from(self.in_progress.is_some())
    }

    /// Recompute the cached collections from the cabinet sequence.
    pub fn refresh_derived(&mut self) {
        self.parts = derive_parts(&self.cabinets);
        self.cut_rows = aggregate_rows(&self.parts);
        self.validation = Some(validate_project(self));
    }
}

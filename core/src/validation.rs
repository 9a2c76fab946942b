use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::nesting::{STOCK_SHEET_HEIGHT_MM, STOCK_SHEET_WIDTH_MM};
use crate::project::{CabinetEntry, Project};

/// Minimum interior clearance between shelves.
pub const MIN_SHELF_PITCH_MM: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Index into the cabinet sequence; `None` for project-level issues.
    pub cabinet: Option<usize>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate the committed cabinet sequence. An in-progress draft is not
/// validated until it is committed.
pub fn validate_project(project: &Project) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let mut seen_names = HashSet::new();
    for (index, cabinet) in project.cabinets.iter().enumerate() {
        validate_cabinet(index, cabinet, &mut errors, &mut warnings);
        let name = cabinet.name.trim();
        if !name.is_empty() && !seen_names.insert(name.to_string()) {
            warnings.push(ValidationIssue {
                cabinet: Some(index),
                message: format!("duplicate cabinet name '{name}'"),
            });
        }
    }

    ValidationReport { errors, warnings }
}

fn validate_cabinet(
    index: usize,
    cabinet: &CabinetEntry,
    errors: &mut Vec<ValidationIssue>,
    warnings: &mut Vec<ValidationIssue>,
) {
    let mut error = |message: String| {
        errors.push(ValidationIssue {
            cabinet: Some(index),
            message,
        });
    };

    if cabinet.width_mm <= 0.0 || cabinet.height_mm <= 0.0 || cabinet.depth_mm <= 0.0 {
        error("dimensions must be positive".to_string());
    }
    if cabinet.panel_thickness_mm <= 0.0 {
        error("panel thickness must be positive".to_string());
    } else if cabinet.panel_thickness_mm * 2.0 >= cabinet.width_mm {
        error("panel thickness leaves no interior width".to_string());
    }

    let interior_height = cabinet.height_mm - 2.0 * cabinet.panel_thickness_mm;
    if cabinet.shelf_count > 0
        && f64::from(cabinet.shelf_count) * MIN_SHELF_PITCH_MM > interior_height
    {
        error(format!(
            "{} shelves do not fit an interior of {:.0} mm",
            cabinet.shelf_count, interior_height
        ));
    }

    if cabinet.name.trim().is_empty() {
        warnings.push(ValidationIssue {
            cabinet: Some(index),
            message: "cabinet has no name".to_string(),
        });
    }
    // The largest panels are the sides (depth x height) and the
    // back/doors (width x height).
    let fits_sheet = |a: f64, b: f64| {
        a.max(b) <= STOCK_SHEET_WIDTH_MM && a.min(b) <= STOCK_SHEET_HEIGHT_MM
    };
    if !fits_sheet(cabinet.depth_mm, cabinet.height_mm)
        || !fits_sheet(cabinet.width_mm, cabinet.height_mm)
    {
        warnings.push(ValidationIssue {
            cabinet: Some(index),
            message: "panels exceed the standard stock sheet".to_string(),
        });
    }
}

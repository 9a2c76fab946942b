use std::fmt;

use serde::{Deserialize, Serialize};

use crate::project::{CabinetEntry, DoorStyle, BACK_PANEL_THICKNESS_MM};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartRole {
    Side,
    Top,
    Bottom,
    Shelf,
    Back,
    Door,
}

impl fmt::Display for PartRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PartRole::Side => "side",
            PartRole::Top => "top",
            PartRole::Bottom => "bottom",
            PartRole::Shelf => "shelf",
            PartRole::Back => "back",
            PartRole::Door => "door",
        };
        f.write_str(label)
    }
}

/// One panel to cut, derived from a cabinet's parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub cabinet_index: usize,
    pub role: PartRole,
    pub width_mm: f64,
    pub height_mm: f64,
    pub thickness_mm: f64,
}

/// Flatten the cabinet sequence into the panels of a frameless carcass:
/// two sides, top and bottom between the sides, shelves (shortened by the
/// back panel when one is present), an optional thin back, and doors per
/// the door style.
pub fn derive_parts(cabinets: &[CabinetEntry]) -> Vec<Part> {
    let mut parts = Vec::new();
    for (index, cabinet) in cabinets.iter().enumerate() {
        push_cabinet_parts(&mut parts, index, cabinet);
    }
    parts
}

fn push_cabinet_parts(parts: &mut Vec<Part>, index: usize, cabinet: &CabinetEntry) {
    let t = cabinet.panel_thickness_mm;
    let inner_width = (cabinet.width_mm - 2.0 * t).max(0.0);

    for _ in 0..2 {
        parts.push(Part {
            cabinet_index: index,
            role: PartRole::Side,
            width_mm: cabinet.depth_mm,
            height_mm: cabinet.height_mm,
            thickness_mm: t,
        });
    }
    parts.push(Part {
        cabinet_index: index,
        role: PartRole::Top,
        width_mm: inner_width,
        height_mm: cabinet.depth_mm,
        thickness_mm: t,
    });
    parts.push(Part {
        cabinet_index: index,
        role: PartRole::Bottom,
        width_mm: inner_width,
        height_mm: cabinet.depth_mm,
        thickness_mm: t,
    });

    let shelf_depth = if cabinet.has_back_panel {
        (cabinet.depth_mm - BACK_PANEL_THICKNESS_MM).max(0.0)
    } else {
        cabinet.depth_mm
    };
    for _ in 0..cabinet.shelf_count {
        parts.push(Part {
            cabinet_index: index,
            role: PartRole::Shelf,
            width_mm: inner_width,
            height_mm: shelf_depth,
            thickness_mm: t,
        });
    }

    if cabinet.has_back_panel {
        parts.push(Part {
            cabinet_index: index,
            role: PartRole::Back,
            width_mm: cabinet.width_mm,
            height_mm: cabinet.height_mm,
            thickness_mm: BACK_PANEL_THICKNESS_MM,
        });
    }

    match cabinet.door_style {
        DoorStyle::None => {}
        DoorStyle::Single => {
            parts.push(Part {
                cabinet_index: index,
                role: PartRole::Door,
                width_mm: cabinet.width_mm,
                height_mm: cabinet.height_mm,
                thickness_mm: t,
            });
        }
        DoorStyle::Double => {
            for _ in 0..2 {
                parts.push(Part {
                    cabinet_index: index,
                    role: PartRole::Door,
                    width_mm: cabinet.width_mm / 2.0,
                    height_mm: cabinet.height_mm,
                    thickness_mm: t,
                });
            }
        }
    }
}

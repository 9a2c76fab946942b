use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parts::{Part, PartRole};

/// One line of the cut list: identical panels grouped with a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutRow {
    pub role: PartRole,
    pub width_mm: f64,
    pub height_mm: f64,
    pub thickness_mm: f64,
    pub quantity: u32,
}

// Grouping key in tenths of a millimetre so float noise from the panel
// arithmetic cannot split a row.
fn dim_key(value: f64) -> i64 {
    (value * 10.0).round() as i64
}

pub fn aggregate_rows(parts: &[Part]) -> Vec<CutRow> {
    let mut grouped: BTreeMap<(u8, i64, i64, i64), CutRow> = BTreeMap::new();
    for part in parts {
        let key = (
            role_order(part.role),
            dim_key(part.width_mm),
            dim_key(part.height_mm),
            dim_key(part.thickness_mm),
        );
        grouped
            .entry(key)
            .and_modify(|row| row.quantity += 1)
            .or_insert_with(|| CutRow {
                role: part.role,
                width_mm: part.width_mm,
                height_mm: part.height_mm,
                thickness_mm: part.thickness_mm,
                quantity: 1,
            });
    }
    grouped.into_values().collect()
}

fn role_order(role: PartRole) -> u8 {
    match role {
        PartRole::Side => 0,
        PartRole::Top => 1,
        PartRole::Bottom => 2,
        PartRole::Shelf => 3,
        PartRole::Back => 4,
        PartRole::Door => 5,
    }
}

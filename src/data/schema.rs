use thiserror::Error;

use super::model::Stat;

// ---------------------------------------------------------------------------
// Required columns
// ---------------------------------------------------------------------------

/// The 11 columns every input table must provide, in canonical form.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "id",
    "name",
    "category_tag",
    "region",
    "total",
    "hp",
    "attack",
    "defense",
    "special_attack",
    "special_defense",
    "speed",
];

/// Headers of the original Pokédex export, accepted as aliases.
const ALIASES: [(&str, &str); 11] = [
    ("id", "id"),
    ("nombre", "name"),
    ("tipo", "category_tag"),
    ("país", "region"),
    ("total", "total"),
    ("hp", "hp"),
    ("ataque", "attack"),
    ("defensa", "defense"),
    ("sp. atk", "special_attack"),
    ("sp. def", "special_defense"),
    ("velocidad", "speed"),
];

/// Required columns absent from the input. Blocks the whole load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required columns [{}]; found [{}]", .missing.join(", "), .found.join(", "))]
pub struct SchemaError {
    pub missing: Vec<String>,
    pub found: Vec<String>,
}

/// Position of each required column in the raw header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub id: usize,
    pub name: usize,
    pub category_tag: usize,
    pub region: usize,
    stats: [usize; 7],
}

impl ColumnIndex {
    pub fn stat(&self, stat: Stat) -> usize {
        self.stats[stat as usize]
    }
}

/// Map a raw header onto its canonical column name, if it is one we know.
fn canonical(header: &str) -> Option<&'static str> {
    let h = header.trim().to_lowercase();
    if let Some(name) = REQUIRED_COLUMNS.iter().find(|c| **c == h) {
        return Some(name);
    }
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == h)
        .map(|(_, name)| *name)
}

/// Check that every required column is present and locate it.
///
/// The first header matching a column wins when the input repeats one.
pub fn validate(headers: &[String]) -> Result<ColumnIndex, SchemaError> {
    let mut positions: [Option<usize>; 11] = [None; 11];
    for (idx, header) in headers.iter().enumerate() {
        let Some(name) = canonical(header) else {
            continue;
        };
        if let Some(slot) = REQUIRED_COLUMNS.iter().position(|c| *c == name) {
            positions[slot].get_or_insert(idx);
        }
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .zip(positions.iter())
        .filter(|(_, pos)| pos.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError {
            missing,
            found: headers.to_vec(),
        });
    }

    let p = positions.map(|pos| pos.unwrap_or_default());
    Ok(ColumnIndex {
        id: p[0],
        name: p[1],
        category_tag: p[2],
        region: p[3],
        stats: [p[4], p[5], p[6], p[7], p[8], p[9], p[10]],
    })
}

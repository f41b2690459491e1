use serde::Serialize;

use super::model::{split_category_tag, Creature, RawTable, Stat, Stats};
use super::schema::ColumnIndex;

/// A cell that could not be read as a number. Non-fatal: the value is
/// recorded as missing and the row stays in the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoercionWarning {
    /// Zero-based data row (header excluded).
    pub row: usize,
    pub column: &'static str,
    pub value: String,
}

/// What a single numeric cell turned out to hold.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell {
    /// Empty, null or NaN. Already missing, nothing to report.
    Missing,
    Value(f64),
    /// Unparseable or infinite; the caller records a warning.
    Invalid,
}

fn parse_number(cell: Option<&str>) -> Cell {
    let Some(text) = cell.map(str::trim).filter(|t| !t.is_empty()) else {
        return Cell::Missing;
    };
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Value(v),
        Ok(v) if v.is_nan() => Cell::Missing,
        _ => Cell::Invalid,
    }
}

fn text(cell: Option<&Option<String>>) -> Option<String> {
    cell.and_then(|c| c.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Turn validated raw rows into typed records.
///
/// Never fails per cell: bad numbers become `None` plus a [`CoercionWarning`].
/// A missing category tag yields an empty `category_list`.
pub fn coerce_table(table: &RawTable, index: &ColumnIndex) -> (Vec<Creature>, Vec<CoercionWarning>) {
    let mut warnings = Vec::new();
    let mut creatures = Vec::with_capacity(table.rows.len());

    for (row_no, row) in table.rows.iter().enumerate() {
        let cell = |idx: usize| row.get(idx).and_then(|c| c.as_deref());

        let mut stats = Stats::default();
        for stat in Stat::ALL {
            let raw = cell(index.stat(stat));
            let value = match parse_number(raw) {
                Cell::Value(v) => Some(v),
                Cell::Missing => None,
                Cell::Invalid => {
                    warnings.push(CoercionWarning {
                        row: row_no,
                        column: stat.column_name(),
                        value: raw.unwrap_or_default().to_string(),
                    });
                    None
                }
            };
            stats.set(stat, value);
        }

        let id_raw = cell(index.id);
        let id = match id_raw.map(str::trim).filter(|t| !t.is_empty()) {
            None => None,
            Some(t) => match t.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warnings.push(CoercionWarning {
                        row: row_no,
                        column: "id",
                        value: t.to_string(),
                    });
                    None
                }
            },
        };

        let category_tag = text(row.get(index.category_tag));
        let category_list = category_tag
            .as_deref()
            .map(split_category_tag)
            .unwrap_or_default();

        creatures.push(Creature {
            id,
            name: text(row.get(index.name)).unwrap_or_default(),
            category_tag,
            region: text(row.get(index.region)),
            stats,
            category_list,
        });
    }

    if !warnings.is_empty() {
        log::warn!(
            "{} cell(s) could not be read as numbers and were left missing",
            warnings.len()
        );
    }

    (creatures, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{validate, REQUIRED_COLUMNS};

    fn table(rows: &[[&str; 11]]) -> RawTable {
        RawTable {
            headers: REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| {
                    r.iter()
                        .map(|c| (!c.is_empty()).then(|| c.to_string()))
                        .collect()
                })
                .collect(),
        }
    }

    fn coerce(rows: &[[&str; 11]]) -> (Vec<Creature>, Vec<CoercionWarning>) {
        let t = table(rows);
        let index = validate(&t.headers).unwrap();
        coerce_table(&t, &index)
    }

    #[test]
    fn parses_numbers_and_splits_tags() {
        let (rows, warnings) = coerce(&[[
            "6", "Charizard", "Fire/Flying", "Japan", "534", "78", "84", "78", "109", "85", "100",
        ]]);
        assert!(warnings.is_empty());
        let c = &rows[0];
        assert_eq!(c.id, Some(6));
        assert_eq!(c.stat(Stat::Total), Some(534.0));
        assert_eq!(c.stat(Stat::Speed), Some(100.0));
        assert_eq!(c.category_list, ["Fire", "Flying"]);
    }

    #[test]
    fn bad_cell_becomes_missing_with_warning() {
        let (rows, warnings) = coerce(&[[
            "1", "Bulbasaur", "Grass", "Chile", "318", "45", "??", "49", "65", "65", "45",
        ]]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stat(Stat::Attack), None);
        assert_eq!(rows[0].stat(Stat::Defense), Some(49.0));
        assert_eq!(
            warnings,
            [CoercionWarning { row: 0, column: "attack", value: "??".into() }]
        );
    }

    #[test]
    fn empty_cells_are_missing_without_warning() {
        let (rows, warnings) = coerce(&[["2", "Ivysaur", "", "", "", "", "", "", "", "", ""]]);
        assert!(warnings.is_empty());
        let c = &rows[0];
        assert_eq!(c.category_tag, None);
        assert!(c.category_list.is_empty());
        assert_eq!(c.region, None);
        assert!(Stat::ALL.iter().all(|s| c.stat(*s).is_none()));
    }

    #[test]
    fn non_finite_values_are_missing() {
        assert_eq!(parse_number(Some("NaN")), Cell::Missing);
        assert_eq!(parse_number(Some("inf")), Cell::Invalid);
        assert_eq!(parse_number(None), Cell::Missing);
        assert_eq!(parse_number(Some(" 42.5 ")), Cell::Value(42.5));
    }
}

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::coerce::coerce_table;
use super::model::{Dataset, RawTable};
use super::schema::validate;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a stats table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one record per line (default)
/// * `.json`    – `[{ "id": 1, "name": "...", ... }, ...]`
/// * `.parquet` – one column per field, any primitive type
///
/// The raw table is schema-checked (a [`SchemaError`](super::schema::SchemaError)
/// is returned inside the `anyhow::Error`) and then coerced.
pub fn load_file(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        bail!("data file not found: {}", path.display());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "parquet" | "pq" => read_parquet(path)?,
        "json" => read_json(path)?,
        "csv" | "" => read_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let dataset = dataset_from_raw(&raw)?;
    if dataset.is_empty() {
        log::warn!("{} has a header but no records", path.display());
    }
    log::info!(
        "Loaded {} records from {} with columns {:?}",
        dataset.len(),
        path.display(),
        raw.headers
    );
    Ok(dataset)
}

/// Validate and coerce an already parsed table.
pub fn dataset_from_raw(raw: &RawTable) -> Result<Dataset> {
    let index = validate(&raw.headers)?;
    let (creatures, warnings) = coerce_table(raw, &index);
    Ok(Dataset::from_creatures(creatures, warnings))
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Header row with column names, empty cells are missing values. Short
/// rows are accepted and their absent trailing cells are missing too.
fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(
            record
                .iter()
                .map(|v| (!v.is_empty()).then(|| v.to_string()))
                .collect(),
        );
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "id": 6, "name": "Charizard", "category_tag": "Fire/Flying", ... },
///   ...
/// ]
/// ```
///
/// Headers are the union of keys in first-seen order (`serde_json` is built
/// with `preserve_order`).
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).and_then(json_to_cell))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Every column is read as text; nulls are missing.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .enumerate()
                .map(|(col, array)| {
                    cell_to_string(array, row)
                        .with_context(|| format!("Row {row}: failed to read '{}'", headers[col]))
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }

    Ok(RawTable { headers, rows })
}

/// Render a single Arrow cell as text, `None` for null.
fn cell_to_string(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row)
            .to_string(),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row)
            .to_string(),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row)
            .to_string(),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row)
            .to_string(),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .context("expected BooleanArray")?
            .value(row)
            .to_string(),
        _ => array_value_to_string(col, row)?,
    };
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::Stat;
    use crate::data::schema::SchemaError;

    const HEADER: &str = "id,name,category_tag,region,total,hp,attack,defense,special_attack,special_defense,speed";

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        tmp.write_all(contents.as_bytes()).unwrap();
        tmp.flush().unwrap();
        tmp
    }

    #[test]
    fn loads_csv_with_missing_and_bad_cells() {
        let tmp = write_temp(
            ".csv",
            &format!(
                "{HEADER}\n\
                 1,Bulbasaur,Grass/Poison,Chile,318,45,49,49,65,65,45\n\
                 2,Missingno,,,abc,,,,,,\n"
            ),
        );
        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.creatures[0].category_list, ["Grass", "Poison"]);
        assert_eq!(ds.creatures[1].stat(Stat::Total), None);
        assert!(ds.creatures[1].category_list.is_empty());
        assert_eq!(ds.warnings.len(), 1);
        assert_eq!(ds.regions.len(), 1);
    }

    #[test]
    fn short_csv_row_loads_with_missing_stats() {
        let tmp = write_temp(
            ".csv",
            &format!(
                "{HEADER}\n\
                 1,Bulbasaur,Grass/Poison,Chile,318,45,49,49,65,65,45\n\
                 2,Squirtle,Water,Chile,310\n"
            ),
        );
        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.len(), 2);
        let c = &ds.creatures[1];
        assert_eq!(c.name, "Squirtle");
        assert_eq!(c.stat(Stat::Total), Some(310.0));
        assert_eq!(c.stat(Stat::Hp), None);
        assert_eq!(c.stat(Stat::Speed), None);
        assert!(ds.warnings.is_empty());
    }

    #[test]
    fn json_headers_keep_file_order() {
        let tmp = write_temp(".json", r#"[{"zeta": 1, "alpha": 2}]"#);
        let err = load_file(tmp.path()).unwrap_err();
        let schema = err.downcast_ref::<SchemaError>().unwrap();
        assert_eq!(schema.found, ["zeta", "alpha"]);
    }

    #[test]
    fn missing_column_surfaces_schema_error() {
        let tmp = write_temp(".csv", "id,name,total\n1,A,300\n");
        let err = load_file(tmp.path()).unwrap_err();
        let schema = err.downcast_ref::<SchemaError>().unwrap();
        assert!(schema.missing.contains(&"region".to_string()));
        assert_eq!(schema.found, ["id", "name", "total"]);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_file(Path::new("/nonexistent/pokedex.csv")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn loads_json_records() {
        let tmp = write_temp(
            ".json",
            r#"[
                {"ID": 25, "Nombre": "Pikachu", "Tipo": "Electric", "País": "Japan",
                 "Total": 320, "HP": 35, "Ataque": 55, "Defensa": 40,
                 "Sp. Atk": 50, "Sp. Def": 50, "Velocidad": 90},
                {"ID": 26, "Nombre": "Raichu", "Tipo": null, "País": "Japan",
                 "Total": 485.0, "HP": 60, "Ataque": 90, "Defensa": 55,
                 "Sp. Atk": 90, "Sp. Def": 80, "Velocidad": 110}
            ]"#,
        );
        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.creatures[0].id, Some(25));
        assert_eq!(ds.creatures[1].category_tag, None);
        assert_eq!(ds.creatures[1].stat(Stat::Total), Some(485.0));
        assert_eq!(ds.total_bounds, Some((320.0, 485.0)));
    }

    #[test]
    fn loads_parquet_with_nulls() {
        use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let mut fields = vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("category_tag", DataType::Utf8, true),
            Field::new("region", DataType::Utf8, true),
        ];
        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(vec![1, 2])),
            Arc::new(StringArray::from(vec!["Vulpix", "Psyduck"])),
            Arc::new(StringArray::from(vec![Some("Fire"), None])),
            Arc::new(StringArray::from(vec![Some("Japan"), Some("Peru")])),
        ];
        for stat in Stat::ALL {
            fields.push(Field::new(stat.column_name(), DataType::Float64, true));
            columns.push(Arc::new(Float64Array::from(vec![Some(299.0), None])));
        }
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let tmp = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(tmp.as_file(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.creatures[0].stat(Stat::Total), Some(299.0));
        assert_eq!(ds.creatures[1].stat(Stat::Total), None);
        assert_eq!(ds.creatures[1].category_tag, None);
        assert!(ds.warnings.is_empty());
    }

    #[test]
    fn rejects_unknown_extension() {
        let tmp = write_temp(".xlsx", "");
        assert!(load_file(tmp.path()).is_err());
    }
}

use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const CATEGORIES: [&str; 12] = [
    "Fire", "Water", "Grass", "Electric", "Flying", "Poison", "Rock", "Ground", "Psychic", "Ice",
    "Dragon", "Normal",
];

const REGIONS: [&str; 14] = [
    "Japan", "Chile", "Peru", "Mexico", "Spain", "France", "Canada", "Brazil", "Kenya", "India",
    "Norway", "Egypt", "Australia", "Argentina",
];

const SYLLABLES: [&str; 16] = [
    "cha", "zar", "bul", "ba", "squi", "tle", "pi", "ka", "chu", "mew", "dra", "go", "ni", "te",
    "ly", "on",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo + 1)
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.next_u64() as usize % items.len()]
    }
}

/// One output row. Stats are text so malformed cells can be written too.
#[derive(Serialize)]
struct Row {
    id: i64,
    name: String,
    category_tag: String,
    region: String,
    total: i64,
    hp: String,
    attack: String,
    defense: String,
    special_attack: String,
    special_defense: String,
    speed: String,
}

fn generate(rng: &mut SimpleRng, count: i64) -> Vec<Row> {
    (1..=count)
        .map(|id| {
            let mut name: String = (0..rng.range(2, 3)).map(|_| rng.pick(&SYLLABLES)).collect();
            if let Some(first) = name.get_mut(0..1) {
                first.make_ascii_uppercase();
            }

            let primary = rng.pick(&CATEGORIES);
            let category_tag = match (id % 23, rng.range(0, 2)) {
                (0, _) => String::new(),
                (_, 0) => {
                    let secondary = rng.pick(&CATEGORIES);
                    if secondary == primary {
                        primary.to_string()
                    } else {
                        format!("{primary}/{secondary}")
                    }
                }
                _ => primary.to_string(),
            };
            let region = if id % 41 == 0 {
                String::new()
            } else {
                rng.pick(&REGIONS).to_string()
            };

            let stats: Vec<u64> = (0..6).map(|_| rng.range(20, 150)).collect();
            let total = stats.iter().sum::<u64>() as i64;
            let cell = |i: usize| stats[i].to_string();

            Row {
                id,
                name,
                category_tag,
                region,
                total,
                hp: cell(0),
                attack: if id % 37 == 0 { "??".to_string() } else { cell(1) },
                defense: cell(2),
                special_attack: cell(3),
                special_defense: cell(4),
                speed: cell(5),
            }
        })
        .collect()
}

fn write_csv(path: &str, rows: &[Row]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Row]) -> anyhow::Result<()> {
    let text = |f: fn(&Row) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(
            rows.iter()
                .map(|r| Some(f(r)).filter(|s| !s.is_empty()))
                .collect::<Vec<_>>(),
        ))
    };

    let mut fields = vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("category_tag", DataType::Utf8, true),
        Field::new("region", DataType::Utf8, true),
        Field::new("total", DataType::Int64, false),
    ];
    for name in ["hp", "attack", "defense", "special_attack", "special_defense", "speed"] {
        fields.push(Field::new(name, DataType::Utf8, true));
    }
    let schema = Arc::new(Schema::new(fields));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))) as ArrayRef,
            text(|r| r.name.as_str()),
            text(|r| r.category_tag.as_str()),
            text(|r| r.region.as_str()),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.total))) as ArrayRef,
            text(|r| r.hp.as_str()),
            text(|r| r.attack.as_str()),
            text(|r| r.defense.as_str()),
            text(|r| r.special_attack.as_str()),
            text(|r| r.special_defense.as_str()),
            text(|r| r.speed.as_str()),
        ],
    )?;

    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, 400);

    write_csv("pokedex.csv", &rows)?;
    write_parquet("pokedex.parquet", &rows)?;

    println!("Wrote {} creatures to pokedex.csv and pokedex.parquet", rows.len());
    Ok(())
}

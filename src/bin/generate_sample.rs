//! Writes `dummy_data.csv` (and a Parquet copy) with every column the
//! analysis expects. Output is deterministic for a given seed.

use std::sync::Arc;

use anyhow::Context;
use arrow::array::{ArrayRef, BooleanArray, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ROWS: usize = 1000;
const CSV_PATH: &str = "dummy_data.csv";
const PARQUET_PATH: &str = "dummy_data.parquet";

const GENDERS: [&str; 3] = ["male", "female", "non-binary"];
const PLATFORMS: [&str; 3] = ["Instagram", "Facebook", "YouTube"];
const INTERESTS: [&str; 3] = ["Sports", "Travel", "Lifestyle"];
const LOCATIONS: [&str; 3] = ["United Kingdom", "Australia", "United States"];
const DEMOGRAPHICS: [&str; 3] = ["Urban", "Sub_Urban", "Rural"];
const PROFESSIONS: [&str; 3] = ["Student", "Software Engineer", "Marketer Manager"];

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
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }

    fn coin(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }
}

/// Booleans are written the way pandas spells them.
fn py_bool<S: serde::Serializer>(v: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(if *v { "True" } else { "False" })
}

#[derive(Serialize)]
struct UserRow {
    age: i64,
    gender: &'static str,
    time_spent: i64,
    platform: &'static str,
    interests: &'static str,
    location: &'static str,
    demographics: &'static str,
    profession: &'static str,
    income: i64,
    #[serde(serialize_with = "py_bool")]
    indebt: bool,
    #[serde(rename = "isHomeOwner", serialize_with = "py_bool")]
    is_home_owner: bool,
    #[serde(rename = "Owns_Car", serialize_with = "py_bool")]
    owns_car: bool,
}

fn generate(rng: &mut SimpleRng, n: usize) -> Vec<UserRow> {
    (0..n)
        .map(|_| UserRow {
            age: rng.range(18, 64),
            gender: rng.pick(&GENDERS),
            time_spent: rng.range(1, 9),
            platform: rng.pick(&PLATFORMS),
            interests: rng.pick(&INTERESTS),
            location: rng.pick(&LOCATIONS),
            demographics: rng.pick(&DEMOGRAPHICS),
            profession: rng.pick(&PROFESSIONS),
            income: rng.range(10_000, 20_000),
            indebt: rng.coin(),
            is_home_owner: rng.coin(),
            owns_car: rng.coin(),
        })
        .collect()
}

fn write_csv(rows: &[UserRow]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("Failed to create CSV file")?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[UserRow]) -> anyhow::Result<()> {
    let ints = |f: fn(&UserRow) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let strs = |f: fn(&UserRow) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let bools = |f: fn(&UserRow) -> bool| -> ArrayRef {
        Arc::new(BooleanArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<(&str, DataType, ArrayRef)> = vec![
        ("age", DataType::Int64, ints(|r| r.age)),
        ("gender", DataType::Utf8, strs(|r| r.gender)),
        ("time_spent", DataType::Int64, ints(|r| r.time_spent)),
        ("platform", DataType::Utf8, strs(|r| r.platform)),
        ("interests", DataType::Utf8, strs(|r| r.interests)),
        ("location", DataType::Utf8, strs(|r| r.location)),
        ("demographics", DataType::Utf8, strs(|r| r.demographics)),
        ("profession", DataType::Utf8, strs(|r| r.profession)),
        ("income", DataType::Int64, ints(|r| r.income)),
        ("indebt", DataType::Boolean, bools(|r| r.indebt)),
        ("isHomeOwner", DataType::Boolean, bools(|r| r.is_home_owner)),
        ("Owns_Car", DataType::Boolean, bools(|r| r.owns_car)),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, ty, _)| Field::new(*name, ty.clone(), false))
            .collect::<Vec<_>>(),
    ));
    let arrays = columns.into_iter().map(|(_, _, array)| array).collect();
    let batch =
        RecordBatch::try_new(schema.clone(), arrays).context("Failed to create RecordBatch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("Failed to create output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("Failed to create writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close writer")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, ROWS);

    write_csv(&rows)?;
    write_parquet(&rows)?;

    println!("Wrote {} users to {CSV_PATH} and {PARQUET_PATH}", rows.len());
    Ok(())
}

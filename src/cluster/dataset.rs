use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, Trim};
use rand::Rng;

pub type Point = [f64; 2];

const X_COLUMN: &str = "len1";
const Y_COLUMN: &str = "wid1";

/// `count` points spread uniformly over the unit square.
pub fn random_points(count: usize, rng: &mut impl Rng) -> Vec<Point> {
    (0..count).map(|_| [rng.random::<f64>(), rng.random::<f64>()]).collect()
}

pub fn read_points(path: &Path) -> Result<Vec<Point>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read data file {}", path.display()))?;
    parse_points(&text).with_context(|| format!("invalid data file {}", path.display()))
}

/// Tab-separated table with a header row. Decimal commas are accepted.
fn parse_points(text: &str) -> Result<Vec<Point>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader.headers().context("failed to read header row")?;
    if header.is_empty() {
        bail!("no header row");
    }
    let column = |name: &str| {
        header
            .iter()
            .position(|c| c == name)
            .with_context(|| format!("missing column {:?}", name))
    };
    let (x_at, y_at) = (column(X_COLUMN)?, column(Y_COLUMN)?);

    let mut points = Vec::new();
    for record in reader.records() {
        let record = record.context("malformed row")?;
        let line = record.position().map_or(0, |p| p.line());
        let field = |at: usize| -> Result<f64> {
            let raw = record.get(at).unwrap_or("");
            raw.replace(',', ".")
                .parse()
                .with_context(|| format!("line {}: bad number {:?}", line, raw))
        };
        points.push([field(x_at)?, field(y_at)?]);
    }
    Ok(points)
}

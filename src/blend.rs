use crate::{
    error::{OrogenError, OrogenResult},
    map::HeightMap,
};

/// A pixel-wise combinator of two height maps.
///
/// The result always has `left`'s dimensions. Where `right` has no cell at a
/// position, the variant's fallback value stands in for `right`'s
/// contribution, chosen so the left value wins at out-of-range cells.
pub trait BlendMode: Send + Sync {
    fn blend(&self, left: &HeightMap, right: &HeightMap) -> HeightMap;

    /// Flat record for persistence.
    fn record(&self) -> BlendRecord;
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlendRecord {
    pub kind: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

impl BlendRecord {
    fn bare(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            params: serde_json::Value::Null,
        }
    }
}

fn combine(
    left: &HeightMap,
    right: &HeightMap,
    fallback: f64,
    op: impl Fn(f64, f64) -> f64,
) -> HeightMap {
    let mut result = left.clone();
    result.for_each_mut(|row, col, cell| {
        let b = right.value_or(row, col, fallback);
        *cell = op(*cell, b);
    });
    result
}

/// Keeps the lower of the two values. Fallback 1.0.
#[derive(Clone, Copy, Debug, Default)]
pub struct Darken;

impl BlendMode for Darken {
    fn blend(&self, left: &HeightMap, right: &HeightMap) -> HeightMap {
        combine(left, right, 1.0, f64::min)
    }

    fn record(&self) -> BlendRecord {
        BlendRecord::bare("darken")
    }
}

/// Keeps the higher of the two values. Fallback 0.0.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lighten;

impl BlendMode for Lighten {
    fn blend(&self, left: &HeightMap, right: &HeightMap) -> HeightMap {
        combine(left, right, 0.0, f64::max)
    }

    fn record(&self) -> BlendRecord {
        BlendRecord::bare("lighten")
    }
}

/// Multiplies the two values. Fallback 1.0 (the neutral element).
#[derive(Clone, Copy, Debug, Default)]
pub struct Multiply;

impl BlendMode for Multiply {
    fn blend(&self, left: &HeightMap, right: &HeightMap) -> HeightMap {
        combine(left, right, 1.0, |a, b| a * b)
    }

    fn record(&self) -> BlendRecord {
        BlendRecord::bare("multiply")
    }
}

/// Inverted multiply: `1 - (1-a)(1-b)`. Fallback 0.0 (the neutral element).
#[derive(Clone, Copy, Debug, Default)]
pub struct Screen;

impl BlendMode for Screen {
    fn blend(&self, left: &HeightMap, right: &HeightMap) -> HeightMap {
        combine(left, right, 0.0, |a, b| 1.0 - (1.0 - a) * (1.0 - b))
    }

    fn record(&self) -> BlendRecord {
        BlendRecord::bare("screen")
    }
}

pub fn from_record(record: &BlendRecord) -> OrogenResult<Box<dyn BlendMode>> {
    let kind = record.kind.trim().to_ascii_lowercase();
    if kind.is_empty() {
        return Err(OrogenError::missing_argument("blend kind must be non-empty"));
    }
    match kind.as_str() {
        "darken" => Ok(Box::new(Darken)),
        "lighten" => Ok(Box::new(Lighten)),
        "multiply" => Ok(Box::new(Multiply)),
        "screen" => Ok(Box::new(Screen)),
        other => Err(OrogenError::schema(format!("unknown blend kind '{other}'"))),
    }
}

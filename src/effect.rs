use crate::{
    error::{OrogenError, OrogenResult},
    map::HeightMap,
};

/// A pure single-grid transform, applied in sequence by an effect chain.
///
/// `apply` never mutates its input and does not clamp the output unless
/// clamping is the effect's purpose.
pub trait Effect: Send + Sync {
    fn apply(&self, input: &HeightMap) -> HeightMap;

    /// Flat record for persistence.
    fn record(&self) -> EffectRecord;
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EffectRecord {
    pub kind: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

fn map_cells(input: &HeightMap, f: impl Fn(f64) -> f64) -> HeightMap {
    let mut out = input.clone();
    out.for_each_mut(|_, _, cell| *cell = f(*cell));
    out
}

/// Mirrors the height profile: `v -> 1 - v`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Invert;

impl Effect for Invert {
    fn apply(&self, input: &HeightMap) -> HeightMap {
        map_cells(input, |v| 1.0 - v)
    }

    fn record(&self) -> EffectRecord {
        EffectRecord {
            kind: "invert".to_string(),
            params: serde_json::Value::Null,
        }
    }
}

/// Multiplies every cell by a constant factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    pub factor: f64,
}

impl Effect for Scale {
    fn apply(&self, input: &HeightMap) -> HeightMap {
        map_cells(input, |v| v * self.factor)
    }

    fn record(&self) -> EffectRecord {
        EffectRecord {
            kind: "scale".to_string(),
            params: serde_json::json!({ "factor": self.factor }),
        }
    }
}

/// Adds a constant delta to every cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offset {
    pub delta: f64,
}

impl Effect for Offset {
    fn apply(&self, input: &HeightMap) -> HeightMap {
        map_cells(input, |v| v + self.delta)
    }

    fn record(&self) -> EffectRecord {
        EffectRecord {
            kind: "offset".to_string(),
            params: serde_json::json!({ "delta": self.delta }),
        }
    }
}

/// Clamps every cell into `[min, max]`. `min` must be <= `max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clamp {
    pub min: f64,
    pub max: f64,
}

impl Default for Clamp {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl Effect for Clamp {
    fn apply(&self, input: &HeightMap) -> HeightMap {
        map_cells(input, |v| v.clamp(self.min, self.max))
    }

    fn record(&self) -> EffectRecord {
        EffectRecord {
            kind: "clamp".to_string(),
            params: serde_json::json!({ "min": self.min, "max": self.max }),
        }
    }
}

/// Rescales the map's `[min, max]` onto `[0, 1]`; a constant map is left
/// unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Normalize;

impl Effect for Normalize {
    fn apply(&self, input: &HeightMap) -> HeightMap {
        let mut out = input.clone();
        out.normalize();
        out
    }

    fn record(&self) -> EffectRecord {
        EffectRecord {
            kind: "normalize".to_string(),
            params: serde_json::Value::Null,
        }
    }
}

pub fn from_record(record: &EffectRecord) -> OrogenResult<Box<dyn Effect>> {
    let kind = record.kind.trim().to_ascii_lowercase();
    if kind.is_empty() {
        return Err(OrogenError::missing_argument("effect kind must be non-empty"));
    }
    match kind.as_str() {
        "invert" => Ok(Box::new(Invert)),
        "scale" => {
            let factor = get_f64(&record.params, "factor")?;
            Ok(Box::new(Scale { factor }))
        }
        "offset" => {
            let delta = get_f64(&record.params, "delta")?;
            Ok(Box::new(Offset { delta }))
        }
        "clamp" => {
            let min = get_f64(&record.params, "min")?;
            let max = get_f64(&record.params, "max")?;
            if min > max {
                return Err(OrogenError::schema("clamp min must be <= max"));
            }
            Ok(Box::new(Clamp { min, max }))
        }
        "normalize" => Ok(Box::new(Normalize)),
        other => Err(OrogenError::schema(format!("unknown effect kind '{other}'"))),
    }
}

fn get_f64(params: &serde_json::Value, key: &str) -> OrogenResult<f64> {
    let Some(v) = params.get(key) else {
        return Err(OrogenError::missing_argument(format!(
            "effect param '{key}'"
        )));
    };
    let Some(n) = v.as_f64() else {
        return Err(OrogenError::schema(format!(
            "effect param '{key}' must be a number"
        )));
    };
    if !n.is_finite() {
        return Err(OrogenError::schema(format!(
            "effect param '{key}' must be finite"
        )));
    }
    Ok(n)
}

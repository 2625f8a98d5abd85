//! The fixed-order feature vector submitted through the form.

use crate::error::{ServingError, ServingResult};
use serde::{Deserialize, Serialize};

/// Number of features every artifact must be fitted on.
pub const NUM_FEATURES: usize = 14;

/// Form field names, in the order the artifacts were fitted on.
pub const FIELD_NAMES: [&str; NUM_FEATURES] = [
    "edad",
    "tipo_empleado",
    "fnlwgt",
    "educacion",
    "educacion_num",
    "estado_civil",
    "ocupacion",
    "relacion",
    "raza",
    "sexo",
    "capital_ganado",
    "capital_perdido",
    "hr_por_semana",
    "pais",
];

/// One person's pre-encoded attributes.
///
/// Values are opaque codes; no range checks are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector([i64; NUM_FEATURES]);

impl FeatureVector {
    /// Wrap already-converted values.
    pub fn new(values: [i64; NUM_FEATURES]) -> Self {
        Self(values)
    }

    /// Build a vector from decoded `(name, value)` form pairs.
    ///
    /// Fields are resolved in [`FIELD_NAMES`] order, so the first missing or
    /// malformed field decides the error. Repeated fields keep their first value
    /// and unknown fields are ignored.
    pub fn from_form<K, V>(pairs: &[(K, V)]) -> ServingResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut values = [0i64; NUM_FEATURES];
        for (slot, name) in values.iter_mut().zip(FIELD_NAMES) {
            let raw = pairs
                .iter()
                .find(|(k, _)| k.as_ref() == name)
                .map(|(_, v)| v.as_ref())
                .ok_or_else(|| ServingError::missing_field(name))?;
            *slot = parse_field(name, raw)?;
        }
        Ok(Self(values))
    }

    /// Build a vector from a comma separated list of 14 integers.
    pub fn parse_csv(input: &str) -> ServingResult<Self> {
        let parts: Vec<&str> = input.split(',').collect();
        if parts.len() != NUM_FEATURES {
            return Err(ServingError::dimension_mismatch(
                "feature vector",
                NUM_FEATURES,
                parts.len(),
            ));
        }
        let mut values = [0i64; NUM_FEATURES];
        for ((slot, name), raw) in values.iter_mut().zip(FIELD_NAMES).zip(parts) {
            *slot = parse_field(name, raw)?;
        }
        Ok(Self(values))
    }

    /// Raw integer values in field order.
    pub fn values(&self) -> &[i64; NUM_FEATURES] {
        &self.0
    }

    /// Values widened to `f64` for the scaler.
    pub fn to_f64(&self) -> Vec<f64> {
        self.0.iter().map(|&v| v as f64).collect()
    }

    /// Look up a value by field name.
    pub fn get(&self, name: &str) -> Option<i64> {
        FIELD_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|idx| self.0[idx])
    }
}

fn parse_field(name: &str, raw: &str) -> ServingResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ServingError::invalid_field(name, raw))
}

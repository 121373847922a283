//! Keyed curves that drive variable stripe spacing.

use serde::{Deserialize, Serialize};

/// A curve sampled over normalized travel distance `t` in `[0, 1]`.
pub trait SpacingCurve {
    /// Value at `t`, or `None` when the curve cannot produce one.
    fn sample(&self, t: f64) -> Option<f64>;

    fn has_keys(&self) -> bool;
}

/// One key of a [`KeyedCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f64,
    pub value: f64,
}

/// Piecewise-linear curve through a set of keys.
///
/// Keys are kept sorted by time. Sampling before the first key or after the
/// last one holds the end value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct KeyedCurve {
    keys: Vec<CurveKey>,
}

impl KeyedCurve {
    pub fn new(keys: impl IntoIterator<Item = CurveKey>) -> Self {
        let mut keys: Vec<CurveKey> = keys
            .into_iter()
            .filter(|k| k.time.is_finite() && k.value.is_finite())
            .collect();
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// A curve that returns `value` everywhere.
    pub fn constant(value: f64) -> Self {
        Self::new([CurveKey { time: 0.0, value }])
    }

    /// Build from `(time, value)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(pairs.iter().map(|&(time, value)| CurveKey { time, value }))
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }
}

impl SpacingCurve for KeyedCurve {
    fn sample(&self, t: f64) -> Option<f64> {
        if !t.is_finite() {
            return None;
        }
        let first = self.keys.first()?;
        let last = self.keys.last()?;

        if t <= first.time {
            return Some(first.value);
        }
        if t >= last.time {
            return Some(last.value);
        }

        // partition_point finds the first key strictly after t
        let hi = self.keys.partition_point(|k| k.time <= t);
        let (a, b) = (self.keys[hi - 1], self.keys[hi]);
        let span = b.time - a.time;
        if span <= 0.0 {
            return Some(b.value);
        }
        let f = (t - a.time) / span;
        Some(a.value + (b.value - a.value) * f)
    }

    fn has_keys(&self) -> bool {
        !self.keys.is_empty()
    }
}

impl From<Vec<CurveKey>> for KeyedCurve {
    fn from(keys: Vec<CurveKey>) -> Self {
        Self::new(keys)
    }
}

impl From<KeyedCurve> for Vec<CurveKey> {
    fn from(curve: KeyedCurve) -> Self {
        curve.keys
    }
}

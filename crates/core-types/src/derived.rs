use serde::{Deserialize, Serialize};

/// A single point of a derived series (market share or shock).
///
/// `value` is `None` when the underlying division was undefined (zero
/// denominator). Callers must handle the undefined case explicitly instead of
/// relying on NaN arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedPoint {
    pub model: String,
    pub scenario: String,
    pub region: String,
    pub year: i32,
    pub value: Option<f64>,
}

/// A named series of derived values sharing the same unit, produced by the
/// metrics engine from a sub-panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSeries {
    /// Series label, e.g. `"Market Share"` or `"shock"`.
    pub name: String,
    /// `"%"` in percent mode, `"ratio"` otherwise.
    pub unit: String,
    pub points: Vec<DerivedPoint>,
}

impl DerivedSeries {
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Looks up the point for a (region, year) pair, if present.
    pub fn point_at(&self, region: &str, year: i32) -> Option<&DerivedPoint> {
        self.points
            .iter()
            .find(|p| p.region == region && p.year == year)
    }
}

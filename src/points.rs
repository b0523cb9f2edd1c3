//! Sample points and their construction from a decoded input record.
//!
//! The input record is a JSON object of the form
//!
//! ```json
//! {
//!     "keys": { "n": 4, "k": 3 },
//!     "1": { "base": "10", "value": "4" },
//!     "2": { "base": "2", "value": "111" }
//! }
//! ```
//!
//! where every key other than `keys` is the x-coordinate of a point and
//! `value` is its y-coordinate written in radix `base`.
//!
//! Entries that are not objects, or that lack `base` or `value`, are skipped
//! and listed in [`PointSet::skipped`]. A missing or non-numeric `keys.n` is
//! replaced by the number of points read. All other defects are errors.

use ahash::HashSet;
use rug::Integer;
use serde_json::{Map, Value};
use smartstring::{LazyCompact, SmartString};
use tracing::{debug, warn};

use crate::{
    error::ReconstructionError,
    parser::{decode_value, digits_within_base},
};

/// A sample point with the label of the record it was read from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Point {
    pub x: Integer,
    pub y: Integer,
    pub label: SmartString<LazyCompact>,
}

impl Point {
    pub fn new(x: impl Into<Integer>, y: impl Into<Integer>, label: &str) -> Point {
        Point {
            x: x.into(),
            y: y.into(),
            label: label.into(),
        }
    }
}

/// Why a per-point record was left out of a [`PointSet`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SkipReason {
    NotAnObject,
    MissingBase,
    MissingValue,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SkippedRecord {
    pub label: SmartString<LazyCompact>,
    pub reason: SkipReason,
}

/// The points of a reconstruction problem in input order, together with the
/// declared total `n` and the number of points `k` that determine the polynomial.
#[derive(Clone, Debug)]
pub struct PointSet {
    pub declared_total: usize,
    pub required: usize,
    pub points: Vec<Point>,
    pub skipped: Vec<SkippedRecord>,
}

impl PointSet {
    pub fn new(declared_total: usize, required: usize, points: Vec<Point>) -> PointSet {
        PointSet {
            declared_total,
            required,
            points,
            skipped: vec![],
        }
    }

    /// Parse a JSON document and build the point set from it.
    pub fn from_json_str(input: &str) -> Result<PointSet, ReconstructionError> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| ReconstructionError::malformed(format!("invalid JSON: {}", e)))?;
        PointSet::from_json(&value)
    }

    /// Build the point set from a JSON record. Points keep the key order of the document.
    pub fn from_json(record: &Value) -> Result<PointSet, ReconstructionError> {
        let record = record
            .as_object()
            .ok_or_else(|| ReconstructionError::malformed("expected a JSON object"))?;

        let keys = record
            .get("keys")
            .ok_or_else(|| ReconstructionError::malformed("missing keys"))?
            .as_object()
            .ok_or_else(|| ReconstructionError::malformed("keys is not an object"))?;

        let declared_total = keys
            .get("n")
            .and_then(parse_unsigned)
            .and_then(|n| usize::try_from(n).ok());
        let required = parse_count(keys, "k")?;
        if required == 0 {
            return Err(ReconstructionError::malformed("k must be positive"));
        }

        let mut set = PointSet::new(declared_total.unwrap_or(0), required, vec![]);

        for (label, entry) in record {
            if label == "keys" {
                continue;
            }

            let Some(entry) = entry.as_object() else {
                set.skip(label, SkipReason::NotAnObject);
                continue;
            };
            let Some(base) = entry.get("base") else {
                set.skip(label, SkipReason::MissingBase);
                continue;
            };
            let Some(value) = entry.get("value") else {
                set.skip(label, SkipReason::MissingValue);
                continue;
            };

            let x = parse_x(label)?;

            let base = parse_base(base, label)?;
            let digits = value.as_str().ok_or_else(|| {
                ReconstructionError::malformed(format!("value of point {} is not a string", label))
            })?;

            if !digits_within_base(digits, base) {
                warn!(
                    "Point {}: digits {:?} exceed base {}; decoding anyway",
                    label, digits, base
                );
            }

            let y = decode_value(digits, base)?;
            set.points.push(Point {
                x,
                y,
                label: label.as_str().into(),
            });
        }

        let Some(declared_total) = declared_total else {
            debug!(
                "keys.n is missing or not a count; using the {} points found",
                set.points.len()
            );
            set.declared_total = set.points.len();
            return Ok(set);
        };

        if set.points.len() != declared_total {
            debug!(
                "Declared {} points, found {}",
                set.declared_total,
                set.points.len()
            );
        }

        Ok(set)
    }

    fn skip(&mut self, label: &str, reason: SkipReason) {
        debug!("Skipping record {}: {:?}", label, reason);
        self.skipped.push(SkippedRecord {
            label: label.into(),
            reason,
        });
    }

    /// The number of distinct x-coordinates among the points.
    pub fn distinct_x_count(&self) -> usize {
        self.points.iter().map(|p| &p.x).collect::<HashSet<_>>().len()
    }
}

fn parse_count(keys: &Map<String, Value>, field: &str) -> Result<usize, ReconstructionError> {
    let v = keys
        .get(field)
        .ok_or_else(|| ReconstructionError::malformed(format!("missing keys.{}", field)))?;

    parse_unsigned(v)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            ReconstructionError::malformed(format!("keys.{} is not a non-negative integer", field))
        })
}

/// Parse a signed decimal x-coordinate. Inner whitespace and digit separators,
/// which `Integer::from_str` would skip, are rejected.
fn parse_x(label: &str) -> Result<Integer, ReconstructionError> {
    let s = label.trim();
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ReconstructionError::malformed(format!(
            "x-coordinate {:?} is not an integer",
            label
        )));
    }

    s.parse().map_err(|_| {
        ReconstructionError::malformed(format!("x-coordinate {:?} is not an integer", label))
    })
}

fn parse_base(v: &Value, label: &str) -> Result<u32, ReconstructionError> {
    match parse_unsigned(v) {
        Some(b) if (2..=36).contains(&b) => Ok(b as u32),
        Some(b) => Err(ReconstructionError::malformed(format!(
            "base {} of point {} is outside 2..=36",
            b, label
        ))),
        None => Err(ReconstructionError::malformed(format!(
            "base of point {} is not numeric",
            label
        ))),
    }
}

/// Accept a JSON integer or a string holding a decimal integer.
fn parse_unsigned(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use rug::Integer;

    use super::{Point, PointSet, SkipReason};
    use crate::error::ReconstructionError;

    #[test]
    fn build() {
        let set = PointSet::from_json_str(
            r#"{
                "keys": { "n": 4, "k": 3 },
                "1": { "base": "10", "value": "4" },
                "2": { "base": "2", "value": "111" },
                "3": { "base": 10, "value": "12" },
                "6": { "base": "4", "value": "213" }
            }"#,
        )
        .unwrap();

        assert_eq!(set.declared_total, 4);
        assert_eq!(set.required, 3);
        assert!(set.skipped.is_empty());
        assert_eq!(
            set.points,
            vec![
                Point::new(1, 4, "1"),
                Point::new(2, 7, "2"),
                Point::new(3, 12, "3"),
                Point::new(6, 39, "6"),
            ]
        );
    }

    #[test]
    fn string_counts_and_document_order() {
        let set = PointSet::from_json_str(
            r#"{
                "3": { "base": "10", "value": "9" },
                "keys": { "n": "3", "k": "2" },
                "-1": { "base": "10", "value": "1" },
                "2": { "base": "10", "value": "4" }
            }"#,
        )
        .unwrap();

        assert_eq!(set.required, 2);
        let xs: Vec<_> = set.points.iter().map(|p| p.x.clone()).collect();
        assert_eq!(
            xs,
            vec![Integer::from(3), Integer::from(-1), Integer::from(2)]
        );
        assert_eq!(set.points[1].label.as_str(), "-1");
    }

    #[test]
    fn lenient_records() {
        let set = PointSet::from_json_str(
            r#"{
                "keys": { "n": 4, "k": 1 },
                "1": { "base": "10", "value": "4" },
                "2": { "value": "7" },
                "3": { "base": "10" },
                "4": "junk"
            }"#,
        )
        .unwrap();

        assert_eq!(set.points.len(), 1);
        let reasons: Vec<_> = set
            .skipped
            .iter()
            .map(|s| (s.label.as_str(), s.reason))
            .collect();
        assert_eq!(
            reasons,
            vec![
                ("2", SkipReason::MissingBase),
                ("3", SkipReason::MissingValue),
                ("4", SkipReason::NotAnObject),
            ]
        );
    }

    #[test]
    fn malformed() {
        let cases = [
            r#"[1, 2]"#,
            r#"{ "1": { "base": "10", "value": "4" } }"#,
            r#"{ "keys": { "n": 1 } }"#,
            r#"{ "keys": { "n": 1, "k": 1 }, "1_0": { "base": "10", "value": "4" } }"#,
            r#"{ "keys": { "n": 1, "k": 1 }, "1 0": { "base": "10", "value": "4" } }"#,
            r#"{ "keys": { "n": 1, "k": 1 }, "-": { "base": "10", "value": "4" } }"#,
            r#"{ "keys": { "n": 1, "k": 1 }, "--1": { "base": "10", "value": "4" } }"#,
            r#"{ "keys": { "n": 1, "k": "three" } }"#,
            r#"{ "keys": { "n": 1, "k": 0 } }"#,
            r#"{ "keys": { "n": 1, "k": -2 } }"#,
            r#"{ "keys": { "n": 1, "k": 1 }, "x": { "base": "10", "value": "4" } }"#,
            r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": "ten", "value": "4" } }"#,
            r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": "1", "value": "0" } }"#,
            r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": "37", "value": "0" } }"#,
            r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": "10", "value": 4 } }"#,
            r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": "10", "value": "4.5" } }"#,
            r#"{ "keys": "#,
        ];

        for c in cases {
            assert!(
                matches!(
                    PointSet::from_json_str(c),
                    Err(ReconstructionError::MalformedInput(_))
                ),
                "accepted {}",
                c
            );
        }
    }

    #[test]
    fn declared_total_is_optional() {
        let set = PointSet::from_json_str(
            r#"{
                "keys": { "k": 1 },
                "1": { "base": "10", "value": "4" },
                "2": { "base": "10", "value": "5" }
            }"#,
        )
        .unwrap();
        assert_eq!(set.declared_total, 2);
        assert_eq!(set.required, 1);

        let set = PointSet::from_json_str(
            r#"{
                "keys": { "n": "many", "k": 1 },
                "1": { "base": "10", "value": "4" }
            }"#,
        )
        .unwrap();
        assert_eq!(set.declared_total, 1);
    }

    #[test]
    fn signed_x_coordinates() {
        let set = PointSet::from_json_str(
            r#"{
                "keys": { "n": 2, "k": 1 },
                "+12": { "base": "10", "value": "4" },
                " -3 ": { "base": "10", "value": "5" }
            }"#,
        )
        .unwrap();
        assert_eq!(set.points[0].x, 12);
        assert_eq!(set.points[1].x, -3);
    }

    #[test]
    fn distinct_x() {
        let set = PointSet::new(
            3,
            2,
            vec![
                Point::new(1, 1, "a"),
                Point::new(1, 2, "b"),
                Point::new(2, 4, "c"),
            ],
        );
        assert_eq!(set.distinct_x_count(), 2);
    }
}

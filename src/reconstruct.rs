//! Search for the subset of points that determines the polynomial.
//!
//! All `k`-subsets of the points are tried in lexicographic order of their
//! indices and the first one whose interpolating polynomial has integer
//! coefficients wins. If there is none, the first `k` points with distinct
//! x-coordinates are interpolated instead and the result is marked as a
//! rational fallback.

use ahash::HashSet;
use rayon::prelude::*;
use smallvec::SmallVec;
use smartstring::{LazyCompact, SmartString};
use tracing::{debug, info, instrument, trace, warn};

use crate::{
    combinatorics::{binomial, CombinationIterator},
    error::ReconstructionError,
    points::{Point, PointSet},
    poly::Polynomial,
    solve::solve_vandermonde,
};

pub type Subset = SmallVec<[usize; 8]>;

/// Settings of the subset search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchSettings {
    /// Evaluate combinations on the rayon thread pool.
    pub parallel: bool,
    /// The number of consecutive combinations evaluated together in parallel mode.
    pub batch_size: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            parallel: false,
            batch_size: 1024,
        }
    }
}

impl SearchSettings {
    /// Read the settings from `POLYRECON_PARALLEL` and `POLYRECON_BATCH_SIZE`.
    pub fn from_env() -> SearchSettings {
        SearchSettings::from_vars(
            std::env::var("POLYRECON_PARALLEL").ok().as_deref(),
            std::env::var("POLYRECON_BATCH_SIZE").ok().as_deref(),
        )
    }

    fn from_vars(parallel: Option<&str>, batch_size: Option<&str>) -> SearchSettings {
        let mut s = SearchSettings::default();

        if let Some(p) = parallel {
            s.parallel = matches!(
                p.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }

        if let Some(b) = batch_size {
            match b.trim().parse::<usize>() {
                Ok(b) if b > 0 => s.batch_size = b,
                _ => warn!("Ignoring invalid POLYRECON_BATCH_SIZE {:?}", b),
            }
        }

        s
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconstructionKind {
    /// All coefficients are integers.
    Integer,
    /// No subset gave integer coefficients; the polynomial through the first
    /// `k` points with distinct x-coordinates is returned instead.
    RationalFallback,
}

/// The reconstructed polynomial and the subset of points it was computed from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconstruction {
    pub polynomial: Polynomial,
    pub kind: ReconstructionKind,
    /// Indices into [`PointSet::points`].
    pub subset: Subset,
}

impl Reconstruction {
    /// The labels of the points the polynomial was computed from.
    pub fn labels<'a>(&self, set: &'a PointSet) -> Vec<&'a SmartString<LazyCompact>> {
        self.subset.iter().map(|&i| &set.points[i].label).collect()
    }

    /// The number of points of `set` that lie on the polynomial.
    pub fn count_agreeing(&self, set: &PointSet) -> usize {
        set.points
            .iter()
            .filter(|p| {
                let y = self.polynomial.evaluate(&p.x);
                y.is_integer() && y.numerator() == p.y
            })
            .count()
    }
}

/// Reconstruct the polynomial of degree `k - 1` determined by `set`.
#[instrument(skip_all, fields(n = set.points.len(), k = set.required))]
pub fn reconstruct(
    set: &PointSet,
    settings: &SearchSettings,
) -> Result<Reconstruction, ReconstructionError> {
    let k = set.required;
    if k == 0 {
        return Err(ReconstructionError::malformed("k must be positive"));
    }

    if set.points.len() < k {
        return Err(ReconstructionError::InsufficientPoints {
            required: k,
            available: set.points.len(),
        });
    }

    debug!(
        "Searching {} combinations",
        binomial(set.points.len(), k)
    );

    let found = if settings.parallel {
        search_parallel(&set.points, k, settings.batch_size.max(1))?
    } else {
        search_sequential(&set.points, k)?
    };

    if let Some((subset, polynomial)) = found {
        info!("Integer solution from points {:?}", subset);
        return Ok(Reconstruction {
            polynomial,
            kind: ReconstructionKind::Integer,
            subset,
        });
    }

    debug!(
        "No integer subset among {} points with {} distinct x-coordinates",
        set.points.len(),
        set.distinct_x_count()
    );
    let subset = fallback_subset(&set.points, k)?;
    warn!(
        "No subset gives integer coefficients; using points {:?}",
        subset
    );

    let chosen: Vec<_> = subset.iter().map(|&i| &set.points[i]).collect();
    let polynomial = solve_vandermonde(&chosen)?.ok_or(ReconstructionError::UnsolvableSystem)?;

    Ok(Reconstruction {
        polynomial,
        kind: ReconstructionKind::RationalFallback,
        subset,
    })
}

/// Solve the system for the points at `indices`. Returns `None` if two points
/// share an x-coordinate, the system is singular or a coefficient is not an integer.
fn try_subset(
    points: &[Point],
    indices: &[usize],
) -> Result<Option<Polynomial>, ReconstructionError> {
    let mut seen = HashSet::default();
    if !indices.iter().all(|&i| seen.insert(&points[i].x)) {
        trace!("Skipping {:?}: colliding x-coordinates", indices);
        return Ok(None);
    }

    let chosen: SmallVec<[&Point; 8]> = indices.iter().map(|&i| &points[i]).collect();
    match solve_vandermonde(&chosen)? {
        Some(p) if p.is_integral() => Ok(Some(p)),
        Some(_) => {
            trace!("Skipping {:?}: non-integer coefficients", indices);
            Ok(None)
        }
        None => Ok(None),
    }
}

fn search_sequential(
    points: &[Point],
    k: usize,
) -> Result<Option<(Subset, Polynomial)>, ReconstructionError> {
    let mut it = CombinationIterator::new(points.len(), k);
    while let Some(c) = it.next() {
        if let Some(p) = try_subset(points, c)? {
            return Ok(Some((SmallVec::from_slice(c), p)));
        }
    }

    Ok(None)
}

/// Evaluate batches of consecutive combinations in parallel. Within a batch the
/// lowest-index outcome wins, so the result equals that of [`search_sequential`].
fn search_parallel(
    points: &[Point],
    k: usize,
    batch_size: usize,
) -> Result<Option<(Subset, Polynomial)>, ReconstructionError> {
    let mut it = CombinationIterator::new(points.len(), k);
    let mut batch: Vec<Subset> = Vec::with_capacity(batch_size);

    loop {
        batch.clear();
        while batch.len() < batch_size {
            match it.next() {
                Some(c) => batch.push(SmallVec::from_slice(c)),
                None => break,
            }
        }

        if batch.is_empty() {
            return Ok(None);
        }

        let first = batch
            .par_iter()
            .find_map_first(|c| match try_subset(points, c) {
                Ok(None) => None,
                Ok(Some(p)) => Some(Ok((c.clone(), p))),
                Err(e) => Some(Err(e)),
            });

        if let Some(r) = first {
            return r.map(Some);
        }
    }
}

/// The first `k` points with pairwise distinct x-coordinates, in input order.
fn fallback_subset(points: &[Point], k: usize) -> Result<Subset, ReconstructionError> {
    let mut seen = HashSet::default();
    let mut subset = Subset::new();
    for (i, p) in points.iter().enumerate() {
        if seen.insert(&p.x) {
            subset.push(i);
            if subset.len() == k {
                return Ok(subset);
            }
        }
    }

    Err(ReconstructionError::InsufficientDistinctX {
        required: k,
        distinct: subset.len(),
    })
}

#[cfg(test)]
mod test {
    use super::{fallback_subset, reconstruct, ReconstructionKind, SearchSettings};
    use crate::{
        error::ReconstructionError,
        points::{Point, PointSet},
    };

    fn set(k: usize, points: &[(i64, i64)]) -> PointSet {
        PointSet::new(
            points.len(),
            k,
            points
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Point::new(x, y, &format!("p{}", i)))
                .collect(),
        )
    }

    fn both_modes(s: &PointSet) -> Vec<Result<super::Reconstruction, ReconstructionError>> {
        [
            SearchSettings::default(),
            SearchSettings {
                parallel: true,
                batch_size: 2,
            },
            SearchSettings {
                parallel: true,
                batch_size: 1000,
            },
        ]
        .iter()
        .map(|settings| reconstruct(s, settings))
        .collect()
    }

    #[test]
    fn exactly_k_points() {
        let s = set(3, &[(1, 3), (2, 7), (3, 13)]);
        let r = reconstruct(&s, &SearchSettings::default()).unwrap();
        assert_eq!(r.kind, ReconstructionKind::Integer);
        assert_eq!(r.polynomial.to_string(), "1 1 1");
        assert_eq!(r.subset.as_slice(), &[0, 1, 2]);
        assert_eq!(r.count_agreeing(&s), 3);
    }

    #[test]
    fn skips_non_integer_subsets() {
        // (5, 13) is off the line y = 2x + 2 and any pair with it has a fractional slope
        let s = set(2, &[(5, 13), (1, 4), (3, 8)]);
        for r in both_modes(&s) {
            let r = r.unwrap();
            assert_eq!(r.kind, ReconstructionKind::Integer);
            assert_eq!(r.subset.as_slice(), &[1, 2]);
            assert_eq!(r.polynomial.to_string(), "2 2");
            assert_eq!(
                r.labels(&s).iter().map(|l| l.as_str()).collect::<Vec<_>>(),
                vec!["p1", "p2"]
            );
        }
    }

    #[test]
    fn lexicographically_first_integer_subset_wins() {
        // {0, 1} gives 1 + x, {0, 2} gives 1 + 2x; both are integral
        let s = set(2, &[(0, 1), (1, 2), (1, 3), (2, 5)]);
        for r in both_modes(&s) {
            let r = r.unwrap();
            assert_eq!(r.subset.as_slice(), &[0, 1]);
            assert_eq!(r.polynomial.to_string(), "1 1");
        }
    }

    #[test]
    fn colliding_subsets_are_skipped() {
        let s = set(2, &[(1, 3), (1, 4), (2, 6)]);
        let r = reconstruct(&s, &SearchSettings::default()).unwrap();
        assert_eq!(r.subset.as_slice(), &[0, 2]);
        assert_eq!(r.polynomial.to_string(), "0 3");
    }

    #[test]
    fn rational_fallback() {
        // every pair has slope 1/2, 1/3 or 2/5
        let s = set(2, &[(0, 0), (2, 1), (5, 2)]);
        for r in both_modes(&s) {
            let r = r.unwrap();
            assert_eq!(r.kind, ReconstructionKind::RationalFallback);
            assert_eq!(r.subset.as_slice(), &[0, 1]);
            assert_eq!(r.polynomial.to_string(), "0 1/2");
        }
    }

    #[test]
    fn fallback_skips_repeated_x() {
        let s = set(2, &[(0, 0), (0, 3), (0, 6), (3, 1)]);
        assert_eq!(fallback_subset(&s.points, 2).unwrap().as_slice(), &[0, 3]);

        let r = reconstruct(&s, &SearchSettings::default()).unwrap();
        assert_eq!(r.kind, ReconstructionKind::RationalFallback);
        assert_eq!(r.subset.as_slice(), &[0, 3]);
        assert_eq!(r.polynomial.to_string(), "0 1/3");
    }

    #[test]
    fn insufficient_points() {
        let s = set(3, &[(1, 3), (2, 7)]);
        assert!(matches!(
            reconstruct(&s, &SearchSettings::default()),
            Err(ReconstructionError::InsufficientPoints {
                required: 3,
                available: 2
            })
        ));
    }

    #[test]
    fn insufficient_distinct_x() {
        let s = set(3, &[(1, 3), (1, 4), (2, 7)]);
        for r in both_modes(&s) {
            assert!(matches!(
                r,
                Err(ReconstructionError::InsufficientDistinctX {
                    required: 3,
                    distinct: 2
                })
            ));
        }
    }

    #[test]
    fn zero_required_points() {
        let s = set(0, &[(1, 3)]);
        assert!(matches!(
            reconstruct(&s, &SearchSettings::default()),
            Err(ReconstructionError::MalformedInput(_))
        ));
    }

    #[test]
    fn settings_from_vars() {
        assert_eq!(SearchSettings::from_vars(None, None), SearchSettings::default());

        let s = SearchSettings::from_vars(Some("TRUE"), Some("64"));
        assert!(s.parallel);
        assert_eq!(s.batch_size, 64);

        let s = SearchSettings::from_vars(Some("0"), Some("zero"));
        assert!(!s.parallel);
        assert_eq!(s.batch_size, SearchSettings::default().batch_size);
    }
}

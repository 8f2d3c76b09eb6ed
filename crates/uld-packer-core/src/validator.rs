//! Geometric and capacity validator. Grounded in
//! `original_source/validator.py`'s `SolutionValidator`, with the cost
//! formula corrected to match `SPEC_FULL.md` §4.9
//! (`total = K * priority_uld_count + sum(delay)`), since `validator.py`'s
//! own `total_score` omits the `K` multiplier that `ocm.py`'s `cost()`
//! applies, a discrepancy in the original, not a detail to preserve.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Cuboid;
use crate::model::{Package, Uld};

/// A single geometric or capacity violation found during validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Violation {
    OutOfBounds { package_id: String, uld_id: u32 },
    Intersection { a: String, b: String, uld_id: u32 },
    WeightExceeded { uld_id: u32, loaded: i64, capacity: i64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::OutOfBounds { package_id, uld_id } => {
                write!(f, "package {package_id} lies outside ULD {uld_id}")
            }
            Violation::Intersection { a, b, uld_id } => {
                write!(f, "packages {a} and {b} intersect in ULD {uld_id}")
            }
            Violation::WeightExceeded { uld_id, loaded, capacity } => {
                write!(f, "ULD {uld_id} weight {loaded} exceeds capacity {capacity}")
            }
        }
    }
}

/// Outcome of validating a full solution: whether it is valid, any
/// violations found, and the cost breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
    pub priority_uld_count: usize,
    pub economy_delay_cost: i64,
    pub total_cost: i64,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            write!(f, "valid solution, total_cost={}", self.total_cost)
        } else {
            write!(f, "{} violation(s): ", self.violations.len())?;
            for (i, v) in self.violations.iter().enumerate() {
                if i > 0 {
                    write!(f, "; ")?;
                }
                write!(f, "{v}")?;
            }
            Ok(())
        }
    }
}

/// Validates containment, pairwise non-intersection, and weight capacity
/// for every ULD, then reports the cost decomposition.
///
/// Early-exits are not used: every violation is collected so a caller can
/// report the whole picture rather than just the first failure.
pub fn validate(packages: &[Package], ulds: &[Uld], k: i64) -> ValidationReport {
    let mut violations = Vec::new();
    let mut by_uld: HashMap<u32, Vec<&Package>> = HashMap::new();
    for p in packages {
        if let Some(placement) = p.placement {
            by_uld.entry(placement.uld_id).or_default().push(p);
        }
    }

    for uld in ulds {
        let Some(loaded) = by_uld.get(&uld.id) else {
            continue;
        };
        let bounds = uld.bounds();

        for p in loaded {
            let placement = p.placement.unwrap();
            let cuboid = Cuboid {
                min: placement.min_corner,
                max: placement.max_corner,
            };
            if !cuboid.fits_inside(&bounds) {
                violations.push(Violation::OutOfBounds {
                    package_id: p.id.clone(),
                    uld_id: uld.id,
                });
            }
        }

        for i in 0..loaded.len() {
            for j in (i + 1)..loaded.len() {
                let a = loaded[i].placement.unwrap();
                let b = loaded[j].placement.unwrap();
                let ca = Cuboid {
                    min: a.min_corner,
                    max: a.max_corner,
                };
                let cb = Cuboid {
                    min: b.min_corner,
                    max: b.max_corner,
                };
                if ca.intersects(&cb) {
                    violations.push(Violation::Intersection {
                        a: loaded[i].id.clone(),
                        b: loaded[j].id.clone(),
                        uld_id: uld.id,
                    });
                }
            }
        }

        let total_weight: i64 = loaded.iter().map(|p| p.weight).sum();
        if total_weight > uld.weight_capacity {
            violations.push(Violation::WeightExceeded {
                uld_id: uld.id,
                loaded: total_weight,
                capacity: uld.weight_capacity,
            });
        }
    }

    let priority_uld_count = priority_score(packages);
    let economy_delay_cost = economy_score(packages);
    let total_cost = k * priority_uld_count as i64 + economy_delay_cost;

    ValidationReport {
        valid: violations.is_empty(),
        violations,
        priority_uld_count,
        economy_delay_cost,
        total_cost,
    }
}

/// Number of distinct ULDs holding at least one loaded priority package.
pub fn priority_score(packages: &[Package]) -> usize {
    let mut ulds: HashSet<u32> = HashSet::new();
    for p in packages {
        if p.is_priority() {
            if let Some(placement) = p.placement {
                ulds.insert(placement.uld_id);
            }
        }
    }
    ulds.len()
}

/// Sum of `delay` over every unloaded economy package.
pub fn economy_score(packages: &[Package]) -> i64 {
    packages
        .iter()
        .filter(|p| !p.is_priority() && !p.is_loaded())
        .map(|p| p.delay)
        .sum()
}

//! Crainic dimension-grouping order: bundles packages that share a
//! dimension value and emits them together with a preferred "up" axis.
//!
//! Grounded in `original_source/package.py`'s `crainic_sorting` /
//! `single_dimension_match_by_index`: when more than one of a neighbor's
//! three dimensions equals the match key, only the *first* matching index is
//! recorded; this quirk is preserved deliberately (see `SPEC_FULL.md` §9).

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Dims, Package};

/// One emitted ordering entry: the package's index into the slice passed to
/// [`crainic_order`], paired with its preferred 1-based up-axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedPackage {
    pub index: usize,
    pub z_index: u8,
}

/// For dimension `dims[key_axis]` (1-based `key_axis`), returns the first
/// dimension index (1-based) of `candidate` equal to the key value, if any.
fn first_matching_axis(candidate: &Dims, key_value: i64) -> Option<u8> {
    let arr = [candidate.length, candidate.width, candidate.height];
    arr.iter()
        .position(|&v| v == key_value)
        .map(|i| (i + 1) as u8)
}

/// Groups `packages` by shared dimension values and returns an emission
/// order together with each package's chosen up-axis.
///
/// `group_desc` controls whether groups are emitted in descending (true) or
/// ascending (false) order of their key value; within a group, order is
/// shuffled using `rng`.
pub fn crainic_order(packages: &[Package], group_desc: bool, rng: &mut impl Rng) -> Vec<OrderedPackage> {
    let n = packages.len();
    let mut matched = vec![false; n];
    let mut groups: Vec<(i64, Vec<OrderedPackage>)> = Vec::new();

    for i in 0..n {
        if matched[i] {
            continue;
        }
        let dims_i = [packages[i].dims.length, packages[i].dims.width, packages[i].dims.height];

        let mut best_axis = 0usize;
        let mut best_count = -1i64;
        let mut best_matches: Vec<(usize, u8)> = Vec::new();

        for (axis_idx, &key_value) in dims_i.iter().enumerate() {
            let mut matches = Vec::new();
            for j in 0..n {
                if j == i || matched[j] {
                    continue;
                }
                if let Some(z) = first_matching_axis(&packages[j].dims, key_value) {
                    matches.push((j, z));
                }
            }
            if matches.len() as i64 > best_count {
                best_count = matches.len() as i64;
                best_axis = axis_idx;
                best_matches = matches;
            }
        }

        let key_value = dims_i[best_axis];
        let z_i = (best_axis + 1) as u8;
        matched[i] = true;
        let mut group = vec![OrderedPackage { index: i, z_index: z_i }];
        for &(j, z_j) in &best_matches {
            matched[j] = true;
            group.push(OrderedPackage { index: j, z_index: z_j });
        }
        group.shuffle(rng);
        groups.push((key_value, group));
    }

    if group_desc {
        groups.sort_by(|a, b| b.0.cmp(&a.0));
    } else {
        groups.sort_by_key(|g| g.0);
    }

    groups.into_iter().flat_map(|(_, g)| g).collect()
}

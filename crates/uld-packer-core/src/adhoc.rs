//! Ad-hoc residual fill: places packages the GA stages left unloaded into
//! whatever free corners remain, trying every orientation.
//!
//! Grounded in `original_source/ocm.py`'s `adhoc_additions` and
//! `uld.py`'s `fit_in_package` / `cuboid.py`'s `find_placement`, simplified
//! to the single-corner-as-min-corner search `SPEC_FULL.md` §4.1 specifies.

use rand::Rng;

use crate::geometry::{find_free_corner, Cuboid};
use crate::model::{Dims, Package, Placement, Uld};

/// The six axis-aligned permutations of a dimension triple.
fn all_orientations(dims: &Dims) -> [Dims; 6] {
    let l = dims.length;
    let w = dims.width;
    let h = dims.height;
    [
        Dims::new(l, w, h),
        Dims::new(l, h, w),
        Dims::new(w, l, h),
        Dims::new(w, h, l),
        Dims::new(h, l, w),
        Dims::new(h, w, l),
    ]
}

/// Per-ULD occupant state used only by the ad-hoc stage.
struct UldOccupants {
    uld: Uld,
    occupants: Vec<Cuboid>,
    weight_used: i64,
}

impl UldOccupants {
    fn remaining_weight(&self) -> i64 {
        self.uld.weight_capacity - self.weight_used
    }
}

/// Fills as many still-unplaced packages as possible into free corners
/// across `ulds`, given the placements already committed by the GA stages.
/// Mutates `packages` in place, setting `placement` on any package it
/// succeeds in loading.
#[tracing::instrument(skip_all, fields(n_packages = packages.len(), n_ulds = ulds.len()))]
pub fn fill(packages: &mut [Package], ulds: &[Uld], rng: &mut impl Rng) {
    let mut by_uld: Vec<UldOccupants> = ulds
        .iter()
        .map(|u| UldOccupants {
            uld: *u,
            occupants: Vec::new(),
            weight_used: 0,
        })
        .collect();

    for p in packages.iter() {
        if let Some(placement) = p.placement {
            if let Some(entry) = by_uld.iter_mut().find(|e| e.uld.id == placement.uld_id) {
                entry.occupants.push(Cuboid {
                    min: placement.min_corner,
                    max: placement.max_corner,
                });
                entry.weight_used += p.weight;
            }
        }
    }

    let mut unloaded: Vec<usize> = packages
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_loaded())
        .map(|(i, _)| i)
        .collect();
    unloaded.sort_by(|&a, &b| {
        let ra = packages[a].delay as f64 / packages[a].dims.max().max(1) as f64;
        let rb = packages[b].delay as f64 / packages[b].dims.max().max(1) as f64;
        rb.partial_cmp(&ra).unwrap()
    });

    for idx in unloaded {
        let dims = packages[idx].dims;
        let weight = packages[idx].weight;
        let mut placed = false;
        for entry in by_uld.iter_mut() {
            if weight > entry.remaining_weight() {
                continue;
            }
            for orientation in all_orientations(&dims) {
                if let Some(origin) = find_free_corner(
                    &entry.uld.bounds(),
                    &entry.occupants,
                    orientation.length,
                    orientation.height,
                    orientation.width,
                    rng,
                ) {
                    let cuboid =
                        Cuboid::from_origin_size(origin, orientation.length, orientation.height, orientation.width);
                    entry.occupants.push(cuboid);
                    entry.weight_used += weight;
                    packages[idx].dims = orientation;
                    packages[idx].placement = Some(Placement {
                        uld_id: entry.uld.id,
                        min_corner: cuboid.min,
                        max_corner: cuboid.max,
                    });
                    placed = true;
                    break;
                }
            }
            if placed {
                break;
            }
        }
    }
}

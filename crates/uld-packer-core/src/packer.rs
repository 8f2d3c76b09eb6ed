//! Deterministic greedy packer: given a box order and a container order,
//! place boxes into the first-fit Empty Maximal Space, breaking ties by
//! minimal rotation slack. This is the evaluation function the genetic
//! algorithm calls once per chromosome.

use crate::ems::{permitted_rotations, prioritize_ems, update_ems, Container};
use crate::geometry::Cuboid;
use crate::model::{Dims, Package, Uld};

/// One resolved placement produced by the greedy packer.
#[derive(Debug, Clone, Copy)]
pub struct GreedyPlacement {
    pub package_index: usize,
    pub uld_id: u32,
    pub cuboid: Cuboid,
}

/// Result of one greedy-packing pass: resolved placements plus the final
/// per-container state (used by the caller to compute fitness).
#[derive(Debug, Clone)]
pub struct GreedyResult {
    pub placements: Vec<GreedyPlacement>,
    pub containers: Vec<Container>,
}

impl GreedyResult {
    /// `1 - packed_volume / used_container_volume`, ignoring containers that
    /// never received a placement. Defined as `1.0` when no container was
    /// used at all.
    pub fn fitness(&self) -> f64 {
        let mut packed_volume = 0i64;
        let mut used_volume = 0i64;
        for c in &self.containers {
            if c.is_used() {
                packed_volume += c.used_volume();
                used_volume += c.uld.volume();
            }
        }
        if used_volume == 0 {
            return 1.0;
        }
        1.0 - (packed_volume as f64 / used_volume as f64)
    }
}

/// Given the box order `bps` (indices into `boxes`) and the container order
/// `cls` (indices into `ulds`), greedily places as many boxes as possible.
pub fn pack(boxes: &[Package], ulds: &[Uld], bps: &[usize], cls: &[usize]) -> GreedyResult {
    let mut containers: Vec<Container> = ulds.iter().map(|u| Container::new(*u)).collect();
    let mut placed = vec![false; boxes.len()];
    let mut placements = Vec::new();

    for &c_idx in cls {
        for &b_idx in bps {
            if placed[b_idx] {
                continue;
            }
            let dims = boxes[b_idx].dims;
            let weight = boxes[b_idx].weight;
            if let Some(cuboid) = try_place(&mut containers[c_idx], &dims, weight) {
                placed[b_idx] = true;
                placements.push(GreedyPlacement {
                    package_index: b_idx,
                    uld_id: containers[c_idx].uld.id,
                    cuboid,
                });
            }
        }
    }

    GreedyResult {
        placements,
        containers,
    }
}

/// Tries every EMS in priority order against every permitted rotation;
/// places at the first EMS that admits some rotation, choosing among
/// admitting rotations the one with minimal slack (tie-break: enumeration
/// order, i.e. identity, then length<->height, then length<->width).
///
/// Weight is checked before any geometric search: a box that would push the
/// container over its weight capacity is never placed, regardless of EMS fit
/// (Invariant 3).
fn try_place(container: &mut Container, dims: &Dims, weight: i64) -> Option<Cuboid> {
    if weight > container.remaining_weight() {
        return None;
    }
    let ems_sorted = prioritize_ems(&container.ems_list);
    let rotations = permitted_rotations(dims);

    for ems in &ems_sorted {
        let mut best: Option<(i64, Dims)> = None;
        for rot in &rotations {
            if rot.length > ems.length() || rot.height > ems.height() || rot.width > ems.width() {
                continue;
            }
            let slack = (ems.length() - rot.length)
                .min(ems.height() - rot.height)
                .min(ems.width() - rot.width);
            match best {
                Some((best_slack, _)) if best_slack <= slack => {}
                _ => best = Some((slack, *rot)),
            }
        }

        if let Some((_, rot)) = best {
            let cuboid = Cuboid::from_origin_size(ems.min, rot.length, rot.height, rot.width);
            update_ems(&mut container.ems_list, &cuboid);
            container.placed.push(cuboid);
            container.weight_used += weight;
            return Some(cuboid);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PackageClass;

    fn uld(id: u32, l: i64, w: i64, h: i64, cap: i64) -> Uld {
        Uld::new(id, Dims::new(l, w, h), cap)
    }

    fn pkg(id: &str, l: i64, w: i64, h: i64) -> Package {
        Package::new(id, Dims::new(l, w, h), 1, PackageClass::Priority, 0)
    }

    #[test]
    fn exact_fit_places_at_origin() {
        let ulds = vec![uld(1, 10, 10, 10, 1000)];
        let boxes = vec![pkg("p1", 10, 10, 10)];
        let result = pack(&boxes, &ulds, &[0], &[0]);
        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.placements[0].cuboid.min, crate::geometry::Point3::ORIGIN);
    }

    #[test]
    fn rotation_is_applied_when_required() {
        let ulds = vec![uld(1, 10, 4, 4, 1000)];
        let boxes = vec![pkg("p1", 4, 10, 4)];
        let result = pack(&boxes, &ulds, &[0], &[0]);
        assert_eq!(result.placements.len(), 1);
        let c = result.placements[0].cuboid;
        assert_eq!((c.length(), c.height(), c.width()), (10, 4, 4));
    }

    #[test]
    fn two_non_overlapping_boxes_both_placed() {
        let ulds = vec![uld(1, 10, 5, 5, 1000)];
        let boxes = vec![pkg("p1", 5, 5, 5), pkg("p2", 5, 5, 5)];
        let result = pack(&boxes, &ulds, &[0, 1], &[0]);
        assert_eq!(result.placements.len(), 2);
        let a = result.placements[0].cuboid;
        let b = result.placements[1].cuboid;
        assert!(!a.intersects(&b));
    }

    #[test]
    fn fitness_is_worst_when_nothing_placed() {
        let ulds = vec![uld(1, 1, 1, 1, 1000)];
        let boxes = vec![pkg("p1", 100, 100, 100)];
        let result = pack(&boxes, &ulds, &[0], &[0]);
        assert_eq!(result.placements.len(), 0);
        assert_eq!(result.fitness(), 1.0);
    }

    #[test]
    fn weight_capacity_gates_placement_even_when_geometry_fits() {
        let ulds = vec![uld(1, 10, 10, 10, 10)];
        let mut boxes = vec![pkg("p1", 5, 5, 5), pkg("p2", 5, 5, 5)];
        boxes[0].weight = 6;
        boxes[1].weight = 6;
        let result = pack(&boxes, &ulds, &[0, 1], &[0]);
        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.placements[0].package_index, 0);
    }
}

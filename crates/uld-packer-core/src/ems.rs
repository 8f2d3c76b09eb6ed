//! Empty Maximal Space (EMS) bookkeeping for one container during a single
//! chromosome evaluation.
//!
//! An EMS is just a [`Cuboid`] interpreted as "entirely empty". The slab
//! decomposition in [`ems_from_placement`] is the Maximal-Space table: when a
//! box is placed inside an EMS, the EMS splits into up to six residual slabs
//! extended to the EMS's own walls (not the whole container); callers fold
//! this over every EMS the placed box overlaps.

use crate::geometry::Cuboid;
use crate::model::{Dims, Uld};

/// Per-evaluation packing state for one container: its bounds and the
/// current EMS list. Cheap to construct fresh for every chromosome.
#[derive(Debug, Clone)]
pub struct Container {
    pub uld: Uld,
    pub ems_list: Vec<Cuboid>,
    /// Cuboids of boxes placed so far, used only for reporting volume used.
    pub placed: Vec<Cuboid>,
    /// Sum of weights placed so far; gates further placement per §4.3/Invariant 3.
    pub weight_used: i64,
}

impl Container {
    pub fn new(uld: Uld) -> Self {
        Self {
            ems_list: vec![uld.bounds()],
            uld,
            placed: Vec::new(),
            weight_used: 0,
        }
    }

    pub fn used_volume(&self) -> i64 {
        self.placed.iter().map(|c| c.volume()).sum()
    }

    pub fn is_used(&self) -> bool {
        !self.placed.is_empty()
    }

    pub fn remaining_weight(&self) -> i64 {
        self.uld.weight_capacity - self.weight_used
    }
}

/// Splits `space` by the box `placed` occupies inside it into up to six
/// residual slabs. Returns an empty vec if `placed` does not overlap `space`
/// or lies entirely outside it.
pub fn ems_from_placement(space: &Cuboid, placed: &Cuboid) -> Vec<Cuboid> {
    if !overlaps(space, placed) {
        return Vec::new();
    }

    let o = space.min;
    let far = space.max;
    let mut slabs = Vec::with_capacity(6);

    // -x slab
    push_if_valid(
        &mut slabs,
        o,
        crate::geometry::Point3::new(placed.min.x.clamp(o.x, far.x), far.y, far.z),
    );
    // +x slab
    push_if_valid(
        &mut slabs,
        crate::geometry::Point3::new(placed.max.x.clamp(o.x, far.x), o.y, o.z),
        far,
    );
    // -z slab (width axis)
    push_if_valid(
        &mut slabs,
        o,
        crate::geometry::Point3::new(far.x, far.y, placed.min.z.clamp(o.z, far.z)),
    );
    // +z slab
    push_if_valid(
        &mut slabs,
        crate::geometry::Point3::new(o.x, o.y, placed.max.z.clamp(o.z, far.z)),
        far,
    );
    // -y slab (height axis)
    push_if_valid(
        &mut slabs,
        o,
        crate::geometry::Point3::new(far.x, placed.min.y.clamp(o.y, far.y), far.z),
    );
    // +y slab
    push_if_valid(
        &mut slabs,
        crate::geometry::Point3::new(o.x, placed.max.y.clamp(o.y, far.y), o.z),
        far,
    );

    slabs
}

/// Whether `b` overlaps `a`'s volume at all, including the case where `b`
/// sits entirely inside `a` (touching `a`'s own walls). This is the gate
/// for "the box touches this EMS" in the update rule.
fn overlaps(a: &Cuboid, b: &Cuboid) -> bool {
    b.min.x < a.max.x
        && b.max.x > a.min.x
        && b.min.y < a.max.y
        && b.max.y > a.min.y
        && b.min.z < a.max.z
        && b.max.z > a.min.z
}

fn push_if_valid(
    out: &mut Vec<Cuboid>,
    min: crate::geometry::Point3,
    max: crate::geometry::Point3,
) {
    let c = Cuboid { min, max };
    if c.is_valid() {
        out.push(c);
    }
}

/// Removes any EMS in `list` that is strictly contained in another EMS in
/// `list`. O(n^2) but EMS lists stay small in practice.
pub fn filter_dominated(list: &mut Vec<Cuboid>) {
    let snapshot = list.clone();
    list.retain(|candidate| {
        !snapshot
            .iter()
            .any(|other| other != candidate && other.strictly_contains(candidate))
    });
}

/// Updates the container's EMS list after placing `placed_box`: every EMS
/// `placed_box` touches is removed and replaced by its residual slabs, then
/// the whole list is filtered for dominance.
pub fn update_ems(ems_list: &mut Vec<Cuboid>, placed_box: &Cuboid) {
    let mut next = Vec::with_capacity(ems_list.len() + 6);
    for ems in ems_list.iter() {
        if overlaps(ems, placed_box) {
            next.extend(ems_from_placement(ems, placed_box));
        } else {
            next.push(*ems);
        }
    }
    filter_dominated(&mut next);
    *ems_list = next;
}

/// Sorts EMS candidates by ascending distance of their origin to the
/// container origin (prefer spaces near the container's corner).
pub fn prioritize_ems(list: &[Cuboid]) -> Vec<Cuboid> {
    let mut sorted = list.to_vec();
    let origin = crate::geometry::Point3::ORIGIN;
    sorted.sort_by_key(|e| e.min.dist_sq(&origin));
    sorted
}

/// The three rotations permitted by the packer: identity, swap
/// length<->height, swap length<->width. Width<->height is never used.
pub fn permitted_rotations(dims: &Dims) -> [Dims; 3] {
    [
        *dims,
        Dims::new(dims.height, dims.width, dims.length),
        Dims::new(dims.width, dims.height, dims.length),
    ]
}

//! Core data model: packages, containers, and the placements that join them.
//!
//! Dimensions are carried as `(length, width, height)` triples; internally the
//! geometry module maps `height` onto `y` and `width` onto `z` so that
//! "up" is always the `y` axis, matching the EMS slab table in the packer.

use serde::{Deserialize, Serialize};

use crate::geometry::{Cuboid, Point3};

/// A package's dimensions, always in `(length, width, height)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dims {
    pub length: i64,
    pub width: i64,
    pub height: i64,
}

impl Dims {
    pub fn new(length: i64, width: i64, height: i64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    pub fn volume(&self) -> i64 {
        self.length * self.width * self.height
    }

    pub fn max(&self) -> i64 {
        self.length.max(self.width).max(self.height)
    }

    /// Reorients so that `dims[z_index - 1]` becomes the width (the "up
    /// against" axis in Crainic terms), the larger of the remaining two
    /// becomes height, and the smaller becomes length. `z_index` is 1-based,
    /// matching the Crainic ordering's `z_index` output.
    pub fn reorient(&self, z_index: u8) -> Dims {
        let dims = [self.length, self.width, self.height];
        let up = dims[(z_index - 1) as usize];
        let mut rest: Vec<i64> = dims
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| *i != (z_index - 1) as usize)
            .map(|(_, v)| v)
            .collect();
        rest.sort_unstable();
        Dims {
            width: up,
            length: rest[0],
            height: rest[1],
        }
    }
}

/// Whether a package must ship (`Priority`) or may be deferred for a per-unit
/// `delay` penalty (`Economy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageClass {
    Priority,
    Economy,
}

impl PackageClass {
    pub fn is_priority(&self) -> bool {
        matches!(self, PackageClass::Priority)
    }
}

/// A package's final placement: the container it was loaded into and its
/// min/max corners in that container's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub uld_id: u32,
    pub min_corner: Point3,
    pub max_corner: Point3,
}

/// A package to be loaded. `dims` mutates under reorientation; `placement`
/// is set once the package is loaded into some container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub dims: Dims,
    pub weight: i64,
    pub class: PackageClass,
    pub delay: i64,
    pub placement: Option<Placement>,
}

impl Package {
    pub fn new(
        id: impl Into<String>,
        dims: Dims,
        weight: i64,
        class: PackageClass,
        delay: i64,
    ) -> Self {
        Self {
            id: id.into(),
            dims,
            weight,
            class,
            delay,
            placement: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.placement.is_some()
    }

    pub fn is_priority(&self) -> bool {
        self.class.is_priority()
    }
}

/// A container ("ULD"): fixed dimensions and weight capacity. `Uld` itself
/// carries no dynamic packing state: that lives in [`crate::ems::Container`],
/// a per-evaluation snapshot constructed from a `Uld`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uld {
    pub id: u32,
    pub dims: Dims,
    pub weight_capacity: i64,
}

impl Uld {
    pub fn new(id: u32, dims: Dims, weight_capacity: i64) -> Self {
        Self {
            id,
            dims,
            weight_capacity,
        }
    }

    pub fn bounds(&self) -> Cuboid {
        Cuboid::from_origin_size(
            Point3::ORIGIN,
            self.dims.length,
            self.dims.height,
            self.dims.width,
        )
    }

    pub fn volume(&self) -> i64 {
        self.dims.volume()
    }
}

/// A permutation-pair chromosome: `bps` orders packages by index into the
/// slice passed to one GA run, `cls` orders containers the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosome {
    pub bps: Vec<usize>,
    pub cls: Vec<usize>,
}

impl Chromosome {
    pub fn new(bps: Vec<usize>, cls: Vec<usize>) -> Self {
        Self { bps, cls }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorient_places_selected_axis_as_width() {
        let dims = Dims::new(10, 4, 6);
        let r = dims.reorient(2);
        assert_eq!(r.width, 4);
        assert_eq!(r.height, 10);
        assert_eq!(r.length, 6);
    }

    #[test]
    fn reorient_preserves_volume() {
        let dims = Dims::new(7, 3, 5);
        let r = dims.reorient(1);
        assert_eq!(r.volume(), dims.volume());
    }
}

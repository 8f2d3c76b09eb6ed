//! Axis-aligned cuboid geometry and free-corner placement search.
//!
//! Dimensions follow the domain convention `(length, width, height)` along
//! `(x, z, y)` respectively; see [`crate::model`] for why `y` carries height.

use rand::Rng;

/// An integer 3D point, `(x, y, z)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Point3 {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 { x: 0, y: 0, z: 0 };

    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    pub fn add(&self, dx: i64, dy: i64, dz: i64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Squared Euclidean distance to another point; avoids a sqrt for ordering.
    pub fn dist_sq(&self, other: &Point3) -> i64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }
}

/// An axis-aligned cuboid given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Cuboid {
    pub min: Point3,
    pub max: Point3,
}

impl Cuboid {
    /// Builds a cuboid from a min corner and extents. Panics in debug builds
    /// only via the `dims` invariant checked by callers; this constructor
    /// itself never validates (matches `Box3::from_origin_size` callers that
    /// already guarantee positive dims upstream).
    pub fn from_origin_size(origin: Point3, l: i64, h: i64, w: i64) -> Self {
        Self {
            min: origin,
            max: origin.add(l, h, w),
        }
    }

    pub fn length(&self) -> i64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i64 {
        self.max.y - self.min.y
    }

    pub fn width(&self) -> i64 {
        self.max.z - self.min.z
    }

    pub fn volume(&self) -> i64 {
        self.length() * self.height() * self.width()
    }

    pub fn is_valid(&self) -> bool {
        self.length() > 0 && self.height() > 0 && self.width() > 0
    }

    /// Strict interior overlap: boundary-touching cuboids do not intersect.
    pub fn intersects(&self, other: &Cuboid) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
            && self.min.z < other.max.z
            && other.min.z < self.max.z
    }

    /// True iff `self` lies entirely within `outer`, inclusive of shared faces.
    pub fn fits_inside(&self, outer: &Cuboid) -> bool {
        self.min.x >= outer.min.x
            && self.min.y >= outer.min.y
            && self.min.z >= outer.min.z
            && self.max.x <= outer.max.x
            && self.max.y <= outer.max.y
            && self.max.z <= outer.max.z
    }

    /// True iff `self` strictly contains `other` (used for EMS dominance
    /// elimination); a cuboid never contains itself under this definition.
    pub fn strictly_contains(&self, other: &Cuboid) -> bool {
        other.fits_inside(self) && other != self
    }

    /// The eight vertices in the canonical order used for solution output:
    /// min-corner first, max-corner last, with the six in between walking
    /// the remaining combinations of (x, y, z) low/high.
    pub fn corners(&self) -> [Point3; 8] {
        [
            Point3::new(self.min.x, self.min.y, self.min.z),
            Point3::new(self.max.x, self.min.y, self.min.z),
            Point3::new(self.min.x, self.max.y, self.min.z),
            Point3::new(self.max.x, self.max.y, self.min.z),
            Point3::new(self.min.x, self.min.y, self.max.z),
            Point3::new(self.max.x, self.min.y, self.max.z),
            Point3::new(self.min.x, self.max.y, self.max.z),
            Point3::new(self.max.x, self.max.y, self.max.z),
        ]
    }
}

/// Searches existing occupant corners for a position where a cuboid of size
/// `(l, h, w)` fits inside `bounds` without intersecting any occupant.
///
/// Returns a uniformly-chosen passing corner, or `None` if none admit the box.
/// `rng` is the caller's single seeded source; no randomness is drawn here
/// beyond the final choice among passing candidates.
pub fn find_free_corner(
    bounds: &Cuboid,
    occupants: &[Cuboid],
    l: i64,
    h: i64,
    w: i64,
    rng: &mut impl Rng,
) -> Option<Point3> {
    let mut candidate_origins: Vec<Point3> = Vec::new();
    if occupants.is_empty() {
        candidate_origins.push(bounds.min);
    } else {
        for occ in occupants {
            candidate_origins.extend(occ.corners());
        }
    }

    let mut passing: Vec<Point3> = Vec::new();
    for origin in candidate_origins {
        let candidate = Cuboid::from_origin_size(origin, l, h, w);
        if !candidate.fits_inside(bounds) {
            continue;
        }
        if occupants.iter().any(|occ| candidate.intersects(occ)) {
            continue;
        }
        passing.push(origin);
    }

    if passing.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..passing.len());
    Some(passing[idx])
}

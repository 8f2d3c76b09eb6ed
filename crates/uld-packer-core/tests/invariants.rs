//! Fuzzed property tests for the geometric invariants that must hold no
//! matter what packing sequence produced a solution: containment,
//! non-interpenetration, EMS dominance, and free-corner correctness.

use rand::{Rng, SeedableRng};
use uld_packer_core::config::ManagerConfig;
use uld_packer_core::ems;
use uld_packer_core::geometry::{find_free_corner, Cuboid, Point3};
use uld_packer_core::manager;
use uld_packer_core::model::{Dims, Package, PackageClass, Uld};

fn random_boxes(count: usize, max_size: i64, rng: &mut impl Rng) -> Vec<Package> {
    (0..count)
        .map(|i| {
            let l = rng.gen_range(1..=max_size);
            let w = rng.gen_range(1..=max_size);
            let h = rng.gen_range(1..=max_size);
            let weight = rng.gen_range(1..=20);
            let class = if i % 3 == 0 { PackageClass::Priority } else { PackageClass::Economy };
            let delay = rng.gen_range(0..=15);
            Package::new(format!("b{i}"), Dims::new(l, w, h), weight, class, delay)
        })
        .collect()
}

#[test]
fn random_packings_honor_containment_and_non_interpenetration() {
    for seed in 0..8u64 {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed * 17 + 1);
        let ulds = vec![Uld::new(1, Dims::new(40, 40, 40), 500), Uld::new(2, Dims::new(30, 30, 30), 500)];
        let packages = random_boxes(25, 12, &mut rng);
        let cfg = ManagerConfig::builder().k(50).seed(seed).ga(uld_packer_core::config::GaConfig::builder().n_iter(6).population_size(8).build()).build();

        let outcome = manager::run(packages, ulds.clone(), &cfg).expect("valid solution");

        for uld in &ulds {
            let bounds = uld.bounds();
            let loaded: Vec<Cuboid> = outcome
                .packages
                .iter()
                .filter_map(|p| p.placement)
                .filter(|pl| pl.uld_id == uld.id)
                .map(|pl| Cuboid { min: pl.min_corner, max: pl.max_corner })
                .collect();

            for c in &loaded {
                assert!(c.fits_inside(&bounds), "placement escaped ULD bounds");
            }
            for i in 0..loaded.len() {
                for j in (i + 1)..loaded.len() {
                    assert!(!loaded[i].intersects(&loaded[j]), "two placements overlap in the same ULD");
                }
            }
        }
    }
}

#[test]
fn update_ems_never_leaves_dominated_entries_under_fuzz() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(99);
    let bounds = Cuboid::from_origin_size(Point3::ORIGIN, 50, 50, 50);
    let mut ems_list = vec![bounds];

    for _ in 0..40 {
        let l = rng.gen_range(1..=10);
        let h = rng.gen_range(1..=10);
        let w = rng.gen_range(1..=10);
        let candidate = ems::prioritize_ems(&ems_list).into_iter().find(|e| l <= e.length() && h <= e.height() && w <= e.width());
        let Some(space) = candidate else { continue };
        let placed = Cuboid::from_origin_size(space.min, l, h, w);
        ems::update_ems(&mut ems_list, &placed);

        for i in 0..ems_list.len() {
            for j in 0..ems_list.len() {
                if i != j {
                    assert!(!ems_list[i].strictly_contains(&ems_list[j]), "dominated EMS survived update");
                }
            }
            assert!(ems_list[i].is_valid(), "EMS with non-positive extent survived update");
        }
    }
}

#[test]
fn free_corner_search_never_returns_a_colliding_placement() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(123);
    let bounds = Cuboid::from_origin_size(Point3::ORIGIN, 60, 60, 60);
    let mut occupants: Vec<Cuboid> = Vec::new();

    for _ in 0..30 {
        let l = rng.gen_range(4..=15);
        let h = rng.gen_range(4..=15);
        let w = rng.gen_range(4..=15);
        if let Some(origin) = find_free_corner(&bounds, &occupants, l, h, w, &mut rng) {
            let candidate = Cuboid::from_origin_size(origin, l, h, w);
            assert!(candidate.fits_inside(&bounds));
            for occ in &occupants {
                assert!(!candidate.intersects(occ), "free-corner search returned a colliding placement");
            }
            occupants.push(candidate);
        }
    }
}

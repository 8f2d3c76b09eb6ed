//! Cargo manager: orchestrates the full pipeline described in `SPEC_FULL.md`
//! §4.7: Crainic ordering, a priority-stage GA, an economy-stage GA, ad-hoc
//! residual fill, then validation.
//!
//! Grounded in `original_source/ocm.py`'s `OptimalCargoManagement`:
//! `create_package_ordering` + `reorient_packages` (here: Crainic ordering
//! applied separately to each class), `run_genetic_algorithm` (here: the
//! two-stage GA with the unused-ULD handoff), and `adhoc_additions`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::adhoc;
use crate::config::ManagerConfig;
use crate::crainic;
use crate::error::{CargoPackError, Result};
use crate::ga;
use crate::geometry::Cuboid;
use crate::model::{Dims, Package, PackageClass, Placement, Uld};
use crate::validator::{self, ValidationReport};

/// Final state of one run: every package (loaded or not) and the validator's
/// cost breakdown.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub packages: Vec<Package>,
    pub report: ValidationReport,
}

/// Runs the full pipeline and returns the validated solution, or
/// `CargoPackError::ValidationFailed` if the best candidate the pipeline
/// produced is geometrically or weight-invalid (§7: this is fatal, not a
/// per-box infeasibility).
#[tracing::instrument(skip_all, fields(n_packages = packages.len(), n_ulds = ulds.len()))]
pub fn run(mut packages: Vec<Package>, ulds: Vec<Uld>, cfg: &ManagerConfig) -> Result<RunOutcome> {
    cfg.validate()?;
    if packages.is_empty() || ulds.is_empty() {
        return Err(CargoPackError::Empty);
    }

    let mut rng = StdRng::seed_from_u64(cfg.seed);

    let priority_idx: Vec<usize> = packages
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_priority())
        .map(|(i, _)| i)
        .collect();
    let economy_idx: Vec<usize> = packages
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_priority())
        .map(|(i, _)| i)
        .collect();

    reorient_group(&mut packages, &priority_idx, &mut rng);
    reorient_group(&mut packages, &economy_idx, &mut rng);

    tracing::info!(
        priority_count = priority_idx.len(),
        economy_count = economy_idx.len(),
        "package ordering built"
    );

    // Priority stage: the `priority_uld_count` largest-by-volume ULDs.
    let mut priority_ulds: Vec<Uld> = ulds.clone();
    priority_ulds.sort_by(|a, b| b.volume().cmp(&a.volume()).then(a.id.cmp(&b.id)));
    priority_ulds.truncate(cfg.priority_uld_count.min(priority_ulds.len()));

    if !priority_idx.is_empty() && !priority_ulds.is_empty() {
        let priority_boxes: Vec<Package> = priority_idx.iter().map(|&i| packages[i].clone()).collect();
        let outcome = ga::run(&priority_boxes, &priority_ulds, &cfg.ga, &mut rng);
        tracing::info!(
            placed = outcome.result.placements.len(),
            fitness = outcome.result.fitness(),
            "priority stage ga complete"
        );
        commit_placements(&mut packages, &priority_idx, &outcome.result.placements);
    }

    // Economy stage runs against every ULD that still holds no package at all
    // (mirrors `unused_uld_ids`: ULDs the priority stage never touched, plus
    // any designated-priority ULD that ended up empty).
    let loaded_uld_ids: std::collections::HashSet<u32> =
        packages.iter().filter_map(|p| p.placement.map(|pl| pl.uld_id)).collect();
    let economy_ulds: Vec<Uld> = ulds.iter().filter(|u| !loaded_uld_ids.contains(&u.id)).copied().collect();

    let mut economy_window: Vec<usize> = economy_idx.clone();
    economy_window.sort_by(|&a, &b| {
        let ra = economy_rank_key(&packages[a]);
        let rb = economy_rank_key(&packages[b]);
        rb.partial_cmp(&ra).unwrap()
    });
    economy_window.truncate(cfg.economy_window.min(economy_window.len()));
    economy_window.shuffle(&mut rng);

    if !economy_window.is_empty() && !economy_ulds.is_empty() {
        let economy_boxes: Vec<Package> = economy_window.iter().map(|&i| packages[i].clone()).collect();
        let outcome = ga::run(&economy_boxes, &economy_ulds, &cfg.ga, &mut rng);
        tracing::info!(
            placed = outcome.result.placements.len(),
            fitness = outcome.result.fitness(),
            "economy stage ga complete"
        );
        commit_placements(&mut packages, &economy_window, &outcome.result.placements);
    }

    adhoc::fill(&mut packages, &ulds, &mut rng);

    let packages_loaded = packages.iter().filter(|p| p.is_loaded()).count();
    let report = validator::validate(&packages, &ulds, cfg.k);
    tracing::info!(
        packages_loaded,
        priority_uld_count = report.priority_uld_count,
        total_cost = report.total_cost,
        valid = report.valid,
        "run complete"
    );

    if !report.valid {
        return Err(CargoPackError::ValidationFailed(report));
    }

    Ok(RunOutcome { packages, report })
}

/// `delay / volume^1.2`, the economy-stage ranking key from §4.7. Packages
/// with zero volume would divide by zero; dimensions are validated positive
/// at parse time so this never arises in practice.
fn economy_rank_key(p: &Package) -> f64 {
    p.delay as f64 / (p.dims.volume() as f64).powf(1.2)
}

/// Applies Crainic ordering to the packages at `indices` (a subset of
/// `packages`) and reorients each one to its chosen up-axis in place.
/// `group_desc` is always `false`, matching both of `ocm.py`'s
/// `crainic_sorting` call sites (`create_package_ordering`'s priority call
/// passes `reverse=False` explicitly; the non-priority call omits it, and the
/// function's own default is also `False`).
fn reorient_group(packages: &mut [Package], indices: &[usize], rng: &mut impl rand::Rng) {
    if indices.is_empty() {
        return;
    }
    let subset: Vec<Package> = indices.iter().map(|&i| packages[i].clone()).collect();
    let order = crainic::crainic_order(&subset, false, rng);
    for entry in order {
        let global = indices[entry.index];
        packages[global].dims = packages[global].dims.reorient(entry.z_index);
    }
}

/// Writes each greedy placement back onto the master `packages` vec,
/// translating the GA's local box indices back to global package indices.
/// `GreedyPlacement::uld_id` is already the real ULD id, since the greedy
/// packer builds its containers directly from the ULD slice it was given.
fn commit_placements(packages: &mut [Package], local_to_global: &[usize], placements: &[crate::packer::GreedyPlacement]) {
    for placement in placements {
        let global = local_to_global[placement.package_index];
        let cuboid: Cuboid = placement.cuboid;
        packages[global].dims = Dims::new(cuboid.length(), cuboid.width(), cuboid.height());
        packages[global].placement = Some(Placement {
            uld_id: placement.uld_id,
            min_corner: cuboid.min,
            max_corner: cuboid.max,
        });
    }
}

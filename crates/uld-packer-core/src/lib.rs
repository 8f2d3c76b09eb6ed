//! Core library for the air-cargo ULD packing pipeline.
//!
//! - Geometry: axis-aligned cuboids, free-corner placement search (`geometry`)
//! - Packing state: Empty Maximal Space bookkeeping (`ems`)
//! - Search: deterministic greedy packer (`packer`) driven by a genetic
//!   algorithm over `(box order, container order)` chromosomes (`ga`)
//! - Ordering: Crainic dimension-grouping heuristic (`crainic`) and the
//!   ad-hoc residual-fill pass (`adhoc`)
//! - Orchestration: `manager::run` wires priority/economy GA stages, ad-hoc
//!   fill, and validation into one pipeline
//! - Validation: geometric and weight-capacity checking with a cost
//!   breakdown (`validator`)
//!
//! Data model is serde-serializable; manifest I/O lives in the CLI crate.
//!
//! Quick example:
//! ```ignore
//! use uld_packer_core::{manager, ManagerConfig, Uld, Package, Dims, PackageClass};
//!
//! let ulds = vec![Uld::new(1, Dims::new(100, 100, 100), 1000)];
//! let packages = vec![Package::new("p1", Dims::new(50, 50, 50), 10, PackageClass::Priority, 0)];
//! let cfg = ManagerConfig::builder().k(5000).build();
//! let outcome = manager::run(packages, ulds, &cfg)?;
//! println!("total cost: {}", outcome.report.total_cost);
//! # Ok::<(), uld_packer_core::CargoPackError>(())
//! ```

pub mod adhoc;
pub mod config;
pub mod crainic;
pub mod ems;
pub mod error;
pub mod ga;
pub mod geometry;
pub mod manager;
pub mod model;
pub mod packer;
pub mod validator;

pub use config::{GaConfig, ManagerConfig};
pub use error::{CargoPackError, Result};
pub use manager::RunOutcome;
pub use model::{Chromosome, Dims, Package, PackageClass, Placement, Uld};
pub use validator::{ValidationReport, Violation};

/// Convenience prelude for the primary types and entry point.
/// Importing `uld_packer_core::prelude::*` brings the common APIs into scope.
pub mod prelude {
    pub use crate::config::{GaConfig, ManagerConfig};
    pub use crate::error::{CargoPackError, Result};
    pub use crate::geometry::{Cuboid, Point3};
    pub use crate::manager::{self, RunOutcome};
    pub use crate::model::{Chromosome, Dims, Package, PackageClass, Placement, Uld};
    pub use crate::validator::{ValidationReport, Violation};
}

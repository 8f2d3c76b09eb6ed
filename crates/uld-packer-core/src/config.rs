use serde::{Deserialize, Serialize};

use crate::error::{CargoPackError, Result};

/// Hyperparameters for one genetic-algorithm run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GaConfig {
    /// Number of generations to evolve.
    #[serde(default = "default_n_iter")]
    pub n_iter: usize,
    /// Population size held each generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Number of lowest-fitness chromosomes carried forward untouched.
    #[serde(default = "default_elitism_size")]
    pub elitism_size: usize,
    /// Probability that a mating-pool pair produces crossover children
    /// rather than being copied forward unchanged.
    #[serde(default = "default_crossover_prob")]
    pub crossover_prob: f64,
    /// Probability that a chromosome is mutated after crossover.
    #[serde(default = "default_mutation_prob")]
    pub mutation_prob: f64,
    /// Evaluate the population with a `rayon` thread pool (requires the
    /// `parallel` cargo feature; ignored otherwise).
    #[serde(default)]
    pub parallel: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            n_iter: default_n_iter(),
            population_size: default_population_size(),
            elitism_size: default_elitism_size(),
            crossover_prob: default_crossover_prob(),
            mutation_prob: default_mutation_prob(),
            parallel: false,
        }
    }
}

fn default_n_iter() -> usize {
    25
}
fn default_population_size() -> usize {
    20
}
fn default_elitism_size() -> usize {
    4
}
fn default_crossover_prob() -> f64 {
    0.7
}
fn default_mutation_prob() -> f64 {
    0.3
}

impl GaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(CargoPackError::InvalidConfig(
                "population_size must be greater than 0".into(),
            ));
        }
        if self.elitism_size > self.population_size {
            return Err(CargoPackError::InvalidConfig(format!(
                "elitism_size ({}) must not exceed population_size ({})",
                self.elitism_size, self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_prob) {
            return Err(CargoPackError::InvalidConfig(format!(
                "crossover_prob must be within [0, 1], got {}",
                self.crossover_prob
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_prob) {
            return Err(CargoPackError::InvalidConfig(format!(
                "mutation_prob must be within [0, 1], got {}",
                self.mutation_prob
            )));
        }
        Ok(())
    }

    pub fn builder() -> GaConfigBuilder {
        GaConfigBuilder::new()
    }
}

/// Builder for `GaConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct GaConfigBuilder {
    cfg: GaConfig,
}

impl GaConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: GaConfig::default(),
        }
    }
    pub fn n_iter(mut self, v: usize) -> Self {
        self.cfg.n_iter = v;
        self
    }
    pub fn population_size(mut self, v: usize) -> Self {
        self.cfg.population_size = v;
        self
    }
    pub fn elitism_size(mut self, v: usize) -> Self {
        self.cfg.elitism_size = v;
        self
    }
    pub fn crossover_prob(mut self, v: f64) -> Self {
        self.cfg.crossover_prob = v;
        self
    }
    pub fn mutation_prob(mut self, v: f64) -> Self {
        self.cfg.mutation_prob = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> GaConfig {
        self.cfg
    }
}

/// Top-level orchestration knobs for the cargo manager.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManagerConfig {
    /// Cost charged per distinct ULD holding at least one priority package.
    pub k: i64,
    /// How many of the largest-by-volume ULDs are designated for the
    /// priority GA stage; the rest are reserved for the economy stage.
    #[serde(default = "default_priority_uld_count")]
    pub priority_uld_count: usize,
    /// Size of the volume-adjusted-delay window considered by the economy
    /// GA stage.
    #[serde(default = "default_economy_window")]
    pub economy_window: usize,
    /// Seed for the single RNG threaded through the whole run.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Hyperparameters shared by both GA stages.
    #[serde(default)]
    pub ga: GaConfig,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            k: 0,
            priority_uld_count: default_priority_uld_count(),
            economy_window: default_economy_window(),
            seed: default_seed(),
            ga: GaConfig::default(),
        }
    }
}

fn default_priority_uld_count() -> usize {
    3
}
fn default_economy_window() -> usize {
    150
}
fn default_seed() -> u64 {
    28072
}

impl ManagerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.priority_uld_count == 0 {
            return Err(CargoPackError::InvalidConfig(
                "priority_uld_count must be greater than 0".into(),
            ));
        }
        if self.economy_window == 0 {
            return Err(CargoPackError::InvalidConfig(
                "economy_window must be greater than 0".into(),
            ));
        }
        self.ga.validate()
    }

    pub fn builder() -> ManagerConfigBuilder {
        ManagerConfigBuilder::new()
    }
}

/// Builder for `ManagerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct ManagerConfigBuilder {
    cfg: ManagerConfig,
}

impl ManagerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: ManagerConfig::default(),
        }
    }
    pub fn k(mut self, v: i64) -> Self {
        self.cfg.k = v;
        self
    }
    pub fn priority_uld_count(mut self, v: usize) -> Self {
        self.cfg.priority_uld_count = v;
        self
    }
    pub fn economy_window(mut self, v: usize) -> Self {
        self.cfg.economy_window = v;
        self
    }
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = v;
        self
    }
    pub fn ga(mut self, v: GaConfig) -> Self {
        self.cfg.ga = v;
        self
    }
    pub fn build(self) -> ManagerConfig {
        self.cfg
    }
}

//! Genetic-algorithm search over `(box_packing_sequence, container_loading_sequence)`
//! chromosomes. Grounded in `original_source/genetic.py`'s `GeneticAlgorithm`
//! class: tournament selection, order-preserving crossover with a cut-pair
//! and `fill_missing` wraparound, swap/reverse mutation, and elitism carried
//! across generations.

use rand::seq::SliceRandom;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::GaConfig;
use crate::model::{Chromosome, Package, Uld};
use crate::packer::{self, GreedyResult};

/// A chromosome paired with its evaluated fitness (lower is better).
#[derive(Debug, Clone)]
pub struct Evaluated {
    pub chromosome: Chromosome,
    pub fitness: f64,
}

/// Final output of one GA run: the best chromosome found and its greedy
/// packing result, ready for the caller to commit placements from.
pub struct GaOutcome {
    pub best: Chromosome,
    pub result: GreedyResult,
    pub best_fitness_per_generation: Vec<f64>,
}

fn random_permutation(n: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut v: Vec<usize> = (0..n).collect();
    v.shuffle(rng);
    v
}

fn deterministic_seed_chromosomes(boxes: &[Package], n_containers: usize, rng: &mut impl Rng) -> Vec<Chromosome> {
    let mut by_width: Vec<usize> = (0..boxes.len()).collect();
    by_width.sort_by(|&a, &b| boxes[b].dims.width.cmp(&boxes[a].dims.width));
    let mut by_height: Vec<usize> = (0..boxes.len()).collect();
    by_height.sort_by(|&a, &b| boxes[b].dims.height.cmp(&boxes[a].dims.height));
    let mut by_length: Vec<usize> = (0..boxes.len()).collect();
    by_length.sort_by(|&a, &b| boxes[b].dims.length.cmp(&boxes[a].dims.length));
    let mut by_volume: Vec<usize> = (0..boxes.len()).collect();
    by_volume.sort_by(|&a, &b| boxes[b].dims.volume().cmp(&boxes[a].dims.volume()));

    [by_width, by_height, by_length, by_volume]
        .into_iter()
        .map(|bps| Chromosome::new(bps, random_permutation(n_containers, rng)))
        .collect()
}

fn initialize_population(
    boxes: &[Package],
    n_containers: usize,
    population_size: usize,
    rng: &mut impl Rng,
) -> Vec<Chromosome> {
    let mut population = deterministic_seed_chromosomes(boxes, n_containers, rng);
    while population.len() < population_size {
        population.push(Chromosome::new(
            random_permutation(boxes.len(), rng),
            random_permutation(n_containers, rng),
        ));
    }
    population.truncate(population_size.max(population.len()));
    population
}

fn evaluate(boxes: &[Package], ulds: &[Uld], chromosome: &Chromosome) -> f64 {
    packer::pack(boxes, ulds, &chromosome.bps, &chromosome.cls).fitness()
}

fn evaluate_population(boxes: &[Package], ulds: &[Uld], population: &[Chromosome], parallel: bool) -> Vec<Evaluated> {
    #[cfg(feature = "parallel")]
    if parallel {
        return population
            .par_iter()
            .map(|c| Evaluated {
                chromosome: c.clone(),
                fitness: evaluate(boxes, ulds, c),
            })
            .collect();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    population
        .iter()
        .map(|c| Evaluated {
            chromosome: c.clone(),
            fitness: evaluate(boxes, ulds, c),
        })
        .collect()
}

/// Keeps the `elitism_size` lowest-fitness chromosomes.
fn elitism(evaluated: &[Evaluated], elitism_size: usize) -> Vec<Chromosome> {
    let mut idx: Vec<usize> = (0..evaluated.len()).collect();
    idx.sort_by(|&a, &b| evaluated[a].fitness.partial_cmp(&evaluated[b].fitness).unwrap());
    idx.into_iter()
        .take(elitism_size)
        .map(|i| evaluated[i].chromosome.clone())
        .collect()
}

/// Binary tournament: repeatedly samples two distinct indices from
/// `evaluated` and keeps the lower-fitness chromosome, producing a mating
/// pool of exactly `pool_size` chromosomes (the stable population size;
/// `evaluated` itself may be transiently larger, since it includes the
/// previous generation's elites).
fn tournament_selection(evaluated: &[Evaluated], pool_size: usize, rng: &mut impl Rng) -> Vec<Chromosome> {
    let n = evaluated.len();
    (0..pool_size)
        .map(|_| {
            let a = rng.gen_range(0..n);
            let mut b = rng.gen_range(0..n);
            while b == a && n > 1 {
                b = rng.gen_range(0..n);
            }
            if evaluated[a].fitness <= evaluated[b].fitness {
                evaluated[a].chromosome.clone()
            } else {
                evaluated[b].chromosome.clone()
            }
        })
        .collect()
}

/// Order-preserving crossover: copy parent1's genes between two cut indices
/// into the child, then fill the remaining positions: walking forward from
/// just after the second cut, wrapping to the start, with parent2's genes
/// in parent2's own order, skipping genes already placed.
fn order_crossover(parent1: &[usize], parent2: &[usize], cut_a: usize, cut_b: usize) -> Vec<usize> {
    let n = parent1.len();
    let (lo, hi) = (cut_a.min(cut_b), cut_a.max(cut_b));
    let mut child = vec![None; n];
    let mut present = vec![false; n];
    for i in lo..=hi {
        child[i] = Some(parent1[i]);
        present[parent1[i]] = true;
    }

    let fill_positions: Vec<usize> = ((hi + 1)..n).chain(0..lo).collect();
    let mut cursor = 0;
    for &gene in parent2 {
        if present[gene] {
            continue;
        }
        if cursor >= fill_positions.len() {
            break;
        }
        child[fill_positions[cursor]] = Some(gene);
        present[gene] = true;
        cursor += 1;
    }

    child.into_iter().map(|g| g.expect("crossover must fill every position")).collect()
}

fn crossover_pair(p1: &Chromosome, p2: &Chromosome, rng: &mut impl Rng) -> (Chromosome, Chromosome) {
    let (bps_cut_a, bps_cut_b) = two_distinct_cuts(p1.bps.len(), rng);
    let (cls_cut_a, cls_cut_b) = two_distinct_cuts(p1.cls.len(), rng);

    let child1 = Chromosome::new(
        order_crossover(&p1.bps, &p2.bps, bps_cut_a, bps_cut_b),
        order_crossover(&p1.cls, &p2.cls, cls_cut_a, cls_cut_b),
    );
    let child2 = Chromosome::new(
        order_crossover(&p2.bps, &p1.bps, bps_cut_a, bps_cut_b),
        order_crossover(&p2.cls, &p1.cls, cls_cut_a, cls_cut_b),
    );
    (child1, child2)
}

fn two_distinct_cuts(len: usize, rng: &mut impl Rng) -> (usize, usize) {
    if len <= 1 {
        return (0, 0);
    }
    let a = rng.gen_range(0..len);
    let mut b = rng.gen_range(0..len);
    while b == a {
        b = rng.gen_range(0..len);
    }
    (a, b)
}

/// Swaps two distinct positions; reverses the whole sequence instead when
/// its length is at most 2 (a direct port of `genetic.py`'s `mutate`).
fn mutate_sequence(seq: &mut [usize], rng: &mut impl Rng) {
    if seq.len() <= 2 {
        seq.reverse();
        return;
    }
    let a = rng.gen_range(0..seq.len());
    let mut b = rng.gen_range(0..seq.len());
    while b == a {
        b = rng.gen_range(0..seq.len());
    }
    seq.swap(a, b);
}

fn perform_crossover(mating_pool: &[Chromosome], crossover_prob: f64, rng: &mut impl Rng) -> Vec<Chromosome> {
    let mut shuffled = mating_pool.to_vec();
    shuffled.shuffle(rng);
    let mut next_gen = Vec::with_capacity(shuffled.len());

    let mut iter = shuffled.chunks_exact(2);
    for pair in &mut iter {
        if rng.gen_bool(crossover_prob) {
            let (c1, c2) = crossover_pair(&pair[0], &pair[1], rng);
            next_gen.push(c1);
            next_gen.push(c2);
        } else {
            next_gen.push(pair[0].clone());
            next_gen.push(pair[1].clone());
        }
    }
    next_gen.extend(iter.remainder().iter().cloned());
    next_gen
}

fn perform_mutation(population: &mut [Chromosome], mutation_prob: f64, rng: &mut impl Rng) {
    for chromosome in population.iter_mut() {
        if rng.gen_bool(mutation_prob) {
            mutate_sequence(&mut chromosome.bps, rng);
            mutate_sequence(&mut chromosome.cls, rng);
        }
    }
}

/// Runs the full GA loop and returns the best chromosome found, its greedy
/// packing result, and the per-generation best-fitness trace (non-increasing
/// by construction, since elitism always carries the incumbent best).
#[tracing::instrument(skip_all, fields(n_boxes = boxes.len(), n_containers = ulds.len()))]
pub fn run(boxes: &[Package], ulds: &[Uld], cfg: &GaConfig, rng: &mut impl Rng) -> GaOutcome {
    assert!(!boxes.is_empty() && !ulds.is_empty(), "run() requires non-empty boxes and ulds");

    let mut population = initialize_population(boxes, ulds.len(), cfg.population_size, rng);
    let mut best_fitness_per_generation = Vec::with_capacity(cfg.n_iter);
    let mut elites: Vec<Chromosome> = Vec::new();

    let mut best: Option<Evaluated> = None;

    for generation in 0..cfg.n_iter {
        let mut pool = population.clone();
        pool.extend(elites.iter().cloned());

        let evaluated = evaluate_population(boxes, ulds, &pool, cfg.parallel);
        let generation_best = evaluated
            .iter()
            .min_by(|a, b| a.fitness.partial_cmp(&b.fitness).unwrap())
            .cloned();

        if let Some(gb) = &generation_best {
            let is_better = best.as_ref().map(|b| gb.fitness < b.fitness).unwrap_or(true);
            if is_better {
                best = Some(gb.clone());
            }
        }
        best_fitness_per_generation.push(best.as_ref().map(|b| b.fitness).unwrap_or(1.0));

        tracing::debug!(generation, best_fitness = best_fitness_per_generation[generation], "ga generation evaluated");

        elites = elitism(&evaluated, cfg.elitism_size);

        if generation + 1 == cfg.n_iter {
            break;
        }

        let mating_pool = tournament_selection(&evaluated, population.len(), rng);
        let mut next_gen = perform_crossover(&mating_pool, cfg.crossover_prob, rng);
        perform_mutation(&mut next_gen, cfg.mutation_prob, rng);
        population = next_gen;
    }

    let best = best.expect("at least one generation must have been evaluated");
    let result = packer::pack(boxes, ulds, &best.chromosome.bps, &best.chromosome.cls);

    GaOutcome {
        best: best.chromosome,
        result,
        best_fitness_per_generation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dims, PackageClass};
    use rand::SeedableRng;

    fn uld(id: u32, l: i64, w: i64, h: i64, cap: i64) -> Uld {
        Uld::new(id, Dims::new(l, w, h), cap)
    }

    fn pkg(id: &str, l: i64, w: i64, h: i64) -> Package {
        Package::new(id, Dims::new(l, w, h), 1, PackageClass::Priority, 0)
    }

    #[test]
    fn order_crossover_produces_a_valid_permutation() {
        let p1 = vec![0, 1, 2, 3, 4];
        let p2 = vec![4, 3, 2, 1, 0];
        let child = order_crossover(&p1, &p2, 1, 3);
        let mut sorted = child.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn mutate_sequence_swaps_two_positions_for_long_sequences() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let mut seq: Vec<usize> = (0..10).collect();
        let before = seq.clone();
        mutate_sequence(&mut seq, &mut rng);
        let diff = before.iter().zip(seq.iter()).filter(|(a, b)| a != b).count();
        assert_eq!(diff, 2);
    }

    #[test]
    fn mutate_sequence_reverses_short_sequences() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let mut seq = vec![1, 2];
        mutate_sequence(&mut seq, &mut rng);
        assert_eq!(seq, vec![2, 1]);
    }

    #[test]
    fn ga_fitness_is_monotonically_non_increasing() {
        let ulds = vec![uld(1, 10, 10, 10, 1000), uld(2, 10, 10, 10, 1000)];
        let boxes = vec![
            pkg("a", 5, 5, 5),
            pkg("b", 5, 5, 5),
            pkg("c", 4, 4, 4),
            pkg("d", 3, 3, 3),
        ];
        let cfg = GaConfig::builder()
            .n_iter(6)
            .population_size(8)
            .elitism_size(2)
            .build();
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        let outcome = run(&boxes, &ulds, &cfg, &mut rng);
        for w in outcome.best_fitness_per_generation.windows(2) {
            assert!(w[1] <= w[0] + 1e-9);
        }
    }

    #[test]
    fn ga_is_deterministic_given_a_seed() {
        let ulds = vec![uld(1, 10, 10, 10, 1000)];
        let boxes = vec![pkg("a", 5, 5, 5), pkg("b", 5, 5, 5)];
        let cfg = GaConfig::builder().n_iter(4).population_size(6).build();

        let mut rng1 = rand::rngs::StdRng::seed_from_u64(99);
        let out1 = run(&boxes, &ulds, &cfg, &mut rng1);
        let mut rng2 = rand::rngs::StdRng::seed_from_u64(99);
        let out2 = run(&boxes, &ulds, &cfg, &mut rng2);

        assert_eq!(out1.best.bps, out2.best.bps);
        assert_eq!(out1.best.cls, out2.best.cls);
    }
}

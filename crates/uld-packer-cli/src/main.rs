use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use uld_packer_core::error::CargoPackError;
use uld_packer_core::model::{Dims, Package, PackageClass, Uld};
use uld_packer_core::{manager, ManagerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "uld-packer",
    about = "Pack priority and economy air-cargo packages into ULDs",
    version,
    author
)]
struct Cli {
    /// Manifest file: ULD list, package list, and the priority penalty K
    input: PathBuf,
    /// Path to write the loading solution to
    output: PathBuf,
    /// "1" enables diagnostic logging at info level; anything else logs only errors
    verbosity: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbosity == "1" { "info" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .init();

    let manifest = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read input manifest {}", cli.input.display()))?;
    let (ulds, packages, k) =
        parse_manifest(&manifest).with_context(|| format!("failed to parse input manifest {}", cli.input.display()))?;

    info!(uld_count = ulds.len(), package_count = packages.len(), k, "manifest parsed");

    let cfg = ManagerConfig::builder().k(k).build();
    let outcome = match manager::run(packages, ulds, &cfg) {
        Ok(outcome) => outcome,
        Err(CargoPackError::ValidationFailed(report)) => {
            bail!("solution failed validation: {report}");
        }
        Err(err) => return Err(err.into()),
    };

    let rendered = render_solution(&outcome.packages, &outcome.report);
    fs::write(&cli.output, rendered)
        .with_context(|| format!("failed to write output file {}", cli.output.display()))?;

    info!(
        total_cost = outcome.report.total_cost,
        packages_loaded = outcome.packages.iter().filter(|p| p.is_loaded()).count(),
        "run complete"
    );

    Ok(())
}

/// Parses the line-oriented manifest format from `SPEC_FULL.md` §6:
/// `<uld_count>` lines of `id,L,W,H,weight_capacity`, then `<package_count>`
/// lines of `id,L,W,H,weight,Priority|Economy,delay`, then `<K>`.
fn parse_manifest(contents: &str) -> anyhow::Result<(Vec<Uld>, Vec<Package>, i64)> {
    let lines: Vec<&str> = contents.lines().collect();
    let mut cursor = 0usize;

    let uld_count: usize = next_line(&lines, &mut cursor)?.trim().parse().context("uld_count must be an integer")?;
    let mut ulds = Vec::with_capacity(uld_count);
    for _ in 0..uld_count {
        let line = next_line(&lines, &mut cursor)?;
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 5 {
            bail!("malformed ULD line: {line}");
        }
        let id: u32 = fields[0].trim().parse().with_context(|| format!("bad ULD id: {}", fields[0]))?;
        let length: i64 = fields[1].trim().parse().context("bad ULD length")?;
        let width: i64 = fields[2].trim().parse().context("bad ULD width")?;
        let height: i64 = fields[3].trim().parse().context("bad ULD height")?;
        let weight_capacity: i64 = fields[4].trim().parse().context("bad ULD weight_capacity")?;
        ulds.push(Uld::new(id, Dims::new(length, width, height), weight_capacity));
    }

    let package_count: usize = next_line(&lines, &mut cursor)?
        .trim()
        .parse()
        .context("package_count must be an integer")?;
    let mut packages = Vec::with_capacity(package_count);
    for _ in 0..package_count {
        let line = next_line(&lines, &mut cursor)?;
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 7 {
            bail!("malformed package line: {line}");
        }
        let id = fields[0].trim().to_string();
        let length: i64 = fields[1].trim().parse().context("bad package length")?;
        let width: i64 = fields[2].trim().parse().context("bad package width")?;
        let height: i64 = fields[3].trim().parse().context("bad package height")?;
        let weight: i64 = fields[4].trim().parse().context("bad package weight")?;
        let class = if fields[5].trim() == "Priority" {
            PackageClass::Priority
        } else {
            PackageClass::Economy
        };
        let delay: i64 = fields[6].trim().parse().context("bad package delay")?;
        packages.push(Package::new(id, Dims::new(length, width, height), weight, class, delay));
    }

    let k: i64 = next_line(&lines, &mut cursor)?.trim().parse().context("K must be an integer")?;

    Ok((ulds, packages, k))
}

fn next_line<'a>(lines: &[&'a str], cursor: &mut usize) -> anyhow::Result<&'a str> {
    let line = lines.get(*cursor).copied().context("manifest ended unexpectedly")?;
    *cursor += 1;
    Ok(line)
}

/// Renders the output format from `SPEC_FULL.md` §6: a header line
/// `total_cost,num_packages_loaded,priority_uld_count`, then one line per
/// package (min/max corners for loaded packages, `NONE,-1,-1,-1,-1,-1,-1`
/// otherwise).
fn render_solution(packages: &[Package], report: &uld_packer_core::ValidationReport) -> String {
    let packages_loaded = packages.iter().filter(|p| p.is_loaded()).count();
    let mut out = format!("{},{},{}\n", report.total_cost, packages_loaded, report.priority_uld_count);

    for p in packages {
        match p.placement {
            Some(placement) => {
                let min = placement.min_corner;
                let max = placement.max_corner;
                out.push_str(&format!(
                    "{},{},{},{},{},{},{},{}\n",
                    p.id, placement.uld_id, min.x, min.y, min.z, max.x, max.y, max.z
                ));
            }
            None => {
                out.push_str(&format!("{},NONE,-1,-1,-1,-1,-1,-1\n", p.id));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_manifest() {
        let manifest = "1\nU1,10,10,10,100\n1\nP1,5,5,5,10,Priority,0\n5000\n";
        let (ulds, packages, k) = parse_manifest(manifest).expect("valid manifest");
        assert_eq!(ulds.len(), 1);
        assert_eq!(packages.len(), 1);
        assert_eq!(k, 5000);
        assert!(packages[0].is_priority());
    }

    #[test]
    fn rejects_truncated_manifest() {
        let manifest = "1\nU1,10,10,10,100\n";
        assert!(parse_manifest(manifest).is_err());
    }

    #[test]
    fn renders_loaded_and_unloaded_packages() {
        let ulds = vec![Uld::new(1, Dims::new(10, 10, 10), 100)];
        let mut packages = vec![
            Package::new("p1", Dims::new(5, 5, 5), 1, PackageClass::Priority, 0),
            Package::new("p2", Dims::new(5, 5, 5), 1, PackageClass::Economy, 3),
        ];
        packages[0].placement = Some(uld_packer_core::model::Placement {
            uld_id: 1,
            min_corner: uld_packer_core::geometry::Point3::ORIGIN,
            max_corner: uld_packer_core::geometry::Point3::new(5, 5, 5),
        });
        let report = uld_packer_core::validator::validate(&packages, &ulds, 100);
        let rendered = render_solution(&packages, &report);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "p1,1,0,0,0,5,5,5");
        assert_eq!(lines[2], "p2,NONE,-1,-1,-1,-1,-1,-1");
    }
}

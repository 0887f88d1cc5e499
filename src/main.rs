use std::env;

use anyhow::Context;
use stochastic_spectral::grid::RegularGrid;
use stochastic_spectral::random::RandomSource;
use stochastic_spectral::random::DEFAULT_SEED;
use stochastic_spectral::spectral::CauchyModel;
use stochastic_spectral::spectral::ExponentialCauchy;
use stochastic_spectral::spectral::SpectralModel;
use stochastic_spectral::stochastic::SpectralNormalProcess;
use stochastic_spectral::SimulationError;
use tracing::info;
use tracing_subscriber::EnvFilter;

const POINTS: usize = 8;
const MAXIMAL_FREQUENCY: f64 = 10.0;

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(true)
    .with_writer(std::io::stderr)
    .init();
}

fn seed_from_env() -> anyhow::Result<u64> {
  match env::var("SPECTRAL_SEED") {
    Ok(raw) => raw
      .trim()
      .parse()
      .with_context(|| format!("SPECTRAL_SEED must be an unsigned integer, got {raw:?}")),
    Err(_) => Ok(DEFAULT_SEED),
  }
}

fn show(label: &str, process: &SpectralNormalProcess) {
  println!("{label} = {process}");
  println!("Realization =\n{}", process.realization());
}

type ModelFactory = fn() -> Result<SpectralModel, SimulationError>;

fn exponential_cauchy_1d() -> Result<SpectralModel, SimulationError> {
  Ok(ExponentialCauchy::new(&[1.0], &[1.0])?.into())
}

// scale left at dimension 1 while amplitude has dimension 3
fn cauchy_3d_one_scale() -> Result<SpectralModel, SimulationError> {
  Ok(CauchyModel::new(&[1.0], &[1.0; 3])?.into())
}

fn cauchy_3d() -> Result<SpectralModel, SimulationError> {
  Ok(CauchyModel::new(&[1.0; 3], &[1.0; 3])?.into())
}

/// Builds both generators of a scenario, time grid first, then `(F, K)`.
fn scenario(name: &str, model: ModelFactory, grid: RegularGrid) -> Result<(), SimulationError> {
  let model = model()?;
  println!("{name} model = {model}");

  let on_grid = SpectralNormalProcess::new(model.clone(), grid)?;
  show(&format!("{name} on grid"), &on_grid);

  let band_limited = SpectralNormalProcess::with_maximal_frequency(model, MAXIMAL_FREQUENCY, POINTS)?;
  show(&format!("{name} band limited"), &band_limited);
  Ok(())
}

fn main() -> anyhow::Result<()> {
  init_tracing();

  let seed = seed_from_env()?;
  RandomSource::global().set_seed(seed);
  info!(seed, "random source seeded");

  let grid = RegularGrid::new(0.0, 1.0 / (POINTS - 1) as f64, POINTS)?;

  let scenarios: [(&str, ModelFactory); 3] = [
    ("exponential cauchy 1d", exponential_cauchy_1d),
    ("cauchy 3d, one scale", cauchy_3d_one_scale),
    ("cauchy 3d", cauchy_3d),
  ];

  for (name, model) in scenarios {
    if let Err(err) = scenario(name, model, grid) {
      eprintln!("{name}: {}: {}", err.kind(), err.message());
    }
  }

  Ok(())
}

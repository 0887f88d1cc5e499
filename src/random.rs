//! # Random Source
//!
//! $$
//! s_{k+1}=F(s_k),\qquad \xi_k=T(s_k)\sim\mathcal N(0,1)
//! $$
//!
//! Seedable standard-normal stream shared between generators. The engine is
//! xoshiro256++ seeded through SplitMix64; every access goes through one
//! mutex so a fixed seed and a fixed call order always reproduce the same
//! draws, whatever thread performs them.
//!
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::OnceLock;
use std::sync::PoisonError;

use rand::Rng;
use rand::SeedableRng;
use rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Seed of the process-wide source when nobody reseeds it.
pub const DEFAULT_SEED: u64 = 0;

#[derive(Debug)]
struct SourceState {
  seed: u64,
  rng: Xoshiro256PlusPlus,
}

impl SourceState {
  fn seeded(seed: u64) -> Self {
    Self {
      seed,
      rng: Xoshiro256PlusPlus::seed_from_u64(seed),
    }
  }
}

#[derive(Debug)]
pub struct RandomSource {
  state: Mutex<SourceState>,
}

impl RandomSource {
  pub fn new(seed: u64) -> Self {
    Self {
      state: Mutex::new(SourceState::seeded(seed)),
    }
  }

  /// Process-wide source, created on first use with [`DEFAULT_SEED`].
  pub fn global() -> Arc<RandomSource> {
    static GLOBAL: OnceLock<Arc<RandomSource>> = OnceLock::new();
    GLOBAL
      .get_or_init(|| Arc::new(RandomSource::new(DEFAULT_SEED)))
      .clone()
  }

  // The state is a plain PRNG, so a panic while holding the lock cannot
  // leave it logically inconsistent.
  fn lock(&self) -> MutexGuard<'_, SourceState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Restarts the stream from `seed`.
  pub fn set_seed(&self, seed: u64) {
    *self.lock() = SourceState::seeded(seed);
  }

  /// Seed of the last (re)seeding.
  pub fn seed(&self) -> u64 {
    self.lock().seed
  }

  pub fn draw_normal(&self) -> f64 {
    self.lock().rng.sample(StandardNormal)
  }

  /// Fills `out` with standard normals inside a single critical section.
  pub fn fill_standard_normal(&self, out: &mut [f64]) {
    let mut state = self.lock();
    for x in out.iter_mut() {
      *x = state.rng.sample(StandardNormal);
    }
  }

  /// Runs `f` with exclusive access to the engine.
  pub fn with_rng<R, F>(&self, f: F) -> R
  where
    F: FnOnce(&mut Xoshiro256PlusPlus) -> R,
  {
    f(&mut self.lock().rng)
  }

  /// Hands out `m` private streams. Stream `i` starts at the current state
  /// advanced by `i` jumps of 2^128 draws, so the streams never overlap and
  /// the shared stream resumes after the last of them.
  pub fn split(&self, m: usize) -> Vec<Xoshiro256PlusPlus> {
    let mut state = self.lock();
    let mut streams = Vec::with_capacity(m);
    for _ in 0..m {
      streams.push(state.rng.clone());
      state.rng.jump();
    }
    streams
  }
}

impl Default for RandomSource {
  fn default() -> Self {
    Self::new(DEFAULT_SEED)
  }
}

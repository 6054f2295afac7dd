//! Simulation Engine
//!
//! Drives the timestep loop. Each step:
//! 1. Agents at or above one half run an experiment
//! 2. Every agent averages the table posteriors over its neighbors' results
//! 3. The entropy of the new credence distribution is recorded
//! 4. The grid is tested for stability, then against the step limit
//!
//! Updates are synchronous: every lookup reads the grid as it was before
//! the step, and the new credences go to a separate buffer that is swapped
//! in afterwards.

use belief_events::{GridSnapshot, OutputMode, RunStatus};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::components::{Grid, EXPERIMENT_THRESHOLD};
use crate::config::SimulationConfig;
use crate::error::{ConfigError, SimError};
use crate::output::{ResultAssembler, RunResult};
use crate::setup::{initial_grid, NeighborhoodTable};
use crate::systems::{credence_entropy, is_stable, EvidenceTables, Experiment, TableCache, UpdateTable};

/// Cooperative cancellation flag, polled once per step.
///
/// Clones share the same flag, so whoever hosts the run (a display, a
/// signal handler) keeps a clone and raises it.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Step-wise simulation of one configuration.
pub struct SimulationEngine<R = SmallRng> {
    grid: Grid,
    /// Write buffer for the next step's credences
    next: Vec<f64>,
    /// Success counts from this step's experiments, `None` for non-experimenters
    evidence: Vec<Option<u32>>,
    neighborhoods: Arc<NeighborhoodTable>,
    evidence_tables: Arc<EvidenceTables>,
    update_table: Arc<UpdateTable>,
    experiment: Experiment,
    m: f64,
    max_steps: u64,
    step: u64,
    status: RunStatus,
    entropy: Vec<f64>,
    abort: AbortSignal,
    rng: R,
}

impl SimulationEngine<SmallRng> {
    /// Engine seeded from `config.seed`.
    pub fn seeded(
        config: &SimulationConfig,
        cache: &TableCache,
        abort: AbortSignal,
    ) -> Result<Self, SimError> {
        Self::new(config, cache, abort, SmallRng::seed_from_u64(config.seed))
    }
}

impl<R: Rng> SimulationEngine<R> {
    /// Validates `config`, fetches tables from `cache` and draws the
    /// initial grid and neighborhoods from `rng`, in that order.
    pub fn new(
        config: &SimulationConfig,
        cache: &TableCache,
        abort: AbortSignal,
        mut rng: R,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let grid = initial_grid(config, &mut rng)?;
        let neighborhoods = NeighborhoodTable::build(config.dim, config.degree, &mut rng)?;
        Self::assemble_engine(config, cache, abort, rng, grid, Arc::new(neighborhoods))
    }

    /// Like [`SimulationEngine::new`] but reuses a neighborhood table, for
    /// repeated trials on the same network.
    pub fn with_neighborhoods(
        config: &SimulationConfig,
        cache: &TableCache,
        neighborhoods: Arc<NeighborhoodTable>,
        abort: AbortSignal,
        mut rng: R,
    ) -> Result<Self, SimError> {
        config.validate()?;
        if neighborhoods.dim() != config.dim || neighborhoods.degree() != config.degree {
            return Err(ConfigError::NeighborhoodMismatch {
                dim: config.dim,
                degree: config.degree,
                found_dim: neighborhoods.dim(),
                found_degree: neighborhoods.degree(),
            }
            .into());
        }
        let grid = initial_grid(config, &mut rng)?;
        Self::assemble_engine(config, cache, abort, rng, grid, neighborhoods)
    }

    fn assemble_engine(
        config: &SimulationConfig,
        cache: &TableCache,
        abort: AbortSignal,
        rng: R,
        grid: Grid,
        neighborhoods: Arc<NeighborhoodTable>,
    ) -> Result<Self, SimError> {
        let evidence_tables = cache.evidence(config.n)?;
        let update_table = cache.update_table(config.m, config.n, config.granularity)?;
        let experiment = Experiment::new(config.n, config.p)?;
        let cells = grid.len();

        tracing::info!(
            dim = config.dim,
            degree = config.degree,
            p = config.p,
            n = config.n,
            m = config.m,
            granularity = config.granularity,
            max_steps = config.max_steps,
            "simulation engine ready"
        );

        Ok(Self {
            grid,
            next: vec![0.0; cells],
            evidence: vec![None; cells],
            neighborhoods,
            evidence_tables,
            update_table,
            experiment,
            m: config.m,
            max_steps: config.max_steps,
            step: 0,
            status: RunStatus::Running,
            entropy: Vec::new(),
            abort,
            rng,
        })
    }

    /// Executes one step unless the run is over, and returns the state.
    ///
    /// An abort raised before the call ends the run without executing the
    /// step; the grid stays as of the last completed step.
    pub fn advance(&mut self) -> GridSnapshot {
        if self.status.is_terminal() {
            return self.snapshot();
        }
        if self.abort.is_aborted() {
            tracing::warn!(step = self.step, "abort requested, stopping run");
            self.status = RunStatus::UserAborted;
            return self.snapshot();
        }

        self.run_experiments();
        self.update_credences();

        let entropy = credence_entropy(self.grid.cells());
        self.entropy.push(entropy);
        self.step += 1;

        if is_stable(self.grid.cells(), self.m) {
            self.status = RunStatus::StableConverged;
        } else if self.step >= self.max_steps {
            self.status = RunStatus::MaxStepsReached;
        }

        tracing::debug!(
            step = self.step,
            entropy,
            experimenters = self.grid.experimenters(),
            "step complete"
        );
        if self.status.is_terminal() {
            tracing::info!(step = self.step, status = %self.status, "run finished");
        }

        self.snapshot()
    }

    /// Advances until a terminal state and returns it.
    pub fn run_to_completion(&mut self) -> RunStatus {
        while !self.status.is_terminal() {
            self.advance();
        }
        self.status
    }

    /// Draws this step's evidence, in cell order.
    fn run_experiments(&mut self) {
        for (slot, &credence) in self.evidence.iter_mut().zip(self.grid.cells()) {
            *slot = if credence >= EXPERIMENT_THRESHOLD {
                Some(self.experiment.run(&mut self.rng))
            } else {
                None
            };
        }
    }

    /// Writes every cell's new credence from the frozen grid, then swaps.
    fn update_credences(&mut self) {
        let previous = self.grid.cells();
        let evidence = &self.evidence;
        let neighborhoods = &*self.neighborhoods;
        let table = &*self.update_table;

        self.next.par_iter_mut().enumerate().for_each(|(cell, next)| {
            *next = updated_credence(cell, previous, evidence, neighborhoods, table);
        });

        self.grid.swap_cells(&mut self.next);
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Steps executed so far.
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn entropy_trace(&self) -> &[f64] {
        &self.entropy
    }

    pub fn neighborhoods(&self) -> &Arc<NeighborhoodTable> {
        &self.neighborhoods
    }

    pub fn abort_signal(&self) -> &AbortSignal {
        &self.abort
    }

    /// Current grid and machine status.
    pub fn snapshot(&self) -> GridSnapshot {
        let snapshot = GridSnapshot::new(
            self.step,
            self.status,
            self.grid.dim(),
            self.grid.cells().to_vec(),
        );
        match self.entropy.last() {
            Some(&entropy) => snapshot.with_entropy(entropy),
            None => snapshot,
        }
    }

    fn assembler(&self) -> ResultAssembler<'_> {
        ResultAssembler {
            grid: &self.grid,
            entropy: &self.entropy,
            evidence: &self.evidence_tables,
            update: &self.update_table,
        }
    }

    /// Result for `mode` from the current state.
    pub fn assemble(&self, mode: OutputMode) -> RunResult {
        self.assembler().assemble(mode)
    }

    /// Result for a mode given by name.
    pub fn assemble_named(&self, mode: &str) -> Result<RunResult, SimError> {
        self.assembler().assemble_named(mode)
    }
}

/// New credence of `cell`: the mean posterior over neighbors that produced
/// evidence, or the old credence when none did.
fn updated_credence(
    cell: usize,
    previous: &[f64],
    evidence: &[Option<u32>],
    neighborhoods: &NeighborhoodTable,
    table: &UpdateTable,
) -> f64 {
    let own = previous[cell];
    let (sum, count) = neighborhoods
        .neighbors(cell)
        .iter()
        .filter_map(|&j| evidence[j].map(|e| table.lookup(own, previous[j], e)))
        .fold((0.0, 0usize), |(sum, count), posterior| (sum + posterior, count + 1));

    if count == 0 {
        own
    } else {
        sum / count as f64
    }
}

/// Runs `config` to completion and returns the result for its output mode.
///
/// The output mode is only checked once the run has finished.
pub fn run<R: Rng>(
    config: &SimulationConfig,
    cache: &TableCache,
    abort: AbortSignal,
    rng: R,
) -> Result<RunResult, SimError> {
    let mut engine = SimulationEngine::new(config, cache, abort, rng)?;
    engine.run_to_completion();
    engine.assemble_named(&config.output_mode)
}

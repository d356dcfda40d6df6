//! Independent replicates of one program.
//!
//! Each replicate builds its own `Program` (sites, queues, RNG) inside the
//! worker that runs it, so replicates share nothing but the builder closure.
//! With the `parallel` feature they run on Rayon's pool; otherwise one after
//! another.  Either way the output is in replicate order and each replicate's
//! draws depend only on its seed.

use ldar_core::SeedTable;
use tracing::info;

use crate::{Program, ProgramObserver, ProgramResult, ProgramSummary};

/// Result of one replicate.
#[derive(Debug)]
pub struct Replicate<O> {
    pub index:    usize,
    pub seed:     u64,
    pub summary:  ProgramSummary,
    pub observer: O,
}

/// Run one replicate per seed in `seeds`.
///
/// `build(index, seed)` returns a fresh program and the observer that
/// records it.  The first error aborts the batch.
pub fn run_replicates<O, F>(seeds: &SeedTable, num_threads: Option<usize>, build: F) -> ProgramResult<Vec<Replicate<O>>>
where
    O: ProgramObserver + Send,
    F: Fn(usize, u64) -> ProgramResult<(Program, O)> + Sync,
{
    info!(replicates = seeds.len(), "replicate batch start");

    let run_one = |index: usize, seed: u64| -> ProgramResult<Replicate<O>> {
        let (mut program, mut observer) = build(index, seed)?;
        let summary = program.run(&mut observer)?;
        Ok(Replicate { index, seed, summary, observer })
    };
    let jobs: Vec<(usize, u64)> = seeds.iter().enumerate().collect();

    #[cfg(not(feature = "parallel"))]
    let results = {
        let _ = num_threads;
        jobs.into_iter().map(|(i, seed)| run_one(i, seed)).collect::<ProgramResult<Vec<_>>>()
    };

    #[cfg(feature = "parallel")]
    let results = {
        use rayon::prelude::*;

        let run_all = || jobs.into_par_iter().map(|(i, seed)| run_one(i, seed)).collect::<ProgramResult<Vec<_>>>();
        match num_threads {
            Some(n) => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| crate::ProgramError::Config(format!("thread pool: {e}")))?
                .install(run_all),
            None => run_all(),
        }
    };

    let results = results?;
    info!(replicates = results.len(), "replicate batch end");
    Ok(results)
}

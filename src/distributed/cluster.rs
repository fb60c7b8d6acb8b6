//! The fixed set of locales
//!
//! A [`Cluster`] owns everything a generation call needs to run per locale:
//! the locale count, a rayon pool for data-parallel work inside a locale, the
//! chunk size that fixes how a locale splits its range into random streams,
//! and the seed sequence.
//!
//! Each locale runs on its own scoped thread (crossbeam), so a locale can block
//! in a collective while the others keep working. Inside a locale, loops run
//! on the shared rayon pool via [`Cluster::install`].

use crate::config::{ClusterConfig, RuntimeConfig};
use crate::error::{GenError, GenResult};
use crate::util::seed::{SeedSequence, StreamSeed};
use std::time::Instant;

/// Fixed set of cooperating locales
#[derive(Debug)]
pub struct Cluster {
    num_locales: usize,
    chunk_size: usize,
    pool: rayon::ThreadPool,
    seeds: SeedSequence,
    debug: bool,
}

impl Cluster {
    /// Create a cluster from configuration
    pub fn new(cluster: &ClusterConfig, runtime: &RuntimeConfig) -> GenResult<Self> {
        if cluster.locales == 0 {
            return Err(GenError::Argument("cluster needs at least one locale".to_string()));
        }
        if cluster.chunk_size == 0 {
            return Err(GenError::Argument("chunk_size must be at least 1".to_string()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(cluster.threads.max(1))
            .thread_name(|i| format!("distrand-task-{}", i))
            .build()
            .map_err(|e| GenError::Cluster(format!("Failed to build thread pool: {}", e)))?;

        if runtime.debug {
            eprintln!(
                "DEBUG: Cluster: {} locales, {} pool threads, chunk size {}, seed {}",
                cluster.locales,
                cluster.threads.max(1),
                cluster.chunk_size,
                runtime.seed.map(|s| s.to_string()).unwrap_or_else(|| "entropy".to_string())
            );
        }

        Ok(Self {
            num_locales: cluster.locales,
            chunk_size: cluster.chunk_size,
            pool,
            seeds: SeedSequence::new(runtime.seed),
            debug: runtime.debug,
        })
    }

    /// Cluster with `num_locales` locales and default settings (entropy seed)
    pub fn with_locales(num_locales: usize) -> GenResult<Self> {
        let config = ClusterConfig {
            locales: num_locales,
            ..Default::default()
        };
        Self::new(&config, &RuntimeConfig::default())
    }

    /// Cluster with `num_locales` locales and a fixed seed
    pub fn seeded(num_locales: usize, seed: u64) -> GenResult<Self> {
        let config = ClusterConfig {
            locales: num_locales,
            ..Default::default()
        };
        let runtime = RuntimeConfig {
            seed: Some(seed),
            ..Default::default()
        };
        Self::new(&config, &runtime)
    }

    pub fn num_locales(&self) -> usize {
        self.num_locales
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Seed for the next fill call
    pub fn next_seed(&self) -> StreamSeed {
        self.seeds.next()
    }

    /// Run `op` on the cluster's rayon pool
    pub fn install<R, OP>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    /// Run `task` once per input, each on its own locale thread
    ///
    /// Results come back in input order. A panicking locale is reported as
    /// [`GenError::Cluster`].
    pub fn run_locales<I, T, F>(&self, inputs: Vec<I>, task: F) -> GenResult<Vec<T>>
    where
        I: Send,
        T: Send,
        F: Fn(I) -> GenResult<T> + Sync,
    {
        self.run_locales_with(inputs, task, || Ok(())).map(|(results, ())| results)
    }

    /// Run `task` per locale while `coordinate` runs on the calling thread
    ///
    /// Used by collectives: the locale threads block on the coordinator, which
    /// must therefore run concurrently with them.
    pub fn run_locales_with<I, T, F, C, R>(
        &self,
        inputs: Vec<I>,
        task: F,
        coordinate: C,
    ) -> GenResult<(Vec<T>, R)>
    where
        I: Send,
        T: Send,
        F: Fn(I) -> GenResult<T> + Sync,
        C: FnOnce() -> GenResult<R>,
    {
        let task = &task;
        let outcome = crossbeam::scope(|scope| {
            let handles: Vec<_> = inputs
                .into_iter()
                .map(|input| scope.spawn(move |_| task(input)))
                .collect();

            let coordinated = coordinate();

            let mut results = Vec::with_capacity(handles.len());
            let mut first_error = None;
            for (locale, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(Ok(value)) => results.push(value),
                    Ok(Err(e)) => {
                        first_error.get_or_insert(e);
                    }
                    Err(_) => {
                        first_error.get_or_insert(GenError::Cluster(format!("locale {} panicked", locale)));
                    }
                }
            }

            match (coordinated, first_error) {
                (Ok(coordinated), None) => Ok((results, coordinated)),
                // The coordinator only saw a withdrawal; the locale knows why it left.
                (Err(GenError::Cluster(_)), Some(e)) => Err(e),
                (Err(e), _) => Err(e),
                (Ok(_), Some(e)) => Err(e),
            }
        });

        outcome.map_err(|_| GenError::Cluster("locale thread panicked".to_string()))?
    }

    /// Time a phase and report it when debugging
    pub fn timed<R>(&self, phase: &str, op: impl FnOnce() -> R) -> R {
        if !self.debug {
            return op();
        }
        let start = Instant::now();
        let result = op();
        eprintln!("DEBUG TIMING: {}: {:.3}ms", phase, start.elapsed().as_secs_f64() * 1000.0);
        result
    }
}

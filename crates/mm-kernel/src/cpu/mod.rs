pub mod matmul;
pub mod transpose;

use std::sync::OnceLock;

use log::{debug, trace};
use rayon::prelude::*;

use crate::config::{KernelConfig, OutputMode};
use crate::dims::Dims;
use crate::element::Element;
use crate::error::{KernelError, Result};

pub use transpose::transpose;

/// Row-parallel CPU matmul kernel.
///
/// The output is split into contiguous row ranges, at most one per worker,
/// and each range is computed by one task against a transposed copy of B.
/// `multiply` returns only once every task has finished.
#[derive(Debug)]
pub struct Multiplier {
    config: KernelConfig,
    pool: Option<rayon::ThreadPool>,
}

impl Default for Multiplier {
    fn default() -> Self {
        Self {
            config: KernelConfig::default(),
            pool: None,
        }
    }
}

impl Multiplier {
    /// Create a multiplier, building a dedicated worker pool if the config
    /// asks for a fixed thread count.
    pub fn new(config: KernelConfig) -> Result<Self> {
        let pool = match config.num_threads {
            None => None,
            Some(0) => {
                return Err(KernelError::ConcurrencyResourceExhaustion(
                    "num_threads must be at least 1".to_string(),
                ))
            }
            Some(n) => {
                let prefix = config.thread_name_prefix.clone();
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(move |i| format!("{}-{}", prefix, i))
                    .build()?;
                debug!("built worker pool with {} threads", n);
                Some(pool)
            }
        };
        Ok(Self { config, pool })
    }

    /// Process-wide multiplier on the shared rayon pool, accumulating into
    /// the output.
    pub fn shared() -> &'static Multiplier {
        static SHARED: OnceLock<Multiplier> = OnceLock::new();
        SHARED.get_or_init(Multiplier::default)
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Number of worker threads tasks are spread across.
    pub fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Matrix multiplication into a caller-owned buffer: C (+)= A @ B.
    ///
    /// - `a`: row-major data of shape [n, m]
    /// - `b`: row-major data of shape [m, l]
    /// - `c`: row-major data of shape [n, l]
    ///
    /// Buffer lengths are checked before anything is written, so on error
    /// `c` is left as it was. With `n == 0` or `l == 0` there is nothing to
    /// write and `c` is not touched in either output mode.
    pub fn multiply<T: Element>(&self, dims: Dims, a: &[T], b: &[T], c: &mut [T]) -> Result<()> {
        dims.check_buffers(a.len(), b.len(), c.len())?;
        if dims.is_empty_output() {
            trace!("matmul {} {}: empty output", T::KIND, dims);
            return Ok(());
        }

        let bt = transpose(b, dims.m, dims.l)?;

        let workers = self.num_threads();
        let rows = self.config.rows_per_task(dims.n, workers);
        let tasks = dims.n.div_ceil(rows);
        debug!(
            "matmul {} {}: {} tasks of up to {} rows on {} workers",
            T::KIND,
            dims,
            tasks,
            rows,
            workers
        );

        let Dims { m, l, .. } = dims;
        let overwrite = self.config.output_mode == OutputMode::Overwrite;
        let bt = bt.as_slice();
        let run_task = |index: usize, out: &mut [T]| {
            let first = index * rows;
            let count = out.len() / l;
            trace!("task {}: rows {}..{}", index, first, first + count);
            if overwrite {
                out.fill(T::zero());
            }
            matmul::multiply_rows(&a[first * m..(first + count) * m], bt, m, l, out);
        };

        if tasks == 1 {
            run_task(0, c);
        } else {
            self.install(|| {
                c.par_chunks_mut(rows * l)
                    .enumerate()
                    .for_each(|(index, out)| run_task(index, out));
            });
        }
        Ok(())
    }

    fn install<OP: FnOnce() + Send>(&self, op: OP) {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

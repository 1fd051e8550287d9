/// How the kernel treats values already present in the output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Add the product onto the existing contents of C. Callers that want
    /// the plain product must pass a zeroed buffer.
    #[default]
    Accumulate,
    /// Zero each output row before accumulating into it.
    Overwrite,
}

/// Settings for a [`Multiplier`](crate::Multiplier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelConfig {
    /// Size of a dedicated worker pool. `None` runs on the shared rayon pool.
    pub num_threads: Option<usize>,
    /// Lower bound on the number of rows handed to one task.
    pub min_rows_per_task: usize,
    /// Accumulate into or overwrite the output.
    pub output_mode: OutputMode,
    /// Name prefix for the threads of a dedicated pool.
    pub thread_name_prefix: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            min_rows_per_task: 1,
            output_mode: OutputMode::Accumulate,
            thread_name_prefix: "mm-worker".to_string(),
        }
    }
}

impl KernelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    pub fn with_min_rows_per_task(mut self, rows: usize) -> Self {
        self.min_rows_per_task = rows;
        self
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Rows per task for an `n`-row output spread over `workers` threads.
    ///
    /// Never returns 0; the task count `ceil(n / rows)` never exceeds
    /// `workers`.
    pub fn rows_per_task(&self, n: usize, workers: usize) -> usize {
        let even_split = n.div_ceil(workers.max(1));
        even_split.max(self.min_rows_per_task).max(1)
    }
}

use mm_kernel::{KernelConfig, KernelError, OutputMode};

/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MMStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorInvalidDimension = 2,
    ErrorOutOfMemory = 3,
    ErrorConcurrency = 4,
    ErrorInternal = 5,
}

impl From<&KernelError> for MMStatus {
    fn from(e: &KernelError) -> Self {
        match e {
            KernelError::InvalidDimension { .. }
            | KernelError::BufferLength { .. }
            | KernelError::DataLength { .. }
            | KernelError::DimensionMismatch { .. } => MMStatus::ErrorInvalidDimension,
            KernelError::AllocationFailure { .. } => MMStatus::ErrorOutOfMemory,
            KernelError::ConcurrencyResourceExhaustion(_) => MMStatus::ErrorConcurrency,
        }
    }
}

/// Parameters for a dedicated kernel created with `mm_kernel_create`.
#[repr(C)]
#[derive(Debug, Clone)]
pub struct MMKernelParams {
    /// Worker threads; 0 shares the process-wide pool.
    pub num_threads: u32,
    /// Lower bound on rows per task; 0 is treated as 1.
    pub min_rows_per_task: u32,
    /// Zero the output before accumulating into it.
    pub overwrite_output: bool,
}

impl Default for MMKernelParams {
    fn default() -> Self {
        Self {
            num_threads: 0,
            min_rows_per_task: 1,
            overwrite_output: false,
        }
    }
}

impl From<&MMKernelParams> for KernelConfig {
    fn from(params: &MMKernelParams) -> Self {
        let mut config = KernelConfig::default()
            .with_min_rows_per_task(params.min_rows_per_task as usize);
        if params.num_threads > 0 {
            config = config.with_num_threads(params.num_threads as usize);
        }
        if params.overwrite_output {
            config = config.with_output_mode(OutputMode::Overwrite);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_matches_kernel_code() {
        let errors = [
            KernelError::InvalidDimension {
                name: "n",
                value: -1,
            },
            KernelError::AllocationFailure { elements: 1 },
            KernelError::ConcurrencyResourceExhaustion("x".to_string()),
        ];
        for e in &errors {
            assert_eq!(MMStatus::from(e) as i32, e.status_code());
        }
    }

    #[test]
    fn test_params_to_config() {
        let config = KernelConfig::from(&MMKernelParams::default());
        assert_eq!(config.num_threads, None);
        assert_eq!(config.output_mode, OutputMode::Accumulate);

        let params = MMKernelParams {
            num_threads: 4,
            min_rows_per_task: 8,
            overwrite_output: true,
        };
        let config = KernelConfig::from(&params);
        assert_eq!(config.num_threads, Some(4));
        assert_eq!(config.min_rows_per_task, 8);
        assert_eq!(config.output_mode, OutputMode::Overwrite);
    }
}

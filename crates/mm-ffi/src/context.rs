use mm_kernel::{KernelConfig, Multiplier, Result};

/// Opaque handle owning a multiplier and its worker pool.
#[derive(Debug)]
pub struct MMKernel {
    pub multiplier: Multiplier,
}

impl MMKernel {
    pub fn new(config: KernelConfig) -> Result<Self> {
        Ok(Self {
            multiplier: Multiplier::new(config)?,
        })
    }
}

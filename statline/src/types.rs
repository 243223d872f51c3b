//! Types that mirror the agent's JSON wire schema.

use serde::{Deserialize, Serialize};

/// Accelerator reading meaning "no gpu on the producer host". Distinct from
/// a measured 0%.
pub const GPU_UNAVAILABLE: f32 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub cpu_usage: f32,
    pub memory_usage: f32,
    pub gpu_usage: f32,
}

impl Sample {
    pub fn gpu_available(&self) -> bool {
        self.gpu_usage >= 0.0
    }
}

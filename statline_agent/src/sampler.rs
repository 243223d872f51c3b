//! Host sampling: cpu + memory via sysinfo, accelerator via the detected
//! probe. Produces one immutable [`Sample`] per call.

use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use crate::gpu::{self, GpuProbe};
use crate::wire::Sample;

pub struct Sampler {
    sys: System,
    gpu: Box<dyn GpuProbe>,
}

impl Sampler {
    pub fn new() -> Self {
        Self::with_probe(gpu::detect())
    }

    pub fn with_probe(gpu: Box<dyn GpuProbe>) -> Self {
        // Only cpu + memory are refreshed; nothing else is collected.
        let refresh = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything());
        let mut sys = System::new_with_specifics(refresh);
        // Prime cpu counters so the first real sample has a usable delta.
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        Self { sys, gpu }
    }

    /// Take one reading. Missing accelerator hardware is not an error; the
    /// probe substitutes the sentinel.
    pub fn collect(&mut self) -> Sample {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();

        let cpu_usage = self.sys.global_cpu_usage().clamp(0.0, 100.0);

        let total = self.sys.total_memory();
        let used = total.saturating_sub(self.sys.available_memory());
        let memory_usage = if total == 0 {
            0.0
        } else {
            ((used as f32 / total as f32) * 100.0).clamp(0.0, 100.0)
        };

        Sample {
            cpu_usage,
            memory_usage,
            gpu_usage: self.gpu.utilization(),
        }
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

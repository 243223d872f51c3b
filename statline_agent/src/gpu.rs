//! Accelerator utilization probe. Detection runs once at startup and picks
//! either the NVML-backed probe or a null probe reporting the sentinel, so
//! the sampling path never branches on hardware availability.

use nvml_wrapper::Nvml;
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::wire::GPU_UNAVAILABLE;

pub trait GpuProbe: Send {
    /// Current accelerator load in percent, or the sentinel when the reading
    /// cannot be taken. Never fails.
    fn utilization(&self) -> f32;
}

/// Reads utilization of GPU 0 through NVML.
pub struct NvmlProbe {
    nvml: Nvml,
}

impl GpuProbe for NvmlProbe {
    fn utilization(&self) -> f32 {
        let rates = self
            .nvml
            .device_by_index(0)
            .and_then(|dev| dev.utilization_rates());
        match rates {
            Ok(u) => (u.gpu as f32).clamp(0.0, 100.0),
            Err(e) => {
                warn!("gpu utilization query failed: {e}");
                GPU_UNAVAILABLE
            }
        }
    }
}

/// Stand-in for hosts without an accelerator.
pub struct NullProbe;

impl GpuProbe for NullProbe {
    fn utilization(&self) -> f32 {
        GPU_UNAVAILABLE
    }
}

// Disable probing entirely with STATLINE_AGENT_GPU=0.
fn gpu_enabled() -> bool {
    static ON: OnceCell<bool> = OnceCell::new();
    *ON.get_or_init(|| {
        std::env::var("STATLINE_AGENT_GPU")
            .map(|v| v != "0")
            .unwrap_or(true)
    })
}

/// Probe the hardware once and return the matching collector.
pub fn detect() -> Box<dyn GpuProbe> {
    if !gpu_enabled() {
        debug!("gpu probing disabled, reporting sentinel");
        return Box::new(NullProbe);
    }
    match Nvml::init() {
        Ok(nvml) if nvml.device_count().map(|n| n > 0).unwrap_or(false) => {
            debug!("nvml initialized, streaming gpu utilization");
            Box::new(NvmlProbe { nvml })
        }
        Ok(_) => {
            debug!("nvml initialized but no devices present");
            Box::new(NullProbe)
        }
        Err(e) => {
            debug!("nvml unavailable ({e}), gpu usage reported as sentinel");
            Box::new(NullProbe)
        }
    }
}

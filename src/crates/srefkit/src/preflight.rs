//! Resource sufficiency checks for local analysis.
//!
//! Local inference is gated on free memory before any engine call. The probe
//! sits behind a trait so orchestrator tests can pin the reading.

use sysinfo::System;

use crate::settings::ModelVariant;

/// Minimum free memory to serve each variant, weights plus projector plus
/// working headroom, in GB.
pub fn required_memory_gb(variant: ModelVariant) -> f32 {
    match variant {
        ModelVariant::Qwen2Vl2B => 3.5,
        ModelVariant::Qwen2Vl7B => 9.0,
        ModelVariant::Qwen2Vl72B => 50.0,
    }
}

/// Source of the available-memory reading.
pub trait ResourceProbe: Send + Sync {
    fn available_memory_gb(&self) -> f32;
}

/// Probe backed by the live system.
#[derive(Debug, Default)]
pub struct SystemProbe;

impl ResourceProbe for SystemProbe {
    fn available_memory_gb(&self) -> f32 {
        let mut sys = System::new_all();
        sys.refresh_memory();
        sys.available_memory() as f32 / 1_073_741_824.0
    }
}

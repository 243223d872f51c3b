//! Bounded rolling histories, one per streamed metric. The ingest task
//! appends, the display tick reads snapshots; both go through a shared
//! mutex so there is no unsynchronized access.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::types::Sample;

/// Samples retained per metric.
pub const HISTORY_CAP: usize = 100;

/// Push to a bounded deque, evicting from the front once over capacity.
pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    dq.push_back(v);
    while dq.len() > cap {
        dq.pop_front();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Cpu,
    Memory,
    Gpu,
}

pub struct RollingStore {
    cpu: VecDeque<f32>,
    memory: VecDeque<f32>,
    gpu: VecDeque<f32>,
    cap: usize,
}

/// Point-in-time copy of all three series, handed to the display side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub cpu: Vec<f32>,
    pub memory: Vec<f32>,
    pub gpu: Vec<f32>,
}

impl RollingStore {
    pub fn new(cap: usize) -> Self {
        Self {
            cpu: VecDeque::with_capacity(cap),
            memory: VecDeque::with_capacity(cap),
            gpu: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn append(&mut self, metric: Metric, value: f32) {
        let cap = self.cap;
        push_capped(self.series_mut(metric), value, cap);
    }

    /// Append one decoded sample across all three series.
    pub fn record(&mut self, sample: &Sample) {
        self.append(Metric::Cpu, sample.cpu_usage);
        self.append(Metric::Memory, sample.memory_usage);
        self.append(Metric::Gpu, sample.gpu_usage);
    }

    pub fn len(&self, metric: Metric) -> usize {
        self.series(metric).len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpu.is_empty() && self.memory.is_empty() && self.gpu.is_empty()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cpu: self.cpu.iter().copied().collect(),
            memory: self.memory.iter().copied().collect(),
            gpu: self.gpu.iter().copied().collect(),
        }
    }

    fn series(&self, metric: Metric) -> &VecDeque<f32> {
        match metric {
            Metric::Cpu => &self.cpu,
            Metric::Memory => &self.memory,
            Metric::Gpu => &self.gpu,
        }
    }

    fn series_mut(&mut self, metric: Metric) -> &mut VecDeque<f32> {
        match metric {
            Metric::Cpu => &mut self.cpu,
            Metric::Memory => &mut self.memory,
            Metric::Gpu => &mut self.gpu,
        }
    }
}

pub type SharedStore = Arc<Mutex<RollingStore>>;

pub fn shared(cap: usize) -> SharedStore {
    Arc::new(Mutex::new(RollingStore::new(cap)))
}

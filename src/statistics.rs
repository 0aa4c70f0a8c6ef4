use serde::{Deserialize, Serialize};

use crate::staff::QueueObserver;

/// Length of the waiting line at one instant.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueueSample {
    pub time: f64,
    pub length: usize,
}

/// Headline metrics of one run, produced once by [`StatisticsCollector::finalize()`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub num_staff: usize,
    /// Mean wait of the customers who reached a staff member. Zero when nobody did.
    pub avg_wait_time: f64,
    pub max_wait_time: f64,
    pub max_queue_length: usize,
    /// Busy staff-time as a percentage of available staff-time.
    pub utilization: f64,
    /// Time-weighted mean of the waiting line over the horizon.
    pub avg_queue_length: f64,
    pub customers_reneged: usize,
    pub customers_served: usize,
    /// Customers served per minute.
    pub throughput_rate: f64,
}

/// Observes a run's transitions and derives the [`RunResult`] at the end.
#[derive(Clone, Debug)]
pub struct StatisticsCollector {
    queue_samples: Vec<QueueSample>,
    wait_times: Vec<f64>,
    max_wait_time: f64,
    max_queue_length: usize,
    busy_time: f64,
}

impl Default for StatisticsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl StatisticsCollector {
    /// An empty collector whose line starts out empty at time zero.
    pub fn new() -> Self {
        Self {
            queue_samples: vec![QueueSample { time: 0.0, length: 0 }],
            wait_times: Vec::new(),
            max_wait_time: 0.0,
            max_queue_length: 0,
            busy_time: 0.0,
        }
    }

    pub fn observe_queue_length(&mut self, time: f64, length: usize) {
        self.queue_samples.push(QueueSample { time, length });
        self.max_queue_length = self.max_queue_length.max(length);
    }

    pub fn observe_wait(&mut self, duration: f64) {
        self.wait_times.push(duration);
        self.max_wait_time = self.max_wait_time.max(duration);
    }

    pub fn observe_busy(&mut self, duration: f64) {
        self.busy_time += duration;
    }

    pub fn queue_samples(&self) -> &[QueueSample] {
        &self.queue_samples
    }

    pub fn wait_times(&self) -> &[f64] {
        &self.wait_times
    }

    pub fn busy_time(&self) -> f64 {
        self.busy_time
    }

    /// Derive the run's metrics over `[0, horizon]`.
    ///
    /// Queue samples are sorted by time first; the scheduler already emits them in order, but the integral must not
    /// depend on that. Each sample's length holds until the next sample, and the last one holds until `horizon`.
    /// Samples past the horizon contribute nothing.
    ///
    /// A zero `capacity` or non-positive `horizon` leaves utilization (and throughput, and the queue average)
    /// undefined; those are reported as zero.
    pub fn finalize(&mut self, horizon: f64, capacity: usize, served: usize, reneged: usize) -> RunResult {
        self.queue_samples.sort_by(|a, b| a.time.total_cmp(&b.time));

        let has_horizon = horizon > 0.0;
        let avg_queue_length = if has_horizon {
            self.queue_area(horizon) / horizon
        } else {
            0.0
        };
        let utilization = if has_horizon && capacity > 0 {
            self.busy_time / (capacity as f64 * horizon) * 100.0
        } else {
            0.0
        };
        let throughput_rate = if has_horizon { served as f64 / horizon } else { 0.0 };
        let avg_wait_time = if self.wait_times.is_empty() {
            0.0
        } else {
            self.wait_times.iter().sum::<f64>() / self.wait_times.len() as f64
        };

        RunResult {
            num_staff: capacity,
            avg_wait_time,
            max_wait_time: self.max_wait_time,
            max_queue_length: self.max_queue_length,
            utilization,
            avg_queue_length,
            customers_reneged: reneged,
            customers_served: served,
            throughput_rate,
        }
    }

    /// Integral of the step function through the (sorted) samples over `[0, horizon]`.
    fn queue_area(&self, horizon: f64) -> f64 {
        let mut area = 0.0;
        let mut last_time = 0.0;
        let mut last_length = 0;
        for sample in &self.queue_samples {
            let time = sample.time.clamp(0.0, horizon);
            area += last_length as f64 * (time - last_time);
            last_time = time;
            last_length = sample.length;
        }
        area + last_length as f64 * (horizon - last_time)
    }
}

impl QueueObserver for StatisticsCollector {
    fn queue_length_changed(&mut self, time: f64, length: usize) {
        self.observe_queue_length(time, length);
    }
}

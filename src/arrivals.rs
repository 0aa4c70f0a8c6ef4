//! Where customers come from.
//!
//! All random draws of a run come from one seeded [`Pcg64`] and happen at arrival time, in a fixed order: each new
//! customer's patience, then their service time, then the gap to the next arrival. A draw is therefore used for the
//! same purpose whatever the staffing level, so runs that differ only in staff count face the same callers (common
//! random numbers).

use std::collections::VecDeque;

use ordered_float::NotNan;
use rand::distr::Uniform;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp};
use rand_pcg::Pcg64;

use crate::customer;
use crate::run::{CallCenter, Minutes};
use crate::scheduler::{Event, EventQueue};
use crate::{Config, ConfigError};

/// The run's random stream together with the distributions it feeds.
#[derive(Clone, Debug)]
pub struct CustomerDraws {
    rng: Pcg64,
    patience: Uniform<u32>,
    service_time: Uniform<u32>,
    /// `None` when the arrival rate is zero.
    inter_arrival: Option<Exp<f64>>,
}

impl CustomerDraws {
    /// # Errors
    ///
    /// Rejects the same bounds as [`Config::validate()`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let patience = Uniform::new_inclusive(config.patience_min, config.patience_max).map_err(|_| {
            ConfigError::InvertedPatienceBounds {
                min: config.patience_min,
                max: config.patience_max,
            }
        })?;
        let service_time = Uniform::new_inclusive(config.service_time_min, config.service_time_max).map_err(|_| {
            ConfigError::InvertedServiceBounds {
                min: config.service_time_min,
                max: config.service_time_max,
            }
        })?;
        let inter_arrival = if config.arrival_rate > 0.0 {
            let distribution =
                Exp::new(config.arrival_rate).map_err(|_| ConfigError::InvalidArrivalRate(config.arrival_rate))?;
            Some(distribution)
        } else {
            None
        };

        Ok(Self {
            rng: Pcg64::seed_from_u64(config.seed),
            patience,
            service_time,
            inter_arrival,
        })
    }

    /// Patience and service time, in whole minutes, for a new customer.
    pub fn customer_profile(&mut self) -> (f64, f64) {
        let patience = self.patience.sample(&mut self.rng);
        let service_time = self.service_time.sample(&mut self.rng);
        (f64::from(patience), f64::from(service_time))
    }

    /// Gap until the next Poisson arrival, or `None` if arrivals have been switched off.
    pub fn inter_arrival_gap(&mut self) -> Option<f64> {
        let distribution = self.inter_arrival.as_ref()?;
        Some(distribution.sample(&mut self.rng))
    }
}

/// The stream of arrival instants for one run.
#[derive(Clone, Debug)]
pub enum ArrivalSource {
    /// A burst of `initial` customers at time zero, then exponential gaps.
    Poisson { initial: usize },
    /// A fixed, non-decreasing list of arrival times, one customer each.
    Scripted(VecDeque<f64>),
}

impl ArrivalSource {
    pub fn poisson(config: &Config) -> Self {
        Self::Poisson {
            initial: config.initial_customers,
        }
    }

    pub fn scripted(times: impl IntoIterator<Item = f64>) -> Self {
        Self::Scripted(times.into_iter().collect())
    }

    /// When the first arrival happens and how many customers it brings.
    fn first(&mut self) -> Option<(f64, usize)> {
        match self {
            Self::Poisson { initial } => Some((0.0, *initial)),
            Self::Scripted(times) => times.pop_front().map(|time| (time, 1)),
        }
    }

    /// When the arrival after the one happening `now` is due.
    fn next_after(&mut self, now: f64, draws: &mut CustomerDraws) -> Option<f64> {
        match self {
            Self::Poisson { .. } => draws.inter_arrival_gap().map(|gap| now + gap),
            Self::Scripted(times) => times.pop_front(),
        }
    }
}

/// One or more customers call in; the next arrival is scheduled before this event returns.
#[derive(Debug)]
pub struct ArrivalEvent {
    batch: usize,
}

impl ArrivalEvent {
    /// Seed the queue with the first arrival of `center`'s source.
    ///
    /// # Errors
    ///
    /// [`Error::BackInTime`](crate::Error::BackInTime) if a scripted first arrival lies before the clock, or
    /// [`Error::BadExecution`](crate::Error::BadExecution) if it is NaN.
    pub fn schedule_first(center: &mut CallCenter, queue: &mut EventQueue<CallCenter, Minutes>) -> crate::Result {
        if let Some((time, batch)) = center.arrivals.first() {
            queue.schedule(ArrivalEvent { batch }, to_minutes(time)?)?;
        }
        Ok(())
    }
}

impl Event<CallCenter, Minutes> for ArrivalEvent {
    fn execute(&mut self, center: &mut CallCenter, queue: &mut EventQueue<CallCenter, Minutes>) -> crate::Result {
        for _ in 0..self.batch {
            customer::arrive(center, queue)?;
        }

        let now = queue.current_time().into_inner();
        if let Some(time) = center.arrivals.next_after(now, &mut center.draws) {
            queue.schedule(ArrivalEvent { batch: 1 }, to_minutes(time)?)?;
        }
        Ok(())
    }
}

fn to_minutes(time: f64) -> crate::Result<Minutes> {
    NotNan::new(time).map_err(|error| crate::Error::BadExecution(Box::new(error)))
}

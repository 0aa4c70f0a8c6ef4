use ordered_float::NotNan;
use tracing::info;

use crate::arrivals::{ArrivalEvent, ArrivalSource, CustomerDraws};
use crate::customer::Customer;
use crate::scheduler::Simulation;
use crate::staff::StaffPool;
use crate::statistics::{RunResult, StatisticsCollector};
use crate::{Config, ConfigError, SimState};

/// Simulated minutes. `NotNan` gives the clock the total order the event queue needs.
pub type Minutes = NotNan<f64>;

/// Everything one run mutates: the staff pool, the customers spawned so far, the collector, and the random stream.
///
/// Built fresh for every run, so nothing leaks from one staffing level to the next.
#[derive(Debug)]
pub struct CallCenter {
    pub(crate) staff: StaffPool,
    pub(crate) customers: Vec<Customer>,
    pub(crate) stats: StatisticsCollector,
    pub(crate) arrivals: ArrivalSource,
    pub(crate) draws: CustomerDraws,
    pub(crate) served: usize,
    pub(crate) reneged: usize,
}

impl CallCenter {
    pub fn staff(&self) -> &StaffPool {
        &self.staff
    }

    /// Every customer who called in, in arrival order.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn statistics(&self) -> &StatisticsCollector {
        &self.stats
    }

    pub fn customers_served(&self) -> usize {
        self.served
    }

    pub fn customers_reneged(&self) -> usize {
        self.reneged
    }
}

impl SimState<Minutes> for CallCenter {}

/// One simulation of the call center at a fixed staffing level.
///
/// The first arrival is already scheduled when construction returns, so callers may add their own events (for example
/// probes that check invariants) before calling [`run()`](SimulationRun::run).
#[derive(Debug)]
pub struct SimulationRun {
    simulation: Simulation<CallCenter, Minutes>,
    horizon: Minutes,
}

impl SimulationRun {
    /// A run with Poisson arrivals as described by `config`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoStaff`] for a zero `num_staff`, or whatever [`Config::validate()`] rejects. Nothing has been
    /// scheduled when either is returned.
    pub fn new(config: &Config, num_staff: usize) -> crate::Result<Self> {
        Self::with_source(config, num_staff, ArrivalSource::poisson(config))
    }

    /// A run whose customers call in at exactly `times`, which must be non-decreasing. The arrival rate and initial
    /// burst of `config` are ignored.
    ///
    /// # Errors
    ///
    /// As [`new()`](SimulationRun::new), plus [`Error::BackInTime`](crate::Error::BackInTime) if the first time is
    /// negative.
    pub fn with_arrival_times(
        config: &Config,
        num_staff: usize,
        times: impl IntoIterator<Item = f64>,
    ) -> crate::Result<Self> {
        Self::with_source(config, num_staff, ArrivalSource::scripted(times))
    }

    fn with_source(config: &Config, num_staff: usize, arrivals: ArrivalSource) -> crate::Result<Self> {
        if num_staff == 0 {
            return Err(ConfigError::NoStaff.into());
        }
        config.validate()?;
        let horizon = NotNan::new(config.sim_time).map_err(|_| ConfigError::NonPositiveHorizon(config.sim_time))?;

        let center = CallCenter {
            staff: StaffPool::new(num_staff),
            customers: Vec::new(),
            stats: StatisticsCollector::new(),
            arrivals,
            draws: CustomerDraws::new(config)?,
            served: 0,
            reneged: 0,
        };
        let mut simulation = Simulation::new(center, Minutes::default());
        let (center, queue) = simulation.parts_mut();
        ArrivalEvent::schedule_first(center, queue)?;

        Ok(Self { simulation, horizon })
    }

    /// Drive the clock to the horizon and summarise what happened.
    ///
    /// Customers still waiting or being served at the horizon count as neither served nor reneged.
    ///
    /// # Errors
    ///
    /// Only a malformed scripted arrival list can fail mid-run, surfacing as
    /// [`Error::BackInTime`](crate::Error::BackInTime).
    pub fn run(&mut self) -> crate::Result<RunResult> {
        self.simulation.run_until(self.horizon)?;

        let center = self.simulation.state_mut();
        let result = center.stats.finalize(
            self.horizon.into_inner(),
            center.staff.capacity(),
            center.served,
            center.reneged,
        );
        info!(
            num_staff = result.num_staff,
            served = result.customers_served,
            reneged = result.customers_reneged,
            avg_wait = result.avg_wait_time,
            utilization = result.utilization,
            "run complete"
        );
        Ok(result)
    }

    pub fn call_center(&self) -> &CallCenter {
        self.simulation.state()
    }

    pub fn simulation(&self) -> &Simulation<CallCenter, Minutes> {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation<CallCenter, Minutes> {
        &mut self.simulation
    }
}

/// Simulate `num_staff` staff over the configured horizon. Fully determined by `config` (including its seed).
///
/// # Errors
///
/// See [`SimulationRun::new()`].
pub fn run_simulation(config: &Config, num_staff: usize) -> crate::Result<RunResult> {
    SimulationRun::new(config, num_staff)?.run()
}

/// One independent run per staffing level, each starting from the same seed.
///
/// # Errors
///
/// The first failing run's error; later levels are not attempted.
pub fn sweep(config: &Config, staff_levels: &[usize]) -> crate::Result<Vec<RunResult>> {
    staff_levels
        .iter()
        .map(|&num_staff| run_simulation(config, num_staff))
        .collect()
}

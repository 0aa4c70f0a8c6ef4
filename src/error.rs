use std::path::PathBuf;

use thiserror::Error;

/// Errors that may be encountered while building or executing a simulation.
///
/// The [`BackInTime`] variant originates from the safe interface of the [`EventQueue`] to indicate that an event's
/// scheduled execution time is prior to the queue's current time. This error likely corresponds to a logical bug at the
/// call site, e.g. a scripted arrival list that is not sorted.
///
/// The [`BadExecution`] variant originates from event code, providing a wrapper that can pass through
/// [`Simulation::run()`] in a type-safe manner. Invoking [`std::error::Error::source()`] on this variant will acquire a
/// shared reference to the wrapped error.
///
/// [`EventQueue`]: crate::scheduler::EventQueue
/// [`Simulation::run()`]: crate::scheduler::Simulation::run
/// [`BackInTime`]: Error::BackInTime
/// [`BadExecution`]: Error::BadExecution
#[derive(Debug, Error)]
pub enum Error {
    /// The event queue rejected an event that would have been scheduled for a time that has already passed.
    #[error("event execution time is less than current simulation time")]
    BackInTime,
    /// The run was configured with parameters it cannot honour.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// An error was raised while executing an event. Call [`source()`] or unpack this value to handle it directly.
    ///
    /// [`source()`]: #method.source
    #[error("error while executing event: {0}")]
    BadExecution(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Construction-time rejections of a run's parameters.
///
/// None of these can occur once a [`SimulationRun`] exists; they are reported before any event is scheduled.
///
/// [`SimulationRun`]: crate::SimulationRun
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("staff count must be at least 1")]
    NoStaff,
    #[error("simulation horizon must be positive and finite, got {0}")]
    NonPositiveHorizon(f64),
    #[error("arrival rate must be non-negative and finite, got {0}")]
    InvalidArrivalRate(f64),
    #[error("minimum service time must be at least one minute")]
    ZeroServiceTime,
    #[error("service time bounds are inverted: min {min} > max {max}")]
    InvertedServiceBounds { min: u32, max: u32 },
    #[error("patience bounds are inverted: min {min} > max {max}")]
    InvertedPatienceBounds { min: u32, max: u32 },
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// [`std::result::Result`]`<T, `[`callcenter::Error`]`>`
///
/// Defaults to `()` for the many scheduling calls that only report success.
///
/// [`callcenter::Error`]: Error
pub type Result<T = ()> = std::result::Result<T, Error>;

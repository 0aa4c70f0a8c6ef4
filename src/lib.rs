//! # Overview
//!
//! callcenter is a discrete-event simulation of a call center: customers call in, wait for one of N staff, and hang up
//! ("renege") if they have waited longer than their personal patience. Running the same day of callers against
//! different staffing levels shows how waits, abandonment and staff utilization trade off.
//!
//! The crate is layered the same way the simulation is:
//!
//! * [`scheduler`] holds simulated time and a queue of pending continuations ordered by time and then by insertion
//!   order. Events can be cancelled through the [`EventHandle`](scheduler::EventHandle) returned when scheduling.
//! * [`staff`] is the bounded pool of staff with a strictly FIFO waiting line. Each request is a ticket whose
//!   resolution moves out of `Pending` exactly once, which is what settles a grant racing a patience timer.
//! * [`customer`] is the per-caller state machine, [`arrivals`] the stream of callers, and [`statistics`] the
//!   collector that turns a run into a [`RunResult`].
//!
//! A run is single-threaded and fully determined by its [`Config`], seed included:
//!
//! ```no_run
//! use callcenter::{run_simulation, Config};
//!
//! let result = run_simulation(&Config::default(), 3)?;
//! println!("{} served, {} hung up", result.customers_served, result.customers_reneged);
//! # Ok::<(), callcenter::Error>(())
//! ```
//!
//! Logging goes through [`tracing`]; the library never installs a subscriber.

pub mod arrivals;
mod config;
pub mod customer;
mod error;
mod generic_parameters;
mod run;
pub mod scheduler;
pub mod staff;
pub mod statistics;

pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use generic_parameters::{SimState, SimTime};
pub use run::{run_simulation, sweep, CallCenter, Minutes, SimulationRun};
pub use statistics::{QueueSample, RunResult};

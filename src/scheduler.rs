//! The time-ordered event queue and the loop that drives it.

mod events;
mod simulation;

pub use events::event_traits::{Event, OkEvent};
pub use events::{EventHandle, EventQueue};
pub use simulation::Simulation;

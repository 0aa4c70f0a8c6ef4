use super::EventQueue;
use crate::{SimState, SimTime};
use std::fmt::Debug;

/// A continuation that runs at a scheduled instant of simulated time.
///
/// Each suspension point of a simulated process (waiting for a slot, for patience to run out, for a service to finish)
/// corresponds to exactly one scheduled implementor of this trait. On execution it receives exclusive access to both
/// the simulation state and the event queue, so it can mutate the state and schedule or cancel further events.
///
/// Requiring [`Debug`] lets the scheduler trace every executed event and lets an [`EventQueue`] print its contents.
pub trait Event<State, Time>: Debug
where
    State: SimState<Time>,
    Time: SimTime,
{
    /// Update the simulation according to the specific type of event. The clock on `event_queue` already reads this
    /// event's execution time when the method is invoked.
    ///
    /// # Errors
    ///
    /// Any error returned here halts [`Simulation::run()`] and is handed back to its caller unchanged. Scheduling
    /// failures arrive as [`Error::BackInTime`]; other failures should be wrapped in [`Error::BadExecution`].
    ///
    /// [`Simulation::run()`]: crate::scheduler::Simulation::run
    /// [`Error::BackInTime`]: crate::Error::BackInTime
    /// [`Error::BadExecution`]: crate::Error::BadExecution
    fn execute(&mut self, simulation_state: &mut State, event_queue: &mut EventQueue<State, Time>) -> crate::Result;
}

/// An [`Event`] that is guaranteed not to fail.
///
/// A blanket implementation of [`Event`] invokes [`OkEvent::execute()`] and returns `Ok(())`.
pub trait OkEvent<State, Time>: Debug
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn execute(&mut self, simulation_state: &mut State, event_queue: &mut EventQueue<State, Time>);
}

impl<State, Time, OkEventType> Event<State, Time> for OkEventType
where
    State: SimState<Time>,
    Time: SimTime,
    OkEventType: OkEvent<State, Time>,
{
    fn execute(&mut self, simulation_state: &mut State, event_queue: &mut EventQueue<State, Time>) -> crate::Result {
        OkEvent::execute(self, simulation_state, event_queue);
        Ok(())
    }
}

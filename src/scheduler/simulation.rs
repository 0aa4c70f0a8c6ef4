use super::{Event, EventHandle, EventQueue};
use crate::{SimState, SimTime};

use std::fmt::{Debug, Formatter};

use tracing::trace;

/// Contains the event queue and other state belonging to a simulation.
///
/// A [`Simulation`] owns both its state and its event queue, providing shared and mutable access to each so callers
/// can schedule initial events before running and read the final state afterwards.
///
/// The expected workflow is:
///
/// 1. Build a value that implements [`SimState`].
/// 2. Pass it and the start time to [`new()`].
/// 3. Schedule at least one initial event.
/// 4. Call [`run()`] or [`run_until()`]. Handle any error it might return.
/// 5. Use [`state()`] or [`state_mut()`] to finish processing the results.
///
/// Execution is single-threaded: events run strictly one at a time, so an event has exclusive access to the state for
/// its whole duration.
///
/// [`new()`]: Simulation::new
/// [`run()`]: Simulation::run
/// [`run_until()`]: Simulation::run_until
/// [`state()`]: Simulation::state
/// [`state_mut()`]: Simulation::state_mut
#[derive(Debug)]
pub struct Simulation<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    event_queue: EventQueue<State, Time>,
    state: State,
}

impl<State, Time> Simulation<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    /// Initialize a Simulation with the provided starting state and an event queue whose clock reads `start_time`.
    pub fn new(initial_state: State, start_time: Time) -> Self {
        Self {
            event_queue: EventQueue::new(start_time),
            state: initial_state,
        }
    }

    /// Execute events from the priority queue, one at a time, in ascending order by execution time.
    ///
    /// Stops when [`SimState::is_complete()`] returns true or the queue runs out of live events.
    ///
    /// # Errors
    ///
    /// Errors raised while executing an event are passed back to the caller unchanged, leaving the remaining events
    /// in the queue.
    pub fn run(&mut self) -> crate::Result {
        self.run_inner(None)
    }

    /// Pop the next event and execute it, refusing events scheduled after `horizon`. Returns whether an event ran.
    fn step(&mut self, horizon: Option<&Time>) -> crate::Result<bool> {
        if self.state.is_complete(self.event_queue.current_time()) {
            return Ok(false);
        }

        let Some(mut next_event) = self.event_queue.next_until(horizon) else {
            return Ok(false);
        };
        trace!(time = ?self.event_queue.current_time(), event = ?next_event, "executing event");
        next_event.execute(&mut self.state, &mut self.event_queue)?;
        Ok(true)
    }

    fn run_inner(&mut self, horizon: Option<&Time>) -> crate::Result {
        while self.step(horizon)? {}
        Ok(())
    }

    /// Schedule the provided event at the specified time.
    ///
    /// # Errors
    ///
    /// If `time` is less than the current clock time, returns an [`Error::BackInTime`] with no modifications to the
    /// queue.
    ///
    /// [`Error::BackInTime`]: crate::Error::BackInTime
    pub fn schedule<EventType>(&mut self, event: EventType, time: Time) -> crate::Result<EventHandle>
    where
        EventType: Event<State, Time> + 'static,
    {
        self.event_queue.schedule(event, time)
    }

    /// Cancel a pending event; see [`EventQueue::cancel()`].
    pub fn cancel(&mut self, handle: EventHandle) -> bool {
        self.event_queue.cancel(handle)
    }

    /// Get a shared reference to the simulation state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Get an exclusive reference to the simulation state.
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Consume the simulation, keeping only its state.
    pub fn into_state(self) -> State {
        self.state
    }

    /// Get a shared reference to the event queue.
    pub fn event_queue(&self) -> &EventQueue<State, Time> {
        &self.event_queue
    }

    /// Get an exclusive reference to the event queue.
    pub fn event_queue_mut(&mut self) -> &mut EventQueue<State, Time> {
        &mut self.event_queue
    }

    /// Split borrow of state and queue, for seeding a run the same way an executing event would.
    pub fn parts_mut(&mut self) -> (&mut State, &mut EventQueue<State, Time>) {
        (&mut self.state, &mut self.event_queue)
    }
}

impl<State, Time> Simulation<State, Time>
where
    State: SimState<Time>,
    Time: SimTime + Clone,
{
    /// Like [`run()`](Simulation::run), but events scheduled strictly after `horizon` are left in the queue. Events at
    /// exactly `horizon` still execute. On return the clock reads `horizon` unless it had already passed it.
    ///
    /// # Errors
    ///
    /// Same as [`run()`](Simulation::run).
    pub fn run_until(&mut self, horizon: Time) -> crate::Result {
        self.run_inner(Some(&horizon))?;
        self.event_queue.advance_to(horizon);
        Ok(())
    }
}

impl<State, Time> std::fmt::Display for Simulation<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Simulation at time {:?}", self.event_queue.current_time())
    }
}

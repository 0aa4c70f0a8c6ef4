use super::Event;
use crate::{SimState, SimTime};
use std::cmp::Ordering;

/// Heap entry for the event queue: the boxed event plus its sort key.
///
/// Ordered by execution time first and by insertion sequence second, so that same-time events pop in the order they
/// were scheduled. The sequence also doubles as the event's cancellation handle.
#[derive(Debug)]
pub(super) struct EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    pub execution_time: Time,
    pub event: Box<dyn Event<State, Time>>,
    pub insertion_sequence: usize,
}

impl<State, Time> EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn sort_key(&self) -> (&Time, usize) {
        (&self.execution_time, self.insertion_sequence)
    }
}

impl<State, Time> PartialEq for EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl<State, Time> Eq for EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
}

impl<State, Time> PartialOrd for EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<State, Time> Ord for EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

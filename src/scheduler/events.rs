mod event_holder;
pub(super) mod event_traits;

use crate::{SimState, SimTime};
use event_holder::EventHolder;
use event_traits::Event;

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::ops::Add;

/// Identifies one scheduled event so that it can later be cancelled.
///
/// Handles are the insertion sequence number of the event and are never reused within a queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventHandle(usize);

/// Priority queue of scheduled events.
///
/// Events will execute in ascending order of execution time, with ties broken by the order in which they were pushed
/// onto the queue. An event scheduled for the current time therefore runs after every event already queued for that
/// same time.
///
/// Scheduling methods compare the desired execution time against the current clock time. Attempting to schedule an
/// event for a time that is already past will result in an [`Error::BackInTime`] without modifying the queue.
///
/// Cancellation is lazy: [`cancel()`] forgets the handle, and the event is discarded unexecuted when it reaches the
/// head of the heap. Discarded events never advance the clock.
///
/// [`Error::BackInTime`]: crate::Error::BackInTime
/// [`cancel()`]: EventQueue::cancel
#[derive(Debug)]
pub struct EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    events: BinaryHeap<Reverse<EventHolder<State, Time>>>,
    pending: HashSet<usize>,
    last_execution_time: Time,
    events_added: usize,
}

impl<State, Time> EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    /// Construct a new [`EventQueue`] with no scheduled events and a clock initialized to the provided time.
    pub(crate) fn new(start_time: Time) -> Self {
        Self {
            events: BinaryHeap::default(),
            pending: HashSet::default(),
            last_execution_time: start_time,
            events_added: 0,
        }
    }

    /// Schedule the provided event at the specified time.
    ///
    /// # Errors
    ///
    /// If `time` is less than the current clock time on `self`, returns an [`Error::BackInTime`] to indicate the likely
    /// presence of a logical bug at the call site, with no modifications to the queue.
    ///
    /// [`Error::BackInTime`]: crate::Error::BackInTime
    pub fn schedule<EventType>(&mut self, event: EventType, time: Time) -> crate::Result<EventHandle>
    where
        EventType: Event<State, Time> + 'static,
    {
        self.schedule_from_boxed(Box::new(event), time)
    }

    /// Schedule the provided boxed event at the specified time.
    ///
    /// # Errors
    ///
    /// Same as [`schedule()`](EventQueue::schedule).
    pub fn schedule_from_boxed(
        &mut self,
        event: Box<dyn Event<State, Time>>,
        time: Time,
    ) -> crate::Result<EventHandle> {
        if time < self.last_execution_time {
            return Err(crate::Error::BackInTime);
        }

        let sequence = self.increment_event_count();
        self.pending.insert(sequence);
        self.events.push(Reverse(EventHolder {
            execution_time: time,
            event,
            insertion_sequence: sequence,
        }));
        Ok(EventHandle(sequence))
    }

    /// Cancel a previously scheduled event.
    ///
    /// Returns `true` if the event was still waiting to execute. Cancelling an event that has already executed, or
    /// that was cancelled before, is a no-op returning `false`.
    pub fn cancel(&mut self, handle: EventHandle) -> bool {
        self.pending.remove(&handle.0)
    }

    /// Whether the event behind `handle` is still waiting to execute.
    pub fn is_pending(&self, handle: EventHandle) -> bool {
        self.pending.contains(&handle.0)
    }

    /// Number of events still waiting to execute, not counting cancelled ones.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Execution time of the next event that will run, if any.
    pub fn peek_time(&mut self) -> Option<&Time> {
        self.discard_cancelled();
        self.events.peek().map(|holder| &holder.0.execution_time)
    }

    fn increment_event_count(&mut self) -> usize {
        let count = self.events_added;
        self.events_added += 1;
        count
    }

    /// Pop cancelled holders off the head of the heap until a live one (or nothing) remains.
    fn discard_cancelled(&mut self) {
        while let Some(head) = self.events.peek() {
            if self.pending.contains(&head.0.insertion_sequence) {
                break;
            }
            self.events.pop();
        }
    }

    /// Crate-internal function to pop the next live event, provided it is due no later than `horizon`. Updates the
    /// current clock time to match the execution time of the popped event.
    pub(crate) fn next_until(&mut self, horizon: Option<&Time>) -> Option<Box<dyn Event<State, Time>>> {
        self.discard_cancelled();
        if let (Some(head), Some(horizon)) = (self.events.peek(), horizon) {
            if head.0.execution_time > *horizon {
                return None;
            }
        }

        let holder = self.events.pop()?.0;
        self.pending.remove(&holder.insertion_sequence);
        self.last_execution_time = holder.execution_time;
        Some(holder.event)
    }

    /// Move the clock forward to `time` without executing anything. Ignored if `time` is in the past.
    pub(crate) fn advance_to(&mut self, time: Time) {
        if time > self.last_execution_time {
            self.last_execution_time = time;
        }
    }

    /// Get a shared reference to the simulation's current clock time.
    pub fn current_time(&self) -> &Time {
        &self.last_execution_time
    }
}

impl<State, Time> EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime + Clone,
{
    /// Schedule the provided event to execute at the current sim time. Events previously scheduled for "now" will still
    /// execute before this event does.
    ///
    /// # Errors
    ///
    /// Only fails if cloning the current time somehow produces an earlier time, which no [`SimTime`] in this crate
    /// does.
    pub fn schedule_now<EventType>(&mut self, event: EventType) -> crate::Result<EventHandle>
    where
        EventType: Event<State, Time> + 'static,
    {
        let event_time = self.last_execution_time.clone();
        self.schedule(event, event_time)
    }

    /// Schedule the provided event after the specified delay. The event's execution time will be equal to the result of
    /// `self.current_time().clone() + delay`.
    ///
    /// # Errors
    ///
    /// If the calculated execution time is less than the current clock time on `self` (a negative delay), returns an
    /// [`Error::BackInTime`] with no modifications to the queue.
    ///
    /// [`Error::BackInTime`]: crate::Error::BackInTime
    pub fn schedule_with_delay<EventType, Delay>(
        &mut self,
        event: EventType,
        delay: Delay,
    ) -> crate::Result<EventHandle>
    where
        EventType: Event<State, Time> + 'static,
        Time: Add<Delay, Output = Time>,
    {
        let event_time = self.last_execution_time.clone() + delay;
        self.schedule(event, event_time)
    }
}

impl<State, Time> std::fmt::Display for EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            formatter,
            "EventQueue with {} scheduled events at current time {:?}",
            self.len(),
            self.last_execution_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::OkEvent;

    #[derive(Debug, Default)]
    struct State {
        executed: Vec<u32>,
    }
    impl SimState<u32> for State {}

    #[derive(Debug)]
    struct Record(u32);

    impl OkEvent<State, u32> for Record {
        fn execute(&mut self, simulation_state: &mut State, _: &mut EventQueue<State, u32>) {
            simulation_state.executed.push(self.0);
        }
    }

    fn drain(queue: &mut EventQueue<State, u32>, state: &mut State) {
        while let Some(mut event) = queue.next_until(None) {
            event.execute(state, queue).unwrap();
        }
    }

    #[test]
    fn same_time_events_run_in_insertion_order() {
        let mut queue = EventQueue::new(0);
        let mut state = State::default();
        queue.schedule(Record(1), 5).unwrap();
        queue.schedule(Record(2), 3).unwrap();
        queue.schedule(Record(3), 5).unwrap();
        queue.schedule(Record(4), 3).unwrap();

        drain(&mut queue, &mut state);

        assert_eq!(vec![2, 4, 1, 3], state.executed);
        assert_eq!(5, *queue.current_time());
    }

    #[test]
    fn scheduling_in_the_past_is_rejected() {
        let mut queue = EventQueue::<State, u32>::new(10);
        let result = queue.schedule(Record(1), 9);
        assert!(matches!(result, Err(crate::Error::BackInTime)));
        assert!(queue.is_empty(), "rejected event should not be queued");
    }

    #[test]
    fn cancelled_events_never_run_or_move_the_clock() {
        let mut queue = EventQueue::new(0);
        let mut state = State::default();
        queue.schedule(Record(1), 1).unwrap();
        let doomed = queue.schedule(Record(2), 7).unwrap();

        assert!(queue.cancel(doomed));
        assert!(!queue.cancel(doomed), "second cancel should be a no-op");
        assert_eq!(1, queue.len());

        drain(&mut queue, &mut state);

        assert_eq!(vec![1], state.executed);
        assert_eq!(1, *queue.current_time());
    }

    #[test]
    fn cancelling_a_fired_event_is_a_no_op() {
        let mut queue = EventQueue::new(0);
        let mut state = State::default();
        let handle = queue.schedule(Record(1), 2).unwrap();
        drain(&mut queue, &mut state);

        assert!(!queue.is_pending(handle));
        assert!(!queue.cancel(handle));
    }

    #[test]
    fn peek_skips_cancelled_head() {
        let mut queue = EventQueue::<State, u32>::new(0);
        let head = queue.schedule(Record(1), 1).unwrap();
        queue.schedule(Record(2), 4).unwrap();
        queue.cancel(head);

        assert_eq!(Some(&4), queue.peek_time());
    }

    #[test]
    fn horizon_holds_back_later_events() {
        let mut queue = EventQueue::<State, u32>::new(0);
        queue.schedule(Record(1), 10).unwrap();
        queue.schedule(Record(2), 11).unwrap();

        assert!(queue.next_until(Some(&10)).is_some(), "event at the horizon should run");
        assert!(queue.next_until(Some(&10)).is_none(), "event past the horizon should wait");
        assert_eq!(1, queue.len());
    }

    #[test]
    fn schedule_now_and_with_delay_are_relative_to_clock() {
        let mut queue = EventQueue::new(0);
        let mut state = State::default();
        queue.schedule(Record(1), 4).unwrap();
        queue.next_until(None).unwrap().execute(&mut state, &mut queue).unwrap();

        queue.schedule_with_delay(Record(3), 2u32).unwrap();
        queue.schedule_now(Record(2)).unwrap();
        drain(&mut queue, &mut state);

        assert_eq!(vec![1, 2, 3], state.executed);
        assert_eq!(6, *queue.current_time());
    }
}

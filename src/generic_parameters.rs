use std::fmt::Debug;

/// The generic type used for a simulation's clock.
///
/// This trait is a superset of [`Ord`] and [`Debug`] with no additional requirements or functionality. Events execute
/// in ascending order of execution time; ties that the implementation of [`Ord`] does not break are resolved by the
/// order in which events were enqueued.
///
/// Implementations are provided for integral builtin types and for the [`OrderedFloat`] and [`NotNan`] wrappers, the
/// latter being what the call-center model uses for continuous minutes. Bare [`f32`] and [`f64`] do not implement
/// [`Ord`] and so cannot serve as a clock.
///
/// [`OrderedFloat`]: ordered_float::OrderedFloat
/// [`NotNan`]: ordered_float::NotNan
pub trait SimTime: Ord + Debug {}

impl SimTime for u8 {}
impl SimTime for u16 {}
impl SimTime for u32 {}
impl SimTime for u64 {}
impl SimTime for usize {}
impl SimTime for i32 {}
impl SimTime for i64 {}

impl<Float> SimTime for ordered_float::OrderedFloat<Float> where Float: ordered_float::FloatCore + Debug {}

impl<Float> SimTime for ordered_float::NotNan<Float> where Float: ordered_float::FloatCore + Debug {}

/// The generic type used for a simulation's overall state.
///
/// For the call center this is [`CallCenter`]: the staff pool, the customers spawned so far, the statistics collector
/// and the random stream, all owned by a single run.
///
/// [`CallCenter`]: crate::CallCenter
pub trait SimState<Time>
where
    Time: SimTime,
{
    /// Reports whether the simulation has run to completion. Invoked before popping each event off the queue: `true`
    /// breaks out of the run loop, `false` continues with the next scheduled event.
    ///
    /// The default implementation always returns false, which leaves termination to the event queue emptying out or
    /// to the horizon passed to [`Simulation::run_until()`].
    ///
    /// [`Simulation::run_until()`]: crate::scheduler::Simulation::run_until
    #[allow(unused_variables)]
    fn is_complete(&self, current_time: &Time) -> bool {
        false
    }
}

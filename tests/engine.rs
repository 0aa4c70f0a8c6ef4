//! The scheduler on its own, driving a bare M/M/c queue with continuous time.

use callcenter::scheduler::{EventHandle, EventQueue, OkEvent, Simulation};
use callcenter::SimState;
use ordered_float::NotNan;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp};
use rand_pcg::Pcg64;

type Time = NotNan<f64>;

struct Store {
    num_servers: usize,
    servers_busy: usize,
    queue_length: usize,
    arrivals: usize,
    departures: usize,
    arrival_distr: Exp<f64>,
    service_distr: Exp<f64>,
    rng: Pcg64,
}

impl Store {
    fn new(num_servers: usize, seed: u64) -> Self {
        Self {
            num_servers,
            servers_busy: 0,
            queue_length: 0,
            arrivals: 0,
            departures: 0,
            arrival_distr: Exp::new(4.0).unwrap(),
            service_distr: Exp::new(6.0 / num_servers as f64).unwrap(),
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl SimState<Time> for Store {}

#[derive(Debug)]
struct ArrivalEvent;

impl OkEvent<Store, Time> for ArrivalEvent {
    fn execute(&mut self, store: &mut Store, events: &mut EventQueue<Store, Time>) {
        store.arrivals += 1;
        if store.servers_busy < store.num_servers {
            store.servers_busy += 1;
            let service = store.service_distr.sample(&mut store.rng);
            events.schedule_with_delay(DepartureEvent, service).unwrap();
        } else {
            store.queue_length += 1;
        }
        let gap = store.arrival_distr.sample(&mut store.rng);
        events.schedule_with_delay(ArrivalEvent, gap).unwrap();
    }
}

#[derive(Debug)]
struct DepartureEvent;

impl OkEvent<Store, Time> for DepartureEvent {
    fn execute(&mut self, store: &mut Store, events: &mut EventQueue<Store, Time>) {
        store.departures += 1;
        if store.queue_length > 0 {
            store.queue_length -= 1;
            let service = store.service_distr.sample(&mut store.rng);
            events.schedule_with_delay(DepartureEvent, service).unwrap();
        } else {
            store.servers_busy -= 1;
        }
    }
}

fn run_store(num_servers: usize, seed: u64) -> Simulation<Store, Time> {
    let mut sim = Simulation::new(Store::new(num_servers, seed), Time::default());
    sim.schedule(ArrivalEvent, Time::default()).unwrap();
    sim.run_until(NotNan::new(540.0).unwrap()).unwrap();
    sim
}

#[test]
fn customers_are_conserved() {
    for num_servers in 1..=3 {
        let sim = run_store(num_servers, 11434450237083315284);
        let store = sim.state();
        assert_eq!(
            store.arrivals,
            store.departures + store.queue_length + store.servers_busy,
            "customers appeared or vanished with {num_servers} servers"
        );
        assert!(store.servers_busy <= num_servers);
        assert!(store.arrivals > 1000, "rate 4/min over 540 minutes should see thousands");
    }
}

#[test]
fn clock_stops_exactly_at_the_horizon() {
    let sim = run_store(2, 7082446179938253086);
    assert_eq!(540.0, sim.event_queue().current_time().into_inner());
    assert!(!sim.event_queue().is_empty(), "the next arrival should still be pending");
}

#[test]
fn same_seed_replays_the_same_day() {
    let first = run_store(3, 13009076887838060007);
    let second = run_store(3, 13009076887838060007);
    assert_eq!(first.state().arrivals, second.state().arrivals);
    assert_eq!(first.state().departures, second.state().departures);
}

#[derive(Debug)]
struct Cancel(EventHandle);

impl OkEvent<Store, Time> for Cancel {
    fn execute(&mut self, _: &mut Store, events: &mut EventQueue<Store, Time>) {
        events.cancel(self.0);
    }
}

#[test]
fn an_event_can_cancel_a_later_one() {
    let mut sim = Simulation::new(Store::new(1, 1), Time::default());
    let arrival = sim.schedule(ArrivalEvent, NotNan::new(2.0).unwrap()).unwrap();
    sim.schedule(Cancel(arrival), NotNan::new(1.0).unwrap()).unwrap();
    sim.run().unwrap();

    assert_eq!(0, sim.state().arrivals);
    assert_eq!(1.0, sim.event_queue().current_time().into_inner());
}

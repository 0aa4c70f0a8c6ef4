use callcenter::scheduler::{EventQueue, OkEvent};
use callcenter::{run_simulation, sweep, CallCenter, Config, Minutes, SimulationRun};

/// Checks the staff pool every minute of simulated time.
#[derive(Debug)]
struct Probe;

impl OkEvent<CallCenter, Minutes> for Probe {
    fn execute(&mut self, center: &mut CallCenter, event_queue: &mut EventQueue<CallCenter, Minutes>) {
        let staff = center.staff();
        assert!(
            staff.active_count() <= staff.capacity(),
            "{} active staff out of {} at {:?}",
            staff.active_count(),
            staff.capacity(),
            event_queue.current_time()
        );
        if staff.waiting_len() > 0 {
            assert_eq!(
                staff.capacity(),
                staff.active_count(),
                "callers waiting while a staff member is idle"
            );
        }
        let settled = center.customers_served() + center.customers_reneged();
        assert!(settled <= center.customers().len());

        event_queue
            .schedule_with_delay(Probe, 1.0_f64)
            .expect("probe delay is positive");
    }
}

#[test]
fn staff_pool_invariants_hold_throughout_the_day() {
    for num_staff in 1..=4 {
        let mut run = SimulationRun::new(&Config::default(), num_staff).unwrap();
        run.simulation_mut()
            .schedule(Probe, Minutes::default())
            .unwrap();
        run.run().unwrap();
    }
}

#[test]
fn every_customer_is_settled_or_still_in_flight() {
    for seed in 0..10 {
        let config = Config {
            seed,
            ..Config::default()
        };
        let mut run = SimulationRun::new(&config, 2).unwrap();
        let result = run.run().unwrap();

        let customers = run.call_center().customers();
        let in_flight = customers.iter().filter(|c| !c.state().is_terminal()).count();
        assert_eq!(
            customers.len(),
            result.customers_served + result.customers_reneged + in_flight,
            "seed {seed}"
        );
        assert!(in_flight <= 2 + run.call_center().staff().waiting_len());
    }
}

#[test]
fn metrics_stay_within_bounds() {
    for num_staff in 1..=5 {
        for seed in [1, 42, 2024] {
            let config = Config {
                seed,
                ..Config::default()
            };
            let result = run_simulation(&config, num_staff).unwrap();

            assert!(result.avg_queue_length >= 0.0);
            assert!(result.avg_queue_length <= result.max_queue_length as f64);
            assert!((0.0..=100.0).contains(&result.utilization), "utilization {}", result.utilization);
            assert!(result.avg_wait_time >= 0.0);
            assert!(result.avg_wait_time <= result.max_wait_time);
            assert!(result.max_wait_time <= f64::from(config.patience_max));
        }
    }
}

#[test]
fn identical_inputs_give_identical_results() {
    let config = Config::default();
    for num_staff in 1..=5 {
        let first = run_simulation(&config, num_staff).unwrap();
        let second = run_simulation(&config, num_staff).unwrap();
        assert_eq!(first, second, "runs with {num_staff} staff diverged");
    }
}

#[test]
fn sweep_matches_individual_runs() {
    let config = Config::default();
    let swept = sweep(&config, &[1, 2, 3]).unwrap();
    for result in &swept {
        assert_eq!(*result, run_simulation(&config, result.num_staff).unwrap());
    }
}

#[test]
fn staffing_levels_see_the_same_callers() {
    let config = Config::default();
    let mut short_staffed = SimulationRun::new(&config, 1).unwrap();
    let mut well_staffed = SimulationRun::new(&config, 5).unwrap();
    short_staffed.run().unwrap();
    well_staffed.run().unwrap();

    let profile = |run: &SimulationRun| -> Vec<(f64, f64, f64)> {
        run.call_center()
            .customers()
            .iter()
            .map(|c| (c.arrival_time(), c.patience(), c.service_time()))
            .collect()
    };
    assert_eq!(profile(&short_staffed), profile(&well_staffed));
}

#[test]
fn more_staff_never_loses_more_callers() {
    for seed in 0..20 {
        let config = Config {
            seed,
            ..Config::default()
        };
        let lean = run_simulation(&config, 1).unwrap();
        let generous = run_simulation(&config, 5).unwrap();

        assert!(
            generous.customers_reneged <= lean.customers_reneged,
            "seed {seed}: {} reneged with 5 staff, {} with 1",
            generous.customers_reneged,
            lean.customers_reneged
        );
        assert!(
            generous.avg_wait_time <= lean.avg_wait_time,
            "seed {seed}: average wait {} with 5 staff, {} with 1",
            generous.avg_wait_time,
            lean.avg_wait_time
        );
    }
}

#[test]
fn ample_staff_means_nobody_waits() {
    let result = run_simulation(&Config::default(), 500).unwrap();
    assert_eq!(0, result.customers_reneged);
    assert_eq!(0.0, result.avg_wait_time);
    assert_eq!(0, result.max_queue_length);
}

//! Integration test: PID loop around a first-order plant.

use lf_sim::{DEFAULT_BAND_FRACTION, PidConfig, PlantSolver, simulate_pid};
use proptest::prelude::*;

fn passive(initial_output: f64) -> PidConfig {
    PidConfig {
        kp: 0.0,
        ki: 0.0,
        kd: 0.0,
        initial_output,
        ..PidConfig::default()
    }
}

#[test]
fn zero_gains_give_zero_control_and_free_decay() {
    let run = simulate_pid(&passive(2.0)).unwrap();

    assert!(run.trajectory.controls().iter().all(|&u| u == 0.0));
    for s in run.trajectory.iter() {
        let expected = 2.0 * (-s.time / 5.0).exp();
        assert!(
            (s.state - expected).abs() < 1e-9,
            "t={} y={} expected={}",
            s.time,
            s.state,
            expected
        );
    }
}

#[test]
fn zero_gains_from_rest_stay_at_rest() {
    let run = simulate_pid(&passive(0.0)).unwrap();
    assert!(run.trajectory.states().iter().all(|&y| y == 0.0));
}

#[test]
fn integral_is_running_sum_of_error_dt() {
    let cfg = PidConfig {
        kp: 1.5,
        ki: 0.3,
        kd: 0.5,
        ..PidConfig::default()
    };
    let run = simulate_pid(&cfg).unwrap();

    let mut sum = 0.0;
    for (i, s) in run.trajectory.iter().enumerate().skip(1) {
        sum += s.error * cfg.dt;
        assert_eq!(run.integral[i], sum, "integral mismatch at sample {i}");
    }
    assert_eq!(run.integral[0], 0.0);
}

#[test]
fn error_is_setpoint_minus_previous_output() {
    let run = simulate_pid(&PidConfig {
        ki: 0.2,
        ..PidConfig::default()
    })
    .unwrap();
    let samples = run.trajectory.samples();
    for pair in samples.windows(2) {
        assert_eq!(pair[1].error, 1.0 - pair[0].state);
    }
}

#[test]
fn output_is_not_clamped() {
    // Strong integral action is underdamped and overshoots the setpoint.
    let run = simulate_pid(&PidConfig {
        kp: 2.0,
        ki: 2.0,
        ..PidConfig::default()
    })
    .unwrap();
    let metrics = run.metrics(DEFAULT_BAND_FRACTION).unwrap();
    assert!(metrics.peak > 1.05);
    assert!(metrics.overshoot > 0.05);
}

#[test]
fn tuned_loop_settles_inside_band() {
    let run = simulate_pid(&PidConfig {
        kp: 2.0,
        ki: 0.5,
        duration: 100.0,
        ..PidConfig::default()
    })
    .unwrap();
    let metrics = run.metrics(DEFAULT_BAND_FRACTION).unwrap();
    assert!(metrics.is_settled());
    assert!(metrics.steady_state_error.abs() < 0.05);
}

#[test]
fn negative_output_is_allowed() {
    let run = simulate_pid(&PidConfig {
        setpoint: -1.0,
        ..PidConfig::default()
    })
    .unwrap();
    assert!(run.trajectory.last().unwrap().state < 0.0);
}

proptest! {
    #[test]
    fn length_is_duration_over_dt(steps in 1_usize..1000) {
        let duration = steps as f64 * 0.1;
        let run = simulate_pid(&PidConfig { duration, ..PidConfig::default() }).unwrap();
        prop_assert_eq!(run.trajectory.len(), steps);
    }

    #[test]
    fn runs_are_bit_identical(
        kp in 0.0_f64..10.0,
        ki in 0.0_f64..2.0,
        kd in 0.0_f64..5.0,
        rk4 in any::<bool>(),
    ) {
        let cfg = PidConfig {
            kp,
            ki,
            kd,
            plant_solver: if rk4 { PlantSolver::rk4() } else { PlantSolver::Exact },
            ..PidConfig::default()
        };
        let a = simulate_pid(&cfg).unwrap();
        let b = simulate_pid(&cfg).unwrap();
        prop_assert_eq!(a, b);
    }
}

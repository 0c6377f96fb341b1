//! Fan correction episodes driven reading by reading at 1 Hz.

use greenhouse::app::events::AppEvent;
use greenhouse::app::ports::{ActuatorState, CorrectionTimer};
use greenhouse::app::reading::SensorReading;
use greenhouse::config::ControlConfig;
use greenhouse::control::fan::{FanPhase, GiveUpReason};

use crate::mock_hw::{Greenhouse, LOCAL_MIDNIGHT};

const DRY: f32 = 40.0;

fn gave_up(g: &Greenhouse, reason: GiveUpReason) -> bool {
    g.sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::CorrectionGaveUp(r) if *r == reason))
}

#[test]
fn readings_under_threshold_leave_fan_off() {
    let mut g = Greenhouse::new(ControlConfig::default());
    assert_eq!(g.hold(90.0, 80.0, 300), 0);
    assert_eq!(g.fan(), ActuatorState::Off);
    assert_eq!(g.engine.fan().on_count(), 0);
    assert_eq!(g.sink.starts(), 0);
}

#[test]
fn rising_then_falling_temperature_extends_then_resolves() {
    let mut g = Greenhouse::new(ControlConfig::default());

    g.step(85.0, DRY);
    g.step(88.0, DRY);
    assert_eq!(g.fan(), ActuatorState::Off);

    g.step(95.0, DRY);
    assert_eq!(g.fan(), ActuatorState::On);
    assert!(g.engine.timer().is_armed());
    assert_eq!(g.engine.fan_phase(), FanPhase::Correcting);

    // Cooling but still hot when the first window closes.
    assert_eq!(g.hold(93.0, DRY, 30), 0);
    assert_eq!(g.hold(91.0, DRY, 29), 1);
    assert_eq!(g.engine.fires_counter(), 1);
    assert_eq!(g.fan(), ActuatorState::On);
    assert!(g.engine.timer().is_armed());
    assert_eq!(g.engine.window_len(), 0);

    // Under threshold by the next fire.
    assert_eq!(g.hold(85.0, DRY, 59), 0);
    assert_eq!(g.fan(), ActuatorState::On);
    assert_eq!(g.hold(80.0, DRY, 1), 1);

    assert_eq!(g.fan(), ActuatorState::Off);
    assert_eq!(g.engine.fires_counter(), 0);
    assert_eq!(g.engine.fan_phase(), FanPhase::Idle);
    assert!(!g.engine.timer().is_armed());
    assert_eq!(
        g.engine.fan().calls,
        [ActuatorState::Off, ActuatorState::On, ActuatorState::Off]
    );
    assert_eq!(
        g.sink.count(|e| matches!(e, AppEvent::CorrectionResolved)),
        1
    );
}

#[test]
fn flat_temperature_gives_up_at_first_fire() {
    let mut g = Greenhouse::new(ControlConfig::default());
    g.step(95.0, DRY);
    assert_eq!(g.hold(95.0, DRY, 59), 1);

    assert_eq!(g.fan(), ActuatorState::Off);
    assert!(gave_up(&g, GiveUpReason::SlopeUnfavorable));
    // Give-up time is the latest reading's timestamp.
    assert_eq!(g.engine.last_giveup(), Some(LOCAL_MIDNIGHT + 59));
}

#[test]
fn second_episode_inside_cooldown_does_not_start() {
    let mut g = Greenhouse::new(ControlConfig::default());
    g.step(95.0, DRY);
    g.hold(95.0, DRY, 59);
    let giveup = g.engine.last_giveup().unwrap();

    // Cool spell, then a second heat episode within the hour.
    g.hold(70.0, DRY, 300);
    assert_eq!(g.hold(99.0, DRY, 600), 0);
    assert_eq!(g.fan(), ActuatorState::Off);
    assert_eq!(g.sink.starts(), 1);

    g.now = giveup + 3599;
    g.step(99.0, DRY);
    assert_eq!(g.fan(), ActuatorState::Off);

    g.step(99.0, DRY);
    assert_eq!(g.now - 1, giveup + 3600);
    assert_eq!(g.fan(), ActuatorState::On);
    assert_eq!(g.sink.starts(), 2);
}

#[test]
fn retries_are_bounded_then_cooldown_holds() {
    let cfg = ControlConfig::default();
    let max_retries = cfg.max_retries;
    let mut g = Greenhouse::new(cfg);

    let mut temperature = 150.0_f32;
    let mut max_seen = 0;
    for _ in 0..1_000 {
        g.step(temperature, DRY);
        temperature -= 0.05;
        max_seen = max_seen.max(g.engine.fires_counter());
        if g.engine.last_giveup().is_some() {
            break;
        }
        assert_eq!(g.fan(), ActuatorState::On);
    }

    assert_eq!(max_seen, max_retries);
    assert_eq!(g.fires, max_retries as usize + 1);
    assert!(gave_up(&g, GiveUpReason::RetriesExhausted));
    assert_eq!(g.fan(), ActuatorState::Off);
    assert_eq!(g.engine.fires_counter(), 0);

    // Still hot, but inside the cool-down.
    g.hold(140.0, DRY, 1_800);
    assert_eq!(g.fan(), ActuatorState::Off);
}

#[test]
fn humidity_only_breach_uses_humidity_slope() {
    let mut g = Greenhouse::new(ControlConfig::default());
    // Temperature creeps up (still under threshold) while humidity falls.
    let fired = (0..60)
        .filter(|&i| g.step(60.0 + i as f32 * 0.1, 95.0 - i as f32 * 0.1))
        .count();
    assert_eq!(fired, 1);
    assert_eq!(g.engine.fires_counter(), 1);
    assert_eq!(g.fan(), ActuatorState::On);
}

#[test]
fn double_breach_needs_both_slopes_falling() {
    let mut g = Greenhouse::new(ControlConfig::default());
    let fired = (0..60)
        .filter(|&i| g.step(120.0 - i as f32 * 0.1, 85.0 + i as f32 * 0.1))
        .count();
    assert_eq!(fired, 1);
    assert!(gave_up(&g, GiveUpReason::SlopeUnfavorable));
    assert_eq!(g.fan(), ActuatorState::Off);
}

#[test]
fn single_sample_window_is_unfavorable() {
    let mut g = Greenhouse::new(ControlConfig::default());
    g.step(95.0, DRY);
    g.fire_now();

    assert!(gave_up(&g, GiveUpReason::SlopeUnfavorable));
    assert_eq!(g.fan(), ActuatorState::Off);
    assert!(!g.engine.timer().is_armed());
}

#[test]
fn samples_past_capacity_are_dropped() {
    let mut g = Greenhouse::new(ControlConfig::default());
    let reading = |t: f32, ts: i64| SensorReading {
        temperature_c: t,
        humidity_pct: DRY,
        timestamp: ts,
        ..SensorReading::default()
    };

    // Feed the engine directly so the timer never expires mid-window.
    g.engine.process_reading(reading(95.0, 0), &mut g.sink);
    for ts in 1..60 {
        g.engine.process_reading(reading(94.0, ts), &mut g.sink);
    }
    for ts in 60..100 {
        g.engine.process_reading(reading(200.0, ts), &mut g.sink);
    }
    assert_eq!(g.engine.window_len(), 60);

    // Slope spans the retained 95 -> 94 window, not the dropped spike.
    g.fire_now();
    assert_eq!(g.engine.fires_counter(), 1);
    assert_eq!(g.fan(), ActuatorState::On);
}

#[test]
fn timer_that_never_starts_keeps_fan_off() {
    let mut g = Greenhouse::new(ControlConfig::default());
    g.engine.timer_mut().set_start_failure(true);

    // Six hours at 95 °C.
    assert_eq!(g.hold(95.0, DRY, 6 * 3600), 0);

    assert_eq!(g.fan(), ActuatorState::Off);
    assert_eq!(g.engine.fan().on_count(), 0);
    assert_eq!(g.engine.fan_phase(), FanPhase::Idle);
    assert!(!g.engine.timer().is_armed());
    assert_eq!(g.sink.starts(), 0);
    assert_eq!(g.engine.last_giveup(), None);

    // Once the timer recovers the next hot reading starts an attempt.
    g.engine.timer_mut().set_start_failure(false);
    g.step(95.0, DRY);
    assert_eq!(g.fan(), ActuatorState::On);
    assert_eq!(g.sink.starts(), 1);
}

#[test]
fn failed_rearm_gives_up_with_cooldown() {
    let mut g = Greenhouse::new(ControlConfig::default());
    g.step(95.0, DRY);
    assert_eq!(g.hold(93.0, DRY, 30), 0);

    g.engine.timer_mut().set_start_failure(true);
    assert_eq!(g.hold(91.0, DRY, 29), 1);

    assert_eq!(g.fan(), ActuatorState::Off);
    assert_eq!(g.engine.fan_phase(), FanPhase::Idle);
    assert!(!g.engine.timer().is_armed());
    assert_eq!(g.engine.fires_counter(), 0);
    assert!(gave_up(&g, GiveUpReason::TimerUnavailable));
    assert_eq!(g.engine.last_giveup(), Some(LOCAL_MIDNIGHT + 59));
    assert_eq!(
        g.sink.count(|e| matches!(e, AppEvent::CorrectionExtended { .. })),
        0
    );

    // Still hot, but cooling down.
    g.engine.timer_mut().set_start_failure(false);
    assert_eq!(g.hold(95.0, DRY, 600), 0);
    assert_eq!(g.fan(), ActuatorState::Off);
    assert_eq!(
        g.engine.fan().calls,
        [ActuatorState::Off, ActuatorState::On, ActuatorState::Off]
    );
}

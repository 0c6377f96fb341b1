//! Correction timer identity and spurious-fire handling.

use greenhouse::app::events::AppEvent;
use greenhouse::app::ports::{ActuatorState, CorrectionTimer};
use greenhouse::config::ControlConfig;
use greenhouse::control::fan::FanPhase;

use crate::mock_hw::Greenhouse;

fn rejected(g: &Greenhouse) -> usize {
    g.sink
        .count(|e| matches!(e, AppEvent::TimerFireRejected { .. }))
}

#[test]
fn fire_before_any_reading_is_ignored() {
    let mut g = Greenhouse::new(ControlConfig::default());
    g.fire_now();
    assert_eq!(rejected(&g), 1);
    assert_eq!(g.engine.fan().calls, [ActuatorState::Off]);
}

#[test]
fn fire_while_idle_is_ignored() {
    let mut g = Greenhouse::new(ControlConfig::default());
    g.hold(70.0, 40.0, 10);
    g.fire_now();
    assert_eq!(rejected(&g), 1);
    assert_eq!(g.engine.fan_phase(), FanPhase::Idle);
    assert_eq!(g.engine.last_giveup(), None);
}

#[test]
fn foreign_token_is_rejected_without_side_effects() {
    let mut g = Greenhouse::new(ControlConfig::default());
    g.hold(95.0, 40.0, 10);
    g.engine.on_correction_timer(7, &mut g.sink);

    assert_eq!(rejected(&g), 1);
    assert_eq!(g.engine.fan_phase(), FanPhase::Correcting);
    assert_eq!(g.engine.window_len(), 10);
    assert_eq!(g.fan(), ActuatorState::On);
    assert!(g.engine.timer().is_armed());
}

#[test]
fn timer_is_armed_with_configured_identity_and_period() {
    let cfg = ControlConfig {
        correction_timer_id: 42,
        correction_period_secs: 30,
        ..ControlConfig::default()
    };
    let mut g = Greenhouse::new(cfg);
    g.step(95.0, 40.0);

    assert_eq!(g.engine.timer().token(), Some(42));
    assert_eq!(g.engine.timer().period_secs(), 30);

    g.engine.on_correction_timer(1337, &mut g.sink);
    assert_eq!(rejected(&g), 1);
    assert_eq!(g.engine.fan_phase(), FanPhase::Correcting);

    // Cooling window: the matching token extends the attempt.
    assert_eq!(g.hold(94.0, 40.0, 29), 1);
    assert_eq!(g.engine.fires_counter(), 1);
    assert_eq!(g.engine.timer().arm_count(), 2);
}

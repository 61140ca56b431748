//! Scenario tests for the pod controller.
//!
//! Exercises: commands → tick ordering → dosing → auto-eject → snapshot
//!
//! Random tick sequences use a fixed seed so failures reproduce.

use cryopod_logic::command::{CommandOutcome, PodCommand};
use cryopod_logic::config::PodConfig;
use cryopod_logic::dosing::DoseOutcome;
use cryopod_logic::eject_policy::EjectReason;
use cryopod_logic::error::PodError;
use cryopod_logic::occupant::{Damage, DamageKind, Occupant};
use cryopod_logic::pod::CryoPod;
use cryopod_logic::thermostat::TemperatureStatus;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Helpers ────────────────────────────────────────────────────────────

fn injured(pod: &CryoPod, each: f32) -> Occupant {
    Occupant::with_damage(
        Some("Test Subject".into()),
        pod.config().occupant,
        Damage {
            oxy: each,
            tox: each,
            brute: each,
            fire: each,
        },
    )
}

fn running_pod(volume: f32) -> CryoPod {
    let mut pod = CryoPod::default();
    let occupant = injured(&pod, 20.0);
    pod.insert_occupant(occupant).unwrap();
    pod.load_beaker(Some("cryoxadone".into()), volume).unwrap();
    pod.switch_on();
    pod
}

fn random_dt(rng: &mut StdRng) -> f32 {
    rng.gen_range(0.0..3.0)
}

// ── Thermostat ─────────────────────────────────────────────────────────

#[test]
fn cell_temperature_approaches_target_monotonically() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut pod = CryoPod::default();
    pod.switch_on();
    let target = pod.config().thermostat.target_temperature;

    let mut last_gap = (pod.cell_temperature() - target).abs();
    for _ in 0..2_000 {
        pod.tick(random_dt(&mut rng));
        let gap = (pod.cell_temperature() - target).abs();
        assert!(gap <= last_gap, "cell moved away from target: {last_gap} -> {gap}");
        assert!(pod.cell_temperature() >= target, "cell overshot the target");
        last_gap = gap;
    }
    assert_eq!(pod.temperature_status(), TemperatureStatus::Optimal);
}

#[test]
fn switched_off_cell_warms_toward_ambient() {
    let mut pod = CryoPod::default();
    pod.switch_on();
    for _ in 0..200 {
        pod.tick(1.0);
    }
    let cold = pod.cell_temperature();
    pod.switch_off();
    pod.tick(5.0);
    assert!(pod.cell_temperature() > cold);
    assert!(pod.cell_temperature() < pod.config().thermostat.ambient_temperature);
}

// ── Dosing ─────────────────────────────────────────────────────────────

#[test]
fn single_cooldown_consumes_one_unit() {
    let mut pod = running_pod(5.0);
    let before = pod.occupant().unwrap().damage().total();

    let report = pod.tick(10.0);

    assert_eq!(report.dose, Some(DoseOutcome::Administered { units: 1.0 }));
    let after = pod.occupant().unwrap().damage().total();
    let effect = pod.config().dosing.dose_effect;
    let per_unit = effect.oxy + effect.tox + effect.brute + effect.fire;
    assert_eq!(before - after, per_unit);

    let snap = pod.snapshot();
    assert_eq!(snap.cooldown_progress, 0.0);
    assert_eq!(snap.beaker_volume, 4.0);
}

#[test]
fn full_health_occupant_still_consumes_dose() {
    let mut pod = CryoPod::default();
    let limits = pod.config().occupant;
    pod.insert_occupant(Occupant::new(None, limits)).unwrap();
    pod.load_beaker(None, 5.0).unwrap();
    pod.switch_on();

    pod.tick(10.0);

    let snap = pod.snapshot();
    assert_eq!(snap.beaker_volume, 4.0);
    assert_eq!(snap.occupant.unwrap().health, 100.0);
    assert_eq!(snap.cooldown_progress, 0.0);
}

#[test]
fn empty_beaker_resets_without_error() {
    let mut pod = running_pod(0.0);

    let report = pod.tick(12.0);

    assert_eq!(report.dose, Some(DoseOutcome::BeakerEmpty));
    let snap = pod.snapshot();
    assert_eq!(snap.beaker_volume, 0.0);
    assert!(snap.is_beaker_loaded);
    assert_eq!(snap.cooldown_progress, 0.0);
    assert_eq!(pod.occupant().unwrap().damage().total(), 80.0);
}

#[test]
fn no_dosing_while_switched_off() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut pod = running_pod(5.0);
    pod.switch_off();
    for _ in 0..1_000 {
        let report = pod.tick(random_dt(&mut rng));
        assert_eq!(report.dose, None);
    }
    let snap = pod.snapshot();
    assert_eq!(snap.beaker_volume, 5.0);
    assert_eq!(snap.cooldown_progress, 0.0);
}

#[test]
fn cooldown_progress_stays_in_range() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut pod = running_pod(50.0);
    for i in 0..3_000 {
        let report = pod.tick(random_dt(&mut rng));
        let progress = pod.snapshot().cooldown_progress;
        assert!((0.0..=100.0).contains(&progress), "tick {i}: {progress}");
        if report.dose.is_some() {
            assert_eq!(progress, 0.0);
        }
        // Occasionally reseat the beaker to exercise the idle path
        if i % 97 == 0 {
            if let Ok(beaker) = pod.eject_beaker() {
                pod.load_beaker(beaker.label().map(str::to_owned), beaker.volume())
                    .unwrap();
            }
        }
    }
}

#[test]
fn reloaded_beaker_does_not_dose_immediately() {
    let mut pod = running_pod(5.0);
    pod.tick(9.0);
    pod.eject_beaker().unwrap();
    pod.load_beaker(None, 5.0).unwrap();

    let report = pod.tick(1.0);

    assert_eq!(report.dose, None);
    assert_eq!(pod.snapshot().beaker_volume, 5.0);
}

#[test]
fn beaker_runs_dry_then_reports_empty() {
    let mut pod = running_pod(2.0);
    let outcomes: Vec<_> = (0..3).map(|_| pod.tick(10.0).dose).collect();
    assert_eq!(
        outcomes,
        vec![
            Some(DoseOutcome::Administered { units: 1.0 }),
            Some(DoseOutcome::Administered { units: 1.0 }),
            Some(DoseOutcome::BeakerEmpty),
        ]
    );
}

// ── Beaker commands ────────────────────────────────────────────────────

#[test]
fn eject_beaker_on_empty_pod_fails() {
    let mut pod = CryoPod::default();
    assert_eq!(pod.eject_beaker(), Err(PodError::NotLoaded));
    assert_eq!(
        pod.dispatch(PodCommand::EjectBeaker),
        Err(PodError::NotLoaded)
    );
}

#[test]
fn eject_zero_volume_beaker_succeeds() {
    let mut pod = CryoPod::default();
    pod.load_beaker(None, 0.0).unwrap();
    let beaker = pod.eject_beaker().unwrap();
    assert_eq!(beaker.volume(), 0.0);
    assert!(!pod.snapshot().is_beaker_loaded);
}

// ── Auto-eject ─────────────────────────────────────────────────────────

#[test]
fn dead_occupant_ejected_within_tick() {
    let mut pod = running_pod(5.0);
    pod.set_auto_eject_dead(true);
    // Kill the occupant directly, bypassing the controller's immediate re-check
    let mut occupant = pod.eject_occupant().unwrap();
    occupant.apply_damage(DamageKind::Tox, 500.0);
    assert!(occupant.is_dead());
    pod.insert_occupant(occupant).unwrap();

    let report = pod.tick(0.1);

    let ejected = report.ejected.expect("dead occupant should be ejected");
    assert_eq!(ejected.reason, EjectReason::Dead);
    assert!(!pod.snapshot().has_occupant);
}

#[test]
fn dead_occupant_kept_without_policy() {
    let mut pod = running_pod(5.0);
    pod.apply_damage(DamageKind::Brute, 500.0).unwrap();
    let report = pod.tick(1.0);
    assert!(report.ejected.is_none());
    let snap = pod.snapshot();
    assert!(snap.has_occupant);
    assert_eq!(snap.occupant.unwrap().stat, 2);
}

#[test]
fn healed_occupant_ejected_when_policy_set() {
    let mut pod = running_pod(50.0);
    pod.set_auto_eject_healthy(true);

    // 20 per subtype at 5 per dose: healed on the fourth dose
    let mut ejected_at = None;
    for i in 1..=10 {
        if let Some(ejection) = pod.tick(10.0).ejected {
            assert_eq!(ejection.reason, EjectReason::Healthy);
            assert!(ejection.occupant.is_healthy());
            ejected_at = Some(i);
            break;
        }
    }
    assert_eq!(ejected_at, Some(4));
    assert_eq!(pod.snapshot().beaker_volume, 46.0);

    // Nothing further happens with the pod empty
    let report = pod.tick(10.0);
    assert_eq!(report, Default::default());
    assert_eq!(pod.snapshot().beaker_volume, 46.0);
}

#[test]
fn ejection_is_idempotent() {
    let mut pod = running_pod(5.0);
    pod.set_auto_eject_dead(true);
    pod.set_auto_eject_healthy(true);
    assert!(pod.apply_damage(DamageKind::Fire, 500.0).unwrap().is_some());
    assert!(pod.tick(1.0).ejected.is_none());
    assert_eq!(pod.eject_occupant(), Err(PodError::NoOccupant));
}

// ── Command surface ────────────────────────────────────────────────────

#[test]
fn switch_on_twice_matches_once() {
    let mut once = running_pod(5.0);
    once.switch_off();
    let mut twice = once.clone();

    once.dispatch(PodCommand::SwitchOn).unwrap();
    twice.dispatch(PodCommand::SwitchOn).unwrap();
    twice.dispatch(PodCommand::SwitchOn).unwrap();

    assert_eq!(once.snapshot(), twice.snapshot());
}

#[test]
fn display_action_names_drive_pod() {
    let mut pod = running_pod(5.0);
    for action in ["auto_eject_dead_on", "auto_eject_healthy_on", "switchOff"] {
        let cmd: PodCommand = action.parse().unwrap();
        assert_eq!(pod.dispatch(cmd), Ok(CommandOutcome::Applied));
    }
    let snap = pod.snapshot();
    assert!(snap.auto_eject_dead);
    assert!(snap.auto_eject_healthy);
    assert!(!snap.is_operating);

    let cmd: PodCommand = "ejectOccupant".parse().unwrap();
    match pod.dispatch(cmd) {
        Ok(CommandOutcome::OccupantEjected(o)) => assert_eq!(o.name(), Some("Test Subject")),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn failed_commands_leave_state_unchanged() {
    let mut pod = running_pod(5.0);
    pod.tick(3.0);
    let before = pod.snapshot();

    assert_eq!(
        pod.dispatch(PodCommand::LoadBeaker {
            label: None,
            volume: 10.0
        }),
        Err(PodError::AlreadyLoaded)
    );
    let other = injured(&pod, 1.0);
    assert_eq!(pod.insert_occupant(other), Err(PodError::AlreadyOccupied));

    assert_eq!(pod.snapshot(), before);
}

#[test]
fn snapshot_is_detached_from_pod() {
    let mut pod = running_pod(5.0);
    let snap = pod.snapshot();
    pod.tick(10.0);
    pod.eject_beaker().unwrap();
    assert_eq!(snap.beaker_volume, 5.0);
    assert!(snap.is_beaker_loaded);
}

#[test]
fn custom_config_changes_cadence() {
    let mut config = PodConfig::default();
    config.dosing.cooldown_period = 2.0;
    let mut pod = CryoPod::new(config).unwrap();
    let occupant = injured(&pod, 10.0);
    pod.insert_occupant(occupant).unwrap();
    pod.load_beaker(None, 10.0).unwrap();
    pod.switch_on();

    for _ in 0..10 {
        pod.tick(1.0);
    }
    assert_eq!(pod.snapshot().beaker_volume, 5.0);
}

//! Cryo Pod Headless Simulation Harness
//!
//! Drives the pod controller through scripted and randomized scenarios
//! in-process and checks the externally observable behavior.
//!
//! Usage:
//!   cargo run -p cryopod-simtest
//!   cargo run -p cryopod-simtest -- --verbose
//!   cargo run -p cryopod-simtest -- --snapshot
//!   cargo run -p cryopod-simtest -- --config my_pod.json
//!
//! Set `RUST_LOG=debug` to see the controller's own log output.

use cryopod_logic::command::{CommandOutcome, PodCommand};
use cryopod_logic::config::{validate_config, PodConfig};
use cryopod_logic::dosing::DoseOutcome;
use cryopod_logic::eject_policy::EjectReason;
use cryopod_logic::error::PodError;
use cryopod_logic::occupant::{Damage, DamageKind, Occupant};
use cryopod_logic::pod::CryoPod;
use cryopod_logic::shared::SharedPod;
use cryopod_logic::thermostat::TemperatureStatus;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Default pod configuration (shipped alongside the crate) ─────────────
const DEFAULT_POD_JSON: &str = include_str!("../../../data/default_pod.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Debug, PartialEq)]
struct Options {
    verbose: bool,
    snapshot: bool,
    config_path: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let config_path = match args.iter().position(|a| a == "--config") {
        Some(i) => match args.get(i + 1) {
            Some(path) if !path.starts_with("--") => Some(path.clone()),
            _ => return Err("--config requires a path".into()),
        },
        None => None,
    };
    Ok(Options {
        verbose: args.iter().any(|a| a == "--verbose"),
        snapshot: args.iter().any(|a| a == "--snapshot"),
        config_path,
    })
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("usage: cryopod-simtest [--verbose] [--snapshot] [--config <path>]");
            std::process::exit(2);
        }
    };
    println!("=== Cryo Pod Simulation Harness ===\n");

    let config = match load_config(opts.config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    let mut results = Vec::new();

    // 1. Shipped configuration
    results.extend(validate_default_config(opts.verbose));

    // 2. Cell refrigeration
    results.extend(validate_thermostat(&config));

    // 3. Dosing cadence and empty beaker handling
    results.extend(validate_dosing(&config));

    // 4. Auto-eject rules
    results.extend(validate_auto_eject(&config));

    // 5. Command surface
    results.extend(validate_commands(&config));

    // 6. Randomized long run
    results.extend(validate_random_run(&config, opts.verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if opts.snapshot {
        print_demo_snapshot(&config);
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_config(path: Option<&str>) -> Result<PodConfig, String> {
    let Some(path) = path else {
        return Ok(PodConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    let config: PodConfig =
        serde_json::from_str(&text).map_err(|e| format!("{}: {}", path, e))?;
    let errors = validate_config(&config);
    if !errors.is_empty() {
        let list = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(format!("{}: invalid config: {}", path, list));
    }
    log::info!("Loaded pod config from {}", path);
    Ok(config)
}

fn new_pod(config: &PodConfig) -> CryoPod {
    // Configs reaching here have already been validated
    CryoPod::new(config.clone()).unwrap_or_default()
}

fn injured(config: &PodConfig, each: f32) -> Occupant {
    Occupant::with_damage(
        Some("Test Subject".into()),
        config.occupant,
        Damage {
            oxy: each,
            tox: each,
            brute: each,
            fire: each,
        },
    )
}

/// A powered pod with an injured occupant and a labeled beaker.
fn running_pod(config: &PodConfig, volume: f32) -> Result<CryoPod, PodError> {
    let mut pod = new_pod(config);
    pod.insert_occupant(injured(config, 20.0))?;
    pod.load_beaker(Some("cryoxadone".into()), volume)?;
    pod.switch_on();
    Ok(pod)
}

// ── 1. Default Config ───────────────────────────────────────────────────

fn validate_default_config(verbose: bool) -> Vec<TestResult> {
    println!("--- Default Config ---");
    let mut results = Vec::new();

    let shipped: PodConfig = match serde_json::from_str(DEFAULT_POD_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "config_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    let errors = validate_config(&shipped);
    results.push(TestResult {
        name: "config_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            "shipped config passes validation".into()
        } else {
            format!("{} problems: {:?}", errors.len(), errors)
        },
    });

    // Compare through the same text path so float parsing matches
    let defaults: Option<PodConfig> = serde_json::to_string(&PodConfig::default())
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok());
    let matches = defaults.as_ref() == Some(&shipped);
    if verbose && !matches {
        println!("  shipped:  {:?}", shipped);
        println!("  defaults: {:?}", defaults);
    }
    results.push(TestResult {
        name: "config_matches_defaults".into(),
        passed: matches,
        detail: "data/default_pod.json mirrors PodConfig::default()".into(),
    });

    results
}

// ── 2. Thermostat ───────────────────────────────────────────────────────

fn validate_thermostat(config: &PodConfig) -> Vec<TestResult> {
    println!("--- Thermostat ---");
    let mut results = Vec::new();

    let mut pod = new_pod(config);
    let start = pod.cell_temperature();
    pod.switch_on();
    let target = config.thermostat.target_temperature;
    let mut monotonic = true;
    let mut last_gap = (start - target).abs();
    let mut seconds_to_optimal = None;
    for s in 1..=600 {
        pod.tick(1.0);
        let gap = (pod.cell_temperature() - target).abs();
        monotonic &= gap <= last_gap;
        last_gap = gap;
        if seconds_to_optimal.is_none()
            && pod.temperature_status() == TemperatureStatus::Optimal
        {
            seconds_to_optimal = Some(s);
        }
    }
    results.push(TestResult {
        name: "thermo_monotonic_approach".into(),
        passed: monotonic,
        detail: format!(
            "{:.2} K → {:.2} K over 600 s",
            start,
            pod.cell_temperature()
        ),
    });
    results.push(TestResult {
        name: "thermo_reaches_optimal".into(),
        passed: seconds_to_optimal.is_some(),
        detail: match seconds_to_optimal {
            Some(s) => format!("optimal after {} s", s),
            None => "never reached the optimal band".into(),
        },
    });

    let cold = pod.cell_temperature();
    pod.switch_off();
    pod.tick(10.0);
    results.push(TestResult {
        name: "thermo_off_drifts_to_ambient".into(),
        passed: pod.cell_temperature() > cold,
        detail: format!(
            "{:.2} K → {:.2} K after 10 s off",
            cold,
            pod.cell_temperature()
        ),
    });

    results
}

// ── 3. Dosing ───────────────────────────────────────────────────────────

fn validate_dosing(config: &PodConfig) -> Vec<TestResult> {
    println!("--- Dosing ---");
    let mut results = Vec::new();
    let period = config.dosing.cooldown_period;
    let units = config.dosing.units_per_dose;

    match running_pod(config, 5.0) {
        Ok(mut pod) => {
            let before = pod.occupant().map_or(0.0, |o| o.damage().total());
            let report = pod.tick(period);
            let after = pod.occupant().map_or(0.0, |o| o.damage().total());
            let snap = pod.snapshot();
            results.push(TestResult {
                name: "dose_one_cycle".into(),
                passed: report.dose == Some(DoseOutcome::Administered { units })
                    && snap.beaker_volume == 5.0 - units
                    && snap.cooldown_progress == 0.0
                    && after < before,
                detail: format!(
                    "volume 5 → {}, damage {:.1} → {:.1}",
                    snap.beaker_volume, before, after
                ),
            });
        }
        Err(e) => results.push(setup_failure("dose_one_cycle", e)),
    }

    match running_pod(config, 0.0) {
        Ok(mut pod) => {
            let report = pod.tick(period * 1.5);
            let snap = pod.snapshot();
            results.push(TestResult {
                name: "dose_empty_beaker".into(),
                passed: report.dose == Some(DoseOutcome::BeakerEmpty)
                    && snap.beaker_volume == 0.0
                    && snap.cooldown_progress == 0.0,
                detail: "empty beaker resets the cycle without healing".into(),
            });
        }
        Err(e) => results.push(setup_failure("dose_empty_beaker", e)),
    }

    match running_pod(config, 5.0) {
        Ok(mut pod) => {
            pod.switch_off();
            let fired = (0..100).any(|_| pod.tick(period).dose.is_some());
            let volume = pod.snapshot().beaker_volume;
            results.push(TestResult {
                name: "dose_never_when_off".into(),
                passed: !fired && volume == 5.0,
                detail: format!("100 cooldown periods switched off, volume {}", volume),
            });
        }
        Err(e) => results.push(setup_failure("dose_never_when_off", e)),
    }

    results
}

// ── 4. Auto-eject ───────────────────────────────────────────────────────

fn validate_auto_eject(config: &PodConfig) -> Vec<TestResult> {
    println!("--- Auto-eject ---");
    let mut results = Vec::new();

    match running_pod(config, 5.0) {
        Ok(mut pod) => {
            pod.set_auto_eject_dead(true);
            let immediate = pod
                .apply_damage(DamageKind::Brute, config.occupant.max_health * 2.0)
                .ok()
                .flatten();
            results.push(TestResult {
                name: "eject_dead_on_damage".into(),
                passed: immediate.map(|e| e.reason) == Some(EjectReason::Dead)
                    && !pod.snapshot().has_occupant,
                detail: "lethal damage ejects at once with auto_eject_dead".into(),
            });
        }
        Err(e) => results.push(setup_failure("eject_dead_on_damage", e)),
    }

    match running_pod(config, 1_000.0) {
        Ok(mut pod) => {
            pod.set_auto_eject_healthy(true);
            let mut doses = 0;
            let mut reason = None;
            for _ in 0..1_000 {
                let report = pod.tick(config.dosing.cooldown_period);
                if report.dose.is_some() {
                    doses += 1;
                }
                if let Some(ejection) = report.ejected {
                    reason = Some(ejection.reason);
                    break;
                }
            }
            results.push(TestResult {
                name: "eject_when_healed".into(),
                passed: reason == Some(EjectReason::Healthy),
                detail: format!("healed and ejected after {} doses", doses),
            });
        }
        Err(e) => results.push(setup_failure("eject_when_healed", e)),
    }

    match running_pod(config, 5.0) {
        Ok(mut pod) => {
            let _ = pod.apply_damage(DamageKind::Oxy, config.occupant.max_health * 2.0);
            let report = pod.tick(1.0);
            results.push(TestResult {
                name: "eject_respects_flags".into(),
                passed: report.ejected.is_none() && pod.snapshot().has_occupant,
                detail: "dead occupant stays when both flags are off".into(),
            });
        }
        Err(e) => results.push(setup_failure("eject_respects_flags", e)),
    }

    results
}

// ── 5. Commands ─────────────────────────────────────────────────────────

fn validate_commands(config: &PodConfig) -> Vec<TestResult> {
    println!("--- Commands ---");
    let mut results = Vec::new();
    let mut pod = new_pod(config);

    let actions = [
        "switchOn",
        "switchOff",
        "ejectOccupant",
        "ejectBeaker",
        "auto_eject_healthy_on",
        "auto_eject_healthy_off",
        "auto_eject_dead_on",
        "auto_eject_dead_off",
    ];
    let unparsed: Vec<_> = actions
        .iter()
        .filter(|a| a.parse::<PodCommand>().is_err())
        .collect();
    results.push(TestResult {
        name: "cmd_display_actions_parse".into(),
        passed: unparsed.is_empty(),
        detail: if unparsed.is_empty() {
            format!("{} display actions recognised", actions.len())
        } else {
            format!("unrecognised: {:?}", unparsed)
        },
    });

    results.push(TestResult {
        name: "cmd_eject_empty".into(),
        passed: pod.dispatch(PodCommand::EjectOccupant) == Err(PodError::NoOccupant)
            && pod.dispatch(PodCommand::EjectBeaker) == Err(PodError::NotLoaded),
        detail: "ejecting from an empty pod reports NoOccupant / NotLoaded".into(),
    });

    let load = r#"{"action":"loadBeaker","label":null,"volume":0}"#;
    let loaded = serde_json::from_str::<PodCommand>(load)
        .map_err(|e| e.to_string())
        .and_then(|cmd| pod.dispatch(cmd).map_err(|e| e.to_string()));
    let ejected = pod.dispatch(PodCommand::EjectBeaker);
    results.push(TestResult {
        name: "cmd_zero_volume_beaker".into(),
        passed: loaded.is_ok()
            && matches!(&ejected, Ok(CommandOutcome::BeakerEjected(b)) if b.volume() == 0.0),
        detail: "zero-volume beaker loads and ejects".into(),
    });

    let _ = pod.dispatch(PodCommand::SwitchOn);
    let once = pod.snapshot();
    let _ = pod.dispatch(PodCommand::SwitchOn);
    results.push(TestResult {
        name: "cmd_switch_idempotent".into(),
        passed: once == pod.snapshot(),
        detail: "second switchOn leaves the snapshot unchanged".into(),
    });

    results
}

// ── 6. Random Run ───────────────────────────────────────────────────────

fn validate_random_run(config: &PodConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Random Run ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(0x0C27_0B0D);
    let pod = SharedPod::new(new_pod(config));

    let mut progress_ok = true;
    let mut volume_ok = true;
    let mut doses = 0u32;
    let mut empties = 0u32;
    let mut ejections = 0u32;
    let mut last_volume = 0.0f32;

    for step in 0..20_000u32 {
        match rng.gen_range(0..100) {
            0 => {
                let _ = pod.insert_occupant(injured(config, rng.gen_range(0.0..60.0)));
            }
            1 => {
                let _ = pod.dispatch(PodCommand::LoadBeaker {
                    label: Some("cryoxadone".into()),
                    volume: rng.gen_range(0..20) as f32,
                });
            }
            2 => {
                let _ = pod.dispatch(PodCommand::EjectBeaker);
            }
            3 => {
                let cmd = if rng.gen_bool(0.7) {
                    PodCommand::SwitchOn
                } else {
                    PodCommand::SwitchOff
                };
                let _ = pod.dispatch(cmd);
            }
            4 => {
                let _ = pod.dispatch(PodCommand::SetAutoEjectHealthy {
                    enabled: rng.gen_bool(0.5),
                });
                let _ = pod.dispatch(PodCommand::SetAutoEjectDead {
                    enabled: rng.gen_bool(0.5),
                });
            }
            5..=9 => {
                let kind = DamageKind::ALL[rng.gen_range(0..DamageKind::ALL.len())];
                if let Ok(Some(_)) = pod.apply_damage(kind, rng.gen_range(0.0..40.0)) {
                    ejections += 1;
                }
            }
            _ => {
                let before = pod.snapshot();
                let report = pod.tick(rng.gen_range(0.0..3.0));
                match report.dose {
                    Some(DoseOutcome::Administered { .. }) => doses += 1,
                    Some(DoseOutcome::BeakerEmpty) => empties += 1,
                    None => {}
                }
                if report.ejected.is_some() {
                    ejections += 1;
                }
                let after = pod.snapshot();
                if !before.is_operating && after.beaker_volume != before.beaker_volume {
                    volume_ok = false;
                    if verbose {
                        println!("  step {}: beaker changed while off", step);
                    }
                }
            }
        }
        let snap = pod.snapshot();
        if !(0.0..=100.0).contains(&snap.cooldown_progress) {
            progress_ok = false;
        }
        last_volume = snap.beaker_volume;
    }

    results.push(TestResult {
        name: "random_progress_in_range".into(),
        passed: progress_ok,
        detail: "cooldown progress stayed within [0, 100]".into(),
    });
    results.push(TestResult {
        name: "random_no_dosing_when_off".into(),
        passed: volume_ok,
        detail: "beaker untouched by ticks while switched off".into(),
    });
    results.push(TestResult {
        name: "random_activity".into(),
        passed: doses > 0,
        detail: format!(
            "{} doses, {} empty cycles, {} auto-ejections, final volume {}",
            doses, empties, ejections, last_volume
        ),
    });

    results
}

fn setup_failure(name: &str, err: PodError) -> TestResult {
    TestResult {
        name: name.into(),
        passed: false,
        detail: format!("scenario setup failed: {}", err),
    }
}

fn print_demo_snapshot(config: &PodConfig) {
    let Ok(mut pod) = running_pod(config, 10.0) else {
        return;
    };
    for _ in 0..30 {
        pod.tick(1.0);
    }
    match serde_json::to_string_pretty(&pod.snapshot()) {
        Ok(json) => println!("\n{}", json),
        Err(e) => eprintln!("error: could not serialize snapshot: {}", e),
    }
}

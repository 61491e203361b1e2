//! Latch Engine Runtime
//!
//! Headless host: loads settings, a scene and its scripts, then runs the
//! fixed-rate simulation for a bounded number of ticks.
//!
//! Usage: `latch [settings.json]`

use anyhow::{Context, Result};
use latch_core::ecs::{EntityId, World};
use latch_core::scene;
use latch_core::time::SimulationTime;
use latch_script::{ScriptHost, ScriptRuntime, SharedWorld, TransformBridge};
use latch_services::Settings;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

fn main() -> Result<()> {
    let settings = match std::env::args_os().nth(1) {
        Some(path) => Settings::load(Path::new(&path))
            .with_context(|| format!("loading settings from {}", path.to_string_lossy()))?,
        None => Settings::default(),
    };

    tracing_subscriber::fmt()
        .with_max_level(settings.log_level.as_tracing_level())
        .init();

    tracing::info!("Latch Engine v{}", latch_core::VERSION);
    let summary = run(&settings)?;
    tracing::info!(
        ticks = summary.ticks,
        hook_failures = summary.hook_failures,
        destroyed = summary.destroyed,
        "Runtime stopped"
    );

    Ok(())
}

#[derive(Debug, Default, PartialEq)]
struct RunSummary {
    ticks: u64,
    hook_failures: usize,
    /// Entities destroyed by scripts during the loop plus those torn down at shutdown.
    destroyed: usize,
}

fn run(settings: &Settings) -> Result<RunSummary> {
    let (scene_name, world) = match &settings.scene {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading scene {}", path.display()))?;
            scene::load_world(&json).with_context(|| format!("loading scene {}", path.display()))?
        }
        None => ("untitled".to_string(), World::new()),
    };
    let world: SharedWorld = Rc::new(RefCell::new(world));

    let bridge = TransformBridge::new(world.clone(), settings.policy());
    let mut runtime = ScriptRuntime::new(bridge.clone())?;
    for script in &settings.scripting.scripts {
        runtime
            .load_file(script)
            .with_context(|| format!("loading script {}", script.display()))?;
    }

    let mut host = ScriptHost::new(bridge);
    attach_scripts(&runtime, &mut host)?;

    let mut time = SimulationTime::new(settings.simulation.tick_rate_hz);
    let mut summary = RunSummary::default();
    tracing::info!(
        scene = %scene_name,
        entities = world.borrow().len(),
        scripted = host.len(),
        tick_rate_hz = time.tick_rate_hz(),
        "Simulation started"
    );

    while time.tick_count() < settings.simulation.max_ticks {
        let report = host.update(time.delta_seconds())?;
        summary.destroyed += report.destroyed.len();
        summary.hook_failures += host.take_failures().len();
        time.advance_tick();
    }
    summary.ticks = time.tick_count();
    tracing::debug!(simulated = ?time.total_time(), "Tick loop finished");

    if let Some(path) = &settings.scene_output {
        let json = scene::save_world(&scene_name, &world.borrow())?;
        std::fs::write(path, json).with_context(|| format!("writing scene {}", path.display()))?;
        tracing::info!(path = %path.display(), "Scene saved");
    }

    summary.destroyed += host.shutdown();
    summary.hook_failures += host.take_failures().len();
    Ok(summary)
}

/// Instantiate the script class named by every scripted entity in the world.
/// Entities naming an unregistered class, or whose constructor throws, are
/// left unscripted.
fn attach_scripts(runtime: &ScriptRuntime, host: &mut ScriptHost) -> Result<()> {
    let scripted: Vec<(EntityId, String)> = host
        .world()
        .borrow()
        .iter()
        .filter_map(|(id, record)| Some((id, record.script.as_ref()?.class_name.clone())))
        .collect();

    for (id, class_name) in scripted {
        if !runtime.class_exists(&class_name)? {
            tracing::warn!(entity = %id, class = %class_name, "Script class not registered");
            continue;
        }
        let behaviour = match runtime.instantiate(&class_name, id) {
            Ok(behaviour) => behaviour,
            Err(error) => {
                tracing::error!(entity = %id, class = %class_name, %error, "Failed to instantiate script");
                continue;
            }
        };
        host.attach(id, Box::new(behaviour))?;
    }
    Ok(())
}

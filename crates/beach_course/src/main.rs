//! Beach course headless runner
//!
//! Loads a level, drops the player at its spawn point and plays the level's
//! input script through the collision core, logging every change of contact.
//!
//! Usage: `beach_course [config.toml|config.ron]`

mod config;
mod level;
mod script;

use shore_engine::foundation::logging;
use shore_engine::prelude::*;

use config::GameConfig;
use level::LevelDescription;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1);
    let config = GameConfig::load_or_default(config_path.as_deref())?;

    logging::init_with_level(&config.core.engine.log_level);
    log::info!("Starting beach course");

    let description = LevelDescription::load(&config.course.level)?;
    let level = description.build()?;

    let mut engine = CourseEngine::new(config.core.clone(), level.scene, level.ignore)?;
    for &id in &level.attachments {
        let name = engine.scene().get(id).map_or("?", |o| o.name.as_str());
        log::debug!("Excluding attachment '{}' from contact", name);
        engine.exclude(id)?;
    }
    engine.place_rigs(description.spawn);

    let summary = run_script(&mut engine, &description, config.course.frame_limit)?;
    log::info!(
        "Course '{}' finished after {} frames: {} contacts, {} grounded, final position {:?}",
        description.name,
        engine.frame(),
        summary.contacts,
        summary.grounded,
        engine.primary().position()
    );

    Ok(())
}

/// Contact counts over a scripted run
#[derive(Debug, Default, PartialEq, Eq)]
struct RunSummary {
    contacts: u64,
    grounded: u64,
}

fn run_script(
    engine: &mut CourseEngine,
    description: &LevelDescription,
    frame_limit: Option<u64>,
) -> Result<RunSummary, EngineError> {
    let delta_time = engine.config().engine.timestep;
    let mut summary = RunSummary::default();
    let mut last_hit = None;

    for step in &description.script {
        let input = step.input();
        for _ in 0..step.frames {
            if frame_limit.is_some_and(|limit| engine.frame() >= limit) {
                log::info!("Frame limit reached");
                return Ok(summary);
            }

            let report = engine.step(&input, delta_time)?;
            if report.outcome.is_collision() {
                summary.contacts += 1;
            }
            if report.outcome.is_grounded() {
                summary.grounded += 1;
            }

            if report.hit != last_hit {
                let name = report
                    .hit
                    .and_then(|id| engine.scene().get(id))
                    .map_or("nothing", |o| o.name.as_str());
                log::info!(
                    "Frame {}: touching {} ({:?}) at {:?}",
                    report.frame,
                    name,
                    report.outcome,
                    report.rig_position
                );
                last_hit = report.hit;
            }
            log::trace!("Frame {}: {:?}", report.frame, report.vertical_state);
        }
    }

    Ok(summary)
}

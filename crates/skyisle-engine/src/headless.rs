//! Scripted runs without a window.
//!
//! Feeds the key script frame by frame through the input manager, steps the
//! simulation with a fixed wall time per frame and reports the final state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skyisle_gameplay::{InputManager, KeyCode, MoveEvent, Simulation, Snapshot};
use skyisle_world::StaticAssets;
use tracing::{debug, info};

use crate::config::EngineConfig;

/// Totals gathered over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Frames simulated
    pub frames: u32,
    /// Takeoffs
    pub takeoffs: u32,
    /// Landings
    pub landings: u32,
    /// Items picked up
    pub pickups: u32,
    /// Bullet hits on the enemy
    pub hits: u32,
    /// Enemy defeats
    pub defeats: u32,
    /// Conversations started
    pub conversations: u32,
    /// Islands placed while the run explored
    pub islands_placed: usize,
}

/// Result of a headless run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Event totals
    pub stats: RunStats,
    /// State after the last frame
    pub final_state: Snapshot,
}

/// Keys held on a given frame of the script.
fn keys_for_frame(config: &EngineConfig, frame: u32) -> &[KeyCode] {
    let mut start = 0;
    for step in &config.run.script {
        if frame < start + step.frames {
            return &step.keys;
        }
        start += step.frames;
    }
    &[]
}

/// Runs the configured script to completion.
pub fn run(config: &EngineConfig) -> Result<RunReport> {
    let assets = StaticAssets::with_default_tiles();
    let mut simulation = Simulation::new(config.simulation.clone(), &assets)
        .context("Failed to build the simulation")?;
    let mut input = InputManager::new();
    let mut stats = RunStats::default();

    info!(
        "Running {} frames at {:.4}s per frame",
        config.run.frames, config.run.frame_time
    );

    for frame in 0..config.run.frames {
        input.set_pressed_keys(keys_for_frame(config, frame));
        let report = simulation.step(&input.process(), config.run.frame_time);
        input.end_frame();

        stats.frames += 1;
        stats.islands_placed += report.activation.placed;
        stats.pickups += report.picked_up.len() as u32;
        stats.hits += report.hits;
        stats.defeats += u32::from(report.enemy_defeated);
        stats.conversations += u32::from(report.talked_to.is_some());
        match report.movement {
            Some(MoveEvent::TookOff) => stats.takeoffs += 1,
            Some(MoveEvent::Landed) => stats.landings += 1,
            Some(MoveEvent::None) | None => {},
        }
        if report.activation.placed > 0 {
            debug!(
                "Frame {frame}: placed {} islands, {} active",
                report.activation.placed, report.activation.active
            );
        }
    }

    let final_state = simulation.snapshot();
    info!(
        "Run finished at ({:.1}, {:.1}) after {:.2}s of game time",
        final_state.player_position.x, final_state.player_position.y, final_state.game_time
    );
    Ok(RunReport { stats, final_state })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScriptStep;

    fn config_with(frames: u32, script: Vec<ScriptStep>) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.run.frames = frames;
        config.run.frame_time = 0.05;
        config.run.script = script;
        config.simulation.enemy.enabled = false;
        config
    }

    #[test]
    fn test_keys_follow_script() {
        let config = config_with(
            10,
            vec![
                ScriptStep::new(2, &[KeyCode::W]),
                ScriptStep::new(3, &[KeyCode::S]),
            ],
        );
        assert_eq!(keys_for_frame(&config, 0), &[KeyCode::W]);
        assert_eq!(keys_for_frame(&config, 1), &[KeyCode::W]);
        assert_eq!(keys_for_frame(&config, 2), &[KeyCode::S]);
        assert_eq!(keys_for_frame(&config, 4), &[KeyCode::S]);
        assert!(keys_for_frame(&config, 5).is_empty());
    }

    #[test]
    fn test_takeoff_and_climb() {
        let config = config_with(20, vec![ScriptStep::new(20, &[KeyCode::W, KeyCode::Right])]);
        let report = run(&config).expect("run");

        assert_eq!(report.stats.frames, 20);
        assert_eq!(report.stats.takeoffs, 1);
        assert!(report.final_state.player_flying);
        assert!(report.final_state.player_height > config.simulation.movement.ground_offset);
        assert!(report.final_state.player_position.x > config.simulation.player_start.x);
        assert!((report.final_state.game_time - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_idle_run_stays_put() {
        let config = config_with(5, Vec::new());
        let report = run(&config).expect("run");
        assert_eq!(report.final_state.player_position, config.simulation.player_start);
        assert!(!report.final_state.player_flying);
        assert_eq!(report.stats.takeoffs, 0);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let config = config_with(3, Vec::new());
        let report = run(&config).expect("run");
        let json = serde_json::to_string(&report).expect("json");
        assert!(json.contains("final_state"));
        let parsed: RunReport = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed.stats, report.stats);
    }
}

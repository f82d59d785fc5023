//! Frame clock with a clamped step.
//!
//! Slow frames never advance the simulation by more than
//! [`ClockConfig::max_step`]; the simulation slows down instead of jumping.

use std::collections::VecDeque;
use std::time::Instant;

use crate::config::ClockConfig;

/// Samples kept for the average step.
const MAX_SAMPLES: usize = 120;

/// Game clock.
#[derive(Debug)]
pub struct Clock {
    max_step: f32,
    last_tick: Option<Instant>,
    game_time: f64,
    steps: VecDeque<f32>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(&ClockConfig::default())
    }
}

impl Clock {
    /// Creates a clock that has not ticked yet.
    #[must_use]
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            max_step: config.max_step,
            last_tick: None,
            game_time: 0.0,
            steps: VecDeque::with_capacity(MAX_SAMPLES),
        }
    }

    /// Measures wall time since the previous tick and advances by it,
    /// clamped. The first tick advances by zero.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = self
            .last_tick
            .map_or(0.0, |last| (now - last).as_secs_f32());
        self.last_tick = Some(now);
        self.advance(raw)
    }

    /// Advances by an externally measured interval, clamped to
    /// `[0, max_step]`. Returns the step taken.
    pub fn advance(&mut self, raw_seconds: f32) -> f32 {
        let step = raw_seconds.clamp(0.0, self.max_step);
        self.game_time += f64::from(step);

        self.steps.push_back(step);
        if self.steps.len() > MAX_SAMPLES {
            self.steps.pop_front();
        }
        step
    }

    /// Total simulated seconds.
    #[must_use]
    pub fn game_time(&self) -> f64 {
        self.game_time
    }

    /// Longest step a tick may take.
    #[must_use]
    pub fn max_step(&self) -> f32 {
        self.max_step
    }

    /// Mean of recent steps.
    #[must_use]
    pub fn average_step(&self) -> f32 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.steps.iter().sum::<f32>() / self.steps.len() as f32
    }
}

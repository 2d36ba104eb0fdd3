//! Session controller: score, clock, pause state and game over.

use tracing::info;

use shoal_core::enums::SessionPhase;
use shoal_core::events::SimEvent;
use shoal_core::types::SimTime;

/// One play session. Owned by the engine and handed to the systems that
/// need it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: SessionPhase,
    score: u32,
    time: SimTime,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Active -> Paused. Returns whether the phase changed.
    pub fn pause(&mut self, events: &mut Vec<SimEvent>) -> bool {
        if self.phase != SessionPhase::Active {
            return false;
        }
        self.phase = SessionPhase::Paused;
        events.push(SimEvent::GamePaused);
        info!(elapsed = self.time.elapsed_secs, "session paused");
        true
    }

    /// Paused -> Active. Returns whether the phase changed.
    pub fn resume(&mut self, events: &mut Vec<SimEvent>) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        self.phase = SessionPhase::Active;
        events.push(SimEvent::GameResumed);
        info!(elapsed = self.time.elapsed_secs, "session resumed");
        true
    }

    /// Active -> Over. Fires at most once per session.
    pub fn end(&mut self, events: &mut Vec<SimEvent>) -> bool {
        if self.phase != SessionPhase::Active {
            return false;
        }
        self.phase = SessionPhase::Over;
        events.push(SimEvent::GameOver {
            score: self.score,
            seconds: self.time.elapsed_secs,
        });
        info!(
            score = self.score,
            survived_secs = self.time.elapsed_secs,
            "game over"
        );
        true
    }

    /// Add points. Ignored outside `Active`.
    pub fn add_score(&mut self, points: u32, events: &mut Vec<SimEvent>) {
        if !self.is_active() || points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points);
        events.push(SimEvent::ScoreChanged { score: self.score });
    }

    /// Advance the session clock by one tick. Ignored outside `Active`.
    pub fn advance_clock(&mut self, dt: f64, events: &mut Vec<SimEvent>) {
        if !self.is_active() {
            return;
        }
        self.time.advance(dt);
        events.push(SimEvent::GameTimeChanged {
            seconds: self.time.elapsed_secs,
        });
    }
}

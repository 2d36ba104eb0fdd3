//! Timed stat boosts.
//!
//! A boost multiplies a player stat immediately and queues a reversion keyed
//! by the absolute tick it fires on. Each reversion restores the value the
//! stat had when its boost was applied, so overlapping boosts unwind in
//! firing order. The queue is driven by the session tick, which stands still
//! while paused, so countdowns pause with it.

use std::collections::BTreeMap;

use tracing::debug;

use shoal_core::enums::BoostedStat;

use crate::player::PlayerAgent;

/// Tolerance for `duration / dt` landing a hair above a whole tick count.
const TICK_ROUNDING_SLACK: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
struct ScheduledRevert {
    stat: BoostedStat,
    baseline: f64,
}

/// Pending reversions ordered by `(fire_tick, sequence)`.
#[derive(Debug, Default)]
pub struct EffectScheduler {
    queue: BTreeMap<(u64, u64), ScheduledRevert>,
    next_sequence: u64,
}

impl EffectScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `stat *= multiplier` now and schedule the revert after
    /// `duration_secs`. Returns the tick the revert fires on.
    pub fn apply(
        &mut self,
        player: &mut PlayerAgent,
        stat: BoostedStat,
        multiplier: f64,
        duration_secs: f64,
        current_tick: u64,
        dt: f64,
    ) -> u64 {
        let baseline = player.stat(stat);
        player.set_stat(stat, baseline * multiplier);

        // Float-to-int casts saturate; very long boosts fire at `u64::MAX`.
        let ticks = (duration_secs / dt - TICK_ROUNDING_SLACK).ceil().max(0.0) as u64;
        let fire_tick = current_tick.saturating_add(ticks);
        self.queue
            .insert((fire_tick, self.next_sequence), ScheduledRevert { stat, baseline });
        self.next_sequence += 1;

        debug!(?stat, multiplier, baseline, fire_tick, "boost applied");
        fire_tick
    }

    /// Run every reversion due at or before `current_tick`, in schedule
    /// order. Returns how many fired.
    pub fn fire_due(&mut self, player: &mut PlayerAgent, current_tick: u64) -> usize {
        let mut fired = 0;
        while let Some(entry) = self.queue.first_entry() {
            if entry.key().0 > current_tick {
                break;
            }
            let revert = entry.remove();
            player.set_stat(revert.stat, revert.baseline);
            debug!(stat = ?revert.stat, restored = revert.baseline, "boost expired");
            fired += 1;
        }
        fired
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

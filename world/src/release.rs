//! Timed release of pursuers from the pen and the gate passes it grants.

use std::time::Duration;

use maze_chase_core::{intersects, EntityId, Rect, LEGALITY_EPSILON};

#[derive(Clone, Copy, Debug, PartialEq)]
struct GatePass {
    pursuer: EntityId,
    touched_gate: bool,
}

/// Queue of pursuers waiting to leave the pen, with the passes of those
/// currently allowed through the gate.
#[derive(Clone, Debug, Default)]
pub(crate) struct ReleaseScheduler {
    delays: Vec<f32>,
    queue: Vec<EntityId>,
    next: usize,
    level_start: Duration,
    passes: Vec<GatePass>,
}

impl ReleaseScheduler {
    pub(crate) fn new(delays: Vec<f32>) -> Self {
        Self {
            delays,
            ..Self::default()
        }
    }

    /// Forgets the queue and every pass.
    pub(crate) fn clear(&mut self) {
        self.queue.clear();
        self.next = 0;
        self.passes.clear();
    }

    pub(crate) fn enqueue(&mut self, pursuer: EntityId) {
        self.queue.push(pursuer);
    }

    /// Restarts the release timetable at `now`, revoking every pass.
    pub(crate) fn restart(&mut self, now: Duration) {
        self.level_start = now;
        self.next = 0;
        self.passes.clear();
    }

    /// Authorizes `pursuer` to cross the gate. A pursuer holds at most one
    /// pass; granting again rearms the existing one.
    pub(crate) fn grant(&mut self, pursuer: EntityId) {
        match self.passes.iter_mut().find(|pass| pass.pursuer == pursuer) {
            Some(pass) => pass.touched_gate = false,
            None => self.passes.push(GatePass {
                pursuer,
                touched_gate: false,
            }),
        }
    }

    pub(crate) fn is_authorized(&self, pursuer: EntityId) -> bool {
        self.passes.iter().any(|pass| pass.pursuer == pursuer)
    }

    /// Revokes passes of pursuers that touched the gate and moved off it,
    /// then releases every queued pursuer whose delay has elapsed.
    ///
    /// `bounds_of` resolves active pursuers; passes and queue entries of
    /// anything it cannot resolve are skipped. Without a gate every pass is
    /// dropped. Returns the pursuers released by this call.
    pub(crate) fn update<F>(
        &mut self,
        now: Duration,
        gate: Option<Rect>,
        bounds_of: F,
    ) -> Vec<EntityId>
    where
        F: Fn(EntityId) -> Option<Rect>,
    {
        match gate {
            Some(gate) => self.passes.retain_mut(|pass| {
                let Some(bounds) = bounds_of(pass.pursuer) else {
                    return false;
                };
                let touching = intersects(&bounds, &gate, LEGALITY_EPSILON);
                if touching {
                    pass.touched_gate = true;
                }
                !pass.touched_gate || touching
            }),
            None => self.passes.clear(),
        }

        let elapsed = now.saturating_sub(self.level_start).as_secs_f32();
        let mut released = Vec::new();
        while let Some(&pursuer) = self.queue.get(self.next) {
            let delay = self.delays.get(self.next).copied().unwrap_or(0.0);
            if elapsed < delay {
                break;
            }
            self.next += 1;

            if bounds_of(pursuer).is_none() {
                continue;
            }
            self.grant(pursuer);
            released.push(pursuer);
        }
        released
    }
}

// Cancellable countdown for re-enabling wall detection after a wall-run exit

/// At most one pending countdown; starting a new one replaces the old.
#[derive(Debug, Clone, Default)]
pub struct WallCheckCooldown {
    remaining: Option<f32>,
}

/// Leftover below this counts as elapsed
const ELAPSED_EPSILON: f32 = 1.0e-5;

impl WallCheckCooldown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule expiry `duration` seconds from now, replacing any pending one
    pub fn start(&mut self, duration: f32) {
        if self.remaining.is_some() {
            log::debug!("Replacing pending wall-check cool-down");
        }
        self.remaining = Some(duration.max(0.0));
    }

    /// Drop the pending countdown. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.remaining.take().is_some()
    }

    /// Advance by `dt`; returns true on the tick the countdown expires
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };

        *remaining -= dt;
        if *remaining <= ELAPSED_EPSILON {
            self.remaining = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }
}

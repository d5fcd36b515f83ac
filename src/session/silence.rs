// Silence detection for auto-stop
//
// The monitor is driven by the caller's clock (seconds since capture began),
// never by wall time, so a replayed or simulated stream behaves exactly like
// a live one.

use tracing::{debug, info};

/// Peak level of a block in dBFS
///
/// Returns negative infinity for an all-zero (or empty) block.
pub fn peak_level_db(channels: &[Vec<f32>]) -> f32 {
    let peak = channels
        .iter()
        .flatten()
        .fold(0.0f32, |peak, &s| peak.max(s.abs()));

    20.0 * peak.log10()
}

/// Tracks how long the signal has stayed below a volume threshold
#[derive(Debug, Clone)]
pub struct SilenceMonitor {
    volume_threshold_db: f32,
    quiet_threshold_secs: f64,
    quiet_since: Option<f64>,
    triggered: bool,
}

impl SilenceMonitor {
    pub fn new(volume_threshold_db: f32, quiet_threshold_secs: f64) -> Self {
        Self {
            volume_threshold_db,
            quiet_threshold_secs,
            quiet_since: None,
            triggered: false,
        }
    }

    /// Feed one level snapshot
    ///
    /// Returns `true` once, on the observation where quiet has lasted strictly
    /// longer than the threshold. A level equal to the volume threshold counts
    /// as signal. The quiet clock starts at the first observation of a cycle.
    pub fn observe(&mut self, peak_level_db: f32, now_secs: f64) -> bool {
        if self.triggered {
            return false;
        }

        let quiet_since = *self.quiet_since.get_or_insert(now_secs);

        if peak_level_db >= self.volume_threshold_db {
            self.quiet_since = Some(now_secs);
            return false;
        }

        let quiet_for = now_secs - quiet_since;
        debug!("Quiet for {:.2}s (peak {:.1} dB)", quiet_for, peak_level_db);

        if quiet_for > self.quiet_threshold_secs {
            info!(
                "Silence for {:.2}s exceeded {:.2}s threshold",
                quiet_for, self.quiet_threshold_secs
            );
            self.triggered = true;
            return true;
        }

        false
    }

    /// Start a new cycle: forget the quiet clock and allow the trigger again
    pub fn rearm(&mut self) {
        self.quiet_since = None;
        self.triggered = false;
    }

    pub fn quiet_since(&self) -> Option<f64> {
        self.quiet_since
    }

    pub fn has_triggered(&self) -> bool {
        self.triggered
    }
}

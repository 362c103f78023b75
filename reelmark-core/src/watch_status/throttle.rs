/// Sampling gate for player `timeupdate` events.
///
/// The first sample always passes. After that a sample passes only once the
/// playback position has moved at least `interval` seconds (either
/// direction) from the last sample that passed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressThrottle {
    interval: f64,
    last_emitted: Option<f64>,
}

impl ProgressThrottle {
    pub fn new(interval_secs: f64) -> Self {
        Self {
            interval: interval_secs,
            last_emitted: None,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn last_emitted(&self) -> Option<f64> {
        self.last_emitted
    }

    /// Returns whether `position_secs` should be persisted and, if so,
    /// records it as the last emitted position.
    pub fn should_emit(&mut self, position_secs: f64) -> bool {
        if !position_secs.is_finite() || position_secs < 0.0 {
            return false;
        }
        let open = match self.last_emitted {
            None => true,
            Some(last) => (position_secs - last).abs() >= self.interval,
        };
        if open {
            self.last_emitted = Some(position_secs);
        }
        open
    }

    /// Forget the last emission, e.g. when a new title starts.
    pub fn reset(&mut self) {
        self.last_emitted = None;
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(10.0)
    }
}

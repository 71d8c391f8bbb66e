//! Running count and sum behind each user's and film's average.

/// Aggregate over every rating currently stored for one user or one film
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Statistics {
    count: u32,
    sum: f64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, value: f32) {
        self.count += 1;
        self.sum += f64::from(value);
    }

    /// Replaces one previously recorded value
    pub fn revise(&mut self, previous: f32, value: f32) {
        self.sum += f64::from(value) - f64::from(previous);
    }

    /// Removes one previously recorded value; `true` when none remain
    pub fn retract(&mut self, value: f32) -> bool {
        self.count = self.count.saturating_sub(1);
        if self.count == 0 {
            self.sum = 0.0;
        } else {
            self.sum -= f64::from(value);
        }
        self.count == 0
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Mean of the recorded values, 0.0 when there are none
    pub fn average(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        (self.sum / f64::from(self.count)) as f32
    }
}

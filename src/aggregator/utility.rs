/// Running mean and population standard deviation over a stream of values.
///
/// Keeps only sums, so summarizing a run never holds more than the current
/// row in memory.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RunningStats {
    count: usize,
    sum: f64,
    sum_sq: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean. Returns 0.0 when nothing was pushed.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// Population standard deviation. Returns 0.0 when nothing was pushed.
    pub fn stddev(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let variance = (self.sum_sq / self.count as f64 - mean * mean).max(0.0);
        variance.sqrt()
    }
}

/// Committed interpretation of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisLock {
    Undecided,
    Horizontal,
    Vertical,
}

/// One pointer sequence on one row, from press to release. Positions are in
/// pixels, times in milliseconds on the host's clock.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession<K> {
    pub subject: K,
    pub start_x: f64,
    pub start_y: f64,
    pub current_x: f64,
    pub axis: AxisLock,
    pub start_time: u64,
    pub last_x: f64,
    pub last_time: u64,
}

impl<K> GestureSession<K> {
    pub fn new(subject: K, x: f64, y: f64, t: u64) -> Self {
        GestureSession {
            subject,
            start_x: x,
            start_y: y,
            current_x: x,
            axis: AxisLock::Undecided,
            start_time: t,
            last_x: x,
            last_time: t,
        }
    }

    /// Horizontal travel from the press to the last tracked position.
    pub fn dx(&self) -> f64 {
        self.current_x - self.start_x
    }

    /// Average speed over the tracked part of the gesture, in px/ms.
    pub fn velocity(&self) -> f64 {
        let dt = self.last_time.saturating_sub(self.start_time).max(1) as f64;
        self.dx().abs() / dt
    }

    pub(crate) fn track(&mut self, x: f64, t: u64) {
        self.last_x = x;
        self.last_time = t;
        self.current_x = x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_uses_tracked_span() {
        let mut s = GestureSession::new("row", 200.0, 50.0, 1_000);
        s.track(150.0, 1_100);
        assert_eq!(s.dx(), -50.0);
        assert!((s.velocity() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_elapsed_time_counts_as_one_millisecond() {
        let mut s = GestureSession::new("row", 0.0, 0.0, 500);
        s.track(-30.0, 500);
        assert_eq!(s.velocity(), 30.0);
    }
}

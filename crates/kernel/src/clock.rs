use serde::{Deserialize, Serialize};

/// Per-frame time source.
///
/// The host feeds raw frame deltas in seconds. A negative or non-finite delta
/// (a rewound or paused host clock) is clamped to zero for that frame and
/// logged; it never halts the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    dt: f64,
    elapsed: f64,
    frame: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame and return the sanitized delta.
    pub fn advance(&mut self, raw_dt: f64) -> f64 {
        let dt = sanitize_dt(raw_dt);
        self.dt = dt;
        self.elapsed += dt;
        self.frame += 1;
        dt
    }

    /// Delta of the most recent frame.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Seconds accumulated since the clock was created.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

fn sanitize_dt(raw_dt: f64) -> f64 {
    if !raw_dt.is_finite() {
        tracing::warn!(raw_dt, "non-finite frame delta, treating as 0");
        0.0
    } else if raw_dt < 0.0 {
        tracing::warn!(raw_dt, "clock regression, clamping frame delta to 0");
        0.0
    } else {
        raw_dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates() {
        let mut c = Clock::new();
        assert_eq!(c.advance(0.5), 0.5);
        assert_eq!(c.advance(0.25), 0.25);
        assert_eq!(c.elapsed(), 0.75);
        assert_eq!(c.frame(), 2);
        assert_eq!(c.dt(), 0.25);
    }

    #[test]
    fn negative_dt_clamps_to_zero() {
        let mut c = Clock::new();
        c.advance(1.0);
        assert_eq!(c.advance(-0.3), 0.0);
        assert_eq!(c.elapsed(), 1.0);
        assert_eq!(c.frame(), 2);
    }

    #[test]
    fn non_finite_dt_clamps_to_zero() {
        let mut c = Clock::new();
        assert_eq!(c.advance(f64::NAN), 0.0);
        assert_eq!(c.advance(f64::INFINITY), 0.0);
        assert_eq!(c.elapsed(), 0.0);
    }
}

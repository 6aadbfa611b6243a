//! Time based easing of a single scalar
//!
//! The host drives the clock: every animation frame it calls `tick` with a
//! millisecond timestamp, and the easer reports whether it wants more frames.

pub const EASE_DURATION_MS: f64 = 1000.0;

/// Cubic ease-in-out over `[0, 1]`
pub fn ease_in_out_cubic(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    if x < 0.5 {
        4.0 * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Easer {
    beg_t: f64,
    end_t: f64,
    cur_t: f64,
    /// Timestamp of the first frame of the current animation
    beg_time: Option<f64>,
    active: bool,
}

impl Easer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current interpolated value
    pub fn cur_t(&self) -> f64 {
        self.cur_t
    }

    pub fn end_t(&self) -> f64 {
        self.end_t
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start a new animation from `beg_t` to `end_t`, superseding any running one
    ///
    /// The clock starts on the next `tick`.
    pub fn ease(&mut self, beg_t: f64, end_t: f64) {
        self.beg_t = beg_t;
        self.end_t = end_t;
        self.cur_t = beg_t;
        self.beg_time = None;
        self.active = true;
    }

    /// Advance to `now`, handing the interpolated value to `on_frame`
    ///
    /// Returns `true` while further frames are needed.
    pub fn tick<F>(&mut self, now: f64, mut on_frame: F) -> bool
    where
        F: FnMut(f64),
    {
        if !self.active {
            return false;
        }
        let beg_time = *self.beg_time.get_or_insert(now);
        let elapsed = ((now - beg_time) / EASE_DURATION_MS).clamp(0.0, 1.0);
        self.cur_t = self.beg_t + (self.end_t - self.beg_t) * ease_in_out_cubic(elapsed);
        on_frame(self.cur_t);
        if elapsed >= 1.0 {
            self.active = false;
        }
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_shape() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!(ease_in_out_cubic(0.25) < 0.25);
        assert!(ease_in_out_cubic(0.75) > 0.75);
        assert_eq!(ease_in_out_cubic(2.0), 1.0);
    }

    #[test]
    fn test_tick_runs_one_second() {
        let mut easer = Easer::new();
        let mut seen = Vec::new();
        assert!(!easer.tick(0.0, |t| seen.push(t)));
        assert!(seen.is_empty());

        easer.ease(0.0, 1.0);
        assert!(easer.tick(100.0, |t| seen.push(t)));
        assert_eq!(seen, vec![0.0]);
        assert!(easer.tick(600.0, |t| seen.push(t)));
        assert_eq!(easer.cur_t(), 0.5);
        assert!(!easer.tick(1100.0, |t| seen.push(t)));
        assert_eq!(easer.cur_t(), 1.0);
        assert!(!easer.is_active());
    }

    #[test]
    fn test_reease_starts_from_current() {
        let mut easer = Easer::new();
        easer.ease(0.0, 1.0);
        easer.tick(0.0, |_| {});
        easer.tick(500.0, |_| {});
        let mid = easer.cur_t();
        easer.ease(easer.cur_t(), 0.0);
        let mut first = None;
        easer.tick(10_000.0, |t| first = Some(t));
        assert_eq!(first, Some(mid));
        easer.tick(11_000.0, |_| {});
        assert_eq!(easer.cur_t(), 0.0);
    }
}

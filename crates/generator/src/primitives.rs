//! Numeric building blocks shared by both strategies

/// Move `value` toward `target` by at most `step`, never overshooting
///
/// Once the target is reached the value holds, so repeated application is
/// monotonic and restartable from any state.
pub fn move_toward(value: f64, target: f64, step: f64) -> f64 {
    if value < target {
        (value + step).min(target)
    } else if value > target {
        (value - step).max(target)
    } else {
        value
    }
}

/// Clamp `value` into `[min, max]`
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Inclusive hard limits of one quantity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn apply(&self, value: f64) -> f64 {
        clamp(value, self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Per-tick battery drain, higher while the vehicle moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drain {
    pub moving: f64,
    pub idle: f64,
}

impl Drain {
    pub fn for_speed(&self, speed_kmh: f64) -> f64 {
        if speed_kmh > 0.0 {
            self.moving
        } else {
            self.idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_toward_up_and_down() {
        assert_eq!(move_toward(0.0, 60.0, 5.0), 5.0);
        assert_eq!(move_toward(60.0, 0.0, 5.0), 55.0);
        assert_eq!(move_toward(42.0, 42.0, 5.0), 42.0);
    }

    #[test]
    fn test_move_toward_never_overshoots() {
        assert_eq!(move_toward(58.0, 60.0, 5.0), 60.0);
        assert_eq!(move_toward(2.0, 0.0, 5.0), 0.0);
    }

    #[test]
    fn test_move_toward_converges_and_holds() {
        let starts = [-50.0, -0.3, 0.0, 12.34, 99.99, 1000.0];
        let targets = [-10.0, 0.0, 24.0, 90.0];
        let steps = [0.1, 0.3, 5.0];

        for &start in &starts {
            for &target in &targets {
                for &step in &steps {
                    let mut value: f64 = start;
                    let mut previous_distance = (value - target).abs();
                    let mut reached_at = None;

                    for i in 0..20_000 {
                        value = move_toward(value, target, step);
                        let distance = (value - target).abs();
                        assert!(distance <= previous_distance, "moved away from target");
                        // Never crosses to the other side of the target
                        assert!((start - target) * (value - target) >= 0.0);
                        previous_distance = distance;
                        if value == target && reached_at.is_none() {
                            reached_at = Some(i);
                        }
                        if reached_at.is_some() {
                            assert_eq!(value, target, "left the target once reached");
                        }
                    }
                    assert!(
                        reached_at.is_some(),
                        "start={start} target={target} step={step} never converged"
                    );
                }
            }
        }
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(-1.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp(101.0, 0.0, 100.0), 100.0);
        assert_eq!(clamp(50.0, 0.0, 100.0), 50.0);
    }

    #[test]
    fn test_bounds() {
        let bounds = Bounds::new(18.0, 40.0);
        assert_eq!(bounds.apply(10.0), 18.0);
        assert_eq!(bounds.apply(45.0), 40.0);
        assert!(bounds.contains(18.0));
        assert!(!bounds.contains(40.1));
    }

    #[test]
    fn test_drain_for_speed() {
        let drain = Drain {
            moving: 0.05,
            idle: 0.01,
        };
        assert_eq!(drain.for_speed(0.0), 0.01);
        assert_eq!(drain.for_speed(5.0), 0.05);
    }
}

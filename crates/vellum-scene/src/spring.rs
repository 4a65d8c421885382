//! Critically damped spring used for every interpolated scalar.

/// Current value and velocity of one interpolated parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringState {
    pub value: f32,
    pub velocity: f32,
}

impl SpringState {
    /// Spring at rest on `target`.
    pub fn at_rest(target: f32) -> Self {
        Self { value: target, velocity: 0.0 }
    }

    /// Advance one step of `dt` milliseconds toward `target` and return the
    /// new value. `movement` is the settling time scale in milliseconds.
    ///
    /// The step never carries the value past the target.
    pub fn advance(&mut self, target: f32, dt: f32, movement: f32) -> f32 {
        let delta = target - self.value;
        self.velocity += dt * (delta - 2.0 * self.velocity * movement) / (movement * movement);
        let step = dt * self.velocity;
        self.value = if step > 0.0 {
            target.min(self.value + step)
        } else {
            target.max(self.value + step)
        };
        self.value
    }

    pub fn is_settled(&self, target: f32, epsilon: f32) -> bool {
        (self.value - target).abs() <= epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1000.0 / 30.0;
    const MOVEMENT: f32 = 100.0;

    #[test]
    fn at_rest_spring_stays_put() {
        let mut s = SpringState::at_rest(42.0);
        for _ in 0..10 {
            assert_eq!(s.advance(42.0, DT, MOVEMENT), 42.0);
        }
        assert_eq!(s.velocity, 0.0);
    }

    #[test]
    fn converges_monotonically_without_overshoot() {
        let mut s = SpringState::at_rest(0.0);
        let mut last = 0.0;
        for _ in 0..60 {
            let v = s.advance(100.0, DT, MOVEMENT);
            assert!(v >= last, "value went backwards: {v} < {last}");
            assert!(v <= 100.0);
            last = v;
        }
        assert!(s.is_settled(100.0, 0.01), "value {} did not settle", s.value);
    }

    #[test]
    fn converges_downward_too() {
        let mut s = SpringState::at_rest(50.0);
        let mut last = 50.0;
        for _ in 0..60 {
            let v = s.advance(-50.0, DT, MOVEMENT);
            assert!(v <= last);
            assert!(v >= -50.0);
            last = v;
        }
        assert!(s.is_settled(-50.0, 0.01));
    }

    #[test]
    fn first_step_is_partial() {
        let mut s = SpringState::at_rest(0.0);
        let v = s.advance(10.0, DT, MOVEMENT);
        assert!(v > 0.0 && v < 10.0);
    }
}

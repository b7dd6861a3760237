/// A range of ray parameters or channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Displayable range of a color channel.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Open test, so a hit exactly at the ray origin or at the range limit
    /// does not count.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Same start, end pulled in to `max`. Never widens the range.
    pub fn closer_than(&self, max: f32) -> Interval {
        Interval::new(self.min, self.max.min(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surrounds_excludes_endpoints() {
        let ray_t = Interval::new(0.0, 10.0);
        assert!(!ray_t.surrounds(0.0));
        assert!(!ray_t.surrounds(10.0));
        assert!(ray_t.surrounds(0.1));
        assert!(ray_t.surrounds(9.9));
    }

    #[test]
    fn test_unit_clamp() {
        assert_eq!(Interval::UNIT.clamp(-5.0), 0.0);
        assert_eq!(Interval::UNIT.clamp(0.5), 0.5);
        assert_eq!(Interval::UNIT.clamp(15.0), 1.0);
    }

    #[test]
    fn test_closer_than_only_narrows() {
        let ray_t = Interval::new(0.0, 10.0);
        assert_eq!(ray_t.closer_than(4.0), Interval::new(0.0, 4.0));
        assert_eq!(ray_t.closer_than(20.0), ray_t);
    }
}

/// Viewport size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height. `None` for a degenerate (minimized) viewport.
    #[inline]
    pub fn aspect(self) -> Option<f32> {
        self.is_valid().then(|| self.width / self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_valid_viewport() {
        assert_eq!(Viewport::new(1600.0, 900.0).aspect(), Some(1600.0 / 900.0));
    }

    #[test]
    fn zero_height_has_no_aspect() {
        assert_eq!(Viewport::new(800.0, 0.0).aspect(), None);
    }
}

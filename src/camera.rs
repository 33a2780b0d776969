use glam::Vec2;

/// Default shake length in seconds.
pub const SHAKE_DURATION: f32 = 0.5;

/// Screen shake: high-frequency sinusoidal displacement with linear decay.
#[derive(Clone, Debug, Default)]
pub struct ScreenShake {
    /// Remaining shake time in seconds.
    timer: f32,
    /// Total length of the current shake.
    duration: f32,
    /// Peak displacement in pixels.
    intensity: f32,
    /// Displacement for the current tick.
    offset: Vec2,
}

impl ScreenShake {
    /// Start (or restart) a shake of `intensity` pixels lasting `duration` seconds.
    pub fn start(&mut self, intensity: f32, duration: f32) {
        self.timer = duration.max(0.0);
        self.duration = duration.max(0.0);
        self.intensity = intensity;
        self.offset = Vec2::ZERO;
    }

    pub fn is_active(&self) -> bool {
        self.timer > 0.0
    }

    pub fn tick(&mut self, dt: f32) {
        if self.timer <= 0.0 {
            return;
        }
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.timer = 0.0;
            self.offset = Vec2::ZERO;
            return;
        }
        let decay = (self.timer / self.duration).clamp(0.0, 1.0);
        let t = self.timer;
        use std::f32::consts::TAU;
        self.offset = Vec2::new(
            (t * 47.0 * TAU).sin() * self.intensity * decay,
            (t * 37.0 * TAU + 1.1).sin() * self.intensity * decay,
        );
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }
}

/// Full-screen colour flash that fades out linearly.
#[derive(Clone, Debug, Default)]
pub struct ScreenFlash {
    timer: f32,
    duration: f32,
    color: [u8; 4],
}

impl ScreenFlash {
    /// Flash `color` at its own alpha, fading to nothing over `duration` seconds.
    pub fn start(&mut self, color: [u8; 4], duration: f32) {
        self.timer = duration.max(0.0);
        self.duration = duration.max(0.0);
        self.color = color;
    }

    pub fn is_active(&self) -> bool {
        self.timer > 0.0
    }

    pub fn tick(&mut self, dt: f32) {
        self.timer = (self.timer - dt).max(0.0);
    }

    /// Current overlay colour, or `None` once the flash has ended.
    pub fn color(&self) -> Option<[u8; 4]> {
        if self.timer <= 0.0 || self.duration <= 0.0 {
            return None;
        }
        let fade = (self.timer / self.duration).clamp(0.0, 1.0);
        let [r, g, b, a] = self.color;
        Some([r, g, b, (a as f32 * fade).round() as u8])
    }
}

/// 2D camera: a pixel-space scroll position plus screen juice.
#[derive(Clone, Debug, Default)]
pub struct Camera {
    /// Top-left of the view in world pixels.
    pub position: Vec2,
    pub shake: ScreenShake,
    pub flash: ScreenFlash,
}

impl Camera {
    pub fn new(x: f32, y: f32) -> Self {
        Self { position: Vec2::new(x, y), ..Self::default() }
    }

    /// Advance shake and flash by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.shake.tick(dt);
        self.flash.tick(dt);
    }

    /// Shake with the default duration.
    pub fn shake(&mut self, intensity: f32) {
        self.shake.start(intensity, SHAKE_DURATION);
    }

    /// Offset to subtract from world positions when drawing.
    pub fn offset(&self) -> Vec2 {
        self.position + self.shake.offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shake_stays_within_intensity() {
        let mut s = ScreenShake::default();
        s.start(6.0, 0.5);
        for _ in 0..20 {
            s.tick(1.0 / 60.0);
            assert!(s.offset().x.abs() <= 6.0 + 1e-4);
            assert!(s.offset().y.abs() <= 6.0 + 1e-4);
        }
    }

    #[test]
    fn shake_settles_to_zero() {
        let mut s = ScreenShake::default();
        s.start(6.0, 0.2);
        s.tick(0.1);
        assert!(s.is_active());
        s.tick(0.2);
        assert!(!s.is_active());
        assert_eq!(s.offset(), Vec2::ZERO);
    }

    #[test]
    fn zero_length_restart_clears_offset() {
        let mut s = ScreenShake::default();
        s.start(6.0, 0.5);
        s.tick(0.01);
        assert_ne!(s.offset(), Vec2::ZERO);

        s.start(6.0, 0.0);
        for _ in 0..10 {
            s.tick(0.1);
        }
        assert!(!s.is_active());
        assert_eq!(s.offset(), Vec2::ZERO);
    }

    #[test]
    fn camera_rests_after_cancelled_shake() {
        let mut cam = Camera::new(3.0, 4.0);
        cam.shake(5.0);
        cam.tick(0.05);
        cam.shake.start(5.0, -1.0);
        cam.tick(0.1);
        assert_eq!(cam.offset(), cam.position);
    }

    #[test]
    fn flash_fades_linearly() {
        let mut f = ScreenFlash::default();
        f.start([255, 255, 255, 200], 1.0);
        assert_eq!(f.color(), Some([255, 255, 255, 200]));
        f.tick(0.5);
        assert_eq!(f.color(), Some([255, 255, 255, 100]));
        f.tick(0.5);
        assert_eq!(f.color(), None);
    }

    #[test]
    fn camera_offset_includes_shake() {
        let mut cam = Camera::new(10.0, 20.0);
        assert_eq!(cam.offset(), Vec2::new(10.0, 20.0));
        cam.shake(4.0);
        cam.tick(0.1);
        let d = cam.offset() - cam.position;
        assert!(d.length() > 0.0);
    }
}

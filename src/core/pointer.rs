use super::constants::MAX_PIXEL_RATIO;

/// Window size in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            device_pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        (self.width / self.height.max(1.0)) as f32
    }

    /// Device pixel ratio capped to bound GPU load on dense displays.
    #[inline]
    pub fn pixel_ratio(&self) -> f64 {
        capped_pixel_ratio(self.device_pixel_ratio)
    }

    /// Backing-store size of a full-window surface at the capped ratio.
    pub fn physical_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        let w = (self.width * ratio).floor() as u32;
        let h = (self.height * ratio).floor() as u32;
        (w.max(1), h.max(1))
    }
}

#[inline]
pub fn capped_pixel_ratio(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

/// Normalized cursor position in [-1, 1] on both axes; +y points down the page.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerTarget {
    pub x: f32,
    pub y: f32,
}

impl PointerTarget {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }

    /// Map client pixel coordinates onto the viewport.
    pub fn from_client(client_x: f64, client_y: f64, viewport: &Viewport) -> Self {
        let w = viewport.width.max(1.0);
        let h = viewport.height.max(1.0);
        let nx = (client_x / w) * 2.0 - 1.0;
        let ny = (client_y / h) * 2.0 - 1.0;
        if nx.is_finite() && ny.is_finite() {
            Self::new(nx as f32, ny as f32)
        } else {
            Self::default()
        }
    }
}

/// One step of an exponential-decay filter.
#[inline]
pub fn ease_toward(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

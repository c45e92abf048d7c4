use eframe::egui;

/// Cap on the device pixel ratio used for the 3D view.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Size of the 3D view in logical points, plus the pixel ratio it is rendered at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: device_pixel_ratio.min(MAX_PIXEL_RATIO),
        }
    }

    /// Apply a new size. Zero or negative sizes are ignored. Returns true if anything changed.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) -> bool {
        if width <= 0.0 || height <= 0.0 {
            return false;
        }
        let next = Self::new(width, height, device_pixel_ratio);
        if next == *self {
            return false;
        }
        *self = next;
        true
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Size in physical pixels at the capped ratio.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round() as u32,
            (self.height * self.pixel_ratio).round() as u32,
        )
    }
}

/// Device pixel ratio of the window, without egui's zoom factor.
pub fn native_pixel_ratio(ctx: &egui::Context) -> f32 {
    device_pixel_ratio(ctx.native_pixels_per_point(), ctx.pixels_per_point(), ctx.zoom_factor())
}

/// Prefers the native ratio reported by the window; before the first frame reports one,
/// the zoom is divided back out of egui's points-per-pixel.
fn device_pixel_ratio(native: Option<f32>, pixels_per_point: f32, zoom_factor: f32) -> f32 {
    match native {
        Some(native) => native,
        None if zoom_factor > 0.0 => pixels_per_point / zoom_factor,
        None => pixels_per_point,
    }
}

use eframe::egui;
use egui::Color32;

/// Exponentially smoothed frame rate.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    smoothing: f64,
    average_delta: Option<f64>,
}

impl FpsCounter {
    pub fn new(smoothing: f64) -> Self {
        Self {
            smoothing: smoothing.clamp(0.0, 1.0),
            average_delta: None,
        }
    }

    pub fn record(&mut self, delta: f64) {
        if delta <= 0.0 {
            return;
        }
        self.average_delta = Some(match self.average_delta {
            Some(average) => average + (delta - average) * self.smoothing,
            None => delta,
        });
    }

    pub fn fps(&self) -> f64 {
        self.average_delta.map_or(0.0, |delta| 1.0 / delta)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(0.1)
    }
}

/// Read-only numbers shown under the panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatusLine {
    pub box_count: usize,
    pub fps: f64,
    pub pixel_ratio: f32,
}

impl StatusLine {
    pub fn show(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.colored_label(Color32::from_rgb(23, 162, 184), "ⓘ");
            ui.label(format!(
                "{} boxes · {:.0} fps · {:.1}x",
                self.box_count, self.fps, self.pixel_ratio
            ));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn steady_frames_give_steady_rate() {
        let mut counter = FpsCounter::default();
        assert_eq!(counter.fps(), 0.0);
        for _ in 0..100 {
            counter.record(1.0 / 60.0);
        }
        assert_relative_eq!(counter.fps(), 60.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_delta_is_ignored() {
        let mut counter = FpsCounter::default();
        counter.record(0.5);
        counter.record(0.0);
        assert_relative_eq!(counter.fps(), 2.0);
    }
}

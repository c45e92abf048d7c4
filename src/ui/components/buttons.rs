use eframe::egui;
use egui::{Color32, RichText, Vec2};

/// Colour family of a panel button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Action,
    Destructive,
}

impl Tone {
    fn fill(self) -> Color32 {
        match self {
            Tone::Action => Color32::from_rgb(70, 130, 180),
            Tone::Destructive => Color32::from_rgb(220, 53, 69),
        }
    }
}

/// Fixed-size filled button used in the debug panel.
pub struct PanelButton<'a> {
    label: &'a str,
    hint: Option<&'a str>,
    tone: Tone,
    size: Vec2,
}

impl<'a> PanelButton<'a> {
    pub const SIZE: Vec2 = Vec2::new(90.0, 24.0);

    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            hint: None,
            tone: Tone::Action,
            size: Self::SIZE,
        }
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn hint(mut self, hint: &'a str) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let button = egui::Button::new(RichText::new(self.label).color(Color32::WHITE))
            .fill(self.tone.fill())
            .min_size(self.size);

        let response = ui.add(button);
        match self.hint {
            Some(hint) => response.on_hover_text(hint),
            None => response,
        }
    }
}

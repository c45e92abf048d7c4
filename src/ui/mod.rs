pub mod components;
pub mod world_view;

use eframe::egui;

use crate::ui::components::{PanelButton, StatusLine, Tone};

pub use world_view::WorldView;

/// Requests from the debug panel, applied by the app after the panel is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    CreateBox,
    Reset,
}

/// Floating "Debug" window with the spawn and reset buttons.
pub fn show_debug_panel(ctx: &egui::Context, status: &StatusLine) -> Vec<PanelAction> {
    let mut actions = Vec::new();

    egui::Window::new("Debug")
        .resizable(false)
        .default_pos(egui::pos2(12.0, 12.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if PanelButton::new("createBox")
                    .hint("Drop a random box above the floor")
                    .show(ui)
                    .clicked()
                {
                    actions.push(PanelAction::CreateBox);
                }
                if PanelButton::new("reset")
                    .tone(Tone::Destructive)
                    .hint("Remove every box")
                    .show(ui)
                    .clicked()
                {
                    actions.push(PanelAction::Reset);
                }
            });
            ui.separator();
            status.show(ui);
        });

    actions
}

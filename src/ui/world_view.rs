use eframe::egui;
use eframe::egui_wgpu;
use egui::{Align2, Color32, FontId, Sense};
use tracing::info;

use crate::config::CameraSettings;
use crate::rendering::camera::OrbitControls;
use crate::rendering::engine::SceneCallback;
use crate::rendering::frame::FramePacket;
use crate::rendering::scene::Scene;
use crate::rendering::viewport::{native_pixel_ratio, Viewport};

/// Central panel hosting the 3D view and the orbit controls driven from it.
pub struct WorldView {
    pub controls: OrbitControls,
    pub viewport: Viewport,
    renderer_ready: bool,
}

impl WorldView {
    pub fn new(scene: &Scene, camera: &CameraSettings, viewport: Viewport, renderer_ready: bool) -> Self {
        Self {
            controls: OrbitControls::new(&scene.camera, camera),
            viewport,
            renderer_ready,
        }
    }

    /// Feed input to the controls, track resizes, update the camera, and queue the scene for drawing.
    pub fn show(&mut self, ctx: &egui::Context, scene: &mut Scene) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::drag());

                if response.dragged_by(egui::PointerButton::Primary) {
                    let delta = response.drag_delta();
                    self.controls.rotate(delta.x, delta.y, rect.height());
                }
                if response.hovered() {
                    let scroll = ui.input(|i| i.smooth_scroll_delta.y);
                    if scroll != 0.0 {
                        self.controls.dolly(scroll);
                    }
                }

                if self.viewport.resize(rect.width(), rect.height(), native_pixel_ratio(ctx)) {
                    scene.camera.set_aspect(self.viewport.aspect());
                    info!(
                        "Viewport resized to {:.0}x{:.0} at {:.1}x",
                        self.viewport.width, self.viewport.height, self.viewport.pixel_ratio
                    );
                }

                self.controls.update(&mut scene.camera);

                if self.renderer_ready {
                    let callback = SceneCallback::new(FramePacket::from_scene(scene));
                    ui.painter().add(egui_wgpu::Callback::new_paint_callback(rect, callback));
                } else {
                    ui.painter().text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        "wgpu renderer unavailable",
                        FontId::proportional(16.0),
                        Color32::GRAY,
                    );
                }
            });
    }
}

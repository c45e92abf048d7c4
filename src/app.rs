use std::rc::Rc;

use eframe::egui;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::assets::SandboxAssets;
use crate::audio::ImpactSound;
use crate::config::SandboxSettings;
use crate::rendering::engine::RenderEngine;
use crate::rendering::viewport::{native_pixel_ratio, Viewport};
use crate::ui::components::{FpsCounter, StatusLine};
use crate::ui::{show_debug_panel, PanelAction, WorldView};
use crate::world::events::CollisionListener;
use crate::world::sandbox::Sandbox;
use crate::world::spawn::SpawnArea;
use crate::world::time::FrameClock;

pub struct SandboxApp {
    sandbox: Sandbox,
    world_view: WorldView,
    clock: FrameClock,
    fps: FpsCounter,
    rng: StdRng,
    spawn_area: SpawnArea,
    running: bool,
}

impl SandboxApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: SandboxSettings) -> Self {
        let assets = SandboxAssets::load(&settings.assets);

        let impact_sound: Rc<dyn CollisionListener> =
            Rc::new(ImpactSound::from_settings(&settings.audio, assets.impact_sound.as_ref()));

        let size = cc.egui_ctx.screen_rect().size();
        let viewport = Viewport::new(size.x.max(1.0), size.y.max(1.0), native_pixel_ratio(&cc.egui_ctx));
        let mut sandbox = Sandbox::new(&settings, viewport.aspect(), impact_sound);
        let renderer_ready = match cc.wgpu_render_state.as_ref() {
            Some(render_state) => {
                RenderEngine::install(render_state, &assets.environment, sandbox.scene.sun.shadow.map_size);
                true
            }
            None => {
                warn!("No wgpu render state; the 3D view will stay empty");
                false
            }
        };

        let world_view = WorldView::new(&sandbox.scene, &settings.camera, viewport, renderer_ready);

        let mut rng = StdRng::from_os_rng();
        sandbox.spawn_random_box(&mut rng, &SpawnArea::initial(&settings.spawn));

        info!("Sandbox ready");

        Self {
            sandbox,
            world_view,
            clock: FrameClock::new(),
            fps: FpsCounter::default(),
            rng,
            spawn_area: SpawnArea::panel(&settings.spawn),
            running: true,
        }
    }

    fn apply(&mut self, action: PanelAction) {
        match action {
            PanelAction::CreateBox => {
                self.sandbox.spawn_random_box(&mut self.rng, &self.spawn_area);
            }
            PanelAction::Reset => {
                self.sandbox.reset();
            }
        }
    }
}

impl eframe::App for SandboxApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape) || i.viewport().close_requested()) {
            self.running = false;
        }

        let time = self.clock.tick();
        self.fps.record(time.delta);
        self.sandbox.tick(time.delta as f32);

        let status = StatusLine {
            box_count: self.sandbox.box_count(),
            fps: self.fps.fps(),
            pixel_ratio: self.world_view.viewport.pixel_ratio,
        };
        for action in show_debug_panel(ctx, &status) {
            self.apply(action);
        }

        self.world_view.show(ctx, &mut self.sandbox.scene);

        if self.running {
            ctx.request_repaint();
        } else {
            info!("Shutting down after {} frames", self.clock.frame_count());
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

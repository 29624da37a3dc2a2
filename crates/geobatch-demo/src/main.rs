mod gpu;

use std::f32::consts::TAU;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use geobatch_engine::batch::{
    BatchConfig, BatchSettings, GeometryBatch, SortMode, Sprite, SpriteEffects,
    TextStyle, TextureHandle, Vertex,
};
use geobatch_engine::coords::Vec2;
use geobatch_engine::logging::{init_logging, LoggingConfig};
use geobatch_engine::paint::Color;
use geobatch_engine::render::{RenderTarget, WgpuBackend};
use geobatch_engine::text::{bake_font, SpriteFont, DEFAULT_CHARSET};

use crate::gpu::{Gpu, GpuInit, SurfaceErrorAction};

const CHECKER_SIZE: u32 = 64;
const FONT_PX: f32 = 22.0;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut app = Demo::default();
    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;

    Ok(())
}

#[derive(Default)]
struct Demo {
    scene: Option<Scene>,
}

/// Everything that lives as long as the window.
struct Scene {
    window: Arc<Window>,
    gpu: Gpu,
    backend: WgpuBackend,
    batch: GeometryBatch,
    checker: TextureHandle,
    white: TextureHandle,
    font: Option<SpriteFont>,
    started: Instant,
    reported_failures: bool,
}

impl Scene {
    fn new(event_loop: &ActiveEventLoop) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("geobatch demo")
            .with_inner_size(LogicalSize::new(960.0, 600.0));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let gpu = pollster::block_on(Gpu::new(window.clone(), GpuInit::default()))
            .context("GPU initialization failed")?;

        let mut backend = WgpuBackend::new();
        let ctx = gpu.render_ctx();
        let checker =
            backend.upload_texture(&ctx, CHECKER_SIZE, CHECKER_SIZE, &checker_pixels(CHECKER_SIZE));
        let white = backend.white_texture(&ctx);

        let font = match load_font() {
            Some(bytes) => {
                let baked = bake_font(&bytes, FONT_PX, DEFAULT_CHARSET)
                    .context("failed to bake font")?;
                let atlas = backend.upload_texture(&ctx, baked.width, baked.height, &baked.rgba);
                Some(baked.into_sprite_font(atlas))
            }
            None => {
                log::warn!("no system font found; text is not drawn");
                None
            }
        };

        let batch = GeometryBatch::new(BatchConfig::default()).context("failed to create batch")?;

        Ok(Self {
            window,
            gpu,
            backend,
            batch,
            checker,
            white,
            font,
            started: Instant::now(),
            reported_failures: false,
        })
    }

    fn draw(&mut self) -> Result<()> {
        let t = self.started.elapsed().as_secs_f32();
        let viewport = self.gpu.viewport();
        if !viewport.is_valid() {
            return Ok(());
        }

        self.backend.begin_frame(viewport);

        let settings = BatchSettings::default().with_sort_mode(SortMode::BackToFront);
        self.batch.begin(settings)?;

        // ── sprites ──────────────────────────────────────────────────────
        let half = CHECKER_SIZE as f32 * 0.5;
        for i in 0..6 {
            let phase = i as f32 / 6.0 * TAU;
            let center = Vec2::new(220.0, 220.0)
                + Vec2::new((t + phase).cos(), (t + phase).sin()) * 140.0;
            let mut sprite = Sprite::at(self.checker, center)
                .rotation(t * (1.0 + i as f32 * 0.25), Vec2::splat(half))
                .scale(Vec2::splat(0.75 + 0.25 * (t * 2.0 + phase).sin()))
                .color(Color::from_straight(1.0, 0.6 + 0.4 * phase.cos(), 0.8, 1.0))
                .layer_depth(i as f32 / 6.0);
            if i % 2 == 1 {
                sprite = sprite.effects(SpriteEffects::FLIP_HORIZONTALLY);
            }
            self.batch.draw_sprite(&sprite)?;
        }

        // ── polygons ─────────────────────────────────────────────────────
        let star = star_outline(Vec2::new(640.0, 220.0), 120.0, 50.0, 7, t * 0.5);
        self.batch.draw_polygon(self.white, star, 0.5)?;

        let knot = pentagram(Vec2::new(640.0, 460.0), 70.0);
        self.batch.draw_polygon(self.white, knot, 0.5)?;

        // ── text ─────────────────────────────────────────────────────────
        if let Some(font) = &self.font {
            self.batch.draw_string(
                font,
                "geobatch\nsprites, polygons and glyphs in few draw calls",
                Vec2::new(24.0, 440.0),
                Color::WHITE,
            )?;
            let style = TextStyle {
                rotation: (t * 0.8).sin() * 0.3,
                origin: Vec2::new(40.0, 10.0),
                scale: Vec2::splat(1.5),
                color: Color::from_straight(0.4, 0.8, 1.0, 1.0),
                ..TextStyle::default()
            };
            self.batch
                .draw_string_ext(font, "wobble", Vec2::new(120.0, 540.0), &style)?;
        }

        let report = self.batch.end(&mut self.backend)?;
        if !report.failures.is_empty() && !self.reported_failures {
            for failure in &report.failures {
                log::warn!("polygon {} not drawn: {}", failure.slot, failure.error);
            }
            self.reported_failures = true;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => Err(anyhow::anyhow!("surface out of memory")),
                    _ => Ok(()),
                };
            }
        };

        {
            let ctx = self.gpu.render_ctx();
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view).with_clear(
                wgpu::Color {
                    r: 0.06,
                    g: 0.07,
                    b: 0.09,
                    a: 1.0,
                },
            );
            self.backend.encode(&ctx, &mut target);
        }

        self.gpu.submit(frame);
        Ok(())
    }
}

impl ApplicationHandler for Demo {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.scene.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);

        match Scene::new(event_loop) {
            Ok(scene) => {
                scene.window.request_redraw();
                self.scene = Some(scene);
            }
            Err(err) => {
                log::error!("{err:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(scene) = self.scene.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => {
                scene.batch.dispose();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => scene.gpu.resize(size),
            WindowEvent::RedrawRequested => {
                if let Err(err) = scene.draw() {
                    log::error!("frame failed: {err:#}");
                    event_loop.exit();
                    return;
                }
                scene.window.request_redraw();
            }
            _ => {}
        }
    }
}

/// Two-tone checkerboard, 8px cells, premultiplied RGBA.
fn checker_pixels(size: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let light = ((x / 8) + (y / 8)) % 2 == 0;
            let v = if light { 255 } else { 90 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    pixels
}

/// Simple (non-crossing) star; needs off-thread triangulation.
fn star_outline(center: Vec2, outer: f32, inner: f32, points: usize, spin: f32) -> Vec<Vertex> {
    (0..points * 2)
        .map(|i| {
            let angle = spin + i as f32 / (points * 2) as f32 * TAU;
            let radius = if i % 2 == 0 { outer } else { inner };
            let p = center + Vec2::new(angle.cos(), angle.sin()) * radius;
            let shade = 0.5 + 0.5 * (i as f32 / (points * 2) as f32);
            let color = Color::from_straight(shade, 0.4, 1.0 - shade, 1.0);
            Vertex::new(p, 0.0, color, Vec2::ZERO)
        })
        .collect()
}

/// Five-pointed star traced through its crossings; triangulation rejects it.
fn pentagram(center: Vec2, radius: f32) -> Vec<Vertex> {
    (0..5)
        .map(|i| {
            let angle = -TAU / 4.0 + (i * 2) as f32 / 5.0 * TAU;
            let p = center + Vec2::new(angle.cos(), angle.sin()) * radius;
            Vertex::new(p, 0.0, Color::from_straight(1.0, 0.2, 0.2, 1.0), Vec2::ZERO)
        })
        .collect()
}

fn load_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}

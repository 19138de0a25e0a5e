//! Core rendering engine.
//!
//! The [`Engine`] drives the frame loop: it turns input events into camera
//! motion, pushes every mesh triangle through the shader, the near-plane
//! clipper and the rasterizer, and hands the finished image to a
//! [`Surface`]. The surface is the only thing that talks to the window
//! system, so the engine itself runs headless in tests.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::camera::ArcballCamera;
use crate::clipper::clip_triangle;
use crate::color::{self, Color};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::math::{Mat4, Vec2, Vec3};
use crate::model::Model;
use crate::projection::Projection;
use crate::render::{
    Buffer, EdgeFunctionRasterizer, FrameBuffer, Shader, StandardShader, Uniforms, Viewport,
};

/// Input delivered by a [`Surface`], already decoupled from any window system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    ToggleDisplayMode,
    /// Wheel steps; positive moves the camera away from the target.
    Zoom(i32),
    /// Pointer motion in pixels. Only motion with `dragging` set orbits.
    PointerMoved { dx: f32, dy: f32, dragging: bool },
}

/// Which buffer is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Shaded color buffer.
    #[default]
    Color,
    /// Depth buffer as grayscale reciprocal depth.
    Depth,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Color => DisplayMode::Depth,
            DisplayMode::Depth => DisplayMode::Color,
        }
    }
}

/// Presentation and input collaborator.
pub trait Surface {
    /// Drain all pending input.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Display one frame of tightly packed RGBA bytes, row-major, top row first.
    fn present(&mut self, rgba: &[u8]) -> Result<()>;
}

/// Work done by one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Mesh triangles submitted to the pipeline.
    pub triangles: usize,
    /// Pixels written after the depth test.
    pub fragments: usize,
}

/// Accumulates frame statistics and logs them about once per second.
struct StatsReporter {
    window_start: Instant,
    frames: u32,
    totals: FrameStats,
}

impl StatsReporter {
    const INTERVAL: Duration = Duration::from_secs(1);

    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            totals: FrameStats::default(),
        }
    }

    fn record(&mut self, stats: FrameStats) {
        self.frames += 1;
        self.totals.triangles += stats.triangles;
        self.totals.fragments += stats.fragments;

        let elapsed = self.window_start.elapsed();
        if elapsed >= Self::INTERVAL {
            let frames = self.frames as f32;
            debug!(
                "{:.1} fps, {:.0} triangles/frame, {:.0} fragments/frame",
                frames / elapsed.as_secs_f32(),
                self.totals.triangles as f32 / frames,
                self.totals.fragments as f32 / frames,
            );
            *self = Self::new();
        }
    }
}

pub struct Engine {
    config: EngineConfig,
    model: Model,
    camera: ArcballCamera,
    projection: Projection,
    rasterizer: EdgeFunctionRasterizer,
    framebuffer: FrameBuffer,
    depth_view: Buffer<Color>,
    display_mode: DisplayMode,
    running: bool,
}

impl Engine {
    pub fn new(config: EngineConfig, model: Model) -> Self {
        let projection = Projection::from_degrees(
            config.fov_y_degrees,
            config.aspect_ratio(),
            config.z_near,
            config.z_far,
        );
        let camera = ArcballCamera::new(Vec3::new(0.0, 0.0, config.camera_distance), Vec3::ZERO);

        info!(
            "Viewport {}x{}, {} triangles, {}",
            config.width,
            config.height,
            model.mesh().triangle_count(),
            if model.texture().is_some() { "textured" } else { "untextured" },
        );

        Self {
            config,
            model,
            camera,
            projection,
            rasterizer: EdgeFunctionRasterizer::new(),
            framebuffer: FrameBuffer::new(config.width, config.height),
            depth_view: Buffer::new(config.width, config.height, Color::BLACK),
            display_mode: DisplayMode::default(),
            running: true,
        }
    }

    pub fn camera(&self) -> &ArcballCamera {
        &self.camera
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Apply one input event to the engine state.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Quit => self.running = false,
            InputEvent::ToggleDisplayMode => {
                self.display_mode = self.display_mode.toggled();
                info!("Display mode: {:?}", self.display_mode);
            }
            InputEvent::Zoom(direction) => self.camera.zoom(direction),
            InputEvent::PointerMoved { dx, dy, dragging } => {
                if dragging {
                    self.camera.orbit(Vec2::new(dx, dy));
                }
            }
        }
    }

    /// Model-view-projection matrix for the current camera.
    pub fn mvp(&self) -> Mat4 {
        let s = self.config.model_scale;
        self.projection.matrix() * self.camera.view_matrix() * Mat4::scaling(s, s, s)
    }

    /// Draw every mesh triangle into the frame buffer.
    ///
    /// The buffer is not cleared first; [`Engine::run`] clears it after each
    /// presented frame.
    pub fn render_frame(&mut self) -> FrameStats {
        let shader = StandardShader::new(
            Viewport::new(self.config.width, self.config.height),
            Uniforms {
                mvp: self.mvp(),
                texture: self.model.texture(),
            },
        );

        let mut stats = FrameStats::default();
        for triangle in self.model.mesh().triangles() {
            stats.triangles += 1;

            // Model space -> clip space
            let clip = triangle.map(|v| shader.vertex(v));

            for mut piece in clip_triangle(clip).triangles() {
                // Clip space -> screen space
                for v in &mut piece {
                    shader.post_process(v);
                }
                // The viewport's y flip negates the signed area, so
                // counter-clockwise front faces are submitted reversed.
                stats.fragments += self.rasterizer.draw_triangle(
                    [&piece[0], &piece[2], &piece[1]],
                    &shader,
                    &mut self.framebuffer,
                );
            }
        }
        stats
    }

    /// Hand the current frame to the surface in the active display mode.
    pub fn present<S: Surface>(&mut self, surface: &mut S) -> Result<()> {
        match self.display_mode {
            DisplayMode::Color => surface.present(self.framebuffer.color_bytes()),
            DisplayMode::Depth => {
                self.framebuffer.visualize_depth(&mut self.depth_view);
                surface.present(color::as_bytes(self.depth_view.as_slice()))
            }
        }
    }

    /// Run the frame loop until a quit event arrives or presentation fails.
    pub fn run<S: Surface>(&mut self, surface: &mut S) -> Result<()> {
        let mut reporter = StatsReporter::new();

        while self.running {
            for event in surface.poll_events() {
                self.handle_event(event);
            }
            if !self.running {
                break;
            }

            let stats = self.render_frame();
            self.present(surface)?;
            self.framebuffer.clear();
            reporter.record(stats);
        }

        info!("Shutting down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::mesh::{Mesh, Vertex};
    use crate::texture::Texture;
    use std::collections::VecDeque;

    /// Replays one batch of events per frame, then quits.
    #[derive(Default)]
    struct ScriptedSurface {
        script: VecDeque<Vec<InputEvent>>,
        frames: Vec<Vec<u8>>,
        fail_present: bool,
    }

    impl ScriptedSurface {
        fn new(script: Vec<Vec<InputEvent>>) -> Self {
            Self {
                script: script.into(),
                ..Self::default()
            }
        }
    }

    impl Surface for ScriptedSurface {
        fn poll_events(&mut self) -> Vec<InputEvent> {
            self.script.pop_front().unwrap_or_else(|| vec![InputEvent::Quit])
        }

        fn present(&mut self, rgba: &[u8]) -> Result<()> {
            if self.fail_present {
                return Err(RenderError::Window("surface lost".to_string()));
            }
            self.frames.push(rgba.to_vec());
            Ok(())
        }
    }

    fn vertex(x: f32, y: f32, z: f32) -> Vertex {
        Vertex::new(Vec3::new(x, y, z), Vec3::new(0.0, 0.0, 1.0), Vec2::new(0.5, 0.5))
    }

    /// One triangle facing +Z, covering the origin.
    fn facing_triangle() -> Mesh {
        Mesh::new(vec![
            vertex(-1.0, -1.0, 0.0),
            vertex(1.0, -1.0, 0.0),
            vertex(0.0, 1.0, 0.0),
        ])
        .unwrap()
    }

    fn pixel(frame: &[u8], config: &EngineConfig, x: usize, y: usize) -> [u8; 4] {
        let i = (y * config.width + x) * 4;
        [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]]
    }

    #[test]
    fn renders_white_when_untextured_and_clears_after_present() {
        let config = EngineConfig::default();
        let mut engine = Engine::new(config, Model::new(facing_triangle(), None));
        let mut surface = ScriptedSurface::new(vec![vec![]]);
        engine.run(&mut surface).unwrap();

        assert_eq!(surface.frames.len(), 1);
        let frame = &surface.frames[0];
        assert_eq!(frame.len(), config.width * config.height * 4);
        assert_eq!(pixel(frame, &config, 320, 240), [255, 255, 255, 255]);
        assert_eq!(pixel(frame, &config, 2, 2), [0, 0, 0, 0]);

        assert!(!engine.is_running());
        assert!(engine.framebuffer().color_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn back_of_triangle_is_culled() {
        let mut engine = Engine::new(EngineConfig::default(), Model::new(facing_triangle(), None));
        // Half a turn around the up axis puts the camera behind the triangle.
        engine.handle_event(InputEvent::PointerMoved {
            dx: std::f32::consts::PI * 100.0,
            dy: 0.0,
            dragging: true,
        });
        let stats = engine.render_frame();
        assert_eq!(stats.triangles, 1);
        assert_eq!(stats.fragments, 0);
    }

    #[test]
    fn toggle_presents_depth_visualization() {
        let config = EngineConfig::default();
        let red = Texture::new(1, 1, 3, vec![255, 0, 0]).unwrap();
        let mut engine = Engine::new(config, Model::new(facing_triangle(), Some(red)));
        let mut surface =
            ScriptedSurface::new(vec![vec![], vec![InputEvent::ToggleDisplayMode]]);
        engine.run(&mut surface).unwrap();

        assert_eq!(surface.frames.len(), 2);
        assert_eq!(pixel(&surface.frames[0], &config, 320, 240), [255, 0, 0, 255]);

        let [r, g, b, a] = pixel(&surface.frames[1], &config, 320, 240);
        assert!(r == g && g == b && a == 255 && r > 0);
        assert_eq!(pixel(&surface.frames[1], &config, 2, 2), [0, 0, 0, 255]);
        assert_eq!(engine.display_mode(), DisplayMode::Depth);
    }

    #[test]
    fn quit_before_first_frame_presents_nothing() {
        let mut engine = Engine::new(EngineConfig::default(), Model::new(facing_triangle(), None));
        let mut surface = ScriptedSurface::new(vec![vec![InputEvent::Quit]]);
        engine.run(&mut surface).unwrap();
        assert!(surface.frames.is_empty());
    }

    #[test]
    fn presentation_failure_stops_the_loop() {
        let mut engine = Engine::new(EngineConfig::default(), Model::new(facing_triangle(), None));
        let mut surface = ScriptedSurface {
            fail_present: true,
            ..ScriptedSurface::new(vec![vec![], vec![]])
        };
        let err = engine.run(&mut surface).unwrap_err();
        assert!(matches!(err, RenderError::Window(_)));
    }

    #[test]
    fn only_dragging_orbits_the_camera() {
        let mut engine = Engine::new(EngineConfig::default(), Model::default());
        let start = engine.camera().position();

        engine.handle_event(InputEvent::PointerMoved {
            dx: 30.0,
            dy: 10.0,
            dragging: false,
        });
        assert_eq!(engine.camera().position(), start);

        engine.handle_event(InputEvent::PointerMoved {
            dx: 30.0,
            dy: 10.0,
            dragging: true,
        });
        assert_ne!(engine.camera().position(), start);
    }

    #[test]
    fn zoom_events_move_the_camera() {
        let mut engine = Engine::new(EngineConfig::default(), Model::default());
        engine.handle_event(InputEvent::Zoom(1));
        approx::assert_relative_eq!(engine.camera().distance(), 3.3, epsilon = 1e-5);
        engine.handle_event(InputEvent::Zoom(-1));
        approx::assert_relative_eq!(engine.camera().distance(), 2.97, epsilon = 1e-5);
    }

    #[test]
    fn geometry_through_the_camera_is_clipped_not_smeared() {
        // A large floor quad running from in front of the camera to behind it.
        let floor = Mesh::new(vec![
            vertex(-4.0, -0.5, -4.0),
            vertex(-4.0, -0.5, 4.0),
            vertex(4.0, -0.5, 4.0),
            vertex(-4.0, -0.5, -4.0),
            vertex(4.0, -0.5, 4.0),
            vertex(4.0, -0.5, -4.0),
        ])
        .unwrap();
        let config = EngineConfig::default();
        let mut engine = Engine::new(config, Model::new(floor, None));
        let stats = engine.render_frame();

        assert_eq!(stats.triangles, 2);
        assert!(stats.fragments > 0);
        let fb = engine.framebuffer();
        // The floor lies below the eye: the bottom row is covered, the top row is not.
        assert_eq!(*fb.color.at(320, config.height - 1), Color::WHITE);
        assert_eq!(*fb.color.at(320, 0), Color::CLEAR);
        assert!(fb.depth.as_slice().iter().all(|z| !z.is_nan()));
    }
}

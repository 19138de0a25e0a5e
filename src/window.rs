//! SDL2 window: presentation and input for the [`Engine`](crate::engine::Engine).

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseState;
use sdl2::pixels::PixelFormatEnum;

use crate::engine::{InputEvent, Surface};
use crate::error::{RenderError, Result};

fn sdl_error(err: impl ToString) -> RenderError {
    RenderError::Window(err.to_string())
}

pub struct Window {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    // Declared before `texture_creator` so it is dropped first.
    texture: sdl2::render::Texture<'static>,
    _texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    event_pump: sdl2::EventPump,
    width: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let sdl_context = sdl2::init().map_err(sdl_error)?;
        let video_subsystem = sdl_context.video().map_err(sdl_error)?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(sdl_error)?;

        let canvas = window
            .into_canvas()
            .present_vsync()
            .build()
            .map_err(sdl_error)?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump().map_err(sdl_error)?;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // The texture field is declared first, so it is dropped before the creator.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::RGBA32, width, height)
            .map_err(sdl_error)?;

        Ok(Self {
            canvas,
            texture,
            _texture_creator: texture_creator,
            event_pump,
            width,
        })
    }
}

/// Orbiting is driven by the left or middle mouse button.
fn is_dragging(state: MouseState) -> bool {
    state.left() || state.middle()
}

impl Surface for Window {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.event_pump
            .poll_iter()
            .filter_map(|event| match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => Some(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(Keycode::F),
                    repeat: false,
                    ..
                } => Some(InputEvent::ToggleDisplayMode),
                Event::MouseMotion {
                    mousestate,
                    xrel,
                    yrel,
                    ..
                } => Some(InputEvent::PointerMoved {
                    dx: xrel as f32,
                    dy: yrel as f32,
                    dragging: is_dragging(mousestate),
                }),
                Event::MouseWheel { y, .. } if y != 0 => Some(InputEvent::Zoom(y)),
                _ => None,
            })
            .collect()
    }

    fn present(&mut self, rgba: &[u8]) -> Result<()> {
        self.texture
            .update(None, rgba, (self.width * 4) as usize)
            .map_err(sdl_error)?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, None)
            .map_err(sdl_error)?;
        self.canvas.present();
        Ok(())
    }
}

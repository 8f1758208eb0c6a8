use neso_core::core::console::Framebuffer;
use neso_core::playback::{DisplaySurface, Rect, letterbox};
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};
use tracing::warn;

use crate::overlay;

pub struct Video {
    canvas: Canvas<Window>,
    texture_creator: TextureCreator<WindowContext>,
    fps_text: Option<String>,
}

impl Video {
    /// Create a resizable SDL window and renderer sized `scale` times the
    /// native 256x240 frame.
    pub fn new(sdl_video: &sdl2::VideoSubsystem, title: &str, scale: u32) -> Result<Self, String> {
        let scale = scale.max(1);
        let window = sdl_video
            .window(title, Framebuffer::WIDTH * scale, Framebuffer::HEIGHT * scale)
            .position_centered()
            .resizable()
            .allow_highdpi()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();

        Ok(Self {
            canvas,
            texture_creator,
            fps_text: None,
        })
    }

    /// Text drawn in the top-left corner of every presented frame.
    pub fn set_fps_text(&mut self, text: Option<String>) {
        self.fps_text = text;
    }

    /// Current drawable size in pixels.
    pub fn output_size(&self) -> Option<(u32, u32)> {
        self.canvas.output_size().ok()
    }

    /// Window size in window coordinates, the space mouse events use.
    /// Differs from [`Video::output_size`] on HiDPI displays.
    pub fn window_size(&self) -> (f32, f32) {
        let (w, h) = self.canvas.window().size();
        (w as f32, h as f32)
    }

    /// Draw `frame` without stepping, e.g. to repaint an exposed window
    /// while paused.
    pub fn redraw(&mut self, frame: &Framebuffer, background: u32) {
        if let Some((w, h)) = self.acquire() {
            let dst = letterbox(w, h);
            if !dst.is_empty() {
                self.present(frame, Rect::frame(), dst, background);
            }
        }
    }

    fn draw(
        &mut self,
        frame: &Framebuffer,
        src: Rect,
        dst: Rect,
        background: u32,
    ) -> Result<(), String> {
        let mut texture = self
            .texture_creator
            .create_texture_streaming(
                PixelFormatEnum::ARGB8888,
                Framebuffer::WIDTH,
                Framebuffer::HEIGHT,
            )
            .map_err(|e| e.to_string())?;

        let fps_text = self.fps_text.as_deref();
        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            for y in 0..Framebuffer::HEIGHT {
                let row = &mut buffer[y as usize * pitch..];
                for (x, &pixel) in frame.row(y).iter().enumerate() {
                    row[x * 4..x * 4 + 4].copy_from_slice(&pixel.to_ne_bytes());
                }
            }
            if let Some(text) = fps_text {
                overlay::draw_text(buffer, pitch, text);
            }
        })?;

        let [_, r, g, b] = background.to_be_bytes();
        self.canvas.set_draw_color(Color::RGB(r, g, b));
        self.canvas.clear();
        self.canvas.copy(&texture, Some(to_sdl(src)), Some(to_sdl(dst)))?;
        self.canvas.present();
        Ok(())
    }
}

fn to_sdl(rect: Rect) -> sdl2::rect::Rect {
    sdl2::rect::Rect::new(rect.x, rect.y, rect.width, rect.height)
}

impl DisplaySurface for Video {
    fn acquire(&mut self) -> Option<(u32, u32)> {
        self.output_size().filter(|&(w, h)| w > 0 && h > 0)
    }

    fn present(&mut self, frame: &Framebuffer, src: Rect, dst: Rect, background: u32) {
        // A failed present drops this frame; the next tick draws a fresh one.
        if let Err(e) = self.draw(frame, src, dst, background) {
            warn!(error = %e, "present failed");
        }
    }
}

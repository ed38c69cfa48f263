//! SDL2 backend for Perfect Pineapple Player.
//!
//! Implements `SdiBackend`, `InputBackend` and `DisplayBackend` on one SDL2
//! window. Drawing happens on a fixed logical canvas that SDL scales to the
//! window, so the UI always sees 320x240. Text is rendered with SDL_ttf and
//! audio streams through SDL_mixer ([`SdlMixerAudio`]).

mod audio;
pub mod font;

use std::collections::HashMap;

use sdl2::EventPump;
use sdl2::controller::{Axis, Button as PadButton, GameController};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::{Point, Rect};
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{FullscreenType, Window, WindowContext};
use sdl2::{GameControllerSubsystem, Sdl};

use pineapple_types::backend::{Color, DisplayBackend, InputBackend, SdiBackend, TextureId};
use pineapple_types::error::{PineappleError, Result};
use pineapple_types::input::{Button, InputEvent, Trigger};

pub use audio::SdlMixerAudio;
use font::FontCache;

/// Window size before any fullscreen switch.
pub const WINDOW_W: u32 = 640;
pub const WINDOW_H: u32 = 480;

/// Left stick deflection, as a fraction of full range, that counts as a
/// d-pad press.
pub const STICK_THRESHOLD: f32 = 0.5;

fn backend_err(e: impl std::fmt::Display) -> PineappleError {
    PineappleError::Backend(e.to_string())
}

/// Stored clip rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClipRect {
    x: i32,
    y: i32,
    w: u32,
    h: u32,
}

/// SDL2 rendering, input and display backend.
///
/// # Safety
///
/// `textures` is declared before `texture_creator` so that Rust's drop order
/// (declaration order) destroys all textures before the creator they borrow from.
/// The `Texture<'static>` lifetime is erased via transmute in `load_texture()`;
/// this is sound because the `TextureCreator` always outlives the textures.
pub struct SdlBackend {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    textures: HashMap<u64, Texture<'static>>,
    texture_creator: TextureCreator<WindowContext>,
    next_texture_id: u64,
    fonts: FontCache,
    clip_stack: Vec<ClipRect>,
    controllers: GameControllerSubsystem,
    /// Open pads; dropping one closes it.
    pads: Vec<GameController>,
    stick: StickEdge,
    logical_w: u32,
    logical_h: u32,
    sdl: Sdl,
}

impl SdlBackend {
    /// Open a `WINDOW_W`x`WINDOW_H` window drawing on a `width`x`height`
    /// logical canvas.
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let sdl = sdl2::init().map_err(backend_err)?;
        let video = sdl.video().map_err(backend_err)?;
        let window = video
            .window(title, WINDOW_W, WINDOW_H)
            .position_centered()
            .resizable()
            .build()
            .map_err(backend_err)?;
        let mut canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(backend_err)?;
        canvas
            .set_logical_size(width, height)
            .map_err(backend_err)?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl.event_pump().map_err(backend_err)?;
        let controllers = sdl.game_controller().map_err(backend_err)?;

        let font_path = font::discover().ok_or_else(|| {
            PineappleError::Backend(format!(
                "no TrueType font found; set {} to a .ttf file",
                font::FONT_ENV
            ))
        })?;
        let fonts = FontCache::new(font_path)?;

        let mut backend = Self {
            canvas,
            event_pump,
            textures: HashMap::new(),
            texture_creator,
            next_texture_id: 1,
            fonts,
            clip_stack: Vec::new(),
            controllers,
            pads: Vec::new(),
            stick: StickEdge::default(),
            logical_w: width,
            logical_h: height,
            sdl,
        };
        let count = backend
            .controllers
            .num_joysticks()
            .map_err(backend_err)?;
        for index in 0..count {
            backend.open_pad(index);
        }

        log::info!("SDL2 backend initialized: {width}x{height} in {WINDOW_W}x{WINDOW_H}");
        Ok(backend)
    }

    /// The SDL context, for opening the audio device.
    pub fn sdl(&self) -> &Sdl {
        &self.sdl
    }

    fn open_pad(&mut self, index: u32) {
        if !self.controllers.is_game_controller(index) {
            return;
        }
        match self.controllers.open(index) {
            Ok(pad) => {
                log::info!("Opened controller: {}", pad.name());
                self.pads.push(pad);
            },
            Err(e) => log::warn!("Failed opening controller {index}: {e}"),
        }
    }

    /// Set the SDL draw color with optional blend mode.
    fn set_color(&mut self, color: Color) {
        if color.a < 255 {
            self.canvas.set_blend_mode(sdl2::render::BlendMode::Blend);
        } else {
            self.canvas.set_blend_mode(sdl2::render::BlendMode::None);
        }
        self.canvas.set_draw_color(sdl_color(color));
    }
}

fn sdl_color(color: Color) -> sdl2::pixels::Color {
    sdl2::pixels::Color::RGBA(color.r, color.g, color.b, color.a)
}

impl SdiBackend for SdlBackend {
    fn init(&mut self, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    fn clear(&mut self, color: Color) -> Result<()> {
        self.canvas.set_draw_color(sdl_color(color));
        self.canvas.clear();
        Ok(())
    }

    fn blit(&mut self, tex: TextureId, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        let texture = self
            .textures
            .get(&tex.0)
            .ok_or_else(|| PineappleError::Backend(format!("texture not found: {}", tex.0)))?;
        self.canvas
            .copy(texture, None, Rect::new(x, y, w, h))
            .map_err(backend_err)
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.set_color(color);
        self.canvas
            .fill_rect(Rect::new(x, y, w, h))
            .map_err(backend_err)
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font_size: u16,
        color: Color,
    ) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let surface = self.fonts.with_font(font_size, |font| {
            font.render(text).blended(sdl_color(color)).map_err(backend_err)
        })??;
        let texture = self
            .texture_creator
            .create_texture_from_surface(&surface)
            .map_err(backend_err)?;
        let query = texture.query();
        self.canvas
            .copy(&texture, None, Rect::new(x, y, query.width, query.height))
            .map_err(backend_err)
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.canvas.present();
        Ok(())
    }

    fn load_texture(&mut self, width: u32, height: u32, rgba_data: &[u8]) -> Result<TextureId> {
        let expected = (width * height * 4) as usize;
        if rgba_data.len() != expected {
            return Err(PineappleError::Backend(format!(
                "texture data size mismatch: expected {expected}, got {}",
                rgba_data.len()
            )));
        }

        let mut texture = self
            .texture_creator
            .create_texture_static(PixelFormatEnum::ABGR8888, width, height)
            .map_err(backend_err)?;
        texture
            .update(None, rgba_data, width as usize * 4)
            .map_err(backend_err)?;
        texture.set_blend_mode(sdl2::render::BlendMode::Blend);

        // SAFETY: The texture borrows from self.texture_creator which lives in the
        // same struct. `textures` is declared before `texture_creator`, so Rust drops
        // textures first. The erased lifetime is therefore always valid.
        let texture: Texture<'static> = unsafe { std::mem::transmute(texture) };

        let id = self.next_texture_id;
        self.next_texture_id += 1;
        self.textures.insert(id, texture);
        Ok(TextureId(id))
    }

    fn destroy_texture(&mut self, tex: TextureId) -> Result<()> {
        self.textures.remove(&tex.0);
        Ok(())
    }

    fn set_clip_rect(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        self.canvas.set_clip_rect(Rect::new(x, y, w, h));
        Ok(())
    }

    fn reset_clip_rect(&mut self) -> Result<()> {
        self.canvas.set_clip_rect(None);
        Ok(())
    }

    fn measure_text(&self, text: &str, font_size: u16) -> u32 {
        self.fonts.width(text, font_size)
    }

    fn shutdown(&mut self) -> Result<()> {
        self.textures.clear();
        self.pads.clear();
        log::info!("SDL2 backend shut down");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Extended: Shape Primitives
    // -------------------------------------------------------------------

    fn stroke_rect(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        stroke_width: u16,
        color: Color,
    ) -> Result<()> {
        self.set_color(color);
        if stroke_width == 1 {
            let _ = self.canvas.draw_rect(Rect::new(x, y, w, h));
        } else {
            let sw = stroke_width as u32;
            let _ = self.canvas.fill_rect(Rect::new(x, y, w, sw));
            let _ = self
                .canvas
                .fill_rect(Rect::new(x, y + h as i32 - sw as i32, w, sw));
            let _ = self
                .canvas
                .fill_rect(Rect::new(x, y + sw as i32, sw, h.saturating_sub(sw * 2)));
            let _ = self.canvas.fill_rect(Rect::new(
                x + w as i32 - sw as i32,
                y + sw as i32,
                sw,
                h.saturating_sub(sw * 2),
            ));
        }
        Ok(())
    }

    fn fill_triangle(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        x3: i32,
        y3: i32,
        color: Color,
    ) -> Result<()> {
        self.set_color(color);
        for (y, x_min, x_max) in triangle_spans([(x1, y1), (x2, y2), (x3, y3)]) {
            let _ = self
                .canvas
                .draw_line(Point::new(x_min, y), Point::new(x_max, y));
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Extended: Gradient Fills
    // -------------------------------------------------------------------

    fn fill_rect_gradient_v(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        top_color: Color,
        bottom_color: Color,
    ) -> Result<()> {
        let h_max = h.saturating_sub(1).max(1);
        for dy in 0..h {
            self.set_color(top_color.lerp(bottom_color, dy, h_max));
            let _ = self.canvas.fill_rect(Rect::new(x, y + dy as i32, w, 1));
        }
        Ok(())
    }

    fn fill_rect_gradient_h(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        left_color: Color,
        right_color: Color,
    ) -> Result<()> {
        let w_max = w.saturating_sub(1).max(1);
        for dx in 0..w {
            self.set_color(left_color.lerp(right_color, dx, w_max));
            let _ = self.canvas.fill_rect(Rect::new(x + dx as i32, y, 1, h));
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Extended: Text System
    // -------------------------------------------------------------------

    fn measure_text_height(&self, font_size: u16) -> u32 {
        self.fonts.line_height(font_size)
    }

    // -------------------------------------------------------------------
    // Extended: Clip Stack
    // -------------------------------------------------------------------

    fn push_clip_rect(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        let new_clip = ClipRect { x, y, w, h };
        let current = self.canvas.clip_rect().map(|r| ClipRect {
            x: r.x(),
            y: r.y(),
            w: r.width(),
            h: r.height(),
        });
        let full = ClipRect {
            x: 0,
            y: 0,
            w: self.logical_w,
            h: self.logical_h,
        };
        let current = current.unwrap_or(full);
        self.clip_stack.push(current);
        match intersect_clip(&current, &new_clip) {
            Some(c) => self.canvas.set_clip_rect(Rect::new(c.x, c.y, c.w, c.h)),
            None => self.canvas.set_clip_rect(Rect::new(0, 0, 0, 0)),
        }
        Ok(())
    }

    fn pop_clip_rect(&mut self) -> Result<()> {
        match self.clip_stack.pop() {
            Some(prev) if prev.x != 0 || prev.y != 0 || prev.w != self.logical_w || prev.h != self.logical_h => {
                self.canvas
                    .set_clip_rect(Rect::new(prev.x, prev.y, prev.w, prev.h));
            },
            _ => self.canvas.set_clip_rect(None),
        }
        Ok(())
    }
}

impl InputBackend for SdlBackend {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let raw: Vec<Event> = self.event_pump.poll_iter().collect();
        let mut events = Vec::new();
        for event in raw {
            match event {
                Event::ControllerDeviceAdded { which, .. } => self.open_pad(which),
                Event::ControllerDeviceRemoved { which, .. } => {
                    self.pads.retain(|pad| pad.instance_id() != which);
                    log::info!("Controller {which} removed");
                },
                Event::ControllerAxisMotion {
                    axis: Axis::LeftY,
                    value,
                    ..
                } => events.extend(self.stick.update(value)),
                other => events.extend(map_sdl_event(other)),
            }
        }
        events
    }
}

impl DisplayBackend for SdlBackend {
    fn is_fullscreen(&self) -> bool {
        self.canvas.window().fullscreen_state() != FullscreenType::Off
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()> {
        let mode = if fullscreen {
            FullscreenType::Desktop
        } else {
            FullscreenType::Off
        };
        self.canvas
            .window_mut()
            .set_fullscreen(mode)
            .map_err(backend_err)?;
        log::info!("Fullscreen {}", if fullscreen { "on" } else { "off" });
        Ok(())
    }
}

/// Map an SDL2 event to an input event. Stick motion and controller
/// hot-plugging need backend state and are handled by the caller.
fn map_sdl_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Quit { .. } => Some(InputEvent::Quit),
        Event::KeyDown {
            keycode: Some(key),
            repeat: false,
            ..
        } => map_key(key, true),
        Event::KeyUp {
            keycode: Some(key), ..
        } => map_key(key, false),
        Event::ControllerButtonDown { button, .. } => map_pad_button(button, true),
        Event::ControllerButtonUp { button, .. } => map_pad_button(button, false),
        Event::TextInput { text, .. } => text.chars().next().map(InputEvent::TextInput),
        _ => None,
    }
}

enum Mapped {
    Button(Button),
    Trigger(Trigger),
}

fn press_or_release(mapped: Mapped, pressed: bool) -> InputEvent {
    match (mapped, pressed) {
        (Mapped::Button(b), true) => InputEvent::ButtonPress(b),
        (Mapped::Button(b), false) => InputEvent::ButtonRelease(b),
        (Mapped::Trigger(t), true) => InputEvent::TriggerPress(t),
        (Mapped::Trigger(t), false) => InputEvent::TriggerRelease(t),
    }
}

fn map_key(key: Keycode, pressed: bool) -> Option<InputEvent> {
    let mapped = match key {
        Keycode::Up | Keycode::W => Mapped::Button(Button::Up),
        Keycode::Down | Keycode::S => Mapped::Button(Button::Down),
        Keycode::Left => Mapped::Button(Button::Left),
        Keycode::Right => Mapped::Button(Button::Right),
        Keycode::Return | Keycode::KpEnter | Keycode::Space => Mapped::Button(Button::Confirm),
        Keycode::Escape | Keycode::Backspace => Mapped::Button(Button::Cancel),
        Keycode::F11 => Mapped::Button(Button::Select),
        Keycode::F12 => Mapped::Button(Button::Start),
        Keycode::LeftBracket => Mapped::Trigger(Trigger::Left),
        Keycode::RightBracket => Mapped::Trigger(Trigger::Right),
        _ => return None,
    };
    Some(press_or_release(mapped, pressed))
}

fn map_pad_button(button: PadButton, pressed: bool) -> Option<InputEvent> {
    let mapped = match button {
        PadButton::A => Mapped::Button(Button::Confirm),
        PadButton::B => Mapped::Button(Button::Cancel),
        PadButton::DPadUp => Mapped::Button(Button::Up),
        PadButton::DPadDown => Mapped::Button(Button::Down),
        PadButton::DPadLeft => Mapped::Button(Button::Left),
        PadButton::DPadRight => Mapped::Button(Button::Right),
        PadButton::Back => Mapped::Button(Button::Select),
        PadButton::Start => Mapped::Button(Button::Start),
        PadButton::LeftShoulder => Mapped::Trigger(Trigger::Left),
        PadButton::RightShoulder => Mapped::Trigger(Trigger::Right),
        _ => return None,
    };
    Some(press_or_release(mapped, pressed))
}

/// Turns left stick Y motion into Up/Down presses. A direction fires once
/// when the stick crosses the threshold and is released when it returns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StickEdge {
    up: bool,
    down: bool,
}

impl StickEdge {
    pub fn update(&mut self, value: i16) -> Vec<InputEvent> {
        let limit = (STICK_THRESHOLD * i16::MAX as f32) as i32;
        let value = value as i32;
        let mut events = Vec::new();
        let up = value < -limit;
        let down = value > limit;
        for (held, now, button) in [
            (&mut self.up, up, Button::Up),
            (&mut self.down, down, Button::Down),
        ] {
            if now && !*held {
                events.push(InputEvent::ButtonPress(button));
            } else if !now && *held {
                events.push(InputEvent::ButtonRelease(button));
            }
            *held = now;
        }
        events
    }
}

/// Compute the intersection of two clip rectangles.
fn intersect_clip(a: &ClipRect, b: &ClipRect) -> Option<ClipRect> {
    let ax2 = a.x.saturating_add(a.w as i32);
    let ay2 = a.y.saturating_add(a.h as i32);
    let bx2 = b.x.saturating_add(b.w as i32);
    let by2 = b.y.saturating_add(b.h as i32);
    let x = a.x.max(b.x);
    let y = a.y.max(b.y);
    let x2 = ax2.min(bx2);
    let y2 = ay2.min(by2);
    if x2 > x && y2 > y {
        Some(ClipRect {
            x,
            y,
            w: (x2 - x) as u32,
            h: (y2 - y) as u32,
        })
    } else {
        None
    }
}

/// Horizontal spans `(y, x_min, x_max)` covering a filled triangle.
fn triangle_spans(mut verts: [(i32, i32); 3]) -> Vec<(i32, i32, i32)> {
    verts.sort_by_key(|v| v.1);
    let [(x0, y0), (x1, y1), (x2, y2)] = verts;
    let mut spans = Vec::new();
    for y in y0..=y2 {
        let mut x_min = edge_x(x0, y0, x2, y2, y);
        let mut x_max = x_min;
        if y <= y1 && y0 != y1 {
            let x = edge_x(x0, y0, x1, y1, y);
            x_min = x_min.min(x);
            x_max = x_max.max(x);
        }
        if y >= y1 && y1 != y2 {
            let x = edge_x(x1, y1, x2, y2, y);
            x_min = x_min.min(x);
            x_max = x_max.max(x);
        }
        if y == y1 {
            x_min = x_min.min(x1);
            x_max = x_max.max(x1);
        }
        spans.push((y, x_min, x_max));
    }
    spans
}

/// Compute the x coordinate along an edge at a given y.
fn edge_x(x0: i32, y0: i32, x1: i32, y1: i32, y: i32) -> i32 {
    if y1 == y0 {
        return x0;
    }
    x0 + (x1 - x0) * (y - y0) / (y1 - y0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_mapping() {
        assert_eq!(
            map_key(Keycode::Return, true),
            Some(InputEvent::ButtonPress(Button::Confirm))
        );
        assert_eq!(
            map_key(Keycode::Backspace, true),
            Some(InputEvent::ButtonPress(Button::Cancel))
        );
        assert_eq!(
            map_key(Keycode::W, false),
            Some(InputEvent::ButtonRelease(Button::Up))
        );
        assert_eq!(
            map_key(Keycode::RightBracket, true),
            Some(InputEvent::TriggerPress(Trigger::Right))
        );
        assert_eq!(
            map_key(Keycode::F11, true),
            Some(InputEvent::ButtonPress(Button::Select))
        );
        assert_eq!(map_key(Keycode::G, true), None);
    }

    #[test]
    fn controller_mapping() {
        assert_eq!(
            map_pad_button(PadButton::B, true),
            Some(InputEvent::ButtonPress(Button::Cancel))
        );
        assert_eq!(
            map_pad_button(PadButton::LeftShoulder, false),
            Some(InputEvent::TriggerRelease(Trigger::Left))
        );
        assert_eq!(
            map_pad_button(PadButton::Back, true),
            Some(InputEvent::ButtonPress(Button::Select))
        );
        assert_eq!(map_pad_button(PadButton::Guide, true), None);
    }

    #[test]
    fn text_input_first_char() {
        let event = Event::TextInput {
            timestamp: 0,
            window_id: 0,
            text: "3".to_string(),
        };
        assert_eq!(map_sdl_event(event), Some(InputEvent::TextInput('3')));
    }

    #[test]
    fn stick_fires_once_per_crossing() {
        let mut stick = StickEdge::default();
        assert_eq!(stick.update(-30000), vec![InputEvent::ButtonPress(Button::Up)]);
        assert!(stick.update(-31000).is_empty());
        assert_eq!(stick.update(0), vec![InputEvent::ButtonRelease(Button::Up)]);
        assert!(stick.update(10000).is_empty());
        assert_eq!(stick.update(20000), vec![InputEvent::ButtonPress(Button::Down)]);
    }

    #[test]
    fn stick_flip_releases_then_presses() {
        let mut stick = StickEdge::default();
        stick.update(i16::MIN);
        assert_eq!(
            stick.update(i16::MAX),
            vec![
                InputEvent::ButtonRelease(Button::Up),
                InputEvent::ButtonPress(Button::Down)
            ]
        );
    }

    #[test]
    fn clip_intersection() {
        let a = ClipRect { x: 0, y: 0, w: 320, h: 240 };
        let b = ClipRect { x: 10, y: 30, w: 300, h: 200 };
        assert_eq!(intersect_clip(&a, &b), Some(b));
        let c = ClipRect { x: 400, y: 0, w: 10, h: 10 };
        assert_eq!(intersect_clip(&a, &c), None);
    }

    #[test]
    fn triangle_spans_cover_arrow() {
        // Scroll-arrow shape: flat base at y=15, apex at y=5.
        let spans = triangle_spans([(305, 15), (315, 15), (310, 5)]);
        assert_eq!(spans.first(), Some(&(5, 310, 310)));
        assert_eq!(spans.last(), Some(&(15, 305, 315)));
        assert_eq!(spans.len(), 11);
    }
}

use sdl2::event::Event as SdlEvent;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::WindowCanvas;
use sdl2::EventPump;

use chipvm_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, RAM_SIZE};
use chipvm_core::{Display, DisplayBuffer, Event};

use crate::keymap::keymap;

const SCALE: usize = 10;

/// # SDL display
/// The windowed implementation of the VM's display collaborator.
///
/// Owns the core display buffer and re-renders it as a scaled RGB24
/// texture after every blit, and feeds window/keyboard events back to the
/// VM through `poll_events`/`get_key`.
pub struct SdlDisplay {
    canvas: WindowCanvas,
    events: EventPump,
    buffer: DisplayBuffer,
    last_key: u8,
}

impl SdlDisplay {
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let video = sdl.video()?;
        let window = video
            .window(
                "chipvm",
                (DISPLAY_WIDTH * SCALE) as u32,
                (DISPLAY_HEIGHT * SCALE) as u32,
            )
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let events = sdl.event_pump()?;

        Ok(SdlDisplay {
            canvas,
            events,
            buffer: DisplayBuffer::new(),
            last_key: 0,
        })
    }

    /// Expands the one-bit buffer into concatenated RGB pixel rows.
    fn buffer_to_texture(buffer: &DisplayBuffer) -> Vec<u8> {
        let mut texture = Vec::with_capacity(DISPLAY_WIDTH * DISPLAY_HEIGHT * 3);
        for row in buffer.rows() {
            for &pixel in row {
                let intensity = pixel * 255;
                texture.extend_from_slice(&[intensity, intensity, intensity]);
            }
        }
        texture
    }

    fn render(&mut self) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        texture
            .with_lock(None, |pixels: &mut [u8], _pitch: usize| {
                pixels.copy_from_slice(&Self::buffer_to_texture(&self.buffer));
            })
            .map_err(|e| e.to_string())?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

impl Display for SdlDisplay {
    fn clear_screen(&mut self) {
        self.buffer.clear();
        if let Err(e) = self.render() {
            eprintln!("render failed: {}", e);
        }
    }

    fn draw_sprite(
        &mut self,
        start: u16,
        height: u8,
        x: u8,
        y: u8,
        memory: &[u8; RAM_SIZE],
    ) -> bool {
        let collided = self.buffer.draw_sprite(start, height, x, y, memory);
        if let Err(e) = self.render() {
            eprintln!("render failed: {}", e);
        }
        collided
    }

    fn poll_events(&mut self) -> Event {
        for event in self.events.poll_iter() {
            match event {
                SdlEvent::Quit { .. } => return Event::Quit,
                SdlEvent::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(value) = keymap(key) {
                        self.last_key = value;
                        return Event::Keyboard;
                    }
                }
                _ => {}
            }
        }
        Event::None
    }

    fn get_key(&mut self) -> u8 {
        self.last_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chipvm_core::constants::RAM_SIZE;

    #[test]
    fn test_buffer_to_texture_triplicates_pixels() {
        let mut buffer = DisplayBuffer::new();
        let mut memory = [0; RAM_SIZE];
        memory[0x200] = 0b0100_0000;
        buffer.draw_sprite(0x200, 1, 0, 0, &memory);
        let texture = SdlDisplay::buffer_to_texture(&buffer);

        assert_eq!(texture.len(), DISPLAY_WIDTH * DISPLAY_HEIGHT * 3);
        assert_eq!(texture[0..6], [0, 0, 0, 255, 255, 255]);
    }
}

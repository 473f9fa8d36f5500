use anyhow::Result;
use minifb::{Key, KeyRepeat};

/// Desktop window showing the camera frame with the HUD drawn on top.
pub struct WindowOutput {
    window: minifb::Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl WindowOutput {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = minifb::Window::new(
            title,
            width,
            height,
            minifb::WindowOptions {
                resize: true,
                ..minifb::WindowOptions::default()
            },
        )
        .map_err(|e| anyhow::anyhow!("Failed to create window: {}", e))?;

        window.limit_update_rate(Some(std::time::Duration::from_micros(16600))); // ~60 FPS

        Ok(Self {
            window,
            buffer: vec![0; width * height],
            width,
            height,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Escape or Q.
    pub fn quit_requested(&self) -> bool {
        self.window.is_key_down(Key::Escape) || self.window.is_key_down(Key::Q)
    }

    /// Keys pressed since the last update, without auto-repeat.
    pub fn keys_pressed(&self) -> Vec<Key> {
        self.window.get_keys_pressed(KeyRepeat::No)
    }

    /// Present an RGB8 frame of the window's size.
    pub fn update(&mut self, rgb: &[u8]) -> Result<()> {
        if self.buffer.len() != self.width * self.height {
            self.buffer.resize(self.width * self.height, 0);
        }
        pack_rgb(rgb, &mut self.buffer);
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| anyhow::anyhow!("Window update failed: {}", e))
    }

    /// Process window events without drawing, e.g. while waiting for a frame.
    pub fn pump(&mut self) {
        self.window.update();
    }
}

/// RGB8 bytes to minifb's 0RGB words.
fn pack_rgb(rgb: &[u8], out: &mut [u32]) {
    for (dst, chunk) in out.iter_mut().zip(rgb.chunks_exact(3)) {
        let r = chunk[0] as u32;
        let g = chunk[1] as u32;
        let b = chunk[2] as u32;
        *dst = (r << 16) | (g << 8) | b;
    }
}

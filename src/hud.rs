//! HUD drawn over the camera frame: calculator display, hold progress,
//! history, hand skeleton and the gesture legend.

use crate::classifier::Gesture;
use crate::config::UiConfig;
use crate::font;
use crate::poses::ALL_GESTURES;
use crate::session::Snapshot;
use crate::types::{HandJoint, HandLandmarks};

pub type Color = (u8, u8, u8);

const WHITE: Color = (255, 255, 255);
const GREY: Color = (160, 160, 160);
const PANEL: Color = (24, 24, 24);
const ERROR_RED: Color = (255, 64, 64);
const GREEN: Color = (0, 255, 0);

const CLEAR_HINT: &str = "C HOLD FIST";

/// Bones drawn between landmark pairs.
const BONES: [(HandJoint, HandJoint); 20] = {
    use HandJoint::*;
    [
        (Wrist, ThumbCmc),
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        (Wrist, IndexMcp),
        (IndexMcp, IndexPip),
        (IndexPip, IndexDip),
        (IndexDip, IndexTip),
        (IndexMcp, MiddleMcp),
        (MiddleMcp, MiddlePip),
        (MiddlePip, MiddleDip),
        (MiddleDip, MiddleTip),
        (MiddleMcp, RingMcp),
        (RingMcp, RingPip),
        (RingPip, RingDip),
        (RingDip, RingTip),
        (RingMcp, PinkyMcp),
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

pub fn parse_hex(hex: &str) -> Color {
    if hex.len() == 7 && hex.starts_with('#') {
        let r = u8::from_str_radix(&hex[1..3], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[3..5], 16).unwrap_or(0);
        let b = u8::from_str_radix(&hex[5..7], 16).unwrap_or(0);
        (r, g, b)
    } else {
        (255, 0, 0) // Default Red
    }
}

/// Colors and sizes resolved once from the UI config.
#[derive(Debug, Clone)]
pub struct HudStyle {
    pub scale: usize,
    pub dot_size: usize,
    pub landmark_color: Color,
    pub accent: Color,
}

impl From<&UiConfig> for HudStyle {
    fn from(ui: &UiConfig) -> Self {
        Self {
            scale: ui.menu_scale.max(1),
            dot_size: ui.landmark_dot_size.max(1),
            landmark_color: parse_hex(&ui.landmark_color_hex),
            accent: parse_hex(&ui.accent_color_hex),
        }
    }
}

/// An RGB8 frame buffer to draw on.
pub struct Canvas<'a> {
    pub buffer: &'a mut [u8],
    pub width: usize,
    pub height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(buffer: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            buffer,
            width,
            height,
        }
    }

    fn put(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 3;
            if idx + 2 < self.buffer.len() {
                self.buffer[idx] = color.0;
                self.buffer[idx + 1] = color.1;
                self.buffer[idx + 2] = color.2;
            }
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Color) {
        for py in y..(y + h).min(self.height) {
            for px in x..(x + w).min(self.width) {
                self.put(px, py, color);
            }
        }
    }

    /// Darken a region so text stays readable over video.
    pub fn shade_rect(&mut self, x: usize, y: usize, w: usize, h: usize) {
        for py in y..(y + h).min(self.height) {
            for px in x..(x + w).min(self.width) {
                let idx = (py * self.width + px) * 3;
                if idx + 2 < self.buffer.len() {
                    for c in &mut self.buffer[idx..idx + 3] {
                        *c /= 3;
                    }
                }
            }
        }
    }

    pub fn text(&mut self, x: usize, y: usize, text: &str, color: Color, scale: usize) {
        font::draw_text_line(self.buffer, self.width, self.height, x, y, text, color, scale);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color) {
        let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil() as usize;
        for i in 0..=steps {
            let t = if steps == 0 { 0.0 } else { i as f32 / steps as f32 };
            let x = from.0 + (to.0 - from.0) * t;
            let y = from.1 + (to.1 - from.1) * t;
            if x >= 0.0 && y >= 0.0 {
                self.put(x as usize, y as usize, color);
            }
        }
    }
}

/// Skeleton and joint dots for one hand in normalized coordinates.
pub fn draw_landmarks(canvas: &mut Canvas, hand: &HandLandmarks, style: &HudStyle) {
    let w = canvas.width as f32;
    let h = canvas.height as f32;
    let to_px = |j: HandJoint| {
        let p = hand.joint(j);
        (p.x * w, p.y * h)
    };

    for (a, b) in BONES {
        canvas.line(to_px(a), to_px(b), GREY);
    }

    let half = style.dot_size / 2;
    for p in &hand.points {
        let (x, y) = (p.x * w, p.y * h);
        if x < 0.0 || y < 0.0 {
            continue;
        }
        let (x, y) = ((x as usize).saturating_sub(half), (y as usize).saturating_sub(half));
        canvas.fill_rect(x, y, style.dot_size, style.dot_size, style.landmark_color);
    }

    if let Some(confidence) = hand.confidence {
        let wrist = hand.joint(HandJoint::Wrist);
        let (x, y) = (wrist.x * w, wrist.y * h + style.dot_size as f32 + 2.0);
        if x >= 0.0 && y >= 0.0 {
            let label = format!("{:.0}%", confidence * 100.0);
            canvas.text(x as usize, y as usize, &label, style.landmark_color, style.scale);
        }
    }
}

/// Calculator panel: display, expression, hold bar, gesture feedback and history.
pub fn draw_snapshot(canvas: &mut Canvas, snapshot: &Snapshot, style: &HudStyle) {
    let s = style.scale;
    let line = 8 * s;
    let margin = 10;
    let panel_w = (canvas.width / 2).max(40 * s);

    let history_rows = snapshot.history.len();
    let panel_h = line * 3 + 6 * s * 3 + line * (history_rows + 2);
    canvas.shade_rect(margin, margin, panel_w, panel_h);

    let mut y = margin + s * 2;
    let display_color = if snapshot.error { ERROR_RED } else { WHITE };
    canvas.text(margin + 2 * s, y, &snapshot.display_text, display_color, s * 3);
    y += 6 * s * 3;

    if !snapshot.expression_text.is_empty() {
        canvas.text(margin + 2 * s, y, &snapshot.expression_text, GREY, s);
    }
    y += line;

    // Hold progress bar.
    let bar_w = panel_w.saturating_sub(4 * s);
    canvas.fill_rect(margin + 2 * s, y, bar_w, s * 2, PANEL);
    let filled = (bar_w as f32 * snapshot.hold_progress.clamp(0.0, 1.0)) as usize;
    canvas.fill_rect(margin + 2 * s, y, filled, s * 2, style.accent);
    y += line;

    let current = gesture_label(snapshot.current_gesture);
    let last = snapshot.last_confirmed.map(gesture_label).unwrap_or_else(|| "-".to_string());
    let tilt = snapshot
        .palm_angle_deg
        .map(|a| format!("  TILT: {a:+.0}"))
        .unwrap_or_default();
    canvas.text(
        margin + 2 * s,
        y,
        &format!("NOW: {current}  LAST: {last}{tilt}"),
        GREEN,
        s,
    );
    y += line * 2;

    for entry in &snapshot.history {
        canvas.text(margin + 2 * s, y, entry, GREY, s);
        y += line;
    }
}

/// Gesture legend and key toggles in the bottom-right corner.
pub fn draw_instructions(canvas: &mut Canvas, toggles: &[(&str, &str, bool)], style: &HudStyle) {
    let s = style.scale;
    let line = 8 * s;
    let legend: Vec<String> = ALL_GESTURES
        .iter()
        .map(|g| format!("{} {}", g.symbol().unwrap_or(' '), gesture_label(*g)))
        .collect();
    let toggle_lines: Vec<(String, bool)> = toggles
        .iter()
        .map(|(key, label, active)| {
            let status = if *active { "ON" } else { "OFF" };
            (format!("[{key}] {label} [{status}]"), *active)
        })
        .collect();

    let widest = legend
        .iter()
        .map(String::as_str)
        .chain(toggle_lines.iter().map(|(text, _)| text.as_str()))
        .chain(std::iter::once(CLEAR_HINT))
        .map(|text| font::measure_text_width(text, s))
        .max()
        .unwrap_or(0);
    let width = widest + 4 * s;
    let rows = legend.len() + 1 + toggle_lines.len() + 1;
    let height = rows * line + 2 * s;
    let x = canvas.width.saturating_sub(width + 10);
    let mut y = canvas.height.saturating_sub(height + 10);
    canvas.shade_rect(x, y, width, height);
    y += s;

    for text in &legend {
        canvas.text(x + 2 * s, y, text, WHITE, s);
        y += line;
    }
    canvas.text(x + 2 * s, y, CLEAR_HINT, style.accent, s);
    y += line * 2;

    for (text, active) in &toggle_lines {
        let color = if *active { GREEN } else { WHITE };
        canvas.text(x + 2 * s, y, text, color, s);
        y += line;
    }
}

fn gesture_label(gesture: Gesture) -> String {
    gesture.as_str().to_ascii_uppercase()
}

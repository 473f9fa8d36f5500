//! Tiny 3x5 bitmap font for the HUD.
//!
//! Covers uppercase letters, digits and the calculator symbols. Lowercase is
//! drawn as uppercase; anything else renders as a solid block.

/// Horizontal advance per character at scale 1 (3 px glyph + 1 px gap).
const ADVANCE: usize = 4;

pub fn draw_text_line(
    buffer: &mut [u8],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    text: &str,
    color: (u8, u8, u8),
    scale: usize,
) {
    let mut cx = x;
    for c in text.chars() {
        draw_char(buffer, width, height, cx, y, c, color, scale);
        cx += ADVANCE * scale;
    }
}

pub fn measure_text_width(text: &str, scale: usize) -> usize {
    text.chars().count() * ADVANCE * scale
}

/// Rows of a glyph, top to bottom, 3 bits each with bit 2 the left column.
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0x7, 0x5, 0x5, 0x5, 0x7],
        '1' => [0x2, 0x6, 0x2, 0x2, 0x7],
        '2' => [0x7, 0x1, 0x7, 0x4, 0x7],
        '3' => [0x7, 0x1, 0x7, 0x1, 0x7],
        '4' => [0x5, 0x5, 0x7, 0x1, 0x1],
        '5' => [0x7, 0x4, 0x7, 0x1, 0x7],
        '6' => [0x7, 0x4, 0x7, 0x5, 0x7],
        '7' => [0x7, 0x1, 0x2, 0x4, 0x4],
        '8' => [0x7, 0x5, 0x7, 0x5, 0x7],
        '9' => [0x7, 0x5, 0x7, 0x1, 0x7],
        'A' => [0x2, 0x5, 0x7, 0x5, 0x5],
        'B' => [0x6, 0x5, 0x6, 0x5, 0x6],
        'C' => [0x7, 0x4, 0x4, 0x4, 0x7],
        'D' => [0x6, 0x5, 0x5, 0x5, 0x6],
        'E' => [0x7, 0x4, 0x6, 0x4, 0x7],
        'F' => [0x7, 0x4, 0x6, 0x4, 0x4],
        'G' => [0x7, 0x4, 0x5, 0x5, 0x7],
        'H' => [0x5, 0x5, 0x7, 0x5, 0x5],
        'I' => [0x7, 0x2, 0x2, 0x2, 0x7],
        'J' => [0x1, 0x1, 0x1, 0x5, 0x7],
        'K' => [0x5, 0x5, 0x6, 0x5, 0x5],
        'L' => [0x4, 0x4, 0x4, 0x4, 0x7],
        'M' => [0x5, 0x7, 0x5, 0x5, 0x5],
        'N' => [0x6, 0x5, 0x5, 0x5, 0x5],
        'O' => [0x7, 0x5, 0x5, 0x5, 0x7],
        'P' => [0x7, 0x5, 0x7, 0x4, 0x4],
        'Q' => [0x7, 0x5, 0x5, 0x7, 0x1],
        'R' => [0x6, 0x5, 0x6, 0x5, 0x5],
        'S' => [0x3, 0x4, 0x2, 0x1, 0x6],
        'T' => [0x7, 0x2, 0x2, 0x2, 0x2],
        'U' => [0x5, 0x5, 0x5, 0x5, 0x7],
        'V' => [0x5, 0x5, 0x5, 0x5, 0x2],
        'W' => [0x5, 0x5, 0x5, 0x7, 0x5],
        'X' => [0x5, 0x5, 0x2, 0x5, 0x5],
        'Y' => [0x5, 0x5, 0x2, 0x2, 0x2],
        'Z' => [0x7, 0x1, 0x2, 0x4, 0x7],
        ' ' => [0x0, 0x0, 0x0, 0x0, 0x0],
        '+' => [0x0, 0x2, 0x7, 0x2, 0x0],
        '-' => [0x0, 0x0, 0x7, 0x0, 0x0],
        '*' => [0x0, 0x5, 0x2, 0x5, 0x0],
        '/' => [0x1, 0x1, 0x2, 0x4, 0x4],
        '=' => [0x0, 0x7, 0x0, 0x7, 0x0],
        '.' => [0x0, 0x0, 0x0, 0x0, 0x2],
        ',' => [0x0, 0x0, 0x0, 0x2, 0x4],
        ':' => [0x0, 0x2, 0x0, 0x2, 0x0],
        '>' => [0x4, 0x2, 0x1, 0x2, 0x4],
        '(' => [0x2, 0x4, 0x4, 0x4, 0x2],
        ')' => [0x2, 0x1, 0x1, 0x1, 0x2],
        '[' => [0x7, 0x4, 0x4, 0x4, 0x7],
        ']' => [0x7, 0x1, 0x1, 0x1, 0x7],
        '%' => [0x5, 0x1, 0x2, 0x4, 0x5],
        _ => [0x7, 0x7, 0x7, 0x7, 0x7],
    }
}

fn draw_char(
    buffer: &mut [u8],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    c: char,
    color: (u8, u8, u8),
    scale: usize,
) {
    for (row, bits) in glyph(c).iter().enumerate() {
        for col in 0..3 {
            if (bits >> (2 - col)) & 1 == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let px = x + col * scale + dx;
                    let py = y + row * scale + dy;
                    if px < width && py < height {
                        let idx = (py * width + px) * 3;
                        if idx + 2 < buffer.len() {
                            buffer[idx] = color.0;
                            buffer[idx + 1] = color.1;
                            buffer[idx + 2] = color.2;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(buffer: &[u8]) -> usize {
        buffer.chunks(3).filter(|p| p[0] != 0).count()
    }

    #[test]
    fn test_measure() {
        assert_eq!(measure_text_width("3+4", 2), 24);
        assert_eq!(measure_text_width("", 3), 0);
    }

    #[test]
    fn test_draws_scaled_glyph() {
        let (w, h) = (8, 8);
        let mut buffer = vec![0u8; w * h * 3];
        draw_text_line(&mut buffer, w, h, 0, 0, "-", (255, 0, 0), 1);
        assert_eq!(lit(&buffer), 3);

        let mut buffer = vec![0u8; w * h * 3];
        draw_text_line(&mut buffer, w, h, 0, 0, "-", (255, 0, 0), 2);
        assert_eq!(lit(&buffer), 12);
    }

    #[test]
    fn test_clips_at_edges() {
        let (w, h) = (4, 4);
        let mut buffer = vec![0u8; w * h * 3];
        draw_text_line(&mut buffer, w, h, 2, 2, "8", (255, 255, 255), 4);
        assert_eq!(lit(&buffer), 4);
    }

    #[test]
    fn test_calculator_symbols_have_glyphs() {
        let block = glyph('\u{1}');
        for c in "0123456789+-*/=.:".chars() {
            assert_ne!(glyph(c), block, "{c}");
        }
    }
}

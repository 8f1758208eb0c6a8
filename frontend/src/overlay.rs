/// Minimal 4x5 bitmap font for the FPS overlay. Each glyph is 4 pixels wide, 5 rows tall.
/// Bits are MSB-left within each u8 (only top 4 bits used).
const GLYPHS: &[(&[u8; 5], u8)] = &[
    (&[0x60, 0x90, 0x90, 0x90, 0x60], b'0'),
    (&[0x20, 0x60, 0x20, 0x20, 0x70], b'1'),
    (&[0x60, 0x90, 0x20, 0x40, 0xF0], b'2'),
    (&[0x60, 0x90, 0x20, 0x90, 0x60], b'3'),
    (&[0x90, 0x90, 0xF0, 0x10, 0x10], b'4'),
    (&[0xF0, 0x80, 0xE0, 0x10, 0xE0], b'5'),
    (&[0x60, 0x80, 0xE0, 0x90, 0x60], b'6'),
    (&[0xF0, 0x10, 0x20, 0x40, 0x40], b'7'),
    (&[0x60, 0x90, 0x60, 0x90, 0x60], b'8'),
    (&[0x60, 0x90, 0x70, 0x10, 0x60], b'9'),
    (&[0x00, 0x00, 0x00, 0x00, 0x40], b'.'),
];

const GLYPH_W: usize = 4;
const BLANK: [u8; 5] = [0; 5];
const INK: u32 = 0xFFFF_FFFF;

fn glyph_for(ch: u8) -> &'static [u8; 5] {
    GLYPHS
        .iter()
        .find(|&&(_, c)| c == ch)
        .map_or(&BLANK, |&(data, _)| data)
}

/// Draw `text` (e.g. "60.1") in white onto a locked ARGB8888 texture
/// with `pitch` bytes per row, 2px from the top-left corner.
pub fn draw_text(buffer: &mut [u8], pitch: usize, text: &str) {
    let x0: usize = 2;
    let y0: usize = 2;

    for (ci, ch) in text.bytes().enumerate() {
        let glyph = glyph_for(ch);
        let gx = x0 + ci * (GLYPH_W + 1);

        for (row, &bits) in glyph.iter().enumerate() {
            let py = y0 + row;
            for col in 0..GLYPH_W {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let px = gx + col;
                let offset = py * pitch + px * 4;
                if px * 4 + 4 <= pitch
                    && let Some(dst) = buffer.get_mut(offset..offset + 4)
                {
                    dst.copy_from_slice(&INK.to_ne_bytes());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(buffer: &[u8], pitch: usize, x: usize, y: usize) -> u32 {
        let o = y * pitch + x * 4;
        u32::from_ne_bytes(buffer[o..o + 4].try_into().unwrap())
    }

    #[test]
    fn draws_one_glyph() {
        let pitch = 32 * 4;
        let mut buffer = vec![0u8; pitch * 16];
        draw_text(&mut buffer, pitch, "1");
        // '1' top row is 0x20: only column 2 lit
        assert_eq!(pixel(&buffer, pitch, 2, 2), 0);
        assert_eq!(pixel(&buffer, pitch, 4, 2), INK);
        // bottom row 0x70: columns 1..=3
        assert_eq!(pixel(&buffer, pitch, 3, 6), INK);
        assert_eq!(pixel(&buffer, pitch, 2, 6), 0);
    }

    #[test]
    fn unknown_glyph_is_blank() {
        let pitch = 16 * 4;
        let mut buffer = vec![0u8; pitch * 8];
        draw_text(&mut buffer, pitch, "?");
        assert!(buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn clips_to_buffer() {
        let pitch = 8 * 4;
        let mut buffer = vec![0u8; pitch * 4];
        draw_text(&mut buffer, pitch, "8888");
    }
}

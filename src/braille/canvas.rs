use crate::map::Rgb;

/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell represents a 2x4 pixel grid (8 dots).
/// Unicode Braille patterns: U+2800 to U+28FF
///
/// Terminals color whole cells, so color is tracked per cell: `ink` is the
/// foreground of the dots (last pen wins), `paper` the cell background.
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    pixels: Vec<Vec<u8>>, // Bit patterns per char
    ink: Vec<Vec<Option<Rgb>>>,
    paper: Vec<Vec<Option<Rgb>>>,
    pen: Rgb,
}

impl BrailleCanvas {
    /// Create a new canvas with the given character dimensions.
    /// Effective pixel resolution: width*2 x height*4
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![vec![0u8; width]; height],
            ink: vec![vec![None; width]; height],
            paper: vec![vec![None; width]; height],
            pen: Rgb(255, 255, 255),
        }
    }

    /// Width in characters
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in characters
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_width(&self) -> usize {
        self.width * 2
    }

    pub fn pixel_height(&self) -> usize {
        self.height * 4
    }

    /// Color used by subsequent `set_pixel` calls
    pub fn set_pen(&mut self, color: Rgb) {
        self.pen = color;
    }

    /// Set a pixel at the given coordinates.
    /// Braille dot layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let cx = x / 2;
        let cy = y / 4;

        if cx >= self.width || cy >= self.height {
            return;
        }

        let bit = match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => 0,
        };

        self.pixels[cy][cx] |= bit;
        self.ink[cy][cx] = Some(self.pen);
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    /// Paint the background of every cell
    pub fn fill_paper(&mut self, color: Rgb) {
        for row in &mut self.paper {
            row.fill(Some(color));
        }
    }

    /// Paint the background of one cell (character coordinates)
    pub fn set_paper(&mut self, cx: usize, cy: usize, color: Rgb) {
        if cx < self.width && cy < self.height {
            self.paper[cy][cx] = Some(color);
        }
    }

    /// Composite `color` at `alpha` over a cell's current background
    pub fn blend_paper(&mut self, cx: usize, cy: usize, color: Rgb, alpha: f64, fallback: Rgb) {
        if cx < self.width && cy < self.height {
            let under = self.paper[cy][cx].unwrap_or(fallback);
            self.paper[cy][cx] = Some(color.over(under, alpha));
        }
    }

    pub fn paper(&self, cx: usize, cy: usize) -> Option<Rgb> {
        self.paper.get(cy)?.get(cx).copied().flatten()
    }

    pub fn ink(&self, cx: usize, cy: usize) -> Option<Rgb> {
        self.ink.get(cy)?.get(cx).copied().flatten()
    }

    /// Braille glyph for a cell (U+2800 when no dots are set)
    pub fn glyph(&self, cx: usize, cy: usize) -> char {
        self.pixels
            .get(cy)
            .and_then(|row| row.get(cx))
            .and_then(|&b| char::from_u32(0x2800 + b as u32))
            .unwrap_or(' ')
    }

    /// Convert the canvas to a string of Braille characters
    #[cfg(test)]
    pub fn to_string(&self) -> String {
        self.rows().collect::<Vec<_>>().join("\n")
    }

    /// Get a specific row as a string (for line-by-line rendering)
    pub fn row_to_string(&self, row: usize) -> String {
        if row >= self.height {
            return String::new();
        }
        (0..self.width).map(|cx| self.glyph(cx, row)).collect()
    }

    /// Get all rows as an iterator of strings
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).map(|i| self.row_to_string(i))
    }
}

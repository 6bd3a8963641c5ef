use crate::braille::BrailleCanvas;
use crate::coords::ScreenPoint;
use crate::map::color::Rgb;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw a thicker line (hovered outlines, heavy edges)
pub fn draw_thick_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    draw_line(canvas, x0, y0, x1, y1);
    draw_line(canvas, x0 + 1, y0, x1 + 1, y1);
    draw_line(canvas, x0, y0 + 1, x1, y1 + 1);
}

/// Stroke from `a` to `b`; widths of 1.5 px and up get the thick pen
pub fn stroke_segment(canvas: &mut BrailleCanvas, a: ScreenPoint, b: ScreenPoint, width: f64) {
    let (x0, y0) = to_pixel(a);
    let (x1, y1) = to_pixel(b);
    if width >= 1.5 {
        draw_thick_line(canvas, x0, y0, x1, y1);
    } else {
        draw_line(canvas, x0, y0, x1, y1);
    }
}

/// Draw a filled circle
pub fn draw_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Draw a ring of dots with distance in `(inner, outer]` from the center
pub fn draw_annulus(canvas: &mut BrailleCanvas, cx: i32, cy: i32, inner: i32, outer: i32) {
    for dy in -outer..=outer {
        for dx in -outer..=outer {
            let d2 = dx * dx + dy * dy;
            if d2 > inner * inner && d2 <= outer * outer {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Draw a filled diamond (square rotated 45 degrees) with half-diagonal `radius`
pub fn draw_diamond(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        let span = radius - dy.abs();
        for dx in -span..=span {
            canvas.set_pixel_signed(cx + dx, cy + dy);
        }
    }
}

/// Draw a filled axis-aligned square with half-side `radius`
pub fn draw_square(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            canvas.set_pixel_signed(cx + dx, cy + dy);
        }
    }
}

/// Stroke a polyline with a dash pattern.
///
/// `pattern` alternates on/off lengths in pixels (empty means solid).
/// `offset` shifts the pattern along the line: the dash state at distance `s`
/// from the first point is that of `s + offset` in the repeating pattern.
pub fn draw_dashed_polyline(
    canvas: &mut BrailleCanvas,
    points: &[ScreenPoint],
    pattern: &[f64],
    offset: f64,
    width: f64,
) {
    let period: f64 = pattern.iter().sum();
    if pattern.is_empty() || period <= 0.0 {
        for w in points.windows(2) {
            stroke_segment(canvas, w[0], w[1], width);
        }
        return;
    }

    let mut travelled = 0.0;
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let length = a.distance(b);
        if length <= f64::EPSILON {
            continue;
        }
        let steps = length.ceil() as usize;
        for i in 0..steps {
            let s0 = i as f64;
            let s1 = ((i + 1) as f64).min(length);
            if dash_is_on(pattern, period, travelled + s0 + offset) {
                stroke_segment(canvas, a.lerp(b, s0 / length), a.lerp(b, s1 / length), width);
            }
        }
        travelled += length;
    }
}

fn dash_is_on(pattern: &[f64], period: f64, distance: f64) -> bool {
    let mut phase = distance.rem_euclid(period);
    for (i, &len) in pattern.iter().enumerate() {
        if phase < len {
            return i % 2 == 0;
        }
        phase -= len;
    }
    false
}

/// Fill polygon rings (even-odd) at character-cell resolution by painting
/// cell backgrounds. A cell is inside when its center is.
pub fn fill_polygon_cells(canvas: &mut BrailleCanvas, rings: &[Vec<ScreenPoint>], color: Rgb) {
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in rings.iter().flatten() {
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    if !min_y.is_finite() || !max_y.is_finite() {
        return;
    }

    let first_row = ((min_y / 4.0).floor().max(0.0)) as usize;
    let last_row = ((max_y / 4.0).ceil().max(0.0) as usize).min(canvas.height());
    let mut crossings: Vec<f64> = Vec::new();

    for row in first_row..last_row {
        let y = row as f64 * 4.0 + 2.0;
        crossings.clear();
        for ring in rings {
            for w in ring.windows(2) {
                let (a, b) = (w[0], w[1]);
                if (a.y <= y) != (b.y <= y) {
                    crossings.push(a.x + (y - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
        }
        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            // Cell centers sit at x = col * 2 + 1
            let start = ((span[0] - 1.0) / 2.0).ceil().max(0.0) as usize;
            let end = (((span[1] - 1.0) / 2.0).floor() + 1.0).max(0.0) as usize;
            for col in start..end.min(canvas.width()) {
                canvas.set_paper(col, row, color);
            }
        }
    }
}

#[inline(always)]
fn to_pixel(p: ScreenPoint) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

//! Software rasterization of a [`Scene`] into an RGBA framebuffer.
//!
//! Shapes live in data coordinates; a [`DataMap`] converts them to pixels
//! with a single uniform scale for both axes, so circles stay circular
//! regardless of the viewport shape. Edges are anti-aliased by coverage.

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::scene::{Anchor, AxisLimits, Clip, Scene, Shape};

pub struct Canvas<'a> {
    pub frame: &'a mut [u8],
    pub width: usize,
    pub height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }
}

/// Pixel region of the framebuffer one scene is rendered into.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Text sizes and color for axis furniture (ticks, caption).
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub tick_size: f32,
    pub caption_size: f32,
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            tick_size: 14.0,
            caption_size: 16.0,
            color: Color::BLACK,
        }
    }
}

/// Uniform-scale mapping from data coordinates to pixels; the data y-axis
/// points up, the pixel y-axis down.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DataMap {
    scale: f64,
    ox: f64,
    oy: f64,
}

impl DataMap {
    pub(crate) fn new(limits: AxisLimits, viewport: Viewport) -> Self {
        let span_x = limits.x_max - limits.x_min;
        let span_y = limits.y_max - limits.y_min;
        let scale = (viewport.width as f64 / span_x).min(viewport.height as f64 / span_y);
        let ox = viewport.x as f64 + (viewport.width as f64 - span_x * scale) / 2.0
            - limits.x_min * scale;
        let oy = viewport.y as f64 + (viewport.height as f64 - span_y * scale) / 2.0
            + limits.y_max * scale;
        Self { scale, ox, oy }
    }

    pub(crate) fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (self.ox + x * self.scale, self.oy - y * self.scale)
    }

    pub(crate) fn scale(&self) -> f64 {
        self.scale
    }
}

/// Render one scene into a viewport. Text shapes are skipped when no font
/// is available.
pub fn rasterize_scene(
    canvas: &mut Canvas,
    scene: &Scene,
    viewport: Viewport,
    font: Option<&Font<'_>>,
    style: &TextStyle,
) {
    let Some(limits) = scene.limits() else {
        return;
    };
    let map = DataMap::new(limits, viewport);

    for (_, shape) in scene.shapes() {
        match shape {
            Shape::Circle {
                cx,
                cy,
                radius,
                color,
            } => {
                let (px, py) = map.map(*cx, *cy);
                fill_circle(canvas, px, py, radius * map.scale(), *color);
            }
            Shape::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                fill_rect_data(canvas, &map, *x, *y, *width, *height, *color);
            }
            Shape::ClippedRect {
                x,
                y,
                width,
                height,
                clip,
                color,
            } => match clip {
                Clip::Circle {
                    cx,
                    cy,
                    radius,
                } => {
                    let (x0, y0, x1, y1) = data_rect_to_px(&map, *x, *y, *width, *height);
                    let (pcx, pcy) = map.map(*cx, *cy);
                    fill_rect_in_circle(
                        canvas,
                        x0,
                        y0,
                        x1,
                        y1,
                        pcx,
                        pcy,
                        radius * map.scale(),
                        *color,
                    );
                }
                Clip::Rect {
                    x: cx,
                    y: cy,
                    width: cw,
                    height: ch,
                } => {
                    let (ax0, ay0, ax1, ay1) = data_rect_to_px(&map, *x, *y, *width, *height);
                    let (bx0, by0, bx1, by1) = data_rect_to_px(&map, *cx, *cy, *cw, *ch);
                    let (x0, y0) = (ax0.max(bx0), ay0.max(by0));
                    let (x1, y1) = (ax1.min(bx1), ay1.min(by1));
                    if x0 < x1 && y0 < y1 {
                        fill_rect(canvas, x0, y0, x1, y1, *color);
                    }
                }
            },
            Shape::Text {
                x,
                y,
                text,
                size,
                color,
                anchor,
            } => {
                if let Some(font) = font {
                    let (px, py) = map.map(*x, *y);
                    draw_text(
                        canvas,
                        px as i32,
                        py as i32,
                        text,
                        font,
                        Scale::uniform(*size),
                        *color,
                        *anchor,
                    );
                }
            }
        }
    }

    // Axis furniture: tick marks and labels at the left edge, caption at
    // the bottom of the viewport.
    for tick in scene.ticks() {
        let (px, py) = map.map(limits.x_min, tick.value);
        fill_rect(canvas, px, py - 1.0, px + 5.0, py + 1.0, style.color);
        if let Some(font) = font {
            draw_text(
                canvas,
                px as i32 - 3,
                py as i32,
                &tick.label,
                font,
                Scale::uniform(style.tick_size),
                style.color,
                Anchor::RightCenter,
            );
        }
    }
    if let (Some(caption), Some(font)) = (scene.caption(), font) {
        let cx = viewport.x + viewport.width / 2;
        let cy = viewport.y + viewport.height - style.caption_size as usize;
        draw_text(
            canvas,
            cx as i32,
            cy as i32,
            caption,
            font,
            Scale::uniform(style.caption_size),
            style.color,
            Anchor::Center,
        );
    }
}

fn set_pixel(frame: &mut [u8], width: usize, x: usize, y: usize, color: Color, alpha: f32) {
    if x < width && y < frame.len() / (width * 4) {
        let idx = (y * width + x) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r as f32, color.g as f32, color.b as f32];
        let dst = [frame[idx] as f32, frame[idx + 1] as f32, frame[idx + 2] as f32];
        let out = [
            (src[0] * a + dst[0] * (1.0 - a)).round() as u8,
            (src[1] * a + dst[1] * (1.0 - a)).round() as u8,
            (src[2] * a + dst[2] * (1.0 - a)).round() as u8,
        ];
        frame[idx..idx + 3].copy_from_slice(&out);
        frame[idx + 3] = 0xff;
    }
}

/// Convert a data-space rectangle (possibly with negative height) to a
/// normalized pixel-space box `(x0, y0, x1, y1)`.
fn data_rect_to_px(
    map: &DataMap,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> (f64, f64, f64, f64) {
    let (px0, py0) = map.map(x, y);
    let (px1, py1) = map.map(x + width, y + height);
    (px0.min(px1), py0.min(py1), px0.max(px1), py0.max(py1))
}

fn fill_rect_data(
    canvas: &mut Canvas,
    map: &DataMap,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    color: Color,
) {
    let (x0, y0, x1, y1) = data_rect_to_px(map, x, y, width, height);
    fill_rect(canvas, x0, y0, x1, y1, color);
}

/// Coverage of the unit pixel `[p, p+1]` by the interval `[a, b]`.
fn span_coverage(p: f64, a: f64, b: f64) -> f64 {
    (b.min(p + 1.0) - a.max(p)).clamp(0.0, 1.0)
}

fn fill_rect(canvas: &mut Canvas, x0: f64, y0: f64, x1: f64, y1: f64, color: Color) {
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let px0 = (x0.floor().max(0.0)) as usize;
    let py0 = (y0.floor().max(0.0)) as usize;
    let px1 = (x1.ceil().min(canvas.width as f64)) as usize;
    let py1 = (y1.ceil().min(canvas.height as f64)) as usize;
    for py in py0..py1 {
        let cov_y = span_coverage(py as f64, y0, y1);
        for px in px0..px1 {
            let cov_x = span_coverage(px as f64, x0, x1);
            let alpha = (cov_x * cov_y) as f32;
            if alpha > 0.004 {
                set_pixel(canvas.frame, canvas.width, px, py, color, alpha);
            }
        }
    }
}

/// Smooth edge coverage for a circle at pixel center distance `dist`.
fn circle_coverage(dist: f64, radius: f64) -> f64 {
    (radius - dist + 0.5).clamp(0.0, 1.0)
}

fn fill_circle(canvas: &mut Canvas, cx: f64, cy: f64, radius: f64, color: Color) {
    if radius <= 0.0 {
        return;
    }
    let px0 = ((cx - radius - 1.0).floor().max(0.0)) as usize;
    let py0 = ((cy - radius - 1.0).floor().max(0.0)) as usize;
    let px1 = ((cx + radius + 1.0).ceil().min(canvas.width as f64)) as usize;
    let py1 = ((cy + radius + 1.0).ceil().min(canvas.height as f64)) as usize;
    for py in py0..py1 {
        for px in px0..px1 {
            let dx = px as f64 + 0.5 - cx;
            let dy = py as f64 + 0.5 - cy;
            let alpha = circle_coverage((dx * dx + dy * dy).sqrt(), radius) as f32;
            if alpha > 0.004 {
                set_pixel(canvas.frame, canvas.width, px, py, color, alpha);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn fill_rect_in_circle(
    canvas: &mut Canvas,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    cx: f64,
    cy: f64,
    radius: f64,
    color: Color,
) {
    if x1 <= x0 || y1 <= y0 || radius <= 0.0 {
        return;
    }
    let px0 = (x0.max(cx - radius - 1.0).floor().max(0.0)) as usize;
    let py0 = (y0.max(cy - radius - 1.0).floor().max(0.0)) as usize;
    let px1 = (x1.min(cx + radius + 1.0).ceil().min(canvas.width as f64)) as usize;
    let py1 = (y1.min(cy + radius + 1.0).ceil().min(canvas.height as f64)) as usize;
    for py in py0..py1 {
        let cov_y = span_coverage(py as f64, y0, y1);
        for px in px0..px1 {
            let cov_x = span_coverage(px as f64, x0, x1);
            let dx = px as f64 + 0.5 - cx;
            let dy = py as f64 + 0.5 - cy;
            let cov_c = circle_coverage((dx * dx + dy * dy).sqrt(), radius);
            let alpha = (cov_x * cov_y * cov_c) as f32;
            if alpha > 0.004 {
                set_pixel(canvas.frame, canvas.width, px, py, color, alpha);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_text(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    text: &str,
    font: &Font,
    scale: Scale,
    color: Color,
    anchor: Anchor,
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    let width_px = if min_x < max_x { max_x - min_x } else { 0 };
    let height_px = if min_y < max_y { max_y - min_y } else { 0 };
    let offset_x = match anchor {
        Anchor::Center => x - width_px / 2,
        Anchor::LeftCenter => x,
        Anchor::RightCenter => x - width_px,
    };
    let offset_y = y - height_px / 2;
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                if px >= 0 && px < canvas.width as i32 && py >= 0 && py < canvas.height as i32 {
                    set_pixel(
                        canvas.frame,
                        canvas.width,
                        px as usize,
                        py as usize,
                        color,
                        v,
                    );
                }
            });
        }
    }
}

/// Draw a standalone string onto the canvas in pixel coordinates. Used by
/// the panel window for the shared title.
pub fn draw_label(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    text: &str,
    font: &Font,
    size: f32,
    color: Color,
) {
    draw_text(canvas, x, y, text, font, Scale::uniform(size), color, Anchor::Center);
}

//! Procedural test pattern rendering.
//!
//! Shapes are drawn on a canvas four times the target size, then box-filtered
//! down, which gives smooth anti-aliased edges without an external rasterizer.

use std::f32::consts::TAU;

use super::FrameSource;
use crate::error::Result;
use crate::frame::{Frame, Rgb};
use crate::schema::{PatternKind, TestPattern};

/// Supersampling factor per axis.
const AA_SCALE: u32 = 4;

const BLACK: Rgb = [0, 0, 0];
const WHITE: Rgb = [255, 255, 255];
const RED: Rgb = [255, 0, 0];
const GREEN: Rgb = [0, 128, 0];
const BLUE: Rgb = [0, 0, 255];
const CYAN: Rgb = [0, 255, 255];

/// Frame source rendering a [`TestPattern`].
#[derive(Debug, Clone)]
pub struct PatternSource {
    pattern: TestPattern,
}

impl PatternSource {
    pub fn new(pattern: TestPattern) -> Self {
        Self { pattern }
    }
}

impl FrameSource for PatternSource {
    fn into_frames(self) -> Result<Vec<Frame>> {
        let p = self.pattern;
        log::info!(
            "Generating {} test pattern: {}x{}, {} frames",
            p.kind,
            p.width,
            p.height,
            p.frames
        );
        (0..p.frames).map(|i| render_frame(&p, i)).collect()
    }
}

/// Render frame `index` of `pattern`.
pub fn render_frame(pattern: &TestPattern, index: u32) -> Result<Frame> {
    pattern.validate()?;
    let s = AA_SCALE as f32;
    let mut canvas = Canvas::new(pattern.width * AA_SCALE, pattern.height * AA_SCALE);
    let aw = canvas.width as f32;
    let ah = canvas.height as f32;
    let min_dim = aw.min(ah);
    let (cx, cy) = ((aw / 2.0).floor(), (ah / 2.0).floor());

    let n = pattern.frames.max(1) as f32;
    let i = index as f32;
    // Fraction of the loop completed, in [0, 1).
    let t = i / n;
    // Fraction of a one-shot animation completed, reaching 1 on the last frame.
    let progress = if pattern.frames > 1 {
        i / (pattern.frames - 1) as f32
    } else {
        1.0
    };

    match pattern.kind {
        PatternKind::Circle => {
            let angle = t * TAU;
            let orbit = (min_dim / 3.0).floor() * 0.7;
            let x = cx + (orbit * angle.cos()).trunc();
            let y = cy + (orbit * angle.sin()).trunc();
            canvas.ellipse(x, y, 10.0 * s, Some(RED), Some((WHITE, 2.0 * s)));
        }
        PatternKind::Bounce => {
            let y = (ah * 0.2 + (t * TAU).sin().abs() * ah * 0.6).trunc();
            let x = (aw * t).trunc();
            canvas.ellipse(x, y, 15.0 * s, Some(BLUE), Some((CYAN, 2.0 * s)));
        }
        PatternKind::Spinner => {
            let radius = (min_dim / 2.0).floor() - 5.0 * s;
            canvas.arc(cx, cy, radius, t * 360.0, 270.0, GREEN, 5.0 * s);
        }
        PatternKind::Progress => {
            let bar_w = (aw * 0.9).trunc();
            let bar_h = (ah * 0.4).trunc();
            let bar_x = ((aw - bar_w) / 2.0).floor();
            let bar_y = ((ah - bar_h) / 2.0).floor();
            canvas.rect(
                (bar_x, bar_y, bar_x + bar_w, bar_y + bar_h),
                Some([50, 50, 50]),
                Some(([100, 100, 100], 2.0 * s)),
            );
            let fill_w = (bar_w * progress).trunc();
            if fill_w > 0.0 {
                canvas.rect(
                    (bar_x, bar_y, bar_x + fill_w, bar_y + bar_h),
                    Some(GREEN),
                    None,
                );
            }
        }
        PatternKind::Checkmark => {
            let size = min_dim * 0.4;
            let p1 = (cx - size * 0.5, cy);
            let p2 = (cx - size * 0.1, cy + size * 0.5);
            let p3 = (cx + size * 0.6, cy - size * 0.6);
            let width = 5.0 * s;
            if progress < 0.5 {
                canvas.line(p1, lerp(p1, p2, progress * 2.0), GREEN, width);
            } else {
                canvas.line(p1, p2, GREEN, width);
                canvas.line(p2, lerp(p2, p3, (progress - 0.5) * 2.0), GREEN, width);
            }
        }
        PatternKind::Pulse => {
            let scale = 0.5 + 0.5 * (t * TAU).sin().abs();
            let max_radius = (min_dim / 2.0).floor() - 10.0 * s;
            let radius = (max_radius * scale).trunc();
            for ring in 0..3u8 {
                let opacity = (100.0 * (1.0 - ring as f32 / 3.0)) as u8;
                let color = [0, opacity + 100, opacity + 155];
                let r = radius + ring as f32 * 3.0 * s;
                canvas.ellipse(cx, cy, r, None, Some((color, 2.0 * s)));
            }
            canvas.ellipse(
                cx,
                cy,
                radius,
                Some([0, 150, 255]),
                Some(([0, 200, 255], 2.0 * s)),
            );
        }
    }

    canvas.downsample(AA_SCALE)
}

fn lerp(a: (f32, f32), b: (f32, f32), t: f32) -> (f32, f32) {
    (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}

/// Supersampled drawing surface. Shapes are painted in call order.
struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![BLACK; width as usize * height as usize],
        }
    }

    /// Visit pixel centers inside the bounding box, painting whatever color
    /// `shade` returns.
    fn paint<F>(&mut self, bounds: (f32, f32, f32, f32), mut shade: F)
    where
        F: FnMut(f32, f32) -> Option<Rgb>,
    {
        let (x0, y0, x1, y1) = bounds;
        let clamp_x = |v: f32| v.clamp(0.0, self.width as f32) as u32;
        let clamp_y = |v: f32| v.clamp(0.0, self.height as f32) as u32;
        let (xs, xe) = (clamp_x(x0.floor()), clamp_x(x1.ceil() + 1.0));
        let (ys, ye) = (clamp_y(y0.floor()), clamp_y(y1.ceil() + 1.0));

        for y in ys..ye {
            for x in xs..xe {
                if let Some(color) = shade(x as f32 + 0.5, y as f32 + 0.5) {
                    self.pixels[(y * self.width + x) as usize] = color;
                }
            }
        }
    }

    /// Circle of radius `r`; the outline is drawn inside the edge.
    fn ellipse(&mut self, cx: f32, cy: f32, r: f32, fill: Option<Rgb>, outline: Option<(Rgb, f32)>) {
        if r <= 0.0 {
            return;
        }
        self.paint((cx - r, cy - r, cx + r, cy + r), |x, y| {
            let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
            if dist > r {
                return None;
            }
            match outline {
                Some((color, width)) if dist > r - width => Some(color),
                _ => fill,
            }
        });
    }

    /// Ring segment of outer radius `r` starting at `start` degrees
    /// (clockwise from 3 o'clock) and spanning `span` degrees.
    fn arc(&mut self, cx: f32, cy: f32, r: f32, start: f32, span: f32, color: Rgb, width: f32) {
        if r <= 0.0 {
            return;
        }
        self.paint((cx - r, cy - r, cx + r, cy + r), |x, y| {
            let (dx, dy) = (x - cx, y - cy);
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > r || dist < r - width {
                return None;
            }
            let angle = dy.atan2(dx).to_degrees();
            ((angle - start).rem_euclid(360.0) <= span).then_some(color)
        });
    }

    /// Axis-aligned rectangle with inclusive corners.
    fn rect(&mut self, bounds: (f32, f32, f32, f32), fill: Option<Rgb>, outline: Option<(Rgb, f32)>) {
        let (x0, y0, x1, y1) = bounds;
        let (x1, y1) = (x1 + 1.0, y1 + 1.0);
        self.paint((x0, y0, x1, y1), |x, y| {
            if x < x0 || x >= x1 || y < y0 || y >= y1 {
                return None;
            }
            match outline {
                Some((color, width))
                    if x < x0 + width || x >= x1 - width || y < y0 + width || y >= y1 - width =>
                {
                    Some(color)
                }
                _ => fill,
            }
        });
    }

    /// Straight stroke of the given width.
    fn line(&mut self, a: (f32, f32), b: (f32, f32), color: Rgb, width: f32) {
        let half = width / 2.0;
        let bounds = (
            a.0.min(b.0) - half,
            a.1.min(b.1) - half,
            a.0.max(b.0) + half,
            a.1.max(b.1) + half,
        );
        let (vx, vy) = (b.0 - a.0, b.1 - a.1);
        let len_sq = vx * vx + vy * vy;
        self.paint(bounds, |x, y| {
            let (wx, wy) = (x - a.0, y - a.1);
            let t = if len_sq > 0.0 {
                ((wx * vx + wy * vy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (px, py) = (a.0 + vx * t, a.1 + vy * t);
            let dist_sq = (x - px).powi(2) + (y - py).powi(2);
            (dist_sq <= half * half).then_some(color)
        });
    }

    /// Average `factor`x`factor` blocks into one output pixel.
    fn downsample(&self, factor: u32) -> Result<Frame> {
        let width = self.width / factor;
        let height = self.height / factor;
        let area = factor * factor;
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);

        for oy in 0..height {
            for ox in 0..width {
                let mut sum = [0u32; 3];
                for sy in 0..factor {
                    let row = ((oy * factor + sy) * self.width) as usize;
                    for sx in 0..factor {
                        let p = self.pixels[row + (ox * factor + sx) as usize];
                        for c in 0..3 {
                            sum[c] += p[c] as u32;
                        }
                    }
                }
                data.extend(sum.map(|v| ((v + area / 2) / area) as u8));
            }
        }

        Frame::new(width, height, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ConfigError;

    fn pattern(kind: PatternKind, frames: u32) -> TestPattern {
        TestPattern {
            kind,
            width: 64,
            height: 64,
            frames,
        }
    }

    fn count_color(frame: &Frame, pred: impl Fn(Rgb) -> bool) -> usize {
        frame.pixels().filter(|&p| pred(p)).count()
    }

    #[test]
    fn test_all_patterns_render() {
        for kind in PatternKind::ALL {
            let frames = PatternSource::new(pattern(kind, 6)).into_frames().unwrap();
            assert_eq!(frames.len(), 6, "{}", kind);
            for frame in &frames {
                assert_eq!(frame.dimensions(), (64, 64));
            }
            // Something other than background is visible.
            let lit = count_color(&frames[frames.len() - 1], |p| p != BLACK);
            assert!(lit > 0, "{} rendered nothing", kind);
        }
    }

    #[test]
    fn test_render_deterministic() {
        let p = pattern(PatternKind::Pulse, 10);
        assert_eq!(render_frame(&p, 3).unwrap(), render_frame(&p, 3).unwrap());
    }

    #[test]
    fn test_spinner_rotates() {
        let p = pattern(PatternKind::Spinner, 8);
        assert_ne!(render_frame(&p, 0).unwrap(), render_frame(&p, 2).unwrap());
    }

    #[test]
    fn test_progress_fills() {
        let p = pattern(PatternKind::Progress, 5);
        let greenish = |c: Rgb| c[1] > 100 && c[0] < 20 && c[2] < 20;
        let first = count_color(&render_frame(&p, 0).unwrap(), greenish);
        let last = count_color(&render_frame(&p, 4).unwrap(), greenish);
        assert_eq!(first, 0);
        assert!(last > 500);
    }

    #[test]
    fn test_circle_has_red_dot() {
        let frame = render_frame(&pattern(PatternKind::Circle, 4), 0).unwrap();
        assert!(count_color(&frame, |c| c == RED) > 0);
        // Corners stay background.
        assert_eq!(frame.pixel(0, 0), Some(BLACK));
    }

    #[test]
    fn test_tiny_pattern() {
        let p = TestPattern {
            kind: PatternKind::Spinner,
            width: 1,
            height: 1,
            frames: 1,
        };
        let frames = PatternSource::new(p).into_frames().unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].dimensions(), (1, 1));
    }

    #[test]
    fn test_oversized_pattern_rejected_before_drawing() {
        let p = TestPattern {
            kind: PatternKind::Circle,
            width: u32::MAX,
            height: 8,
            frames: 1,
        };
        assert!(matches!(
            render_frame(&p, 0),
            Err(crate::SpriteError::Config(ConfigError::PatternTooLarge { .. }))
        ));
        assert!(PatternSource::new(p).into_frames().is_err());
    }

    #[test]
    fn test_zero_frames_yields_nothing() {
        let frames = PatternSource::new(pattern(PatternKind::Bounce, 0))
            .into_frames()
            .unwrap();
        assert!(frames.is_empty());
    }
}

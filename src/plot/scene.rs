use cgmath::{InnerSpace, Vector2};

use crate::animation::{AnimationConfig, CrossHistory, FrameState};

use super::ticks::MultiplePi;

pub type Color = [f32; 3];

pub const BACKGROUND: Color = [0.898, 0.898, 0.898];
pub const PANEL: Color = [0.922, 0.922, 0.922];
pub const GRID_MAJOR: Color = [1.0, 1.0, 1.0];
pub const GRID_MINOR: Color = [0.96, 0.96, 0.96];
pub const AXIS: Color = [0.35, 0.35, 0.35];
pub const VECTOR_V: Color = [0.85, 0.1, 0.1];
pub const VECTOR_W: Color = [0.1, 0.6, 0.1];
pub const AREA_POSITIVE: Color = [0.2, 0.4, 0.95];
pub const AREA_NEGATIVE: Color = [0.95, 0.55, 0.1];
pub const CURVE: Color = [0.0, 0.333, 1.0];
pub const EXTREMES: Color = [0.45, 0.45, 0.75];

const THIN: f32 = 0.0015;
const MEDIUM: f32 = 0.003;
const THICK: f32 = 0.006;

/// A colored line segment in figure coordinates.
///
/// The figure spans `[0, 1]` on both axes with y pointing up; `width` is a
/// fraction of the figure height.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub color: Color,
    pub width: f32,
}

impl Segment {
    /// Corners of the segment drawn as a rectangle on a `size` pixel target,
    /// in figure coordinates. The triangles are `[0, 1, 2]` and `[2, 1, 3]`,
    /// same as [`Fill::corners`].
    pub fn quad(&self, size: [f32; 2]) -> [[f32; 2]; 4] {
        let [w, h] = size;
        let a = Vector2::new(self.from[0] * w, self.from[1] * h);
        let b = Vector2::new(self.to[0] * w, self.to[1] * h);

        let dir = b - a;
        let dir = if dir.magnitude2() > 0.0 {
            dir.normalize()
        } else {
            Vector2::new(1.0, 0.0)
        };
        let half = self.width * h * 0.5;
        let normal = Vector2::new(-dir.y, dir.x) * half;
        // extend past the ends so adjoining segments meet without gaps
        let a = a - dir * half;
        let b = b + dir * half;

        [a + normal, a - normal, b + normal, b - normal].map(|p| [p.x / w, p.y / h])
    }
}

/// An axis-aligned filled rectangle, `[x0, y0, x1, y1]` in figure coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fill {
    pub rect: [f32; 4],
    pub color: Color,
}

impl Fill {
    pub fn corners(&self) -> [[f32; 2]; 4] {
        let [x0, y0, x1, y1] = self.rect;
        [[x0, y1], [x0, y0], [x1, y1], [x1, y0]]
    }
}

/// Everything drawn for one frame: fills first, then segments in order.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub fills: Vec<Fill>,
    pub segments: Vec<Segment>,
}

impl Scene {
    pub fn background(&self) -> Color {
        BACKGROUND
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn push(&mut self, from: [f32; 2], to: [f32; 2], color: Color, width: f32) {
        self.segments.push(Segment {
            from,
            to,
            color,
            width,
        });
    }
}

/// Maps a data range onto a rectangle of the figure.
#[derive(Copy, Clone, Debug)]
pub struct Panel {
    /// `[x0, y0, x1, y1]` in figure coordinates.
    pub rect: [f32; 4],
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl Panel {
    pub fn map(&self, x: f64, y: f64) -> [f32; 2] {
        let [x0, y0, x1, y1] = self.rect;
        let tx = (x - self.x_range.0) / (self.x_range.1 - self.x_range.0);
        let ty = (y - self.y_range.0) / (self.y_range.1 - self.y_range.0);
        [
            x0 + (x1 - x0) * tx as f32,
            y0 + (y1 - y0) * ty as f32,
        ]
    }

    /// Clips the data-space segment to the panel's ranges (Liang–Barsky).
    pub fn clip(&self, from: (f64, f64), to: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;

        for (p, q) in [
            (-dx, from.0 - self.x_range.0),
            (dx, self.x_range.1 - from.0),
            (-dy, from.1 - self.y_range.0),
            (dy, self.y_range.1 - from.1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }

        Some((
            (from.0 + t0 * dx, from.1 + t0 * dy),
            (from.0 + t1 * dx, from.1 + t1 * dy),
        ))
    }

    fn line(&self, scene: &mut Scene, from: (f64, f64), to: (f64, f64), color: Color, width: f32) {
        if let Some((a, b)) = self.clip(from, to) {
            scene.push(self.map(a.0, a.1), self.map(b.0, b.1), color, width);
        }
    }

    fn frame(&self, scene: &mut Scene) {
        let (xa, xb) = self.x_range;
        let (ya, yb) = self.y_range;
        self.line(scene, (xa, ya), (xb, ya), AXIS, THIN);
        self.line(scene, (xb, ya), (xb, yb), AXIS, THIN);
        self.line(scene, (xb, yb), (xa, yb), AXIS, THIN);
        self.line(scene, (xa, yb), (xa, ya), AXIS, THIN);
    }

    fn fill(&self, scene: &mut Scene) {
        scene.fills.push(Fill {
            rect: self.rect,
            color: PANEL,
        });
    }
}

/// Two panels side by side: the rotating vectors on the left, the cross
/// product against θ on the right.
#[derive(Clone, Debug)]
pub struct Plot {
    vectors: Panel,
    cross: Panel,
    grid_step: f64,
    ticks: MultiplePi,
    minor_ticks: MultiplePi,
}

impl Plot {
    pub fn new(config: &AnimationConfig) -> Self {
        let [mag1, mag2] = config.magnitudes;

        let extent = (1.25 * mag1.max(mag2)).ceil();
        let grid_step = if extent <= 10.0 { 1.0 } else { extent / 5.0 };

        let sweep = config.sweep;
        let bound = 1.4 * mag1 * mag2;

        Plot {
            vectors: Panel {
                rect: [0.06, 0.1, 0.46, 0.9],
                x_range: (-extent, extent),
                y_range: (-extent, extent),
            },
            cross: Panel {
                rect: [0.54, 0.1, 0.96, 0.9],
                x_range: (-sweep / 8.0, sweep + sweep / 8.0),
                y_range: (-bound, bound),
            },
            grid_step,
            ticks: MultiplePi::new(4),
            minor_ticks: MultiplePi::new(12),
        }
    }

    pub fn vectors_panel(&self) -> &Panel {
        &self.vectors
    }

    pub fn ticks(&self) -> &MultiplePi {
        &self.ticks
    }

    pub fn scene(&self, frame: &FrameState, history: &CrossHistory) -> Scene {
        let mut scene = Scene::default();
        self.draw_vectors(&mut scene, frame);
        self.draw_cross(&mut scene, history);
        scene
    }

    fn draw_vectors(&self, scene: &mut Scene, frame: &FrameState) {
        let panel = &self.vectors;
        let (lo, hi) = panel.x_range;

        panel.fill(scene);

        let minor = self.grid_step / 2.0;
        let steps = ((hi - lo) / minor).round() as i64;
        for i in 0..=steps {
            let at = lo + i as f64 * minor;
            let (color, width) = if i % 2 == 0 {
                (GRID_MAJOR, MEDIUM)
            } else {
                (GRID_MINOR, THIN)
            };
            panel.line(scene, (at, lo), (at, hi), color, width);
            panel.line(scene, (lo, at), (hi, at), color, width);
        }

        panel.line(scene, (lo, 0.0), (hi, 0.0), AXIS, THIN);
        panel.line(scene, (0.0, lo), (0.0, hi), AXIS, THIN);
        panel.frame(scene);

        let v = frame.vectors[0].endpoint();
        let w = frame.vectors[1].endpoint();

        let area = if frame.cross >= 0.0 {
            AREA_POSITIVE
        } else {
            AREA_NEGATIVE
        };
        let corners = [(0.0, 0.0), (v.x, v.y), (v.x + w.x, v.y + w.y), (w.x, w.y)];
        for i in 0..4 {
            panel.line(scene, corners[i], corners[(i + 1) % 4], area, THIN);
        }

        let head = 0.06 * (hi - lo);
        self.arrow(scene, v, head, VECTOR_V);
        self.arrow(scene, w, head, VECTOR_W);
    }

    fn arrow(&self, scene: &mut Scene, tip: Vector2<f64>, head: f64, color: Color) {
        let panel = &self.vectors;
        panel.line(scene, (0.0, 0.0), (tip.x, tip.y), color, THICK);

        let length = tip.magnitude();
        if length == 0.0 {
            return;
        }
        let head = head.min(0.4 * length);
        let back = -tip / length * head;
        for angle in [0.45f64, -0.45] {
            let (sin, cos) = angle.sin_cos();
            let barb = Vector2::new(back.x * cos - back.y * sin, back.x * sin + back.y * cos);
            panel.line(
                scene,
                (tip.x, tip.y),
                (tip.x + barb.x, tip.y + barb.y),
                color,
                THICK,
            );
        }
    }

    fn draw_cross(&self, scene: &mut Scene, history: &CrossHistory) {
        let panel = &self.cross;
        let (x_lo, x_hi) = panel.x_range;
        let (y_lo, y_hi) = panel.y_range;

        panel.fill(scene);

        let tick = (y_hi - y_lo) * 0.015;
        for at in self.minor_ticks.locate(x_lo, x_hi) {
            panel.line(scene, (at, y_lo), (at, y_lo + tick), AXIS, THIN);
        }
        for at in self.ticks.locate(x_lo, x_hi) {
            panel.line(scene, (at, y_lo), (at, y_hi), GRID_MAJOR, MEDIUM);
            panel.line(scene, (at, y_lo), (at, y_lo + 2.0 * tick), AXIS, MEDIUM);
        }

        let bound = y_hi / 1.4;
        panel.line(scene, (x_lo, bound), (x_hi, bound), GRID_MAJOR, MEDIUM);
        panel.line(scene, (x_lo, -bound), (x_hi, -bound), GRID_MAJOR, MEDIUM);
        panel.line(scene, (x_lo, 0.0), (x_hi, 0.0), AXIS, THIN);
        panel.frame(scene);

        // lowest and highest cross product so far, marked on the right edge
        if let Some((lo, hi)) = history.cross_range() {
            let from = x_hi - (x_hi - x_lo) * 0.04;
            for at in [lo, hi] {
                panel.line(scene, (from, at), (x_hi, at), EXTREMES, MEDIUM);
            }
        }

        for pair in history.points().windows(2) {
            panel.line(scene, pair[0], pair[1], CURVE, THICK);
        }
    }
}

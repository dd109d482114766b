use vulkano::{buffer::BufferContents, pipeline::graphics::vertex_input::Vertex};

use crate::plot::{Color, Scene};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, BufferContents, Vertex)]
pub struct VertexPositionColor {
    #[format(R32G32_SFLOAT)]
    pub position: [f32; 2],
    #[format(R32G32B32_SFLOAT)]
    pub color: [f32; 3],
}

fn srgb_to_linear(color: Color) -> Color {
    color.map(|c| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    })
}

/// Figure coordinates (y up, `[0, 1]`) to Vulkan clip space (y down, `[-1, 1]`).
fn to_ndc(p: [f32; 2]) -> [f32; 2] {
    [p[0] * 2.0 - 1.0, 1.0 - p[1] * 2.0]
}

/// Expands the scene into a triangle list for a `size` pixel target.
///
/// `linear` converts the scene's sRGB colors for an sRGB swapchain, which
/// encodes them again on write.
pub fn scene_vertices(scene: &Scene, size: [f32; 2], linear: bool) -> Vec<VertexPositionColor> {
    let mut vertices = Vec::with_capacity((scene.fills.len() + scene.segments.len()) * 6);

    let quads = scene
        .fills
        .iter()
        .map(|fill| (fill.corners(), fill.color))
        .chain(
            scene
                .segments
                .iter()
                .map(|segment| (segment.quad(size), segment.color)),
        );

    for (corners, color) in quads {
        let color = if linear { srgb_to_linear(color) } else { color };
        for i in [0, 1, 2, 2, 1, 3] {
            vertices.push(VertexPositionColor {
                position: to_ndc(corners[i]),
                color,
            });
        }
    }

    vertices
}

pub mod vs {
    vulkano_shaders::shader! {
        ty: "vertex",
        src: r"
            #version 460

            layout(location = 0) in vec2 position;
            layout(location = 1) in vec3 color;

            layout(location = 0) out vec3 v_color;

            void main() {
                gl_Position = vec4(position, 0.0, 1.0);
                v_color = color;
            }
        ",
    }
}

pub mod fs {
    vulkano_shaders::shader! {
        ty: "fragment",
        src: r"
            #version 460

            layout(location = 0) in vec3 v_color;

            layout(location = 0) out vec4 f_color;

            void main() {
                f_color = vec4(v_color, 1.0);
            }
        ",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{Fill, Segment};

    #[test]
    fn six_vertices_per_primitive() {
        let scene = Scene {
            fills: vec![Fill {
                rect: [0.0, 0.0, 1.0, 1.0],
                color: [1.0, 1.0, 1.0],
            }],
            segments: vec![Segment {
                from: [0.2, 0.2],
                to: [0.8, 0.8],
                color: [1.0, 0.0, 0.0],
                width: 0.01,
            }],
        };
        let vertices = scene_vertices(&scene, [800.0, 400.0], false);
        assert_eq!(vertices.len(), 12);
        assert!(vertices[..6].iter().all(|v| v.color == [1.0, 1.0, 1.0]));
        assert!(vertices[6..].iter().all(|v| v.color == [1.0, 0.0, 0.0]));
    }

    #[test]
    fn full_figure_maps_to_clip_space() {
        let scene = Scene {
            fills: vec![Fill {
                rect: [0.0, 0.0, 1.0, 1.0],
                color: [0.5, 0.5, 0.5],
            }],
            segments: vec![],
        };
        let vertices = scene_vertices(&scene, [100.0, 100.0], true);
        // top-left of the figure is (-1, -1) in clip space
        assert_eq!(vertices[0].position, [-1.0, -1.0]);
        assert_eq!(vertices[1].position, [-1.0, 1.0]);
        assert_eq!(vertices[5].position, [1.0, 1.0]);
        assert!(vertices[0].color[0] < 0.5);
    }
}

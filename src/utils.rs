use std::f32::consts::{FRAC_PI_2, TAU};
use wgpu::util::DeviceExt;
use bytemuck::NoUninit;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn upload(&self, device: &wgpu::Device, label: &str) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} vertices")),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} indices")),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

/// 8-bit sRGB color to the linear RGBA the sRGB surface expects
pub fn srgb_color([r, g, b]: [u8; 3]) -> [f32; 4] {
    let lin = |c: u8| {
        let c = c as f32 / 255.0;
        if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
    };
    [lin(r), lin(g), lin(b), 1.0]
}

pub const RAYWHITE: [u8; 3] = [245, 245, 245];
pub const BEIGE: [u8; 3] = [211, 176, 131];
pub const MAROON: [u8; 3] = [190, 33, 55];
pub const LIGHTGRAY: [u8; 3] = [200, 200, 200];
pub const GRAY: [u8; 3] = [130, 130, 130];
pub const DARKGRAY: [u8; 3] = [80, 80, 80];
pub const LIME: [u8; 3] = [0, 158, 47];

/// Capsule with its lower cap centered at the origin and upper cap at
/// `(0, height, 0)`. `rings` is the number of bands per hemisphere.
/// A zero `height` gives a sphere.
pub fn create_capsule_mesh(height: f32, radius: f32, slices: u32, rings: u32, color: [f32; 4]) -> Mesh {
    let slices = slices.max(3);
    let rings = rings.max(1);
    let row_len = slices + 1;

    let mut vertices = Vec::with_capacity((2 * (rings + 1) * row_len) as usize);

    // Rows run from the top pole down to the bottom pole; the two equator rows
    // bound the cylindrical middle section.
    let hemispheres = [(height, 0.0f32), (0.0, FRAC_PI_2)];
    for (center_y, phi_start) in hemispheres {
        for r in 0..=rings {
            let phi = phi_start + FRAC_PI_2 * r as f32 / rings as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            for s in 0..=slices {
                let theta = TAU * s as f32 / slices as f32;
                let (sin_t, cos_t) = theta.sin_cos();
                let normal = [sin_phi * cos_t, cos_phi, sin_phi * sin_t];
                vertices.push(Vertex {
                    pos: [
                        radius * normal[0],
                        center_y + radius * normal[1],
                        radius * normal[2],
                    ],
                    normal,
                    color,
                });
            }
        }
    }

    let rows = 2 * (rings + 1);
    let mut indices = Vec::with_capacity(((rows - 1) * slices * 6) as usize);
    for row in 0..rows - 1 {
        for s in 0..slices {
            let a = row * row_len + s;
            let b = a + row_len;
            // Counter-clockwise seen from outside
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }

    Mesh { vertices, indices }
}

/// Line-list grid on the XZ plane centered at the origin. The two center
/// lines use `axis_color`.
pub fn create_grid_mesh(slices: u32, spacing: f32, line_color: [f32; 4], axis_color: [f32; 4]) -> Mesh {
    let half = (slices / 2) as i32;
    let extent = half as f32 * spacing;
    let up = [0.0, 1.0, 0.0];

    let mut vertices = Vec::with_capacity(((2 * half + 1) * 4) as usize);
    for i in -half..=half {
        let color = if i == 0 { axis_color } else { line_color };
        let offset = i as f32 * spacing;
        for pos in [
            [offset, 0.0, -extent],
            [offset, 0.0, extent],
            [-extent, 0.0, offset],
            [extent, 0.0, offset],
        ] {
            vertices.push(Vertex { pos, normal: up, color });
        }
    }

    let indices = (0..vertices.len() as u32).collect();
    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capsule_counts() {
        let mesh = create_capsule_mesh(1.5, 2.0, 16, 4, [1.0; 4]);
        assert_eq!(mesh.vertices.len(), 2 * 5 * 17);
        assert_eq!(mesh.indices.len(), 9 * 16 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn capsule_bounds() {
        let mesh = create_capsule_mesh(1.5, 2.0, 16, 4, [1.0; 4]);
        let min_y = mesh.vertices.iter().map(|v| v.pos[1]).fold(f32::MAX, f32::min);
        let max_y = mesh.vertices.iter().map(|v| v.pos[1]).fold(f32::MIN, f32::max);
        assert!((min_y + 2.0).abs() < 1e-4);
        assert!((max_y - 3.5).abs() < 1e-4);
        for v in &mesh.vertices {
            let r = (v.pos[0] * v.pos[0] + v.pos[2] * v.pos[2]).sqrt();
            assert!(r <= 2.0 + 1e-4);
            // Normals point away from the capsule's axis segment
            let axis_y = v.pos[1].clamp(0.0, 1.5);
            let out = glam::Vec3::new(v.pos[0], v.pos[1] - axis_y, v.pos[2]);
            assert!(out.dot(glam::Vec3::from(v.normal)) >= -1e-4);
        }
    }

    #[test]
    fn capsule_winding_faces_outward() {
        let mesh = create_capsule_mesh(1.5, 2.0, 16, 4, [1.0; 4]);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| glam::Vec3::from(mesh.vertices[i as usize].pos));
            let n = (b - a).cross(c - a);
            if n.length_squared() < 1e-8 {
                continue; // pole triangles collapse
            }
            let centroid = (a + b + c) / 3.0;
            let axis = glam::Vec3::new(0.0, centroid.y.clamp(0.0, 1.5), 0.0);
            assert!(n.dot(centroid - axis) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn zero_height_capsule_is_sphere() {
        let mesh = create_capsule_mesh(0.0, 1.0, 8, 3, [1.0; 4]);
        for v in &mesh.vertices {
            let len = glam::Vec3::from(v.pos).length();
            assert!((len - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn grid_lines() {
        let mesh = create_grid_mesh(300, 2.0, [0.5; 4], [1.0; 4]);
        assert_eq!(mesh.vertices.len(), 301 * 4);
        assert_eq!(mesh.indices.len(), mesh.vertices.len());
        let max_x = mesh.vertices.iter().map(|v| v.pos[0]).fold(f32::MIN, f32::max);
        assert_eq!(max_x, 300.0);
        assert!(mesh.vertices.iter().all(|v| v.pos[1] == 0.0));
        let axis_lines = mesh.vertices.iter().filter(|v| v.color == [1.0; 4]).count();
        assert_eq!(axis_lines, 4);
    }

    #[test]
    fn srgb_endpoints() {
        assert_eq!(srgb_color([0, 0, 0]), [0.0, 0.0, 0.0, 1.0]);
        let white = srgb_color([255, 255, 255]);
        assert!((white[0] - 1.0).abs() < 1e-5);
        assert!(srgb_color([128, 128, 128])[0] < 0.5);
    }
}

use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    /// `fov_y` is reinterpreted as the view height in world units
    Orthographic,
}

pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub projection: Projection,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vec3::new(0.0, 25.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 45f32.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            z_near: 0.01,
            z_far: 1000.0,
            projection: Projection::Perspective,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn proj(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far)
            }
            Projection::Orthographic => {
                let half_h = self.fov_y * 0.5;
                let half_w = half_h * self.aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, self.z_near, self.z_far)
            }
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_screen_center() {
        let mut cam = Camera::new(1280, 720);
        cam.position = Vec3::new(4.0, 25.0, 19.0);
        cam.target = Vec3::new(4.0, 2.0, 4.0);

        let clip = cam.view_proj() * cam.target.extend(1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn orthographic_keeps_center() {
        let mut cam = Camera::new(800, 600);
        cam.projection = Projection::Orthographic;
        cam.fov_y = 20.0;
        let clip = cam.view_proj() * cam.target.extend(1.0);
        assert!((clip.x / clip.w).abs() < 1e-4 && (clip.y / clip.w).abs() < 1e-4);
    }

    #[test]
    fn aspect_ignores_zero_height() {
        let mut cam = Camera::new(1280, 720);
        cam.set_aspect(640, 0);
        assert_eq!(cam.aspect, 640.0);
    }
}

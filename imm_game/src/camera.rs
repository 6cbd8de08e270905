use inle_serialize::{Binary_Serializable, Byte_Stream};
use std::ops::{Add, Sub};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3f {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3f { x, y, z }
    }

    pub fn magnitude2(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn magnitude(self) -> f32 {
        self.magnitude2().sqrt()
    }
}

impl Add for Vec3f {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Vec3f::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3f {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Vec3f::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Binary_Serializable for Vec3f {
    fn serialize(&self, output: &mut Byte_Stream) -> std::io::Result<()> {
        output.write_f32(self.x)?;
        output.write_f32(self.y)?;
        output.write_f32(self.z)
    }

    fn deserialize(input: &mut Byte_Stream) -> std::io::Result<Self> {
        let x = input.read_f32()?;
        let y = input.read_f32()?;
        let z = input.read_f32()?;
        Ok(Vec3f::new(x, y, z))
    }
}

#[cfg(test)]
impl inle_test::prelude::Approx_Eq_Testable for Vec3f {
    fn cmp_list(&self) -> Vec<f32> {
        vec![self.x, self.y, self.z]
    }
}

pub const DEFAULT_FOV: f32 = 45.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3f,
    /// The point the camera looks at.
    pub target: Vec3f,
    pub up: Vec3f,
    /// Vertical field of view, in degrees.
    pub fovy: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            position: Vec3f::new(0.0, 2.0, 10.0),
            target: Vec3f::new(0.0, 0.0, 0.0),
            up: Vec3f::new(0.0, 1.0, 0.0),
            fovy: DEFAULT_FOV,
        }
    }
}

impl Camera {
    pub fn forward(&self) -> Vec3f {
        self.target - self.position
    }

    /// Sets the fov, clamped to what a perspective projection can use.
    pub fn set_fovy(&mut self, fovy: f32) {
        let clamped = fovy.max(1.0).min(179.0);
        if (clamped - fovy).abs() > std::f32::EPSILON {
            lwarn!("Camera fov {} out of range: using {}", fovy, clamped);
        }
        self.fovy = clamped;
    }
}

impl Binary_Serializable for Camera {
    fn serialize(&self, output: &mut Byte_Stream) -> std::io::Result<()> {
        self.position.serialize(output)?;
        self.target.serialize(output)?;
        self.up.serialize(output)?;
        output.write_f32(self.fovy)
    }

    fn deserialize(input: &mut Byte_Stream) -> std::io::Result<Self> {
        Ok(Camera {
            position: Vec3f::deserialize(input)?,
            target: Vec3f::deserialize(input)?,
            up: Vec3f::deserialize(input)?,
            fovy: input.read_f32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_at_origin() {
        let cam = Camera::default();
        assert_approx_eq!(cam.forward(), Vec3f::new(0.0, -2.0, -10.0));
        assert_approx_eq!(cam.fovy, DEFAULT_FOV);
        assert_approx_eq!(cam.up.magnitude(), 1.0);
    }

    #[test]
    fn fov_is_clamped() {
        let mut cam = Camera::default();
        cam.set_fovy(70.0);
        assert_approx_eq!(cam.fovy, 70.0);
        cam.set_fovy(-3.0);
        assert_approx_eq!(cam.fovy, 1.0);
        cam.set_fovy(400.0);
        assert_approx_eq!(cam.fovy, 179.0);
    }

    #[test]
    fn camera_serializes() {
        let mut cam = Camera::default();
        cam.position = Vec3f::new(1.5, -2.0, 3.25);
        cam.set_fovy(60.0);

        let mut stream = Byte_Stream::new();
        cam.serialize(&mut stream).unwrap();
        assert_eq!(stream.len(), 10 * 4);

        stream.seek(0);
        assert_eq!(Camera::deserialize(&mut stream).unwrap(), cam);
    }
}

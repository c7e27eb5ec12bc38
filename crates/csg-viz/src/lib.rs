//! Shared visualization utilities for the CSG viewer.

use bsp_csg::{BooleanOp, CsgResult, Face, Mesh};
use macroquad::models::{draw_mesh, Mesh as DrawMesh, Vertex as DrawVertex};
use macroquad::prelude::*;
use nalgebra::{Point3, Rotation3, Vector3};

/// macroquad meshes use u16 indices.
const MAX_FACES_PER_BATCH: usize = u16::MAX as usize / 3;

/// Shades a face by how directly it faces a fixed light.
pub fn face_color(face: &Face, base: Color) -> Color {
    let light = Vector3::new(0.4, 0.8, 0.6).normalize();
    let intensity = 0.35 + 0.65 * face.normal().dot(&light).max(0.0);
    Color::new(base.r * intensity, base.g * intensity, base.b * intensity, base.a)
}

/// Draws faces as triangle batches.
pub fn draw_faces(faces: &[Face], base: Color) {
    for batch in faces.chunks(MAX_FACES_PER_BATCH) {
        let mut vertices = Vec::with_capacity(batch.len() * 3);
        for face in batch {
            let color = face_color(face, base);
            for p in face.positions() {
                vertices.push(DrawVertex::new2(vec3(p.x, p.y, p.z), vec2(0.0, 0.0), color));
            }
        }

        let indices = (0..vertices.len() as u16).collect();
        draw_mesh(&DrawMesh {
            vertices,
            indices,
            texture: None,
        });
    }
}

/// Draws the edges of every face.
pub fn draw_wireframe(faces: &[Face], color: Color) {
    for face in faces {
        let [a, b, c] = face.positions().map(|p| vec3(p.x, p.y, p.z));
        draw_line_3d(a, b, color);
        draw_line_3d(b, c, color);
        draw_line_3d(c, a, color);
    }
}

/// Builds a cube of edge length `size` centred on `center` and rotated
/// about its centre.
pub fn rotated_cube(center: Point3<f32>, size: f32, rotation: &Rotation3<f32>) -> CsgResult<Mesh> {
    let half = size / 2.0;
    let cube = Mesh::cuboid(Point3::new(-half, -half, -half), Point3::new(half, half, half))?;

    let faces = cube
        .into_faces()
        .into_iter()
        .map(|face| {
            let [a, b, c] = face.vertices().clone().map(|mut v| {
                v.position = center + rotation * v.position.coords;
                v.normal = rotation * v.normal;
                v
            });
            Face::new(a, b, c)
        })
        .collect::<CsgResult<Vec<_>>>()?;
    Ok(Mesh::from_faces(faces))
}

/// Two overlapping solids and the result of combining them.
pub struct Scene {
    pub a: Mesh,
    pub b: Mesh,
    pub op: BooleanOp,
    pub result: Mesh,
}

impl Scene {
    /// Creates the scene and computes the initial result.
    pub fn new(a: Mesh, b: Mesh, op: BooleanOp) -> Self {
        let result = Self::compute(&a, &b, op);
        Self { a, b, op, result }
    }

    fn compute(a: &Mesh, b: &Mesh, op: BooleanOp) -> Mesh {
        match op {
            BooleanOp::Combine => a.union(b),
            BooleanOp::Intersect => a.intersection(b),
            BooleanOp::Subtract => a.difference(b),
        }
    }

    /// Switches the operator and recomputes the result.
    pub fn set_op(&mut self, op: BooleanOp) {
        if op != self.op {
            self.op = op;
            self.result = Self::compute(&self.a, &self.b, op);
        }
    }

    /// Replaces the second operand and recomputes the result.
    pub fn set_b(&mut self, b: Mesh) {
        self.b = b;
        self.result = Self::compute(&self.a, &self.b, self.op);
    }

    /// Handles the operator hotkeys (1, 2, 3).
    pub fn update(&mut self) {
        if is_key_pressed(KeyCode::Key1) {
            self.set_op(BooleanOp::Combine);
        }
        if is_key_pressed(KeyCode::Key2) {
            self.set_op(BooleanOp::Intersect);
        }
        if is_key_pressed(KeyCode::Key3) {
            self.set_op(BooleanOp::Subtract);
        }
    }
}

/// Simple orbit camera for 3D scene navigation.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Creates a camera orbiting the origin.
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: vec3(0.0, 0.0, 0.0),
            zoom_speed: 0.5,
            min_distance: 1.0,
            max_distance: 50.0,
        }
    }

    /// Updates camera state from mouse drag and scroll.
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch = (self.pitch - delta.y * 2.0).clamp(-1.5, 1.5);
        }

        let scroll = mouse_wheel().1;
        self.distance =
            (self.distance - scroll * self.zoom_speed).clamp(self.min_distance, self.max_distance);
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    /// Converts to macroquad's Camera3D for rendering.
    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }
}

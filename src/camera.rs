//! First-person viewpoint, its input controller and projection.
//!
//! [`Camera`] is the viewpoint state: position, yaw/pitch orientation and the
//! collision parameters used when it moves. [`CameraController`] turns keyboard,
//! mouse and scroll input into movement intents and orientation changes and hands
//! the movement to a [`MovementResolver`] once per frame.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use instant::Duration;
use winit::{
    event::{ElementState, MouseScrollDelta},
    keyboard::KeyCode,
};

use crate::movement::{MovementIntents, MovementResolver};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Pitch stays strictly inside straight up/down to keep the view basis well defined.
pub const MAX_PITCH_DEGREES: f32 = 89.0;
pub const MIN_FOV_DEGREES: f32 = 1.0;
pub const MAX_FOV_DEGREES: f32 = 45.0;

const WORLD_UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

/// How the viewpoint interacts with the scene's colliders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision {
    /// Margin added to every obstacle box before testing the eye position.
    pub radius: f32,
    pub enabled: bool,
}

impl Default for Collision {
    fn default() -> Self {
        Self {
            radius: 1.0,
            enabled: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
    pub collision: Collision,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
            collision: Collision::default(),
        }
    }

    pub fn front(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize()
    }

    pub fn right(&self) -> Vector3<f32> {
        self.front().cross(WORLD_UP).normalize()
    }

    /// The camera's own up vector, tilted with the pitch.
    pub fn up(&self) -> Vector3<f32> {
        self.right().cross(self.front()).normalize()
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.front(), self.up())
    }

    /// Applies a yaw/pitch change in degrees, keeping pitch within ±89°.
    pub fn rotate(&mut self, yaw_degrees: f32, pitch_degrees: f32) {
        self.yaw += Rad::from(cgmath::Deg(yaw_degrees));
        let max = Rad::from(cgmath::Deg(MAX_PITCH_DEGREES)).0;
        self.pitch = Rad((self.pitch.0 + Rad::from(cgmath::Deg(pitch_degrees)).0).clamp(-max, max));
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn fovy_degrees(&self) -> f32 {
        cgmath::Deg::from(self.fovy).0
    }

    /// Narrows the field of view by `delta` degrees, within [1°, 45°].
    pub fn zoom(&mut self, delta: f32) {
        let fovy = (self.fovy_degrees() - delta).clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES);
        self.fovy = cgmath::Deg(fovy).into();
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Accumulates input between frames and applies it in [`CameraController::update`].
#[derive(Clone, Debug)]
pub struct CameraController {
    pub intents: MovementIntents,
    rotate_horizontal: f32,
    rotate_vertical: f32,
    scroll: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl CameraController {
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            intents: MovementIntents::default(),
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            scroll: 0.0,
            speed,
            sensitivity,
        }
    }

    /// Returns whether `key` is a movement key.
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        let pressed = state.is_pressed();
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => self.intents.forward = pressed,
            KeyCode::KeyS | KeyCode::ArrowDown => self.intents.backward = pressed,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.intents.left = pressed,
            KeyCode::KeyD | KeyCode::ArrowRight => self.intents.right = pressed,
            KeyCode::KeyE | KeyCode::Space => self.intents.up = pressed,
            KeyCode::KeyQ | KeyCode::ShiftLeft => self.intents.down = pressed,
            _ => return false,
        }
        true
    }

    pub fn handle_mouse(&mut self, mouse_dx: f64, mouse_dy: f64) {
        self.rotate_horizontal += mouse_dx as f32;
        self.rotate_vertical += mouse_dy as f32;
    }

    pub fn handle_scroll(&mut self, delta: &MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, lines) => *lines,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
        };
    }

    /// Turns, zooms and moves the camera for one frame of length `dt`.
    pub fn update(
        &mut self,
        camera: &mut Camera,
        projection: &mut Projection,
        resolver: &MovementResolver<'_>,
        dt: Duration,
    ) {
        // Screen y grows downwards
        camera.rotate(
            self.rotate_horizontal * self.sensitivity,
            -self.rotate_vertical * self.sensitivity,
        );
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;

        if self.scroll != 0.0 {
            projection.zoom(self.scroll);
            self.scroll = 0.0;
        }

        resolver.step(camera, &self.intents, self.speed * dt.as_secs_f32());
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: CameraController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

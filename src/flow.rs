//! World state and the application event loop.
//!
//! [`World`] owns everything that lives for the whole session: the GPU
//! [`Context`], the uploaded models, the instanced placement batches, the collider
//! set and the first-frame [`DrawLog`]. Subsystems get what they need from it by
//! reference; nothing is global.
//!
//! # Lifecycle Flow
//!
//! Each frame:
//! 1. Collect window/device events (keys set movement intents, the mouse turns the camera)
//! 2. Resolve the step's movement against the colliders and upload the camera
//! 3. Draw every placement batch, one instanced call per admitted material group
//! 4. Present the frame

use std::{collections::BTreeMap, iter, path::Path, sync::Arc};

use instant::{Duration, Instant};
use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

use crate::{
    context::Context,
    data_structures::{collider::ColliderSet, instance::InstanceRaw, texture::Texture},
    movement::MovementResolver,
    render::{DrawLog, DrawModel, GroupFilter},
    resources::{
        self,
        mesh::{self, GpuModel},
        texture::ImageFileDecoder,
    },
    scene::SceneConfig,
};

/// Edge-triggered keyboard commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ToggleCollision,
    ToggleFog,
    Exit,
}

impl Action {
    pub fn for_key(key: KeyCode) -> Option<Action> {
        match key {
            KeyCode::KeyB => Some(Action::ToggleCollision),
            KeyCode::Digit0 => Some(Action::ToggleFog),
            KeyCode::Escape => Some(Action::Exit),
            _ => None,
        }
    }
}

/// All placements of one asset that share a group filter, packed for instancing.
#[derive(Debug)]
pub struct PlacedBatch {
    pub asset: String,
    pub groups: GroupFilter,
    pub instance_count: u32,
    pub instance_buffer: wgpu::Buffer,
}

#[derive(Debug)]
pub struct World {
    pub(crate) ctx: Context,
    models: BTreeMap<String, GpuModel>,
    batches: Vec<PlacedBatch>,
    colliders: ColliderSet,
    floor: f32,
    draw_log: DrawLog,
    is_surface_configured: bool,
}

impl World {
    pub async fn new(window: Arc<Window>, scene: &SceneConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, scene).await?;

        let mut decoder = ImageFileDecoder::default();
        let mut models = BTreeMap::new();
        for asset in scene.assets.keys() {
            let Some(path) = scene.asset_path(asset) else {
                continue;
            };
            match resources::load_model_obj(&path, &mut decoder) {
                Ok(model) if model.vertex_count() == 0 => {
                    log::warn!("Asset '{}' has no geometry and will not be drawn.", asset);
                }
                Ok(model) => {
                    let gpu_model = mesh::upload_model(
                        asset,
                        &model,
                        &ctx.device,
                        &ctx.queue,
                        &ctx.material_layout,
                    );
                    models.insert(asset.clone(), gpu_model);
                }
                Err(e) => log::error!("Failed to load asset '{}': {}", asset, e),
            }
        }

        let batches = scene
            .batches()
            .into_iter()
            .filter_map(|batch| {
                if !scene.assets.contains_key(&batch.asset) {
                    log::warn!("Placement refers to unknown asset '{}'.", batch.asset);
                    return None;
                }
                let raw: Vec<InstanceRaw> = batch.instances.iter().map(|i| i.to_raw()).collect();
                let instance_buffer =
                    ctx.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some(&format!("{} Instance Buffer", batch.asset)),
                            contents: bytemuck::cast_slice(&raw),
                            usage: wgpu::BufferUsages::VERTEX,
                        });
                Some(PlacedBatch {
                    asset: batch.asset,
                    groups: batch.groups,
                    instance_count: raw.len() as u32,
                    instance_buffer,
                })
            })
            .collect();

        let colliders = scene.colliders();
        log::info!(
            "Collision system initialized with {} colliders",
            colliders.len()
        );

        Ok(Self {
            ctx,
            models,
            batches,
            colliders,
            floor: scene.collision.floor,
            draw_log: DrawLog::new(),
            is_surface_configured: false,
        })
    }

    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx.surface.configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    pub fn toggle_collision(&mut self) {
        let collision = &mut self.ctx.camera.camera.collision;
        collision.enabled = !collision.enabled;
        log::info!(
            "Collision {}",
            if collision.enabled { "enabled" } else { "disabled" }
        );
    }

    pub fn toggle_fog(&mut self) {
        let fog = &mut self.ctx.fog;
        fog.uniform.set_enabled(!fog.uniform.is_enabled());
        fog.write(&self.ctx.queue);
        log::info!(
            "Fog {}",
            if fog.uniform.is_enabled() { "enabled" } else { "disabled" }
        );
    }

    fn update(&mut self, dt: Duration) {
        // The resolver borrows the colliders for this step only
        let resolver = MovementResolver::new(&self.colliders, self.floor);
        let camera = &mut self.ctx.camera;
        camera
            .controller
            .update(&mut camera.camera, &mut self.ctx.projection, &resolver, dt);
        camera
            .uniform
            .update_view_proj(&camera.camera, &self.ctx.projection);
        self.ctx
            .queue
            .write_buffer(&camera.buffer, 0, bytemuck::cast_slice(&[camera.uniform]));
    }

    /// Draws one frame. Returns `false` when the surface must be reconfigured first.
    fn render(&mut self) -> bool {
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return true;
        }

        let output = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(frame)
            | wgpu::CurrentSurfaceTexture::Suboptimal(frame) => frame,
            wgpu::CurrentSurfaceTexture::Timeout | wgpu::CurrentSurfaceTexture::Occluded => {
                return true;
            }
            wgpu::CurrentSurfaceTexture::Outdated | wgpu::CurrentSurfaceTexture::Lost => {
                return false;
            }
            wgpu::CurrentSurfaceTexture::Validation => {
                log::error!("Unable to acquire the next frame");
                return true;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.ctx.pipeline);
            render_pass.set_bind_group(1, &self.ctx.camera.bind_group, &[]);
            render_pass.set_bind_group(2, &self.ctx.fog.bind_group, &[]);

            for batch in self.batches.iter() {
                // Absent assets were already reported at load time
                let Some(model) = self.models.get(&batch.asset) else {
                    continue;
                };
                if batch.instance_count == 0 || model.vertex_count() == 0 {
                    continue;
                }
                if self.draw_log.is_first_frame() {
                    for group in model.groups.iter() {
                        if batch.groups.admits(&group.material_name) {
                            self.draw_log
                                .record(&model.name, &group.material_name, &group.appearance);
                        }
                    }
                }
                render_pass.set_vertex_buffer(1, batch.instance_buffer.slice(..));
                render_pass.draw_model_instanced(model, &batch.groups, 0..batch.instance_count);
            }
        }
        self.draw_log.finish_frame();

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        true
    }
}

pub struct App {
    scene: SceneConfig,
    world: Option<World>,
    last_time: Instant,
}

impl App {
    pub fn new(scene: SceneConfig) -> Self {
        Self {
            scene,
            world: None,
            last_time: Instant::now(),
        }
    }
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    match grabbed {
        Ok(()) => window.set_cursor_visible(false),
        Err(e) => log::warn!("Could not grab the cursor: {}", e),
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.world.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes()
            .with_title(self.scene.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.scene.window.width,
                self.scene.window.height,
            ));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Could not create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match futures::executor::block_on(World::new(window, &self.scene)) {
            Ok(mut world) => {
                grab_cursor(world.ctx.window());
                let size = world.ctx.window().inner_size();
                world.resize(size.width, size.height);
                self.last_time = Instant::now();
                self.world = Some(world);
            }
            Err(e) => {
                log::error!("App initialization failed: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(world) = &mut self.world else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            world.ctx.camera.controller.handle_mouse(dx, dy);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(world) = &mut self.world else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => world.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if world.ctx.camera.controller.handle_key(code, state) {
                    return;
                }
                if state != ElementState::Pressed || repeat {
                    return;
                }
                match Action::for_key(code) {
                    Some(Action::ToggleCollision) => world.toggle_collision(),
                    Some(Action::ToggleFog) => world.toggle_fog(),
                    Some(Action::Exit) => event_loop.exit(),
                    None => (),
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                world.ctx.camera.controller.handle_scroll(&delta)
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                world.update(dt);

                // Reconfigure the surface if it's lost or outdated
                if !world.render() {
                    let size = world.ctx.window().inner_size();
                    world.resize(size.width, size.height);
                }
            }
            _ => {}
        }
    }
}

pub fn run(scene_path: &Path) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let scene = SceneConfig::load(scene_path)?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(scene);
    event_loop.run_app(&mut app)?;

    Ok(())
}

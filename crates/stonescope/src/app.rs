//! Application window and event loop management.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use pollster::FutureExt;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use stonescope_core::descriptor::SurfaceDescriptor;
use stonescope_core::material::GeometryKind;
use stonescope_core::session::{LoadRequest, SessionState};
use stonescope_core::state::{with_context, with_context_mut};
use stonescope_render::{screenshot, StoneRenderer};

use crate::loader::{self, LoadResult};

/// The stonescope application state.
pub struct App {
    descriptor: SurfaceDescriptor,
    kind: GeometryKind,
    window: Option<Arc<Window>>,
    renderer: Option<StoneRenderer>,
    result_tx: Sender<LoadResult>,
    result_rx: Receiver<LoadResult>,
    /// Session generation whose scene is currently on the GPU.
    uploaded_generation: Option<u64>,
    close_requested: bool,
    /// Frame budget derived from `Options::max_fps`; `None` is uncapped.
    frame_budget: Option<Duration>,
    last_frame: Option<Instant>,
    // Mouse state for camera control
    mouse_pos: (f64, f64),
    left_mouse_down: bool,
    right_mouse_down: bool,
    shift_down: bool,
    screenshot_counter: u32,
}

impl App {
    /// Creates an application that will display one product surface.
    #[must_use]
    pub fn new(descriptor: SurfaceDescriptor, kind: GeometryKind) -> Self {
        let (result_tx, result_rx) = channel();
        Self {
            descriptor,
            kind,
            window: None,
            renderer: None,
            result_tx,
            result_rx,
            uploaded_generation: None,
            close_requested: false,
            frame_budget: None,
            last_frame: None,
            mouse_pos: (0.0, 0.0),
            left_mouse_down: false,
            right_mouse_down: false,
            shift_down: false,
            screenshot_counter: 0,
        }
    }

    /// Begins (or restarts) loading the configured product.
    fn start_load(&mut self) {
        let descriptor = self.descriptor.clone();
        let kind = self.kind;
        let request = with_context_mut(|ctx| ctx.session.start(descriptor, kind));
        self.dispatch(request);
    }

    /// Routes a load request through the caches or to a worker thread.
    fn dispatch(&mut self, request: LoadRequest) {
        match request {
            LoadRequest::FetchTexture { generation, url } => {
                // Outer None: cache miss. Inner Option: the session's
                // follow-up request, absent for stale deliveries.
                let cached = with_context_mut(|ctx| {
                    let raster = ctx.texture_cache.get(&url).cloned()?;
                    log::debug!("texture cache hit for '{url}'");
                    Some(ctx.session.texture_loaded(generation, Ok(raster)))
                });
                match cached {
                    Some(Some(next)) => self.dispatch(next),
                    Some(None) => {}
                    None => loader::spawn_fetch(
                        LoadRequest::FetchTexture { generation, url },
                        self.kind,
                        self.result_tx.clone(),
                    ),
                }
            }
            LoadRequest::FetchGeometry { generation, path } => {
                let cached = with_context_mut(|ctx| {
                    let target = ctx.geometry_cache.get(&path).cloned()?;
                    log::debug!("geometry cache hit for '{path}'");
                    Some(ctx.session.geometry_loaded(generation, Ok(target)))
                });
                if cached.is_none() {
                    loader::spawn_fetch(
                        LoadRequest::FetchGeometry { generation, path },
                        self.kind,
                        self.result_tx.clone(),
                    );
                }
            }
        }
    }

    /// Drains completed fetches and advances the session.
    fn pump_load_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                LoadResult::Texture {
                    generation,
                    url,
                    result,
                } => {
                    if let Ok(raster) = &result {
                        let size = raster.approx_size_mb();
                        with_context_mut(|ctx| {
                            ctx.texture_cache.set(url.clone(), raster.clone(), size);
                        });
                    }
                    let next =
                        with_context_mut(|ctx| ctx.session.texture_loaded(generation, result));
                    if let Some(request) = next {
                        self.dispatch(request);
                    }
                }
                LoadResult::Geometry {
                    generation,
                    path,
                    result,
                } => {
                    if let Ok(target) = &result {
                        let size = loader::geometry_size_mb(target);
                        with_context_mut(|ctx| {
                            ctx.geometry_cache.set(path.clone(), target.clone(), size);
                        });
                    }
                    with_context_mut(|ctx| ctx.session.geometry_loaded(generation, result));
                }
            }
        }
    }

    /// Uploads the bound scene to the GPU once per session generation.
    fn sync_scene(&mut self) {
        let uploaded = self.uploaded_generation;
        let Some(renderer) = &mut self.renderer else {
            return;
        };
        let newly_uploaded = with_context(|ctx| {
            if ctx.session.state() != SessionState::Ready {
                return None;
            }
            let generation = ctx.session.generation();
            if uploaded == Some(generation) {
                return None;
            }
            let material = ctx.session.material()?;
            let geometry = ctx.session.geometry()?;
            renderer.set_scene(material, geometry);
            Some(generation)
        });
        if newly_uploaded.is_some() {
            self.uploaded_generation = newly_uploaded;
        }
    }

    fn render_frame(&mut self) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };
        if let Err(err) = renderer.render() {
            if err.is_fatal() {
                with_context_mut(|ctx| ctx.session.fatal(err.to_string()));
                self.close_requested = true;
            } else {
                log::debug!("skipped frame: {err}");
            }
        }
    }

    fn take_screenshot(&mut self) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };
        let filename = format!("screenshot_{:04}.png", self.screenshot_counter);
        match renderer.capture_frame() {
            Ok((pixels, width, height)) => {
                match screenshot::save_image(&filename, &pixels, width, height) {
                    Ok(()) => {
                        self.screenshot_counter += 1;
                        log::info!("saved {filename}");
                    }
                    Err(err) => log::error!("screenshot failed: {err}"),
                }
            }
            Err(err) => log::error!("frame capture failed: {err}"),
        }
    }

    /// Tears the session down and restarts the full pipeline. This is the
    /// only way out of the failed state.
    fn restart(&mut self) {
        with_context_mut(|ctx| ctx.session.reset());
        if let Some(renderer) = &mut self.renderer {
            renderer.clear_scene();
        }
        self.uploaded_generation = None;
        self.start_load();
    }

    fn toggle_fullscreen(&self) {
        if let Some(window) = &self.window {
            let next = match window.fullscreen() {
                Some(_) => None,
                None => Some(Fullscreen::Borderless(None)),
            };
            window.set_fullscreen(next);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let title = if self.descriptor.display_name.trim().is_empty() {
            "stonescope".to_string()
        } else {
            format!("stonescope - {}", self.descriptor.display_name)
        };
        let window_attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                with_context_mut(|ctx| ctx.session.fatal(format!("window creation: {err}")));
                event_loop.exit();
                return;
            }
        };

        let ([r, g, b], max_fps) =
            with_context(|ctx| (ctx.options.background_color, ctx.options.max_fps));
        let background = [f64::from(r), f64::from(g), f64::from(b), 1.0];
        self.frame_budget =
            (max_fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(max_fps)));
        match StoneRenderer::new_windowed(window.clone(), background).block_on() {
            Ok(renderer) => {
                self.window = Some(window);
                self.renderer = Some(renderer);
                self.start_load();
            }
            Err(err) => {
                // Context-level failure: no recovery short of a restart.
                with_context_mut(|ctx| ctx.session.fatal(err.to_string()));
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift_down = modifiers.state().shift_key();
            }
            WindowEvent::MouseInput { state, button, .. } => match (button, state) {
                (MouseButton::Left, ElementState::Pressed) => self.left_mouse_down = true,
                (MouseButton::Left, ElementState::Released) => self.left_mouse_down = false,
                (MouseButton::Right, ElementState::Pressed) => self.right_mouse_down = true,
                (MouseButton::Right, ElementState::Released) => self.right_mouse_down = false,
                _ => {}
            },
            WindowEvent::CursorMoved { position, .. } => {
                let delta_x = (position.x - self.mouse_pos.0) as f32;
                let delta_y = (position.y - self.mouse_pos.1) as f32;
                self.mouse_pos = (position.x, position.y);

                if let Some(renderer) = &mut self.renderer {
                    if self.left_mouse_down && !self.shift_down {
                        renderer.camera.orbit(delta_x * 0.01, delta_y * 0.01);
                    } else if self.right_mouse_down || (self.left_mouse_down && self.shift_down) {
                        let distance = (renderer.camera.position - renderer.camera.target).length();
                        let scale = distance * 0.001;
                        renderer.camera.pan(-delta_x * scale, delta_y * scale);
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                if let Some(renderer) = &mut self.renderer {
                    let distance = (renderer.camera.position - renderer.camera.target).length();
                    renderer.camera.zoom(scroll * distance * 0.1);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    match event.physical_key {
                        PhysicalKey::Code(KeyCode::Escape) => self.close_requested = true,
                        PhysicalKey::Code(KeyCode::KeyS) => self.take_screenshot(),
                        PhysicalKey::Code(KeyCode::KeyR) => self.restart(),
                        PhysicalKey::Code(KeyCode::KeyF) => self.toggle_fullscreen(),
                        _ => {}
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let (Some(budget), Some(last)) = (self.frame_budget, self.last_frame) {
                    let elapsed = last.elapsed();
                    if elapsed < budget {
                        std::thread::sleep(budget - elapsed);
                    }
                }
                self.last_frame = Some(Instant::now());

                self.pump_load_results();
                self.sync_scene();
                self.render_frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }

        if self.close_requested {
            event_loop.exit();
        }
    }
}

/// Runs the viewer application for one product surface. Blocks until the
/// window is closed.
pub fn run_app(descriptor: SurfaceDescriptor, kind: GeometryKind) {
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            with_context_mut(|ctx| ctx.session.fatal(format!("event loop creation: {err}")));
            return;
        }
    };
    let mut app = App::new(descriptor, kind);
    if let Err(err) = event_loop.run_app(&mut app) {
        with_context_mut(|ctx| ctx.session.fatal(format!("event loop: {err}")));
    }
}

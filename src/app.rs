//! Window and OpenGL context bootstrap.
//!
//! A winit event loop owns the window; glutin supplies the GL display,
//! context and surface; glow loads the function pointers. Each redraw runs
//! one [`FrameDriver`] frame and swaps with vsync.

use std::num::NonZeroU32;
use std::sync::Arc;

use glow::HasContext;
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::{config::DemoConfig, error::StartupError, frame::FrameDriver, render::AtlasScene};

/// Open the window and run frames until it is closed.
///
/// # Errors
///
/// Returns an error if the event loop, window, GL context or render state
/// cannot be created. Failures after the first frame are logged instead.
pub fn run(config: DemoConfig) -> Result<(), StartupError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        config,
        running: None,
        exit_state: Ok(()),
    };
    event_loop.run_app(&mut app)?;
    app.exit_state
}

struct App {
    config: DemoConfig,
    running: Option<Running>,
    exit_state: Result<(), StartupError>,
}

/// Everything that exists while the window is open.
///
/// Field order is drop order: GL objects go before the surface, the surface
/// before the context, and the window last.
struct Running {
    driver: FrameDriver<AtlasScene>,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

impl Running {
    fn new(event_loop: &ActiveEventLoop, config: &DemoConfig) -> Result<Self, StartupError> {
        let [width, height] = config.window_size;
        let window_attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(width, height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(event_loop, template, pick_config)
            .map_err(|err| StartupError::Display(err.to_string()))?;
        let window = window.ok_or(StartupError::MissingWindow)?;

        let raw_window_handle = window.window_handle()?.as_raw();
        let gl_display = gl_config.display();
        let (major, minor) = config.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(raw_window_handle));

        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }?;
        let surface_attributes = window.build_surface_attributes(Default::default())?;
        let gl_surface =
            unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }?;
        let gl_context = not_current.make_current(&gl_surface)?;

        if let Err(err) =
            gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
        {
            log::warn!("vsync unavailable: {err}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| gl_display.get_proc_address(symbol))
        };
        log::info!("OpenGL {}", unsafe { gl.get_parameter_string(glow::VERSION) });

        // The context stays current on this thread until `Running` is dropped.
        let scene = unsafe { AtlasScene::new(Arc::new(gl), config)? };

        Ok(Self {
            driver: FrameDriver::new(scene),
            gl_surface,
            gl_context,
            window,
        })
    }

    fn redraw(&mut self) -> Result<(), glutin::error::Error> {
        self.driver.frame();
        self.window.pre_present_notify();
        self.gl_surface.swap_buffers(&self.gl_context)
    }

    fn resize(&self, width: u32, height: u32) {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return;
        };
        self.gl_surface.resize(&self.gl_context, w, h);
        unsafe { self.driver.target().render_state().resize_viewport(width, height) };
        log::debug!("resized to {width}x{height}");
    }

    fn destroy(self) {
        let scene = self.driver.into_target();
        unsafe { scene.render_state().destroy() };
    }
}

/// Prefer the config with the fewest samples; the atlas is pixel art.
///
/// # Panics
///
/// Panics if the iterator is empty. glutin only calls the picker after it
/// has found at least one matching config, and the picker cannot report an
/// error, so an empty list is unreachable.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .min_by_key(GlConfig::num_samples)
        .expect("glutin offered no GL configs")
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match Running::new(event_loop, &self.config) {
            Ok(running) => {
                log::info!(
                    "window created: {}x{}",
                    self.config.window_size[0],
                    self.config.window_size[1]
                );
                self.running = Some(running);
            }
            Err(err) => {
                self.exit_state = Err(err);
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
        let Some(running) = self.running.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested, exiting");
                if let Some(running) = self.running.take() {
                    running.destroy();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => running.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                if let Err(err) = running.redraw() {
                    log::error!("failed to present frame: {err}");
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}

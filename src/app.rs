use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::error::{PanoramaError, Result};
use crate::gpu::GpuContext;
use crate::input::InputEvent;
use crate::renderer::PanoramaRenderer;
use crate::session::PanoramaSession;

/// Configuration for the viewer window.
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "panorama".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Open a window and run `session` until the window is closed.
///
/// # Example
/// ```no_run
/// use panorama::{PanoramaSession, SessionConfig};
///
/// let config = SessionConfig::from_file("tour.json")?;
/// panorama::run(PanoramaSession::from_config(config)?)?;
/// # Ok::<(), panorama::PanoramaError>(())
/// ```
pub fn run(session: PanoramaSession) -> Result<()> {
    run_with_config(AppConfig::default(), session)
}

/// Run a session with custom window configuration.
pub fn run_with_config(config: AppConfig, session: PanoramaSession) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PanoramaApp::Pending {
        config,
        session: Some(session),
    };
    event_loop.run_app(&mut app)?;

    match app {
        PanoramaApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

enum PanoramaApp {
    Pending {
        config: AppConfig,
        session: Option<PanoramaSession>,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        renderer: PanoramaRenderer,
        session: PanoramaSession,
        title: String,
        hovered_label: Option<String>,
        start_time: Instant,
    },
    Failed(PanoramaError),
}

impl PanoramaApp {
    fn start(
        event_loop: &ActiveEventLoop,
        config: &AppConfig,
        mut session: PanoramaSession,
    ) -> Result<Self> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(window.clone())?;

        let mut renderer = PanoramaRenderer::new(&gpu);
        session.resize(gpu.width(), gpu.height());
        renderer.load_scene(
            &gpu,
            session.graph().current_index(),
            session.current_scene(),
        );
        window.request_redraw();

        Ok(PanoramaApp::Running {
            window,
            gpu,
            renderer,
            session,
            title: config.title.clone(),
            hovered_label: None,
            start_time: Instant::now(),
        })
    }
}

impl ApplicationHandler for PanoramaApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let PanoramaApp::Pending { config, session } = self else {
            return;
        };
        let Some(session) = session.take() else {
            return;
        };

        *self = match PanoramaApp::start(event_loop, config, session) {
            Ok(running) => running,
            Err(err) => {
                log::error!("[app] {}", err);
                event_loop.exit();
                PanoramaApp::Failed(err)
            }
        };
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let PanoramaApp::Running {
            window,
            gpu,
            renderer,
            session,
            title,
            hovered_label,
            start_time,
        } = self
        else {
            return;
        };

        if let Some(input) = InputEvent::from_window_event(&event, session.cursor()) {
            session.handle_input(input, start_time.elapsed());
        }

        match event {
            WindowEvent::CloseRequested => {
                session.teardown();
                renderer.unload_scene();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
                session.resize(size.width, size.height);
            }
            WindowEvent::Focused(false) => {
                session.release_capture();
            }
            WindowEvent::RedrawRequested => {
                if session.is_torn_down() {
                    return;
                }
                let now = start_time.elapsed();

                if let Some(index) = session.advance(now) {
                    renderer.load_scene(gpu, index, session.current_scene());
                }

                let frame = session.frame();
                let hovered = session.hovered_hotspot();

                let label = session.hovered_label().map(str::to_owned);
                if label != *hovered_label {
                    match &label {
                        Some(text) => window.set_title(&format!("{} - {}", title, text)),
                        None => window.set_title(title.as_str()),
                    }
                    *hovered_label = label;
                }

                match renderer.render(gpu, &frame, hovered, session.overlay_alpha(now)) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        gpu.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("[app] surface out of memory, exiting");
                        session.teardown();
                        event_loop.exit();
                        return;
                    }
                    Err(err) => {
                        log::warn!("[app] skipped frame: {}", err);
                    }
                }

                window.request_redraw();
            }
            _ => {}
        }
    }
}

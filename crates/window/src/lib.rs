mod events;
pub mod raw_handle;

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info, trace};
use winit::{
    event::Event,
    event_loop::{ControlFlow, EventLoop},
    raw_window_handle::{DisplayHandle, HasDisplayHandle, HasWindowHandle, WindowHandle},
    window::{Window as WinitWindow, WindowBuilder},
};

pub use events::requests_exit;

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::from("Vulkan Path Tracer"),
            width: 800,
            height: 600,
        }
    }
}

pub struct Window {
    wind: WinitWindow,
    evt_loop: Option<EventLoop<()>>,
}

impl Window {
    pub fn new(config: &WindowConfig) -> Result<Window> {
        let evt_loop = match EventLoop::new() {
            Ok(evt_loop) => evt_loop,
            Err(e) => bail!("Could not create event loop: {}", e),
        };

        let window = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
            .with_resizable(false)
            .build(&evt_loop)
            .context("Failed to create window!")?;

        info!("Window \"{}\" created", config.title);

        Ok(Window {
            wind: window,
            evt_loop: Some(evt_loop),
        })
    }

    pub fn display_handle(&self) -> Result<DisplayHandle<'_>> {
        self.wind
            .display_handle()
            .map_err(|e| anyhow!("Could not retrieve display handle: {e:?}"))
    }

    pub fn window_handle(&self) -> Result<WindowHandle<'_>> {
        self.wind
            .window_handle()
            .map_err(|e| anyhow!("Could not retrieve window handle: {e:?}"))
    }

    /// Drawable size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        let size = self.wind.inner_size();
        (size.width, size.height)
    }

    /// Pumps window events until the window is closed.
    ///
    /// The window itself stays alive afterwards, so anything presenting to it
    /// can be torn down first.
    pub fn run(&mut self) -> Result<()> {
        let evt_loop = self
            .evt_loop
            .take()
            .context("Event loop has already been run")?;
        let window_id = self.wind.id();

        debug!("Entering event loop");
        evt_loop.run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);
            trace!("{event:?}");

            if let Event::WindowEvent {
                window_id: id,
                event,
            } = event
            {
                if id == window_id {
                    events::windowevents(&event, elwt);
                }
            }
        })?;
        debug!("Event loop finished");

        Ok(())
    }
}

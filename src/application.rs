use anyhow::Result;
use render::Vk;
use tracing::info;
use window::{raw_handle, Window};

use crate::config::Config;

/// The window and the Vulkan context presenting to it.
pub struct Application {
    // dropped before the window so the surface goes first
    vk: Vk,
    window: Window,
}

impl Application {
    pub fn new(config: &Config) -> Result<Self> {
        let window = Window::new(&config.window)?;

        let extensions =
            raw_handle::enumerate_required_extensions(window.display_handle()?, config.render.validation)?;

        let window_handle = window.window_handle()?;
        let display_handle = window.display_handle()?;
        let vk = Vk::new(
            &config.render,
            &extensions,
            |entry, instance| unsafe {
                raw_handle::create_surface(entry, instance, window_handle, display_handle, None)
            },
            window.size(),
        )?;

        Ok(Self { vk, window })
    }

    pub fn get_vk(&self) -> &Vk {
        &self.vk
    }

    pub fn run(mut self) -> Result<()> {
        info!("Running");
        self.window.run()?;
        info!("Shutting down");
        Ok(())
    }
}

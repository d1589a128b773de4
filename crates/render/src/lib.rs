//! Vulkan context bring-up: instance, debug messenger, surface, device,
//! queues and swapchain, created in that order and torn down in reverse.

pub mod config;
pub mod debug;
pub mod describe;
pub mod device;
pub mod instance;
pub mod queue_family;
pub mod surface;
pub mod swapchain;
pub mod utils;

use std::ffi::c_char;

use anyhow::{Context, Result};
use ash::{prelude::VkResult, vk, Device, Entry, Instance};
use tracing::{info, warn};

pub use config::RenderConfig;
pub use device::Queues;
pub use queue_family::{QueueFamilies, QueueFamilyIndices};
pub use surface::SurfaceInfo;
pub use swapchain::{SwapChain, SwapChainFrame};

use debug::DebugMessenger;

pub struct Vk {
    entry: Entry,
    instance: Instance,
    debug_messenger: Option<DebugMessenger>,
    surface: Option<SurfaceInfo>,
    physical_device: Option<vk::PhysicalDevice>,
    queue_families: Option<QueueFamilies>,
    device: Option<Device>,
    queues: Option<Queues>,
    swapchain: Option<SwapChain>,
}

impl Vk {
    /// Brings up the whole context.
    ///
    /// `extensions` are the instance extensions the window system needs, and
    /// `create_surface` makes the window's surface once the instance exists.
    /// Anything created before a failing step is destroyed again.
    pub fn new<F>(
        config: &RenderConfig,
        extensions: &[*const c_char],
        create_surface: F,
        size: (u32, u32),
    ) -> Result<Self>
    where
        F: FnOnce(&Entry, &Instance) -> VkResult<vk::SurfaceKHR>,
    {
        let entry = Entry::linked();
        let instance = instance::init(&entry, config, extensions)?;

        let mut vk = Vk {
            entry,
            instance,
            debug_messenger: None,
            surface: None,
            physical_device: None,
            queue_families: None,
            device: None,
            queues: None,
            swapchain: None,
        };

        if config.validation {
            vk.create_debug_messenger(config)?;
        }
        vk.create_surface(create_surface)?;
        vk.select_physical_device()?;
        vk.create_logical_device(config)?;
        vk.create_swapchain(size)?;

        info!("Vulkan context ready");
        Ok(vk)
    }

    fn create_debug_messenger(&mut self, config: &RenderConfig) -> Result<()> {
        let messenger = DebugMessenger::new(&self.entry, &self.instance, config.debug_severity)?;
        self.debug_messenger = Some(messenger);
        Ok(())
    }

    fn create_surface<F>(&mut self, create_surface: F) -> Result<()>
    where
        F: FnOnce(&Entry, &Instance) -> VkResult<vk::SurfaceKHR>,
    {
        let surface =
            create_surface(&self.entry, &self.instance).context("Could not create surface")?;
        self.surface = Some(SurfaceInfo::new(&self.entry, &self.instance, surface));
        info!("Surface created");
        Ok(())
    }

    fn select_physical_device(&mut self) -> Result<()> {
        let (physical_device, families) =
            device::select_physical_device(&self.instance, self.get_surface()?)?;

        self.physical_device = Some(physical_device);
        self.queue_families = Some(families);
        Ok(())
    }

    fn create_logical_device(&mut self, config: &RenderConfig) -> Result<()> {
        let families = self.get_queue_families()?;
        let device = device::create_logical_device(
            &self.instance,
            self.get_physical_device()?,
            families,
            config,
        )?;

        self.queues = Some(Queues::new(&device, families));
        self.device = Some(device);
        Ok(())
    }

    fn create_swapchain(&mut self, size: (u32, u32)) -> Result<()> {
        let swapchain = SwapChain::new(
            &self.instance,
            self.get_device()?,
            self.get_physical_device()?,
            self.get_surface()?,
            self.get_queue_families()?,
            size,
        )?;

        self.swapchain = Some(swapchain);
        Ok(())
    }

    pub fn get_entry(&self) -> &Entry {
        &self.entry
    }

    pub fn get_instance(&self) -> &Instance {
        &self.instance
    }

    pub fn get_surface(&self) -> Result<&SurfaceInfo> {
        self.surface.as_ref().context("Surface has not been created")
    }

    pub fn get_physical_device(&self) -> Result<vk::PhysicalDevice> {
        self.physical_device
            .context("Physical device has not been selected")
    }

    pub fn get_queue_families(&self) -> Result<QueueFamilies> {
        self.queue_families
            .context("Queue families have not been found")
    }

    pub fn get_device(&self) -> Result<&Device> {
        self.device.as_ref().context("Logical device has not been created")
    }

    pub fn get_queues(&self) -> Result<&Queues> {
        self.queues.as_ref().context("Queues have not been retrieved")
    }

    pub fn get_swapchain(&self) -> Result<&SwapChain> {
        self.swapchain
            .as_ref()
            .context("Swapchain has not been created")
    }
}

impl Drop for Vk {
    fn drop(&mut self) {
        unsafe {
            if let Some(device) = &self.device {
                if let Err(e) = device.device_wait_idle() {
                    warn!("Failed to wait device idle: {e}");
                }

                if let Some(mut swapchain) = self.swapchain.take() {
                    swapchain.destroy(device);
                }
            }

            self.queues = None;
            if let Some(device) = self.device.take() {
                device.destroy_device(None);
            }

            if let Some(mut surface) = self.surface.take() {
                surface.destroy();
            }

            if let Some(mut messenger) = self.debug_messenger.take() {
                messenger.destroy();
            }

            self.instance.destroy_instance(None);
        }
        info!("Vulkan context destroyed");
    }
}

use anyhow::{Context, Result};
use ash::{extensions::khr::Surface, vk, Entry, Instance};

use crate::queue_family::QueueFamilyIndices;

#[derive(Clone)]
pub struct SurfaceInfo {
    pub surface: vk::SurfaceKHR,
    pub surface_loader: Surface,
}

impl SurfaceInfo {
    pub fn new(entry: &Entry, instance: &Instance, surface: vk::SurfaceKHR) -> Self {
        Self {
            surface,
            surface_loader: Surface::new(entry, instance),
        }
    }

    pub fn find_queue_families(
        &self,
        instance: &Instance,
        device: vk::PhysicalDevice,
    ) -> Result<QueueFamilyIndices> {
        let families = unsafe { instance.get_physical_device_queue_family_properties(device) };

        QueueFamilyIndices::find(&families, |index| unsafe {
            self.surface_loader
                .get_physical_device_surface_support(device, index, self.surface)
                .context("Could not query surface support")
        })
    }

    /// # Safety
    ///
    /// Every swapchain created for this surface must already be destroyed.
    pub unsafe fn destroy(&mut self) {
        self.surface_loader.destroy_surface(self.surface, None);
        self.surface = vk::SurfaceKHR::null();
    }
}

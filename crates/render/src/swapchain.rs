use anyhow::{Context, Result};
use ash::{
    extensions::khr,
    vk::{self, CompositeAlphaFlagsKHR, ImageUsageFlags, SwapchainCreateInfoKHR},
    Device, Instance,
};
use tracing::{debug, info};

use crate::{
    describe::{composite_alpha_names, image_usage_names, present_mode_name, transform_names},
    queue_family::QueueFamilies,
    surface::SurfaceInfo,
};

pub struct SwapChainSupportDetail {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapChainSupportDetail {
    pub fn query(surface: &SurfaceInfo, physical_device: vk::PhysicalDevice) -> Result<Self> {
        let loader = &surface.surface_loader;
        unsafe {
            let capabilities = loader
                .get_physical_device_surface_capabilities(physical_device, surface.surface)
                .context("Failed to query for surface capabilites")?;

            let formats = loader
                .get_physical_device_surface_formats(physical_device, surface.surface)
                .context("Failed to query for surface formats")?;

            let present_modes = loader
                .get_physical_device_surface_present_modes(physical_device, surface.surface)
                .context("Failed to query for surface present modes.")?;

            Ok(Self {
                capabilities,
                formats,
                present_modes,
            })
        }
    }

    pub fn is_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }

    pub fn log(&self) {
        let caps = &self.capabilities;

        debug!("Swapchain can support the following capabilities:");
        debug!("Minimum image count {}", caps.min_image_count);
        debug!("Maximum image count {}", caps.max_image_count);
        debug!(
            "Current extent: {}x{}",
            caps.current_extent.width, caps.current_extent.height
        );
        debug!(
            "Minimum supported extent: {}x{}",
            caps.min_image_extent.width, caps.min_image_extent.height
        );
        debug!(
            "Maximum supported extent: {}x{}",
            caps.max_image_extent.width, caps.max_image_extent.height
        );
        debug!("Maximum image array layers: {}", caps.max_image_array_layers);
        debug!("Supported transforms: {:?}", transform_names(caps.supported_transforms));
        debug!("Current transform: {:?}", transform_names(caps.current_transform));
        debug!(
            "Supported alpha operations: {:?}",
            composite_alpha_names(caps.supported_composite_alpha)
        );
        debug!(
            "Supported image usage: {:?}",
            image_usage_names(caps.supported_usage_flags)
        );

        for format in &self.formats {
            debug!(
                "Supported pixel format: {:?}, color space: {:?}",
                format.format, format.color_space
            );
        }

        for mode in &self.present_modes {
            debug!("Supported present mode: {}", present_mode_name(*mode));
        }
    }
}

pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    formats
        .iter()
        .find(|format| {
            format.format == vk::Format::B8G8R8A8_UNORM
                && format.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        })
        .or_else(|| formats.first())
        .copied()
}

pub fn choose_present_mode(present_modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    // FIFO is the only mode the driver has to support
    if present_modes.contains(&vk::PresentModeKHR::MAILBOX) {
        vk::PresentModeKHR::MAILBOX
    } else {
        vk::PresentModeKHR::FIFO
    }
}

pub fn choose_extent(capabilities: &vk::SurfaceCapabilitiesKHR, width: u32, height: u32) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        capabilities.current_extent
    } else {
        let min = capabilities.min_image_extent;
        let max = capabilities.max_image_extent;

        vk::Extent2D {
            width: width.max(min.width).min(max.width),
            height: height.max(min.height).min(max.height),
        }
    }
}

/// One image over the minimum, capped at the maximum (0 means unbounded).
pub fn choose_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let image_count = capabilities.min_image_count + 1;

    if capabilities.max_image_count != 0 && image_count > capabilities.max_image_count {
        capabilities.max_image_count
    } else {
        image_count
    }
}

pub struct SwapChainFrame {
    pub image: vk::Image,
    pub image_view: vk::ImageView,
}

pub struct SwapChain {
    pub swapchain_loader: khr::Swapchain,
    pub swapchain: vk::SwapchainKHR,
    pub frames: Vec<SwapChainFrame>,
    pub swapchain_format: vk::Format,
    pub swapchain_extent: vk::Extent2D,
}

impl SwapChain {
    pub fn new(
        instance: &Instance,
        device: &Device,
        physical_device: vk::PhysicalDevice,
        surface: &SurfaceInfo,
        families: QueueFamilies,
        (width, height): (u32, u32),
    ) -> Result<Self> {
        let support = SwapChainSupportDetail::query(surface, physical_device)?;
        support.log();

        let surface_format =
            choose_surface_format(&support.formats).context("Surface reports no formats")?;
        let present_mode = choose_present_mode(&support.present_modes);
        let extent = choose_extent(&support.capabilities, width, height);
        let image_count = choose_image_count(&support.capabilities);

        let (image_sharing_mode, queue_family_indices) = families.sharing();

        let swap_chain_info = SwapchainCreateInfoKHR::builder()
            .surface(surface.surface)
            .min_image_count(image_count)
            .image_format(surface_format.format)
            .image_color_space(surface_format.color_space)
            .image_extent(extent)
            .image_usage(ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(image_sharing_mode)
            .queue_family_indices(&queue_family_indices)
            .pre_transform(support.capabilities.current_transform)
            .composite_alpha(CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(present_mode)
            .clipped(true)
            .image_array_layers(1)
            .old_swapchain(vk::SwapchainKHR::null());

        let swapchain_loader = khr::Swapchain::new(instance, device);

        let swapchain = unsafe {
            swapchain_loader
                .create_swapchain(&swap_chain_info, None)
                .context("Failed to create a Swapchain!")?
        };

        let mut swapchain = Self {
            swapchain_loader,
            swapchain,
            frames: vec![],
            swapchain_format: surface_format.format,
            swapchain_extent: extent,
        };

        // views made before a failure go away with the swapchain
        if let Err(e) = swapchain.create_frames(device) {
            unsafe { swapchain.destroy(device) };
            return Err(e);
        }

        info!(
            "Swapchain created: {} images, {:?}, {}x{}, {}",
            swapchain.frames.len(),
            swapchain.swapchain_format,
            extent.width,
            extent.height,
            present_mode_name(present_mode)
        );

        Ok(swapchain)
    }

    fn create_frames(&mut self, device: &Device) -> Result<()> {
        let images = unsafe {
            self.swapchain_loader
                .get_swapchain_images(self.swapchain)
                .context("Failed to get swapchain images!")?
        };

        for image in images {
            let imageview_create_info = vk::ImageViewCreateInfo::builder()
                .view_type(vk::ImageViewType::TYPE_2D)
                .format(self.swapchain_format)
                .components(vk::ComponentMapping {
                    r: vk::ComponentSwizzle::IDENTITY,
                    g: vk::ComponentSwizzle::IDENTITY,
                    b: vk::ComponentSwizzle::IDENTITY,
                    a: vk::ComponentSwizzle::IDENTITY,
                })
                .subresource_range(vk::ImageSubresourceRange {
                    aspect_mask: vk::ImageAspectFlags::COLOR,
                    base_mip_level: 0,
                    level_count: 1,
                    base_array_layer: 0,
                    layer_count: 1,
                })
                .image(image);

            let image_view = unsafe {
                device
                    .create_image_view(&imageview_create_info, None)
                    .context("Failed to create image view")?
            };

            self.frames.push(SwapChainFrame { image, image_view });
        }

        Ok(())
    }

    /// # Safety
    ///
    /// `device` must be the device the swapchain was created with, and none of
    /// its images may still be in use.
    pub unsafe fn destroy(&mut self, device: &Device) {
        for frame in self.frames.drain(..) {
            device.destroy_image_view(frame.image_view, None);
        }

        self.swapchain_loader
            .destroy_swapchain(self.swapchain, None);
        self.swapchain = vk::SwapchainKHR::null();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(format: vk::Format, color_space: vk::ColorSpaceKHR) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR {
            format,
            color_space,
        }
    }

    fn caps(current: (u32, u32), min: (u32, u32), max: (u32, u32)) -> vk::SurfaceCapabilitiesKHR {
        vk::SurfaceCapabilitiesKHR {
            current_extent: vk::Extent2D {
                width: current.0,
                height: current.1,
            },
            min_image_extent: vk::Extent2D {
                width: min.0,
                height: min.1,
            },
            max_image_extent: vk::Extent2D {
                width: max.0,
                height: max.1,
            },
            ..Default::default()
        }
    }

    #[test]
    fn prefers_bgra_unorm_srgb() {
        let formats = [
            format(vk::Format::R8G8B8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        ];

        assert_eq!(choose_surface_format(&formats), Some(formats[1]));
    }

    #[test]
    fn falls_back_to_first_format() {
        let formats = [
            format(vk::Format::R16G16B16A16_SFLOAT, vk::ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT),
            format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::DISPLAY_P3_NONLINEAR_EXT),
        ];

        assert_eq!(choose_surface_format(&formats), Some(formats[0]));
        assert_eq!(choose_surface_format(&[]), None);
    }

    #[test]
    fn mailbox_else_fifo() {
        assert_eq!(
            choose_present_mode(&[vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX]),
            vk::PresentModeKHR::MAILBOX
        );
        assert_eq!(
            choose_present_mode(&[vk::PresentModeKHR::IMMEDIATE]),
            vk::PresentModeKHR::FIFO
        );
        assert_eq!(choose_present_mode(&[]), vk::PresentModeKHR::FIFO);
    }

    #[test]
    fn current_extent_wins() {
        let c = caps((1024, 768), (1, 1), (4096, 4096));
        assert_eq!(
            choose_extent(&c, 800, 600),
            vk::Extent2D {
                width: 1024,
                height: 768
            }
        );
    }

    #[test]
    fn window_size_is_clamped_when_extent_is_undefined() {
        let c = caps((u32::MAX, u32::MAX), (200, 200), (1000, 500));

        assert_eq!(
            choose_extent(&c, 800, 600),
            vk::Extent2D {
                width: 800,
                height: 500
            }
        );
        assert_eq!(
            choose_extent(&c, 10, 10),
            vk::Extent2D {
                width: 200,
                height: 200
            }
        );
    }

    #[test]
    fn image_count() {
        let mut c = vk::SurfaceCapabilitiesKHR {
            min_image_count: 2,
            max_image_count: 8,
            ..Default::default()
        };
        assert_eq!(choose_image_count(&c), 3);

        c.max_image_count = 2;
        assert_eq!(choose_image_count(&c), 2);

        // no upper limit
        c.max_image_count = 0;
        assert_eq!(choose_image_count(&c), 3);
    }

    #[test]
    fn adequate_support_needs_formats_and_modes() {
        let mut support = SwapChainSupportDetail {
            capabilities: Default::default(),
            formats: vec![format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR)],
            present_modes: vec![],
        };
        assert!(!support.is_adequate());

        support.present_modes.push(vk::PresentModeKHR::FIFO);
        assert!(support.is_adequate());
    }
}

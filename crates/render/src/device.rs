use std::ffi::c_char;

use anyhow::{bail, Context, Result};
use ash::{
    extensions::khr::Swapchain,
    vk::{self, PhysicalDevice},
    Device, Instance,
};
use tracing::{debug, info, warn};

use crate::{
    config::RenderConfig,
    describe::device_type_name,
    queue_family::QueueFamilies,
    surface::SurfaceInfo,
    swapchain::SwapChainSupportDetail,
    utils::{cstr_to_string, missing, to_cstrings, vk_to_str},
};

pub struct Queues {
    pub graphics_queue: vk::Queue,
    pub present_queue: vk::Queue,
}

impl Queues {
    pub fn new(device: &Device, families: QueueFamilies) -> Self {
        unsafe {
            Self {
                graphics_queue: device.get_device_queue(families.graphics, 0),
                present_queue: device.get_device_queue(families.present, 0),
            }
        }
    }
}

pub fn get_swap_required_extensions() -> Vec<String> {
    [cstr_to_string(Swapchain::name())].to_vec()
}

/// Picks the best-scoring suitable device along with its queue families.
pub fn select_physical_device(
    instance: &Instance,
    surface: &SurfaceInfo,
) -> Result<(PhysicalDevice, QueueFamilies)> {
    info!("Choosing physical device...");

    let physical_devices = unsafe {
        instance
            .enumerate_physical_devices()
            .context("Could not enumerate physical devices")?
    };
    info!("Found {} devices with vulkan support", physical_devices.len());

    let mut best: Option<(u32, PhysicalDevice, QueueFamilies)> = None;

    for device in physical_devices {
        let props = unsafe { instance.get_physical_device_properties(device) };
        log_device_properties(&props);

        let Some(families) = is_device_suitable(instance, surface, device)? else {
            continue;
        };

        let score = rate_device_suitability(&props);
        debug!("Device scored {score}");

        if best.as_ref().map_or(true, |(top, _, _)| score > *top) {
            best = Some((score, device, families));
        }
    }

    let Some((_, device, families)) = best else {
        bail!("Could not find any suitable GPU!");
    };

    let props = unsafe { instance.get_physical_device_properties(device) };
    info!("Using {}", vk_to_str(&props.device_name));

    Ok((device, families))
}

fn log_device_properties(props: &vk::PhysicalDeviceProperties) {
    info!(
        "Device name: {}, type: {}",
        vk_to_str(&props.device_name),
        device_type_name(props.device_type)
    );
}

/// Returns the device's queue families when it can do everything we need.
fn is_device_suitable(
    instance: &Instance,
    surface: &SurfaceInfo,
    device: PhysicalDevice,
) -> Result<Option<QueueFamilies>> {
    debug!("Checking if device is suitable!");

    if !check_device_extension_support(instance, device)? {
        info!("Device can't support the requested extension!");
        return Ok(None);
    }

    let Some(families) = surface.find_queue_families(instance, device)?.resolve() else {
        info!("Device is missing a graphics or present queue family");
        return Ok(None);
    };

    if !SwapChainSupportDetail::query(surface, device)?.is_adequate() {
        info!("Device has no usable surface format or present mode");
        return Ok(None);
    }

    Ok(Some(families))
}

fn check_device_extension_support(instance: &Instance, device: PhysicalDevice) -> Result<bool> {
    let extensions: Vec<String> = unsafe {
        instance
            .enumerate_device_extension_properties(device)
            .context("Could not enumerate device extension properties")?
    }
    .iter()
    .map(|ext| vk_to_str(&ext.extension_name))
    .collect();

    debug!("Device can support extensions:");
    for ext in &extensions {
        debug!("\t{ext}");
    }

    let required = get_swap_required_extensions();
    debug!("Requesting device extensions: {required:?}");

    let absent = missing(&required, &extensions);
    if !absent.is_empty() {
        warn!("Device is missing extensions {absent:?}");
    }

    Ok(absent.is_empty())
}

pub fn rate_device_suitability(props: &vk::PhysicalDeviceProperties) -> u32 {
    let mut score: u32 = 0;

    // big plus that it's a GPU
    if props.device_type == vk::PhysicalDeviceType::DISCRETE_GPU {
        score += 1000;
    }

    // small plus that it's a integrated
    if props.device_type == vk::PhysicalDeviceType::INTEGRATED_GPU {
        score += 100;
    }

    score.saturating_add(props.limits.max_image_dimension2_d)
}

pub fn create_logical_device(
    instance: &Instance,
    p_dev: PhysicalDevice,
    families: QueueFamilies,
    config: &RenderConfig,
) -> Result<Device> {
    let queue_priority = [1.0_f32];

    let queue_infos: Vec<vk::DeviceQueueCreateInfo> = families
        .unique()
        .into_iter()
        .map(|family| {
            *vk::DeviceQueueCreateInfo::builder()
                .queue_family_index(family)
                .queue_priorities(&queue_priority)
        })
        .collect();

    let device_features = vk::PhysicalDeviceFeatures::default();

    let extensions = to_cstrings(&get_swap_required_extensions())?;
    let extensions: Vec<*const c_char> = extensions.iter().map(|s| s.as_ptr()).collect();

    // ignored by current loaders, kept for older implementations
    let layers = to_cstrings(&config.enabled_layers())?;
    let layers: Vec<*const c_char> = layers.iter().map(|s| s.as_ptr()).collect();

    let device_info = vk::DeviceCreateInfo::builder()
        .queue_create_infos(&queue_infos)
        .enabled_layer_names(&layers)
        .enabled_extension_names(&extensions)
        .enabled_features(&device_features);

    let device = unsafe {
        instance
            .create_device(p_dev, &device_info, None)
            .context("Device creation failed!")?
    };
    info!("GPU has been successfully abstracted!");

    Ok(device)
}

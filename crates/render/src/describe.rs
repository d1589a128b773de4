//! Readable names for the enums and flag sets that show up in bring-up logs.

use ash::vk::{
    self, CompositeAlphaFlagsKHR, DebugUtilsMessageTypeFlagsEXT, ImageUsageFlags,
    SurfaceTransformFlagsKHR,
};

const TRANSFORMS: [(SurfaceTransformFlagsKHR, &str); 9] = [
    (SurfaceTransformFlagsKHR::IDENTITY, "identity"),
    (SurfaceTransformFlagsKHR::ROTATE_90, "90 degree rotation"),
    (SurfaceTransformFlagsKHR::ROTATE_180, "180 degree rotation"),
    (SurfaceTransformFlagsKHR::ROTATE_270, "270 degree rotation"),
    (SurfaceTransformFlagsKHR::HORIZONTAL_MIRROR, "horizontal mirror"),
    (
        SurfaceTransformFlagsKHR::HORIZONTAL_MIRROR_ROTATE_90,
        "horizontal mirror, 90 degree rotation",
    ),
    (
        SurfaceTransformFlagsKHR::HORIZONTAL_MIRROR_ROTATE_180,
        "horizontal mirror, 180 degree rotation",
    ),
    (
        SurfaceTransformFlagsKHR::HORIZONTAL_MIRROR_ROTATE_270,
        "horizontal mirror, 270 degree rotation",
    ),
    (SurfaceTransformFlagsKHR::INHERIT, "inherited"),
];

const COMPOSITE_ALPHA: [(CompositeAlphaFlagsKHR, &str); 4] = [
    (CompositeAlphaFlagsKHR::OPAQUE, "opaque (alpha ignored)"),
    (
        CompositeAlphaFlagsKHR::PRE_MULTIPLIED,
        "pre multiplied (alpha expected to already be multiplied in image)",
    ),
    (
        CompositeAlphaFlagsKHR::POST_MULTIPLIED,
        "post multiplied (alpha will be applied during composition)",
    ),
    (CompositeAlphaFlagsKHR::INHERIT, "inherit"),
];

const IMAGE_USAGE: [(ImageUsageFlags, &str); 10] = [
    (ImageUsageFlags::TRANSFER_SRC, "transfer source"),
    (ImageUsageFlags::TRANSFER_DST, "transfer destination"),
    (ImageUsageFlags::SAMPLED, "sampled"),
    (ImageUsageFlags::STORAGE, "storage"),
    (ImageUsageFlags::COLOR_ATTACHMENT, "color attachment"),
    (
        ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT,
        "depth stencil attachment",
    ),
    (ImageUsageFlags::TRANSIENT_ATTACHMENT, "transient attachment"),
    (ImageUsageFlags::INPUT_ATTACHMENT, "input attachment"),
    (
        ImageUsageFlags::FRAGMENT_DENSITY_MAP_EXT,
        "fragment density map",
    ),
    (
        ImageUsageFlags::FRAGMENT_SHADING_RATE_ATTACHMENT_KHR,
        "fragment shading rate attachment",
    ),
];

pub fn transform_names(bits: SurfaceTransformFlagsKHR) -> Vec<&'static str> {
    TRANSFORMS
        .iter()
        .filter(|(flag, _)| bits.contains(*flag))
        .map(|(_, name)| *name)
        .collect()
}

pub fn composite_alpha_names(bits: CompositeAlphaFlagsKHR) -> Vec<&'static str> {
    COMPOSITE_ALPHA
        .iter()
        .filter(|(flag, _)| bits.contains(*flag))
        .map(|(_, name)| *name)
        .collect()
}

pub fn image_usage_names(bits: ImageUsageFlags) -> Vec<&'static str> {
    IMAGE_USAGE
        .iter()
        .filter(|(flag, _)| bits.contains(*flag))
        .map(|(_, name)| *name)
        .collect()
}

pub fn present_mode_name(mode: vk::PresentModeKHR) -> &'static str {
    match mode {
        vk::PresentModeKHR::IMMEDIATE => "immediate",
        vk::PresentModeKHR::MAILBOX => "mailbox",
        vk::PresentModeKHR::FIFO => "fifo",
        vk::PresentModeKHR::FIFO_RELAXED => "relaxed fifo",
        vk::PresentModeKHR::SHARED_DEMAND_REFRESH => "shared demand refresh",
        vk::PresentModeKHR::SHARED_CONTINUOUS_REFRESH => "shared continuous refresh",
        _ => "none/undefined",
    }
}

pub fn device_type_name(device_type: vk::PhysicalDeviceType) -> &'static str {
    match device_type {
        vk::PhysicalDeviceType::CPU => "CPU",
        vk::PhysicalDeviceType::DISCRETE_GPU => "Discrete GPU",
        vk::PhysicalDeviceType::INTEGRATED_GPU => "Integrated GPU",
        vk::PhysicalDeviceType::VIRTUAL_GPU => "Virtual GPU",
        _ => "Other",
    }
}

pub fn message_type_name(message_type: DebugUtilsMessageTypeFlagsEXT) -> &'static str {
    match message_type {
        DebugUtilsMessageTypeFlagsEXT::VALIDATION => "Validation",
        DebugUtilsMessageTypeFlagsEXT::PERFORMANCE => "Performance",
        DebugUtilsMessageTypeFlagsEXT::GENERAL => "General",
        _ => "Unknown",
    }
}

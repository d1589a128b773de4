use ash::vk::{self, DebugUtilsMessageSeverityFlagsEXT};

pub const VALIDATION_LAYERS: [&str; 1] = ["VK_LAYER_KHRONOS_validation"];

/// Settings for bringing up the Vulkan context.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub app_name: String,
    pub engine_name: String,
    /// Requested instance API version, as built by [`vk::make_api_version`].
    pub api_version: u32,
    /// Enables validation layers and the debug messenger.
    pub validation: bool,
    pub validation_layers: Vec<String>,
    pub debug_severity: DebugUtilsMessageSeverityFlagsEXT,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("Vulkan Path Tracer"),
            engine_name: String::from("VulkanPT"),
            api_version: vk::API_VERSION_1_0,
            validation: cfg!(debug_assertions),
            validation_layers: VALIDATION_LAYERS.iter().map(|l| l.to_string()).collect(),
            debug_severity: DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | DebugUtilsMessageSeverityFlagsEXT::WARNING
                | DebugUtilsMessageSeverityFlagsEXT::ERROR,
        }
    }
}

impl RenderConfig {
    /// Layers to enable, empty unless validation is on.
    pub fn enabled_layers(&self) -> Vec<String> {
        if self.validation {
            self.validation_layers.clone()
        } else {
            vec![]
        }
    }

    pub fn engine_version() -> u32 {
        vk::make_api_version(
            0,
            env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0),
            env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0),
            env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0),
        )
    }
}

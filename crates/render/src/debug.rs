use std::ffi::{c_void, CStr};

use anyhow::{Context, Result};
use ash::{
    extensions::ext::DebugUtils,
    vk::{self, DebugUtilsMessageSeverityFlagsEXT, DebugUtilsMessageTypeFlagsEXT},
    Entry, Instance,
};
use tracing::{debug, error, info, trace, warn};

use crate::describe::message_type_name;

pub struct DebugMessenger {
    messenger: vk::DebugUtilsMessengerEXT,
    loader: DebugUtils,
}

impl DebugMessenger {
    pub fn new(
        entry: &Entry,
        instance: &Instance,
        severity: DebugUtilsMessageSeverityFlagsEXT,
    ) -> Result<Self> {
        let loader = DebugUtils::new(entry, instance);
        let create_info = populate_debug_messenger_create_info(severity);

        let messenger = unsafe {
            loader
                .create_debug_utils_messenger(&create_info, None)
                .context("Debug utils messenger creation failed!")?
        };
        debug!("Debug messenger created");

        Ok(Self { messenger, loader })
    }

    /// # Safety
    ///
    /// The instance the messenger was created from must still be alive.
    pub unsafe fn destroy(&mut self) {
        self.loader
            .destroy_debug_utils_messenger(self.messenger, None);
        self.messenger = vk::DebugUtilsMessengerEXT::null();
    }
}

pub fn populate_debug_messenger_create_info(
    severity: DebugUtilsMessageSeverityFlagsEXT,
) -> vk::DebugUtilsMessengerCreateInfoEXT {
    *vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(severity)
        .message_type(
            DebugUtilsMessageTypeFlagsEXT::GENERAL
                | DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(vulkan_debug_utils_callback))
}

unsafe extern "system" fn vulkan_debug_utils_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    message_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut c_void,
) -> vk::Bool32 {
    if message_data.is_null() || (*message_data).p_message.is_null() {
        return vk::FALSE;
    }

    let message = CStr::from_ptr((*message_data).p_message).to_string_lossy();
    let m_type = message_type_name(message_type);

    match message_severity {
        DebugUtilsMessageSeverityFlagsEXT::ERROR => error!(target: "vulkan", "[{m_type}] {message}"),
        DebugUtilsMessageSeverityFlagsEXT::WARNING => warn!(target: "vulkan", "[{m_type}] {message}"),
        DebugUtilsMessageSeverityFlagsEXT::INFO => info!(target: "vulkan", "[{m_type}] {message}"),
        _ => trace!(target: "vulkan", "[{m_type}] {message}"),
    }

    vk::FALSE
}

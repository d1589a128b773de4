use std::ffi::{c_char, CStr, CString};

use anyhow::{bail, Context, Result};
use ash::{prelude::VkResult, vk, Entry, Instance};
use tracing::{debug, info, warn};

use crate::{
    config::RenderConfig,
    debug::populate_debug_messenger_create_info,
    utils::{cstr_to_string, missing, to_cstrings, vk_to_str},
};

/// Creates the instance with the window-system `extensions` plus whatever
/// validation needs.
pub fn init(entry: &Entry, config: &RenderConfig, extensions: &[*const c_char]) -> Result<Instance> {
    info!("Creating an instance");
    log_supported_version(entry);

    let app_name = CString::new(config.app_name.as_str())
        .context("Could not make the C String for the application")?;
    let engine_name = CString::new(config.engine_name.as_str())
        .context("Could not make the C String for the engine")?;

    let app_info = vk::ApplicationInfo::builder()
        .application_name(&app_name)
        .application_version(RenderConfig::engine_version())
        .engine_name(&engine_name)
        .engine_version(RenderConfig::engine_version())
        .api_version(config.api_version);

    let mut extension_names: Vec<String> = extensions
        .iter()
        .map(|ext| cstr_to_string(unsafe { CStr::from_ptr(*ext) }))
        .collect();
    let debug_utils = cstr_to_string(ash::extensions::ext::DebugUtils::name());
    if config.validation && !extension_names.contains(&debug_utils) {
        extension_names.push(debug_utils);
    }

    debug!("Extensions to be requested:");
    for name in &extension_names {
        debug!("\t{name}");
    }

    let layer_names = config.enabled_layers();
    check_support(entry, &extension_names, &layer_names)?;

    let extensions = to_cstrings(&extension_names)?;
    let extensions: Vec<*const c_char> = extensions.iter().map(|s| s.as_ptr()).collect();
    let layers = to_cstrings(&layer_names)?;
    let layers: Vec<*const c_char> = layers.iter().map(|s| s.as_ptr()).collect();

    let mut debug_info = populate_debug_messenger_create_info(config.debug_severity);
    let mut create_info = vk::InstanceCreateInfo::builder()
        .application_info(&app_info)
        .enabled_extension_names(&extensions)
        .enabled_layer_names(&layers);

    if config.validation {
        create_info = create_info.push_next(&mut debug_info);
    }

    let instance = unsafe {
        entry
            .create_instance(&create_info, None)
            .context("Failed to create Instance!")?
    };
    info!("Instance created");

    Ok(instance)
}

fn log_supported_version(entry: &Entry) {
    let version = supported_version(entry.try_enumerate_instance_version());

    info!(
        "System can support vulkan variant {}, {}.{}.{}",
        vk::api_version_variant(version),
        vk::api_version_major(version),
        vk::api_version_minor(version),
        vk::api_version_patch(version),
    );
}

/// Loaders older than 1.1 have no version query and only support 1.0.
fn supported_version(queried: VkResult<Option<u32>>) -> u32 {
    match queried {
        Ok(version) => version.unwrap_or(vk::API_VERSION_1_0),
        Err(e) => {
            warn!("Could not query the instance version: {e}");
            vk::API_VERSION_1_0
        }
    }
}

fn check_support(entry: &Entry, extensions: &[String], layers: &[String]) -> Result<()> {
    let supported_extensions: Vec<String> = entry
        .enumerate_instance_extension_properties(None)
        .context("Could not enumerate instance extension properties")?
        .iter()
        .map(|ext| vk_to_str(&ext.extension_name))
        .collect();

    debug!("This device can support the following extensions:");
    for ext in &supported_extensions {
        debug!("\t{ext}");
    }

    let supported_layers: Vec<String> = entry
        .enumerate_instance_layer_properties()
        .context("Failed to enumerate instance layers properties!")?
        .iter()
        .map(|layer| vk_to_str(&layer.layer_name))
        .collect();

    debug!("This device can support the following layers:");
    for layer in &supported_layers {
        debug!("\t{layer}");
    }

    let report = SupportReport::new(extensions, &supported_extensions, layers, &supported_layers);
    report.log();
    report.into_result()
}

/// What the loader is missing from a request.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SupportReport {
    requested_extensions: Vec<String>,
    requested_layers: Vec<String>,
    pub missing_extensions: Vec<String>,
    pub missing_layers: Vec<String>,
}

impl SupportReport {
    pub fn new(
        extensions: &[String],
        supported_extensions: &[String],
        layers: &[String],
        supported_layers: &[String],
    ) -> Self {
        Self {
            requested_extensions: extensions.to_vec(),
            requested_layers: layers.to_vec(),
            missing_extensions: missing(extensions, supported_extensions),
            missing_layers: missing(layers, supported_layers),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.missing_extensions.is_empty() && self.missing_layers.is_empty()
    }

    fn log(&self) {
        for ext in &self.requested_extensions {
            if self.missing_extensions.contains(ext) {
                warn!("Extension {ext} is not supported!");
            } else {
                debug!("Extension {ext} is supported!");
            }
        }

        for layer in &self.requested_layers {
            if self.missing_layers.contains(layer) {
                warn!("Layer {layer} is not supported!");
            } else {
                debug!("Layer {layer} is supported!");
            }
        }
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_supported() {
            return Ok(());
        }

        bail!(
            "Instance request not supported, missing extensions: {:?}, missing layers: {:?}",
            self.missing_extensions,
            self.missing_layers
        )
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Everything logged at WARN or above while `f` runs.
    fn warnings(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, f);

        let out = captured.0.lock().unwrap();
        String::from_utf8_lossy(&out).into_owned()
    }

    #[test]
    fn everything_available() {
        let report = SupportReport::new(
            &names(&["VK_KHR_surface"]),
            &names(&["VK_KHR_surface", "VK_KHR_xlib_surface"]),
            &names(&["VK_LAYER_KHRONOS_validation"]),
            &names(&["VK_LAYER_KHRONOS_validation"]),
        );

        assert!(report.is_supported());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn missing_layer_fails_with_its_name() {
        let report = SupportReport::new(
            &names(&["VK_KHR_surface"]),
            &names(&["VK_KHR_surface"]),
            &names(&["VK_LAYER_KHRONOS_validation"]),
            &[],
        );

        assert_eq!(report.missing_layers, names(&["VK_LAYER_KHRONOS_validation"]));
        assert!(report.missing_extensions.is_empty());

        let err = report.into_result().unwrap_err().to_string();
        assert!(err.contains("VK_LAYER_KHRONOS_validation"));
    }

    #[test]
    fn empty_request_is_supported() {
        assert!(SupportReport::new(&[], &[], &[], &[]).is_supported());
    }

    #[test]
    fn unsupported_names_are_warnings() {
        let report = SupportReport::new(
            &names(&["VK_KHR_surface", "VK_KHR_wayland_surface"]),
            &names(&["VK_KHR_surface"]),
            &names(&["VK_LAYER_KHRONOS_validation"]),
            &[],
        );

        let logged = warnings(|| report.log());

        assert!(logged.contains("WARN"));
        assert!(logged.contains("Extension VK_KHR_wayland_surface is not supported!"));
        assert!(logged.contains("Layer VK_LAYER_KHRONOS_validation is not supported!"));
        assert!(!logged.contains("VK_KHR_surface is"));
    }

    #[test]
    fn version_query_failure_falls_back_to_1_0() {
        let mut version = 0;
        let logged = warnings(|| {
            version = supported_version(Err(vk::Result::ERROR_OUT_OF_HOST_MEMORY));
        });

        assert_eq!(version, vk::API_VERSION_1_0);
        assert!(logged.contains("Could not query the instance version"));
    }

    #[test]
    fn reported_version_is_used() {
        let v1_3 = vk::make_api_version(0, 1, 3, 0);

        assert_eq!(supported_version(Ok(Some(v1_3))), v1_3);
        assert_eq!(supported_version(Ok(None)), vk::API_VERSION_1_0);
    }
}

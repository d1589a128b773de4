use std::ffi::{c_char, c_void};

use ash::{
    extensions::{ext::DebugUtils, khr},
    prelude::*,
    vk::{self, AllocationCallbacks},
    Entry, Instance,
};
use winit::raw_window_handle::{DisplayHandle, RawDisplayHandle, RawWindowHandle, WindowHandle};

/// Create a surface from a raw surface handle.
///
/// The instance must have been created with the extensions returned by
/// [`enumerate_required_extensions()`].
///
/// # Safety
///
/// In order for the created [`vk::SurfaceKHR`] to be valid for the duration of its
/// usage, the [`Instance`] this was called on must be dropped later than the
/// resulting [`vk::SurfaceKHR`].
pub unsafe fn create_surface(
    entry: &Entry,
    instance: &Instance,
    window_handle: WindowHandle,
    display_handle: DisplayHandle,
    alloc_clb: Option<&AllocationCallbacks>,
) -> VkResult<vk::SurfaceKHR> {
    match (window_handle.as_raw(), display_handle.as_raw()) {
        (RawWindowHandle::Win32(win), RawDisplayHandle::Windows(_)) => {
            let hinstance = win.hinstance.ok_or(vk::Result::ERROR_INITIALIZATION_FAILED)?;
            let surface_desc = vk::Win32SurfaceCreateInfoKHR::builder()
                .hinstance(hinstance.get() as *const c_void)
                .hwnd(win.hwnd.get() as *const c_void);
            let surface_fn = khr::Win32Surface::new(entry, instance);
            surface_fn.create_win32_surface(&surface_desc, alloc_clb)
        }
        (RawWindowHandle::Xlib(win), RawDisplayHandle::Xlib(display)) => {
            let dpy = display
                .display
                .ok_or(vk::Result::ERROR_INITIALIZATION_FAILED)?;
            let surface_desc = vk::XlibSurfaceCreateInfoKHR::builder()
                .dpy(dpy.as_ptr().cast())
                .window(win.window);
            let surface_fn = khr::XlibSurface::new(entry, instance);
            surface_fn.create_xlib_surface(&surface_desc, alloc_clb)
        }
        (RawWindowHandle::Xcb(win), RawDisplayHandle::Xcb(display)) => {
            let connection = display
                .connection
                .ok_or(vk::Result::ERROR_INITIALIZATION_FAILED)?;
            let surface_desc = vk::XcbSurfaceCreateInfoKHR::builder()
                .connection(connection.as_ptr())
                .window(win.window.get());
            let surface_fn = khr::XcbSurface::new(entry, instance);
            surface_fn.create_xcb_surface(&surface_desc, alloc_clb)
        }
        (RawWindowHandle::Wayland(win), RawDisplayHandle::Wayland(display)) => {
            let surface_desc = vk::WaylandSurfaceCreateInfoKHR::builder()
                .display(display.display.as_ptr())
                .surface(win.surface.as_ptr());
            let surface_fn = khr::WaylandSurface::new(entry, instance);
            surface_fn.create_wayland_surface(&surface_desc, alloc_clb)
        }
        _ => Err(vk::Result::ERROR_EXTENSION_NOT_PRESENT),
    }
}

/// Query the required instance extensions for creating a surface from a display handle.
///
/// This [`RawDisplayHandle`] can typically be acquired from a window, but is usually also
/// accessible earlier through an "event loop" concept to allow querying required instance
/// extensions and creation of a compatible Vulkan instance prior to creating a window.
///
/// `VK_EXT_debug_utils` is added when `validation` is set.
pub fn enumerate_required_extensions(
    display_handle: DisplayHandle,
    validation: bool,
) -> VkResult<Vec<*const c_char>> {
    let platform = match display_handle.as_raw() {
        RawDisplayHandle::Windows(_) => khr::Win32Surface::name(),
        RawDisplayHandle::Wayland(_) => khr::WaylandSurface::name(),
        RawDisplayHandle::Xlib(_) => khr::XlibSurface::name(),
        RawDisplayHandle::Xcb(_) => khr::XcbSurface::name(),
        _ => return Err(vk::Result::ERROR_EXTENSION_NOT_PRESENT),
    };

    let mut extensions = vec![khr::Surface::name().as_ptr(), platform.as_ptr()];

    if validation {
        extensions.push(DebugUtils::name().as_ptr());
    }

    Ok(extensions)
}

#[cfg(test)]
mod tests {
    use std::{ffi::CStr, ptr::NonNull};

    use winit::raw_window_handle::{WaylandDisplayHandle, WebDisplayHandle, XlibDisplayHandle};

    use super::*;

    fn names(extensions: &[*const c_char]) -> Vec<String> {
        extensions
            .iter()
            .map(|ext| unsafe { CStr::from_ptr(*ext) }.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn wayland_extensions() {
        let raw = RawDisplayHandle::Wayland(WaylandDisplayHandle::new(NonNull::dangling()));
        let display = unsafe { DisplayHandle::borrow_raw(raw) };

        let extensions = enumerate_required_extensions(display, false).unwrap();
        assert_eq!(
            names(&extensions),
            vec!["VK_KHR_surface", "VK_KHR_wayland_surface"]
        );
    }

    #[test]
    fn validation_adds_debug_utils() {
        let raw = RawDisplayHandle::Xlib(XlibDisplayHandle::new(None, 0));
        let display = unsafe { DisplayHandle::borrow_raw(raw) };

        let extensions = enumerate_required_extensions(display, true).unwrap();
        assert_eq!(
            names(&extensions),
            vec!["VK_KHR_surface", "VK_KHR_xlib_surface", "VK_EXT_debug_utils"]
        );
    }

    #[test]
    fn unsupported_display() {
        let raw = RawDisplayHandle::Web(WebDisplayHandle::new());
        let display = unsafe { DisplayHandle::borrow_raw(raw) };

        assert_eq!(
            enumerate_required_extensions(display, true).unwrap_err(),
            vk::Result::ERROR_EXTENSION_NOT_PRESENT
        );
    }
}

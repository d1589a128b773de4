use std::ffi::{c_char, CStr, CString};

use anyhow::{Context, Result};

/// Converts a fixed-size, nul-terminated name array from a Vulkan properties struct.
pub fn vk_to_str(raw: &[c_char]) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .take_while(|c| **c != 0)
        .map(|c| *c as u8)
        .collect();

    String::from_utf8_lossy(&bytes).into_owned()
}

/// Owned C strings for a list of names, kept alive while their pointers are in use.
pub fn to_cstrings(names: &[String]) -> Result<Vec<CString>> {
    names
        .iter()
        .map(|name| CString::new(name.as_str()).with_context(|| format!("Invalid name {name:?}")))
        .collect()
}

pub fn cstr_to_string(name: &CStr) -> String {
    name.to_string_lossy().into_owned()
}

/// Names from `requested` that are not in `available`, in request order.
pub fn missing(requested: &[String], available: &[String]) -> Vec<String> {
    requested
        .iter()
        .filter(|name| !available.contains(name))
        .cloned()
        .collect()
}

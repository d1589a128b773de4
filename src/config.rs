use render::RenderConfig;
use tracing::warn;
use window::WindowConfig;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub window: WindowConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Defaults, overridden by `VKPT_VALIDATION`, `VKPT_WIDTH`, `VKPT_HEIGHT` and `VKPT_TITLE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup("VKPT_VALIDATION") {
            match parse_flag(&value) {
                Some(flag) => config.render.validation = flag,
                None => warn!("Ignoring VKPT_VALIDATION={value:?}"),
            }
        }

        for (key, target) in [
            ("VKPT_WIDTH", &mut config.window.width),
            ("VKPT_HEIGHT", &mut config.window.height),
        ] {
            if let Some(value) = lookup(key) {
                match value.trim().parse::<u32>() {
                    Ok(v) if v > 0 => *target = v,
                    _ => warn!("Ignoring {key}={value:?}"),
                }
            }
        }

        if let Some(title) = lookup("VKPT_TITLE") {
            config.window.title = title;
        }

        config
    }
}

pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn flags() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" On "), Some(true));
        assert_eq!(parse_flag("FALSE"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn no_overrides_gives_defaults() {
        let config = Config::from_lookup(lookup(&[]));

        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.render.validation, cfg!(debug_assertions));
    }

    #[test]
    fn overrides_apply() {
        let config = Config::from_lookup(lookup(&[
            ("VKPT_VALIDATION", "off"),
            ("VKPT_WIDTH", "1920"),
            ("VKPT_HEIGHT", "1080"),
            ("VKPT_TITLE", "test"),
        ]));

        assert!(!config.render.validation);
        assert_eq!((config.window.width, config.window.height), (1920, 1080));
        assert_eq!(config.window.title, "test");
    }

    #[test]
    fn bad_values_are_ignored() {
        let config = Config::from_lookup(lookup(&[("VKPT_WIDTH", "wide"), ("VKPT_HEIGHT", "0")]));

        assert_eq!((config.window.width, config.window.height), (800, 600));
    }
}

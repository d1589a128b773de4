pub mod application;
pub mod config;

pub mod prelude {
    pub use crate::{application::Application, config::Config};
    pub use render::{RenderConfig, Vk};
    pub use window::{Window, WindowConfig};
}

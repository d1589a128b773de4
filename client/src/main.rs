use tracing_subscriber::EnvFilter;
use vulkan_pt::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    let app = Application::new(&config)?;
    app.run()
}

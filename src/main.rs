use vigil::{model::register_ort, monitor::Monitor, result::Result, setting::Config};

fn main() -> Result<()> {
    vigil::tracing::init("vigil", "info")?;
    // Get Config
    let config = Config::get()?;
    // Register Models
    register_ort(&config.detector)?;
    // Capture loop
    Monitor::new(config)?.run()
}

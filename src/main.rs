mod app;

use std::thread;
use std::time::Duration;

use hourglass_sand::Config;
use tracing_subscriber::EnvFilter;

const FRAME_TIME: Duration = Duration::from_millis(16);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "hourglass.toml".to_string());
    let config = Config::load_or_default(&config_path)?;

    let mut app = app::App::new(&config)?;
    while app.is_running() {
        app.input();
        app.update()?;
        thread::sleep(FRAME_TIME);
    }
    Ok(())
}

//! Opens the demo window and renders the tile atlas until it is closed.

use tile_atlas_glow::DemoConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DemoConfig::default();
    log::info!("starting, sprite sheet at {}", config.sheet_path.display());

    if let Err(err) = tile_atlas_glow::run(config) {
        log::error!("startup failed: {err}");
        std::process::exit(1);
    }
}

use hireos_gallery::app::{self, AppConfig};

use env_logger::{Builder, Target};
use log::LevelFilter;

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("hireos_gallery", LevelFilter::Debug)
        .init();
}

fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let config = AppConfig::from_environment();
    log::info!(
        "Starting gallery host with {} items",
        config.gallery.resolved_items().len()
    );

    app::application(config)
        .run()
        .map_err(|e| anyhow::anyhow!("gallery window failed: {e}"))
}

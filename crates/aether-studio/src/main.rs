mod app;
mod camera;
mod config;
mod controls;
mod picking;

use aether_engine::device::GpuInit;
use aether_engine::logging::init_logging;
use aether_engine::window::Runtime;

use crate::app::StudioApp;
use crate::config::StudioConfig;

fn main() -> anyhow::Result<()> {
    let config = StudioConfig::default();
    init_logging(config.logging.clone());

    log::info!("left drag: paint | right drag: look | WASD/Space/Shift: fly");
    log::info!("1-5/Q: style | Home/End: size | C: color | Z/Y: undo/redo | X: drop redo");
    log::info!("F: smooth | R: reverse | Backspace: pop point | arrows/PgUp/PgDn: move/scale");
    log::info!("G: duplicate | M: merge | Delete: clear | Esc: quit");

    Runtime::run(config.window.clone(), GpuInit::default(), StudioApp::new(config))
}

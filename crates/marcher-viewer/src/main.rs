use anyhow::Result;

use marcher_engine::device::GpuInit;
use marcher_engine::logging::{LoggingConfig, init_logging};
use marcher_engine::scene::{MeshData, SceneConfig};
use marcher_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("controls: drag to orbit, Up/Down change shape, M toggles mode, Esc quits");

    Runtime::run(
        RuntimeConfig::default(),
        GpuInit::default(),
        SceneConfig::default(),
        MeshData::cube(10.0),
    )
}

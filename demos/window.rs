//=========================================================================
// Window Demo
//
// Opens a resizable window, logs core events and quits on Escape.
//
//   RUST_LOG=debug cargo run --example window
//
//=========================================================================

use aetheric_platform::prelude::*;
use log::info;

fn main() -> Result<(), PlatformError> {
    env_logger::init();

    let config = CoreBuilder::new()
        .with_title("Aetheric Platform Demo")
        .with_resolution(1024, 768)
        .with_resizable(true)
        .with_aa_level(4)
        .build();

    let mut core = Core::native(config)?;
    let events = core.subscribe();

    info!("Clipboard supported: {}", core.clipboard_supported());
    for mode in core.video_modes().iter().take(5) {
        info!("Video mode {}x{}", mode.width, mode.height);
    }

    while core.system_update() {
        for event in events.try_iter() {
            info!("Core event: {:?}", event);
        }

        if core.input().key_state(KeyCode::Escape) {
            break;
        }
        core.input_mut().drain_events();

        core.render()?;
    }

    core.shutdown();
    Ok(())
}

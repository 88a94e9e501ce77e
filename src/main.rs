//! Application entry point: record one second to `test.wav`.
//!
//! # Startup sequence
//!
//! 1. Initialise logging (`RUST_LOG` overrides the `info` default).
//! 2. Build a [`Recorder`] with the fixed default profile.
//! 3. Capture from the default input device via [`CpalSource`].
//! 4. Write the WAV file, overwriting any existing one.

use anyhow::Context;
use wav_recorder::{audio::CpalSource, config::RecorderConfig, Recorder};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let recorder = Recorder::new(RecorderConfig::default())?;
    let mut source = CpalSource::new();

    let summary = recorder
        .run(&mut source)
        .map_err(|e| {
            log::error!("recording failed: {}", e.kind());
            e
        })
        .with_context(|| {
            format!(
                "recording to {} failed",
                recorder.config().output.path.display()
            )
        })?;

    log::info!(
        "Saved {:.2}s of audio to {}",
        summary.duration_secs,
        summary.path.display()
    );
    Ok(())
}

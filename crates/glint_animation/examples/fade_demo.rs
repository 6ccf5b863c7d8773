//! Fade Demo
//!
//! Drives a fade, a glow, a move and a shared timer from a manual frame loop
//! and logs the element state as it changes.
//!
//! Run with: cargo run -p glint_animation --example fade_demo
//! Set `RUST_LOG=glint_animation=trace` to see registry activity.

use glint_animation::{EffectCategory, EffectScheduler, EffectsConfig};
use glint_core::{Color, Element, Vec2};

const FRAME: f32 = 1.0 / 60.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = EffectsConfig::from_toml_str("target_fps = 60\n")?;
    let scheduler = EffectScheduler::with_config(config);
    let handle = scheduler.handle();

    let banner = Element::new("banner").with_color(Color::WHITE).into_ref();
    let badge = Element::new("badge").with_color(Color::BLUE).into_ref();

    // Fade the banner to red while sliding it across
    let fade = handle.fade(&banner, 0.5, Color::RED)?;
    let slide = handle.set_position(&banner, Vec2::new(200.0, 0.0), 0.5)?;
    let mut frames = 0;
    while fade.is_waiting() || slide.is_waiting() {
        scheduler.tick_with_delta(FRAME);
        frames += 1;
        if frames % 10 == 0 {
            tracing::info!(frames, color = ?banner.color(), position = ?banner.position(), "banner");
        }
    }
    tracing::info!(frames, "banner settled");

    // Pulse the badge for as long as its timer runs, nudging the timer once
    handle.glow(&badge, 0.25, 0.4)?;
    let timer = handle.create_timer(1.0, &badge)?;
    let mut nudged = false;
    frames = 0;
    while timer.is_waiting() {
        scheduler.tick_with_delta(FRAME);
        frames += 1;
        if !nudged && timer.elapsed() >= 0.5 {
            timer.extend_by(0.5)?;
            nudged = true;
            tracing::info!(elapsed = timer.elapsed(), "timer extended");
        }
    }
    handle.stop_glowing(&badge)?;
    tracing::info!(
        frames,
        alpha = badge.color().a,
        glowing = handle.is_glowing(&badge),
        "badge glow stopped"
    );

    // Fade out and disable once done
    let out = handle.fade_out(&banner, 0.25)?;
    handle.disable_after(out, &banner)?;
    while scheduler.tick_with_delta(FRAME) {}
    tracing::info!(
        active = banner.is_active_and_enabled(),
        running = handle.is_running(&banner, EffectCategory::Color),
        "banner hidden"
    );

    Ok(())
}

// What you SEE:
// • A dark window with a blue block in it and the hero sprite (or a
//   magenta/black checkerboard if assets/hero.bmp can't be loaded).
// • Arrow keys move the hero. Over the block it turns red but keeps moving.
// • A steady 256 Hz tone plays unless --mute is given. ESC quits.

use clap::Parser;
use tracing::info;

use stranger_engine::asset::load_or_placeholder;
use stranger_engine::audio::CpalSink;
use stranger_engine::clock::SystemTimer;
use stranger_engine::config::Config;
use stranger_engine::engine::Engine;
use stranger_engine::error::Error;
use stranger_engine::window::Drawer;

fn setup_logging(config: &Config) {
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .compact()
        .init();
}

fn main() -> Result<(), Error> {
    let config = Config::parse();
    setup_logging(&config);
    info!("starting {}", config.title);

    /* --- Window + sprite ---
       Visual: window opens; the sprite is ready before the first frame. */
    let mut drawer = Drawer::new(&config.title, config.width, config.height)?;
    let hero = load_or_placeholder(config.sprite.as_deref());

    let mut engine = Engine::new(&config, hero, SystemTimer::new());

    /* --- Audio device ---
       Audible: nothing until the engine prefills the ring and starts it. */
    let mut sink = if config.mute {
        None
    } else {
        Some(CpalSink::open(config.sample_rate, engine.sound.buffer_size)?)
    };

    engine.run(&mut drawer, sink.as_mut())?;

    info!("shutting down");
    Ok(())
}

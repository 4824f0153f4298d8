mod app;
mod display;
mod input;
mod options;
mod pacer;
mod render;
mod settings;
mod snake;

use macroquad::prelude::*;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use app::{App, Command};
use display::Display;
use input::InputLatch;
use settings::Settings;

static STARTUP_SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Settings read once from disk, shared by the window config and the game.
fn startup_settings() -> Settings {
    *STARTUP_SETTINGS.get_or_init(Settings::load)
}

// Runs before `main`, so the logger has to exist by then.
fn window_conf() -> Conf {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    display::window_conf(&startup_settings())
}

/// Monotonic milliseconds since startup.
fn now_ms() -> u64 {
    (get_time() * 1000.0) as u64
}

fn startup_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

#[macroquad::main(window_conf)]
async fn main() {
    let settings = startup_settings();
    let mut display = Display::new(&settings);
    let mut app = App::new(settings, startup_seed(), now_ms());
    let mut input = InputLatch::default();

    loop {
        input.poll();

        match app.frame(now_ms(), &mut input) {
            Some(Command::Quit) => break,
            Some(Command::Reconfigure(applied)) => {
                display.apply(&applied);
                applied.save();
            }
            None => {}
        }

        display.begin();
        render::draw(&app, get_time());
        display.present();

        next_frame().await;
    }
}

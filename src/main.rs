//! Gopherland host
//!
//! Opens the window, loads config, map and sprite sheet, then drives the
//! simulation at a fixed 60 ticks per second and draws the result.

use gopherland::game::{draw_hud, draw_world, Game, GameConfig, TickInput};
use gopherland::world::parse_map_data;
use gopherland::VERSION;
use macroquad::prelude::*;

const CONFIG_PATH: &str = "data/config.ron";

/// Fixed simulation step
const TICK_SECONDS: f64 = 1.0 / 60.0;

/// Ticks run per frame at most; the backlog is dropped past that
const MAX_TICKS_PER_FRAME: u32 = 5;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Gopherland v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Config from `data/config.ron`, defaults when the file is missing
async fn load_config() -> Result<GameConfig, Box<dyn std::error::Error>> {
    match load_file(CONFIG_PATH).await {
        Ok(bytes) => {
            let text = String::from_utf8(bytes)?;
            let config = GameConfig::from_ron(&text)?;
            log::info!("Loaded config {}", CONFIG_PATH);
            Ok(config)
        }
        Err(e) => {
            log::warn!("No config at {} ({}), using defaults", CONFIG_PATH, e);
            Ok(GameConfig::default())
        }
    }
}

async fn load_game(config: &GameConfig) -> Result<Game, Box<dyn std::error::Error>> {
    let bytes = load_file(&config.map_path).await?;
    let map = parse_map_data(&bytes)?;
    log::info!("Loaded map {} ({}x{})", config.map_path, map.width(), map.height());
    Ok(Game::from_config(config, map)?)
}

fn read_input() -> TickInput {
    TickInput {
        left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
        right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
        jump: is_key_down(KeyCode::Space) || is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
        descend: is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
    }
}

fn report_events(game: &Game) {
    for event in game.events.item_collected.iter() {
        log::info!("Picked up {:?} at ({}, {})", event.kind, event.col, event.row);
    }
    for event in game.events.door_opened.iter() {
        log::info!("Door opened at ({}, {})", event.col, event.row);
    }
}

/// Keep the window open with the error on screen
async fn show_fatal(message: String) {
    loop {
        clear_background(Color::from_rgba(30, 10, 10, 255));
        draw_text("Failed to start:", 24.0, 48.0, 32.0, WHITE);
        draw_text(&message, 24.0, 88.0, 24.0, LIGHTGRAY);
        if is_key_pressed(KeyCode::Escape) {
            return;
        }
        next_frame().await;
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Crash logging first, before anything can panic
    #[cfg(not(target_arch = "wasm32"))]
    {
        crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let config = match load_config().await {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid config {}: {}", CONFIG_PATH, e);
            show_fatal(format!("config {}: {}", CONFIG_PATH, e)).await;
            return;
        }
    };

    let mut game = match load_game(&config).await {
        Ok(game) => game,
        Err(e) => {
            log::error!("Could not start game: {}", e);
            show_fatal(e.to_string()).await;
            return;
        }
    };

    let sheet = match load_texture(&config.sprite_sheet).await {
        Ok(texture) => {
            texture.set_filter(FilterMode::Nearest);
            Some(texture)
        }
        Err(e) => {
            log::warn!("No sprite sheet at {} ({}), drawing flat tiles", config.sprite_sheet, e);
            None
        }
    };

    let mut accumulator = 0.0f64;
    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        accumulator += get_frame_time() as f64;
        let input = read_input();

        let mut steps = 0;
        while accumulator >= TICK_SECONDS && steps < MAX_TICKS_PER_FRAME {
            game.tick(input);
            report_events(&game);
            accumulator -= TICK_SECONDS;
            steps += 1;
        }
        if steps == MAX_TICKS_PER_FRAME {
            accumulator = 0.0;
        }

        draw_world(&game, sheet.as_ref());
        draw_hud(&game);

        next_frame().await;
    }

    log::info!("Bye after {} ticks", game.ticks());
}

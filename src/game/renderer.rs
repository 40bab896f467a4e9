//! Game Renderer
//!
//! Draws the tile map, the player and the HUD with macroquad. Reads the
//! game state only; nothing here feeds back into the simulation.
//!
//! Tiles come from the sprite sheet when one is loaded, otherwise each
//! block gets a flat color by solidity and kind.

use macroquad::prelude::*;
use crate::world::{Block, BlockKind, Solidity, AIR};
use super::player::{Direction, Item, Player};
use super::runtime::{Game, SPAWN_MARKER};

/// On-screen size of one tile
pub const TILE_PX: f32 = 48.0;

/// Simulation ticks per animation frame
const ANIMATION_TICKS: u64 = 8;

const BACKGROUND: Color = Color::new(0.36, 0.58, 0.85, 1.0);

/// Screen offset of the map origin so the focus point sits mid-screen,
/// clamped so the view never shows past the map edges. Maps smaller than
/// the view are centred.
pub fn camera_offset(focus: (f64, f64), map_size: (usize, usize), view: (f32, f32), tile_px: f32) -> (f32, f32) {
    let axis = |focus: f64, cells: usize, view: f32| {
        let world = cells as f32 * tile_px;
        if world <= view {
            (view - world) * 0.5
        } else {
            (view * 0.5 - focus as f32 * tile_px).clamp(view - world, 0.0)
        }
    };
    (axis(focus.0, map_size.0, view.0), axis(focus.1, map_size.1, view.1))
}

/// Flat color for a block when there is no sprite sheet
fn fallback_color(block: &Block) -> Color {
    match (block.kind, block.solidity) {
        (BlockKind::Currency(_), _) => GOLD,
        (BlockKind::KeyItem, _) => ORANGE,
        (BlockKind::DoorClosed { .. }, _) => Color::from_rgba(110, 60, 30, 255),
        (BlockKind::DoorOpen, _) => Color::from_rgba(60, 35, 20, 255),
        (_, Solidity::Solid) => Color::from_rgba(105, 100, 95, 255),
        (_, Solidity::Platform) => Color::from_rgba(150, 105, 60, 255),
        (_, Solidity::NotSolid) => Color::from_rgba(70, 120, 70, 255),
    }
}

fn draw_block(sheet: Option<&Texture2D>, block: &Block, x: f32, y: f32, tick: u64, flip_x: bool) {
    match (sheet, block.frame(tick)) {
        (Some(texture), Some(frame)) => {
            draw_texture_ex(
                texture,
                x,
                y,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(TILE_PX, TILE_PX)),
                    source: Some(Rect::new(
                        frame.x1 as f32,
                        frame.y1 as f32,
                        frame.width() as f32,
                        frame.height() as f32,
                    )),
                    flip_x,
                    ..Default::default()
                },
            );
        }
        _ => {
            // Collectables drawn smaller so they read as pickups
            let inset = if block.collectable { TILE_PX * 0.3 } else { 0.0 };
            draw_rectangle(x + inset, y + inset, TILE_PX - inset * 2.0, TILE_PX - inset * 2.0, fallback_color(block));
        }
    }
}

/// Draw the map and the player
pub fn draw_world(game: &Game, sheet: Option<&Texture2D>) {
    clear_background(BACKGROUND);

    let map = game.map();
    let blocks = game.blocks();
    let player = game.player();
    let (view_w, view_h) = (screen_width(), screen_height());
    let (ox, oy) = camera_offset(
        (player.position.x, player.position.y),
        (map.width(), map.height()),
        (view_w, view_h),
        TILE_PX,
    );
    let anim_tick = game.ticks() / ANIMATION_TICKS;

    for (col, row, symbol) in map.symbols() {
        if symbol == AIR {
            continue;
        }
        let block = blocks.lookup(symbol);
        if block.symbol == AIR {
            continue;
        }
        let x = ox + col as f32 * TILE_PX;
        let y = oy + row as f32 * TILE_PX;
        if x + TILE_PX < 0.0 || y + TILE_PX < 0.0 || x > view_w || y > view_h {
            continue;
        }
        draw_block(sheet, block, x, y, anim_tick, false);
    }

    // Sprite cell sits on the feet, centred on the position
    let bb = &player.bounding_box;
    let px = ox + (player.position.x as f32 - 0.5) * TILE_PX;
    let py = oy + ((player.position.y + bb.bottom()) as f32 - 1.0) * TILE_PX;
    let frame_tick = if player.walking { anim_tick } else { 0 };
    let flip = player.direction == Direction::Left;

    let sprite = blocks.lookup(SPAWN_MARKER);
    if sheet.is_some() && sprite.frame_count() > 0 {
        draw_block(sheet, sprite, px, py, frame_tick, flip);
    } else {
        draw_rectangle(
            ox + (player.position.x + bb.left()) as f32 * TILE_PX,
            oy + (player.position.y + bb.top()) as f32 * TILE_PX,
            (bb.right() - bb.left()) as f32 * TILE_PX,
            (bb.bottom() - bb.top()) as f32 * TILE_PX,
            Color::from_rgba(120, 200, 230, 255),
        );
    }
}

/// Carried items as "Name x2 (description)", one entry per item type
pub fn inventory_line(player: &Player) -> Option<String> {
    let mut entries: Vec<(Item, usize)> = Vec::new();
    for &item in &player.inventory {
        match entries.iter_mut().find(|(i, _)| *i == item) {
            Some((_, count)) => *count += 1,
            None => entries.push((item, 1)),
        }
    }
    if entries.is_empty() {
        return None;
    }

    let parts: Vec<String> = entries
        .iter()
        .map(|(item, count)| format!("{} x{} ({})", item.name(), count, item.description()))
        .collect();
    Some(parts.join("   "))
}

/// Gold and key counters top left, inventory below them
pub fn draw_hud(game: &Game) {
    let player = game.player();
    let text = format!("Gold: {}   Keys: {}", player.gold, player.keys);
    draw_rectangle(8.0, 8.0, 220.0, 36.0, Color::new(0.0, 0.0, 0.0, 0.5));
    draw_text(&text, 16.0, 33.0, 26.0, WHITE);

    if let Some(line) = inventory_line(player) {
        let size = measure_text(&line, None, 20, 1.0);
        draw_rectangle(8.0, 48.0, size.width + 16.0, 28.0, Color::new(0.0, 0.0, 0.0, 0.5));
        draw_text(&line, 16.0, 68.0, 20.0, LIGHTGRAY);
    }
}

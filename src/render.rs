//! Draws whatever the app exposes. Reads state only, never mutates it.

use macroquad::prelude::*;

use crate::app::{App, GamePhase, MenuItem, OptionsItem, Screen};
use crate::display::{CANVAS_HEIGHT, CANVAS_WIDTH, Resolution};
use crate::options::{OptionsStore, SPEED_MAX};
use crate::snake::{BodyTile, Cell, Direction, Position, SnakeEngine};

const TILE: f32 = 16.0;
const ARM: f32 = 10.0;
const INSET: f32 = (TILE - ARM) / 2.0;

const GRASS: Color = Color::new(0.22, 0.52, 0.18, 1.0);
const GRASS_DARK: Color = Color::new(0.19, 0.46, 0.16, 1.0);
const SNAKE_BODY: Color = Color::new(0.95, 0.78, 0.20, 1.0);
const SNAKE_HEAD: Color = Color::new(1.0, 0.88, 0.35, 1.0);
const APPLE: Color = Color::new(0.85, 0.12, 0.10, 1.0);
const TEXT: Color = Color::new(0.96, 0.96, 0.90, 1.0);
const TEXT_DIM: Color = Color::new(0.70, 0.74, 0.66, 1.0);
const METER: Color = Color::new(0.10, 0.10, 0.10, 0.8);

pub fn draw(app: &App, time: f64) {
    match app.screen() {
        Screen::Title => {
            draw_backdrop();
            draw_logo(time);
        }
        Screen::Menu { selection } => {
            draw_backdrop();
            draw_logo(time);
            draw_menu(selection);
        }
        Screen::Options { selection, resolution_open } => {
            draw_backdrop();
            draw_options(app.options(), selection, resolution_open);
        }
        Screen::InGame { phase } => {
            draw_board(app.engine());
            match phase {
                GamePhase::Ready => centered("Press a key", CANVAS_HEIGHT - 24.0, 16.0, TEXT),
                GamePhase::Over { .. } => centered("GAME OVER", app.banner().y() + 20.0, 32.0, TEXT),
                GamePhase::Start | GamePhase::Running => {}
            }
        }
    }
}

fn centered(text: &str, y: f32, size: f32, color: Color) {
    let m = measure_text(text, None, size as u16, 1.0);
    draw_text(text, (CANVAS_WIDTH - m.width) * 0.5, y, size, color);
}

fn draw_backdrop() {
    clear_background(GRASS);
    for y in 0..(CANVAS_HEIGHT / TILE) as usize {
        for x in (y % 2..(CANVAS_WIDTH / TILE) as usize).step_by(2) {
            draw_rectangle(x as f32 * TILE, y as f32 * TILE, TILE, TILE, GRASS_DARK);
        }
    }
}

fn draw_logo(time: f64) {
    let bob = (time * 3.0).sin() as f32 * 4.0;
    centered("SNEK", 56.0 + bob, 48.0, SNAKE_HEAD);
}

fn draw_menu(selection: MenuItem) {
    for (i, item) in MenuItem::ALL.iter().enumerate() {
        let label = match item {
            MenuItem::Start => "Start",
            MenuItem::Scores => "Scores",
            MenuItem::Options => "Options",
            MenuItem::Quit => "Quit",
        };
        let y = 110.0 + i as f32 * 24.0;
        let color = if *item == selection { TEXT } else { TEXT_DIM };
        if *item == selection {
            draw_text(">", 100.0, y, 20.0, TEXT);
        }
        draw_text(label, 120.0, y, 20.0, color);
    }
}

fn draw_options(options: &OptionsStore, selection: OptionsItem, resolution_open: bool) {
    let pending = options.pending();
    centered("OPTIONS", 32.0, 28.0, TEXT);

    for (i, item) in OptionsItem::ALL.iter().enumerate() {
        let y = 70.0 + i as f32 * 30.0;
        let color = if *item == selection { TEXT } else { TEXT_DIM };
        let value_x = 190.0;
        draw_text(option_label(*item), 40.0, y, 18.0, color);
        match item {
            OptionsItem::Resolution => {
                draw_text(&Resolution::at(pending.resolution).label(), value_x, y, 18.0, color);
                if resolution_open {
                    draw_list_arrows(value_x - 14.0, y, pending.resolution);
                }
            }
            OptionsItem::Fullscreen => draw_tickbox(value_x, y, pending.fullscreen),
            OptionsItem::SoftFilter => draw_tickbox(value_x, y, pending.soft_filter),
            OptionsItem::Speed => draw_meter(value_x, y, pending.speed),
            OptionsItem::Apply => {}
        }
        if *item == selection && !resolution_open {
            draw_text(">", 24.0, y, 18.0, TEXT);
        }
    }
}

fn option_label(item: OptionsItem) -> &'static str {
    match item {
        OptionsItem::Resolution => "Resolution",
        OptionsItem::Fullscreen => "Fullscreen",
        OptionsItem::SoftFilter => "Soft filter",
        OptionsItem::Speed => "Speed",
        OptionsItem::Apply => "Apply",
    }
}

fn draw_list_arrows(x: f32, y: f32, index: usize) {
    if index > 0 {
        draw_triangle(vec2(x, y - 14.0), vec2(x + 8.0, y - 14.0), vec2(x + 4.0, y - 20.0), TEXT);
    }
    if index + 1 < crate::options::RESOLUTION_COUNT {
        draw_triangle(vec2(x, y + 2.0), vec2(x + 8.0, y + 2.0), vec2(x + 4.0, y + 8.0), TEXT);
    }
}

fn draw_tickbox(x: f32, y: f32, ticked: bool) {
    draw_rectangle_lines(x, y - 12.0, 12.0, 12.0, 2.0, TEXT);
    if ticked {
        draw_rectangle(x + 3.0, y - 9.0, 6.0, 6.0, TEXT);
    }
}

fn draw_meter(x: f32, y: f32, speed: u16) {
    let width = f32::from(SPEED_MAX) / 10.0;
    draw_rectangle(x, y - 10.0, width + 2.0, 10.0, METER);
    let pointer = x + 1.0 + f32::from(speed) / 10.0;
    draw_rectangle(pointer, y - 12.0, 1.0, 14.0, APPLE);
}

fn tile_origin(pos: Position) -> (f32, f32) {
    (pos.x as f32 * TILE, pos.y as f32 * TILE)
}

/// Half-tile bar from the centre towards `side`.
fn draw_arm(pos: Position, side: Direction, color: Color) {
    let (x, y) = tile_origin(pos);
    let half = TILE / 2.0;
    match side {
        Direction::Up => draw_rectangle(x + INSET, y, ARM, half + ARM / 2.0, color),
        Direction::Down => draw_rectangle(x + INSET, y + half - ARM / 2.0, ARM, half + ARM / 2.0, color),
        Direction::Left => draw_rectangle(x, y + INSET, half + ARM / 2.0, ARM, color),
        Direction::Right => draw_rectangle(x + half - ARM / 2.0, y + INSET, half + ARM / 2.0, ARM, color),
    }
}

fn draw_segment(pos: Position, cell: &Cell) {
    if cell.is_tail() {
        let (x, y) = tile_origin(pos);
        draw_arm(pos, cell.heading, SNAKE_BODY);
        draw_circle(x + TILE / 2.0, y + TILE / 2.0, ARM / 2.0, SNAKE_BODY);
        return;
    }
    let (a, b) = match cell.tile {
        BodyTile::Vertical => (Direction::Up, Direction::Down),
        BodyTile::Horizontal => (Direction::Left, Direction::Right),
        BodyTile::Corner(turn) => (turn.entered().opposite(), turn.left()),
    };
    draw_arm(pos, a, SNAKE_BODY);
    draw_arm(pos, b, SNAKE_BODY);
}

fn draw_head(engine: &SnakeEngine) {
    let pos = engine.head();
    let heading = engine.direction();
    let (x, y) = tile_origin(pos);
    if engine.live_cells().next().is_some() {
        draw_arm(pos, heading.opposite(), SNAKE_BODY);
    }
    draw_rectangle(x + 2.0, y + 2.0, TILE - 4.0, TILE - 4.0, SNAKE_HEAD);

    let (cx, cy) = (x + TILE / 2.0, y + TILE / 2.0);
    let (ex, ey) = match heading {
        Direction::Up | Direction::Down => (3.0, 0.0),
        Direction::Left | Direction::Right => (0.0, 3.0),
    };
    let (fx, fy) = match heading {
        Direction::Up => (0.0, -2.0),
        Direction::Down => (0.0, 2.0),
        Direction::Left => (-2.0, 0.0),
        Direction::Right => (2.0, 0.0),
    };
    draw_circle(cx + fx + ex, cy + fy + ey, 1.5, BLACK);
    draw_circle(cx + fx - ex, cy + fy - ey, 1.5, BLACK);
}

fn draw_board(engine: &SnakeEngine) {
    draw_backdrop();
    for (pos, cell) in engine.live_cells() {
        draw_segment(pos, cell);
    }
    draw_head(engine);

    let (ax, ay) = tile_origin(engine.apple());
    draw_circle(ax + TILE / 2.0, ay + TILE / 2.0 + 1.0, 6.0, APPLE);
    draw_rectangle(ax + TILE / 2.0 - 0.5, ay + 1.0, 1.5, 4.0, GRASS_DARK);
}

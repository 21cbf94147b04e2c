use crate::balloon::{Balloon, BalloonKind};
use crate::config::{ARENA_WIDTH, UI_PANEL_WIDTH, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::game::Game;
use crate::types::Vector2;
use crate::utils;
use macroquad::prelude::*;

fn faded_color(mut color: Color, alpha: f32) -> Color {
    color.a *= alpha;
    color
}

fn brighten_color(color: Color, amount: f32) -> Color {
    Color::new(
        (color.r + amount).min(1.0),
        (color.g + amount).min(1.0),
        (color.b + amount).min(1.0),
        color.a,
    )
}

// Green at full lives, through yellow, to red at none
fn get_health_gradient_color(ratio: f32) -> Color {
    if ratio > 0.5 {
        let t = (ratio - 0.5) * 2.0;
        Color::new(1.0 - t, 1.0, 0.0, 1.0)
    } else {
        let t = ratio * 2.0;
        Color::new(1.0, t, 0.0, 1.0)
    }
}

fn balloon_color(kind: BalloonKind) -> Color {
    match kind {
        BalloonKind::Red => Color::from_rgba(255, 0, 0, 255),
        BalloonKind::Blue => Color::from_rgba(0, 0, 255, 255),
        BalloonKind::Green => Color::from_rgba(0, 128, 0, 255),
        BalloonKind::Yellow => Color::from_rgba(255, 255, 0, 255),
        BalloonKind::Pink => Color::from_rgba(255, 192, 203, 255),
        BalloonKind::Black => Color::from_rgba(0, 0, 0, 255),
        BalloonKind::White => Color::from_rgba(255, 255, 255, 255),
        BalloonKind::Zebra => Color::from_rgba(200, 200, 200, 255),
        BalloonKind::Ceramic => Color::from_rgba(128, 128, 128, 255),
        BalloonKind::Moab => Color::from_rgba(128, 0, 0, 255),
        BalloonKind::Bfb => Color::from_rgba(75, 0, 130, 255),
        BalloonKind::Zomg => Color::from_rgba(255, 140, 0, 255),
    }
}

const BACKGROUND: Color = Color::new(0.13, 0.55, 0.13, 1.0);
const PATH_COLOR: Color = Color::new(0.39, 0.39, 0.39, 1.0);
const TOWER_COLOR: Color = Color::new(0.55, 0.27, 0.07, 1.0);

// Draws a game using macroquad. Only ever reads the game.
pub struct Renderer {
    shown_lives_ratio: f32, // Eased toward the real ratio for the lives bar
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            shown_lives_ratio: 1.0,
        }
    }

    // Pixels on screen per playfield pixel
    fn scale(game: &Game) -> f32 {
        let sx = ARENA_WIDTH as f32 / game.arena.width as f32;
        let sy = WINDOW_HEIGHT as f32 / game.arena.height as f32;
        sx.min(sy)
    }

    fn to_screen(point: Vector2, scale: f32) -> Vec2 {
        Vec2::new(point.x as f32 * scale, point.y as f32 * scale)
    }

    /// Map a window position back onto the playfield, if it lies over it.
    pub fn screen_to_world(&self, game: &Game, x: f32, y: f32) -> Option<Vector2> {
        if x < 0.0 || y < 0.0 || x >= ARENA_WIDTH as f32 || y >= WINDOW_HEIGHT as f32 {
            return None;
        }
        let scale = Self::scale(game);
        Some(Vector2::new((x / scale) as f64, (y / scale) as f64))
    }

    pub fn draw_frame(&mut self, game: &Game, alpha: f64, announcement: Option<&str>) {
        clear_background(BACKGROUND);
        let scale = Self::scale(game);

        Self::draw_path(game, scale);
        for tower in game.towers() {
            let center = Self::to_screen(tower.position, scale);
            draw_circle_lines(center.x, center.y, tower.range as f32 * scale, 1.0, faded_color(LIGHTGRAY, 0.6));
            draw_circle(center.x, center.y, tower.radius as f32 * scale, TOWER_COLOR);
            draw_circle_lines(center.x, center.y, tower.radius as f32 * scale, 1.5, brighten_color(TOWER_COLOR, 0.3));
        }
        for balloon in game.balloons() {
            Self::draw_balloon(balloon, scale, alpha);
        }
        for projectile in game.projectiles() {
            let pos = utils::lerp_point(projectile.prev_position, projectile.position, alpha);
            let screen = Self::to_screen(pos, scale);
            draw_circle(screen.x, screen.y, projectile.radius as f32 * scale, YELLOW);
        }

        self.draw_ui_panel(game);

        if let Some(msg) = announcement {
            Self::draw_announcement(msg);
        }
    }

    fn draw_path(game: &Game, scale: f32) {
        for leg in game.arena.path().windows(2) {
            let a = Self::to_screen(leg[0], scale);
            let b = Self::to_screen(leg[1], scale);
            draw_line(a.x, a.y, b.x, b.y, 2.0, PATH_COLOR);
        }
    }

    fn draw_balloon(balloon: &Balloon, scale: f32, alpha: f64) {
        let pos = utils::lerp_point(balloon.prev_position, balloon.position, alpha);
        let center = Self::to_screen(pos, scale);
        let color = balloon_color(balloon.kind);
        draw_circle(center.x, center.y, balloon.radius as f32 * scale, color);

        // Multi-hit balloons show their remaining health
        if balloon.kind.base_health() > 1 {
            draw_text(&balloon.health.to_string(), center.x - 6.0, center.y - 10.0, 16.0, WHITE);
        }
    }

    fn draw_ui_panel(&mut self, game: &Game) {
        let panel_x = ARENA_WIDTH as f32;
        let panel_width = UI_PANEL_WIDTH as f32;
        let padding = 10.0;
        let font_size = 20.0;
        let line_height = 26.0;

        draw_rectangle(panel_x, 0.0, panel_width, WINDOW_HEIGHT as f32, Color::from_rgba(20, 20, 28, 255));
        draw_line(panel_x, 0.0, panel_x, WINDOW_HEIGHT as f32, 2.0, GRAY);

        let snapshot = game.snapshot();
        let mut y = 28.0;
        draw_text("Balloon Defense", panel_x + padding, y, 26.0, WHITE);
        y += line_height * 1.5;

        let lines = [
            format!("Lives: {}/{}", snapshot.lives.max(0), snapshot.max_lives),
            format!("Cash: ${}", snapshot.cash),
            format!("Round: {}", snapshot.round),
            format!("Wave: {}/{}", snapshot.wave, game.spawner().schedule().len()),
            format!("State: {:?}", snapshot.state),
            format!("Balloons: {}", snapshot.balloons.len()),
            format!("Towers: {}", snapshot.towers.len()),
            format!("Darts: {}", snapshot.projectiles),
            format!("Time: {:.1}s", snapshot.tick as f64 * crate::config::SIM_DT),
        ];
        for line in &lines {
            draw_text(line, panel_x + padding, y, font_size, WHITE);
            y += line_height;
        }

        // Lives bar
        let ratio = if snapshot.max_lives > 0 {
            (snapshot.lives.max(0) as f32 / snapshot.max_lives as f32).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.shown_lives_ratio = utils::lerp(self.shown_lives_ratio, ratio, 0.1);
        let bar_width = panel_width - padding * 2.0;
        draw_rectangle(panel_x + padding, y, bar_width, 10.0, DARKGRAY);
        draw_rectangle(
            panel_x + padding,
            y,
            bar_width * self.shown_lives_ratio,
            10.0,
            get_health_gradient_color(self.shown_lives_ratio),
        );
        y += line_height * 1.5;

        draw_text("Click to place a tower", panel_x + padding, y, 16.0, LIGHTGRAY);
        draw_text("ESC to quit", panel_x + padding, y + 18.0, 16.0, LIGHTGRAY);

        let fps_text = format!("FPS: {}", get_fps());
        draw_text(&fps_text, 10.0, 20.0, 18.0, WHITE);
    }

    fn draw_announcement(msg: &str) {
        let rect_width = 500.0;
        let rect_height = 120.0;
        let x = (WINDOW_WIDTH as f32 / 2.0) - (rect_width / 2.0);
        let y = (WINDOW_HEIGHT as f32 / 2.0) - (rect_height / 2.0);
        draw_rectangle(x, y, rect_width, rect_height, Color::from_rgba(0, 0, 0, 180));

        let font_size = 32;
        let text_dims = measure_text(msg, None, font_size, 1.0);
        let text_x = x + (rect_width - text_dims.width) / 2.0;
        let text_y = y + (rect_height - font_size as f32) / 2.0 + font_size as f32 * 0.7;
        draw_text(msg, text_x, text_y, font_size as f32, WHITE);

        let hint = "Press ESC to exit";
        let hint_size = 18;
        let hint_dims = measure_text(hint, None, hint_size, 1.0);
        let hint_x = x + (rect_width - hint_dims.width) / 2.0;
        draw_text(hint, hint_x, y + rect_height - 14.0, hint_size as f32, LIGHTGRAY);
    }

    pub fn window_should_close() -> bool {
        is_key_down(KeyCode::Escape) || is_quit_requested()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

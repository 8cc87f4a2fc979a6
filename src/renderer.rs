use glam::Vec2;
use rand::Rng;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::camera::Camera;
use crate::entities::{Enemy, GameState, PickupKind, WeaponKind};
use crate::game::Game;

/// Number of sample points along the slash arc
const SLASH_SAMPLES: usize = 11;

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub game_state: GameState,
    /// Absent on the menu before the first encounter
    pub game: Option<&'a Game>,
    pub area: Rect,
    pub fps: u32,
    pub encounter_secs: f32,
    /// Mouse position in terminal cells
    pub cursor: Option<(u16, u16)>,
}

/// Part of the screen showing the world: everything between the HUD line at
/// the top and the controls line at the bottom
pub fn game_area(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height.min(1),
        width: area.width,
        height: area.height.saturating_sub(2),
    }
}

/// Formats seconds as `mm:ss`, rounding partial seconds up
pub fn format_clock(secs: f32) -> String {
    let total = secs.max(0.0).ceil() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Maps world points to screen cells for one frame
struct Viewport<'a> {
    field: Rect,
    camera: &'a Camera,
    shake: (i32, i32),
}

impl Viewport<'_> {
    fn cell(&self, point: Vec2) -> Option<(u16, u16)> {
        let (column, row) = self.camera.world_to_cell(point)?;
        let column = column as i32 + self.shake.0;
        let row = row as i32 + self.shake.1;
        if column < 0 || row < 0 || column >= self.field.width as i32 || row >= self.field.height as i32 {
            return None;
        }
        Some((self.field.x + column as u16, self.field.y + row as u16))
    }

    fn put(&self, buffer: &mut Buffer, point: Vec2, glyph: char, style: Style) {
        if let Some((x, y)) = self.cell(point) {
            buffer.set_string(x, y, glyph.to_string(), style);
        }
    }
}

/// Handles all rendering responsibilities for the game
#[derive(Default)]
pub struct GameRenderer {}

impl GameRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Main render method that dispatches to state-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        let Some(game) = view.game else {
            self.render_menu(frame, view);
            return;
        };

        match view.game_state {
            GameState::Menu => self.render_menu(frame, view),
            GameState::Playing => self.render_game(frame, view, game),
            GameState::Paused => self.render_paused(frame, view, game),
            GameState::GameOver => self.render_game_over(frame, view, game),
            GameState::Victory => self.render_victory(frame, view, game),
        }
    }

    fn render_menu(&self, frame: &mut Frame, view: &RenderView) {
        let text = vec![
            Line::from(""),
            Line::from("╔═══════════════════════════╗").centered().green(),
            Line::from("║         SURVIVOR          ║")
                .centered()
                .green()
                .bold(),
            Line::from("╚═══════════════════════════╝").centered().green(),
            Line::from(""),
            Line::from(format!(
                "Hold off the goblin horde for {}",
                format_clock(view.encounter_secs)
            ))
            .centered()
            .yellow(),
            Line::from(""),
            Line::from("WASD/Arrows  move").centered().white(),
            Line::from("Space  swing sword").centered().white(),
            Line::from("Click/F  attack with weapon in hand").centered().white(),
            Line::from("Right click/E  slash").centered().white(),
            Line::from("Tab  switch weapon    R  reload").centered().white(),
            Line::from("P  pause    Q  quit").centered().white(),
            Line::from(""),
            Line::from("Press Enter or click to start")
                .centered()
                .cyan()
                .bold(),
        ];

        frame.render_widget(
            Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            view.area,
        );
    }

    /// Renders the active gameplay screen
    fn render_game(&self, frame: &mut Frame, view: &RenderView, game: &Game) {
        let area = view.area;
        let field = game_area(area);

        let shake = if game.shake_timer > 0.0 {
            let mut rng = rand::rng();
            (rng.random_range(-1..=1), rng.random_range(-1..=1))
        } else {
            (0, 0)
        };
        let viewport = Viewport {
            field,
            camera: &game.camera,
            shake,
        };

        let buffer = frame.buffer_mut();
        self.render_ground(buffer, &viewport, game);

        for drop in &game.blood {
            let red = (120.0 + 270.0 * drop.alpha()).min(255.0) as u8;
            viewport.put(buffer, drop.position, drop.get_char(), Style::default().fg(Color::Rgb(red, 0, 0)));
        }

        for pickup in game.pickups.iter().filter(|p| p.is_visible()) {
            let color = match pickup.kind {
                PickupKind::Health => Color::LightRed,
                PickupKind::Ammo => Color::Yellow,
            };
            viewport.put(
                buffer,
                pickup.position,
                pickup.get_char(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            );
        }

        for enemy in &game.enemies {
            viewport.put(buffer, enemy.position, enemy_glyph(enemy), enemy_style(enemy));
        }

        for projectile in &game.projectiles {
            viewport.put(buffer, projectile.position, '•', Style::default().fg(Color::Yellow));
        }

        self.render_weapons(buffer, &viewport, game);

        if game.player.is_visible() {
            let color = if game.damage_flash > 0.0 {
                Color::Red
            } else {
                Color::Cyan
            };
            viewport.put(
                buffer,
                game.player.position,
                '@',
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            );
        }

        if let Some((column, row)) = view.cursor
            && column >= field.x
            && column < field.x + field.width
            && row >= field.y
            && row < field.y + field.height
        {
            buffer.set_string(column, row, "+", Style::default().fg(Color::White));
        }

        if game.damage_flash > 0.0 {
            buffer.set_style(field, Style::default().bg(Color::Rgb(90, 0, 0)));
        }

        self.render_hud(frame, view, game);
    }

    /// Terrain blocks and a sparse pattern of grass inside the world
    fn render_ground(&self, buffer: &mut Buffer, viewport: &Viewport, game: &Game) {
        let field = viewport.field;
        let world = game.world();
        let wall = Style::default().fg(Color::Gray);
        let grass = Style::default().fg(Color::Rgb(40, 90, 40));

        for row in 0..field.height {
            for column in 0..field.width {
                let point = viewport.camera.cell_to_world(column, row);
                if !world.contains(point) {
                    continue;
                }
                let (x, y) = (field.x + column, field.y + row);
                if game.terrain.iter().any(|t| t.bounds.contains(point)) {
                    buffer.set_string(x, y, "█", wall);
                } else if (point.x as i32 * 7 + point.y as i32 * 13).rem_euclid(29) == 0 {
                    buffer.set_string(x, y, "\"", grass);
                }
            }
        }
    }

    fn render_weapons(&self, buffer: &mut Buffer, viewport: &Viewport, game: &Game) {
        let origin = game.player.position;

        if game.slash.is_active() {
            let style = Style::default().fg(Color::LightCyan).add_modifier(Modifier::BOLD);
            let half = game.slash.half_arc();
            let reached = (game.slash.progress() * SLASH_SAMPLES as f32).ceil() as usize;
            for step in 0..reached.min(SLASH_SAMPLES) {
                let t = step as f32 / (SLASH_SAMPLES - 1) as f32;
                let angle = game.slash.angle - half + 2.0 * half * t;
                for radius in [game.slash.radius * 0.6, game.slash.radius] {
                    viewport.put(buffer, origin + Vec2::from_angle(angle) * radius, '~', style);
                }
            }
        }

        let active = game.player.active_weapon;
        let idle = |kind: WeaponKind| {
            if kind == active {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            }
        };

        if let Some(angle) = game.sword.blade_angle() {
            let style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
            let glyph = blade_glyph(angle);
            let steps = game.sword.reach.ceil() as usize;
            for step in 1..=steps {
                let point = origin + Vec2::from_angle(angle) * step as f32;
                viewport.put(buffer, point, glyph, style);
            }
        } else {
            viewport.put(buffer, game.sword_position, '†', idle(WeaponKind::Sword));
        }

        viewport.put(buffer, game.gun_position, '¬', idle(WeaponKind::Gun));
    }

    fn render_hud(&self, frame: &mut Frame, view: &RenderView, game: &Game) {
        let area = view.area;
        let player = &game.player;
        let label = Style::default().fg(Color::DarkGray);
        let (health, max_health) = (u16::from(player.health), u16::from(player.max_health));
        let health_style = if health * 2 > max_health {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if health * 4 > max_health {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        };

        let weapon = match player.active_weapon {
            WeaponKind::Sword => WeaponKind::Sword.get_name().to_string(),
            WeaponKind::Gun if game.gun.is_reloading() => "Gun (reloading)".to_string(),
            WeaponKind::Gun => format!("Gun {}/{}", game.gun.rounds, game.gun.capacity),
        };
        let slash = match game.slash.cooldown_remaining() {
            remaining if remaining > 0.0 => format!("{remaining:.1}s"),
            _ => "ready".to_string(),
        };

        let stats = Line::from(vec![
            Span::styled("HP: ", label),
            Span::styled(format!("{}/{}", player.health, player.max_health), health_style),
            Span::styled("  Kills: ", label),
            Span::styled(
                format!("{}", game.kills),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Wave: ", label),
            Span::styled(
                format!("{}", game.wave()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Weapon: ", label),
            Span::styled(
                weapon,
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Slash: ", label),
            Span::styled(slash, Style::default().fg(Color::LightCyan)),
            Span::styled("  FPS: ", label),
            Span::styled(
                format!("{}", view.fps),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]);

        let timer_width = area.width.min(18);
        let header = Rect {
            x: area.x,
            y: area.y,
            width: area.width - timer_width,
            height: area.height.min(1),
        };
        frame.render_widget(Paragraph::new(stats), header);

        let timer = Line::from(vec![
            Span::styled("Time left: ", label),
            Span::styled(
                format_clock(game.time_remaining()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]);
        let timer_area = Rect {
            x: area.x + area.width - timer_width,
            width: timer_width,
            ..header
        };
        frame.render_widget(Paragraph::new(timer).right_aligned(), timer_area);

        let controls = Line::from(vec![Span::styled(
            "[WASD: Move] [Space: Sword] [Click/F: Attack] [RClick/E: Slash] [Tab: Switch] [R: Reload] [P: Pause] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let footer = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(1),
            width: area.width,
            height: area.height.min(1),
        };
        frame.render_widget(Paragraph::new(controls).centered(), footer);
    }

    /// Renders the pause screen with overlay
    fn render_paused(&self, frame: &mut Frame, view: &RenderView, game: &Game) {
        self.render_game(frame, view, game);

        let text = vec![
            Line::from(""),
            Line::from("PAUSED").centered().bold().yellow(),
            Line::from(""),
            Line::from("Press P to resume").centered().white(),
            Line::from("Press M for the menu").centered().white(),
        ];
        self.render_overlay(frame, view.area, text, Color::Yellow, 7);
    }

    fn render_game_over(&self, frame: &mut Frame, view: &RenderView, game: &Game) {
        self.render_game(frame, view, game);

        let mut text = vec![
            Line::from(""),
            Line::from("YOU DIED").centered().red().bold(),
            Line::from(""),
        ];
        text.extend(summary_lines(game));
        self.render_overlay(frame, view.area, text, Color::Red, 12);
    }

    fn render_victory(&self, frame: &mut Frame, view: &RenderView, game: &Game) {
        self.render_game(frame, view, game);

        let mut text = vec![
            Line::from(""),
            Line::from("YOU SURVIVED").centered().green().bold(),
            Line::from(""),
        ];
        text.extend(summary_lines(game));
        self.render_overlay(frame, view.area, text, Color::Green, 12);
    }

    fn render_overlay(&self, frame: &mut Frame, area: Rect, text: Vec<Line>, color: Color, height: u16) {
        let popup = centered_rect(area, 36, height);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                )
                .alignment(Alignment::Center),
            popup,
        );
    }
}

fn summary_lines(game: &Game) -> Vec<Line<'static>> {
    vec![
        Line::from(format!("Kills: {}", game.kills)).centered().yellow().bold(),
        Line::from(format!("Time survived: {}", format_clock(game.elapsed)))
            .centered()
            .cyan()
            .bold(),
        Line::from(format!("Reached wave {}", game.wave())).centered().white(),
        Line::from(""),
        Line::from("Press R or click to restart").centered().white(),
        Line::from("Press M for the menu").centered().white(),
        Line::from("Press Q to quit").centered().white(),
    ]
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn enemy_glyph(enemy: &Enemy) -> char {
    if enemy.is_alive() { 'g' } else { 'x' }
}

fn enemy_style(enemy: &Enemy) -> Style {
    let color = if enemy.is_flashing() {
        Color::White
    } else {
        match enemy.hit_points {
            0 => Color::DarkGray,
            1 => Color::LightRed,
            2 => Color::Yellow,
            _ => Color::Green,
        }
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Line-drawing glyph closest to the blade's direction. Rows grow downward.
fn blade_glyph(angle: f32) -> char {
    let octant = (angle / std::f32::consts::FRAC_PI_4).round() as i32;
    match octant.rem_euclid(4) {
        0 => '─',
        1 => '\\',
        2 => '│',
        _ => '/',
    }
}

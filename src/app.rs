use color_eyre::Result;
use glam::Vec2;
use log::{info, trace};
use rand::Rng;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::time::{Duration, Instant};

use crate::audio::AudioManager;
use crate::camera::Camera;
use crate::config::GameConfig;
use crate::entities::GameState;
use crate::game::{Game, GameEvent, Outcome};
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView, game_area};

/// Longest step fed to the simulation, so a stall never teleports anything
pub const MAX_FRAME_SECS: f32 = 0.05;

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    game_state: GameState,
    config: GameConfig,
    game: Option<Game>,
    /// Base seed from the command line; restarts advance it
    seed: Option<u64>,
    runs: u64,
    /// Frames info
    last_frame_time: Instant,
    fps: u32,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
}

impl App {
    /// Construct a new instance of [`App`], starting on the menu.
    pub fn new(
        config: GameConfig,
        seed: Option<u64>,
        audio_manager: AudioManager,
        input_manager: InputManager,
    ) -> Self {
        Self {
            running: true,
            game_state: GameState::Menu,
            config,
            game: None,
            seed,
            runs: 0,
            last_frame_time: Instant::now(),
            fps: 0,
            input_manager,
            renderer: GameRenderer::new(),
            audio_manager,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut Game> {
        self.game.as_mut()
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while self.running {
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }
            let dt = frame_time.as_secs_f32().min(MAX_FRAME_SECS);

            let size = terminal.size()?;
            let area = Rect::new(0, 0, size.width, size.height);
            self.fit_viewport(area);

            terminal.draw(|frame| {
                let view = RenderView {
                    game_state: self.game_state,
                    game: self.game.as_ref(),
                    area: frame.area(),
                    fps: self.fps,
                    encounter_secs: self.config.encounter_secs,
                    cursor: self.input_manager.cursor(),
                };
                self.renderer.render(frame, &view);
            })?;

            self.input_manager.poll_events(&self.game_state)?;
            let actions = self
                .input_manager
                .get_actions(&self.game_state, Instant::now());
            self.process_actions(&actions);
            self.aim_at_cursor(area);

            self.update(dt);

            // Small sleep to maintain ~60 FPS and prevent CPU spinning
            std::thread::sleep(Duration::from_millis(8));
        }

        self.audio_manager.stop_music();
        Ok(())
    }

    /// Process input actions and update game state accordingly
    pub fn process_actions(&mut self, actions: &[InputAction]) {
        let mut direction = Vec2::ZERO;

        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::StartGame => {
                    self.start_game();
                }
                InputAction::Restart => {
                    if self.game_state.is_finished() {
                        self.start_game();
                    }
                }
                InputAction::Pause => {
                    if self.game_state == GameState::Playing {
                        self.game_state = GameState::Paused;
                    }
                }
                InputAction::Resume => {
                    if self.game_state == GameState::Paused {
                        self.game_state = GameState::Playing;
                    }
                }
                InputAction::ReturnToMenu => {
                    self.return_to_menu();
                }
                InputAction::MoveLeft => direction.x -= 1.0,
                InputAction::MoveRight => direction.x += 1.0,
                InputAction::MoveUp => direction.y -= 1.0,
                InputAction::MoveDown => direction.y += 1.0,
                InputAction::Melee
                | InputAction::PrimaryAttack
                | InputAction::SpecialAttack
                | InputAction::SwitchWeapon
                | InputAction::Reload => self.command(*action),
            }
        }

        if self.game_state == GameState::Playing
            && let Some(game) = self.game.as_mut()
        {
            game.set_move_intent(direction);
        }
    }

    fn command(&mut self, action: InputAction) {
        if self.game_state != GameState::Playing {
            return;
        }
        let Some(game) = self.game.as_mut() else {
            return;
        };
        match action {
            InputAction::Melee => game.melee_attack(),
            InputAction::PrimaryAttack => game.primary_attack(),
            InputAction::SpecialAttack => game.special_attack(),
            InputAction::SwitchWeapon => game.switch_weapon(),
            InputAction::Reload => game.reload(),
            _ => {}
        }
    }

    /// Advances the encounter and reacts to what happened in it
    pub fn update(&mut self, dt: f32) {
        if self.game_state == GameState::Paused {
            return;
        }
        let Some(game) = self.game.as_mut() else {
            return;
        };

        game.update(dt);
        for event in game.drain_events() {
            trace!("{event:?}");
            self.audio_manager.play_event(&event);
            if let GameEvent::EncounterEnded(outcome) = event {
                self.game_state = match outcome {
                    Outcome::Victory => GameState::Victory,
                    Outcome::Defeat => GameState::GameOver,
                };
                self.audio_manager.stop_music();
            }
        }
    }

    /// Matches the camera to the part of the terminal showing the world
    fn fit_viewport(&mut self, area: Rect) {
        let field = game_area(area);
        if let Some(game) = self.game.as_mut() {
            game.set_viewport(Camera::size_for_cells(field.width, field.height));
        }
    }

    fn aim_at_cursor(&mut self, area: Rect) {
        let field = game_area(area);
        let (Some(game), Some((column, row))) = (self.game.as_mut(), self.input_manager.cursor())
        else {
            return;
        };
        if column < field.x || row < field.y || column >= field.x + field.width || row >= field.y + field.height {
            return;
        }
        let target = game.camera.cell_to_world(column - field.x, row - field.y);
        game.aim_at(target);
    }

    fn next_seed(&mut self) -> u64 {
        let seed = match self.seed {
            Some(base) => base.wrapping_add(self.runs),
            None => rand::rng().random(),
        };
        self.runs += 1;
        seed
    }

    fn start_game(&mut self) {
        let seed = self.next_seed();
        info!("starting encounter {} with seed {seed}", self.runs);
        self.game = Some(Game::new(self.config.clone(), seed));
        self.game_state = GameState::Playing;
        self.audio_manager.start_music();
    }

    fn return_to_menu(&mut self) {
        self.audio_manager.stop_music();
        self.input_manager.release_all();
        self.game = None;
        self.game_state = GameState::Menu;
    }
}

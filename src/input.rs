use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::entities::GameState;

/// How long a key counts as held after its last press when the terminal
/// never reports releases
pub const HOLD_TIMEOUT: Duration = Duration::from_millis(250);

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    StartGame,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Melee,
    PrimaryAttack,
    SpecialAttack,
    SwitchWeapon,
    Reload,
    Pause,
    Resume,
    Restart,
    ReturnToMenu,
    Quit,
}

/// Movement keys currently held, stamped with when they were last seen
#[derive(Debug, Default)]
struct KeyState {
    up: Option<Instant>,
    down: Option<Instant>,
    left: Option<Instant>,
    right: Option<Instant>,
}

/// Manages input polling and translates raw terminal events into game actions
pub struct InputManager {
    key_state: KeyState,
    /// Last press of each action key, for spotting autorepeat when the
    /// terminal reports every repeat as a fresh press
    action_presses: HashMap<KeyCode, Instant>,
    oneshot_actions: Vec<InputAction>,
    /// `None` when the terminal reports key releases
    hold_timeout: Option<Duration>,
    cursor: Option<(u16, u16)>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(true)
    }
}

impl InputManager {
    /// `reports_releases` should be true when keyboard enhancement is active
    pub fn new(reports_releases: bool) -> Self {
        Self {
            key_state: KeyState::default(),
            action_presses: HashMap::new(),
            oneshot_actions: Vec::new(),
            hold_timeout: (!reports_releases).then_some(HOLD_TIMEOUT),
            cursor: None,
        }
    }

    /// Polls for all input events and stores one-shot actions
    /// Should be called once per frame before getting actions
    pub fn poll_events(&mut self, game_state: &GameState) -> color_eyre::Result<()> {
        self.oneshot_actions.clear();

        while event::poll(Duration::from_millis(0))? {
            let event = event::read()?;
            self.handle_event(event, game_state, Instant::now());
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event, game_state: &GameState, now: Instant) {
        match event {
            Event::Key(key_event) => self.handle_key_event(key_event, game_state, now),
            Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event, game_state),
            // Resize is picked up from the frame size when drawing
            _ => {}
        }
    }

    /// Forgets every held key, e.g. when leaving the encounter
    pub fn release_all(&mut self) {
        self.key_state = KeyState::default();
        self.action_presses.clear();
    }

    /// Last terminal cell the mouse was seen over
    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    fn handle_key_event(&mut self, key_event: KeyEvent, game_state: &GameState, now: Instant) {
        match key_event.kind {
            KeyEventKind::Press => self.handle_key_press(key_event, game_state, now),
            // Autorepeat keeps a held key alive but never retriggers actions
            KeyEventKind::Repeat => self.refresh_held(key_event.code, now),
            KeyEventKind::Release => self.handle_key_release(key_event.code),
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, game_state: &GameState, now: Instant) {
        let code = key_event.code;
        if matches!(code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
            || (code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        let action = match game_state {
            GameState::Menu => match code {
                KeyCode::Enter | KeyCode::Char(' ') => Some(InputAction::StartGame),
                _ => None,
            },
            GameState::Playing => match code {
                KeyCode::Char('p') | KeyCode::Char('P') => Some(InputAction::Pause),
                KeyCode::Char(' ') => Some(InputAction::Melee),
                KeyCode::Char('f') | KeyCode::Char('F') => Some(InputAction::PrimaryAttack),
                KeyCode::Char('e') | KeyCode::Char('E') => Some(InputAction::SpecialAttack),
                KeyCode::Tab => Some(InputAction::SwitchWeapon),
                KeyCode::Char('r') | KeyCode::Char('R') => Some(InputAction::Reload),
                _ => None,
            },
            GameState::Paused => match code {
                KeyCode::Char('p') | KeyCode::Char('P') => Some(InputAction::Resume),
                KeyCode::Char('m') | KeyCode::Char('M') => Some(InputAction::ReturnToMenu),
                _ => None,
            },
            GameState::GameOver | GameState::Victory => match code {
                KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => {
                    Some(InputAction::Restart)
                }
                KeyCode::Char('m') | KeyCode::Char('M') => Some(InputAction::ReturnToMenu),
                _ => None,
            },
        };

        if let Some(action) = action {
            if !self.is_autorepeat(code, now) {
                self.oneshot_actions.push(action);
            }
            return;
        }

        // Movement is tracked in every state so releases are never missed,
        // but only reported while playing
        self.refresh_held(code, now);
    }

    /// Without release events a held key arrives as a stream of presses;
    /// any press within the hold timeout of the previous one is a repeat
    fn is_autorepeat(&mut self, code: KeyCode, now: Instant) -> bool {
        let Some(timeout) = self.hold_timeout else {
            return false;
        };
        match self.action_presses.insert(code, now) {
            Some(previous) => now.duration_since(previous) < timeout,
            None => false,
        }
    }

    fn refresh_held(&mut self, code: KeyCode, now: Instant) {
        let keys = &mut self.key_state;
        match code {
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => {
                keys.up = Some(now);
                keys.down = None;
            }
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => {
                keys.down = Some(now);
                keys.up = None;
            }
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                keys.left = Some(now);
                keys.right = None;
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                keys.right = Some(now);
                keys.left = None;
            }
            _ => {}
        }
    }

    fn handle_key_release(&mut self, code: KeyCode) {
        self.action_presses.remove(&code);
        match code {
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => self.key_state.up = None,
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => self.key_state.down = None,
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => self.key_state.left = None,
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right = None
            }
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse_event: MouseEvent, game_state: &GameState) {
        let MouseEvent {
            kind, column, row, ..
        } = mouse_event;

        match kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.cursor = Some((column, row));
            }
            MouseEventKind::Down(button) => {
                self.cursor = Some((column, row));
                let action = match (game_state, button) {
                    (GameState::Menu, MouseButton::Left) => Some(InputAction::StartGame),
                    (GameState::Playing, MouseButton::Left) => Some(InputAction::PrimaryAttack),
                    (GameState::Playing, MouseButton::Right) => Some(InputAction::SpecialAttack),
                    (GameState::GameOver | GameState::Victory, MouseButton::Left) => {
                        Some(InputAction::Restart)
                    }
                    _ => None,
                };
                self.oneshot_actions.extend(action);
            }
            _ => {}
        }
    }

    fn is_held(&self, pressed: Option<Instant>, now: Instant) -> bool {
        match (pressed, self.hold_timeout) {
            (Some(at), Some(timeout)) => now.duration_since(at) < timeout,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Returns all actions for this frame (both continuous and one-shot)
    /// Must be called after poll_events()
    pub fn get_actions(&self, game_state: &GameState, now: Instant) -> Vec<InputAction> {
        let mut actions = Vec::new();
        actions.extend_from_slice(&self.oneshot_actions);

        if *game_state == GameState::Playing {
            let keys = &self.key_state;
            if self.is_held(keys.left, now) {
                actions.push(InputAction::MoveLeft);
            }
            if self.is_held(keys.right, now) {
                actions.push(InputAction::MoveRight);
            }
            if self.is_held(keys.up, now) {
                actions.push(InputAction::MoveUp);
            }
            if self.is_held(keys.down, now) {
                actions.push(InputAction::MoveDown);
            }
        }

        actions
    }
}

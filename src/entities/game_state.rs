/// Which screen the application is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    Paused,
    GameOver,
    Victory,
}

impl GameState {
    /// True for the screens shown once the encounter has ended
    pub fn is_finished(&self) -> bool {
        matches!(self, GameState::GameOver | GameState::Victory)
    }
}

// Library exports for testing
pub use app::App;
pub use audio::{AudioError, AudioManager, SoundEffect};
pub use camera::{CELL_ASPECT, Camera};
pub use config::{ConfigError, GameConfig};
pub use entities::{
    BloodDrop, Enemy, EnemyBehavior, GameState, Gun, Pickup, PickupKind, Player, Projectile,
    Slash, Sword, Terrain, WeaponKind,
};
pub use game::{AttackKind, Game, GameEvent, Outcome};
pub use geometry::Aabb;

pub mod app;
pub mod audio;
pub mod camera;
pub mod config;
pub mod entities;
pub mod game;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod renderer;

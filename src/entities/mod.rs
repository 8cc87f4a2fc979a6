mod blood;
mod enemy;
mod game_state;
mod pickup;
mod player;
mod projectile;
mod spawner;
mod terrain;
mod weapon;

// Re-export all public types
pub use blood::{BLOOD_LIFETIME_SECS, BloodDrop, create_blood_splatter};
pub use enemy::{ENEMY_RADIUS, Enemy, EnemyBehavior, HIT_FLASH_SECS};
pub use game_state::GameState;
pub use pickup::{Pickup, PickupKind};
pub use player::{PLAYER_SIZE, Player};
pub use projectile::Projectile;
pub use spawner::{MAX_SPAWN_ATTEMPTS, SpawnSchedule, pick_spawn_point};
pub use terrain::{Terrain, is_blocked, move_with_collisions};
pub use weapon::{FireOutcome, Gun, Slash, Sword, WeaponKind};

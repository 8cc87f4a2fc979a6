/// Integration tests for game logic
///
/// These tests drive the whole encounter through the public API and check
/// how entities, weapons, spawning and the app state machine work together.
use glam::Vec2;
use survivor::config::TerrainConfig;
use survivor::input::InputAction;
use survivor::{
    AudioManager, Camera, Game, GameConfig, GameEvent, GameState, Outcome, Pickup, PickupKind,
    WeaponKind,
};

const FRAME: f32 = 1.0 / 60.0;

/// No starting enemies, no terrain, no random pickups, no batches
fn empty_arena() -> GameConfig {
    let mut config = GameConfig::default();
    config.spawn.initial.clear();
    config.spawn.interval_secs = 1000.0;
    config.terrain.clear();
    config.pickups.spawn_chance = 0.0;
    config.pickups.drop_chance = 0.0;
    config
}

fn run(game: &mut Game, secs: f32) {
    let frames = (secs / FRAME).round() as usize;
    for _ in 0..frames {
        game.update(FRAME);
    }
}

#[test]
fn test_enemy_cannot_walk_through_terrain() {
    let mut config = empty_arena();
    config.terrain.push(TerrainConfig::new(110.0, 90.0, 4.0, 40.0));
    let mut game = Game::new(config, 2);
    game.spawn_enemy(Vec2::new(100.0, 90.0));

    run(&mut game, 2.0);

    let enemy = &game.enemies[0];
    assert!(enemy.position.x + enemy.radius() <= 108.0 + 1e-3);
    assert_eq!(game.player.health, game.player.max_health);
}

#[test]
fn test_ammo_pickup_cancels_reload() {
    let mut game = Game::new(empty_arena(), 2);
    game.switch_weapon();
    game.primary_attack();
    game.reload();
    assert!(game.gun.is_reloading());

    let at = game.player.position;
    game.pickups.push(Pickup::new(at, PickupKind::Ammo, 15.0));
    game.update(FRAME);

    assert!(!game.gun.is_reloading());
    assert_eq!(game.gun.rounds, game.gun.capacity);
    assert!(
        game.drain_events()
            .contains(&GameEvent::PickupCollected(PickupKind::Ammo))
    );
}

#[test]
fn test_spawning_respects_alive_cap() {
    let mut config = empty_arena();
    config.spawn.interval_secs = 0.1;
    config.spawn.max_enemies = 8;
    let mut game = Game::new(config, 4);

    for _ in 0..180 {
        game.update(FRAME);
        assert!(game.alive_enemies() <= 8);
    }
    assert_eq!(game.alive_enemies(), 8);
}

#[test]
fn test_waves_escalate_over_time() {
    let mut config = empty_arena();
    config.encounter_secs = 100.0;
    let mut game = Game::new(config, 4);
    assert_eq!(game.wave(), 1);
    game.update(30.0);
    assert_eq!(game.wave(), 2);
    game.update(30.0);
    assert_eq!(game.wave(), 3);
}

#[test]
fn test_random_pickups_spawn_away_from_player() {
    let mut config = empty_arena();
    config.pickups.spawn_chance = 1.0;
    config.pickups.interval_secs = 1.0;
    let mut game = Game::new(config, 8);

    game.update(1.0);
    assert_eq!(game.pickups.len(), 1);
    let min_distance = game.config().spawn.min_player_distance;
    assert!(game.pickups[0].position.distance(game.player.position) >= min_distance);
}

#[test]
fn test_pickups_expire() {
    let mut game = Game::new(empty_arena(), 8);
    let far = game.player.position + Vec2::new(40.0, 0.0);
    game.pickups.push(Pickup::new(far, PickupKind::Health, 15.0));

    run(&mut game, 14.0);
    assert_eq!(game.pickups.len(), 1);
    run(&mut game, 1.5);
    assert!(game.pickups.is_empty());
}

#[test]
fn test_mouse_aim_through_camera() {
    let mut game = Game::new(empty_arena(), 1);
    game.set_viewport(Camera::size_for_cells(80, 22));

    let target = game.player.position + Vec2::new(10.0, 0.0);
    let (column, row) = game.camera.world_to_cell(target).expect("on screen");
    let aimed = game.camera.cell_to_world(column, row);
    game.aim_at(aimed);

    assert!(game.aim_angle().abs() < 0.2);
}

#[test]
fn test_kill_streak_with_sword() {
    let mut game = Game::new(empty_arena(), 6);
    game.spawn_enemy(game.player.position + Vec2::new(4.0, 0.0));

    // Keep swinging until the goblin drops
    for _ in 0..240 {
        game.melee_attack();
        game.update(FRAME);
        if game.kills > 0 {
            break;
        }
    }
    assert_eq!(game.kills, 1);
    assert_eq!(game.player.active_weapon, WeaponKind::Sword);
}

#[test]
fn test_overwhelmed_player_is_defeated() {
    let mut config = empty_arena();
    config.player.max_health = 2;
    let mut game = Game::new(config, 3);
    for offset in [Vec2::new(3.0, 0.0), Vec2::new(-3.0, 0.0), Vec2::new(0.0, 3.0)] {
        game.spawn_enemy(game.player.position + offset);
    }

    run(&mut game, 5.0);
    assert_eq!(game.outcome(), Some(Outcome::Defeat));
    assert_eq!(game.player.health, 0);
}

#[test]
fn test_full_encounter_through_app() {
    let config = GameConfig::from_ron(
        "(encounter_secs: 2.0, terrain: [], spawn: (initial: [], interval_secs: 1000.0), audio: (enabled: false))",
    )
    .expect("valid config");
    let audio = AudioManager::from_config(&config.audio);
    let mut app = survivor::App::new(
        config,
        Some(9),
        audio,
        survivor::input::InputManager::new(true),
    );

    app.process_actions(&[InputAction::StartGame]);
    assert_eq!(app.game_state(), GameState::Playing);

    for _ in 0..50 {
        app.update(0.05);
    }
    assert_eq!(app.game_state(), GameState::Victory);
    assert_eq!(app.game().and_then(|g| g.outcome()), Some(Outcome::Victory));

    app.process_actions(&[InputAction::ReturnToMenu]);
    assert_eq!(app.game_state(), GameState::Menu);
}

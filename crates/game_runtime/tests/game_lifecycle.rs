//! End-to-end tests: manifest → scene → hooks → rapier → scene graph

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::block_on;
use game_runtime::assets::{FileSystemSource, MemoryAssetSource};
use game_runtime::controller::{DynamicCharacterController, JUMP_COOLDOWN_MS};
use game_runtime::prelude::*;
use game_runtime::scene::{GameObjectRegistry, ParentRef};

const BASE_URL: &str = "mem://arena";

const MANIFEST: &str = r#"{
    "rendererOptions": { "width": 640, "height": 480, "title": "Arena" },
    "scenes": {
        "arena": "scenes/arena.json",
        "lobby": "scenes/lobby.toml"
    }
}"#;

const ARENA: &str = r##"{
    "background": "#101820",
    "gameObjects": [
        {
            "name": "floor",
            "tags": ["ground"],
            "rigidBody": {
                "type": "fixed",
                "colliders": [ { "shape": "cuboid", "halfExtents": [20.0, 0.5, 20.0], "density": 1.0 } ]
            }
        },
        {
            "type": "DynamicCharacterController",
            "name": "player",
            "position": [0.0, 1.4, 0.0],
            "gameObjects": [ { "name": "camera", "position": [0.0, 0.6, 0.0] } ]
        },
        { "type": "Spawner", "name": "spawner" }
    ]
}"##;

const LOBBY: &str = r#"
background = "orange"

[[gameObjects]]
name = "sign"
tags = ["decor"]
"#;

/// Creates a child under itself once the scene is loaded
struct Spawner;

impl GameObjectBehavior for Spawner {
    fn after_loaded(&mut self, ctx: &mut HookContext<'_>) -> Result<(), GameError> {
        let child = GameObjectDescription::new(GameObjectOptions::named("spawned").with_tag("spawned"));
        ctx.scene
            .create_game_object(ParentRef::GameObject(ctx.id), child, &GameObjectRegistry::new())?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn arena_game() -> Game {
    let source = MemoryAssetSource::new()
        .with_file(format!("{BASE_URL}/game.json"), MANIFEST)
        .with_file(format!("{BASE_URL}/scenes/arena.json"), ARENA)
        .with_file(format!("{BASE_URL}/scenes/lobby.toml"), LOBBY);

    let mut game = Game::new(BASE_URL).unwrap().with_asset_source(source);
    game.register_game_object_classes([("Spawner", factory(|_| Ok(Box::new(Spawner))))]);
    game
}

fn run_frames(game: &mut Game, frames: u32, start_ms: f64) -> f64 {
    let dt = 1.0 / 60.0;
    let mut time = start_ms;
    for _ in 0..frames {
        time += f64::from(dt) * 1000.0;
        game.advance(FrameInfo::new(dt, time)).unwrap();
    }
    time
}

fn player_velocity(game: &Game) -> Vec3 {
    let scene = game.scene().unwrap();
    let body = scene.find_by_name("player").unwrap().rigid_body().unwrap();
    scene.physics().linvel(body).unwrap()
}

#[test]
fn test_arena_loads_and_wires_everything() {
    let mut game = arena_game();

    block_on(game.load_scene("arena")).unwrap();

    let scene = game.scene().unwrap();
    assert_eq!(scene.background(), Color::from_hex(0x10_18_20));
    assert_eq!(game.renderer().unwrap().canvas().width, 640);

    let player = scene.find_by_name("player").unwrap();
    assert!(player.behavior::<DynamicCharacterController>().is_some());
    assert!(player.rigid_body().is_some());
    assert!(scene.find_all_by_tag("ground")[0].rigid_body().is_some());
    assert_eq!(scene.physics().body_count(), 2);

    let spawner = scene.find_by_name("spawner").unwrap();
    let spawned = scene.find_by_name("spawned").unwrap();
    assert_eq!(spawned.parent(), Some(ParentRef::GameObject(spawner.id())));
    assert!(scene.graph().contains(spawned.id()));
    assert_eq!(scene.graph().node_count(), scene.len());
}

#[test]
fn test_player_settles_then_jumps() {
    let mut game = arena_game();
    block_on(game.load_scene("arena")).unwrap();
    game.play().unwrap();

    let time = run_frames(&mut game, 120, 0.0);
    assert!(time > JUMP_COOLDOWN_MS);
    assert!(player_velocity(&game).y.abs() < 0.1);

    let scene = game.scene().unwrap();
    let player = scene.find_by_name("player").unwrap();
    let camera = scene.find_by_name("camera").unwrap();
    let resting_height = player.world_transform().position.y;
    assert!((resting_height - 1.35).abs() < 0.05);
    assert!((camera.world_transform().position.y - (resting_height + 0.6)).abs() < 1e-3);

    game.handle_input(InputEvent::KeyPressed(KeyCode::Space));
    let time = run_frames(&mut game, 1, time);
    game.handle_input(InputEvent::KeyReleased(KeyCode::Space));

    assert!(player_velocity(&game).y > 1.0);
    let controller = game
        .scene()
        .unwrap()
        .find_by_name("player")
        .unwrap()
        .behavior::<DynamicCharacterController>()
        .unwrap();
    assert_eq!(controller.last_jump_time(), time);

    run_frames(&mut game, 10, time);
    let airborne = game.scene().unwrap().find_by_name("player").unwrap().world_transform().position.y;
    assert!(airborne > resting_height + 0.1);
}

#[test]
fn test_paused_game_does_not_simulate() {
    let mut game = arena_game();
    block_on(game.load_scene("arena")).unwrap();

    run_frames(&mut game, 30, 0.0);

    let scene = game.scene().unwrap();
    let player = scene.find_by_name("player").unwrap();
    assert_eq!(player.world_transform().position.y, 1.4);
    assert!(!game.renderer().unwrap().is_playing());
}

#[test]
fn test_switch_to_toml_scene() {
    let mut game = arena_game();
    block_on(game.load_scene("arena")).unwrap();

    block_on(game.load_scene("lobby")).unwrap();

    let scene = game.scene().unwrap();
    assert_eq!(scene.name(), "lobby");
    assert_eq!(scene.background(), Color::parse("orange").unwrap());
    assert_eq!(scene.len(), 1);
    assert_eq!(scene.physics().body_count(), 0);
    assert!(scene.find_by_name("sign").unwrap().has_tag("decor"));
}

#[test]
fn test_factory_error_aborts_load() {
    let mut game = arena_game();
    let calls = Rc::new(RefCell::new(0));
    let seen = Rc::clone(&calls);
    game.register_game_object_classes([(
        "Spawner",
        factory(move |_| {
            *seen.borrow_mut() += 1;
            Err(GameError::Custom("spawner offline".to_string()))
        }),
    )]);

    let result = block_on(game.load_scene("arena"));

    assert!(matches!(result, Err(GameError::Custom(message)) if message == "spawner offline"));
    assert_eq!(*calls.borrow(), 1);
    assert!(game.scene().is_none());
}

#[test]
fn test_loads_from_file_system() {
    let root = std::env::temp_dir().join(format!("game_runtime_fs_{}", std::process::id()));
    std::fs::create_dir_all(root.join("scenes")).unwrap();
    std::fs::write(root.join("game.json"), MANIFEST).unwrap();
    std::fs::write(root.join("scenes/lobby.toml"), LOBBY).unwrap();

    let mut game = Game::new(format!("file://{}", root.display()))
        .unwrap()
        .with_asset_source(FileSystemSource::new());
    let result = block_on(game.load_scene("lobby"));
    std::fs::remove_dir_all(&root).unwrap();

    result.unwrap();
    assert_eq!(game.scene().unwrap().find_by_name("sign").map(GameObject::name), Some(Some("sign")));
}

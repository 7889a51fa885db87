//! Headless demo
//!
//! Loads `game.json` from the demo's asset directory, plays scene `main`,
//! switches to `arena` half way through, and feeds scripted key presses to
//! the player's character controller.
//!
//! Usage: `hello_world [demo.toml]`

mod components;
mod config;

use futures::executor::block_on;
use game_runtime::config::Config;
use game_runtime::foundation::logging;
use game_runtime::prelude::*;

use components::{Follower, Spinner, FOLLOWER, SPINNER};
use config::DemoConfig;

const DEFAULT_CONFIG_PATH: &str = "demo.toml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting hello_world demo");

    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = DemoConfig::load_or_default(&config_path)?;
    log::info!("Demo: {} frames from {}", config.frames, config.asset_dir);

    let mut game = Game::new(format!("file://{}", config.asset_dir))?;
    game.register_game_object_classes([(SPINNER, Spinner::factory()), (FOLLOWER, Follower::factory())]);

    if let Err(e) = run(&mut game, &config) {
        log::error!("Demo error: {}", e);
        return Err(e.into());
    }

    if let Some(player) = game.scene().and_then(|scene| scene.find_by_name("player")) {
        let position = player.world_transform().position;
        log::info!("Demo: player finished at ({:.2}, {:.2}, {:.2})", position.x, position.y, position.z);
    }
    if let Some(renderer) = game.renderer() {
        log::info!("Demo: done, renderer playing = {}", renderer.is_playing());
    }
    Ok(())
}

fn run(game: &mut Game, config: &DemoConfig) -> Result<(), GameError> {
    block_on(game.load_scene("main"))?;
    game.play()?;

    let switch_at = config.frames / 2;
    let mut time = 0.0;
    for frame in 0..config.frames {
        if frame == switch_at {
            block_on(game.load_scene("arena"))?;
            game.play()?;
        }
        for event in config.events_at(frame) {
            game.handle_input(event);
        }

        time += f64::from(config.delta_time) * 1000.0;
        game.advance(FrameInfo::new(config.delta_time, time))?;
    }

    game.pause();
    Ok(())
}

#[cfg(test)]
mod tests {
    use game_runtime::scene::SceneDescription;

    use super::*;

    fn demo_game() -> Game {
        let config = DemoConfig::default();
        let mut game = Game::new(format!("file://{}", config.asset_dir)).unwrap();
        game.register_game_object_classes([(SPINNER, Spinner::factory()), (FOLLOWER, Follower::factory())]);
        game
    }

    #[test]
    fn test_shipped_arena_scene_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/scenes/arena.ron");
        let scene = SceneDescription::load_from_file(path).unwrap();

        assert_eq!(scene.game_objects.len(), 3);
        assert!(scene.game_objects[0].options.rigid_body.is_some());
        assert_eq!(scene.game_objects[1].kind.as_deref(), Some("DynamicCharacterController"));
        assert_eq!(scene.game_objects[2].kind.as_deref(), Some(SPINNER));
    }

    #[test]
    fn test_demo_switches_to_arena() {
        let mut game = demo_game();
        let config = DemoConfig {
            frames: 4,
            inputs: Vec::new(),
            ..Default::default()
        };

        run(&mut game, &config).unwrap();

        let scene = game.scene().unwrap();
        assert_eq!(scene.name(), "arena");
        assert!(scene.find_by_name("player").unwrap().rigid_body().is_some());
        assert!(scene.find_by_name("totem").unwrap().behavior::<Spinner>().is_some());
        assert!(!game.renderer().unwrap().is_playing());
    }
}

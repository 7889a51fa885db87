//! Demo game-object types

use std::any::Any;

use game_runtime::foundation::collections::GameObjectId;
use game_runtime::prelude::*;
use game_runtime::scene::GameObjectFactory;

/// Registered type name of [`Spinner`]
pub const SPINNER: &str = "Spinner";

/// Registered type name of [`Follower`]
pub const FOLLOWER: &str = "Follower";

/// Turns about its Y axis at a fixed rate
///
/// Options: `speed` in radians per second (default 1).
#[derive(Debug)]
pub struct Spinner {
    speed: f32,
}

impl Spinner {
    /// Factory reading `speed` from the object's options
    pub fn factory() -> GameObjectFactory {
        factory(|options| {
            let speed = options
                .extra_as::<f32>("speed")
                .map_err(|e| GameError::InvalidGameObjectOptions(format!("speed: {e}")))?
                .unwrap_or(1.0);
            Ok(Box::new(Self { speed }))
        })
    }
}

impl GameObjectBehavior for Spinner {
    fn before_render(&mut self, ctx: &mut HookContext<'_>, frame: &FrameInfo) -> Result<(), GameError> {
        if let Some(object) = ctx.game_object_mut() {
            let step = Quat::from_axis_angle(&Vec3::y_axis(), self.speed * frame.delta_time_in_sec);
            let transform = object.transform_mut();
            transform.rotation = step * transform.rotation;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Keeps itself at a fixed offset from a named target
///
/// Options: `target` (default `"player"`), `offset` as `[x, y, z]`.
#[derive(Debug)]
pub struct Follower {
    target_name: String,
    offset: Vec3,
    target: Option<GameObjectId>,
}

impl Follower {
    /// Factory reading `target` and `offset` from the object's options
    pub fn factory() -> GameObjectFactory {
        factory(|options| {
            let invalid = |e: serde_json::Error| GameError::InvalidGameObjectOptions(e.to_string());
            let target_name = options.extra_as::<String>("target").map_err(invalid)?;
            let offset = options.extra_as::<[f32; 3]>("offset").map_err(invalid)?;
            Ok(Box::new(Self {
                target_name: target_name.unwrap_or_else(|| "player".to_string()),
                offset: offset.map_or_else(|| Vec3::new(0.0, 2.0, 4.0), Vec3::from),
                target: None,
            }))
        })
    }

    /// Object being followed, once found
    pub fn target(&self) -> Option<GameObjectId> {
        self.target
    }
}

impl GameObjectBehavior for Follower {
    fn after_loaded(&mut self, ctx: &mut HookContext<'_>) -> Result<(), GameError> {
        self.target = ctx.scene.find_by_name(&self.target_name).map(GameObject::id);
        if self.target.is_none() {
            log::warn!("Follower: no game object named '{}'", self.target_name);
        }
        Ok(())
    }

    fn before_render(&mut self, ctx: &mut HookContext<'_>, _frame: &FrameInfo) -> Result<(), GameError> {
        let Some(target) = self.target.and_then(|id| ctx.scene.get(id)) else {
            return Ok(());
        };
        let position = target.world_transform().position + self.offset;
        if let Some(object) = ctx.game_object_mut() {
            object.transform_mut().position = position;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

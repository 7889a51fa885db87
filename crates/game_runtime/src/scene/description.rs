//! Declarative scene descriptions
//!
//! ```json
//! {
//!   "background": "lightblue",
//!   "gameObjects": [
//!     { "type": "DynamicCharacterController", "name": "player", "position": [0, 2, 0] },
//!     { "name": "room", "gameObjects": [ { "name": "lamp", "tags": ["light"] } ] }
//!   ]
//! }
//! ```
//!
//! `klass` is accepted as an alias of `type`.

use serde::{Deserialize, Serialize};

use super::{GameObjectFactory, GameObjectOptions};
use crate::assets::{Asset, AssetData};
use crate::config::Config;
use crate::game::GameError;
use crate::render::Color;

/// A whole scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneDescription {
    /// Background color; light blue when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    /// Root game objects in construction order
    pub game_objects: Vec<GameObjectDescription>,
}

impl Config for SceneDescription {}

impl SceneDescription {
    /// Parse a loaded scene asset (JSON, TOML, or RON)
    pub fn from_asset(asset: &Asset) -> Result<Self, GameError> {
        let invalid = |reason: String| GameError::InvalidSceneDescription {
            path: asset.path.clone(),
            reason,
        };

        match &asset.data {
            AssetData::Json(value) => Self::deserialize(value).map_err(|e| invalid(e.to_string())),
            AssetData::Text(text) => Self::parse(&asset.path, text).map_err(|e| invalid(e.to_string())),
            _ => Err(invalid("not a text document".to_string())),
        }
    }

    /// Append a root game object
    pub fn with_game_object(mut self, description: GameObjectDescription) -> Self {
        self.game_objects.push(description);
        self
    }
}

/// One game object and its nested children
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameObjectDescription {
    /// Registered type name
    #[serde(rename = "type", alias = "klass", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Explicit factory; takes precedence over `kind`
    #[serde(skip)]
    pub factory: Option<GameObjectFactory>,
    /// The object's own options
    #[serde(flatten)]
    pub options: GameObjectOptions,
    /// Children, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub game_objects: Vec<GameObjectDescription>,
}

impl GameObjectDescription {
    /// Description of a plain object with the given options
    pub fn new(options: GameObjectOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Set the registered type name
    pub fn of_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set an explicit factory
    pub fn with_factory(mut self, factory: GameObjectFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Append a child
    pub fn with_child(mut self, child: Self) -> Self {
        self.game_objects.push(child);
        self
    }
}

impl std::fmt::Debug for GameObjectDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObjectDescription")
            .field("kind", &self.kind)
            .field("factory", &self.factory.as_ref().map(|_| "<fn>"))
            .field("options", &self.options)
            .field("game_objects", &self.game_objects)
            .finish()
    }
}

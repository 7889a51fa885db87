//! Game object type registry
//!
//! Scene descriptions name game-object types by string. The registry maps
//! those names to factories producing the behaviour of the new object.

use std::collections::HashMap;
use std::rc::Rc;

use super::{GameObjectBehavior, GameObjectOptions};
use crate::game::GameError;

/// Builds the behaviour of a new game object
///
/// The factory may adjust the options (for example to contribute rigid-body
/// defaults) before the scene creates the node from them.
pub type GameObjectFactory =
    Rc<dyn Fn(&mut GameObjectOptions) -> Result<Box<dyn GameObjectBehavior>, GameError>>;

/// Wrap a closure as a [`GameObjectFactory`]
pub fn factory<F>(build: F) -> GameObjectFactory
where
    F: Fn(&mut GameObjectOptions) -> Result<Box<dyn GameObjectBehavior>, GameError> + 'static,
{
    Rc::new(build)
}

/// Type name → factory table
#[derive(Clone, Default)]
pub struct GameObjectRegistry {
    classes: HashMap<String, GameObjectFactory>,
}

impl GameObjectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one type, replacing any previous registration of the name
    pub fn register(&mut self, name: impl Into<String>, factory: GameObjectFactory) {
        let name = name.into();
        if self.classes.insert(name.clone(), factory).is_some() {
            log::debug!("GameObjectRegistry: '{}' re-registered", name);
        }
    }

    /// Merge a batch of registrations; later entries win
    pub fn register_classes<I, S>(&mut self, classes: I)
    where
        I: IntoIterator<Item = (S, GameObjectFactory)>,
        S: Into<String>,
    {
        for (name, factory) in classes {
            self.register(name, factory);
        }
    }

    /// Factory registered under `name`
    pub fn get(&self, name: &str) -> Option<GameObjectFactory> {
        self.classes.get(name).cloned()
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Registered type names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for GameObjectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObjectRegistry").field("classes", &self.names()).finish()
    }
}

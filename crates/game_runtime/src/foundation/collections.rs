//! Specialized collection types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a game object inside a scene's arena
    pub struct GameObjectId;

    /// Handle to a rigid body owned by a physics backend
    pub struct BodyHandle;
}

use crate::domain::value_objects::CharacterId;

/// Port for scene geometry computed by the host
#[cfg_attr(test, mockall::automock)]
pub trait GeometryPort: Send + Sync {
    /// Distance between two characters' tokens, honouring walls and cover
    ///
    /// Returns `None` when line of effect is blocked or either token is not
    /// on the active scene.
    fn distance(&self, from: CharacterId, to: CharacterId) -> Option<f64>;
}

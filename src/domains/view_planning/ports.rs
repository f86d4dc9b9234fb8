use super::types::Arena;
use crate::common::DomainResult;

/// Port the view_planning domain depends on for loading arenas.
/// Adapters provide filesystem or network-backed sources.
pub trait ArenaSource: Send + Sync {
    fn load_arena(&self, name: &str) -> DomainResult<Arena>;

    /// Names of the arenas this source can load.
    fn list_arenas(&self) -> DomainResult<Vec<String>>;
}

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::colors::{ColorCycler, ENTITY_SHADE};
use crate::core::types::{Activity, ActivityId, Resident, ResidentId};
use crate::error::{TraceError, TraceResult};

/// Name-keyed entity stored in a [`Registry`].
pub trait Entity: Clone {
    type Id: Copy + Eq + std::fmt::Debug;

    fn name(&self) -> &str;
    fn discovered(name: &str, color: &str) -> Self;
    fn id_at(index: usize) -> Self::Id;
    fn index_of(id: Self::Id) -> usize;
}

impl Entity for Resident {
    type Id = ResidentId;

    fn name(&self) -> &str {
        &self.name
    }

    fn discovered(name: &str, color: &str) -> Self {
        Resident::new(name, color)
    }

    fn id_at(index: usize) -> ResidentId {
        ResidentId(index)
    }

    fn index_of(id: ResidentId) -> usize {
        id.0
    }
}

impl Entity for Activity {
    type Id = ActivityId;

    fn name(&self) -> &str {
        &self.name
    }

    fn discovered(name: &str, color: &str) -> Self {
        Activity::new(name, color)
    }

    fn id_at(index: usize) -> ActivityId {
        ActivityId(index)
    }

    fn index_of(id: ActivityId) -> usize {
        id.0
    }
}

/// Append-only arena of entities with a name lookup.
///
/// Ids are insertion positions and never change; entries are never renamed
/// or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry<T: Entity> {
    entries: IndexMap<String, T>,
}

pub type ResidentRegistry = Registry<Resident>;
pub type ActivityRegistry = Registry<Activity>;

impl<T: Entity> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T: Entity> Registry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the registry from declared entities. Later duplicates of a name are dropped.
    #[must_use]
    pub fn from_declared(declared: impl IntoIterator<Item = T>) -> Self {
        let mut entries = IndexMap::new();
        for entity in declared {
            if entries.contains_key(entity.name()) {
                warn!(name = entity.name(), "duplicate declared entity ignored");
                continue;
            }
            entries.insert(entity.name().to_owned(), entity);
        }
        Self { entries }
    }

    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<T::Id> {
        self.entries.get_index_of(name).map(T::id_at)
    }

    #[must_use]
    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.entries.get_index(T::index_of(id)).map(|(_, entity)| entity)
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (T::Id, &T)> + '_ {
        self.entries
            .values()
            .enumerate()
            .map(|(index, entity)| (T::id_at(index), entity))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Starts a discovery batch against the current registry contents.
    #[must_use]
    pub fn begin_batch(&self) -> PendingEntities<T> {
        PendingEntities {
            base_len: self.entries.len(),
            staged: IndexMap::new(),
        }
    }

    /// Appends a batch's staged entities. Fails if the registry grew since
    /// the batch started, since the staged ids would no longer line up.
    pub fn commit(&mut self, batch: PendingEntities<T>) -> TraceResult<usize> {
        if batch.base_len != self.entries.len() {
            return Err(TraceError::InvalidData(format!(
                "stale entity batch: started at {} entries, registry now has {}",
                batch.base_len,
                self.entries.len()
            )));
        }
        let added = batch.staged.len();
        for (name, entity) in batch.staged {
            debug!(name = %name, "committing discovered entity");
            self.entries.insert(name, entity);
        }
        Ok(added)
    }
}

/// Entities discovered during one materialization, not yet visible in the registry.
#[derive(Debug, Clone)]
pub struct PendingEntities<T: Entity> {
    base_len: usize,
    staged: IndexMap<String, T>,
}

impl<T: Entity> PendingEntities<T> {
    /// Resolves `name` against the registry, then against this batch, staging
    /// a new entity with the next cycled color on first sight. Empty names
    /// resolve to `None` and are never created.
    pub fn resolve_or_stage(
        &mut self,
        registry: &Registry<T>,
        name: &str,
        cycler: &mut ColorCycler,
    ) -> Option<T::Id> {
        if name.is_empty() {
            return None;
        }
        if let Some(id) = registry.resolve(name) {
            return Some(id);
        }
        if let Some(index) = self.staged.get_index_of(name) {
            return Some(T::id_at(self.base_len + index));
        }

        let color = cycler.next(ENTITY_SHADE);
        let index = self.staged.len();
        self.staged
            .insert(name.to_owned(), T::discovered(name, color));
        Some(T::id_at(self.base_len + index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn staged(&self) -> impl Iterator<Item = &T> + '_ {
        self.staged.values()
    }
}

#[cfg(test)]
mod tests {
    use super::{Registry, ResidentRegistry};
    use crate::core::colors::ColorCycler;
    use crate::core::types::{Resident, ResidentId};

    #[test]
    fn staged_ids_match_committed_positions() {
        let mut registry = ResidentRegistry::from_declared([Resident::new("Ann", "#000000")]);
        let mut cycler = ColorCycler::new();
        let mut batch = registry.begin_batch();

        assert_eq!(
            batch.resolve_or_stage(&registry, "Ann", &mut cycler),
            Some(ResidentId(0))
        );
        assert_eq!(
            batch.resolve_or_stage(&registry, "Bob", &mut cycler),
            Some(ResidentId(1))
        );
        assert_eq!(
            batch.resolve_or_stage(&registry, "Bob", &mut cycler),
            Some(ResidentId(1))
        );
        assert_eq!(batch.resolve_or_stage(&registry, "", &mut cycler), None);
        assert_eq!(registry.resolve("Bob"), None);

        assert_eq!(registry.commit(batch).expect("commit"), 1);
        assert_eq!(registry.resolve("Bob"), Some(ResidentId(1)));
        assert_eq!(registry.get(ResidentId(1)).unwrap().color, "#ff8a80");
    }

    #[test]
    fn stale_batch_is_rejected() {
        let mut registry: Registry<Resident> = Registry::new();
        let mut cycler = ColorCycler::new();
        let mut first = registry.begin_batch();
        let mut second = registry.begin_batch();
        first.resolve_or_stage(&registry, "Ann", &mut cycler);
        second.resolve_or_stage(&registry, "Bob", &mut cycler);

        registry.commit(first).expect("first commit");
        assert!(registry.commit(second).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn declared_duplicates_keep_first() {
        let registry = ResidentRegistry::from_declared([
            Resident::new("Ann", "#111111"),
            Resident::new("Ann", "#222222"),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.by_name("Ann").unwrap().color, "#111111");
    }
}

use indexmap::IndexMap;

use crate::message::HeaderView;
use crate::transport::MessageId;

/// Package messages found in one discovery pass, most recent first.
///
/// A catalog is a snapshot; it is rebuilt by every discovery and never
/// updated in place.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: IndexMap<MessageId, HeaderView>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, id: MessageId, view: HeaderView) {
        self.entries.insert(id, view);
    }

    /// First entry, in discovery order, tagged with `name` at `version`.
    pub fn find(&self, name: &str, version: &str) -> Option<MessageId> {
        self.entries
            .iter()
            .find(|(_, view)| view.matches(name, version))
            .map(|(id, _)| *id)
    }

    pub fn get(&self, id: MessageId) -> Option<&HeaderView> {
        self.entries.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MessageId, &HeaderView)> {
        self.entries.iter()
    }

    /// Distinct (name, version) pairs in discovery order.
    pub fn projects(&self) -> Vec<(String, String)> {
        let mut seen = Vec::new();
        for view in self.entries.values() {
            let pair = (view.project_name.clone(), view.project_version.clone());
            if !seen.contains(&pair) {
                seen.push(pair);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

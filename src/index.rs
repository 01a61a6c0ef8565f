//! Secondary indices over the configuration tree.
//!
//! Maps natural keys (namespace name, or namespace + resource name) to the
//! current position of their target in the backing ordered sequences. The
//! index is rebuilt after load and after rollback, and maintained
//! incrementally across mutations; after a deletion every same-kind
//! sibling positioned after the removed element shifts down by one.

use std::collections::HashMap;

use crate::types::{Agent, Configuration, Controller, Microservice, Namespace, Record, ResourceKind};

/// Position of a resource record: the namespace's position in the
/// configuration and the record's position within its owning sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePos {
    pub namespace: usize,
    pub resource: usize,
}

type ResourceMap = HashMap<(String, String), ResourcePos>;

// ---------------------------------------------------------------------------
// ConfigIndex
// ---------------------------------------------------------------------------

/// Lookup structures derived from a `Configuration`.
#[derive(Debug, Clone, Default)]
pub struct ConfigIndex {
    namespaces: HashMap<String, usize>,
    controllers: ResourceMap,
    agents: ResourceMap,
    microservices: ResourceMap,
}

impl ConfigIndex {
    /// Build all indices from a configuration in O(total resource count).
    pub fn build(config: &Configuration) -> Self {
        let mut index = ConfigIndex::default();
        for (i, ns) in config.namespaces.iter().enumerate() {
            index.namespaces.insert(ns.name.clone(), i);
            index.index_kind::<Controller>(ns, i);
            index.index_kind::<Agent>(ns, i);
            index.index_kind::<Microservice>(ns, i);
        }
        index
    }

    fn index_kind<R: Record>(&mut self, ns: &Namespace, ns_pos: usize) {
        for (j, record) in R::sequence(ns).iter().enumerate() {
            self.map_mut(R::KIND).insert(
                (ns.name.clone(), record.name().to_string()),
                ResourcePos {
                    namespace: ns_pos,
                    resource: j,
                },
            );
        }
    }

    fn map(&self, kind: ResourceKind) -> &ResourceMap {
        match kind {
            ResourceKind::Controller => &self.controllers,
            ResourceKind::Agent => &self.agents,
            ResourceKind::Microservice => &self.microservices,
        }
    }

    fn map_mut(&mut self, kind: ResourceKind) -> &mut ResourceMap {
        match kind {
            ResourceKind::Controller => &mut self.controllers,
            ResourceKind::Agent => &mut self.agents,
            ResourceKind::Microservice => &mut self.microservices,
        }
    }

    // -------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------

    /// Position of a namespace in the configuration.
    pub fn namespace_pos(&self, name: &str) -> Option<usize> {
        self.namespaces.get(name).copied()
    }

    /// Position of a resource of the given kind.
    pub fn resource_pos(
        &self,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Option<ResourcePos> {
        self.map(kind)
            .get(&(namespace.to_string(), name.to_string()))
            .copied()
    }

    // -------------------------------------------------------------------
    // Maintenance
    // -------------------------------------------------------------------

    pub fn insert_namespace(&mut self, name: &str, pos: usize) {
        self.namespaces.insert(name.to_string(), pos);
    }

    pub fn insert_resource(
        &mut self,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
        pos: ResourcePos,
    ) {
        self.map_mut(kind)
            .insert((namespace.to_string(), name.to_string()), pos);
    }

    pub fn remove_resource(
        &mut self,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Option<ResourcePos> {
        self.map_mut(kind)
            .remove(&(namespace.to_string(), name.to_string()))
    }

    /// Shift down every same-namespace entry of `kind` positioned after a
    /// removed element.
    pub fn shift_down_after(&mut self, kind: ResourceKind, namespace: &str, removed: usize) {
        for ((ns, _), pos) in self.map_mut(kind).iter_mut() {
            if ns == namespace && pos.resource > removed {
                pos.resource -= 1;
            }
        }
    }

    // -------------------------------------------------------------------
    // Consistency audit
    // -------------------------------------------------------------------

    /// Check the index against the configuration it should describe.
    ///
    /// Returns a list of discrepancy messages; an empty list means every
    /// entry references the current position of its target and no stale
    /// entries remain.
    pub fn check(&self, config: &Configuration) -> Vec<String> {
        let mut errors = Vec::new();

        for (i, ns) in config.namespaces.iter().enumerate() {
            if self.namespaces.get(&ns.name) != Some(&i) {
                errors.push(format!(
                    "namespace '{}' at position {} not indexed there",
                    ns.name, i
                ));
            }
        }
        if self.namespaces.len() != config.namespaces.len() {
            errors.push(format!(
                "namespace index has {} entries, configuration has {}",
                self.namespaces.len(),
                config.namespaces.len()
            ));
        }

        self.check_kind::<Controller>(config, &mut errors);
        self.check_kind::<Agent>(config, &mut errors);
        self.check_kind::<Microservice>(config, &mut errors);

        errors
    }

    fn check_kind<R: Record>(&self, config: &Configuration, errors: &mut Vec<String>) {
        let mut total = 0;
        for (i, ns) in config.namespaces.iter().enumerate() {
            for (j, record) in R::sequence(ns).iter().enumerate() {
                total += 1;
                let expected = ResourcePos {
                    namespace: i,
                    resource: j,
                };
                if self.resource_pos(R::KIND, &ns.name, record.name()) != Some(expected) {
                    errors.push(format!(
                        "{} '{}/{}' at ({}, {}) not indexed there",
                        R::KIND,
                        ns.name,
                        record.name(),
                        i,
                        j
                    ));
                }
            }
        }
        if self.map(R::KIND).len() != total {
            errors.push(format!(
                "{} index has {} entries, configuration has {}",
                R::KIND,
                self.map(R::KIND).len(),
                total
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! The public CRUD surface over the configuration tree.
//!
//! Every mutating call is its own commit: the tree and indices are updated
//! together, then the whole configuration is written back to the file. If
//! the write fails, the snapshot taken before the mutation is restored and
//! the indices are rebuilt from it, so the in-memory state never drifts
//! from the last successfully persisted state.

use std::path::{Path, PathBuf};

use crate::errors::StoreError;
use crate::file;
use crate::index::{ConfigIndex, ResourcePos};
use crate::types::{Agent, Configuration, Controller, Microservice, Namespace, Record};

// ---------------------------------------------------------------------------
// ConfigStore
// ---------------------------------------------------------------------------

/// Namespaced store over a single configuration file.
///
/// Single-threaded, single-process. The backing file has no locking
/// discipline: concurrent invocations of the tool against the same file
/// race, and the last writer wins. Reads return copies; returned values
/// never alias store-internal state.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: Configuration,
    index: ConfigIndex,
}

impl ConfigStore {
    /// Open a store over an existing configuration file.
    ///
    /// Any read or parse failure propagates; there is no partial-load
    /// fallback.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let config = file::load(&path)?;
        let index = ConfigIndex::build(&config);
        Ok(ConfigStore {
            path,
            config,
            index,
        })
    }

    /// Open a store, starting from an empty configuration if the file does
    /// not exist yet. The file is first written by the first mutation.
    pub fn open_or_create(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let config = if path.exists() {
            file::load(&path)?
        } else {
            Configuration::default()
        };
        let index = ConfigIndex::build(&config);
        Ok(ConfigStore {
            path,
            config,
            index,
        })
    }

    /// The resolved file path this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current secondary indices.
    pub fn index(&self) -> &ConfigIndex {
        &self.index
    }

    /// A copy of the full configuration tree.
    pub fn configuration(&self) -> Configuration {
        self.config.clone()
    }

    // -------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------

    /// Names of all namespaces, in file order. Never fails.
    pub fn list_namespaces(&self) -> Vec<String> {
        self.config
            .namespaces
            .iter()
            .map(|ns| ns.name.clone())
            .collect()
    }

    /// A copy of the named namespace and everything it owns.
    pub fn get_namespace(&self, name: &str) -> Result<Namespace, StoreError> {
        let pos = self
            .index
            .namespace_pos(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        Ok(self.config.namespaces[pos].clone())
    }

    pub fn list_controllers(&self, namespace: &str) -> Result<Vec<Controller>, StoreError> {
        self.list_resources(namespace)
    }

    pub fn list_agents(&self, namespace: &str) -> Result<Vec<Agent>, StoreError> {
        self.list_resources(namespace)
    }

    pub fn list_microservices(&self, namespace: &str) -> Result<Vec<Microservice>, StoreError> {
        self.list_resources(namespace)
    }

    pub fn get_controller(&self, namespace: &str, name: &str) -> Result<Controller, StoreError> {
        self.get_resource(namespace, name)
    }

    pub fn get_agent(&self, namespace: &str, name: &str) -> Result<Agent, StoreError> {
        self.get_resource(namespace, name)
    }

    pub fn get_microservice(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Microservice, StoreError> {
        self.get_resource(namespace, name)
    }

    // -------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------

    /// Create an empty namespace.
    pub fn add_namespace(&mut self, name: &str) -> Result<(), StoreError> {
        if self.index.namespace_pos(name).is_some() {
            return Err(StoreError::Conflict(name.to_string()));
        }
        let before = self.config.clone();
        self.config.namespaces.push(Namespace::new(name));
        self.index
            .insert_namespace(name, self.config.namespaces.len() - 1);
        self.commit(before)
    }

    /// Delete a namespace and every resource it owns.
    pub fn delete_namespace(&mut self, name: &str) -> Result<(), StoreError> {
        let pos = self
            .index
            .namespace_pos(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let before = self.config.clone();
        self.config.namespaces.remove(pos);
        // Every later namespace and all of its resource entries shift.
        self.index = ConfigIndex::build(&self.config);
        self.commit(before)
    }

    pub fn add_controller(
        &mut self,
        namespace: &str,
        controller: Controller,
    ) -> Result<(), StoreError> {
        self.add_resource(namespace, controller)
    }

    pub fn add_agent(&mut self, namespace: &str, agent: Agent) -> Result<(), StoreError> {
        self.add_resource(namespace, agent)
    }

    pub fn add_microservice(
        &mut self,
        namespace: &str,
        microservice: Microservice,
    ) -> Result<(), StoreError> {
        self.add_resource(namespace, microservice)
    }

    pub fn delete_controller(&mut self, namespace: &str, name: &str) -> Result<(), StoreError> {
        self.delete_resource::<Controller>(namespace, name)
    }

    pub fn delete_agent(&mut self, namespace: &str, name: &str) -> Result<(), StoreError> {
        self.delete_resource::<Agent>(namespace, name)
    }

    pub fn delete_microservice(&mut self, namespace: &str, name: &str) -> Result<(), StoreError> {
        self.delete_resource::<Microservice>(namespace, name)
    }

    // -------------------------------------------------------------------
    // Internal
    // -------------------------------------------------------------------

    fn list_resources<R: Record>(&self, namespace: &str) -> Result<Vec<R>, StoreError> {
        let pos = self
            .index
            .namespace_pos(namespace)
            .ok_or_else(|| StoreError::NotFound(namespace.to_string()))?;
        Ok(R::sequence(&self.config.namespaces[pos]).to_vec())
    }

    fn get_resource<R: Record>(&self, namespace: &str, name: &str) -> Result<R, StoreError> {
        let pos = self
            .index
            .resource_pos(R::KIND, namespace, name)
            .ok_or_else(|| StoreError::NotFound(resource_key(namespace, name)))?;
        Ok(R::sequence(&self.config.namespaces[pos.namespace])[pos.resource].clone())
    }

    fn add_resource<R: Record>(&mut self, namespace: &str, record: R) -> Result<(), StoreError> {
        let ns_pos = self
            .index
            .namespace_pos(namespace)
            .ok_or_else(|| StoreError::NotFound(namespace.to_string()))?;
        let name = record.name().to_string();
        if self.index.resource_pos(R::KIND, namespace, &name).is_some() {
            return Err(StoreError::Conflict(resource_key(namespace, &name)));
        }
        let before = self.config.clone();
        let sequence = R::sequence_mut(&mut self.config.namespaces[ns_pos]);
        let pos = ResourcePos {
            namespace: ns_pos,
            resource: sequence.len(),
        };
        sequence.push(record);
        self.index.insert_resource(R::KIND, namespace, &name, pos);
        self.commit(before)
    }

    fn delete_resource<R: Record>(&mut self, namespace: &str, name: &str) -> Result<(), StoreError> {
        let pos = self
            .index
            .resource_pos(R::KIND, namespace, name)
            .ok_or_else(|| StoreError::NotFound(resource_key(namespace, name)))?;
        let before = self.config.clone();
        R::sequence_mut(&mut self.config.namespaces[pos.namespace]).remove(pos.resource);
        self.index.remove_resource(R::KIND, namespace, name);
        self.index.shift_down_after(R::KIND, namespace, pos.resource);
        self.commit(before)
    }

    /// Persist the mutated tree. On write failure, restore the snapshot
    /// taken before the mutation, rebuild the indices from it, and return
    /// the original write error.
    fn commit(&mut self, before: Configuration) -> Result<(), StoreError> {
        match file::save(&self.path, &self.config) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.config = before;
                self.index = ConfigIndex::build(&self.config);
                Err(err)
            }
        }
    }
}

fn resource_key(namespace: &str, name: &str) -> String {
    format!("{}/{}", namespace, name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

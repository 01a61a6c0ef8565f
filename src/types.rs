//! Data model for the persisted configuration tree.
//!
//! The wire format is a YAML document with a top-level `namespaces` list;
//! record fields keep their camelCase wire names (`keyFile`, `kubeConfig`).
//! Absent fields deserialize to empty values, unknown fields are ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Configuration tree
// ---------------------------------------------------------------------------

/// The root persisted entity: an ordered sequence of namespaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub namespaces: Vec<Namespace>,
}

/// A named scope owning ordered lists of the three resource kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespace {
    pub name: String,
    pub controllers: Vec<Controller>,
    pub agents: Vec<Agent>,
    pub microservices: Vec<Microservice>,
}

impl Namespace {
    /// Create an empty namespace with the given name.
    pub fn new(name: &str) -> Self {
        Namespace {
            name: name.to_string(),
            ..Namespace::default()
        }
    }
}

/// How a control-plane instance is reached. No live state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Controller {
    pub name: String,
    pub user: String,
    pub host: String,
    pub key_file: String,
    pub kube_config: String,
}

/// How an edge node is reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Agent {
    pub name: String,
    pub user: String,
    pub host: String,
    pub key_file: String,
}

/// A deployed workload unit and the flow it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Microservice {
    pub name: String,
    pub flow: String,
}

// ---------------------------------------------------------------------------
// Per-entity display (one line per record, for the command layer to print)
// ---------------------------------------------------------------------------

impl fmt::Display for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}@{}", self.name, self.user, self.host)?;
        if !self.kube_config.is_empty() {
            write!(f, " kubeconfig={}", self.kube_config)?;
        }
        Ok(())
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}@{}", self.name, self.user, self.host)
    }
}

impl fmt::Display for Microservice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} flow={}", self.name, self.flow)
    }
}

// ---------------------------------------------------------------------------
// Resource kinds
// ---------------------------------------------------------------------------

/// The closed set of resource kinds a namespace owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Controller,
    Agent,
    Microservice,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Controller => write!(f, "controller"),
            ResourceKind::Agent => write!(f, "agent"),
            ResourceKind::Microservice => write!(f, "microservice"),
        }
    }
}

/// Maps a record type to its kind and its owning sequence inside a
/// namespace. Implemented exactly once per resource kind, so every
/// kind-dispatching call site is checked at compile time.
pub trait Record: Clone {
    const KIND: ResourceKind;

    fn name(&self) -> &str;

    /// The record's owning ordered sequence within a namespace.
    fn sequence(ns: &Namespace) -> &[Self];

    fn sequence_mut(ns: &mut Namespace) -> &mut Vec<Self>;
}

impl Record for Controller {
    const KIND: ResourceKind = ResourceKind::Controller;

    fn name(&self) -> &str {
        &self.name
    }

    fn sequence(ns: &Namespace) -> &[Self] {
        &ns.controllers
    }

    fn sequence_mut(ns: &mut Namespace) -> &mut Vec<Self> {
        &mut ns.controllers
    }
}

impl Record for Agent {
    const KIND: ResourceKind = ResourceKind::Agent;

    fn name(&self) -> &str {
        &self.name
    }

    fn sequence(ns: &Namespace) -> &[Self] {
        &ns.agents
    }

    fn sequence_mut(ns: &mut Namespace) -> &mut Vec<Self> {
        &mut ns.agents
    }
}

impl Record for Microservice {
    const KIND: ResourceKind = ResourceKind::Microservice;

    fn name(&self) -> &str {
        &self.name
    }

    fn sequence(ns: &Namespace) -> &[Self] {
        &ns.microservices
    }

    fn sequence_mut(ns: &mut Namespace) -> &mut Vec<Self> {
        &mut ns.microservices
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

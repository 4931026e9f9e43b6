// ABOUTME: In-memory agent registry - CRUD over agent definitions with timestamps.
// ABOUTME: Implements the core's AgentDirectory lookup; process-scoped and volatile.

use chrono::Utc;
use lull_agent::AgentDefinition;
use lull_core::AgentDirectory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// One stored agent: its definition plus bookkeeping timestamps, as returned
/// by the CRUD API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentRecord {
    #[serde(flatten)]
    pub definition: AgentDefinition,
    pub created_at: String,
    pub updated_at: String,
}

/// Process-wide agent registry. A database would replace this in a larger
/// deployment; the gateway keeps agents in memory like the rest of its state.
#[derive(Default)]
pub struct AgentStore {
    agents: RwLock<HashMap<String, AgentRecord>>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// All agents, oldest first.
    pub fn list(&self) -> Vec<AgentRecord> {
        let mut records: Vec<_> = self.read().values().cloned().collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.definition.id.cmp(&b.definition.id))
        });
        records
    }

    pub fn get(&self, agent_id: &str) -> Option<AgentRecord> {
        self.read().get(agent_id).cloned()
    }

    /// Insert a new agent. Returns `None` when the id is already taken.
    pub fn create(&self, definition: AgentDefinition) -> Option<AgentRecord> {
        let mut agents = self.write();
        if agents.contains_key(&definition.id) {
            return None;
        }
        let now = Utc::now().to_rfc3339();
        let record = AgentRecord {
            definition,
            created_at: now.clone(),
            updated_at: now,
        };
        agents.insert(record.definition.id.clone(), record.clone());
        Some(record)
    }

    /// Replace an existing agent's definition, keeping its created_at.
    /// Returns `None` when the id is unknown.
    pub fn update(&self, agent_id: &str, mut definition: AgentDefinition) -> Option<AgentRecord> {
        definition.id = agent_id.to_string();
        let mut agents = self.write();
        let record = agents.get_mut(agent_id)?;
        record.definition = definition;
        record.updated_at = Utc::now().to_rfc3339();
        Some(record.clone())
    }

    /// Remove an agent. Returns whether it existed.
    pub fn remove(&self, agent_id: &str) -> bool {
        self.write().remove(agent_id).is_some()
    }

    /// Create `definition` only if the store is empty. Used to seed the
    /// default agent at startup.
    pub fn seed_default(&self, definition: AgentDefinition) -> Option<AgentRecord> {
        if !self.read().is_empty() {
            return None;
        }
        self.create(definition)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, AgentRecord>> {
        self.agents.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, AgentRecord>> {
        self.agents.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl AgentDirectory for AgentStore {
    fn lookup(&self, agent_id: &str) -> Option<AgentDefinition> {
        self.read().get(agent_id).map(|r| r.definition.clone())
    }
}

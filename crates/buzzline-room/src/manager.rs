//! Room manager: the registry of running rooms, keyed by label.
//!
//! Rooms are provisioned up front (at server startup); a connection
//! naming an unknown room is refused at the session layer rather than
//! auto-creating one.

use std::collections::HashMap;

use buzzline_store::Store;

use crate::actor::{spawn_room, RoomHandle, RoomStatus};
use crate::RoomConfig;

pub struct RoomManager {
    config: RoomConfig,
    rooms: HashMap<String, RoomHandle>,
}

impl RoomManager {
    pub fn new(config: RoomConfig) -> Self {
        Self { config, rooms: HashMap::new() }
    }

    /// Spawns a room under `label`, or returns the existing handle if
    /// one is already running.
    pub fn create_room<S: Store>(
        &mut self,
        label: &str,
        store: S,
    ) -> RoomHandle {
        if let Some(handle) = self.rooms.get(label) {
            return handle.clone();
        }
        let handle = spawn_room(label, self.config.clone(), store);
        self.rooms.insert(label.to_string(), handle.clone());
        tracing::info!(room = %label, "room created");
        handle
    }

    /// Looks up a running room.
    pub fn room(&self, label: &str) -> Option<RoomHandle> {
        self.rooms.get(label).cloned()
    }

    pub fn labels(&self) -> Vec<String> {
        self.rooms.keys().cloned().collect()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Queries every room for its status. Rooms that fail to respond
    /// (shutting down) are skipped.
    pub async fn statuses(&self) -> Vec<RoomStatus> {
        let mut statuses = Vec::with_capacity(self.rooms.len());
        for handle in self.rooms.values() {
            if let Ok(status) = handle.status().await {
                statuses.push(status);
            }
        }
        statuses
    }

    /// Shuts down every room and empties the registry.
    pub async fn shutdown_all(&mut self) {
        for (label, handle) in self.rooms.drain() {
            let _ = handle.shutdown().await;
            tracing::info!(room = %label, "room destroyed");
        }
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use buzzline_store::MemoryStore;

    #[tokio::test]
    async fn test_create_room_reuses_running_room() {
        let store = MemoryStore::new();
        let mut manager = RoomManager::default();

        let first = manager.create_room("lobby", store.clone());
        let second = manager.create_room("lobby", store);
        assert_eq!(first.label(), second.label());
        assert_eq!(manager.room_count(), 1);
    }

    #[tokio::test]
    async fn test_statuses_covers_every_room() {
        let store = MemoryStore::new();
        let mut manager = RoomManager::default();
        manager.create_room("lobby", store.clone());
        manager.create_room("science", store);

        let statuses = manager.statuses().await;
        let mut labels: Vec<_> =
            statuses.iter().map(|s| s.label.clone()).collect();
        labels.sort();
        assert_eq!(labels, ["lobby", "science"]);
        assert!(statuses.iter().all(|s| s.players == 0));
    }

    #[tokio::test]
    async fn test_shutdown_all_stops_rooms_and_empties_registry() {
        let store = MemoryStore::new();
        let mut manager = RoomManager::default();
        let handle = manager.create_room("lobby", store);

        manager.shutdown_all().await;
        assert_eq!(manager.room_count(), 0);
        assert!(manager.room("lobby").is_none());
        // The stopped actor no longer answers.
        assert!(handle.status().await.is_err());
    }
}

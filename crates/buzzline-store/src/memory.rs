//! In-memory store backend.

use std::collections::HashMap;
use std::sync::Arc;

use buzzline_protocol::{Category, Difficulty, PlayerId, UserId};
use tokio::sync::Mutex;

use crate::entities::{Message, Player, Question, RoomRecord, User};
use crate::error::StoreError;
use crate::Store;

/// An in-memory [`Store`].
///
/// Clones share the same state. Everything is held behind a single async
/// mutex — contention is per-request and requests are short, so finer
/// locking hasn't been worth it.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<UserId, User>,
    players: HashMap<PlayerId, Player>,
    rooms: HashMap<String, RoomRecord>,
    questions: Vec<Question>,
    messages: HashMap<String, Message>,
    // Feed order per room; `messages` alone loses append order.
    feed_order: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    async fn user(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().await.users.get(id).cloned())
    }

    async fn create_user(&self, user: User) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.users.contains_key(&user.user_id) {
            return Err(StoreError::conflict("user", user.user_id.0));
        }
        inner.users.insert(user.user_id.clone(), user);
        Ok(())
    }

    async fn update_user(&self, user: User) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.users.contains_key(&user.user_id) {
            return Err(StoreError::not_found("user", user.user_id.0));
        }
        inner.users.insert(user.user_id.clone(), user);
        Ok(())
    }

    async fn save_player(&self, player: Player) -> Result<(), StoreError> {
        self.inner
            .lock()
            .await
            .players
            .insert(player.player_id.clone(), player);
        Ok(())
    }

    async fn players_in_room(
        &self,
        label: &str,
    ) -> Result<Vec<Player>, StoreError> {
        Ok(self
            .inner
            .lock()
            .await
            .players
            .values()
            .filter(|p| p.room == label)
            .cloned()
            .collect())
    }

    async fn save_room(&self, room: RoomRecord) -> Result<(), StoreError> {
        self.inner
            .lock()
            .await
            .rooms
            .insert(room.label.clone(), room);
        Ok(())
    }

    async fn room(
        &self,
        label: &str,
    ) -> Result<Option<RoomRecord>, StoreError> {
        Ok(self.inner.lock().await.rooms.get(label).cloned())
    }

    async fn add_question(
        &self,
        question: Question,
    ) -> Result<(), StoreError> {
        self.inner.lock().await.questions.push(question);
        Ok(())
    }

    async fn question(
        &self,
        id: &str,
    ) -> Result<Option<Question>, StoreError> {
        Ok(self
            .inner
            .lock()
            .await
            .questions
            .iter()
            .find(|q| q.question_id == id)
            .cloned())
    }

    async fn questions_matching(
        &self,
        category: Option<Category>,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, StoreError> {
        Ok(self
            .inner
            .lock()
            .await
            .questions
            .iter()
            .filter(|q| q.difficulty == difficulty)
            .filter(|q| category.is_none_or(|c| q.category == c))
            .cloned()
            .collect())
    }

    async fn all_questions(&self) -> Result<Vec<Question>, StoreError> {
        Ok(self.inner.lock().await.questions.clone())
    }

    async fn append_message(
        &self,
        message: Message,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner
            .feed_order
            .entry(message.room.clone())
            .or_default()
            .push(message.message_id.clone());
        inner.messages.insert(message.message_id.clone(), message);
        Ok(())
    }

    async fn update_message(
        &self,
        message: Message,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.messages.contains_key(&message.message_id) {
            return Err(StoreError::not_found("message", message.message_id));
        }
        inner.messages.insert(message.message_id.clone(), message);
        Ok(())
    }

    async fn messages_in_room(
        &self,
        label: &str,
    ) -> Result<Vec<Message>, StoreError> {
        let inner = self.inner.lock().await;
        let Some(order) = inner.feed_order.get(label) else {
            return Ok(Vec::new());
        };
        Ok(order
            .iter()
            .filter_map(|id| inner.messages.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buzzline_protocol::MessageTag;

    fn user(id: &str, name: &str) -> User {
        User {
            user_id: UserId(id.into()),
            name: name.into(),
        }
    }

    fn question(
        id: &str,
        category: Category,
        difficulty: Difficulty,
    ) -> Question {
        Question {
            question_id: id.into(),
            content: format!("question {id}"),
            answer: format!("answer {id}"),
            category,
            difficulty,
            points: 10,
            duration: 10.0,
        }
    }

    #[tokio::test]
    async fn test_create_user_then_lookup() {
        let store = MemoryStore::new();
        store.create_user(user("u1", "Alice")).await.unwrap();

        let found = store.user(&UserId("u1".into())).await.unwrap();
        assert_eq!(found.unwrap().name, "Alice");
        assert!(store.user(&UserId("u2".into())).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_user_duplicate_id_conflicts() {
        let store = MemoryStore::new();
        store.create_user(user("u1", "Alice")).await.unwrap();

        let err = store.create_user(user("u1", "Bob")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_user_unknown_id_fails() {
        let store = MemoryStore::new();
        let err = store.update_user(user("ghost", "X")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let clone = store.clone();
        store.create_user(user("u1", "Alice")).await.unwrap();

        assert!(clone.user(&UserId("u1".into())).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_players_in_room_filters_by_room() {
        let store = MemoryStore::new();
        let alice = user("u1", "Alice");
        let bob = user("u2", "Bob");
        store
            .save_player(Player::new(PlayerId("p1".into()), &alice, "lobby", 0.0))
            .await
            .unwrap();
        store
            .save_player(Player::new(PlayerId("p2".into()), &bob, "other", 0.0))
            .await
            .unwrap();

        let players = store.players_in_room("lobby").await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Alice");
    }

    #[tokio::test]
    async fn test_questions_matching_category_and_difficulty() {
        let store = MemoryStore::new();
        store
            .add_question(question("q1", Category::Science, Difficulty::Easy))
            .await
            .unwrap();
        store
            .add_question(question("q2", Category::History, Difficulty::Easy))
            .await
            .unwrap();
        store
            .add_question(question("q3", Category::Science, Difficulty::Hard))
            .await
            .unwrap();

        let science = store
            .questions_matching(Some(Category::Science), Difficulty::Easy)
            .await
            .unwrap();
        assert_eq!(science.len(), 1);
        assert_eq!(science[0].question_id, "q1");

        // None category is the wildcard.
        let any = store
            .questions_matching(None, Difficulty::Easy)
            .await
            .unwrap();
        assert_eq!(any.len(), 2);
    }

    #[tokio::test]
    async fn test_messages_in_room_preserves_append_order() {
        let store = MemoryStore::new();
        for i in 0..3 {
            store
                .append_message(Message::new(
                    format!("m{i}"),
                    "lobby",
                    MessageTag::Chat,
                    None,
                    Some(format!("msg {i}")),
                    100.0 + i as f64,
                ))
                .await
                .unwrap();
        }

        let feed = store.messages_in_room("lobby").await.unwrap();
        let ids: Vec<_> =
            feed.iter().map(|m| m.message_id.as_str()).collect();
        assert_eq!(ids, ["m0", "m1", "m2"]);
    }

    #[tokio::test]
    async fn test_update_message_records_reports() {
        let store = MemoryStore::new();
        let mut msg = Message::new(
            "m1".into(),
            "lobby",
            MessageTag::Chat,
            Some(PlayerId("p1".into())),
            Some("spam".into()),
            100.0,
        );
        store.append_message(msg.clone()).await.unwrap();

        msg.reported_by.insert(PlayerId("p2".into()));
        store.update_message(msg).await.unwrap();

        let feed = store.messages_in_room("lobby").await.unwrap();
        assert_eq!(feed[0].reported_by.len(), 1);
    }

    #[tokio::test]
    async fn test_save_room_round_trip() {
        let store = MemoryStore::new();
        assert!(store.room("lobby").await.unwrap().is_none());

        let mut record = RoomRecord::new("lobby");
        record.category = Category::History;
        store.save_room(record.clone()).await.unwrap();

        assert_eq!(store.room("lobby").await.unwrap(), Some(record));
    }
}

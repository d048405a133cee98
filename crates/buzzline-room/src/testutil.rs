//! Shared fixtures for unit tests.

use buzzline_protocol::{Category, Difficulty, UserId};
use buzzline_store::{Question, User};

pub fn user(id: &str, name: &str) -> User {
    User {
        user_id: UserId(id.into()),
        name: name.into(),
    }
}

pub fn question(id: &str, answer: &str, duration: f64, points: i64) -> Question {
    Question {
        question_id: id.into(),
        content: format!("This question's answer is {answer}."),
        answer: answer.into(),
        category: Category::Science,
        difficulty: Difficulty::Easy,
        points,
        duration,
    }
}

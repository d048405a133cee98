//! Quickfire: a demo Buzzline server.
//!
//! Seeds an in-memory question bank, provisions a few rooms, and serves
//! WebSocket clients. Connect to `ws://127.0.0.1:8080/game/lobby` and
//! send `{"request_type": "new_user"}` to play.

use buzzline::prelude::*;

fn question_bank() -> Vec<Question> {
    let spec: &[(&str, &str, Category, Difficulty, i64, f64)] = &[
        (
            "This planet, the second from the sun, is the hottest in the \
             solar system thanks to a runaway greenhouse effect.",
            "Venus",
            Category::Science,
            Difficulty::Easy,
            10,
            12.0,
        ),
        (
            "This element with atomic number 79 has the symbol Au.",
            "gold",
            Category::Science,
            Difficulty::Easy,
            10,
            10.0,
        ),
        (
            "This physicist's 1905 papers covered the photoelectric \
             effect, Brownian motion, and special relativity.",
            "(Albert) Einstein",
            Category::Science,
            Difficulty::Medium,
            15,
            14.0,
        ),
        (
            "This 1215 charter forced King John of England to accept \
             limits on royal power.",
            "Magna Carta",
            Category::History,
            Difficulty::Easy,
            10,
            12.0,
        ),
        (
            "This Carthaginian general crossed the Alps with war \
             elephants during the Second Punic War.",
            "Hannibal",
            Category::History,
            Difficulty::Medium,
            15,
            13.0,
        ),
        (
            "This Russian author wrote Crime and Punishment and The \
             Brothers Karamazov.",
            "(Fyodor) Dostoevsky",
            Category::Literature,
            Difficulty::Medium,
            15,
            13.0,
        ),
        (
            "This epic poem attributed to Homer follows Odysseus on his \
             ten-year journey home from Troy.",
            "The Odyssey",
            Category::Literature,
            Difficulty::Easy,
            10,
            11.0,
        ),
        (
            "This modernist novel by James Joyce follows Leopold Bloom \
             through a single day in Dublin.",
            "Ulysses",
            Category::Literature,
            Difficulty::Hard,
            20,
            15.0,
        ),
    ];

    spec.iter()
        .enumerate()
        .map(|(i, (content, answer, category, difficulty, points, duration))| {
            Question {
                question_id: format!("seed-{i}"),
                content: (*content).to_string(),
                answer: (*answer).to_string(),
                category: *category,
                difficulty: *difficulty,
                points: *points,
                duration: *duration,
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), BuzzlineError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,buzzline=debug".into()),
        )
        .init();

    let addr = std::env::var("BUZZLINE_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let store = MemoryStore::new();
    for question in question_bank() {
        store.add_question(question).await?;
    }

    let server = BuzzlineServerBuilder::new()
        .bind(&addr)
        .room("lobby")
        .room("science")
        .room("history")
        .build(store)
        .await?;

    tracing::info!(%addr, "quickfire ready");
    server.run().await
}

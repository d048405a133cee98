//! Identifier and display-name generation.

use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "Swift", "Clever", "Bold", "Quiet", "Lucky", "Brave", "Keen", "Witty",
    "Rapid", "Calm", "Sly", "Eager", "Noble", "Merry", "Sharp", "Daring",
];

const ANIMALS: &[&str] = &[
    "Otter", "Falcon", "Badger", "Lynx", "Heron", "Marmot", "Puffin",
    "Gecko", "Raven", "Stoat", "Ibex", "Osprey", "Vole", "Tapir", "Civet",
    "Dingo",
];

/// Generates an opaque 32-character hex identifier.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    let mut id = String::with_capacity(32);
    for b in bytes {
        id.push_str(&format!("{b:02x}"));
    }
    id
}

/// Generates a friendly default display name, e.g. `SwiftOtter42`.
pub fn generate_name() -> String {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let animal = ANIMALS[rng.random_range(0..ANIMALS.len())];
    let number: u32 = rng.random_range(1..100);
    format!("{adjective}{animal}{number}")
}

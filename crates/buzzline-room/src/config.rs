//! Room tuning knobs.

/// Configuration shared by every room on a server.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Seconds the buzz-holder has to answer before anyone else can
    /// force a forfeit. Also the threshold for the wrong-answer penalty:
    /// a miss is penalized only when the buzz landed with at least this
    /// much reading time left; buzzing near the end is free.
    pub grace_seconds: f64,
    /// Points deducted for a penalized wrong answer.
    pub neg_penalty: i64,
    /// A message's author is banned once more than this fraction of the
    /// room's players have reported the message.
    pub ban_ratio: f64,
    /// How many recent feed messages each snapshot carries.
    pub feed_window: usize,
    /// Maximum display-name length, in characters.
    pub name_max_chars: usize,
    /// Mailbox depth of each room actor.
    pub mailbox_size: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            grace_seconds: 3.0,
            neg_penalty: 10,
            ban_ratio: 0.6,
            feed_window: 50,
            name_max_chars: 32,
            mailbox_size: 64,
        }
    }
}

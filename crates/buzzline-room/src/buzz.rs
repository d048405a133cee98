//! Buzz arbitration.
//!
//! At most one player holds the buzz per room. Claiming it is
//! first-writer-wins: the first `buzz_init` the actor processes while
//! the room is playing flips it to contest; every later attempt hits
//! the state guard and is a no-op — there is no queue of waiting
//! buzzers.
//!
//! A held buzz resolves one of two ways:
//!
//! 1. The holder answers (`buzz_answer` from the holder): judged
//!    against the current question, scored, and the countdown resumes
//!    shifted by however long the contest froze it.
//! 2. Anyone else calls `buzz_answer` once the grace window has passed:
//!    the buzz is forfeited with no score change.

use buzzline_protocol::{GameState, MessageTag, PlayerId, ServerEvent};
use buzzline_text::{clean_content, judge_answer};

use crate::core::{Audience, Effects, RoomCore};

impl RoomCore {
    /// Claims the buzz for `player_id`.
    ///
    /// No-op unless the room is playing with a live question and the
    /// player isn't locked out. On success the claimer is locked out for
    /// the rest of the question, the room enters contest, and the
    /// claimer alone receives `buzz_grant`.
    pub fn buzz_init(&mut self, player_id: PlayerId, now: f64) -> Effects {
        if self.state() != GameState::Playing
            || self.current_question().is_none()
        {
            return Vec::new();
        }
        let Some(player) = self.player_mut(&player_id) else {
            return Vec::new();
        };
        if player.locked_out {
            return Vec::new();
        }
        player.locked_out = true;

        self.mark_player(player_id.clone());
        self.begin_contest(player_id.clone(), now);
        self.mark_room();
        self.push_message(MessageTag::BuzzInit, Some(player_id), None, now);
        tracing::debug!(room = %self.label(), "buzz claimed");

        vec![
            (Audience::Caller, ServerEvent::BuzzGrant),
            self.update_everyone(now),
        ]
    }

    /// Resolves an in-flight buzz.
    ///
    /// From the holder this judges the submission; from anyone else it
    /// forfeits the buzz, but only once the grace window has elapsed —
    /// before that, non-holder calls are no-ops. With no buzz in flight
    /// the whole call is a no-op.
    pub fn buzz_answer(
        &mut self,
        player_id: PlayerId,
        raw: &str,
        now: f64,
    ) -> Effects {
        let Some((holder, started_at)) = self.buzz_holder() else {
            return Vec::new();
        };

        if holder == player_id {
            self.resolve_buzz(holder, started_at, raw, now)
        } else if now >= started_at + self.config().grace_seconds {
            self.forfeit_buzz(holder, started_at, now)
        } else {
            Vec::new()
        }
    }

    fn resolve_buzz(
        &mut self,
        holder: PlayerId,
        started_at: f64,
        raw: &str,
        now: f64,
    ) -> Effects {
        let Some(question) = self.current_question().cloned() else {
            // Contest without a question shouldn't happen; recover by
            // dropping the buzz.
            self.end_contest();
            return Vec::new();
        };

        let submitted = clean_content(raw);
        let correct = judge_answer(&submitted, &question.answer);
        let buzz_duration = now - started_at;
        let mut effects = Effects::new();

        if correct {
            if let Some(player) = self.player_mut(&holder) {
                player.score += question.points;
                player.correct += 1;
            }
            self.mark_player(holder.clone());
            self.push_message(
                MessageTag::BuzzCorrect,
                Some(holder),
                Some(submitted),
                now,
            );
            // Collapse the countdown so the next poll drops the room to
            // idle; the shift below keeps end == start.
            self.collapse_countdown();
        } else {
            // An early buzz that misses costs points: penalized iff at
            // least the grace window of reading time remained when the
            // buzz landed. Buzzing near or after the end is free.
            let penalized = self.end_time() - started_at
                >= self.config().grace_seconds;
            if penalized {
                let penalty = self.config().neg_penalty;
                if let Some(player) = self.player_mut(&holder) {
                    player.score -= penalty;
                    player.negs += 1;
                }
            }
            self.mark_player(holder.clone());
            self.push_message(
                MessageTag::BuzzWrong,
                Some(holder),
                Some(submitted),
                now,
            );
            effects.push((
                Audience::Caller,
                ServerEvent::LockOut { locked_out: true },
            ));
        }

        // Time frozen during the contest is restored to the countdown.
        self.shift_countdown(buzz_duration);
        self.end_contest();
        self.mark_room();
        effects.push(self.update_everyone(now));
        effects
    }

    fn forfeit_buzz(
        &mut self,
        holder: PlayerId,
        started_at: f64,
        now: f64,
    ) -> Effects {
        let buzz_duration = now - started_at;
        tracing::debug!(room = %self.label(), "buzz forfeited");
        self.push_message(MessageTag::BuzzForfeit, Some(holder), None, now);
        self.shift_countdown(buzz_duration);
        self.end_contest();
        self.mark_room();
        vec![self.update_everyone(now)]
    }
}

// =========================================================================
// Tests
// =========================================================================

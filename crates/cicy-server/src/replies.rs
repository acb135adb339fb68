//! Canned acknowledgement replies.

use rand::Rng;

/// Single-line replies.
pub const REPLIES: &[&str] = &[
    "OK",
    "Got it",
    "Understood",
    "Noted",
    "Sure",
    "No problem",
    "OK, OK",
    "Received",
    "Understood, thanks",
    "I see",
    "OK, I understand",
    "Got your message",
    "Noted, noted",
    "Understood, will handle it",
    "OK, starting now",
    "Received, I'll handle it carefully",
    "Understood, I'll finish this task carefully",
    "OK, I have your instructions",
    "Noted, starting on this task right away",
    "Received, I'll do as asked, rest assured",
    "Understood, I'll complete this task and report back when it's done",
];

/// Two-line replies, joined with a line break when chosen.
pub const MULTI_LINE_REPLIES: &[[&str; 2]] = &[
    ["hi", "how are you"],
    ["OK", "received"],
    ["Understood", "on it"],
    ["Noted", "I'll do it well"],
    ["Received", "processing now"],
];

/// Chance of answering with a two-line reply.
pub const MULTI_LINE_PROBABILITY: f64 = 0.3;

/// Choose a reply using `rng`.
pub fn pick_reply<R: Rng + ?Sized>(rng: &mut R) -> String {
    if rng.random_bool(MULTI_LINE_PROBABILITY) {
        MULTI_LINE_REPLIES[rng.random_range(0..MULTI_LINE_REPLIES.len())].join("\n")
    } else {
        REPLIES[rng.random_range(0..REPLIES.len())].to_string()
    }
}

/// Choose a reply with the thread-local generator.
#[must_use]
pub fn random_reply() -> String {
    pick_reply(&mut rand::rng())
}

/// Whether `reply` belongs to the canned set.
#[must_use]
pub fn is_canned_reply(reply: &str) -> bool {
    REPLIES.contains(&reply) || MULTI_LINE_REPLIES.iter().any(|pair| pair.join("\n") == reply)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_replies_come_from_closed_set() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            assert!(is_canned_reply(&pick_reply(&mut rng)));
        }
    }

    #[test]
    fn test_both_tables_are_used() {
        let mut rng = StdRng::seed_from_u64(42);
        let picks: Vec<String> = (0..500).map(|_| pick_reply(&mut rng)).collect();
        let multi = picks.iter().filter(|r| r.contains('\n')).count();
        // 0.3 of 500 is 150; allow generous slack.
        assert!((75..=225).contains(&multi), "multi-line picks: {multi}");
        assert!(picks.iter().any(|r| !r.contains('\n')));
    }

    #[test]
    fn test_multi_line_replies_have_two_lines() {
        for pair in MULTI_LINE_REPLIES {
            assert_eq!(pair.join("\n").lines().count(), 2);
        }
        assert!(!is_canned_reply("something else"));
    }
}

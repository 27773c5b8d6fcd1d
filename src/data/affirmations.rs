//! Static affirmation line pools.
//!
//! These are the offline text source the coach falls back to. Lines are
//! short enough for a toast and deliberately avoid naming any habit.

use crate::shared::*;

pub fn populate_affirmations(registry: &mut AffirmationRegistry) {
    registry.pools.insert(
        AffirmationContext::DayStart,
        to_lines(&[
            "New day, same promise. Start small and start now.",
            "The checklist is short. The identity it builds is not.",
            "Show up first. Momentum does the rest.",
            "Today only asks for today.",
            "Begin before you feel ready.",
            "One clean day. That is the whole assignment.",
        ]),
    );
    registry.pools.insert(
        AffirmationContext::BadgeUnlocked,
        to_lines(&[
            "Earned, not given.",
            "Proof you keep promises to yourself.",
            "That badge is yesterday's discipline made visible.",
            "Collect the evidence. You are becoming the person who does this.",
        ]),
    );
    registry.pools.insert(
        AffirmationContext::StreakMilestone,
        to_lines(&[
            "A streak is just trust with a number on it.",
            "Don't count the days left. Count the chain behind you.",
            "Consistency looks boring up close and unstoppable from a distance.",
            "Protect the streak the way it protects you.",
        ]),
    );
    registry.pools.insert(
        AffirmationContext::Comeback,
        to_lines(&[
            "A missed day is data, not a verdict.",
            "Back on the board. That is what resilience looks like.",
            "You repaired it. Now outgrow the need to.",
            "The restart is part of the work.",
        ]),
    );
}

fn to_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

//! Built-in challenge templates.
//!
//! Each template is a complete starting point: length, strictness, and a
//! habit set. Habits are copied into the progress aggregate at reset, so
//! edits after onboarding never touch these definitions.

use crate::shared::*;

pub fn populate_templates(registry: &mut TemplateRegistry) {
    registry.templates = vec![
        ChallengeTemplate {
            id: "foundation".to_string(),
            name: "Foundation".to_string(),
            description: "The classic 50-day reset: five daily anchors for body and mind"
                .to_string(),
            total_days: DEFAULT_TOTAL_DAYS,
            strict_mode: false,
            habits: vec![
                Habit::new("hydrate", "Hydrate", "Drink two liters of water", "droplet"),
                Habit::new("move", "Move", "Thirty minutes of any exercise", "shoe"),
                Habit::new("read", "Read", "Twenty pages of a real book", "book"),
                Habit::new("meditate", "Meditate", "Ten minutes of stillness", "lotus"),
                Habit::new("journal", "Journal", "Write three honest lines", "pen"),
            ],
        },
        ChallengeTemplate {
            id: "iron_discipline".to_string(),
            name: "Iron Discipline".to_string(),
            description: "Strict mode: the full 50 days with no slack and a harder set"
                .to_string(),
            total_days: DEFAULT_TOTAL_DAYS,
            strict_mode: true,
            habits: vec![
                Habit::new("wake_0530", "Wake at 5:30", "Feet on the floor before 5:30", "sunrise"),
                Habit::new("train", "Train", "A full workout, no substitutions", "dumbbell"),
                Habit::new("cold_shower", "Cold Shower", "Two minutes, all the way cold", "snowflake"),
                Habit::new("no_sugar", "No Sugar", "Zero added sugar today", "ban"),
                Habit::new("plan_tomorrow", "Plan Tomorrow", "Tomorrow on paper before bed", "calendar"),
            ],
        },
        ChallengeTemplate {
            id: "deep_work".to_string(),
            name: "Deep Work".to_string(),
            description: "Thirty days of guarded attention".to_string(),
            total_days: 30,
            strict_mode: false,
            habits: vec![
                Habit::new("focus_block", "Focus Block", "Ninety distraction-free minutes", "target"),
                Habit::new("inbox_once", "Inbox Once", "Email and messages in one sitting", "mail"),
                Habit::new("shutdown", "Shutdown Ritual", "Close the day with a written stop", "moon"),
            ],
        },
        ChallengeTemplate {
            id: "early_bird".to_string(),
            name: "Early Bird".to_string(),
            description: "Three weeks to rebuild the morning".to_string(),
            total_days: 21,
            strict_mode: false,
            habits: vec![
                Habit::new("lights_out", "Lights Out", "In bed before 22:30", "bed"),
                Habit::new("no_snooze", "No Snooze", "Up with the first alarm", "alarm"),
                Habit::new("morning_walk", "Morning Walk", "Daylight within an hour of waking", "sun"),
                Habit::new("real_breakfast", "Real Breakfast", "A proper meal before the screen", "bowl"),
            ],
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_ids_are_unique_and_habits_nonempty() {
        let mut registry = TemplateRegistry::default();
        populate_templates(&mut registry);
        assert!(!registry.templates.is_empty());
        for template in &registry.templates {
            assert!(template.total_days >= 1, "{} has no days", template.id);
            assert!(!template.habits.is_empty(), "{} has no habits", template.id);
            let mut ids: Vec<_> = template.habits.iter().map(|h| h.id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(
                ids.len(),
                template.habits.len(),
                "{} has duplicate habit ids",
                template.id
            );
        }
        let mut ids: Vec<_> = registry.templates.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), registry.templates.len());
    }

    #[test]
    fn default_template_is_the_fifty_day_foundation() {
        let mut registry = TemplateRegistry::default();
        populate_templates(&mut registry);
        let foundation = registry.get("foundation").expect("foundation template exists");
        assert_eq!(foundation.total_days, DEFAULT_TOTAL_DAYS);
        assert!(!foundation.strict_mode);
    }
}

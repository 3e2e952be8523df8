//! The Likert statement registry.
//!
//! One ordered list drives rendering, validation, and read-time
//! normalization. Item ids are stored as document attribute names, so they
//! must never be renamed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Valid answers for a Likert item, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LikertScale {
    pub min: u8,
    pub max: u8,
}

impl LikertScale {
    pub fn contains(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const LIKERT_SCALE: LikertScale = LikertScale { min: 1, max: 5 };

/// Answer labels, lowest to highest.
pub const LIKERT_LABELS: [(u8, &str); 5] = [
    (1, "Strongly disagree"),
    (2, "Disagree"),
    (3, "Neutral"),
    (4, "Agree"),
    (5, "Strongly agree"),
];

/// A single agreement statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikertItem {
    pub id: &'static str,
    pub prompt: &'static str,
}

const fn item(id: &'static str, prompt: &'static str) -> LikertItem {
    LikertItem { id, prompt }
}

/// Items shown on each personality step.
pub const ITEMS_PER_STEP: usize = 7;

pub const LIKERT_ITEMS: [LikertItem; 28] = [
    item("adventurous", "I like to be adventurous."),
    item("believeInTrueLove", "I believe in true love."),
    item("confident", "I am confident."),
    item("lookingForSerious", "I am looking for something serious."),
    item("intellectualConversations", "I like to have intellectual conversations."),
    item("talkingAboutFeelings", "I like talking about my feelings and emotions."),
    item("extrovert", "I am an extrovert."),
    item("careAboutEnvironment", "I care about the environment."),
    item("likeToDance", "I like to dance."),
    item("religiousConnection", "I have a strong connection with religion."),
    item("outClubbing", "On a Friday night, I would be most likely out clubbing."),
    item("closeToFamily", "I believe being close to your family is important."),
    item("likeToTravel", "I like to travel."),
    item("swearALot", "I tend to swear a lot."),
    item("organizedAndTidy", "I am always very organised and tidy."),
    item(
        "commitmentImportant",
        "I believe commitment is the most important factor in a relationship.",
    ),
    item(
        "prioritizeAcademics",
        "I tend to prioritize my academic life over my social life.",
    ),
    item("discussBooksMovies", "I like discussing books or/and movies."),
    item("laidBack", "I am laid back."),
    item("likeSarcasticPeople", "I like sarcastic people."),
    item(
        "decisionBasedOnFeelings",
        "I tend to base my decisions on feelings rather than rational thinking.",
    ),
    item(
        "openToChangingViews",
        "In a heated argument, I am okay with being proven wrong and/or change my view based on what my opponent has said.",
    ),
    item("healthyLiving", "Healthy living is important to me."),
    item("actionsOverWords", "I believe actions speak louder than words."),
    item("passionateAboutPolitics", "I am passionate about talking about politics."),
    item(
        "sharedMoralsImportant",
        "It's important for my partner to share the same morals as me.",
    ),
    item("romantic", "I am a romantic."),
    item("stemOverHumanities", "I am more interested in STEM subjects than humanities."),
];

pub fn likert_ids() -> Vec<&'static str> {
    LIKERT_ITEMS.iter().map(|i| i.id).collect()
}

pub fn is_likert_item(id: &str) -> bool {
    LIKERT_ITEMS.iter().any(|i| i.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = LIKERT_ITEMS.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), LIKERT_ITEMS.len());
    }

    #[test]
    fn catalog_splits_evenly_into_four_steps() {
        assert_eq!(LIKERT_ITEMS.len(), 4 * ITEMS_PER_STEP);
    }

    #[test]
    fn scale_bounds_are_inclusive() {
        assert!(!LIKERT_SCALE.contains(0));
        assert!(LIKERT_SCALE.contains(1));
        assert!(LIKERT_SCALE.contains(5));
        assert!(!LIKERT_SCALE.contains(6));
        assert_eq!(LIKERT_LABELS.len(), usize::from(LIKERT_SCALE.max - LIKERT_SCALE.min + 1));
    }
}

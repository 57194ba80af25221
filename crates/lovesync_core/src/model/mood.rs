//! Mood, signal and interaction vocabularies.
//!
//! # Responsibility
//! - Define the closed value sets shared by stickies, profiles and
//!   interaction events.
//! - Keep the wire spelling (`snake_case`) stable for stored documents.
//!
//! # Invariants
//! - Every `Mood` belongs to exactly one `MoodCategory`.

use serde::{Deserialize, Serialize};

/// Emotional state a user can post to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Excited,
    Romantic,
    Chill,
    Grateful,
    Proud,
    Energetic,
    Silly,
    Hopeful,
    Hungry,
    Tired,
    Confused,
    Bored,
    Busy,
    Curious,
    Meh,
    Distracted,
    Waiting,
    Sad,
    Angry,
    Sick,
    Stressed,
    Anxious,
    Lonely,
    Hurt,
    Overwhelmed,
    Grumpy,
}

/// Coarse grouping used by mood pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodCategory {
    Positive,
    Neutral,
    Negative,
}

impl MoodCategory {
    pub const ALL: [MoodCategory; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    /// Picker label shown above the category.
    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "Happy",
            Self::Neutral => "Ok-ish",
            Self::Negative => "Not Good",
        }
    }

    /// Moods in picker order.
    pub fn moods(self) -> &'static [Mood] {
        match self {
            Self::Positive => &[
                Mood::Happy,
                Mood::Excited,
                Mood::Grateful,
                Mood::Romantic,
                Mood::Chill,
                Mood::Proud,
                Mood::Energetic,
                Mood::Silly,
                Mood::Hopeful,
            ],
            Self::Neutral => &[
                Mood::Hungry,
                Mood::Tired,
                Mood::Confused,
                Mood::Bored,
                Mood::Busy,
                Mood::Curious,
                Mood::Meh,
                Mood::Distracted,
                Mood::Waiting,
            ],
            Self::Negative => &[
                Mood::Sad,
                Mood::Angry,
                Mood::Sick,
                Mood::Stressed,
                Mood::Anxious,
                Mood::Lonely,
                Mood::Hurt,
                Mood::Overwhelmed,
                Mood::Grumpy,
            ],
        }
    }
}

impl Mood {
    /// Stable lowercase identifier, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Excited => "excited",
            Self::Romantic => "romantic",
            Self::Chill => "chill",
            Self::Grateful => "grateful",
            Self::Proud => "proud",
            Self::Energetic => "energetic",
            Self::Silly => "silly",
            Self::Hopeful => "hopeful",
            Self::Hungry => "hungry",
            Self::Tired => "tired",
            Self::Confused => "confused",
            Self::Bored => "bored",
            Self::Busy => "busy",
            Self::Curious => "curious",
            Self::Meh => "meh",
            Self::Distracted => "distracted",
            Self::Waiting => "waiting",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Sick => "sick",
            Self::Stressed => "stressed",
            Self::Anxious => "anxious",
            Self::Lonely => "lonely",
            Self::Hurt => "hurt",
            Self::Overwhelmed => "overwhelmed",
            Self::Grumpy => "grumpy",
        }
    }

    pub fn category(self) -> MoodCategory {
        MoodCategory::ALL
            .into_iter()
            .find(|category| category.moods().contains(&self))
            .unwrap_or(MoodCategory::Neutral)
    }
}

/// Short pre-canned message a user can flash to the partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Space,
    MissYou,
    Attention,
    Love,
    Coffee,
    Home,
}

/// Animated reaction kinds carried by `RoomData::last_interaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Water,
    Sun,
    Love,
    Poke,
}

#[cfg(test)]
mod tests {
    use super::{Mood, MoodCategory};

    #[test]
    fn every_category_lists_nine_distinct_moods() {
        for category in MoodCategory::ALL {
            let moods = category.moods();
            assert_eq!(moods.len(), 9);
            for mood in moods {
                assert_eq!(mood.category(), category);
            }
        }
    }

    #[test]
    fn mood_serializes_as_lowercase_identifier() {
        let json = serde_json::to_string(&Mood::Overwhelmed).unwrap();
        assert_eq!(json, "\"overwhelmed\"");
        assert_eq!(Mood::Overwhelmed.as_str(), "overwhelmed");
    }
}

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::inventory::Inventory;

pub const SAVE_VERSION: u32 = 1;

/// Starting value of every stat cap; each level-up adds [`CAP_STEP`].
pub const BASE_CAP: f32 = 100.0;
pub const CAP_STEP: f32 = 5.0;
pub const MAX_LEVEL: u32 = 999;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Mood,
    Cleanliness,
    Hunger,
    Energy,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Mood, Stat::Cleanliness, Stat::Hunger, Stat::Energy];

    pub fn as_str(self) -> &'static str {
        match self {
            Stat::Mood => "mood",
            Stat::Cleanliness => "cleanliness",
            Stat::Hunger => "hunger",
            Stat::Energy => "energy",
        }
    }
}

/// Anything a goal or condition can compare against a number.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusField {
    Stat(Stat),
    Level,
    Exp,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Feed,
    Clean,
    Play,
    Train,
    Learn,
    Petting,
    Special,
}

impl InteractionType {
    pub const ALL: [InteractionType; 7] = [
        InteractionType::Feed,
        InteractionType::Clean,
        InteractionType::Play,
        InteractionType::Train,
        InteractionType::Learn,
        InteractionType::Petting,
        InteractionType::Special,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InteractionType::Feed => "feed",
            InteractionType::Clean => "clean",
            InteractionType::Play => "play",
            InteractionType::Train => "train",
            InteractionType::Learn => "learn",
            InteractionType::Petting => "petting",
            InteractionType::Special => "special",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Food,
    CleaningSupply,
    Toy,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemKind::Food => "food",
            ItemKind::CleaningSupply => "cleaning_supply",
            ItemKind::Toy => "toy",
        })
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Caps {
    pub mood: f32,
    pub cleanliness: f32,
    pub hunger: f32,
    pub energy: f32,
}

impl Default for Caps {
    fn default() -> Self {
        Self {
            mood: BASE_CAP,
            cleanliness: BASE_CAP,
            hunger: BASE_CAP,
            energy: BASE_CAP,
        }
    }
}

impl Caps {
    pub fn get(&self, stat: Stat) -> f32 {
        match stat {
            Stat::Mood => self.mood,
            Stat::Cleanliness => self.cleanliness,
            Stat::Hunger => self.hunger,
            Stat::Energy => self.energy,
        }
    }

    /// Cap a pet of `level` would have if it never gained any bonus.
    pub fn for_level(level: u32) -> f32 {
        BASE_CAP + CAP_STEP * level.saturating_sub(1) as f32
    }

    fn repair(&mut self, level: u32) {
        for cap in [
            &mut self.mood,
            &mut self.cleanliness,
            &mut self.hunger,
            &mut self.energy,
        ] {
            if !cap.is_finite() || *cap < BASE_CAP {
                *cap = Self::for_level(level);
            }
        }
    }

    pub fn raise_all(&mut self, by: f32) {
        self.mood += by;
        self.cleanliness += by;
        self.hunger += by;
        self.energy += by;
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BubbleKind {
    #[default]
    Thought,
    Speech,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Bubble {
    pub active: bool,
    pub text: String,
    pub kind: BubbleKind,
    /// Virtual-clock deadline; meaningless once the process ends.
    #[serde(skip)]
    pub expires_at_ms: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PetStatus {
    pub mood: f32,
    pub cleanliness: f32,
    pub hunger: f32,
    pub energy: f32,
    pub exp: u32,
    pub level: u32,
    #[serde(default)]
    pub caps: Caps,
    #[serde(default)]
    pub interaction_counts: BTreeMap<InteractionType, u32>,
    #[serde(default)]
    pub unlocked_achievements: BTreeSet<String>,
    #[serde(default)]
    pub active_tasks: BTreeSet<String>,
    #[serde(default)]
    pub completed_tasks: BTreeSet<String>,
    #[serde(default)]
    pub unlocked_idle_animations: BTreeSet<String>,
    /// Cosmetic unlock tokens granted by rewards.
    #[serde(default)]
    pub unlocks: BTreeSet<String>,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub goal_streaks: BTreeMap<String, u64>,
    #[serde(skip)]
    pub bubble: Bubble,
}

impl Default for PetStatus {
    fn default() -> Self {
        Self {
            mood: 80.0,
            cleanliness: 80.0,
            hunger: 20.0,
            energy: 80.0,
            exp: 0,
            level: 1,
            caps: Caps::default(),
            interaction_counts: BTreeMap::new(),
            unlocked_achievements: BTreeSet::new(),
            active_tasks: BTreeSet::new(),
            completed_tasks: BTreeSet::new(),
            unlocked_idle_animations: BTreeSet::new(),
            unlocks: BTreeSet::new(),
            inventory: Inventory::default(),
            goal_streaks: BTreeMap::new(),
            bubble: Bubble::default(),
        }
    }
}

impl PetStatus {
    pub fn get(&self, stat: Stat) -> f32 {
        match stat {
            Stat::Mood => self.mood,
            Stat::Cleanliness => self.cleanliness,
            Stat::Hunger => self.hunger,
            Stat::Energy => self.energy,
        }
    }

    /// Writes `value` clamped into `[0, cap]`. NaN collapses to 0.
    pub fn set(&mut self, stat: Stat, value: f32) {
        let cap = self.caps.get(stat);
        let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, cap) };
        match stat {
            Stat::Mood => self.mood = v,
            Stat::Cleanliness => self.cleanliness = v,
            Stat::Hunger => self.hunger = v,
            Stat::Energy => self.energy = v,
        }
    }

    pub fn adjust(&mut self, stat: Stat, delta: f32) {
        self.set(stat, self.get(stat) + delta);
    }

    /// Re-applies every clamp; used after loading foreign snapshots.
    pub fn clamp_all(&mut self) {
        self.level = self.level.clamp(1, MAX_LEVEL);
        self.caps.repair(self.level);
        for stat in Stat::ALL {
            self.set(stat, self.get(stat));
        }
    }

    /// How well off the pet is on one stat, in the stat's own units.
    /// Hunger is a need, so its wellness is the headroom below the cap.
    pub fn wellness(&self, stat: Stat) -> f32 {
        match stat {
            Stat::Hunger => self.caps.hunger - self.hunger,
            other => self.get(other),
        }
    }

    pub fn field(&self, field: StatusField) -> f32 {
        match field {
            StatusField::Stat(stat) => self.get(stat),
            StatusField::Level => self.level as f32,
            StatusField::Exp => self.exp as f32,
        }
    }

    pub fn exp_to_next(&self) -> u32 {
        self.level.saturating_mul(50).saturating_add(100)
    }

    pub fn interaction_count(&self, interaction: InteractionType) -> u32 {
        self.interaction_counts.get(&interaction).copied().unwrap_or(0)
    }

    pub fn total_interactions(&self) -> u32 {
        self.interaction_counts.values().sum()
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// What the persistence collaborator stores and hands back.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedPet {
    #[serde(default = "default_save_version")]
    pub version: u32,
    pub status: PetStatus,
    #[serde(default = "default_pet_type")]
    pub pet_type_id: String,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub saved_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_save_version() -> u32 {
    SAVE_VERSION
}

fn default_pet_type() -> String {
    "default".to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayPhase {
    Day,
    Night,
}

impl DayPhase {
    pub fn from_hour(hour: u32) -> Self {
        if (6..18).contains(&hour) {
            DayPhase::Day
        } else {
            DayPhase::Night
        }
    }
}

/// Per-minute decay of each stat. Hunger grows; the rest shrink.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DecayRates {
    pub mood: f32,
    pub cleanliness: f32,
    pub hunger: f32,
    pub energy: f32,
}

impl Default for DecayRates {
    fn default() -> Self {
        Self {
            mood: 0.8,
            cleanliness: 0.3,
            hunger: 1.0,
            energy: 0.5,
        }
    }
}

impl DecayRates {
    pub fn get_mut(&mut self, stat: Stat) -> &mut f32 {
        match stat {
            Stat::Mood => &mut self.mood,
            Stat::Cleanliness => &mut self.cleanliness,
            Stat::Hunger => &mut self.hunger,
            Stat::Energy => &mut self.energy,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    MoodBoost,
    SelfLearning,
    Exercise,
    Treasure,
    Social,
    Inspiration,
    Sickness,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EventRule {
    pub kind: EventKind,
    pub chance: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rules {
    pub tick_period_secs: f32,
    pub decay: DecayRates,
    pub exp_per_tick: u32,
    /// Base chance of the decay modifier; grows as the worst stat drops.
    pub modifier_base_chance: f32,
    /// Extra modifier chance when the worst stat sits at zero wellness.
    pub modifier_low_bonus: f32,
    pub modifier_focus_worst: f32,
    /// Ordered; the first event whose predicate and roll pass wins.
    pub events: Vec<EventRule>,
    pub exercise_min_energy: f32,
    pub sickness_max_cleanliness: f32,
    pub treasure_item_chance: f32,
    pub bubble_chance: f32,
    pub warning_chance: f32,
    pub hunger_need: f32,
    pub energy_need: f32,
    pub mood_need: f32,
    pub low_threshold: f32,
    pub happy_threshold: f32,
    pub tired_threshold: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            tick_period_secs: 60.0,
            decay: DecayRates::default(),
            exp_per_tick: 1,
            modifier_base_chance: 0.05,
            modifier_low_bonus: 0.1,
            modifier_focus_worst: 0.7,
            events: vec![
                EventRule { kind: EventKind::MoodBoost, chance: 0.01 },
                EventRule { kind: EventKind::SelfLearning, chance: 0.02 },
                EventRule { kind: EventKind::Exercise, chance: 0.015 },
                EventRule { kind: EventKind::Treasure, chance: 0.01 },
                EventRule { kind: EventKind::Social, chance: 0.015 },
                EventRule { kind: EventKind::Inspiration, chance: 0.02 },
                EventRule { kind: EventKind::Sickness, chance: 0.05 },
            ],
            exercise_min_energy: 30.0,
            sickness_max_cleanliness: 15.0,
            treasure_item_chance: 0.2,
            bubble_chance: 0.15,
            warning_chance: 0.3,
            hunger_need: 60.0,
            energy_need: 40.0,
            mood_need: 50.0,
            low_threshold: 20.0,
            happy_threshold: 70.0,
            tired_threshold: 30.0,
        }
    }
}

impl Rules {
    /// No decay modifier and no special events: every tick is deterministic.
    pub fn quiet() -> Self {
        Self {
            modifier_base_chance: 0.0,
            modifier_low_bonus: 0.0,
            events: Vec::new(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_all_repairs_broken_caps_and_level() {
        let mut st = PetStatus {
            level: 4_000_000_000,
            mood: 50.0,
            ..PetStatus::default()
        };
        st.caps.mood = -1.0;
        st.caps.energy = f32::NAN;
        st.caps.hunger = 140.0;
        st.clamp_all();
        assert_eq!(st.level, MAX_LEVEL);
        assert_eq!(st.caps.mood, Caps::for_level(MAX_LEVEL));
        assert_eq!(st.caps.energy, Caps::for_level(MAX_LEVEL));
        assert_eq!(st.caps.hunger, 140.0);
        assert_eq!(st.mood, 50.0);
        assert_eq!(PetStatus { level: u32::MAX, ..st }.exp_to_next(), u32::MAX);
    }

    #[test]
    fn set_clamps_to_current_cap() {
        let mut st = PetStatus::default();
        st.set(Stat::Mood, 250.0);
        assert_eq!(st.mood, 100.0);
        st.caps.raise_all(CAP_STEP);
        st.set(Stat::Mood, 250.0);
        assert_eq!(st.mood, 105.0);
        st.set(Stat::Energy, -3.0);
        assert_eq!(st.energy, 0.0);
        st.set(Stat::Hunger, f32::NAN);
        assert_eq!(st.hunger, 0.0);
    }

    #[test]
    fn hunger_wellness_is_headroom() {
        let st = PetStatus {
            hunger: 90.0,
            ..PetStatus::default()
        };
        assert_eq!(st.wellness(Stat::Hunger), 10.0);
        assert_eq!(st.wellness(Stat::Mood), 80.0);
    }

    #[test]
    fn day_phase_boundaries() {
        assert_eq!(DayPhase::from_hour(5), DayPhase::Night);
        assert_eq!(DayPhase::from_hour(6), DayPhase::Day);
        assert_eq!(DayPhase::from_hour(17), DayPhase::Day);
        assert_eq!(DayPhase::from_hour(18), DayPhase::Night);
    }

    #[test]
    fn status_survives_json_without_optional_fields() {
        let json = r#"{"mood":50,"cleanliness":40,"hunger":30,"energy":20,"exp":7,"level":2}"#;
        let st: PetStatus = serde_json::from_str(json).unwrap();
        assert_eq!(st.level, 2);
        assert_eq!(st.caps, Caps::default());
        assert!(st.inventory.is_empty());
    }
}

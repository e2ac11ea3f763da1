//! Declarative game data: items, tasks, achievements, interaction effects,
//! pet types and animation timings.
//!
//! [`Catalog::standard`] is the built-in data set. A JSON file with the same
//! shape can replace it wholesale via [`Catalog::from_json`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::model::{InteractionType, ItemKind, Stat, StatusField};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// `interaction: None` counts every interaction type together.
    InteractionCount {
        interaction: Option<InteractionType>,
        count: u32,
    },
    /// With `against_cap`, the stat must reach its current dynamic cap
    /// and `threshold` is ignored.
    StatusThreshold {
        field: StatusField,
        threshold: f32,
        #[serde(default)]
        against_cap: bool,
    },
    LevelReached {
        level: u32,
    },
    TaskCompleted {
        task_id: String,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AchievementReward {
    #[serde(default)]
    pub exp: u32,
    #[serde(default)]
    pub unlocks: Vec<String>,
    #[serde(default)]
    pub idle_animation: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub reward: AchievementReward,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Goal {
    PerformInteraction {
        interaction: Option<InteractionType>,
        count: u32,
    },
    ReachStatus {
        field: StatusField,
        target: f32,
    },
    MaintainStatus {
        field: StatusField,
        target: f32,
        duration_secs: u64,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Prerequisites {
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub completed_tasks: Vec<String>,
    #[serde(default)]
    pub unlocked_achievements: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TaskReward {
    #[serde(default)]
    pub exp: u32,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub unlocks: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub prerequisites: Prerequisites,
    #[serde(default)]
    pub reward: TaskReward,
    #[serde(default)]
    pub repeatable: bool,
}

/// What one successful interaction does to the pet.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InteractionEffect {
    #[serde(default)]
    pub mood: f32,
    #[serde(default)]
    pub cleanliness: f32,
    #[serde(default)]
    pub hunger: f32,
    #[serde(default)]
    pub energy: f32,
    #[serde(default)]
    pub exp: u32,
    /// Stat that receives the caller-supplied magnitude, and its sign.
    #[serde(default)]
    pub magnitude: Option<(Stat, f32)>,
    /// Required before the interaction and deducted by it.
    #[serde(default)]
    pub energy_cost: f32,
    #[serde(default = "one")]
    pub unlock_level: u32,
    pub pulse: String,
}

fn one() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PetType {
    pub id: String,
    pub name: String,
    pub expressions: BTreeSet<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Catalog {
    pub items: BTreeMap<String, Item>,
    pub achievements: BTreeMap<String, Achievement>,
    pub tasks: BTreeMap<String, Task>,
    pub interactions: BTreeMap<InteractionType, InteractionEffect>,
    pub pet_types: BTreeMap<String, PetType>,
    /// Playback length of every named animation, in milliseconds.
    pub animation_ms: BTreeMap<String, u64>,
    pub base_idle_animations: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("catalog JSON does not match the catalog schema")
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn effect(&self, interaction: InteractionType) -> Option<&InteractionEffect> {
        self.interactions.get(&interaction)
    }

    pub fn unlock_level(&self, interaction: InteractionType) -> u32 {
        self.effect(interaction).map_or(1, |e| e.unlock_level)
    }

    /// Interactions whose unlock level lies in `(old, new]`.
    pub fn unlocked_between(&self, old: u32, new: u32) -> Vec<InteractionType> {
        self.interactions
            .iter()
            .filter(|(_, e)| e.unlock_level > old && e.unlock_level <= new)
            .map(|(i, _)| *i)
            .collect()
    }

    pub fn duration_ms(&self, animation: &str, fallback: u64) -> u64 {
        self.animation_ms.get(animation).copied().unwrap_or(fallback)
    }

    pub fn pet_type(&self, id: &str) -> Option<&PetType> {
        self.pet_types.get(id)
    }

    pub fn standard() -> Self {
        let mut items = BTreeMap::new();
        for (id, name, kind, description) in [
            ("basic_food", "Basic food", ItemKind::Food, "A simple bowl that eases hunger."),
            ("tasty_snack", "Tasty snack", ItemKind::Food, "A treat that lifts the mood."),
            ("soap", "Soap", ItemKind::CleaningSupply, "Keeps the pet clean."),
            ("bubble_bath", "Bubble bath", ItemKind::CleaningSupply, "Bath time, but fun."),
            ("ball", "Ball", ItemKind::Toy, "A simple ball to play with."),
            ("feather_wand", "Feather wand", ItemKind::Toy, "Makes the pet pounce."),
        ] {
            items.insert(
                id.to_string(),
                Item {
                    id: id.to_string(),
                    name: name.to_string(),
                    kind,
                    description: description.to_string(),
                },
            );
        }

        let mut achievements = BTreeMap::new();
        let mut achievement = |id: &str, name: &str, conditions: Vec<Condition>, reward| {
            achievements.insert(
                id.to_string(),
                Achievement {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: String::new(),
                    conditions,
                    reward,
                    hidden: false,
                },
            );
        };
        let exp = |exp: u32| AchievementReward {
            exp,
            ..AchievementReward::default()
        };
        let count = |interaction, count| Condition::InteractionCount { interaction, count };
        achievement("firstInteraction", "First meeting", vec![count(None, 1)], exp(10));
        achievement(
            "feed10",
            "Little gourmet",
            vec![count(Some(InteractionType::Feed), 10)],
            exp(50),
        );
        achievement(
            "clean5",
            "Neat freak",
            vec![count(Some(InteractionType::Clean), 5)],
            exp(30),
        );
        achievement(
            "play20",
            "Play master",
            vec![count(Some(InteractionType::Play), 20)],
            AchievementReward {
                exp: 100,
                unlocks: Vec::new(),
                idle_animation: Some("idleSpecial".to_string()),
            },
        );
        achievement(
            "maxMood",
            "Over the moon",
            vec![Condition::StatusThreshold {
                field: StatusField::Stat(Stat::Mood),
                threshold: 100.0,
                against_cap: true,
            }],
            exp(80),
        );
        achievement(
            "maxClean",
            "Spotless",
            vec![Condition::StatusThreshold {
                field: StatusField::Stat(Stat::Cleanliness),
                threshold: 100.0,
                against_cap: true,
            }],
            exp(80),
        );
        achievement(
            "level5Reached",
            "A new beginning",
            vec![Condition::LevelReached { level: 5 }],
            exp(150),
        );
        achievement("interactionNovice", "Getting acquainted", vec![count(None, 10)], exp(20));

        let mut tasks = BTreeMap::new();
        let mut task = |id: &str, name: &str, goals: Vec<Goal>, level: Option<u32>, reward, repeatable| {
            tasks.insert(
                id.to_string(),
                Task {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: String::new(),
                    goals,
                    prerequisites: Prerequisites {
                        level,
                        ..Prerequisites::default()
                    },
                    reward,
                    repeatable,
                },
            );
        };
        let perform = |interaction, count| Goal::PerformInteraction {
            interaction: Some(interaction),
            count,
        };
        let reward = |exp: u32, items: &[&str], unlocks: &[&str]| TaskReward {
            exp,
            items: items.iter().map(|s| s.to_string()).collect(),
            unlocks: unlocks.iter().map(|s| s.to_string()).collect(),
        };
        task(
            "task_feed_1",
            "First meal",
            vec![perform(InteractionType::Feed, 1)],
            None,
            reward(10, &[], &[]),
            false,
        );
        task(
            "task_clean_1",
            "Keep it clean",
            vec![perform(InteractionType::Clean, 1)],
            None,
            reward(10, &[], &[]),
            false,
        );
        task(
            "task_play_3",
            "Playtime",
            vec![perform(InteractionType::Play, 3)],
            None,
            reward(25, &[], &[]),
            true,
        );
        task(
            "task_reach_mood_high",
            "Cheerful",
            vec![Goal::ReachStatus {
                field: StatusField::Stat(Stat::Mood),
                target: 80.0,
            }],
            None,
            reward(50, &[], &[]),
            false,
        );
        task(
            "task_reach_level_2",
            "Junior trainer",
            vec![Goal::ReachStatus {
                field: StatusField::Level,
                target: 2.0,
            }],
            Some(1),
            reward(100, &[], &["expression_happy_lvl2"]),
            false,
        );
        task(
            "task_foodie_5",
            "Foodie",
            vec![perform(InteractionType::Feed, 5)],
            None,
            reward(20, &["tasty_snack"], &[]),
            true,
        );
        task(
            "task_playtime_10",
            "Toy collector",
            vec![perform(InteractionType::Play, 10)],
            None,
            reward(30, &["ball", "feather_wand"], &[]),
            true,
        );
        task(
            "task_reach_level_3",
            "Senior trainer",
            vec![Goal::ReachStatus {
                field: StatusField::Level,
                target: 3.0,
            }],
            Some(2),
            reward(150, &["tasty_snack", "tasty_snack"], &[]),
            false,
        );
        task(
            "task_stay_clean",
            "Squeaky routine",
            vec![Goal::MaintainStatus {
                field: StatusField::Stat(Stat::Cleanliness),
                target: 70.0,
                duration_secs: 600,
            }],
            Some(2),
            reward(40, &["bubble_bath"], &[]),
            false,
        );

        let mut interactions = BTreeMap::new();
        let effect = |pulse: &str| InteractionEffect {
            mood: 0.0,
            cleanliness: 0.0,
            hunger: 0.0,
            energy: 0.0,
            exp: 0,
            magnitude: None,
            energy_cost: 0.0,
            unlock_level: 1,
            pulse: pulse.to_string(),
        };
        interactions.insert(
            InteractionType::Feed,
            InteractionEffect {
                mood: 5.0,
                exp: 2,
                magnitude: Some((Stat::Hunger, -1.0)),
                ..effect("eat-animation")
            },
        );
        interactions.insert(
            InteractionType::Clean,
            InteractionEffect {
                mood: 3.0,
                exp: 1,
                magnitude: Some((Stat::Cleanliness, 1.0)),
                ..effect("clean-animation")
            },
        );
        interactions.insert(
            InteractionType::Play,
            InteractionEffect {
                exp: 3,
                magnitude: Some((Stat::Mood, 1.0)),
                energy_cost: 10.0,
                ..effect("play-animation")
            },
        );
        interactions.insert(
            InteractionType::Train,
            InteractionEffect {
                exp: 15,
                energy_cost: 25.0,
                unlock_level: 3,
                ..effect("train-animation")
            },
        );
        interactions.insert(
            InteractionType::Learn,
            InteractionEffect {
                exp: 25,
                energy_cost: 30.0,
                unlock_level: 5,
                ..effect("learn-animation")
            },
        );
        interactions.insert(
            InteractionType::Petting,
            InteractionEffect {
                mood: 15.0,
                energy: 2.0,
                exp: 1,
                ..effect("happy-animation")
            },
        );
        interactions.insert(
            InteractionType::Special,
            InteractionEffect {
                exp: 10,
                magnitude: Some((Stat::Mood, 1.0)),
                energy_cost: 15.0,
                unlock_level: 8,
                ..effect("spin-animation")
            },
        );

        let look = [
            "look_left",
            "look_right",
            "look_up",
            "look_down",
            "look_up_left",
            "look_up_right",
            "look_down_left",
            "look_down_right",
        ];
        let mut pet_types = BTreeMap::new();
        for (id, name, extra) in [
            ("default", "Default", &["sick", "level5", "level10", "level15", "idleSpecial"][..]),
            ("leafy", "Leafy", &["level5", "level10"][..]),
            ("droplet", "Droplet", &["level5", "level10"][..]),
        ] {
            let expressions = ["normal", "happy", "hungry", "sleepy"]
                .iter()
                .chain(look.iter())
                .chain(extra.iter())
                .map(|s| s.to_string())
                .collect();
            pet_types.insert(
                id.to_string(),
                PetType {
                    id: id.to_string(),
                    name: name.to_string(),
                    expressions,
                },
            );
        }

        let animation_ms = [
            ("happy-animation", 600),
            ("pulse-animation", 500),
            ("wiggle-animation", 400),
            ("shake-animation", 400),
            ("fast-shake-animation", 300),
            ("jump-animation", 500),
            ("spin-animation", 600),
            ("play-animation", 600),
            ("train-animation", 700),
            ("clean-animation", 600),
            ("learn-animation", 700),
            ("eat-animation", 500),
            ("picked-up", 300),
            ("landed", 400),
            ("sick-animation", 1000),
            ("level-up-small", 1500),
            ("level-up-medium", 1500),
            ("level-up-large", 1500),
            ("blink-animation", 300),
            ("stretch-animation", 800),
            ("idle-wiggle-animation", 600),
            ("idleSpecial", 1000),
            ("walk-animation", 1000),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            items,
            achievements,
            tasks,
            interactions,
            pet_types,
            animation_ms,
            base_idle_animations: vec![
                "stretch-animation".to_string(),
                "idle-wiggle-animation".to_string(),
            ],
        }
    }
}

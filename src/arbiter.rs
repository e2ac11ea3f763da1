use rand::Rng;
use std::collections::BTreeSet;

use crate::model::PetStatus;

const SLEEPY_BELOW: f32 = 20.0;
const HUNGRY_ABOVE: f32 = 80.0;
const FLAVOR_MOOD: f32 = 70.0;
const FLAVOR_CHANCE: f64 = 0.3;
const FLAVOR_TIERS: [(u32, &str); 3] = [(15, "level15"), (10, "level10"), (5, "level5")];

#[derive(Clone, Debug, PartialEq)]
struct Timed {
    token: String,
    until_ms: u64,
}

impl Timed {
    fn live(&self, now_ms: u64) -> bool {
        now_ms < self.until_ms
    }
}

#[derive(Clone, Debug, PartialEq)]
enum DragState {
    Idle,
    Dragging,
    Landed { until_ms: u64 },
}

/// What the pet shows at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub animation: Option<String>,
    pub blinking: bool,
    pub expression: String,
}

/// Merges every animation source into a single token by priority and
/// picks the expression independently.
#[derive(Clone, Debug)]
pub struct AnimationArbiter {
    drag: DragState,
    landed_ms: u64,
    pulse: Option<Timed>,
    idle: Option<Timed>,
    blink_until: Option<u64>,
    expression_override: Option<Timed>,
    flavor: String,
}

impl AnimationArbiter {
    pub fn new(landed_ms: u64) -> Self {
        Self {
            drag: DragState::Idle,
            landed_ms,
            pulse: None,
            idle: None,
            blink_until: None,
            expression_override: None,
            flavor: "happy".to_string(),
        }
    }

    pub fn drag_started(&mut self) {
        self.drag = DragState::Dragging;
        self.idle = None;
        self.blink_until = None;
    }

    pub fn drag_ended(&mut self, now_ms: u64) {
        if self.drag == DragState::Dragging {
            self.drag = DragState::Landed {
                until_ms: now_ms + self.landed_ms,
            };
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag == DragState::Dragging
    }

    /// Status-change pulse; a newer pulse replaces the running one.
    pub fn pulse(&mut self, token: &str, now_ms: u64, duration_ms: u64) {
        self.pulse = Some(Timed {
            token: token.to_string(),
            until_ms: now_ms + duration_ms,
        });
    }

    pub fn set_idle(&mut self, token: &str, now_ms: u64, duration_ms: u64) {
        self.idle = Some(Timed {
            token: token.to_string(),
            until_ms: now_ms + duration_ms,
        });
    }

    pub fn clear_idle(&mut self) {
        self.idle = None;
    }

    pub fn idle_playing(&self, now_ms: u64) -> bool {
        self.idle.as_ref().is_some_and(|t| t.live(now_ms))
    }

    pub fn blink(&mut self, now_ms: u64, duration_ms: u64) {
        self.blink_until = Some(now_ms + duration_ms);
    }

    pub fn override_expression(&mut self, key: &str, now_ms: u64, duration_ms: u64) {
        self.expression_override = Some(Timed {
            token: key.to_string(),
            until_ms: now_ms + duration_ms,
        });
    }

    /// Re-rolls the high-mood expression. Each unlocked level tier gets a
    /// chance in turn, highest first.
    pub fn reroll_flavor<R: Rng>(&mut self, rng: &mut R, level: u32, available: &BTreeSet<String>) {
        self.flavor = FLAVOR_TIERS
            .iter()
            .filter(|(lvl, key)| level >= *lvl && available.contains(*key))
            .find(|_| rng.gen_bool(FLAVOR_CHANCE))
            .map_or("happy", |(_, key)| *key)
            .to_string();
    }

    pub fn flavor(&self) -> &str {
        &self.flavor
    }

    pub fn animation(&self, now_ms: u64, reaction: Option<&str>) -> Option<String> {
        match &self.drag {
            DragState::Dragging => return Some("picked-up".to_string()),
            DragState::Landed { until_ms } if now_ms < *until_ms => {
                return Some("landed".to_string())
            }
            _ => {}
        }
        if let Some(r) = reaction {
            return Some(r.to_string());
        }
        [&self.pulse, &self.idle]
            .into_iter()
            .flatten()
            .find(|t| t.live(now_ms))
            .map(|t| t.token.clone())
            .or_else(|| self.blinking(now_ms).then(|| "blink-animation".to_string()))
    }

    pub fn blinking(&self, now_ms: u64) -> bool {
        self.blink_until.is_some_and(|t| now_ms < t)
    }

    /// `look` is the eye-tracking variant, already suppressed by the caller
    /// while dragging, reacting or untracked.
    pub fn expression(
        &self,
        now_ms: u64,
        status: &PetStatus,
        look: Option<&str>,
        available: &BTreeSet<String>,
    ) -> String {
        let key = if let Some(o) = self.expression_override.as_ref().filter(|t| t.live(now_ms)) {
            o.token.as_str()
        } else if let Some(l) = look.filter(|l| available.contains(*l)) {
            l
        } else if status.energy < SLEEPY_BELOW {
            "sleepy"
        } else if status.hunger > HUNGRY_ABOVE {
            "hungry"
        } else if status.mood > FLAVOR_MOOD {
            self.flavor.as_str()
        } else {
            "normal"
        };
        if available.contains(key) {
            key.to_string()
        } else {
            "normal".to_string()
        }
    }

    pub fn choose(
        &self,
        now_ms: u64,
        reaction: Option<&str>,
        look: Option<&str>,
        status: &PetStatus,
        available: &BTreeSet<String>,
    ) -> Choice {
        Choice {
            animation: self.animation(now_ms, reaction),
            blinking: self.blinking(now_ms),
            expression: self.expression(now_ms, status, look, available),
        }
    }
}

//! Virtual-clock timers and the autonomous behavior they drive.
//!
//! Nothing here sleeps. The engine calls [`Timers::pop_due`] with its
//! current time and handles whatever fired, so a test can jump an hour
//! ahead in one call.

use rand::Rng;
use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::model::{PetStatus, Position, Rules};

pub const TICK_MS: u64 = 60_000;
pub const BLINK_MS: u64 = 300;
pub const RELOCATE_MS: u64 = 15_000;
pub const GLIDE_MS: u64 = 1_000;
pub const EXPRESSION_REFRESH_MS: u64 = 10_000;
pub const IDLE_DEFAULT_MS: u64 = 500;

const MOVE_MIN: f32 = 30.0;
const MOVE_MAX: f32 = 150.0;
const EDGE_PADDING: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    StatusTick,
    IdlePose,
    Blink,
    Relocate,
    ExpressionRefresh,
    BubbleExpiry,
}

/// One pending deadline per timer kind. Re-arming replaces the old one.
#[derive(Clone, Debug, Default)]
pub struct Timers {
    due: BTreeMap<TimerKind, u64>,
}

impl Timers {
    pub fn arm(&mut self, kind: TimerKind, at_ms: u64) {
        self.due.insert(kind, at_ms);
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.due.remove(&kind);
    }

    pub fn clear(&mut self) {
        self.due.clear();
    }

    pub fn due_at(&self, kind: TimerKind) -> Option<u64> {
        self.due.get(&kind).copied()
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.due.contains_key(&kind)
    }

    /// Removes and returns the earliest timer due at or before `now_ms`.
    /// Ties go to the kind declared first.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TimerKind, u64)> {
        let (kind, at) = self
            .due
            .iter()
            .filter(|(_, at)| **at <= now_ms)
            .min_by_key(|(kind, at)| (**at, **kind))
            .map(|(k, a)| (*k, *a))?;
        self.due.remove(&kind);
        Some((kind, at))
    }
}

// ── Idle poses ─────────────────────────────────────────────

pub fn idle_delay_ms<R: Rng>(status: &PetStatus, rng: &mut R) -> u64 {
    let (lo, hi) = if status.mood > 80.0 && status.energy > 80.0 {
        (6_000, 12_000)
    } else if status.mood < 25.0 || status.energy < 25.0 {
        (12_000, 20_000)
    } else {
        (8_000, 15_000)
    };
    rng.gen_range(lo..=hi)
}

/// Picks a pose from the pool matching the pet's state, restricted to
/// what is available; any available pose when that pool is empty.
pub fn pick_idle_pose<R: Rng>(
    status: &PetStatus,
    catalog: &Catalog,
    rules: &Rules,
    rng: &mut R,
) -> Option<String> {
    let available: Vec<String> = catalog
        .base_idle_animations
        .iter()
        .chain(status.unlocked_idle_animations.iter())
        .cloned()
        .collect();
    if available.is_empty() {
        return None;
    }

    let mut pool: Vec<String> = if status.energy < rules.tired_threshold {
        vec!["stretch-animation".to_string()]
    } else if status.mood > rules.happy_threshold {
        std::iter::once("idle-wiggle-animation".to_string())
            .chain(status.unlocked_idle_animations.iter().cloned())
            .collect()
    } else {
        vec![
            "stretch-animation".to_string(),
            "idle-wiggle-animation".to_string(),
        ]
    };
    pool.retain(|a| available.contains(a));
    let pool = if pool.is_empty() { available } else { pool };
    Some(pool[rng.gen_range(0..pool.len())].clone())
}

pub fn blink_delay_ms<R: Rng>(rng: &mut R) -> u64 {
    rng.gen_range(2_000..=10_000)
}

pub fn can_blink(status: &PetStatus) -> bool {
    status.mood > 25.0 && status.energy > 25.0
}

// ── Relocation ─────────────────────────────────────────────

pub fn relocation_delay_ms<R: Rng>(rng: &mut R) -> u64 {
    (RELOCATE_MS as f64 * rng.gen_range(0.8..=1.2)) as u64
}

/// Random step from `from`, kept inside the viewport minus the pet's
/// footprint and edge padding. `None` when the viewport is too small.
pub fn relocation_target<R: Rng>(
    from: Position,
    viewport: (f32, f32),
    pet: (f32, f32),
    rng: &mut R,
) -> Option<Position> {
    let max_x = viewport.0 - pet.0 - EDGE_PADDING;
    let max_y = viewport.1 - pet.1 - EDGE_PADDING;
    if max_x < EDGE_PADDING || max_y < EDGE_PADDING {
        return None;
    }
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let distance = rng.gen_range(MOVE_MIN..=MOVE_MAX);
    Some(Position {
        x: (from.x + angle.cos() * distance).clamp(EDGE_PADDING, max_x),
        y: (from.y + angle.sin() * distance).clamp(EDGE_PADDING, max_y),
    })
}

/// An in-flight move between two positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glide {
    pub from: Position,
    pub to: Position,
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl Glide {
    pub fn done(&self, now_ms: u64) -> bool {
        now_ms >= self.start_ms + self.duration_ms
    }

    pub fn position_at(&self, now_ms: u64) -> Position {
        let t = if self.duration_ms == 0 {
            1.0
        } else {
            (now_ms.saturating_sub(self.start_ms) as f32 / self.duration_ms as f32).min(1.0)
        };
        let eased = t * t * (3.0 - 2.0 * t);
        Position {
            x: self.from.x + (self.to.x - self.from.x) * eased,
            y: self.from.y + (self.to.y - self.from.y) * eased,
        }
    }
}

// ── Bubbles ────────────────────────────────────────────────

/// The most pressing moderate need, if any.
pub fn need_bubble(status: &PetStatus, rules: &Rules) -> Option<&'static str> {
    if status.hunger >= rules.hunger_need && status.hunger < 100.0 - rules.low_threshold {
        Some("I'm getting hungry...")
    } else if status.energy > rules.low_threshold && status.energy <= rules.energy_need {
        Some("A little sleepy...")
    } else if status.mood > rules.low_threshold && status.mood <= rules.mood_need {
        Some("Play with me?")
    } else {
        None
    }
}

/// Warning for a stat in its extreme band.
pub fn warning_bubble(status: &PetStatus, rules: &Rules) -> Option<&'static str> {
    let low = rules.low_threshold;
    if status.hunger > 100.0 - low {
        Some("I'm starving!")
    } else if status.energy < low {
        Some("So tired...")
    } else if status.cleanliness < low {
        Some("I need a bath!")
    } else if status.mood < low {
        Some("I feel sad...")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pop_due_returns_earliest_first() {
        let mut t = Timers::default();
        t.arm(TimerKind::Blink, 500);
        t.arm(TimerKind::StatusTick, 500);
        t.arm(TimerKind::Relocate, 100);
        assert_eq!(t.pop_due(50), None);
        assert_eq!(t.pop_due(600), Some((TimerKind::Relocate, 100)));
        assert_eq!(t.pop_due(600), Some((TimerKind::StatusTick, 500)));
        assert_eq!(t.pop_due(600), Some((TimerKind::Blink, 500)));
        assert_eq!(t.pop_due(600), None);
    }

    #[test]
    fn rearming_replaces_the_deadline() {
        let mut t = Timers::default();
        t.arm(TimerKind::IdlePose, 100);
        t.arm(TimerKind::IdlePose, 900);
        assert_eq!(t.pop_due(500), None);
        assert_eq!(t.due_at(TimerKind::IdlePose), Some(900));
        t.cancel(TimerKind::IdlePose);
        assert!(!t.is_armed(TimerKind::IdlePose));
    }

    #[test]
    fn idle_delay_follows_mood_band() {
        let mut rng = StdRng::seed_from_u64(1);
        let happy = PetStatus {
            mood: 90.0,
            energy: 90.0,
            ..PetStatus::default()
        };
        let sad = PetStatus {
            mood: 10.0,
            ..PetStatus::default()
        };
        for _ in 0..100 {
            assert!((6_000..=12_000).contains(&idle_delay_ms(&happy, &mut rng)));
            assert!((12_000..=20_000).contains(&idle_delay_ms(&sad, &mut rng)));
        }
    }

    #[test]
    fn tired_pets_stretch() {
        let mut rng = StdRng::seed_from_u64(2);
        let c = Catalog::standard();
        let tired = PetStatus {
            energy: 10.0,
            ..PetStatus::default()
        };
        for _ in 0..20 {
            assert_eq!(
                pick_idle_pose(&tired, &c, &Rules::default(), &mut rng).as_deref(),
                Some("stretch-animation")
            );
        }
    }

    #[test]
    fn happy_pool_includes_unlocked_poses() {
        let mut rng = StdRng::seed_from_u64(3);
        let c = Catalog::standard();
        let mut st = PetStatus::default();
        st.unlocked_idle_animations.insert("idleSpecial".into());
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..100 {
            seen.extend(pick_idle_pose(&st, &c, &Rules::default(), &mut rng));
        }
        assert!(seen.contains("idleSpecial"));
        assert!(!seen.contains("stretch-animation"));
    }

    #[test]
    fn relocation_stays_inside_padded_viewport() {
        let mut rng = StdRng::seed_from_u64(4);
        let from = Position { x: 25.0, y: 25.0 };
        for _ in 0..200 {
            let p = relocation_target(from, (400.0, 300.0), (80.0, 80.0), &mut rng).unwrap();
            assert!((20.0..=300.0).contains(&p.x));
            assert!((20.0..=200.0).contains(&p.y));
        }
        assert_eq!(relocation_target(from, (100.0, 100.0), (80.0, 80.0), &mut rng), None);
    }

    #[test]
    fn glide_eases_to_target() {
        let g = Glide {
            from: Position { x: 0.0, y: 0.0 },
            to: Position { x: 100.0, y: 0.0 },
            start_ms: 1_000,
            duration_ms: 1_000,
        };
        assert_eq!(g.position_at(1_000).x, 0.0);
        assert!((g.position_at(1_500).x - 50.0).abs() < 1e-3);
        assert_eq!(g.position_at(5_000).x, 100.0);
        assert!(g.done(2_000));
    }

    #[test]
    fn need_bubble_priority() {
        let r = Rules::default();
        let mut st = PetStatus {
            hunger: 65.0,
            energy: 30.0,
            ..PetStatus::default()
        };
        assert_eq!(need_bubble(&st, &r), Some("I'm getting hungry..."));
        st.hunger = 10.0;
        assert_eq!(need_bubble(&st, &r), Some("A little sleepy..."));
        st.energy = 90.0;
        assert_eq!(need_bubble(&st, &r), None);
        st.cleanliness = 5.0;
        assert_eq!(warning_bubble(&st, &r), Some("I need a bath!"));
    }
}

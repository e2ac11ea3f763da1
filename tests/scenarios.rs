use deskpet::catalog::Catalog;
use deskpet::gesture::{GestureClassifier, GestureSignal, Recognized};
use deskpet::model::{DayPhase, InteractionType, ItemKind, PetStatus, Position, Rules};
use deskpet::ports::MemoryStore;
use deskpet::progress;
use deskpet::sim::StatusSimulator;
use deskpet::{EngineOptions, HostCommand, Notification, PetEngine, PointerEvent, PointerKind};
use std::time::Duration;

fn hungry_pet() -> PetStatus {
    PetStatus {
        hunger: 85.0,
        ..PetStatus::default()
    }
}

#[test]
fn feeding_uses_up_food() {
    let catalog = Catalog::standard();
    let mut sim = StatusSimulator::new(Rules::quiet(), 1);
    let mut st = hungry_pet();
    st.inventory.add_item(&catalog, "basic_food", 1).unwrap();

    let ok = sim.interact(&mut st, &catalog, InteractionType::Feed, 30.0, Some(ItemKind::Food));

    assert!(ok);
    assert_eq!(st.hunger, 55.0);
    assert_eq!(st.inventory.quantity("basic_food"), 0);
    assert!(st.inventory.is_empty());
    assert_eq!(st.interaction_count(InteractionType::Feed), 1);
}

#[test]
fn feeding_without_food_changes_nothing() {
    let catalog = Catalog::standard();
    let mut sim = StatusSimulator::new(Rules::quiet(), 1);
    let mut st = hungry_pet();
    let before = st.clone();

    let ok = sim.interact(&mut st, &catalog, InteractionType::Feed, 30.0, Some(ItemKind::Food));

    assert!(!ok);
    assert_eq!(st, before);
}

#[test]
fn clockwise_loop_fires_once_and_resets() {
    let mut g = GestureClassifier::default();
    let center = Position { x: 200.0, y: 200.0 };
    g.set_pet_frame(center, 80.0);

    let mut circles = Vec::new();
    for i in 0..10u64 {
        let a = -0.733 * i as f32;
        let ev = PointerEvent::new(
            PointerKind::Move,
            center.x + 60.0 * a.cos(),
            center.y + 60.0 * a.sin(),
            i * 80,
        );
        for r in g.handle(ev) {
            if let Recognized::Gesture(sig @ GestureSignal::Circle { .. }) = r {
                circles.push(sig);
            }
        }
    }

    assert_eq!(circles, vec![GestureSignal::Circle { clockwise: true }]);
    assert_eq!(g.circle_window_len(), 0);
    assert_eq!(g.active_reaction(720), Some("circle-clockwise-animation"));
}

#[test]
fn level_up_on_the_tick_that_reaches_the_threshold() {
    let catalog = Catalog::standard();
    let mut sim = StatusSimulator::new(Rules::quiet(), 7);
    let mut st = PetStatus {
        exp: 140,
        ..PetStatus::default()
    };

    for _ in 0..9 {
        let report = sim.tick(&mut st, &catalog, Duration::ZERO, DayPhase::Day);
        assert!(report.level_ups.is_empty());
    }
    assert_eq!((st.level, st.exp), (1, 149));

    let report = sim.tick(&mut st, &catalog, Duration::ZERO, DayPhase::Day);
    assert_eq!(report.level_ups.len(), 1);
    assert_eq!((st.level, st.exp), (2, 0));
    assert_eq!(st.caps.mood, 105.0);
    assert_eq!(st.caps.cleanliness, 105.0);
    assert_eq!(st.caps.hunger, 105.0);
    assert_eq!(st.caps.energy, 105.0);
}

#[test]
fn tenth_feed_unlocks_achievement_once() {
    let catalog = Catalog::standard();
    let mut sim = StatusSimulator::new(Rules::quiet(), 3);
    let mut st = PetStatus::default();
    st.inventory.add_item(&catalog, "basic_food", 10).unwrap();
    progress::evaluate(&mut st, &catalog, 0);

    for n in 1..=10 {
        assert!(sim.interact(&mut st, &catalog, InteractionType::Feed, 5.0, Some(ItemKind::Food)));
        let notices = progress::evaluate(&mut st, &catalog, n * 1000);
        let unlocked = notices
            .iter()
            .filter(|n| matches!(n, progress::Notice::AchievementUnlocked { id, .. } if id == "feed10"))
            .count();
        assert_eq!(unlocked, usize::from(n == 10));
    }
    assert!(st.unlocked_achievements.contains("feed10"));

    let (level, exp) = (st.level, st.exp);
    for n in 0..5 {
        assert!(progress::evaluate(&mut st, &catalog, 20_000 + n).is_empty());
    }
    assert_eq!((st.level, st.exp), (level, exp));
}

#[test]
fn engine_day_in_the_life() {
    let options = EngineOptions {
        rules: Rules::quiet(),
        fixed_hour: Some(14),
        seed: 99,
        ..EngineOptions::default()
    };
    let mut engine: PetEngine<MemoryStore, Vec<Notification>, Vec<HostCommand>> =
        PetEngine::new(options, MemoryStore::default(), Vec::new(), Vec::new());
    engine.start(0);

    assert!(engine.add_item("basic_food", 2));
    assert!(engine.interact(1_000, InteractionType::Feed, 10.0, Some(ItemKind::Food)));
    assert_eq!(engine.frame(1_100).animation.as_deref(), Some("eat-animation"));
    assert!(!engine.interact(2_000, InteractionType::Train, 0.0, None));

    engine.advance(10 * 60_000);
    let st = engine.status();
    assert!(st.mood <= st.caps.mood && st.mood >= 0.0);
    assert!(st.completed_tasks.contains("task_feed_1"));
    assert_eq!(engine.store().saves, 1 + 10);

    engine.stop();
    let saved = engine.store().saved.clone().unwrap();
    assert_eq!(saved.status.interaction_counts, engine.status().interaction_counts);
    assert_eq!(saved.pet_type_id, "default");
}

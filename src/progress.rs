//! Achievement and task bookkeeping.
//!
//! Everything here is re-run against the latest [`PetStatus`] after each
//! mutation. Rewards can push the pet over a level boundary, which can in
//! turn satisfy more conditions, so [`evaluate`] loops until a pass makes
//! no change.

use tracing::{info, warn};

use crate::catalog::{Catalog, Condition, Goal, Prerequisites, Task};
use crate::error::PetError;
use crate::model::{PetStatus, StatusField};
use crate::sim::{level_up, LevelUp};

#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    AchievementUnlocked { id: String, name: String },
    TaskActivated { id: String, name: String },
    TaskCompleted { id: String, name: String, exp: u32 },
    LevelUp(LevelUp),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::AchievementUnlocked { name, .. } => format!("Achievement unlocked: {name}"),
            Notice::TaskActivated { name, .. } => format!("New task: {name}"),
            Notice::TaskCompleted { name, exp, .. } => format!("Task complete: {name} (+{exp} exp)"),
            Notice::LevelUp(up) if up.unlocked.is_empty() => format!("Level up! Now level {}", up.level),
            Notice::LevelUp(up) => {
                let names: Vec<&str> = up.unlocked.iter().map(|i| i.as_str()).collect();
                format!("Level up! Now level {}. Unlocked: {}", up.level, names.join(", "))
            }
        }
    }
}

fn condition_holds(status: &PetStatus, condition: &Condition) -> bool {
    match condition {
        Condition::InteractionCount { interaction, count } => {
            let have = match interaction {
                Some(i) => status.interaction_count(*i),
                None => status.total_interactions(),
            };
            have >= *count
        }
        Condition::StatusThreshold {
            field,
            threshold,
            against_cap,
        } => match (field, against_cap) {
            (StatusField::Stat(stat), true) => status.get(*stat) >= status.caps.get(*stat),
            _ => status.field(*field) >= *threshold,
        },
        Condition::LevelReached { level } => status.level >= *level,
        Condition::TaskCompleted { task_id } => status.completed_tasks.contains(task_id),
    }
}

fn streak_key(task_id: &str, goal_index: usize) -> String {
    format!("{task_id}#{goal_index}")
}

fn goal_met(status: &PetStatus, task_id: &str, index: usize, goal: &Goal, now_ms: u64) -> bool {
    match goal {
        Goal::PerformInteraction { interaction, count } => {
            let have = match interaction {
                Some(i) => status.interaction_count(*i),
                None => status.total_interactions(),
            };
            have >= *count
        }
        Goal::ReachStatus { field, target } => status.field(*field) >= *target,
        Goal::MaintainStatus { duration_secs, .. } => status
            .goal_streaks
            .get(&streak_key(task_id, index))
            .is_some_and(|since| now_ms.saturating_sub(*since) >= duration_secs * 1000),
    }
}

fn prerequisites_met(status: &PetStatus, pre: &Prerequisites) -> bool {
    pre.level.map_or(true, |l| status.level >= l)
        && pre.completed_tasks.iter().all(|t| status.completed_tasks.contains(t))
        && pre
            .unlocked_achievements
            .iter()
            .all(|a| status.unlocked_achievements.contains(a))
}

/// Starts or breaks the streak of every `maintain_status` goal on an
/// active task.
pub fn update_streaks(status: &mut PetStatus, catalog: &Catalog, now_ms: u64) {
    let tasks: Vec<&Task> = status
        .active_tasks
        .iter()
        .filter_map(|id| catalog.task(id))
        .collect();
    for task in tasks {
        for (index, goal) in task.goals.iter().enumerate() {
            let Goal::MaintainStatus { field, target, .. } = goal else {
                continue;
            };
            let key = streak_key(&task.id, index);
            if status.field(*field) >= *target {
                status.goal_streaks.entry(key).or_insert(now_ms);
            } else {
                status.goal_streaks.remove(&key);
            }
        }
    }
}

/// Activates a task on request. Returns whether it became active.
pub fn accept_task(status: &mut PetStatus, catalog: &Catalog, id: &str) -> Result<bool, PetError> {
    let task = catalog
        .task(id)
        .ok_or_else(|| PetError::UnknownTask(id.to_string()))?;
    if status.active_tasks.contains(id)
        || status.completed_tasks.contains(id)
        || !prerequisites_met(status, &task.prerequisites)
    {
        return Ok(false);
    }
    status.active_tasks.insert(id.to_string());
    Ok(true)
}

fn activate_available(status: &mut PetStatus, catalog: &Catalog, out: &mut Vec<Notice>) -> bool {
    let mut changed = false;
    for task in catalog.tasks.values() {
        if status.active_tasks.contains(&task.id)
            || status.completed_tasks.contains(&task.id)
            || !prerequisites_met(status, &task.prerequisites)
        {
            continue;
        }
        status.active_tasks.insert(task.id.clone());
        out.push(Notice::TaskActivated {
            id: task.id.clone(),
            name: task.name.clone(),
        });
        changed = true;
    }
    changed
}

fn check_achievements(status: &mut PetStatus, catalog: &Catalog, out: &mut Vec<Notice>) -> bool {
    let mut changed = false;
    for a in catalog.achievements.values() {
        if status.unlocked_achievements.contains(&a.id) {
            continue;
        }
        if !a.conditions.iter().all(|c| condition_holds(status, c)) {
            continue;
        }
        status.unlocked_achievements.insert(a.id.clone());
        status.exp = status.exp.saturating_add(a.reward.exp);
        status.unlocks.extend(a.reward.unlocks.iter().cloned());
        if let Some(anim) = &a.reward.idle_animation {
            status.unlocked_idle_animations.insert(anim.clone());
        }
        info!(id = %a.id, exp = a.reward.exp, "achievement unlocked");
        out.push(Notice::AchievementUnlocked {
            id: a.id.clone(),
            name: a.name.clone(),
        });
        changed = true;
    }
    changed
}

fn check_tasks(status: &mut PetStatus, catalog: &Catalog, now_ms: u64, out: &mut Vec<Notice>) -> bool {
    let done: Vec<&Task> = status
        .active_tasks
        .iter()
        .filter_map(|id| catalog.task(id))
        .filter(|t| {
            t.goals
                .iter()
                .enumerate()
                .all(|(i, g)| goal_met(status, &t.id, i, g, now_ms))
        })
        .collect();

    for task in &done {
        status.active_tasks.remove(&task.id);
        status.completed_tasks.insert(task.id.clone());
        status
            .goal_streaks
            .retain(|k, _| !k.starts_with(&format!("{}#", task.id)));
        status.exp = status.exp.saturating_add(task.reward.exp);
        for item in &task.reward.items {
            if let Err(e) = status.inventory.add_item(catalog, item, 1) {
                warn!(task = %task.id, "reward skipped: {e}");
            }
        }
        status.unlocks.extend(task.reward.unlocks.iter().cloned());
        info!(id = %task.id, exp = task.reward.exp, "task completed");
        out.push(Notice::TaskCompleted {
            id: task.id.clone(),
            name: task.name.clone(),
            exp: task.reward.exp,
        });
    }
    !done.is_empty()
}

/// Brings achievements, tasks and level up to date with `status`.
pub fn evaluate(status: &mut PetStatus, catalog: &Catalog, now_ms: u64) -> Vec<Notice> {
    let mut out = Vec::new();
    loop {
        let mut changed = activate_available(status, catalog, &mut out);
        update_streaks(status, catalog, now_ms);
        changed |= check_achievements(status, catalog, &mut out);
        changed |= check_tasks(status, catalog, now_ms, &mut out);
        let ups = level_up(status, catalog);
        changed |= !ups.is_empty();
        out.extend(ups.into_iter().map(Notice::LevelUp));
        if !changed {
            break;
        }
    }
    out
}

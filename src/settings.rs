use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tokio::sync::watch;

use crate::models::{Goals, ReminderSettings};

const GOAL_STEP_MINUTES: i32 = 15;
const EARLIEST_WAKE_GOAL: i32 = 4 * 60;
const LATEST_WAKE_GOAL: i32 = 16 * 60;
const MAX_SCREEN_GOAL: i32 = 1440;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserSettings {
    #[serde(default)]
    goals: Goals,
    #[serde(default)]
    reminder: ReminderSettings,
}

/// Wake goals offered to the user: 04:00 through 16:00 in 15-minute steps.
pub fn wake_goal_options() -> Vec<f64> {
    (EARLIEST_WAKE_GOAL..=LATEST_WAKE_GOAL)
        .step_by(GOAL_STEP_MINUTES as usize)
        .map(f64::from)
        .collect()
}

/// Screen-time goals offered to the user: 0 through 24 hours in 15-minute steps.
pub fn screen_goal_options() -> Vec<i32> {
    (0..=MAX_SCREEN_GOAL)
        .step_by(GOAL_STEP_MINUTES as usize)
        .collect()
}

pub fn validate_goals(goals: &Goals) -> Result<()> {
    let wake = goals.goal_wake_minutes;
    if !wake.is_finite()
        || wake < f64::from(EARLIEST_WAKE_GOAL)
        || wake > f64::from(LATEST_WAKE_GOAL)
        || wake % f64::from(GOAL_STEP_MINUTES) != 0.0
    {
        bail!("wake goal {wake} must be between 04:00 and 16:00 in 15-minute steps");
    }

    let screen = goals.goal_screen_minutes;
    if !(0..=MAX_SCREEN_GOAL).contains(&screen) || screen % GOAL_STEP_MINUTES != 0 {
        bail!("screen time goal {screen} must be between 0 and 1440 in 15-minute steps");
    }

    Ok(())
}

/// JSON-backed user preferences. Goal changes are published on a watch
/// channel so every dependent view recomputes from one notification.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
    goals_tx: watch::Sender<Goals>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Settings at {} are unreadable ({err}); using defaults",
                    path.display()
                );
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        let (goals_tx, _) = watch::channel(data.goals);

        Ok(Self {
            path,
            data: RwLock::new(data),
            goals_tx,
        })
    }

    pub fn goals(&self) -> Goals {
        self.read().goals
    }

    /// Receives the current goals immediately and every later change.
    pub fn subscribe(&self) -> watch::Receiver<Goals> {
        self.goals_tx.subscribe()
    }

    pub fn update_goals(&self, goals: Goals) -> Result<()> {
        validate_goals(&goals)?;
        {
            let mut guard = self.write();
            let previous = guard.goals;
            guard.goals = goals;
            if let Err(err) = self.persist(&guard) {
                guard.goals = previous;
                return Err(err);
            }
        }
        self.goals_tx.send_replace(goals);
        Ok(())
    }

    pub fn reminder(&self) -> ReminderSettings {
        self.read().reminder
    }

    pub fn update_reminder(&self, reminder: ReminderSettings) -> Result<()> {
        if reminder.hour > 23 {
            bail!("reminder hour {} must be between 0 and 23", reminder.hour);
        }
        let mut guard = self.write();
        guard.reminder = reminder;
        self.persist(&guard)
    }

    /// Re-read the file, e.g. after another process edited it.
    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: UserSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;
        let goals = data.goals;
        *self.write() = data;
        self.goals_tx.send_if_modified(|current| {
            let changed = *current != goals;
            *current = goals;
            changed
        });
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

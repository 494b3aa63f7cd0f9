use serde::{Deserialize, Serialize};

/// User targets. Wake goal is minutes after local midnight; a day meets it
/// when the wake time is at or before the goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    pub goal_wake_minutes: f64,
    pub goal_screen_minutes: i32,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            goal_wake_minutes: 360.0,
            goal_screen_minutes: 120,
        }
    }
}

/// Daily "log your screen time" reminder preferences. Delivery is left to the host app.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSettings {
    pub enabled: bool,
    pub hour: u32,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            hour: 20,
        }
    }
}

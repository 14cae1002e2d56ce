//! Administrative action log: what changed, and whether the server's
//! post-processing has caught up with it.

use serde::{Deserialize, Serialize};

use crate::entity::EntityInfo;
use crate::types::DbId;

/// Action type written by the server.
pub mod action_type {
    pub const INSERT: &str = "insert";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";

    pub const STATUS_RUNNING: &str = "running";
    pub const STATUS_FAIL: &str = "fail";
}

/// One entry of the server-side action log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionLogInfo {
    pub id: Option<DbId>,
    pub action_type: Option<String>,
    pub target_datatype: Option<String>,
    pub target_table: Option<String>,
    pub target_id: Option<String>,
    pub data_desc: Option<String>,
    /// Whether post-processing has handled this change.
    pub handled: Option<bool>,
    pub handled_date: Option<String>,
    pub status: Option<String>,
    pub status_updated_date: Option<String>,
    pub reason: Option<String>,
    pub user_ip: Option<String>,
    pub reg_date: Option<String>,
}

impl ActionLogInfo {
    /// Human-readable status label for the log panel.
    pub fn status_label(&self) -> String {
        if self.status.as_deref() == Some(action_type::STATUS_RUNNING) {
            return "running..".to_string();
        }
        if self.status.as_deref() == Some(action_type::STATUS_FAIL) {
            return format!(
                "process failed at {} ({})",
                self.status_updated_date.as_deref().unwrap_or("-"),
                self.reason.as_deref().unwrap_or("unknown"),
            );
        }
        if self.handled == Some(true) {
            let date = self.handled_date.as_deref().unwrap_or("-");
            return match self.action_type.as_deref() {
                Some(action_type::DELETE) => format!("deleted at {date}"),
                Some(action_type::UPDATE) => format!("updated and processed at {date}"),
                Some(action_type::INSERT) => format!("added and processed at {date}"),
                _ => format!("processed at {date}"),
            };
        }
        "waiting".to_string()
    }
}

impl EntityInfo for ActionLogInfo {
    const ENTITY: &'static str = "action log";

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    fn sort_key(&self) -> String {
        self.reg_date.clone().unwrap_or_default()
    }
}

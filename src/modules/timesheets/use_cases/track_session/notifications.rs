// Dismissible notices for the person at the terminal.
//
// Remote failures end up here instead of being retried.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Notice {
    pub id: u64,
    pub severity: Severity,
    pub title: String,
    pub subtext: Option<String>,
}

#[derive(Default)]
struct Board {
    next_id: u64,
    notices: Vec<Notice>,
}

#[derive(Default)]
pub struct Notifications {
    board: Mutex<Board>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    fn board(&self) -> std::sync::MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, severity: Severity, title: impl Into<String>, subtext: Option<String>) -> u64 {
        let mut board = self.board();
        board.next_id += 1;
        let id = board.next_id;
        board.notices.push(Notice {
            id,
            severity,
            title: title.into(),
            subtext,
        });
        id
    }

    /// Returns whether a notice with that id was still showing.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut board = self.board();
        let before = board.notices.len();
        board.notices.retain(|n| n.id != id);
        board.notices.len() != before
    }

    pub fn list(&self) -> Vec<Notice> {
        self.board().notices.clone()
    }

    pub fn clear(&self) {
        self.board().notices.clear();
    }
}

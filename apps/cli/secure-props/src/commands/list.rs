use props_core::command::{Algorithm, Mode};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    /// Value accepted by `--algorithm`/`--mode` and passed to the tool.
    pub token: &'static str,
    pub label: &'static str,
    /// Used when the flag is omitted.
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListReport {
    pub algorithms: Vec<ListEntry>,
    pub modes: Vec<ListEntry>,
}

pub fn run() -> ListReport {
    ListReport {
        algorithms: Algorithm::ALL
            .iter()
            .map(|a| ListEntry {
                token: a.token(),
                label: a.label(),
                default: *a == Algorithm::default(),
            })
            .collect(),
        modes: Mode::ALL
            .iter()
            .map(|m| ListEntry {
                token: m.token(),
                label: m.label(),
                default: *m == Mode::default(),
            })
            .collect(),
    }
}

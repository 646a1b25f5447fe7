//! Department work queue (the paint list board).
//!
//! Entries move between three status columns and carry an integer priority
//! used to order cars within a column.

use core::str::FromStr;
use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use partsapp_core::{DomainError, DomainResult, RoNumber};

use crate::repair_order::RepairOrder;

/// Department code of the paint shop.
pub const PAINT_DEPARTMENT: &str = "P";

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkStatus {
    #[default]
    NotStarted,
    Underway,
    Completed,
}

impl WorkStatus {
    pub const ALL: [WorkStatus; 3] = [Self::NotStarted, Self::Underway, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::Underway => "UNDERWAY",
            Self::Completed => "COMPLETED",
        }
    }
}

impl core::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "NOT_STARTED" => Ok(Self::NotStarted),
            "UNDERWAY" => Ok(Self::Underway),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(DomainError::validation(format!("unknown work status '{other}'"))),
        }
    }
}

/// A car placed on a department's board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkQueueEntry {
    pub ro_number: RoNumber,
    pub department_code: String,
    pub status: WorkStatus,
    pub priority: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkQueueEntry {
    pub fn apply_patch(&mut self, patch: &WorkQueuePatch, now: DateTime<Utc>) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        self.updated_at = now;
    }
}

/// Request to put a car on a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWorkQueueEntry {
    pub ro_number: i64,
    #[serde(default)]
    pub department_code: Option<String>,
    #[serde(default)]
    pub status: Option<WorkStatus>,
    #[serde(default)]
    pub priority: Option<i64>,
}

impl NewWorkQueueEntry {
    pub fn department(&self) -> &str {
        match self.department_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code,
            _ => PAINT_DEPARTMENT,
        }
    }

    /// Validate and build the entry. `default_priority` is used when the request
    /// carries none (see [`next_priority`]).
    pub fn into_entry(self, default_priority: i64, now: DateTime<Utc>) -> DomainResult<WorkQueueEntry> {
        let ro_number = RoNumber::new(self.ro_number)
            .map_err(|_| DomainError::validation("ro_number must be a positive integer"))?;
        Ok(WorkQueueEntry {
            ro_number,
            department_code: self.department().to_string(),
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or(default_priority),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of an entry. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkQueuePatch {
    #[serde(default)]
    pub status: Option<WorkStatus>,
    #[serde(default)]
    pub priority: Option<i64>,
}

impl WorkQueuePatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none()
    }
}

/// Priority that puts a new car at the bottom of the NOT_STARTED column.
pub fn next_priority(entries: &[WorkQueueEntry], department: &str) -> i64 {
    entries
        .iter()
        .filter(|e| e.department_code == department && e.status == WorkStatus::NotStarted)
        .map(|e| e.priority)
        .max()
        .map_or(0, |p| p.saturating_add(1))
}

/// A queue entry joined with its repair order (absent if the order is gone).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardEntry {
    #[serde(flatten)]
    pub entry: WorkQueueEntry,
    pub repair_order: Option<RepairOrder>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkBoard {
    pub department_code: String,
    pub not_started: Vec<BoardEntry>,
    pub underway: Vec<BoardEntry>,
    pub completed: Vec<BoardEntry>,
    /// Cars not on this board yet, oldest drop-off first.
    pub available: Vec<RepairOrder>,
    pub technicians: Vec<String>,
}

/// Assemble the board for one department.
pub fn build_board(department: &str, entries: &[WorkQueueEntry], orders: &[RepairOrder]) -> WorkBoard {
    let mut board = WorkBoard {
        department_code: department.to_string(),
        ..WorkBoard::default()
    };

    let mut queued: Vec<&WorkQueueEntry> = entries
        .iter()
        .filter(|e| e.department_code == department)
        .collect();
    queued.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });

    let on_board: HashSet<RoNumber> = queued.iter().map(|e| e.ro_number).collect();

    for entry in queued {
        let joined = BoardEntry {
            entry: entry.clone(),
            repair_order: orders.iter().find(|o| o.ro_number == entry.ro_number).cloned(),
        };
        match entry.status {
            WorkStatus::NotStarted => board.not_started.push(joined),
            WorkStatus::Underway => board.underway.push(joined),
            WorkStatus::Completed => board.completed.push(joined),
        }
    }

    let mut available: Vec<RepairOrder> = orders
        .iter()
        .filter(|o| !on_board.contains(&o.ro_number))
        .cloned()
        .collect();
    available.sort_by(|a, b| a.vehicle_in.cmp(&b.vehicle_in));
    board.available = available;

    let technicians: BTreeSet<&str> = orders
        .iter()
        .map(|o| o.body_technician.trim())
        .filter(|t| !t.is_empty())
        .collect();
    board.technicians = technicians.into_iter().map(str::to_string).collect();

    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn ro(n: i64) -> RoNumber {
        RoNumber::new(n).unwrap()
    }

    fn entry(n: i64, status: WorkStatus, priority: i64, created: i64) -> WorkQueueEntry {
        WorkQueueEntry {
            ro_number: ro(n),
            department_code: PAINT_DEPARTMENT.to_string(),
            status,
            priority,
            created_at: t(created),
            updated_at: t(created),
        }
    }

    fn order(n: i64, day: i64, tech: &str) -> RepairOrder {
        let mut o = RepairOrder::new(ro(n), t(day * 24 * 60));
        o.body_technician = tech.to_string();
        o
    }

    #[test]
    fn columns_sorted_by_priority_then_creation() {
        let entries = vec![
            entry(1, WorkStatus::NotStarted, 2, 0),
            entry(2, WorkStatus::NotStarted, 1, 5),
            entry(3, WorkStatus::NotStarted, 1, 1),
            entry(4, WorkStatus::Underway, 0, 0),
            entry(5, WorkStatus::Completed, 0, 0),
        ];
        let board = build_board(PAINT_DEPARTMENT, &entries, &[]);
        let col: Vec<i64> = board.not_started.iter().map(|e| e.entry.ro_number.get()).collect();
        assert_eq!(col, vec![3, 2, 1]);
        assert_eq!(board.underway.len(), 1);
        assert_eq!(board.completed.len(), 1);
    }

    #[test]
    fn available_cars_exclude_queued_and_sort_oldest_first() {
        let orders = vec![order(1, 3, "Rita"), order(2, 1, "Bo"), order(3, 2, "")];
        let entries = vec![entry(1, WorkStatus::NotStarted, 0, 0)];
        let board = build_board(PAINT_DEPARTMENT, &entries, &orders);

        let available: Vec<i64> = board.available.iter().map(|o| o.ro_number.get()).collect();
        assert_eq!(available, vec![2, 3]);
        assert_eq!(board.technicians, vec!["Bo".to_string(), "Rita".to_string()]);
        assert!(board.not_started[0].repair_order.is_some());
    }

    #[test]
    fn other_departments_are_ignored() {
        let mut body = entry(7, WorkStatus::NotStarted, 0, 0);
        body.department_code = "B".to_string();
        let board = build_board(PAINT_DEPARTMENT, &[body], &[order(7, 0, "")]);
        assert!(board.not_started.is_empty());
        assert_eq!(board.available.len(), 1);
    }

    #[test]
    fn next_priority_goes_to_end_of_not_started() {
        assert_eq!(next_priority(&[], PAINT_DEPARTMENT), 0);
        let entries = vec![
            entry(1, WorkStatus::NotStarted, 4, 0),
            entry(2, WorkStatus::Underway, 9, 0),
        ];
        assert_eq!(next_priority(&entries, PAINT_DEPARTMENT), 5);
    }

    #[test]
    fn new_entry_defaults() {
        let req = NewWorkQueueEntry {
            ro_number: 42,
            ..NewWorkQueueEntry::default()
        };
        let e = req.into_entry(3, t(0)).unwrap();
        assert_eq!(e.department_code, PAINT_DEPARTMENT);
        assert_eq!(e.status, WorkStatus::NotStarted);
        assert_eq!(e.priority, 3);

        let bad = NewWorkQueueEntry::default();
        assert!(matches!(bad.into_entry(0, t(0)), Err(DomainError::Validation(_))));
    }

    #[test]
    fn patch_changes_only_given_fields() {
        let mut e = entry(1, WorkStatus::NotStarted, 2, 0);
        e.apply_patch(
            &WorkQueuePatch {
                status: Some(WorkStatus::Underway),
                priority: None,
            },
            t(10),
        );
        assert_eq!(e.status, WorkStatus::Underway);
        assert_eq!(e.priority, 2);
        assert_eq!(e.updated_at, t(10));
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(serde_json::to_value(WorkStatus::NotStarted).unwrap(), serde_json::json!("NOT_STARTED"));
        assert_eq!("UNDERWAY".parse::<WorkStatus>().unwrap(), WorkStatus::Underway);
    }
}

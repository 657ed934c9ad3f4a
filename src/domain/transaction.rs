use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type TransactionId = Uuid;
pub type ProfileId = Uuid;

/// Which way the money moved when the transaction was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money lent out to the counterparty - a receivable
    Given,
    /// Money borrowed from the counterparty - a payable
    Taken,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Given => "given",
            Direction::Taken => "taken",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "given" => Some(Direction::Given),
            "taken" => Some(Direction::Taken),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement state of a transaction. Settling is reversible: a loan
/// marked paid by mistake can be reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Settled,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Settled => "settled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Status::Active),
            "settled" => Some(Status::Settled),
            _ => None,
        }
    }

    /// The flipped state: Active <-> Settled.
    pub fn toggled(&self) -> Self {
        match self {
            Status::Active => Status::Settled,
            Status::Settled => Status::Active,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single lending or borrowing record. Everything except `status` is
/// write-once; interest is never stored on the record, it is recomputed
/// from principal, rate and start date at every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Profile that created the record; every operation must match on it
    pub owner_id: ProfileId,
    /// Name of the person the money was given to / taken from
    pub counterparty_name: String,
    pub direction: Direction,
    /// Principal in cents (always positive)
    pub principal_cents: Cents,
    /// Monthly simple-interest rate, percent in [0, 100]
    pub monthly_rate_pct: f64,
    /// When the principal was disbursed
    pub start_date: DateTime<Utc>,
    /// Optional repayment deadline
    pub due_date: Option<DateTime<Utc>>,
    pub status: Status,
    /// When we recorded this transaction in the system
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new active transaction owned by `owner_id`.
    /// Field validation happens at the service boundary, not here.
    pub fn new(
        owner_id: ProfileId,
        counterparty_name: impl Into<String>,
        direction: Direction,
        principal_cents: Cents,
        monthly_rate_pct: f64,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            counterparty_name: counterparty_name.into(),
            direction,
            principal_cents,
            monthly_rate_pct,
            start_date,
            due_date: None,
            status: Status::Active,
            created_at: Utc::now(),
        }
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// A transaction is overdue when its due date has passed while it is
    /// still active. Derived at read time, never stored.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => self.status == Status::Active && due < now,
            None => false,
        }
    }
}

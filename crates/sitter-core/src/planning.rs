//! Planning — weekly availability declared by an account.
//!
//! Families declare when they need care, providers when they are free. The
//! whole block is replaced on edit; nothing queries individual weekdays.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A block of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
  Morning,
  Noon,
  Afternoon,
  Evening,
  Night,
}

/// Weekly availability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planning {
  pub start_date: Option<NaiveDate>,
  #[serde(default)]
  pub weekdays:   Vec<Weekday>,
  #[serde(default)]
  pub slots:      Vec<TimeSlot>,
}

//! Criteria — the shared search-profile block.
//!
//! Both kinds carry the same block: families describe what they expect,
//! providers describe what they offer. Capability flags are plain booleans
//! so the search layer can match them without interpretation.

use serde::{Deserialize, Serialize};

/// Highest diploma level declared on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyLevel {
  Brevet,
  Bac,
  BacPlus1,
  BacPlus2,
  BacPlus3,
  BacPlus4,
  BacPlus5,
  Other,
}

/// Childcare experience bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceBracket {
  UnderOneYear,
  OneToThreeYears,
  ThreeToSixYears,
  OverSixYears,
}

/// Hourly rate range in euros, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRange {
  pub min: u32,
  pub max: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
  pub description:      Option<String>,
  pub studies:          Option<StudyLevel>,
  pub experience:       Option<ExperienceBracket>,
  #[serde(default)]
  pub languages:        Vec<String>,
  pub rate:             Option<RateRange>,
  // capability / preference flags
  #[serde(default)]
  pub housework:        bool,
  #[serde(default)]
  pub ironing:          bool,
  #[serde(default)]
  pub cooking:          bool,
  #[serde(default)]
  pub homework_help:    bool,
  #[serde(default)]
  pub accepts_pets:     bool,
  #[serde(default)]
  pub non_smoker:       bool,
  #[serde(default)]
  pub first_aid:        bool,
  #[serde(default)]
  pub driving_licence:  bool,
  #[serde(default)]
  pub takes_sick_child: bool,
}

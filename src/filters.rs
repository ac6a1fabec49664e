use serde::{Deserialize, Serialize};

use crate::models::ResultRecord;
use crate::scoring::normalize_key;
use crate::teams::canonical_team;

/// Optional season-level row filters. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonFilters {
    pub meet: Option<String>,
    pub team: Option<String>,
    pub gender: Option<String>,
    pub grade: Option<i32>,
    pub division: Option<String>,
}

fn matches_text(value: &str, filter: Option<&str>) -> bool {
    match filter.map(str::trim).filter(|filter| !filter.is_empty()) {
        Some(filter) => normalize_key(value) == normalize_key(filter),
        None => true,
    }
}

fn matches_gender(value: &str, filter: Option<&str>) -> bool {
    let Some(filter) = filter.map(normalize_key).filter(|filter| !filter.is_empty()) else {
        return true;
    };
    let value = normalize_key(value);
    if value == filter {
        return true;
    }
    match (value.chars().next(), filter.chars().next()) {
        (Some(value_initial), Some(filter_initial)) => value_initial == filter_initial,
        _ => false,
    }
}

impl SeasonFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &ResultRecord) -> bool {
        let team_matches = match self.team.as_deref().map(canonical_team) {
            Some(team) if !team.is_empty() => {
                normalize_key(&canonical_team(&record.team)) == normalize_key(&team)
            }
            _ => true,
        };

        team_matches
            && matches_text(&record.meet, self.meet.as_deref())
            && matches_text(&record.division, self.division.as_deref())
            && matches_gender(&record.gender, self.gender.as_deref())
            && self.grade.map_or(true, |grade| record.grade == Some(grade))
    }

    /// Matching records, in input order.
    pub fn apply(&self, records: &[ResultRecord]) -> Vec<ResultRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

/// Rows raced in the same segment as a reference row: same meet, same
/// division when the reference has one, same gender initial, and the same
/// grade unless either row has no grade.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentFilter {
    meet: String,
    division: String,
    gender_initial: Option<char>,
    grade: Option<i32>,
}

impl SegmentFilter {
    pub fn from_record(reference: &ResultRecord) -> Self {
        Self {
            meet: normalize_key(&reference.meet),
            division: normalize_key(&reference.division),
            gender_initial: normalize_key(&reference.gender).chars().next(),
            grade: reference.grade,
        }
    }

    pub fn matches(&self, record: &ResultRecord) -> bool {
        if normalize_key(&record.meet) != self.meet {
            return false;
        }
        if !self.division.is_empty() && normalize_key(&record.division) != self.division {
            return false;
        }
        if let Some(initial) = self.gender_initial {
            if normalize_key(&record.gender).chars().next() != Some(initial) {
                return false;
            }
        }

        match (self.grade, record.grade) {
            (Some(reference), Some(candidate)) => reference == candidate,
            _ => true,
        }
    }

    /// Matching records, in input order.
    pub fn apply(&self, records: &[ResultRecord]) -> Vec<ResultRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

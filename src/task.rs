use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Urgent,
    Moderate,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Urgent, Priority::Moderate, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::Moderate => "moderate",
            Priority::Low => "low",
        }
    }

    /// Label shown in the priority dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Urgent => "Urgente",
            Priority::Moderate => "Moderado",
            Priority::Low => "Bajo",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urgent" => Ok(Priority::Urgent),
            "moderate" => Ok(Priority::Moderate),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    /// Empty for a draft that has not been saved yet.
    #[serde(default)]
    pub id: String,
    pub description: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    pub priority: Priority,
    #[serde(rename = "listId", default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            date,
            priority,
            list_id: None,
        }
    }

    /// A blank draft dated `today`.
    pub fn draft(today: NaiveDate) -> Self {
        Self::new("", "", today, Priority::default())
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_empty()
    }
}

/// Accepts `YYYY-MM-DD` as well as full RFC 3339 timestamps.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.date_naive())
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
}

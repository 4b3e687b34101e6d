pub const MIN_ORDER_NUMBER: i64 = 1;
pub const MAX_ORDER_NUMBER: i64 = 169;
pub const MAX_CONFIDENCE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: i64, // Assigned by the backend
    pub order_number: i64,
    pub problem_name: String,
    pub link_to_problem: Option<String>,
    pub solution: Option<String>,
    /// `None` when the backend sent something other than easy, medium or hard.
    #[serde(default, with = "lenient_difficulty")]
    pub difficulty: Option<Difficulty>,
    pub topic: Option<String>,
    pub confidence_rating: f64,
    #[serde(with = "timestamp")]
    pub last_edited: DateTime<Utc>,
}

/// Everything the client supplies when creating a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProblem {
    pub order_number: i64,
    pub problem_name: String,
    pub link_to_problem: Option<String>,
    pub solution: Option<String>,
    pub difficulty: Difficulty,
    pub topic: Option<String>,
    pub confidence_rating: f64,
    #[serde(with = "timestamp")]
    pub last_edited: DateTime<Utc>,
}

impl NewProblem {
    pub fn with_id(self, id: i64) -> Problem {
        Problem {
            id,
            order_number: self.order_number,
            problem_name: self.problem_name,
            link_to_problem: self.link_to_problem,
            solution: self.solution,
            difficulty: Some(self.difficulty),
            topic: self.topic,
            confidence_rating: self.confidence_rating,
            last_edited: self.last_edited,
        }
    }
}

/// A partial update sent with `PUT /problems/{id}`.
///
/// Fields left as `None` are omitted from the request body. The nullable
/// fields use a nested `Option` so that `Some(None)` goes out as an explicit
/// `null` and clears the value on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_to_problem: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_rating: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "timestamp::serialize_some"
    )]
    pub last_edited: Option<DateTime<Utc>>,
}

impl ProblemUpdate {
    /// Applies the present fields to `problem`, leaving the rest untouched.
    pub fn apply_to(&self, problem: &mut Problem) {
        if let Some(order_number) = self.order_number {
            problem.order_number = order_number;
        }
        if let Some(name) = &self.problem_name {
            problem.problem_name = name.clone();
        }
        if let Some(link) = &self.link_to_problem {
            problem.link_to_problem = link.clone();
        }
        if let Some(solution) = &self.solution {
            problem.solution = solution.clone();
        }
        if let Some(difficulty) = self.difficulty {
            problem.difficulty = Some(difficulty);
        }
        if let Some(topic) = &self.topic {
            problem.topic = topic.clone();
        }
        if let Some(rating) = self.confidence_rating {
            problem.confidence_rating = rating;
        }
        if let Some(last_edited) = self.last_edited {
            problem.last_edited = last_edited;
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "unknown difficulty '{}', expected easy, medium or hard",
                other
            )),
        }
    }
}

/// The four orderings the backend knows how to return the collection in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum SortMode {
    #[default]
    #[value(name = "order")]
    CurriculumOrder,
    #[value(name = "last-edited")]
    LastEdited,
    #[value(name = "difficulty")]
    DifficultyAscending,
    #[value(name = "confidence")]
    ConfidenceAscending,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::CurriculumOrder,
        SortMode::LastEdited,
        SortMode::DifficultyAscending,
        SortMode::ConfidenceAscending,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            SortMode::CurriculumOrder => "/problems/sort/order",
            SortMode::LastEdited => "/problems/sort/last-edited",
            SortMode::DifficultyAscending => "/problems/sort/difficulty/asc",
            SortMode::ConfidenceAscending => "/problems/sort/confidence",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortMode::CurriculumOrder => "Grind 169 Order",
            SortMode::LastEdited => "Least Recently Edited",
            SortMode::DifficultyAscending => "Easiest First",
            SortMode::ConfidenceAscending => "Lowest Confidence First",
        }
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <SortMode as ValueEnum>::from_str(s.trim(), true)
    }
}

/// Wire format for a stored problem's `difficulty`.
///
/// Stored records are matched ignoring case and padding. Anything else,
/// including an empty string or `null`, decodes to `None`.
pub mod lenient_difficulty {
    use super::Difficulty;
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::debug;

    pub fn serialize<S: Serializer>(
        value: &Option<Difficulty>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(difficulty) => serializer.serialize_str(difficulty.as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Difficulty>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        match raw.parse() {
            Ok(difficulty) => Ok(Some(difficulty)),
            Err(_) => {
                debug!(difficulty = raw.as_str(), "unrecognised difficulty");
                Ok(None)
            }
        }
    }
}

/// Wire format for `lastEdited`.
///
/// Encodes as RFC 3339 in UTC with millisecond precision. Decoding also
/// accepts timestamps without an offset, which are taken to be UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn serialize_some<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}


use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

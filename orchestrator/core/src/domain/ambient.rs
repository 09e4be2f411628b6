// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Ambient Shopping Context
//!
//! Calendar-derived signals used by the context-aware tier. Everything is
//! computed in Indian Standard Time (UTC+05:30) from a UTC instant.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Season {
    Winter,
    Summer,
    Monsoon,
    PostMonsoon,
}

impl Season {
    pub fn for_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Summer,
            6..=9 => Season::Monsoon,
            _ => Season::PostMonsoon,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Summer => "summer",
            Season::Monsoon => "monsoon",
            Season::PostMonsoon => "post-monsoon",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Festival {
    MakarSankranti,
    Holi,
    RakshaBandhan,
    GaneshChaturthi,
    Navratri,
    Diwali,
    Christmas,
}

impl Festival {
    /// Festivals whose window overlaps the given month
    pub fn in_month(month: u32) -> Vec<Festival> {
        match month {
            1 => vec![Festival::MakarSankranti],
            3 => vec![Festival::Holi],
            8 => vec![Festival::RakshaBandhan],
            9 => vec![Festival::GaneshChaturthi],
            10 => vec![Festival::Navratri, Festival::Diwali],
            11 => vec![Festival::Diwali],
            12 => vec![Festival::Christmas],
            _ => Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Festival::MakarSankranti => "Makar Sankranti",
            Festival::Holi => "Holi",
            Festival::RakshaBandhan => "Raksha Bandhan",
            Festival::GaneshChaturthi => "Ganesh Chaturthi",
            Festival::Navratri => "Navratri/Dussehra",
            Festival::Diwali => "Diwali",
            Festival::Christmas => "Christmas",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPart {
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            5..=11 => DayPart::Morning,
            12..=16 => DayPart::Afternoon,
            17..=20 => DayPart::Evening,
            _ => DayPart::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayPart::Morning => "morning",
            DayPart::Afternoon => "afternoon",
            DayPart::Evening => "evening",
            DayPart::Night => "night",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbientContext {
    pub season: Season,
    pub festivals: Vec<Festival>,
    pub day_part: DayPart,
    pub weekday: Weekday,
}

impl AmbientContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        let local = match FixedOffset::east_opt(IST_OFFSET_SECS) {
            Some(ist) => now.with_timezone(&ist),
            None => now.fixed_offset(),
        };
        Self {
            season: Season::for_month(local.month()),
            festivals: Festival::in_month(local.month()),
            day_part: DayPart::for_hour(local.hour()),
            weekday: local.weekday(),
        }
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday, Weekday::Sat | Weekday::Sun)
    }

    /// Short labels attached to candidates produced under this context
    pub fn tags(&self) -> Vec<String> {
        let mut tags = vec![self.season.as_str().to_string(), self.day_part.as_str().to_string()];
        tags.extend(self.festivals.iter().map(|f| f.name().to_lowercase()));
        if self.is_weekend() {
            tags.push("weekend".to_string());
        }
        tags
    }
}

impl fmt::Display for AmbientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {} season",
            self.weekday,
            self.day_part.as_str(),
            self.season.as_str()
        )?;
        if !self.festivals.is_empty() {
            let names: Vec<&str> = self.festivals.iter().map(|fest| fest.name()).collect();
            write!(f, ", festive window: {}", names.join(", "))?;
        }
        Ok(())
    }
}

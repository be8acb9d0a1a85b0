use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::{self, YearMonth};

/// Records stored in a collection file, kept newest first.
pub trait Dated {
    type Key: Ord;

    /// Parse a stored `date` string; `None` when it is malformed.
    fn parse_date(date: &str) -> Option<Self::Key>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub description: String,
    pub date: String,
    pub url: String,
}

impl Dated for BlogPost {
    type Key = YearMonth;

    fn parse_date(date: &str) -> Option<YearMonth> {
        date::parse_year_month(date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub title: String,
    pub event: String,
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slides: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub slide_pdf: Option<String>,
}

impl Presentation {
    /// Year segment of the event date, which names the collection file.
    pub fn year(&self) -> &str {
        self.date.get(..4).unwrap_or(&self.date)
    }
}

impl Dated for Presentation {
    type Key = NaiveDate;

    fn parse_date(date: &str) -> Option<NaiveDate> {
        date::parse_event_date(date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedBlogPost {
    #[serde(flatten)]
    pub post: BlogPost,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedPresentation {
    #[serde(flatten)]
    pub presentation: Presentation,
    pub thumbnail: Option<String>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized entry from any source.
///
/// `date` is only populated by feed-style sources and is used for sorting;
/// it is stripped from the wire representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub link: String,
    #[serde(skip)]
    pub date: Option<DateTime<Utc>>,
}

impl Item {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            date: None,
        }
    }

    pub fn dated(
        title: impl Into<String>,
        link: impl Into<String>,
        date: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            date,
        }
    }

    /// Sort key for descending-by-date ordering. Items without a native
    /// timestamp sort as the oldest.
    pub fn sort_date(&self) -> DateTime<Utc> {
        self.date.unwrap_or(DateTime::UNIX_EPOCH)
    }
}

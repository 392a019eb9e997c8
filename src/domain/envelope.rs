use serde::{Deserialize, Serialize};

use crate::domain::Item;

/// An adapter's normalized output before router wrapping.
///
/// `items` carries the final caller-facing order: ignore filtering, sorting
/// and pagination have already been applied by the adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedResult {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub items: Vec<Item>,
}

impl FeedResult {
    pub fn new(title: impl Into<String>, link: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            title: title.into(),
            link: Some(link.into()),
            items,
        }
    }

    /// A result without a source link. Used both by sources that have no
    /// canonical page and for the error envelope body.
    pub fn unlinked(title: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            title: title.into(),
            link: None,
            items,
        }
    }

    pub fn empty() -> Self {
        Self::unlinked("", Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeCode {
    Ok,
    Error,
}

/// The uniform wrapper returned for every request, success or failure.
///
/// On error the body is always `{title: "", items: []}`; callers never see
/// the failure cause, only the code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: EnvelopeCode,
    pub res: FeedResult,
}

impl Envelope {
    pub fn ok(res: FeedResult) -> Self {
        Self {
            code: EnvelopeCode::Ok,
            res,
        }
    }

    pub fn error() -> Self {
        Self {
            code: EnvelopeCode::Error,
            res: FeedResult::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_shape() {
        let json = serde_json::to_value(Envelope::error()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"code": "error", "res": {"title": "", "items": []}})
        );
    }

    #[test]
    fn test_ok_envelope_includes_link() {
        let res = FeedResult::new("t", "https://example.com", vec![Item::new("a", "b")]);
        let json = serde_json::to_value(Envelope::ok(res)).unwrap();
        assert_eq!(json["code"], "ok");
        assert_eq!(json["res"]["link"], "https://example.com");
        assert_eq!(json["res"]["items"][0]["title"], "a");
    }

    #[test]
    fn test_unlinked_result_omits_link() {
        let json = serde_json::to_value(FeedResult::unlinked("t", vec![])).unwrap();
        assert!(json.get("link").is_none());
    }
}

//! Dataset identifiers and the metadata encoded in them.
//!
//! A dataset is named `<name>:<dataset-id>:<num-samples>:<rating-system>[:<p1>:<p2>]`,
//! where `log` carries `a` then `c` and `linear` carries `b` then `m`.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Rating-to-rank conversion the dataset was produced with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingSystem {
    Log,
    Linear,
    Gor,
    /// Tag this build does not know about, kept verbatim
    #[serde(untagged)]
    Other(String),
}

impl RatingSystem {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "log" => RatingSystem::Log,
            "linear" => RatingSystem::Linear,
            "gor" => RatingSystem::Gor,
            other => RatingSystem::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RatingSystem::Log => "log",
            RatingSystem::Linear => "linear",
            RatingSystem::Gor => "gor",
            RatingSystem::Other(tag) => tag,
        }
    }
}

impl std::fmt::Display for RatingSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameters of `rank = ln(rating / a) * c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogArgs {
    pub a: f64,
    pub c: f64,
}

/// Parameters of `rank = rating / m + b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearArgs {
    pub b: f64,
    pub m: f64,
}

/// Metadata decoded from a dataset name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub name: String,

    pub dataset: String,

    /// Sample count from the name until an aggregation overwrites it
    /// with the samples it actually summed. `None` when the name's count
    /// field is missing or not a number.
    pub num_samples: Option<u64>,

    pub ignored: u64,

    pub rating_system: RatingSystem,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_args: Option<LogArgs>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear_args: Option<LinearArgs>,

    /// Total unexpected rank changes; only the banded aggregation fills this
    #[serde(default)]
    pub unexpected_rank_changes: u64,
}

impl DatasetMetadata {
    /// Decode a dataset identifier. Never fails: missing fields become empty
    /// strings or `None`, and malformed parameters become NaN.
    pub fn parse(identifier: &str) -> Self {
        let components: Vec<&str> = identifier.split(':').collect();
        let field = |i: usize| components.get(i).copied().unwrap_or("");

        let rating_system = RatingSystem::from_tag(field(3));

        let mut metadata = Self {
            name: field(0).to_string(),
            dataset: field(1).to_string(),
            num_samples: parse_count(field(2)),
            ignored: 0,
            rating_system,
            log_args: None,
            linear_args: None,
            unexpected_rank_changes: 0,
        };

        match &metadata.rating_system {
            RatingSystem::Log => {
                metadata.log_args = Some(LogArgs {
                    a: parse_float(field(4)),
                    c: parse_float(field(5)),
                });
            }
            RatingSystem::Linear => {
                metadata.linear_args = Some(LinearArgs {
                    b: parse_float(field(4)),
                    m: parse_float(field(5)),
                });
            }
            RatingSystem::Gor => {}
            RatingSystem::Other(tag) => {
                warn!("Unhandled rating system {:?} in dataset {:?}", tag, identifier);
            }
        }

        metadata
    }

    /// Display title: the name with dashes read as spaces.
    pub fn title(&self) -> String {
        self.name.replace('-', " ")
    }
}

/// Leading-integer parse: "100" and "100abc" give 100, garbage gives `None`.
fn parse_count(s: &str) -> Option<u64> {
    let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn parse_float(s: &str) -> f64 {
    s.trim().parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_dataset() {
        let meta = DatasetMetadata::parse("foo:bar:100:log:1.5:2.3");

        assert_eq!(meta.name, "foo");
        assert_eq!(meta.dataset, "bar");
        assert_eq!(meta.num_samples, Some(100));
        assert_eq!(meta.rating_system, RatingSystem::Log);
        assert_eq!(meta.log_args, Some(LogArgs { a: 1.5, c: 2.3 }));
        assert!(meta.linear_args.is_none());
    }

    #[test]
    fn test_parse_linear_keeps_field_order() {
        let meta = DatasetMetadata::parse("x:y:10:linear:7:3");

        assert_eq!(meta.rating_system, RatingSystem::Linear);
        assert_eq!(meta.linear_args, Some(LinearArgs { b: 7.0, m: 3.0 }));
        assert!(meta.log_args.is_none());
    }

    #[test]
    fn test_parse_gor_has_no_args() {
        let meta = DatasetMetadata::parse("gor-run:egf:5000:gor");

        assert_eq!(meta.rating_system, RatingSystem::Gor);
        assert!(meta.log_args.is_none());
        assert!(meta.linear_args.is_none());
        assert_eq!(meta.title(), "gor run");
    }

    #[test]
    fn test_parse_unknown_system() {
        let meta = DatasetMetadata::parse("a:b:1:elo:4:5");

        assert_eq!(meta.rating_system, RatingSystem::Other("elo".to_string()));
        assert!(meta.log_args.is_none());
        assert!(meta.linear_args.is_none());
    }

    #[test]
    fn test_parse_malformed_params_are_nan() {
        let meta = DatasetMetadata::parse("a:b:1:log:abc");
        let args = meta.log_args.unwrap();

        assert!(args.a.is_nan());
        assert!(args.c.is_nan());
    }

    #[test]
    fn test_parse_truncated_identifier() {
        let meta = DatasetMetadata::parse("lonely");

        assert_eq!(meta.name, "lonely");
        assert_eq!(meta.dataset, "");
        assert!(meta.num_samples.is_none());
        assert_eq!(meta.rating_system, RatingSystem::Other(String::new()));
    }

    #[test]
    fn test_parse_malformed_count_is_missing() {
        let meta = DatasetMetadata::parse("a:b:x1:elo");

        assert!(meta.num_samples.is_none());
        assert_eq!(meta.name, "a");
        assert_eq!(meta.rating_system, RatingSystem::Other("elo".to_string()));

        let json = serde_json::to_value(&meta).unwrap();
        assert!(json["num_samples"].is_null());
    }

    #[test]
    fn test_parse_count_leading_digits() {
        assert_eq!(parse_count("100"), Some(100));
        assert_eq!(parse_count("42k"), Some(42));
        assert_eq!(parse_count("0"), Some(0));
        assert_eq!(parse_count("n/a"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn test_metadata_serialization() {
        let meta = DatasetMetadata::parse("foo:bar:100:linear:9:100");
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["rating_system"], "linear");
        assert_eq!(json["linear_args"]["b"], 9.0);
        assert_eq!(json["linear_args"]["m"], 100.0);
        assert!(json.get("log_args").is_none());
    }
}

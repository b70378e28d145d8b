//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range sanity checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use super::defaults::{MAX_RANGES, MIN_RANGES};
use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for ClusterConfig.
///
/// Maintained manually to match the struct hierarchy in cluster_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [input]
        "input",
        "input.path",
        "input.delimiter",
        "input.zone_column",
        "input.x_column",
        "input.y_column",
        "input.cum_column",
        "input.id_column",
        // [spacing]
        "spacing",
        "spacing.unit",
        "spacing.ranges",
        // [volume]
        "volume",
        "volume.unit",
        "volume.ranges",
        // [engine]
        "engine",
        "engine.parallel_zones",
        "engine.single_well_policy",
        // [export]
        "export",
        "export.output_dir",
        "export.file_suffix",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the alphabetically first key so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Validate range counts and bounds on a parsed ClusterConfig.
///
/// Returns (errors, warnings). Errors are range counts outside
/// `MIN_RANGES..=MAX_RANGES`; warnings flag bounds that still classify
/// correctly but are unusual.
pub fn validate_metric_ranges(
    config: &super::ClusterConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (name, ranges) in [
        ("spacing", &config.spacing.ranges),
        ("volume", &config.volume.ranges),
    ] {
        if !(MIN_RANGES..=MAX_RANGES).contains(&ranges.len()) {
            errors.push(format!(
                "{name}.ranges has {} intervals, expected {MIN_RANGES}-{MAX_RANGES}",
                ranges.len()
            ));
            continue;
        }

        // Terminal intervals absorb everything beyond them regardless of the
        // declared outer bound.
        if let Some(first) = ranges.first() {
            if first[0] != f64::NEG_INFINITY {
                warnings.push(ValidationWarning {
                    field: format!("{name}.ranges"),
                    message: format!(
                        "{name}.ranges starts at {} instead of -inf; smaller values still fall in the first range",
                        first[0]
                    ),
                    suggestion: None,
                });
            }
        }
        if ranges.len() > 1 {
            if let Some(last) = ranges.last() {
                if last[1] != f64::INFINITY {
                    warnings.push(ValidationWarning {
                        field: format!("{name}.ranges"),
                        message: format!(
                            "{name}.ranges ends at {} instead of inf; larger values still fall in the last range",
                            last[1]
                        ),
                        suggestion: None,
                    });
                }
            }
        }
    }

    // Drainage areas are never negative
    if let Some(bound) = config
        .spacing
        .ranges
        .iter()
        .flatten()
        .find(|b| b.is_finite() && **b < 0.0)
    {
        warnings.push(ValidationWarning {
            field: "spacing.ranges".to_string(),
            message: format!("spacing.ranges contains negative bound {bound}; drainage areas are never negative"),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClusterConfig;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("hello", "hello"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("volume.unt", "volume.unit"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [input]
            path = "wells.csv"
            [engine]
            parallel_zones = false
        "#
        .parse()
        .expect("valid toml");
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"input".to_string()));
        assert!(keys.contains(&"input.path".to_string()));
        assert!(keys.contains(&"engine.parallel_zones".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[spacing]
untis = "acres"
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "spacing.untis");
        assert_eq!(warnings[0].suggestion.as_deref(), Some("spacing.unit"));
    }

    #[test]
    fn test_all_valid_keys_produce_zero_warnings() {
        let toml_str = r#"
[input]
path = "dfx.csv"
zone_column = "Zone Name"

[spacing]
unit = "acres"
ranges = [[-inf, 4.0], [4.0, inf]]

[export]
file_suffix = "_clusters.csv"
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(warnings.is_empty(), "Expected 0 warnings, got: {:?}", warnings);
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        assert!(suggest_correction("completely_unrelated_garbage_key_xyz", &known).is_none());
    }

    #[test]
    fn test_range_count_bounds() {
        let mut config = ClusterConfig::default();
        config.volume.ranges = (0..11).map(|i| [f64::from(i), f64::from(i) + 1.0]).collect();
        let (errors, _) = validate_metric_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("volume.ranges has 11 intervals")));
    }

    #[test]
    fn test_open_ends_warn_when_finite() {
        let mut config = ClusterConfig::default();
        config.volume.ranges = vec![[0.0, 5.0], [5.0, 100.0]];
        let (errors, warnings) = validate_metric_ranges(&config);
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_negative_spacing_bound_warns() {
        let mut config = ClusterConfig::default();
        config.spacing.ranges = vec![[f64::NEG_INFINITY, -1.0], [-1.0, f64::INFINITY]];
        let (_, warnings) = validate_metric_ranges(&config);
        assert!(warnings.iter().any(|w| w.message.contains("negative bound -1")));
    }

    #[test]
    fn test_defaults_clean() {
        let (errors, warnings) = validate_metric_ranges(&ClusterConfig::default());
        assert!(errors.is_empty(), "Defaults should produce no errors: {:?}", errors);
        assert!(warnings.is_empty(), "Defaults should produce no warnings: {:?}", warnings);
    }
}

use serde::Deserialize;
use std::collections::BTreeMap;

/// Labels and annotations injected into every mutated object.
///
/// Built once at startup and never changed afterwards. `BTreeMap` keeps the
/// iteration order, and with it the generated patch, deterministic.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LabelAnnotationConfig {
    #[serde(default)]
    labels: BTreeMap<String, String>,
    #[serde(default)]
    annotations: BTreeMap<String, String>,
}

impl LabelAnnotationConfig {
    pub fn new(labels: BTreeMap<String, String>, annotations: BTreeMap<String, String>) -> Self {
        LabelAnnotationConfig {
            labels,
            annotations,
        }
    }

    /// The set injected when the operator does not provide one.
    pub fn builtin() -> Self {
        LabelAnnotationConfig::new(
            BTreeMap::from([
                ("air".to_owned(), "falcon".to_owned()),
                ("land".to_owned(), "mongoose".to_owned()),
                ("sea".to_owned(), "turtle".to_owned()),
            ]),
            BTreeMap::from([(
                "address".to_owned(),
                "P. Sherman 42 Wallaby Way, Sydney, Austrailia".to_owned(),
            )]),
        )
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn annotations(&self) -> &BTreeMap<String, String> {
        &self.annotations
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.annotations.is_empty()
    }

    /// Entries of `other` win over the ones already present.
    pub fn merge(mut self, other: LabelAnnotationConfig) -> Self {
        self.labels.extend(other.labels);
        self.annotations.extend(other.annotations);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_file_contents() {
        let input = r#"
---
labels:
  tier: edge
  app.kubernetes.io/managed-by: label-injector
annotations:
  owner: platform-team
"#;
        let config: LabelAnnotationConfig = serde_yaml::from_str(input).unwrap();

        assert_eq!(config.labels().get("tier").unwrap(), "edge");
        assert_eq!(
            config.labels().get("app.kubernetes.io/managed-by").unwrap(),
            "label-injector"
        );
        assert_eq!(config.annotations().get("owner").unwrap(), "platform-team");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let config: LabelAnnotationConfig =
            serde_yaml::from_str("labels:\n  tier: edge\n").unwrap();

        assert_eq!(config.labels().len(), 1);
        assert!(config.annotations().is_empty());
    }

    #[test]
    fn unknown_sections_are_rejected() {
        let result = serde_yaml::from_str::<LabelAnnotationConfig>("lables:\n  tier: edge\n");
        assert!(result.is_err());
    }

    #[test]
    fn merge_overrides_existing_keys() {
        let base = LabelAnnotationConfig::new(
            BTreeMap::from([
                ("tier".to_owned(), "edge".to_owned()),
                ("team".to_owned(), "a".to_owned()),
            ]),
            BTreeMap::new(),
        );
        let overrides = LabelAnnotationConfig::new(
            BTreeMap::from([("tier".to_owned(), "core".to_owned())]),
            BTreeMap::from([("owner".to_owned(), "b".to_owned())]),
        );

        let merged = base.merge(overrides);

        assert_eq!(merged.labels().get("tier").unwrap(), "core");
        assert_eq!(merged.labels().get("team").unwrap(), "a");
        assert_eq!(merged.annotations().get("owner").unwrap(), "b");
    }

    #[test]
    fn builtin_set_is_not_empty() {
        let config = LabelAnnotationConfig::builtin();
        assert!(!config.is_empty());
        assert_eq!(
            config.labels().keys().collect::<Vec<_>>(),
            vec!["air", "land", "sea"]
        );
    }
}

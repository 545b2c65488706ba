use serde_json::Value;
use std::collections::BTreeMap;

/// `labels` and `annotations` of an object metadata stanza.
///
/// `None` means the field is missing (or `null`), which is different from a
/// present but empty map: only the former needs its parent created before
/// members can be added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataView {
    pub labels: Option<BTreeMap<String, String>>,
    pub annotations: Option<BTreeMap<String, String>>,
}

impl MetadataView {
    fn from_metadata(metadata: Option<&Value>) -> Self {
        MetadataView {
            labels: string_map(metadata.and_then(|m| m.get("labels"))),
            annotations: string_map(metadata.and_then(|m| m.get("annotations"))),
        }
    }
}

/// Projection of the object under review that drives the patch decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetObjectView {
    pub metadata: MetadataView,
    /// Metadata of `spec.template`, set only when the object carries a pod
    /// template stanza with a metadata section.
    pub template_metadata: Option<MetadataView>,
}

impl TargetObjectView {
    /// Builds the view, looking into `spec.template.metadata` too.
    pub fn from_object(object: &Value) -> Self {
        let template_metadata = object
            .pointer("/spec/template/metadata")
            .filter(|m| !m.is_null())
            .map(|m| MetadataView::from_metadata(Some(m)));

        TargetObjectView {
            metadata: MetadataView::from_metadata(object.get("metadata")),
            template_metadata,
        }
    }

    /// Builds the view out of the top level metadata only.
    pub fn metadata_only(object: &Value) -> Self {
        TargetObjectView {
            metadata: MetadataView::from_metadata(object.get("metadata")),
            template_metadata: None,
        }
    }

    /// True when the object is a workload controller carrying pod template
    /// labels, the signal used to propagate labels into the template.
    pub fn has_template_labels(&self) -> bool {
        self.template_metadata
            .as_ref()
            .is_some_and(|m| m.labels.is_some())
    }
}

// Anything that is not an object is still reported as present: a parent
// creation op would clobber it.
fn string_map(value: Option<&Value>) -> Option<BTreeMap<String, String>> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(
            map.iter()
                .map(|(k, v)| {
                    let v = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Some(_) => Some(BTreeMap::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_and_empty_are_distinct() {
        let absent = TargetObjectView::from_object(&json!({"metadata": {}}));
        assert_eq!(absent.metadata.labels, None);
        assert_eq!(absent.metadata.annotations, None);

        let empty = TargetObjectView::from_object(&json!({
            "metadata": {"labels": {}, "annotations": {}}
        }));
        assert_eq!(empty.metadata.labels, Some(BTreeMap::new()));
        assert_eq!(empty.metadata.annotations, Some(BTreeMap::new()));
    }

    #[test]
    fn null_is_absent() {
        let view = TargetObjectView::from_object(&json!({
            "metadata": {"labels": null, "annotations": null}
        }));
        assert_eq!(view.metadata, MetadataView::default());
    }

    #[test]
    fn existing_entries_are_collected() {
        let view = TargetObjectView::from_object(&json!({
            "metadata": {"labels": {"app": "nginx", "replicas": 3}}
        }));
        let labels = view.metadata.labels.unwrap();
        assert_eq!(labels.get("app").unwrap(), "nginx");
        assert_eq!(labels.get("replicas").unwrap(), "3");
    }

    #[test]
    fn template_detection() {
        let deployment = json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "web"},
            "spec": {
                "selector": {"matchLabels": {"app": "web"}},
                "template": {"metadata": {"labels": {"app": "web"}}}
            }
        });
        let view = TargetObjectView::from_object(&deployment);
        assert!(view.has_template_labels());
        let template = view.template_metadata.unwrap();
        assert!(template.annotations.is_none());

        let metadata_only = TargetObjectView::metadata_only(&deployment);
        assert!(!metadata_only.has_template_labels());
    }

    #[test]
    fn template_without_labels_is_not_a_workload() {
        let view = TargetObjectView::from_object(&json!({
            "metadata": {},
            "spec": {"template": {"metadata": {"annotations": {"a": "b"}}}}
        }));
        assert!(view.template_metadata.is_some());
        assert!(!view.has_template_labels());
    }

    #[test]
    fn object_without_spec() {
        let view = TargetObjectView::from_object(&json!({
            "kind": "ConfigMap",
            "metadata": {"name": "cm"},
            "data": {"key": "value"}
        }));
        assert!(view.template_metadata.is_none());
    }
}

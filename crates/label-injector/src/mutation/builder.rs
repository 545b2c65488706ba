use std::collections::BTreeMap;

use super::metadata::LabelAnnotationConfig;
use json_patch::jsonptr::PointerBuf;

use super::patch::{add_empty_map, add_string, Patch};
use super::target::TargetObjectView;

/// Builds the ordered list of `add` operations injecting the configured
/// labels and annotations into the object described by `view`.
///
/// Existing keys that are not configured are never touched. Configured keys
/// are written with `add`, which overwrites an existing member, so applying
/// the patch a second time leaves the object unchanged.
///
/// When `spec.template.metadata.labels` is present the labels are also
/// added to the pod template and to `spec.selector.matchLabels`, keeping
/// the controller able to select its own pods.
pub fn build(view: &TargetObjectView, config: &LabelAnnotationConfig) -> Patch {
    let mut patch = Patch::new();
    if config.is_empty() {
        return patch;
    }

    create_parent(
        &mut patch,
        &["metadata", "labels"],
        view.metadata.labels.is_some(),
        config.labels(),
    );
    create_parent(
        &mut patch,
        &["metadata", "annotations"],
        view.metadata.annotations.is_some(),
        config.annotations(),
    );
    add_members(&mut patch, &["metadata", "labels"], config.labels());
    add_members(&mut patch, &["metadata", "annotations"], config.annotations());

    if !view.has_template_labels() {
        return patch;
    }
    let template_annotations_present = view
        .template_metadata
        .as_ref()
        .is_some_and(|template| template.annotations.is_some());

    for (key, value) in config.labels() {
        patch.push(add_string(
            PointerBuf::from_tokens(["spec", "template", "metadata", "labels", key.as_str()]),
            value,
        ));
        patch.push(add_string(
            PointerBuf::from_tokens(["spec", "selector", "matchLabels", key.as_str()]),
            value,
        ));
    }

    create_parent(
        &mut patch,
        &["spec", "template", "metadata", "annotations"],
        template_annotations_present,
        config.annotations(),
    );
    add_members(
        &mut patch,
        &["spec", "template", "metadata", "annotations"],
        config.annotations(),
    );

    patch
}

/// Emits `add <parent> = {}` when the object lacks the map and there is
/// at least one entry to put in it.
fn create_parent(
    patch: &mut Patch,
    parent: &[&str],
    parent_present: bool,
    entries: &BTreeMap<String, String>,
) {
    if !parent_present && !entries.is_empty() {
        patch.push(add_empty_map(PointerBuf::from_tokens(parent.iter().copied())));
    }
}

fn add_members(patch: &mut Patch, parent: &[&str], entries: &BTreeMap<String, String>) {
    for (key, value) in entries {
        let path = PointerBuf::from_tokens(parent.iter().copied().chain([key.as_str()]));
        patch.push(add_string(path, value));
    }
}

use json_patch::{jsonptr::PointerBuf, AddOperation, PatchOperation};
use serde::{Deserialize, Serialize};

/// Ordered list of JSON Patch operations. The order matters: parents must
/// be created before any of their members are added.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Patch(pub json_patch::Patch);

impl Patch {
    pub fn new() -> Self {
        Patch::default()
    }

    pub fn push(&mut self, operation: PatchOperation) {
        self.0 .0.push(operation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn operations(&self) -> &[PatchOperation] {
        &self.0
    }

    /// Index of the first operation targeting exactly `path`
    pub fn position(&self, path: &str) -> Option<usize> {
        self.0.iter().position(|op| op.path().as_str() == path)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<Patch> for json_patch::Patch {
    fn from(patch: Patch) -> Self {
        patch.0
    }
}

/// `add` of a string value
pub fn add_string(path: PointerBuf, value: &str) -> PatchOperation {
    PatchOperation::Add(AddOperation {
        path,
        value: serde_json::Value::String(value.to_owned()),
    })
}

/// `add` of an empty object, used to create a missing parent map
pub fn add_empty_map(path: PointerBuf) -> PatchOperation {
    PatchOperation::Add(AddOperation {
        path,
        value: serde_json::Value::Object(serde_json::Map::new()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_patch::RemoveOperation;
    use serde_json::json;

    #[test]
    fn operations_serialize_with_op_tag() {
        let mut patch = Patch::new();
        patch.push(add_empty_map(PointerBuf::from_tokens(["metadata", "labels"])));
        patch.push(add_string(
            PointerBuf::from_tokens(["metadata", "labels", "app.kubernetes.io/name"]),
            "web",
        ));
        patch.push(PatchOperation::Remove(RemoveOperation {
            path: PointerBuf::from_tokens(["metadata", "labels", "old"]),
        }));

        let serialized: serde_json::Value =
            serde_json::from_str(&patch.to_json().unwrap()).unwrap();
        assert_eq!(
            serialized,
            json!([
                {"op": "add", "path": "/metadata/labels", "value": {}},
                {"op": "add", "path": "/metadata/labels/app.kubernetes.io~1name", "value": "web"},
                {"op": "remove", "path": "/metadata/labels/old"},
            ])
        );
    }

    #[test]
    fn position_finds_first_match() {
        let mut patch = Patch::new();
        patch.push(add_string(PointerBuf::from_tokens(["a"]), "1"));
        patch.push(add_string(PointerBuf::from_tokens(["b"]), "2"));
        patch.push(add_string(PointerBuf::from_tokens(["a"]), "3"));

        assert_eq!(patch.position("/a"), Some(0));
        assert_eq!(patch.position("/b"), Some(1));
        assert_eq!(patch.position("/c"), None);
    }

    #[test]
    fn converts_into_json_patch() {
        let mut patch = Patch::new();
        patch.push(add_string(
            PointerBuf::from_tokens(["metadata", "labels", "tier"]),
            "edge",
        ));

        let mut object = json!({"metadata": {"labels": {}}});
        json_patch::patch(&mut object, &json_patch::Patch::from(patch)).unwrap();
        assert_eq!(object, json!({"metadata": {"labels": {"tier": "edge"}}}));
    }
}

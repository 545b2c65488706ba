use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::builder;
use super::metadata::LabelAnnotationConfig;
use super::patch::Patch;
use super::target::TargetObjectView;

/// How objects of a given resource are inspected and patched.
pub trait MutationStrategy: Send + Sync {
    /// Name used in log messages
    fn name(&self) -> &'static str;

    /// Projects the object under review
    fn view(&self, object: &Value) -> TargetObjectView;

    fn build(&self, view: &TargetObjectView, config: &LabelAnnotationConfig) -> Patch {
        builder::build(view, config)
    }
}

/// Patches the object metadata and, for workload controllers, the pod
/// template and the selector.
///
/// Every object with template labels gets `spec.selector.matchLabels`
/// entries. Kinds whose selector is optional or generated, such as `jobs`,
/// need a strategy of their own registered in the [`StrategyRegistry`]:
/// without a `spec.selector` stanza the patch does not apply.
pub struct TemplateAware;

impl MutationStrategy for TemplateAware {
    fn name(&self) -> &'static str {
        "template-aware"
    }

    fn view(&self, object: &Value) -> TargetObjectView {
        TargetObjectView::from_object(object)
    }
}

/// Patches the object metadata only.
pub struct MetadataOnly;

impl MutationStrategy for MetadataOnly {
    fn name(&self) -> &'static str {
        "metadata-only"
    }

    fn view(&self, object: &Value) -> TargetObjectView {
        TargetObjectView::metadata_only(object)
    }
}

/// Resource name (`pods`, `deployments`, ...) to strategy table.
///
/// Resources without an entry are handled by the fallback strategy.
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn MutationStrategy>>,
    fallback: Arc<dyn MutationStrategy>,
}

impl StrategyRegistry {
    pub fn new(fallback: Arc<dyn MutationStrategy>) -> Self {
        StrategyRegistry {
            strategies: HashMap::new(),
            fallback,
        }
    }

    /// Registers `strategy` for `resource`, replacing any previous entry.
    pub fn register(
        mut self,
        resource: impl Into<String>,
        strategy: Arc<dyn MutationStrategy>,
    ) -> Self {
        self.strategies.insert(resource.into(), strategy);
        self
    }

    pub fn lookup(&self, resource: &str) -> &dyn MutationStrategy {
        self.strategies
            .get(resource)
            .unwrap_or(&self.fallback)
            .as_ref()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let metadata_only: Arc<dyn MutationStrategy> = Arc::new(MetadataOnly);

        StrategyRegistry::new(Arc::new(TemplateAware))
            .register("pods", metadata_only.clone())
            .register("configmaps", metadata_only)
    }
}

use crate::mutation::{LabelAnnotationConfig, PrincipalMatcher, StrategyRegistry};

/// Shared, read-only state of the API handlers
pub(crate) struct ApiServerState {
    pub(crate) metadata: LabelAnnotationConfig,
    pub(crate) principal_matcher: Box<dyn PrincipalMatcher>,
    pub(crate) strategies: StrategyRegistry,
}

//! Mutation decision and JSON patch construction.
//!
//! Everything in here is free of I/O: the HTTP layer decodes the admission
//! review, asks [`decide`] whether the requester should be left alone, then
//! looks up the [`MutationStrategy`] registered for the resource to turn the
//! object into a [`Patch`].

pub mod builder;
pub mod decision;
pub mod metadata;
pub mod patch;
pub mod strategy;
pub mod target;

pub use builder::build;
pub use decision::{
    decide, AllowlistMatcher, MutationDecision, PrincipalMatcher, RegexMatcher, SubstringMatcher,
};
pub use metadata::LabelAnnotationConfig;
pub use json_patch::PatchOperation;
pub use patch::{add_empty_map, add_string, Patch};
pub use strategy::{MetadataOnly, MutationStrategy, StrategyRegistry, TemplateAware};
pub use target::{MetadataView, TargetObjectView};

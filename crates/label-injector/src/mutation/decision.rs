use regex::RegexSet;
use std::collections::BTreeSet;
use std::fmt;

/// Marker looked for by the default matcher
pub const DEFAULT_SYSTEM_PRINCIPAL_MARKER: &str = "system";

/// What to do with an admission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationDecision {
    /// Allow the object unchanged
    Bypass,
    /// Build and return a patch
    Mutate,
}

impl fmt::Display for MutationDecision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MutationDecision::Bypass => write!(f, "bypass"),
            MutationDecision::Mutate => write!(f, "mutate"),
        }
    }
}

/// Tells whether a requester is an internal platform principal.
///
/// Requests made by those principals (e.g. the replicaset controller
/// creating pods that already inherited their labels) are never mutated.
pub trait PrincipalMatcher: Send + Sync + fmt::Debug {
    fn is_system_principal(&self, identity: &str) -> bool;
}

/// Matches every identity containing one of the markers.
///
/// This is a heuristic: a user called `systemov` is treated as a system
/// principal too.
#[derive(Debug, Clone)]
pub struct SubstringMatcher {
    markers: Vec<String>,
}

impl SubstringMatcher {
    pub fn new(markers: Vec<String>) -> Self {
        SubstringMatcher { markers }
    }
}

impl Default for SubstringMatcher {
    fn default() -> Self {
        SubstringMatcher::new(vec![DEFAULT_SYSTEM_PRINCIPAL_MARKER.to_owned()])
    }
}

impl PrincipalMatcher for SubstringMatcher {
    fn is_system_principal(&self, identity: &str) -> bool {
        self.markers
            .iter()
            .any(|marker| identity.contains(marker.as_str()))
    }
}

/// Matches only the listed identities, compared verbatim.
#[derive(Debug, Clone)]
pub struct AllowlistMatcher {
    identities: BTreeSet<String>,
}

impl AllowlistMatcher {
    pub fn new<I: IntoIterator<Item = String>>(identities: I) -> Self {
        AllowlistMatcher {
            identities: identities.into_iter().collect(),
        }
    }
}

impl PrincipalMatcher for AllowlistMatcher {
    fn is_system_principal(&self, identity: &str) -> bool {
        self.identities.contains(identity)
    }
}

/// Matches identities against a set of regular expressions.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    patterns: RegexSet,
}

impl RegexMatcher {
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(RegexMatcher {
            patterns: RegexSet::new(patterns)?,
        })
    }
}

impl PrincipalMatcher for RegexMatcher {
    fn is_system_principal(&self, identity: &str) -> bool {
        self.patterns.is_match(identity)
    }
}

pub fn decide(matcher: &dyn PrincipalMatcher, identity: &str) -> MutationDecision {
    if matcher.is_system_principal(identity) {
        MutationDecision::Bypass
    } else {
        MutationDecision::Mutate
    }
}

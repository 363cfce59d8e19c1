use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Permission level granted for one project. Levels are matched exactly
/// per operation; holding `admin` does not imply `write` or `read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessTier {
    Read,
    Write,
    Admin,
}

impl AccessTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessTier::Read => "read",
            AccessTier::Write => "write",
            AccessTier::Admin => "admin",
        }
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `prj` claim of an access token: project id to granted tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectClaims(pub BTreeMap<i64, AccessTier>);

impl ProjectClaims {
    pub fn granted(&self, project_id: i64) -> Option<AccessTier> {
        self.0.get(&project_id).copied()
    }

    pub fn project_ids(&self) -> Vec<i64> {
        self.0.keys().copied().collect()
    }
}

impl FromIterator<(i64, AccessTier)> for ProjectClaims {
    fn from_iter<I: IntoIterator<Item = (i64, AccessTier)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Payload of a verified access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub prj: ProjectClaims,
    /// Expiration (Unix timestamp), enforced during verification.
    pub exp: i64,
}

/// Outcome of bearer-token extraction for one request. A missing or
/// unverifiable token yields `Anonymous` with an empty claim set.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthContext {
    Anonymous,
    Authenticated(ProjectClaims),
}

impl AuthContext {
    pub fn claims(&self) -> Option<&ProjectClaims> {
        match self {
            AuthContext::Anonymous => None,
            AuthContext::Authenticated(claims) => Some(claims),
        }
    }

    /// Projects whose records the caller may see, at any tier. Empty for
    /// anonymous callers, who still see public records.
    pub fn visible_projects(&self) -> Vec<i64> {
        self.claims().map(ProjectClaims::project_ids).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prj_claim_deserializes_from_string_keys() {
        // JSON object keys are always strings; the map still keys by i64.
        let claims: ProjectClaims = serde_json::from_str(r#"{"4": "write", "7": "admin"}"#).unwrap();
        assert_eq!(claims.granted(4), Some(AccessTier::Write));
        assert_eq!(claims.granted(7), Some(AccessTier::Admin));
        assert_eq!(claims.granted(5), None);
        assert_eq!(claims.project_ids(), vec![4, 7]);
    }

    #[test]
    fn unknown_tier_is_rejected() {
        let result = serde_json::from_str::<ProjectClaims>(r#"{"4": "owner"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn tier_displays_lowercase() {
        assert_eq!(AccessTier::Read.to_string(), "read");
        assert_eq!(AccessTier::Write.to_string(), "write");
        assert_eq!(AccessTier::Admin.to_string(), "admin");
    }

    #[test]
    fn anonymous_context_sees_no_projects() {
        assert!(AuthContext::Anonymous.visible_projects().is_empty());
        assert!(AuthContext::Anonymous.claims().is_none());
    }

    #[test]
    fn authenticated_context_exposes_claims() {
        let claims: ProjectClaims = [(4, AccessTier::Read)].into_iter().collect();
        let context = AuthContext::Authenticated(claims);
        assert_eq!(context.visible_projects(), vec![4]);
    }
}

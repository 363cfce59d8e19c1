use thiserror::Error;

use crate::model::{AccessTier, AuthContext, ProjectClaims};

/// Denial outcome of a policy check. `Unauthenticated` means no usable
/// token was presented; `Forbidden` means the verified claim set does not
/// carry the required tier for the target project.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("authentication required")]
    Unauthenticated,
    #[error("no '{tier}' claim for {}", project_label(.project))]
    Forbidden {
        project: Option<i64>,
        tier: AccessTier,
    },
}

fn project_label(project: &Option<i64>) -> String {
    match project {
        Some(id) => format!("project {id}"),
        None => "a public record".to_string(),
    }
}

/// Require a verified token, with no particular project claim.
pub fn require_authenticated(auth: &AuthContext) -> Result<&ProjectClaims, AccessDenied> {
    auth.claims().ok_or(AccessDenied::Unauthenticated)
}

/// Enforce that the caller holds exactly `tier` for `project`.
///
/// Tiers are matched exactly, not hierarchically. Claim sets are keyed by
/// project id, so a requirement against a public record (`project` is
/// null) always denies.
pub fn require_project_claim(
    auth: &AuthContext,
    project: Option<i64>,
    tier: AccessTier,
) -> Result<(), AccessDenied> {
    let claims = require_authenticated(auth)?;
    let granted = project.and_then(|id| claims.granted(id));
    match granted {
        Some(held) if held == tier => Ok(()),
        _ => Err(AccessDenied::Forbidden { project, tier }),
    }
}

/// Visibility rule for read paths: public records plus any record whose
/// project appears in the claim set, at any tier.
pub fn can_view(auth: &AuthContext, project: Option<i64>) -> bool {
    match project {
        None => true,
        Some(id) => auth
            .claims()
            .map_or(false, |claims| claims.granted(id).is_some()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(grants: &[(i64, AccessTier)]) -> AuthContext {
        AuthContext::Authenticated(grants.iter().copied().collect())
    }

    #[test]
    fn anonymous_callers_are_unauthenticated() {
        let denied =
            require_project_claim(&AuthContext::Anonymous, Some(4), AccessTier::Write).unwrap_err();
        assert_eq!(denied, AccessDenied::Unauthenticated);
        assert!(require_authenticated(&AuthContext::Anonymous).is_err());
    }

    #[test]
    fn matching_claim_is_allowed() {
        let auth = context(&[(4, AccessTier::Write)]);
        assert!(require_project_claim(&auth, Some(4), AccessTier::Write).is_ok());
    }

    #[test]
    fn missing_project_is_forbidden() {
        let auth = context(&[(4, AccessTier::Write)]);
        let denied = require_project_claim(&auth, Some(5), AccessTier::Write).unwrap_err();
        assert_eq!(
            denied,
            AccessDenied::Forbidden {
                project: Some(5),
                tier: AccessTier::Write,
            }
        );
    }

    #[test]
    fn tiers_match_exactly() {
        // Neither a lower nor a higher grant satisfies the requirement.
        let auth = context(&[(4, AccessTier::Admin)]);
        assert!(require_project_claim(&auth, Some(4), AccessTier::Write).is_err());
        let auth = context(&[(4, AccessTier::Read)]);
        assert!(require_project_claim(&auth, Some(4), AccessTier::Write).is_err());
        let auth = context(&[(4, AccessTier::Admin)]);
        assert!(require_project_claim(&auth, Some(4), AccessTier::Admin).is_ok());
    }

    #[test]
    fn public_records_cannot_be_claimed() {
        let auth = context(&[(4, AccessTier::Admin)]);
        let denied = require_project_claim(&auth, None, AccessTier::Admin).unwrap_err();
        assert_eq!(
            denied,
            AccessDenied::Forbidden {
                project: None,
                tier: AccessTier::Admin,
            }
        );
    }

    #[test]
    fn visibility_covers_public_and_claimed_projects() {
        let auth = context(&[(4, AccessTier::Read)]);
        assert!(can_view(&auth, None));
        assert!(can_view(&auth, Some(4)));
        assert!(!can_view(&auth, Some(5)));
        assert!(can_view(&AuthContext::Anonymous, None));
        assert!(!can_view(&AuthContext::Anonymous, Some(4)));
    }

    #[test]
    fn denial_messages_name_the_target() {
        let denied = AccessDenied::Forbidden {
            project: Some(4),
            tier: AccessTier::Admin,
        };
        assert_eq!(denied.to_string(), "no 'admin' claim for project 4");
        let denied = AccessDenied::Forbidden {
            project: None,
            tier: AccessTier::Write,
        };
        assert_eq!(denied.to_string(), "no 'write' claim for a public record");
    }
}

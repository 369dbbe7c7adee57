use serde::{Deserialize, Serialize};

/// Authorization state of the host calendar subsystem for event access.
///
/// `NotDetermined` moves to `Authorized` or `Denied` exactly once, when the
/// user answers the permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    Authorized,
    Denied,
    NotDetermined,
    /// Access blocked by policy (parental controls, device management).
    Restricted,
}

/// What the authorization gate has to do for a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Deny,
    Prompt,
}

impl AuthorizationStatus {
    /// Maps the status to the gate's next step.
    pub fn decision(self) -> GateDecision {
        match self {
            AuthorizationStatus::Authorized => GateDecision::Allow,
            AuthorizationStatus::NotDetermined => GateDecision::Prompt,
            AuthorizationStatus::Denied | AuthorizationStatus::Restricted => GateDecision::Deny,
        }
    }

    /// Returns true if calendar data may be read and written.
    pub fn is_authorized(self) -> bool {
        matches!(self, AuthorizationStatus::Authorized)
    }
}

impl std::fmt::Display for AuthorizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authorized => write!(f, "authorized"),
            Self::Denied => write!(f, "denied"),
            Self::NotDetermined => write!(f, "not_determined"),
            Self::Restricted => write!(f, "restricted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_per_status() {
        assert_eq!(AuthorizationStatus::Authorized.decision(), GateDecision::Allow);
        assert_eq!(AuthorizationStatus::Denied.decision(), GateDecision::Deny);
        assert_eq!(AuthorizationStatus::Restricted.decision(), GateDecision::Deny);
        assert_eq!(
            AuthorizationStatus::NotDetermined.decision(),
            GateDecision::Prompt
        );
    }

    #[test]
    fn test_only_authorized_is_authorized() {
        assert!(AuthorizationStatus::Authorized.is_authorized());
        assert!(!AuthorizationStatus::Denied.is_authorized());
        assert!(!AuthorizationStatus::NotDetermined.is_authorized());
        assert!(!AuthorizationStatus::Restricted.is_authorized());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&AuthorizationStatus::NotDetermined).unwrap();
        assert_eq!(json, "\"not_determined\"");
    }
}

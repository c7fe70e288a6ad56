//! Access scope — the permissiveness level of a grant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DmsError;

/// How far a grant reaches, totally ordered by permissiveness:
/// `None < Own < Team < All`. The ordering is the basis of conflict
/// resolution when multiple role grants apply to the same resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessScope {
    /// No access.
    None,
    /// Access limited to records the actor owns.
    Own,
    /// Access limited to the actor's team (membership resolution is not
    /// implemented; `Team` currently denies ownership checks).
    Team,
    /// Unrestricted access.
    All,
}

impl AccessScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessScope::None => "none",
            AccessScope::Own => "own",
            AccessScope::Team => "team",
            AccessScope::All => "all",
        }
    }
}

impl fmt::Display for AccessScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessScope {
    type Err = DmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(AccessScope::None),
            "own" => Ok(AccessScope::Own),
            "team" => Ok(AccessScope::Team),
            "all" => Ok(AccessScope::All),
            other => Err(DmsError::validation(format!("invalid scope: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_by_permissiveness() {
        assert!(AccessScope::None < AccessScope::Own);
        assert!(AccessScope::Own < AccessScope::Team);
        assert!(AccessScope::Team < AccessScope::All);
    }

    #[test]
    fn round_trips_through_str() {
        for scope in [
            AccessScope::None,
            AccessScope::Own,
            AccessScope::Team,
            AccessScope::All,
        ] {
            assert_eq!(scope.as_str().parse::<AccessScope>().unwrap(), scope);
        }
    }

    #[test]
    fn unknown_scope_rejected() {
        assert!("everything".parse::<AccessScope>().is_err());
    }
}

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root operation types whose resolvers are managed.
///
/// Only these types are listed when snapshotting remote state, so only
/// resolvers on these types can ever be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RootType {
    Query,
    Mutation,
}

impl RootType {
    /// Every managed root type, in listing order.
    pub const ALL: [RootType; 2] = [RootType::Query, RootType::Mutation];

    pub fn as_str(&self) -> &'static str {
        match self {
            RootType::Query => "Query",
            RootType::Mutation => "Mutation",
        }
    }

    /// Returns `true` if `type_name` names a managed root type.
    pub fn is_root(type_name: &str) -> bool {
        type_name.parse::<RootType>().is_ok()
    }
}

impl fmt::Display for RootType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RootType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Query" => Ok(RootType::Query),
            "Mutation" => Ok(RootType::Mutation),
            _ => Err(CoreError::invalid_field(
                "typeName",
                format!("Unsupported root type: {s}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_type_round_trip() {
        for root in RootType::ALL {
            assert_eq!(root.as_str().parse::<RootType>().unwrap(), root);
        }
    }

    #[test]
    fn test_subscription_is_not_managed() {
        assert!(!RootType::is_root("Subscription"));
        assert!(RootType::is_root("Mutation"));
        assert!("query".parse::<RootType>().is_err());
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed vocabulary of element roles that accept a runtime value.
///
/// Elements may carry any `type` string, but only these three are ever
/// replaced when an image is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Name,
    Birthdate,
    Quote,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Name, Role::Birthdate, Role::Quote];

    /// Exact, case-sensitive match against the stored `type` tag.
    pub fn parse(tag: &str) -> Option<Role> {
        match tag {
            "name" => Some(Role::Name),
            "birthdate" => Some(Role::Birthdate),
            "quote" => Some(Role::Quote),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Name => "name",
            Role::Birthdate => "birthdate",
            Role::Quote => "quote",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_role() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn unknown_and_differently_cased_tags_are_not_roles() {
        assert_eq!(Role::parse("greeting"), None);
        assert_eq!(Role::parse("Name"), None);
        assert_eq!(Role::parse(""), None);
    }
}

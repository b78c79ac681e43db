//! Account roles and capability sets.

use serde::{Deserialize, Serialize};

/// Error returned when a role string is not one of the known roles.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct RoleError(pub String);

/// Role an account registered with.
///
/// The wire spellings (`USER`, `seller`) match what the storefront
/// registration form has always sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// A shopping customer.
    #[default]
    #[serde(rename = "USER")]
    User,
    /// A merchant listing products.
    #[serde(rename = "seller")]
    Seller,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 2] = [Self::User, Self::Seller];

    /// Wire spelling of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Seller => "seller",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::User => 0b01,
            Self::Seller => 0b10,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" | "user" => Ok(Self::User),
            "seller" | "SELLER" => Ok(Self::Seller),
            _ => Err(RoleError(s.to_owned())),
        }
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Role {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

/// A set of roles allowed to use some capability.
///
/// The empty set is unrestricted: any authenticated identity is permitted.
///
/// ```
/// use estore_core::{Role, RoleSet};
///
/// let sellers = RoleSet::of(&[Role::Seller]);
/// assert!(sellers.permits(Role::Seller));
/// assert!(!sellers.permits(Role::User));
/// assert!(RoleSet::ANY.permits(Role::User));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    /// No restriction beyond being authenticated.
    pub const ANY: Self = Self(0);

    /// Build a set from a slice of roles.
    #[must_use]
    pub const fn of(roles: &[Role]) -> Self {
        let mut bits = 0;
        let mut rest = roles;
        while let [first, tail @ ..] = rest {
            bits |= first.bit();
            rest = tail;
        }
        Self(bits)
    }

    /// Return a copy of this set that also contains `role`.
    #[must_use]
    pub const fn with(self, role: Role) -> Self {
        Self(self.0 | role.bit())
    }

    /// Whether the set places no role restriction.
    #[must_use]
    pub const fn is_unrestricted(self) -> bool {
        self.0 == 0
    }

    /// Whether an identity with `role` holds this capability.
    #[must_use]
    pub const fn permits(self, role: Role) -> bool {
        self.is_unrestricted() || self.0 & role.bit() != 0
    }

    /// Roles explicitly listed in the set.
    pub fn roles(self) -> impl Iterator<Item = Role> {
        Role::ALL
            .into_iter()
            .filter(move |role| self.0 & role.bit() != 0)
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        iter.into_iter().fold(Self::ANY, Self::with)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_spelling() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
        assert_eq!(serde_json::to_string(&Role::Seller).unwrap(), "\"seller\"");
        let role: Role = serde_json::from_str("\"seller\"").unwrap();
        assert_eq!(role, Role::Seller);
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
        assert_eq!("admin".parse::<Role>(), Err(RoleError("admin".into())));
    }

    #[test]
    fn test_role_from_str_is_lenient_on_case() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("SELLER".parse::<Role>().unwrap(), Role::Seller);
    }

    #[test]
    fn test_role_set_permits() {
        let both = RoleSet::of(&[Role::User, Role::Seller]);
        assert!(both.permits(Role::User));
        assert!(both.permits(Role::Seller));

        let users = RoleSet::ANY.with(Role::User);
        assert!(users.permits(Role::User));
        assert!(!users.permits(Role::Seller));
    }

    #[test]
    fn test_empty_role_set_is_unrestricted() {
        assert!(RoleSet::ANY.is_unrestricted());
        assert!(Role::ALL.iter().all(|r| RoleSet::ANY.permits(*r)));
        assert_eq!(RoleSet::ANY.roles().count(), 0);
    }

    #[test]
    fn test_role_set_from_iter() {
        let set: RoleSet = [Role::Seller].into_iter().collect();
        assert_eq!(set.roles().collect::<Vec<_>>(), vec![Role::Seller]);
    }
}

//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create validated string ID wrappers that
//! prevent accidentally mixing IDs from different entity types.

/// Maximum length of any entity identifier.
pub const MAX_ID_LENGTH: usize = 64;

/// Errors that can occur when parsing an entity identifier.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The identifier is missing or blank.
    #[error("{kind} is required")]
    Empty {
        /// Wire name of the identifier (e.g. `userId`).
        kind: &'static str,
    },
    /// The identifier is longer than [`MAX_ID_LENGTH`].
    #[error("{kind} must be at most {max} characters")]
    TooLong {
        /// Wire name of the identifier.
        kind: &'static str,
        /// Maximum allowed length.
        max: usize,
    },
    /// The identifier contains a character outside `[A-Za-z0-9_-]`.
    #[error("{kind} contains invalid character {found:?}")]
    InvalidCharacter {
        /// Wire name of the identifier.
        kind: &'static str,
        /// The offending character.
        found: char,
    },
}

/// Validate a raw identifier, returning the trimmed form.
///
/// # Errors
///
/// Returns an [`IdError`] if the input is blank, too long, or contains
/// characters other than ASCII alphanumerics, `-` and `_`.
pub fn validate_id<'a>(kind: &'static str, raw: &'a str) -> Result<&'a str, IdError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty { kind });
    }
    if trimmed.len() > MAX_ID_LENGTH {
        return Err(IdError::TooLong {
            kind,
            max: MAX_ID_LENGTH,
        });
    }
    if let Some(found) = trimmed
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(IdError::InvalidCharacter { kind, found });
    }
    Ok(trimmed)
}

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` (deserialization validates the value)
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Display`
/// - `parse()` and `parse_optional()` constructors plus `as_str()`
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use estore_core::define_id;
/// define_id!(OrderId, "orderId");
///
/// let order_id = OrderId::parse("ord_42").unwrap();
/// assert_eq!(order_id.as_str(), "ord_42");
/// assert!(OrderId::parse("  ").is_err());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $kind:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wire name used in validation messages.
            pub const KIND: &'static str = $kind;

            /// Parse and validate an identifier.
            ///
            /// # Errors
            ///
            /// Returns an [`IdError`]($crate::IdError) if the value is blank,
            /// too long, or contains invalid characters.
            pub fn parse(raw: &str) -> ::core::result::Result<Self, $crate::IdError> {
                $crate::validate_id(Self::KIND, raw).map(|id| Self(id.to_owned()))
            }

            /// Parse an identifier that may be absent from a request.
            ///
            /// # Errors
            ///
            /// Returns [`IdError::Empty`]($crate::IdError::Empty) when `raw` is `None`.
            pub fn parse_optional(
                raw: Option<&str>,
            ) -> ::core::result::Result<Self, $crate::IdError> {
                raw.map_or(Err($crate::IdError::Empty { kind: Self::KIND }), Self::parse)
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::IdError;

            fn try_from(value: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let raw = <String as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self::parse(&raw)?)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(UserId, "userId");
define_id!(ProductId, "productId");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = UserId::parse("  u1 ").unwrap();
        assert_eq!(id.as_str(), "u1");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(
            ProductId::parse("   "),
            Err(IdError::Empty { kind: "productId" })
        );
    }

    #[test]
    fn test_parse_optional_missing() {
        let err = UserId::parse_optional(None).unwrap_err();
        assert_eq!(err.to_string(), "userId is required");
    }

    #[test]
    fn test_parse_rejects_invalid_character() {
        assert!(matches!(
            ProductId::parse("p1/../etc"),
            Err(IdError::InvalidCharacter { found: '/', .. })
        ));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = "a".repeat(MAX_ID_LENGTH + 1);
        assert!(matches!(
            UserId::parse(&long),
            Err(IdError::TooLong { .. })
        ));
        assert!(UserId::parse(&"a".repeat(MAX_ID_LENGTH)).is_ok());
    }

    #[test]
    fn test_accepts_object_id_style() {
        assert!(ProductId::parse("65a1f0c2e4b0a1b2c3d4e5f6").is_ok());
        assert!(UserId::parse("user_01-HX").is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: ProductId = serde_json::from_str("\"p1\"").unwrap();
        assert_eq!(ok.to_string(), "p1");
        assert!(serde_json::from_str::<ProductId>("\"\"").is_err());
    }
}

//! Strongly-typed ID newtypes.
//!
//! Users and posts share the same UUID representation; wrapping them keeps a
//! post id from being passed where a user id is expected.
//!
//! ```ignore
//! use social_models::ids::{PostId, UserId};
//!
//! let author: UserId = "0b5c8a52-3f0e-4f0c-9d8f-6f1e3c1b2a10".parse()?;
//! let post = PostId::parse(raw_path_segment)?; // AppError::invalid_id() on garbage
//! ```

use serde::{Deserialize, Serialize};
use social_core::AppError;
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Generates a `Uuid` newtype with serde, sqlx and OpenAPI support.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
        #[serde(transparent)]
        #[schema(value_type = String, format = "uuid")]
        pub struct $name(pub Uuid);

        impl $name {
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[inline]
            pub const fn nil() -> Self {
                Self(Uuid::nil())
            }

            #[inline]
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            #[inline]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }

            /// Parses a path or token segment, failing with `invalid id`.
            pub fn parse(raw: &str) -> Result<Self, AppError> {
                raw.parse().map_err(|_| AppError::invalid_id())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::nil()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            #[inline]
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <Uuid as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <Uuid as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <Uuid as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <Uuid as Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        // `following` and `likes` are stored as uuid[]
        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <Uuid as PgHasArrayType>::array_type_info()
            }
        }
    };
}

define_id!(
    /// Identifier of a user account.
    UserId
);

define_id!(
    /// Identifier of a post.
    PostId
);

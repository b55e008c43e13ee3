//! Role and Feature values
//!
//! A `Role` grants permissions, a `Feature` grants product entitlements.
//! Both are plain identifiers (`^[a-z][a-z0-9_]{1,99}$`) compared by value,
//! and both come in immutable, duplicate-free sets (`Roles`, `Features`)
//! whose operations return new sets.
//!
//! Sets serialize as a JSON array of identifiers and validate on
//! deserialization, so a malformed name in a stored event fails replay.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::details;
use crate::usecase::UseCaseError;

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]{1,99}$").unwrap())
}

pub fn is_well_formed_name(name: &str) -> bool {
    name_pattern().is_match(name)
}

macro_rules! entitlement {
    (
        $(#[$item_meta:meta])*
        item $item:ident,
        $(#[$set_meta:meta])*
        set $set:ident,
        kind = $kind:literal,
        invalid_code = $invalid_code:literal,
        has = $has:ident,
        add_item = $add_item:ident $(,)?
    ) => {
        $(#[$item_meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $item(String);

        impl $item {
            /// Validate and wrap `name`.
            pub fn create(name: impl Into<String>) -> Result<Self, UseCaseError> {
                let name = name.into();
                if !is_well_formed_name(&name) {
                    return Err(UseCaseError::validation_with_details(
                        $invalid_code,
                        format!("'{}' is not a valid {} name", name, $kind),
                        details! { $kind => &name },
                    ));
                }
                Ok(Self(name))
            }

            /// Catalog names are constants checked by the catalog tests.
            pub(crate) fn from_static(name: &'static str) -> Self {
                Self(name.to_string())
            }

            pub fn name(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $item {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $item {
            type Error = UseCaseError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::create(value)
            }
        }

        impl From<$item> for String {
            fn from(value: $item) -> Self {
                value.0
            }
        }

        $(#[$set_meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(try_from = "Vec<String>", into = "Vec<String>")]
        pub struct $set(Vec<$item>);

        impl $set {
            pub fn empty() -> Self {
                Self(Vec::new())
            }

            /// Build from raw names; fails on the first malformed one.
            /// Duplicates collapse to one entry.
            pub fn from_names<I, S>(names: I) -> Result<Self, UseCaseError>
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                let mut set = Self::empty();
                for name in names {
                    set = set.$add_item($item::create(name)?);
                }
                Ok(set)
            }

            /// New set with `name` added; no-op when already present.
            pub fn add(&self, name: impl Into<String>) -> Result<Self, UseCaseError> {
                Ok(self.$add_item($item::create(name)?))
            }

            /// New set with `item` added; no-op when already present.
            pub fn $add_item(&self, item: $item) -> Self {
                let mut items = self.0.clone();
                if !items.contains(&item) {
                    items.push(item);
                }
                Self(items)
            }

            /// New set without `name`; no-op when absent.
            pub fn remove(&self, name: &str) -> Self {
                Self(self.0.iter().filter(|i| i.name() != name).cloned().collect())
            }

            pub fn $has(&self, name: &str) -> bool {
                self.0.iter().any(|i| i.name() == name)
            }

            pub fn has_any(&self) -> bool {
                !self.0.is_empty()
            }

            pub fn has_none(&self) -> bool {
                self.0.is_empty()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }

            /// Identifiers in insertion order.
            pub fn denormalize(&self) -> Vec<String> {
                self.0.iter().map(|i| i.name().to_string()).collect()
            }
        }

        impl TryFrom<Vec<String>> for $set {
            type Error = UseCaseError;

            fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
                Self::from_names(value)
            }
        }

        impl From<$set> for Vec<String> {
            fn from(value: $set) -> Self {
                value.denormalize()
            }
        }

        impl FromIterator<$item> for $set {
            fn from_iter<T: IntoIterator<Item = $item>>(iter: T) -> Self {
                iter.into_iter().fold(Self::empty(), |set, item| set.$add_item(item))
            }
        }

        impl<'a> IntoIterator for &'a $set {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

entitlement! {
    /// A named permission grant, platform-wide or per organization.
    item Role,
    /// Ordered, duplicate-free set of roles.
    set Roles,
    kind = "role",
    invalid_code = "INVALID_ROLE_NAME",
    has = has_role,
    add_item = add_role,
}

entitlement! {
    /// A named product entitlement, platform-wide or per organization.
    item Feature,
    /// Ordered, duplicate-free set of features.
    set Features,
    kind = "feature",
    invalid_code = "INVALID_FEATURE_NAME",
    has = has_feature,
    add_item = add_feature,
}

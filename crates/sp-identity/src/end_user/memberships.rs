//! Memberships collection
//!
//! The memberships of one end user, in insertion order. Collection rules:
//! a non-empty collection has exactly one default, and an organization
//! appears at most once.

use serde::Serialize;

use super::membership::Membership;
use crate::details;
use crate::usecase::UseCaseError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Memberships(Vec<Membership>);

impl Memberships {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Upsert by organization id: replaces an existing membership for the
    /// same organization, else appends.
    pub fn add(&mut self, membership: Membership) {
        self.0
            .retain(|m| m.organization_id != membership.organization_id);
        self.0.push(membership);
    }

    /// Silent no-op if absent.
    pub fn remove(&mut self, membership_id: &str) {
        self.0.retain(|m| m.id != membership_id);
    }

    pub fn find_by_membership_id(&self, membership_id: &str) -> Option<&Membership> {
        self.0.iter().find(|m| m.id == membership_id)
    }

    pub(crate) fn find_by_membership_id_mut(&mut self, membership_id: &str) -> Option<&mut Membership> {
        self.0.iter_mut().find(|m| m.id == membership_id)
    }

    pub fn find_by_organization_id(&self, organization_id: &str) -> Option<&Membership> {
        self.0.iter().find(|m| m.organization_id == organization_id)
    }

    pub fn default_membership(&self) -> Option<&Membership> {
        self.0.iter().find(|m| m.is_default)
    }

    /// Most recently created membership other than the current default.
    ///
    /// Ties on `created_at` keep insertion order. Callers must only ask when
    /// `len() > 1`; otherwise there is no candidate and this returns an
    /// `InvariantError`.
    pub fn find_next_default_membership(&self) -> Result<&Membership, UseCaseError> {
        let mut candidates: Vec<&Membership> = self.0.iter().filter(|m| !m.is_default).collect();
        // sort_by is stable
        candidates.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        candidates.into_iter().next().ok_or_else(|| {
            UseCaseError::invariant(
                "NO_NEXT_DEFAULT_MEMBERSHIP",
                format!(
                    "No membership can become the default; collection holds {}",
                    self.0.len()
                ),
            )
        })
    }

    pub fn ensure_invariants(&self) -> Result<(), UseCaseError> {
        for membership in &self.0 {
            membership.ensure_invariants()?;
        }

        if !self.0.is_empty() {
            let defaults = self.0.iter().filter(|m| m.is_default).count();
            if defaults != 1 {
                return Err(UseCaseError::business_rule_with_details(
                    "DEFAULT_MEMBERSHIP_COUNT",
                    format!("Expected exactly one default membership, found {}", defaults),
                    details! { "defaults" => defaults, "memberships" => self.0.len() },
                ));
            }
        }

        for (i, membership) in self.0.iter().enumerate() {
            if self.0[..i]
                .iter()
                .any(|m| m.organization_id == membership.organization_id)
            {
                return Err(UseCaseError::business_rule_with_details(
                    "DUPLICATE_ORGANIZATION_MEMBERSHIP",
                    format!(
                        "Organization '{}' appears in more than one membership",
                        membership.organization_id
                    ),
                    details! { "organizationId" => &membership.organization_id },
                ));
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Membership> {
        self.0.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Membership> {
        self.0.iter_mut()
    }
}

impl<'a> IntoIterator for &'a Memberships {
    type Item = &'a Membership;
    type IntoIter = std::slice::Iter<'a, Membership>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

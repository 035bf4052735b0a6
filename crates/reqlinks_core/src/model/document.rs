//! Root document aggregate.
//!
//! # Responsibility
//! - Hold every requirement, its link list and the last-selected pointer.
//! - Apply in-memory mutations that keep the aggregate invariants intact.
//!
//! # Invariants
//! - `requirements` is newest-first by insertion; create always prepends.
//! - `links_by_req` has an entry for every live requirement id; removing a
//!   requirement removes its entry. Entries for unknown ids are tolerated.
//! - Link URLs are unique within one requirement's list.
//! - `last_selected_requirement_id` is cleared when its target is removed.

use crate::model::link::{Link, LinkId};
use crate::model::requirement::{Requirement, RequirementId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The single persisted aggregate (one per installation).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub links_by_req: BTreeMap<RequirementId, Vec<Link>>,
    #[serde(default)]
    pub last_selected_requirement_id: Option<RequirementId>,
}

impl Document {
    pub fn requirement(&self, id: &RequirementId) -> Option<&Requirement> {
        self.requirements.iter().find(|requirement| &requirement.id == id)
    }

    pub fn requirement_mut(&mut self, id: &RequirementId) -> Option<&mut Requirement> {
        self.requirements
            .iter_mut()
            .find(|requirement| &requirement.id == id)
    }

    /// Links saved for `id`, newest first. Empty when none are stored.
    pub fn links_for(&self, id: &RequirementId) -> &[Link] {
        self.links_by_req
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn active_requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter().filter(|requirement| !requirement.archived)
    }

    pub fn archived_requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter().filter(|requirement| requirement.archived)
    }

    /// Prepends `requirement`, gives it an empty link list and selects it.
    pub fn insert_requirement(&mut self, requirement: Requirement) {
        self.links_by_req.insert(requirement.id.clone(), Vec::new());
        self.last_selected_requirement_id = Some(requirement.id.clone());
        self.requirements.insert(0, requirement);
    }

    /// Removes a requirement with its link list and clears a selection that
    /// pointed at it. Returns whether a requirement was removed.
    pub fn remove_requirement(&mut self, id: &RequirementId) -> bool {
        let before = self.requirements.len();
        self.requirements.retain(|requirement| &requirement.id != id);
        self.links_by_req.remove(id);
        if self.last_selected_requirement_id.as_ref() == Some(id) {
            self.last_selected_requirement_id = None;
        }
        self.requirements.len() != before
    }

    /// Prepends `link` to the list for `id` unless its URL is already saved.
    ///
    /// The list is created when missing, even if `id` names no requirement.
    /// Returns whether the link was inserted.
    pub fn push_link(&mut self, id: &RequirementId, link: Link) -> bool {
        let links = self.links_by_req.entry(id.clone()).or_default();
        if links.iter().any(|existing| existing.url == link.url) {
            return false;
        }
        links.insert(0, link);
        true
    }

    /// Removes `link_id` from the list for `id`. Returns whether it was found.
    ///
    /// A missing list stays missing.
    pub fn remove_link(&mut self, id: &RequirementId, link_id: &LinkId) -> bool {
        let Some(links) = self.links_by_req.get_mut(id) else {
            return false;
        };
        let before = links.len();
        links.retain(|link| &link.id != link_id);
        links.len() != before
    }
}

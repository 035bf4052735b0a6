use crate::model::link::{LinkId, NewLink};
use crate::model::requirement::{Priority, RequirementId};
use serde::{Deserialize, Serialize};

/// Every `type` discriminator the router answers.
pub const KNOWN_REQUEST_TYPES: &[&str] = &[
    "db:get",
    "req:create",
    "req:select",
    "req:rename",
    "req:archive",
    "req:unarchive",
    "req:setPriority",
    "req:delete",
    "link:add",
    "link:remove",
];

/// Closed set of requests accepted over the message channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "db:get")]
    GetDocument,
    #[serde(rename = "req:create")]
    CreateRequirement {
        #[serde(default)]
        title: Option<String>,
    },
    #[serde(rename = "req:select")]
    SelectRequirement { id: RequirementId },
    #[serde(rename = "req:rename")]
    RenameRequirement {
        id: RequirementId,
        #[serde(default)]
        title: Option<String>,
    },
    #[serde(rename = "req:archive")]
    ArchiveRequirement { id: RequirementId },
    #[serde(rename = "req:unarchive")]
    UnarchiveRequirement { id: RequirementId },
    #[serde(rename = "req:setPriority")]
    SetPriority {
        id: RequirementId,
        priority: Priority,
    },
    #[serde(rename = "req:delete")]
    DeleteRequirement { id: RequirementId },
    #[serde(rename = "link:add")]
    AddLink {
        id: RequirementId,
        #[serde(default)]
        link: NewLink,
    },
    #[serde(rename = "link:remove")]
    RemoveLink {
        id: RequirementId,
        #[serde(rename = "linkId")]
        link_id: LinkId,
    },
}

impl Request {
    /// Wire `type` of this request.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GetDocument => "db:get",
            Self::CreateRequirement { .. } => "req:create",
            Self::SelectRequirement { .. } => "req:select",
            Self::RenameRequirement { .. } => "req:rename",
            Self::ArchiveRequirement { .. } => "req:archive",
            Self::UnarchiveRequirement { .. } => "req:unarchive",
            Self::SetPriority { .. } => "req:setPriority",
            Self::DeleteRequirement { .. } => "req:delete",
            Self::AddLink { .. } => "link:add",
            Self::RemoveLink { .. } => "link:remove",
        }
    }
}

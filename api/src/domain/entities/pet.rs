//! Pet domain entity
//!
//! Pets carry an embedded category plus two mutable collections: photo URLs
//! and tags. Both collections are always present (possibly empty).

use serde::{Deserialize, Serialize};

use super::{Category, Tag};

/// Numeric identifier for a pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(pub i64);

impl From<i64> for PetId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pet status in the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    #[default]
    Available,
    Pending,
    Sold,
}

impl PetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetStatus::Available => "available",
            PetStatus::Pending => "pending",
            PetStatus::Sold => "sold",
        }
    }
}

impl std::fmt::Display for PetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(PetStatus::Available),
            "pending" => Ok(PetStatus::Pending),
            "sold" => Ok(PetStatus::Sold),
            _ => Err(format!("Unknown pet status: {}", s)),
        }
    }
}

/// A pet listed in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: PetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub name: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub status: PetStatus,
}

impl Pet {
    pub fn new(id: impl Into<PetId>, name: impl Into<String>, status: PetStatus) -> Self {
        Self {
            id: id.into(),
            category: None,
            name: name.into(),
            photo_urls: Vec::new(),
            tags: Vec::new(),
            status,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_photo_urls(mut self, photo_urls: Vec<String>) -> Self {
        self.photo_urls = photo_urls;
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Add a photo URL with set semantics. Returns false if it was already present.
    pub fn add_photo_url(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.photo_urls.contains(&url) {
            return false;
        }
        self.photo_urls.push(url);
        true
    }

    /// Remove every occurrence of `url`. No-op when absent.
    pub fn remove_photo_url(&mut self, url: &str) {
        self.photo_urls.retain(|u| u != url);
    }

    pub fn add_tag(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    /// Remove every tag sharing `tag_id`. No-op when none match.
    pub fn remove_tag(&mut self, tag_id: i64) {
        self.tags.retain(|t| t.id != tag_id);
    }
}

use serde::{Deserialize, Serialize};

/// Label attached to pets. Pets reference tags by `id` equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

impl Tag {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tag() {
        let tag = Tag::new(2, "best selling");
        assert_eq!(tag.id, 2);
        assert_eq!(tag.name, "best selling");
    }
}

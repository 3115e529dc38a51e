//! Catalog tile entries.

use crate::types::{Finish, TileCategory, TileId};

/// A catalog tile.
///
/// Surfaces never hold a copy of a tile, only its [`TileId`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Tile {
    pub id: TileId,
    pub name: String,
    pub category: TileCategory,
    /// Physical width in millimeters.
    pub width: u32,
    /// Physical height in millimeters.
    pub height: u32,
    pub finish: Finish,
    /// URL or path of the full-resolution image.
    pub image_url: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub thumbnail_url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub collection: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: Option<String>,
    /// Built-in stock tile rather than a user upload.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_preloaded: bool,
}

impl Tile {
    /// Create a tile with the required fields; optional fields are empty.
    pub fn new(
        id: impl Into<TileId>,
        name: impl Into<String>,
        category: TileCategory,
        width: u32,
        height: u32,
        finish: Finish,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            width,
            height,
            finish,
            image_url: image_url.into(),
            thumbnail_url: None,
            collection: None,
            color: None,
            is_preloaded: false,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    pub fn preloaded(mut self) -> Self {
        self.is_preloaded = true;
        self
    }

    /// Thumbnail reference, falling back to the full image.
    pub fn thumbnail(&self) -> &str {
        self.thumbnail_url.as_deref().unwrap_or(&self.image_url)
    }

    /// Material roughness implied by the finish.
    pub fn roughness(&self) -> f32 {
        self.finish.roughness()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_builder() {
        let tile = Tile::new("t1", "Marble", TileCategory::Floor, 600, 600, Finish::Glossy, "/img/t1.png")
            .with_collection("Marble")
            .preloaded();

        assert_eq!(tile.id.as_str(), "t1");
        assert_eq!(tile.collection.as_deref(), Some("Marble"));
        assert!(tile.is_preloaded);
        assert_eq!(tile.thumbnail(), "/img/t1.png");
        assert_eq!(tile.roughness(), 0.3);
    }
}

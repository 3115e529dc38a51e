//! Tile catalog.

use indexmap::IndexMap;

use showroom_core::{Tile, TileCategory, TileId};

/// Read access to the tiles a surface may be mapped to.
pub trait Catalog {
    /// All tiles, in catalog order.
    fn list_tiles(&self) -> Vec<&Tile>;

    /// Look up a tile by id.
    fn get_tile(&self, id: &str) -> Option<&Tile>;

    fn contains_tile(&self, id: &str) -> bool {
        self.get_tile(id).is_some()
    }
}

/// Criteria for [`TileCatalog::filter`]. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileFilter {
    pub category: Option<TileCategory>,
    pub collection: Option<String>,
}

impl TileFilter {
    pub fn category(category: TileCategory) -> Self {
        Self {
            category: Some(category),
            collection: None,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn matches(&self, tile: &Tile) -> bool {
        self.category.map_or(true, |c| tile.category == c)
            && self
                .collection
                .as_deref()
                .map_or(true, |c| tile.collection.as_deref() == Some(c))
    }
}

/// In-memory catalog keeping tiles in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TileCatalog {
    tiles: IndexMap<TileId, Tile>,
}

impl TileCatalog {
    pub fn new() -> Self {
        Self {
            tiles: IndexMap::new(),
        }
    }

    /// Insert a tile, replacing any tile with the same id. Returns the
    /// replaced tile.
    pub fn insert(&mut self, tile: Tile) -> Option<Tile> {
        self.tiles.insert(tile.id.clone(), tile)
    }

    /// Edit a tile in place. Returns `false` if the id is unknown.
    pub fn update(&mut self, id: &str, edit: impl FnOnce(&mut Tile)) -> bool {
        match self.tiles.get_mut(id) {
            Some(tile) => {
                let original = tile.id.clone();
                edit(tile);
                // The key and the tile must agree.
                tile.id = original;
                true
            }
            None => false,
        }
    }

    /// Remove a tile. Mappings that reference it become inert.
    pub fn remove(&mut self, id: &str) -> Option<Tile> {
        self.tiles.shift_remove(id)
    }

    pub fn filter<'a>(&'a self, filter: &'a TileFilter) -> impl Iterator<Item = &'a Tile> + 'a {
        self.tiles.values().filter(move |t| filter.matches(t))
    }

    /// Distinct collection names, in first-seen order.
    pub fn collections(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for name in self.tiles.values().filter_map(|t| t.collection.as_deref()) {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        seen
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl Catalog for TileCatalog {
    fn list_tiles(&self) -> Vec<&Tile> {
        self.tiles.values().collect()
    }

    fn get_tile(&self, id: &str) -> Option<&Tile> {
        self.tiles.get(id)
    }
}

impl FromIterator<Tile> for TileCatalog {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        let mut catalog = TileCatalog::new();
        for tile in iter {
            catalog.insert(tile);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showroom_core::Finish;

    fn sample() -> TileCatalog {
        [
            Tile::new("m1", "Carrara", TileCategory::Floor, 600, 600, Finish::Glossy, "/m1.png").with_collection("Marble"),
            Tile::new("w1", "Oak", TileCategory::Floor, 1200, 200, Finish::Matte, "/w1.png").with_collection("Wood"),
            Tile::new("c1", "Subway", TileCategory::Wall, 300, 150, Finish::Glossy, "/c1.png").with_collection("Ceramic"),
            Tile::new("m2", "Nero", TileCategory::Wall, 600, 300, Finish::Glossy, "/m2.png").with_collection("Marble"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_lookup_and_order() {
        let catalog = sample();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get_tile("w1").map(|t| t.width), Some(1200));
        assert!(catalog.get_tile("nope").is_none());

        let ids: Vec<_> = catalog.list_tiles().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["m1", "w1", "c1", "m2"]);
    }

    #[test]
    fn test_filter() {
        let catalog = sample();
        let walls = TileFilter::category(TileCategory::Wall);
        assert_eq!(catalog.filter(&walls).count(), 2);

        let marble_walls = walls.with_collection("Marble");
        let ids: Vec<_> = catalog.filter(&marble_walls).map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["m2"]);

        assert_eq!(catalog.filter(&TileFilter::default()).count(), 4);
    }

    #[test]
    fn test_collections_distinct() {
        assert_eq!(sample().collections(), ["Marble", "Wood", "Ceramic"]);
    }

    #[test]
    fn test_update_and_remove() {
        let mut catalog = sample();
        assert!(catalog.update("c1", |t| {
            t.name = "Subway White".into();
            t.id = TileId::from("hijack");
        }));
        let tile = catalog.get_tile("c1").unwrap();
        assert_eq!(tile.name, "Subway White");
        assert_eq!(tile.id.as_str(), "c1");
        assert!(!catalog.update("zzz", |_| {}));

        assert!(catalog.remove("c1").is_some());
        assert!(!catalog.contains_tile("c1"));
        assert_eq!(catalog.len(), 3);
    }
}

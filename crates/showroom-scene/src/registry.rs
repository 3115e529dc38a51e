//! Surface registry and selection state.
//!
//! [`SurfaceRegistry`] is the one state container of a showroom session:
//! the current room and its surfaces, the surface to mapping table, the
//! selected and hovered surfaces, and the user's current picks (active tile,
//! pattern, lighting, before view). Every effective mutation is announced to
//! subscribers as exactly one [`StateChange`]; writes that change nothing
//! announce nothing.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use showroom_core::{
    Design, DesignDraft, LightingPreset, Mapping, MeshMappings, Pattern, RoomType, SceneError, SurfaceDescriptor,
    SurfaceId, TileId,
};
use showroom_layout::{generate, SurfaceList};

use crate::catalog::{Catalog, TileCatalog};

/// Initial session settings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegistryOptions {
    pub room: RoomType,
    pub pattern: Pattern,
    pub lighting: LightingPreset,
}

impl RegistryOptions {
    pub fn with_room(mut self, room: RoomType) -> Self {
        self.room = room;
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_lighting(mut self, lighting: LightingPreset) -> Self {
        self.lighting = lighting;
        self
    }
}

/// A state mutation, as seen by subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    RoomChanged(RoomType),
    SelectionChanged(Option<SurfaceId>),
    HoverChanged(Option<SurfaceId>),
    /// One surface gained, replaced, or lost (`None`) its mapping.
    MappingChanged {
        surface: SurfaceId,
        mapping: Option<Mapping>,
    },
    MappingsReplaced,
    ActiveTileChanged(Option<TileId>),
    PatternChanged(Pattern),
    LightingChanged(LightingPreset),
    BeforeViewChanged(bool),
    Reset,
}

/// Handle returned by [`SurfaceRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Visual emphasis of a surface. Selection wins over hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    Hovered,
    Selected,
}

/// What a click on a surface did.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Selected(SurfaceId),
    Applied(SurfaceId),
}

type Subscriber = Box<dyn FnMut(&StateChange)>;

/// The session state container.
pub struct SurfaceRegistry<C: Catalog = TileCatalog> {
    catalog: C,
    room: RoomType,
    surfaces: SurfaceList,
    mappings: MeshMappings,
    selected: Option<SurfaceId>,
    hovered: Option<SurfaceId>,
    active_tile: Option<TileId>,
    pattern: Pattern,
    lighting: LightingPreset,
    show_before: bool,
    subscribers: IndexMap<SubscriptionId, Subscriber, FxBuildHasher>,
    next_subscription: u64,
}

impl<C: Catalog> SurfaceRegistry<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_options(catalog, RegistryOptions::default())
    }

    pub fn with_options(catalog: C, options: RegistryOptions) -> Self {
        Self {
            catalog,
            room: options.room,
            surfaces: generate(options.room),
            mappings: MeshMappings::new(),
            selected: None,
            hovered: None,
            active_tile: None,
            pattern: options.pattern,
            lighting: options.lighting,
            show_before: false,
            subscribers: IndexMap::default(),
            next_subscription: 0,
        }
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Register a listener called after every effective mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&StateChange) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.insert(id, Box::new(listener));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.shift_remove(&id).is_some()
    }

    fn notify(&mut self, change: StateChange) {
        for listener in self.subscribers.values_mut() {
            listener(&change);
        }
    }

    // ------------------------------------------------------------------
    // Room and surfaces
    // ------------------------------------------------------------------

    /// Switch rooms. Surfaces are regenerated and selection and hover are
    /// cleared. Mappings are kept; ids the new room lacks are simply unused.
    ///
    /// Setting the current room again only clears selection and hover.
    pub fn set_room(&mut self, room: RoomType) {
        if room == self.room {
            if self.selected.take().is_some() {
                self.notify(StateChange::SelectionChanged(None));
            }
            if self.hovered.take().is_some() {
                self.notify(StateChange::HoverChanged(None));
            }
            return;
        }
        self.room = room;
        self.surfaces = generate(room);
        self.selected = None;
        self.hovered = None;
        log::info!("room changed to {}", room.as_str());
        self.notify(StateChange::RoomChanged(room));
    }

    fn check_surface(&self, id: &str) -> Result<&SurfaceDescriptor, SceneError> {
        self.surface(id)
            .ok_or_else(|| SceneError::UnknownSurface { id: id.to_string() })
    }

    fn check_tile(&self, id: &str) -> Result<(), SceneError> {
        if self.catalog.contains_tile(id) {
            Ok(())
        } else {
            Err(SceneError::UnknownTile { id: id.to_string() })
        }
    }

    // ------------------------------------------------------------------
    // Selection and hover
    // ------------------------------------------------------------------

    /// Select a surface, or clear the selection with `None`.
    pub fn select_surface(&mut self, id: Option<&str>) -> Result<(), SceneError> {
        let next = match id {
            Some(id) => Some(self.check_surface(id)?.id.clone()),
            None => None,
        };
        if next != self.selected {
            self.selected = next.clone();
            self.notify(StateChange::SelectionChanged(next));
        }
        Ok(())
    }

    /// Hover a surface, or clear the hover with `None`.
    pub fn hover_surface(&mut self, id: Option<&str>) -> Result<(), SceneError> {
        let next = match id {
            Some(id) => Some(self.check_surface(id)?.id.clone()),
            None => None,
        };
        if next != self.hovered {
            self.hovered = next.clone();
            self.notify(StateChange::HoverChanged(next));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mappings
    // ------------------------------------------------------------------

    /// Map a tile onto a surface, replacing whatever was there.
    ///
    /// `pattern` defaults to the current pattern. On error the previous
    /// mapping is left untouched.
    pub fn apply_tile(&mut self, surface_id: &str, tile_id: &str, pattern: Option<Pattern>) -> Result<(), SceneError> {
        let surface = self.check_surface(surface_id)?.id.clone();
        self.check_tile(tile_id)?;

        let mapping = Mapping::new(tile_id, pattern.unwrap_or(self.pattern));
        if self.mappings.get(&surface) == Some(&mapping) {
            return Ok(());
        }
        self.mappings.insert(surface.clone(), mapping.clone());
        self.notify(StateChange::MappingChanged {
            surface,
            mapping: Some(mapping),
        });
        Ok(())
    }

    /// Apply the active tile with the current pattern to the selected
    /// surface. Returns `Ok(false)` when nothing is selected or no tile is
    /// active.
    pub fn apply_to_selection(&mut self) -> Result<bool, SceneError> {
        match (self.selected.clone(), self.active_tile.clone()) {
            (Some(surface), Some(tile)) => {
                self.apply_tile(surface.as_str(), tile.as_str(), None)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Remove the mapping from a surface. Unmapped surfaces are a no-op.
    pub fn remove_tile(&mut self, surface_id: &str) -> bool {
        match self.mappings.remove_entry(surface_id) {
            Some((surface, _)) => {
                self.notify(StateChange::MappingChanged { surface, mapping: None });
                true
            }
            None => false,
        }
    }

    /// Replace the whole mapping table, e.g. when loading a saved design.
    /// Entries are not validated against the catalog.
    pub fn set_mappings(&mut self, mappings: MeshMappings) {
        if mappings != self.mappings {
            self.mappings = mappings;
            self.notify(StateChange::MappingsReplaced);
        }
    }

    /// Clear mappings, selection, active tile, and the before view. The
    /// room and catalog are kept.
    pub fn reset(&mut self) {
        let dirty = !self.mappings.is_empty()
            || self.selected.is_some()
            || self.active_tile.is_some()
            || self.show_before;
        if !dirty {
            return;
        }
        self.mappings.clear();
        self.selected = None;
        self.active_tile = None;
        self.show_before = false;
        self.notify(StateChange::Reset);
    }

    /// Click rule: clicking the selected surface while a tile is active
    /// applies it; any other click moves the selection.
    pub fn click(&mut self, surface_id: &str) -> Result<ClickOutcome, SceneError> {
        let surface = self.check_surface(surface_id)?.id.clone();

        if self.selected.as_ref() == Some(&surface) {
            if let Some(tile) = self.active_tile.clone() {
                self.apply_tile(surface.as_str(), tile.as_str(), None)?;
                return Ok(ClickOutcome::Applied(surface));
            }
        }

        self.select_surface(Some(surface.as_str()))?;
        Ok(ClickOutcome::Selected(surface))
    }

    // ------------------------------------------------------------------
    // Picks
    // ------------------------------------------------------------------

    /// Choose the tile subsequent clicks apply, or clear it.
    pub fn set_active_tile(&mut self, tile_id: Option<&str>) -> Result<(), SceneError> {
        if let Some(id) = tile_id {
            self.check_tile(id)?;
        }
        let next = tile_id.map(TileId::from);
        if next != self.active_tile {
            self.active_tile = next.clone();
            self.notify(StateChange::ActiveTileChanged(next));
        }
        Ok(())
    }

    /// Set the pattern used by later applies. Existing mappings keep theirs.
    pub fn set_pattern(&mut self, pattern: Pattern) {
        if pattern != self.pattern {
            self.pattern = pattern;
            self.notify(StateChange::PatternChanged(pattern));
        }
    }

    pub fn set_lighting(&mut self, lighting: LightingPreset) {
        if lighting != self.lighting {
            self.lighting = lighting;
            self.notify(StateChange::LightingChanged(lighting));
        }
    }

    /// Show every surface with its untiled material while on.
    pub fn set_show_before(&mut self, show: bool) {
        if show != self.show_before {
            self.show_before = show;
            self.notify(StateChange::BeforeViewChanged(show));
        }
    }

    // ------------------------------------------------------------------
    // Designs
    // ------------------------------------------------------------------

    /// Capture the current room, mappings, and lighting as a draft.
    pub fn snapshot_design(&self, name: &str, customer: Option<&str>) -> DesignDraft {
        let mut draft = DesignDraft::new(name, self.room).with_lighting(self.lighting);
        draft.customer_name = customer.map(str::to_string);
        draft.mesh_mappings = self.mappings.clone();
        draft
    }

    /// Restore a saved design's room, lighting, and mappings.
    pub fn load_design(&mut self, design: &Design) {
        self.set_room(design.room_type);
        self.set_lighting(design.lighting_preset);
        self.set_mappings(design.mesh_mappings.clone());
        log::info!("loaded design {} ({})", design.name, design.id);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Mutable catalog access. Removing a tile leaves mappings to it inert.
    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    pub fn room(&self) -> RoomType {
        self.room
    }

    pub fn surfaces(&self) -> &[SurfaceDescriptor] {
        &self.surfaces
    }

    pub fn surface(&self, id: &str) -> Option<&SurfaceDescriptor> {
        self.surfaces.iter().find(|s| s.id.as_str() == id)
    }

    pub fn contains_surface(&self, id: &str) -> bool {
        self.surface(id).is_some()
    }

    pub fn mapping(&self, surface_id: &str) -> Option<&Mapping> {
        self.mappings.get(surface_id)
    }

    pub fn mappings(&self) -> &MeshMappings {
        &self.mappings
    }

    pub fn selected(&self) -> Option<&SurfaceId> {
        self.selected.as_ref()
    }

    pub fn hovered(&self) -> Option<&SurfaceId> {
        self.hovered.as_ref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_ref().is_some_and(|s| s.as_str() == id)
    }

    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered.as_ref().is_some_and(|s| s.as_str() == id)
    }

    pub fn highlight(&self, id: &str) -> Highlight {
        if self.is_selected(id) {
            Highlight::Selected
        } else if self.is_hovered(id) {
            Highlight::Hovered
        } else {
            Highlight::None
        }
    }

    pub fn active_tile(&self) -> Option<&TileId> {
        self.active_tile.as_ref()
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    pub fn lighting(&self) -> LightingPreset {
        self.lighting
    }

    pub fn show_before(&self) -> bool {
        self.show_before
    }
}

impl Default for SurfaceRegistry<TileCatalog> {
    fn default() -> Self {
        Self::new(TileCatalog::new())
    }
}

impl<C: Catalog> std::fmt::Debug for SurfaceRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceRegistry")
            .field("room", &self.room)
            .field("surfaces", &self.surfaces.len())
            .field("mappings", &self.mappings)
            .field("selected", &self.selected)
            .field("hovered", &self.hovered)
            .field("active_tile", &self.active_tile)
            .field("pattern", &self.pattern)
            .field("lighting", &self.lighting)
            .field("show_before", &self.show_before)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showroom_core::{Finish, Tile, TileCategory};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn catalog() -> TileCatalog {
        [
            Tile::new("t1", "Carrara", TileCategory::Floor, 600, 600, Finish::Glossy, "/t1.png"),
            Tile::new("t2", "Oak", TileCategory::Floor, 1200, 200, Finish::Matte, "/t2.png"),
        ]
        .into_iter()
        .collect()
    }

    fn kitchen() -> SurfaceRegistry {
        SurfaceRegistry::new(catalog())
    }

    fn recorder(registry: &mut SurfaceRegistry) -> Rc<RefCell<Vec<StateChange>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        registry.subscribe(move |change| sink.borrow_mut().push(change.clone()));
        log
    }

    #[test]
    fn test_select_replaces_selection() {
        let mut reg = kitchen();
        reg.select_surface(Some("floor")).unwrap();
        reg.select_surface(Some("wall-back")).unwrap();
        assert!(reg.is_selected("wall-back"));
        assert!(!reg.is_selected("floor"));

        reg.select_surface(None).unwrap();
        assert!(reg.selected().is_none());
    }

    #[test]
    fn test_unknown_surface_rejected() {
        let mut reg = kitchen();
        let err = reg.select_surface(Some("ceiling")).unwrap_err();
        assert_eq!(err, SceneError::UnknownSurface { id: "ceiling".into() });
        assert!(reg.hover_surface(Some("wall-front")).is_err());
        assert!(reg.apply_tile("ceiling", "t1", None).is_err());
    }

    #[test]
    fn test_apply_replaces_mapping() {
        let mut reg = kitchen();
        reg.apply_tile("floor", "t1", None).unwrap();
        reg.apply_tile("floor", "t2", Some(Pattern::Herringbone)).unwrap();

        assert_eq!(reg.mappings().len(), 1);
        let mapping = reg.mapping("floor").unwrap();
        assert_eq!(mapping.tile_id.as_str(), "t2");
        assert_eq!(mapping.pattern, Pattern::Herringbone);
        assert_eq!(mapping.rotation, 0.0);
        assert_eq!(mapping.scale, 1.0);
    }

    #[test]
    fn test_apply_defaults_to_current_pattern() {
        let mut reg = kitchen();
        reg.set_pattern(Pattern::Diagonal);
        reg.apply_tile("wall-left", "t1", None).unwrap();
        assert_eq!(reg.mapping("wall-left").unwrap().pattern, Pattern::Diagonal);

        // Later pattern changes leave existing mappings alone.
        reg.set_pattern(Pattern::Brick);
        assert_eq!(reg.mapping("wall-left").unwrap().pattern, Pattern::Diagonal);
    }

    #[test]
    fn test_unknown_tile_keeps_prior_mapping() {
        let mut reg = kitchen();
        reg.apply_tile("floor", "t1", None).unwrap();
        let err = reg.apply_tile("floor", "zzz", None).unwrap_err();
        assert_eq!(err, SceneError::UnknownTile { id: "zzz".into() });
        assert_eq!(reg.mapping("floor").unwrap().tile_id.as_str(), "t1");
    }

    #[test]
    fn test_remove_unmapped_is_noop() {
        let mut reg = kitchen();
        let log = recorder(&mut reg);
        assert!(!reg.remove_tile("floor"));
        assert!(log.borrow().is_empty());

        reg.apply_tile("floor", "t1", None).unwrap();
        assert!(reg.remove_tile("floor"));
        assert!(reg.mapping("floor").is_none());
    }

    #[test]
    fn test_set_room_clears_selection_keeps_mappings() {
        let mut reg = kitchen();
        reg.apply_tile("countertop", "t1", None).unwrap();
        reg.select_surface(Some("countertop")).unwrap();
        reg.hover_surface(Some("floor")).unwrap();

        reg.set_room(RoomType::LivingRoom);
        assert_eq!(reg.surfaces().len(), 4);
        assert!(reg.selected().is_none());
        assert!(reg.hovered().is_none());
        // Stale but retained.
        assert!(reg.mapping("countertop").is_some());
        assert!(!reg.contains_surface("countertop"));

        reg.set_room(RoomType::Kitchen);
        assert!(reg.contains_surface("countertop"));
        assert!(reg.mapping("countertop").is_some());
    }

    #[test]
    fn test_set_same_room_clears_selection() {
        let mut reg = kitchen();
        reg.apply_tile("floor", "t1", None).unwrap();
        reg.select_surface(Some("floor")).unwrap();
        reg.hover_surface(Some("wall-back")).unwrap();
        let log = recorder(&mut reg);

        reg.set_room(RoomType::Kitchen);
        assert!(reg.selected().is_none());
        assert!(reg.hovered().is_none());
        assert!(reg.mapping("floor").is_some());
        assert_eq!(
            *log.borrow(),
            vec![StateChange::SelectionChanged(None), StateChange::HoverChanged(None)]
        );

        // Nothing left to clear.
        reg.set_room(RoomType::Kitchen);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_click_selects_then_applies() {
        let mut reg = kitchen();
        assert_eq!(reg.click("floor").unwrap(), ClickOutcome::Selected("floor".into()));
        // No active tile: clicking again just keeps the selection.
        assert_eq!(reg.click("floor").unwrap(), ClickOutcome::Selected("floor".into()));
        assert!(reg.mappings().is_empty());

        reg.set_active_tile(Some("t2")).unwrap();
        assert_eq!(reg.click("floor").unwrap(), ClickOutcome::Applied("floor".into()));
        assert_eq!(reg.mapping("floor").unwrap().tile_id.as_str(), "t2");

        // Clicking another surface moves the selection, never applies.
        assert_eq!(reg.click("wall-back").unwrap(), ClickOutcome::Selected("wall-back".into()));
        assert!(reg.mapping("wall-back").is_none());
    }

    #[test]
    fn test_apply_to_selection() {
        let mut reg = kitchen();
        assert!(!reg.apply_to_selection().unwrap());
        reg.select_surface(Some("backsplash")).unwrap();
        reg.set_active_tile(Some("t1")).unwrap();
        assert!(reg.apply_to_selection().unwrap());
        assert_eq!(reg.mapping("backsplash").unwrap().tile_id.as_str(), "t1");
    }

    #[test]
    fn test_reset() {
        let mut reg = kitchen();
        reg.apply_tile("floor", "t1", None).unwrap();
        reg.select_surface(Some("floor")).unwrap();
        reg.set_active_tile(Some("t1")).unwrap();
        reg.set_show_before(true);
        reg.set_lighting(LightingPreset::Cool);

        reg.reset();
        assert!(reg.mappings().is_empty());
        assert!(reg.selected().is_none());
        assert!(reg.active_tile().is_none());
        assert!(!reg.show_before());
        assert_eq!(reg.room(), RoomType::Kitchen);
        assert_eq!(reg.lighting(), LightingPreset::Cool);
        assert_eq!(reg.catalog().len(), 2);
    }

    #[test]
    fn test_highlight() {
        let mut reg = kitchen();
        reg.hover_surface(Some("floor")).unwrap();
        assert_eq!(reg.highlight("floor"), Highlight::Hovered);
        reg.select_surface(Some("floor")).unwrap();
        assert_eq!(reg.highlight("floor"), Highlight::Selected);
        assert_eq!(reg.highlight("wall-back"), Highlight::None);
    }

    #[test]
    fn test_one_notification_per_effective_change() {
        let mut reg = kitchen();
        let log = recorder(&mut reg);

        reg.select_surface(Some("floor")).unwrap();
        reg.select_surface(Some("floor")).unwrap();
        reg.apply_tile("floor", "t1", None).unwrap();
        reg.apply_tile("floor", "t1", None).unwrap();
        reg.set_lighting(LightingPreset::Daylight);
        reg.set_room(RoomType::Kitchen);
        reg.reset();
        reg.reset();

        assert_eq!(
            *log.borrow(),
            vec![
                StateChange::SelectionChanged(Some("floor".into())),
                StateChange::MappingChanged {
                    surface: "floor".into(),
                    mapping: Some(Mapping::new("t1", Pattern::Straight)),
                },
                StateChange::SelectionChanged(None),
                StateChange::Reset,
            ]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let mut reg = kitchen();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = reg.subscribe(move |_| *sink.borrow_mut() += 1);

        reg.set_pattern(Pattern::Brick);
        assert!(reg.unsubscribe(id));
        assert!(!reg.unsubscribe(id));
        reg.set_pattern(Pattern::Straight);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_snapshot_and_load_design() {
        let mut reg = kitchen();
        reg.apply_tile("floor", "t1", Some(Pattern::Brick)).unwrap();
        reg.set_lighting(LightingPreset::Warm);

        let draft = reg.snapshot_design("Smith kitchen", Some("Smith"));
        assert_eq!(draft.room_type, RoomType::Kitchen);
        assert_eq!(draft.lighting_preset, LightingPreset::Warm);
        assert_eq!(draft.customer_name.as_deref(), Some("Smith"));

        // The draft is a snapshot, later edits do not leak into it.
        reg.apply_tile("floor", "t2", None).unwrap();
        assert_eq!(draft.mesh_mappings["floor"].tile_id.as_str(), "t1");

        let design = Design::from_draft("d1", draft, 0);
        let mut other = SurfaceRegistry::with_options(catalog(), RegistryOptions::default().with_room(RoomType::Bathroom));
        other.load_design(&design);
        assert_eq!(other.room(), RoomType::Kitchen);
        assert_eq!(other.lighting(), LightingPreset::Warm);
        assert_eq!(other.mappings(), &design.mesh_mappings);
    }
}

//! WebAssembly bindings for the Showroom tile visualizer.
//!
//! The page owns rendering and image decoding; this crate owns every piece
//! of state and math in between.
//!
//! ## Example
//!
//! ```js
//! import { ShowroomEngine } from 'showroom-engine';
//!
//! const engine = new ShowroomEngine({ room: 'bathroom', stockTiles: true });
//!
//! engine.onChange((change) => console.log(change.kind));
//! engine.setActiveTile('marble-white');
//! engine.pointer('click', 'floor');
//! engine.pointer('click', 'floor'); // applies the tile
//!
//! // Each frame: fetch requested images, then draw the bindings.
//! for (const url of engine.takeTextureRequests()) {
//!   loadImage(url).then(
//!     (img) => engine.textureLoaded(url, img.width, img.height),
//!     (err) => engine.textureFailed(url, String(err)),
//!   );
//! }
//! const bindings = engine.materials();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use wasm_bindgen::prelude::*;

use showroom_core::{Design, LightingPreset, Pattern, RoomType, SurfaceId, Tile};
use showroom_io::{
    generate_swatch, stock_tiles, upload_image, DesignPatch, DesignStore, ImagePayload, MemoryDesignStore,
    MemoryImageStorage, UploadPolicy,
};
use showroom_layout::CameraPose;
use showroom_render_3d::{lighting_rig, MaterialCache, ReleasedResource, TextureImage};
use showroom_scene::{
    Catalog, InteractionController, PointerEvent, SurfaceMaterials, SurfaceRegistry, TileCatalog,
};

mod changes;
mod loader;
mod types;

pub use changes::*;
pub use loader::*;
pub use types::*;

/// Install the panic hook and console logger.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    // A second init (e.g. hot reload) finds the logger already set.
    let _ = console_log::init_with_level(level);
}

fn js_err(context: &str, err: impl std::fmt::Display) -> JsError {
    JsError::new(&format!("{}: {}", context, err))
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| js_err("Serialization error", e))
}

fn parse_room(name: &str) -> Result<RoomType, JsError> {
    RoomType::from_name(name).ok_or_else(|| JsError::new(&format!("Unknown room type: {}", name)))
}

fn parse_pattern(name: &str) -> Result<Pattern, JsError> {
    Pattern::from_name(name).ok_or_else(|| JsError::new(&format!("Unknown pattern: {}", name)))
}

fn parse_lighting(name: &str) -> Result<LightingPreset, JsError> {
    LightingPreset::from_name(name).ok_or_else(|| JsError::new(&format!("Unknown lighting preset: {}", name)))
}

/// The main Showroom engine interface for JavaScript.
#[wasm_bindgen]
pub struct ShowroomEngine {
    registry: SurfaceRegistry,
    cache: MaterialCache,
    binder: SurfaceMaterials,
    controller: InteractionController,
    loads: LoadQueue,
    released: Rc<RefCell<Vec<ReleasedResource>>>,
    designs: MemoryDesignStore,
    images: MemoryImageStorage,
    upload_policy: UploadPolicy,
    listeners: Listeners,
    next_listener: u32,
}

type Listeners = Rc<RefCell<IndexMap<u32, js_sys::Function>>>;

/// Hand queued changes to every listener.
fn deliver_changes(queue: &ChangeQueue, listeners: &Listeners) {
    queue.flush(|change| {
        let Ok(value) = serde_wasm_bindgen::to_value(change) else {
            return;
        };
        // Snapshot so a listener may call `offChange`.
        let callbacks: Vec<js_sys::Function> = listeners.borrow().values().cloned().collect();
        for callback in callbacks {
            if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                log::warn!("change listener threw: {:?}", err);
            }
        }
    });
}

#[wasm_bindgen]
impl ShowroomEngine {
    /// Create an engine. `options` is an optional `EngineOptionsJs` object.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<ShowroomEngine, JsError> {
        let opts: EngineOptionsJs = if options.is_undefined() || options.is_null() {
            EngineOptionsJs::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(|e| js_err("Invalid engine options", e))?
        };

        let catalog: TileCatalog = if opts.stock_tiles.unwrap_or(false) {
            stock_tiles().into_iter().collect()
        } else {
            TileCatalog::new()
        };

        let loads = LoadQueue::new();
        let released = Rc::new(RefCell::new(Vec::new()));
        let mut cache = MaterialCache::with_options(loads.source(), opts.cache_options());
        let sink = Rc::clone(&released);
        cache.on_release(move |resource| sink.borrow_mut().push(resource));

        let mut upload_policy = UploadPolicy::default();
        if let Some(max) = opts.max_upload_bytes {
            upload_policy = upload_policy.with_max_bytes(max);
        }

        let mut registry = SurfaceRegistry::with_options(catalog, opts.registry_options());
        let listeners: Listeners = Rc::new(RefCell::new(IndexMap::new()));
        let queue = ChangeQueue::new();
        let subscribed = Rc::clone(&listeners);
        registry.subscribe(move |change| {
            if subscribed.borrow().is_empty() {
                return;
            }
            if queue.push(StateChangeJs::from(change)) {
                // Runs as a microtask, after the engine call has returned.
                let (queue, listeners) = (queue.clone(), Rc::clone(&subscribed));
                wasm_bindgen_futures::spawn_local(async move {
                    deliver_changes(&queue, &listeners);
                });
            }
        });

        Ok(Self {
            registry,
            cache,
            binder: SurfaceMaterials::new(),
            controller: InteractionController::new(),
            loads,
            released,
            designs: MemoryDesignStore::new(),
            images: MemoryImageStorage::default(),
            upload_policy,
            listeners,
            next_listener: 0,
        })
    }

    /// Get the version of the engine.
    #[wasm_bindgen(js_name = version)]
    pub fn version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    /// Call `callback` with a `StateChangeJs` for every state change.
    ///
    /// Changes are delivered in order from a microtask once the call that
    /// caused them has returned, so listeners may read the engine. Returns
    /// a key for [`ShowroomEngine::off_change`].
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: js_sys::Function) -> u32 {
        let key = self.next_listener;
        self.next_listener += 1;
        self.listeners.borrow_mut().insert(key, callback);
        key
    }

    #[wasm_bindgen(js_name = offChange)]
    pub fn off_change(&mut self, key: u32) -> bool {
        self.listeners.borrow_mut().shift_remove(&key).is_some()
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    /// Add or replace tiles from an array of tile objects.
    #[wasm_bindgen(js_name = loadTiles)]
    pub fn load_tiles(&mut self, tiles: JsValue) -> Result<usize, JsError> {
        let tiles: Vec<Tile> = serde_wasm_bindgen::from_value(tiles).map_err(|e| js_err("Invalid tiles", e))?;
        let count = tiles.len();
        for tile in tiles {
            self.registry.catalog_mut().insert(tile);
        }
        Ok(count)
    }

    #[wasm_bindgen(js_name = removeCatalogTile)]
    pub fn remove_catalog_tile(&mut self, id: &str) -> bool {
        self.registry.catalog_mut().remove(id).is_some()
    }

    /// Tiles matching an optional `{ category, collection }` filter.
    #[wasm_bindgen(js_name = listTiles)]
    pub fn list_tiles(&self, filter: JsValue) -> Result<JsValue, JsError> {
        let filter: TileFilterJs = if filter.is_undefined() || filter.is_null() {
            TileFilterJs::default()
        } else {
            serde_wasm_bindgen::from_value(filter).map_err(|e| js_err("Invalid filter", e))?
        };
        let filter = filter.into_core();
        let tiles: Vec<&Tile> = self.registry.catalog().filter(&filter).collect();
        to_js(&tiles)
    }

    #[wasm_bindgen(js_name = getTile)]
    pub fn get_tile(&self, id: &str) -> Result<JsValue, JsError> {
        match self.registry.catalog().get_tile(id) {
            Some(tile) => to_js(tile),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = collections)]
    pub fn collections(&self) -> Vec<String> {
        self.registry.catalog().collections().into_iter().map(str::to_string).collect()
    }

    /// Start loading the images of the given tiles ahead of use.
    #[wasm_bindgen(js_name = preloadTiles)]
    pub fn preload_tiles(&mut self, ids: Vec<String>) {
        for id in ids {
            if let Some(tile) = self.registry.catalog().get_tile(&id) {
                let image_ref = tile.image_url.clone();
                self.cache.resolve_texture(&image_ref);
            }
        }
    }

    // ------------------------------------------------------------------
    // Room
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = setRoom)]
    pub fn set_room(&mut self, room: &str) -> Result<(), JsError> {
        self.registry.set_room(parse_room(room)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = room)]
    pub fn room(&self) -> String {
        self.registry.room().as_str().to_string()
    }

    /// Surfaces of the current room as `SurfaceJs` objects.
    #[wasm_bindgen(js_name = surfaces)]
    pub fn surfaces(&self) -> Result<JsValue, JsError> {
        let surfaces: Vec<SurfaceJs> = self
            .registry
            .surfaces()
            .iter()
            .map(|s| SurfaceJs::new(s, self.registry.highlight(s.id.as_str())))
            .collect();
        to_js(&surfaces)
    }

    #[wasm_bindgen(js_name = cameraPose)]
    pub fn camera_pose(&self) -> Result<JsValue, JsError> {
        to_js(&CameraPoseJs::from(&CameraPose::for_room(self.registry.room())))
    }

    // ------------------------------------------------------------------
    // Interaction
    // ------------------------------------------------------------------

    /// Feed a pointer event: `kind` is `"enter"`, `"leave"`, or `"click"`.
    #[wasm_bindgen(js_name = pointer)]
    pub fn pointer(&mut self, kind: &str, surface_id: &str) -> Result<JsValue, JsError> {
        let surface = SurfaceId::from(surface_id);
        let event = match kind {
            "enter" => PointerEvent::HoverEnter(surface),
            "leave" => PointerEvent::HoverLeave(surface),
            "click" => PointerEvent::Click(surface),
            other => return Err(JsError::new(&format!("Unknown pointer event: {}", other))),
        };
        let outcome = self
            .controller
            .handle(&mut self.registry, event)
            .map_err(|e| js_err("Interaction error", e))?;
        to_js(&InteractionJs::from(outcome))
    }

    #[wasm_bindgen(js_name = selectSurface)]
    pub fn select_surface(&mut self, surface_id: Option<String>) -> Result<(), JsError> {
        self.registry
            .select_surface(surface_id.as_deref())
            .map_err(|e| js_err("Selection error", e))
    }

    #[wasm_bindgen(js_name = selectedSurface)]
    pub fn selected_surface(&self) -> Option<String> {
        self.registry.selected().map(|s| s.to_string())
    }

    #[wasm_bindgen(js_name = applyTile)]
    pub fn apply_tile(&mut self, surface_id: &str, tile_id: &str, pattern: Option<String>) -> Result<(), JsError> {
        let pattern = pattern.as_deref().map(parse_pattern).transpose()?;
        self.registry
            .apply_tile(surface_id, tile_id, pattern)
            .map_err(|e| js_err("Apply error", e))
    }

    /// Apply the active tile to the selected surface.
    #[wasm_bindgen(js_name = applyToSelection)]
    pub fn apply_to_selection(&mut self) -> Result<bool, JsError> {
        self.registry.apply_to_selection().map_err(|e| js_err("Apply error", e))
    }

    #[wasm_bindgen(js_name = removeTile)]
    pub fn remove_tile(&mut self, surface_id: &str) -> bool {
        self.registry.remove_tile(surface_id)
    }

    #[wasm_bindgen(js_name = reset)]
    pub fn reset(&mut self) {
        self.registry.reset();
    }

    #[wasm_bindgen(js_name = setActiveTile)]
    pub fn set_active_tile(&mut self, tile_id: Option<String>) -> Result<(), JsError> {
        self.registry
            .set_active_tile(tile_id.as_deref())
            .map_err(|e| js_err("Tile error", e))
    }

    #[wasm_bindgen(js_name = setPattern)]
    pub fn set_pattern(&mut self, pattern: &str) -> Result<(), JsError> {
        self.registry.set_pattern(parse_pattern(pattern)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = setLighting)]
    pub fn set_lighting(&mut self, preset: &str) -> Result<(), JsError> {
        self.registry.set_lighting(parse_lighting(preset)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = setShowBefore)]
    pub fn set_show_before(&mut self, show: bool) {
        self.registry.set_show_before(show);
    }

    /// The mapping table as a `{ surfaceId: { tileId, pattern, rotation, scale } }` object.
    #[wasm_bindgen(js_name = mappings)]
    pub fn mappings(&self) -> Result<JsValue, JsError> {
        to_js(self.registry.mappings())
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// One `MaterialBindingJs` per surface of the current room.
    #[wasm_bindgen(js_name = materials)]
    pub fn materials(&mut self) -> Result<JsValue, JsError> {
        let bindings: Vec<MaterialBindingJs> = self
            .binder
            .bind_all(&self.registry, &mut self.cache)
            .iter()
            .map(|(surface, bound)| MaterialBindingJs::new(surface.id.as_str(), bound))
            .collect();
        to_js(&bindings)
    }

    #[wasm_bindgen(js_name = lighting)]
    pub fn lighting(&self) -> Result<JsValue, JsError> {
        let preset = self.registry.lighting();
        to_js(&LightingRigJs::new(preset, &lighting_rig(preset)))
    }

    /// Image references to fetch. Each is returned once.
    #[wasm_bindgen(js_name = takeTextureRequests)]
    pub fn take_texture_requests(&self) -> Vec<String> {
        self.loads.take_requests()
    }

    #[wasm_bindgen(js_name = textureLoaded)]
    pub fn texture_loaded(&self, image_ref: &str, width: u32, height: u32) -> bool {
        self.loads.complete(image_ref, Ok(TextureImage::new(width, height)))
    }

    #[wasm_bindgen(js_name = textureFailed)]
    pub fn texture_failed(&self, image_ref: &str, reason: &str) -> bool {
        self.loads.complete(image_ref, Err(reason.to_string()))
    }

    /// Resolves with the texture id once `image_ref` has loaded, starting
    /// the load if needed. Rejects if the load fails.
    #[wasm_bindgen(js_name = whenTextureReady)]
    pub fn when_texture_ready(&mut self, image_ref: &str) -> js_sys::Promise {
        let handle = self.cache.resolve_texture(image_ref);
        wasm_bindgen_futures::future_to_promise(async move {
            match handle.await {
                Ok(texture) => Ok(JsValue::from_f64(texture.id.0 as f64)),
                Err(err) => Err(JsValue::from_str(&err.to_string())),
            }
        })
    }

    #[wasm_bindgen(js_name = invalidateTexture)]
    pub fn invalidate_texture(&mut self, image_ref: &str) -> usize {
        self.cache.invalidate(image_ref)
    }

    #[wasm_bindgen(js_name = clearCache)]
    pub fn clear_cache(&mut self) -> usize {
        self.binder.clear();
        self.cache.clear_all()
    }

    /// Resources disposed since the last call, as `ReleasedJs` objects.
    #[wasm_bindgen(js_name = takeReleased)]
    pub fn take_released(&self) -> Result<JsValue, JsError> {
        let released: Vec<ReleasedJs> = self.released.borrow_mut().drain(..).map(ReleasedJs::from).collect();
        to_js(&released)
    }

    // ------------------------------------------------------------------
    // Designs
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = saveDesign)]
    pub fn save_design(
        &mut self,
        name: &str,
        customer_name: Option<String>,
        screenshot_url: Option<String>,
    ) -> Result<JsValue, JsError> {
        let mut draft = self.registry.snapshot_design(name, customer_name.as_deref());
        draft.screenshot_url = screenshot_url;
        let design = self.designs.save_design(draft).map_err(|e| js_err("Save error", e))?;
        to_js(&design)
    }

    /// Load a saved design into the session.
    #[wasm_bindgen(js_name = loadDesign)]
    pub fn load_design(&mut self, id: &str) -> Result<JsValue, JsError> {
        let design = self.designs.load_design(id).map_err(|e| js_err("Load error", e))?;
        self.registry.load_design(&design);
        to_js(&design)
    }

    /// Load a design object received from elsewhere, e.g. a server.
    #[wasm_bindgen(js_name = applyDesign)]
    pub fn apply_design(&mut self, design: JsValue) -> Result<(), JsError> {
        let design: Design = serde_wasm_bindgen::from_value(design).map_err(|e| js_err("Invalid design", e))?;
        self.registry.load_design(&design);
        Ok(())
    }

    #[wasm_bindgen(js_name = listDesigns)]
    pub fn list_designs(&self) -> Result<JsValue, JsError> {
        let designs = self.designs.list_designs().map_err(|e| js_err("Load error", e))?;
        to_js(&designs)
    }

    /// Apply a partial `{ name, customerName, meshMappings, lightingPreset, screenshotUrl }` update.
    #[wasm_bindgen(js_name = updateDesign)]
    pub fn update_design(&mut self, id: &str, patch: JsValue) -> Result<JsValue, JsError> {
        let patch: DesignPatch = serde_wasm_bindgen::from_value(patch).map_err(|e| js_err("Invalid patch", e))?;
        let design = self.designs.update_design(id, patch).map_err(|e| js_err("Update error", e))?;
        to_js(&design)
    }

    #[wasm_bindgen(js_name = deleteDesign)]
    pub fn delete_design(&mut self, id: &str) -> Result<bool, JsError> {
        self.designs.delete_design(id).map_err(|e| js_err("Delete error", e))
    }

    // ------------------------------------------------------------------
    // Uploads and swatches
    // ------------------------------------------------------------------

    /// Validate and store an uploaded image. Returns its URL.
    #[wasm_bindgen(js_name = uploadImage)]
    pub fn upload_image(&mut self, file_name: &str, content_type: &str, bytes: Vec<u8>) -> Result<String, JsError> {
        let payload = ImagePayload::new(file_name, content_type, bytes);
        let stored = upload_image(&self.upload_policy, &mut self.images, &payload)
            .map_err(|e| js_err("Upload error", e))?;
        Ok(stored.url)
    }

    /// SVG markup of a procedural stock swatch.
    #[wasm_bindgen(js_name = swatch)]
    pub fn swatch(key: &str) -> String {
        generate_swatch(key).svg
    }
}

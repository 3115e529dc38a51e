//! Design persistence.

use indexmap::IndexMap;

use showroom_core::{Design, DesignDraft, LightingPreset, MeshMappings};

use crate::error::{Result, StoreError};

/// Partial update of a saved design. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignPatch {
    #[serde(default)]
    pub name: Option<String>,
    /// `Some(None)` clears the customer.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub customer_name: Option<Option<String>>,
    #[serde(default)]
    pub mesh_mappings: Option<MeshMappings>,
    #[serde(default)]
    pub lighting_preset: Option<LightingPreset>,
    /// `Some(None)` clears the screenshot.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub screenshot_url: Option<Option<String>>,
}

impl DesignPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_customer(mut self, customer: Option<String>) -> Self {
        self.customer_name = Some(customer);
        self
    }

    pub fn with_mappings(mut self, mappings: MeshMappings) -> Self {
        self.mesh_mappings = Some(mappings);
        self
    }

    pub fn with_lighting(mut self, preset: LightingPreset) -> Self {
        self.lighting_preset = Some(preset);
        self
    }

    pub fn with_screenshot(mut self, url: Option<String>) -> Self {
        self.screenshot_url = Some(url);
        self
    }

    /// Apply the patch. An empty name is ignored.
    pub fn apply(self, design: &mut Design, now_ms: u64) {
        if let Some(name) = self.name.filter(|n| !n.trim().is_empty()) {
            design.name = name;
        }
        if let Some(customer) = self.customer_name {
            design.customer_name = customer;
        }
        if let Some(mappings) = self.mesh_mappings {
            design.mesh_mappings = mappings;
        }
        if let Some(preset) = self.lighting_preset {
            design.lighting_preset = preset;
        }
        if let Some(url) = self.screenshot_url {
            design.screenshot_url = url;
        }
        design.updated_at = now_ms;
    }
}

/// Distinguishes an absent field from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Option<String>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<String>>, D::Error> {
        Option::<String>::deserialize(deserializer).map(Some)
    }
}

/// Saved designs.
pub trait DesignStore {
    /// Save a new design and return it with its id and timestamps.
    fn save_design(&mut self, draft: DesignDraft) -> Result<Design>;

    fn load_design(&self, id: &str) -> Result<Design>;

    /// All designs, oldest first.
    fn list_designs(&self) -> Result<Vec<Design>>;

    fn update_design(&mut self, id: &str, patch: DesignPatch) -> Result<Design>;

    /// Delete a design. Returns whether it existed.
    fn delete_design(&mut self, id: &str) -> Result<bool>;
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// In-memory store. Designs are held as JSON text so that every load
/// returns an independent copy decoded from the wire format.
pub struct MemoryDesignStore {
    designs: IndexMap<String, String>,
    clock: fn() -> u64,
}

impl Default for MemoryDesignStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDesignStore {
    pub fn new() -> Self {
        Self::with_clock(now_millis)
    }

    /// Use a custom time source for timestamps.
    pub fn with_clock(clock: fn() -> u64) -> Self {
        Self {
            designs: IndexMap::new(),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.designs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }

    fn decode(json: &str) -> Result<Design> {
        Ok(serde_json::from_str(json)?)
    }
}

impl DesignStore for MemoryDesignStore {
    fn save_design(&mut self, draft: DesignDraft) -> Result<Design> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::InvalidDesign("name is required".into()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let design = Design::from_draft(id.clone(), draft, (self.clock)());
        let json = serde_json::to_string(&design)?;
        self.designs.insert(id, json);

        log::info!("saved design {} ({})", design.name, design.id);
        Ok(design)
    }

    fn load_design(&self, id: &str) -> Result<Design> {
        let json = self
            .designs
            .get(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        Self::decode(json)
    }

    fn list_designs(&self) -> Result<Vec<Design>> {
        self.designs.values().map(|json| Self::decode(json)).collect()
    }

    fn update_design(&mut self, id: &str, patch: DesignPatch) -> Result<Design> {
        let mut design = self.load_design(id)?;
        patch.apply(&mut design, (self.clock)());
        let json = serde_json::to_string(&design)?;
        self.designs.insert(id.to_string(), json);

        log::info!("updated design {}", id);
        Ok(design)
    }

    fn delete_design(&mut self, id: &str) -> Result<bool> {
        Ok(self.designs.shift_remove(id).is_some())
    }
}

impl std::fmt::Debug for MemoryDesignStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDesignStore")
            .field("designs", &self.designs.len())
            .finish()
    }
}

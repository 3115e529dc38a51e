//! Pointer events to registry mutations.

use showroom_core::{SceneError, SurfaceId};

use crate::catalog::Catalog;
use crate::registry::{ClickOutcome, SurfaceRegistry};

/// A pointer event hit-tested against a surface by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    HoverEnter(SurfaceId),
    HoverLeave(SurfaceId),
    Click(SurfaceId),
}

impl PointerEvent {
    pub fn surface(&self) -> &SurfaceId {
        match self {
            PointerEvent::HoverEnter(id) | PointerEvent::HoverLeave(id) | PointerEvent::Click(id) => id,
        }
    }
}

/// What handling an event did.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    Hovered(SurfaceId),
    Unhovered,
    Selected(SurfaceId),
    Applied(SurfaceId),
    /// The event had no effect, e.g. it named a surface of a previous room.
    Ignored,
}

/// Translates pointer events into registry operations. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionController;

impl InteractionController {
    pub fn new() -> Self {
        Self
    }

    /// Handle one event.
    ///
    /// Events for surfaces outside the current room are dropped. The only
    /// error is [`SceneError::UnknownTile`], when a click applies an active
    /// tile that has since left the catalog.
    pub fn handle<C: Catalog>(
        &self,
        registry: &mut SurfaceRegistry<C>,
        event: PointerEvent,
    ) -> Result<InteractionOutcome, SceneError> {
        let id = event.surface();
        if !registry.contains_surface(id.as_str()) {
            log::debug!("dropping {:?}: surface not in {}", event, registry.room().as_str());
            return Ok(InteractionOutcome::Ignored);
        }

        match &event {
            PointerEvent::HoverEnter(id) => {
                registry.hover_surface(Some(id.as_str()))?;
                Ok(InteractionOutcome::Hovered(id.clone()))
            }
            PointerEvent::HoverLeave(id) => {
                // Enter of the next surface may arrive before leave of the last.
                if registry.is_hovered(id.as_str()) {
                    registry.hover_surface(None)?;
                    Ok(InteractionOutcome::Unhovered)
                } else {
                    Ok(InteractionOutcome::Ignored)
                }
            }
            PointerEvent::Click(id) => match registry.click(id.as_str())? {
                ClickOutcome::Selected(id) => Ok(InteractionOutcome::Selected(id)),
                ClickOutcome::Applied(id) => Ok(InteractionOutcome::Applied(id)),
            },
        }
    }
}

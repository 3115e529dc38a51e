//! Textures and de-duplicated asynchronous texture loading.
//!
//! A [`TextureHandle`] is a promise-like view over a shared load slot. The
//! cache creates one slot per image reference and hands the matching
//! [`LoadCompletion`] to a [`TextureSource`], which resolves it whenever the
//! image is decoded. Handles can be polled each frame through
//! [`TextureHandle::state`] or awaited as a [`Future`].

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use smallvec::SmallVec;

use showroom_core::TextureLoadError;

/// Identifier of a texture resource, unique within one cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// Texture coordinate wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

/// How texel values should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Display-referred, gamma encoded.
    Srgb,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
    LinearMipmapLinear,
}

/// Sampler configuration uploaded alongside a texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerSettings {
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub color_space: ColorSpace,
    pub anisotropy: u8,
    pub mag_filter: FilterMode,
    pub min_filter: FilterMode,
    pub generate_mipmaps: bool,
}

impl SamplerSettings {
    /// Repeat in both axes, sRGB, trilinear with the given anisotropy.
    pub fn tiled(anisotropy: u8) -> Self {
        Self {
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            color_space: ColorSpace::Srgb,
            anisotropy,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::LinearMipmapLinear,
            generate_mipmaps: true,
        }
    }
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self::tiled(16)
    }
}

/// A decoded image as reported by a [`TextureSource`]. Pixel storage stays
/// with the renderer, keyed by [`TextureId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
}

impl TextureImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A loaded texture owned by the cache.
#[derive(Debug)]
pub struct Texture {
    pub id: TextureId,
    pub image_ref: String,
    pub image: TextureImage,
    pub sampler: SamplerSettings,
    disposed: Cell<bool>,
}

impl Texture {
    pub(crate) fn new(id: TextureId, image_ref: String, image: TextureImage, sampler: SamplerSettings) -> Self {
        Self {
            id,
            image_ref,
            image,
            sampler,
            disposed: Cell::new(false),
        }
    }

    /// Whether the cache has released this texture.
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    pub(crate) fn dispose(&self) {
        self.disposed.set(true);
    }
}

/// Observable state of a texture load.
#[derive(Debug, Clone)]
pub enum TextureState {
    Pending,
    Ready(Rc<Texture>),
    Failed(TextureLoadError),
}

enum SlotState {
    Pending(SmallVec<[Waker; 2]>),
    Ready(Rc<Texture>),
    Failed(TextureLoadError),
}

struct LoadSlot {
    id: TextureId,
    image_ref: String,
    sampler: SamplerSettings,
    state: SlotState,
}

/// Promise-like handle to a texture load. Cloning shares the same load.
#[derive(Clone)]
pub struct TextureHandle {
    slot: Rc<RefCell<LoadSlot>>,
}

impl TextureHandle {
    /// Create a pending slot and the completion that resolves it.
    pub(crate) fn pending(id: TextureId, image_ref: &str, sampler: SamplerSettings) -> (Self, LoadCompletion) {
        let slot = Rc::new(RefCell::new(LoadSlot {
            id,
            image_ref: image_ref.to_string(),
            sampler,
            state: SlotState::Pending(SmallVec::new()),
        }));
        (
            Self { slot: Rc::clone(&slot) },
            LoadCompletion { slot },
        )
    }

    pub fn id(&self) -> TextureId {
        self.slot.borrow().id
    }

    pub fn image_ref(&self) -> String {
        self.slot.borrow().image_ref.clone()
    }

    pub fn state(&self) -> TextureState {
        match &self.slot.borrow().state {
            SlotState::Pending(_) => TextureState::Pending,
            SlotState::Ready(texture) => TextureState::Ready(Rc::clone(texture)),
            SlotState::Failed(err) => TextureState::Failed(err.clone()),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.slot.borrow().state, SlotState::Pending(_))
    }

    /// Fail a load that is still pending so its waiters settle. Returns
    /// `false` if the load had already settled.
    pub(crate) fn cancel(&self, reason: &str) -> bool {
        let wakers = {
            let mut slot = self.slot.borrow_mut();
            if !matches!(slot.state, SlotState::Pending(_)) {
                return false;
            }
            let err = TextureLoadError::new(slot.image_ref.clone(), reason);
            settle(&mut slot, SlotState::Failed(err))
        };
        wake_all(wakers);
        true
    }

    /// Whether two handles refer to the same load.
    pub fn ptr_eq(&self, other: &TextureHandle) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl std::fmt::Debug for TextureHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("TextureHandle")
            .field("id", &slot.id)
            .field("image_ref", &slot.image_ref)
            .field("pending", &matches!(slot.state, SlotState::Pending(_)))
            .finish()
    }
}

impl Future for TextureHandle {
    type Output = Result<Rc<Texture>, TextureLoadError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.borrow_mut();
        match &mut slot.state {
            SlotState::Pending(wakers) => {
                if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
            SlotState::Ready(texture) => Poll::Ready(Ok(Rc::clone(texture))),
            SlotState::Failed(err) => Poll::Ready(Err(err.clone())),
        }
    }
}

/// The write side of a texture load, handed to a [`TextureSource`].
pub struct LoadCompletion {
    slot: Rc<RefCell<LoadSlot>>,
}

impl LoadCompletion {
    pub fn image_ref(&self) -> String {
        self.slot.borrow().image_ref.clone()
    }

    /// Settle the load. Waiting futures are woken afterwards. A load that
    /// was already settled, e.g. cancelled by invalidation, is left as is.
    pub fn resolve(self, result: Result<TextureImage, String>) {
        let wakers = {
            let mut slot = self.slot.borrow_mut();
            if !matches!(slot.state, SlotState::Pending(_)) {
                log::debug!("ignoring late result for {}", slot.image_ref);
                return;
            }
            let next = match result {
                Ok(image) => {
                    log::debug!("texture {} loaded ({}x{})", slot.image_ref, image.width, image.height);
                    SlotState::Ready(Rc::new(Texture::new(slot.id, slot.image_ref.clone(), image, slot.sampler)))
                }
                Err(reason) => {
                    let err = TextureLoadError::new(slot.image_ref.clone(), reason);
                    log::warn!("{}", err);
                    SlotState::Failed(err)
                }
            };
            settle(&mut slot, next)
        };
        wake_all(wakers);
    }
}

fn settle(slot: &mut LoadSlot, next: SlotState) -> SmallVec<[Waker; 2]> {
    match std::mem::replace(&mut slot.state, next) {
        SlotState::Pending(wakers) => wakers,
        _ => SmallVec::new(),
    }
}

fn wake_all(wakers: SmallVec<[Waker; 2]>) {
    for waker in wakers {
        waker.wake();
    }
}

/// Something that can decode images into textures.
///
/// `start` must not block. The source keeps the completion and resolves it
/// once, possibly before `start` returns.
pub trait TextureSource {
    fn start(&self, image_ref: &str, completion: LoadCompletion);
}

impl<F> TextureSource for F
where
    F: Fn(&str, LoadCompletion),
{
    fn start(&self, image_ref: &str, completion: LoadCompletion) {
        self(image_ref, completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_settles_waiters_and_ignores_late_result() {
        let (handle, completion) = TextureHandle::pending(TextureId(7), "/slow.png", SamplerSettings::default());
        let waiter = handle.clone();

        assert!(handle.cancel("invalidated"));
        assert!(!handle.cancel("invalidated"));
        match pollster::block_on(waiter) {
            Err(err) => assert_eq!(err.reason, "invalidated"),
            Ok(_) => panic!("Expected a cancelled load"),
        }

        completion.resolve(Ok(TextureImage::new(64, 64)));
        assert!(matches!(handle.state(), TextureState::Failed(_)));
    }

    #[test]
    fn test_handle_resolves_ready() {
        let (handle, completion) = TextureHandle::pending(TextureId(1), "/a.png", SamplerSettings::default());
        assert!(handle.is_pending());
        completion.resolve(Ok(TextureImage::new(512, 512)));

        match handle.state() {
            TextureState::Ready(tex) => {
                assert_eq!(tex.image_ref, "/a.png");
                assert_eq!(tex.sampler.wrap_s, WrapMode::Repeat);
                assert_eq!(tex.sampler.color_space, ColorSpace::Srgb);
            }
            other => panic!("Expected ready texture, got {:?}", other),
        }
    }

    #[test]
    fn test_handle_await_after_failure() {
        let (handle, completion) = TextureHandle::pending(TextureId(2), "/b.png", SamplerSettings::default());
        let waiting = handle.clone();
        completion.resolve(Err("404".into()));

        let err = pollster::block_on(waiting).unwrap_err();
        assert_eq!(err.image_ref, "/b.png");
        assert_eq!(err.reason, "404");
    }

    #[test]
    fn test_handle_wakes_pending_future() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;
        use std::task::Wake;

        struct Flag(AtomicBool);
        impl Wake for Flag {
            fn wake(self: Arc<Self>) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let (mut handle, completion) = TextureHandle::pending(TextureId(3), "/c.png", SamplerSettings::default());
        let flag = Arc::new(Flag(AtomicBool::new(false)));
        let waker = Waker::from(Arc::clone(&flag));
        let mut cx = Context::from_waker(&waker);

        assert!(Pin::new(&mut handle).poll(&mut cx).is_pending());
        completion.resolve(Ok(TextureImage::new(8, 8)));
        assert!(flag.0.load(Ordering::SeqCst));
        assert!(matches!(Pin::new(&mut handle).poll(&mut cx), Poll::Ready(Ok(_))));
    }
}

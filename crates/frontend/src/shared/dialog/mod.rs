//! Централизованный диалоговый сервис: один слот на всё приложение.
//!
//! Any component may fill the slot through the setters and call [`DialogService::open`];
//! any other component may close it. Dialogs never stack: a second `open`
//! overwrites the same slot, last writer wins. The service is provided via
//! context from the app root ([`crate::app::App`]) and rendered by a single
//! [`DialogHost`].

mod host;

pub use host::DialogHost;

use std::sync::Arc;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Opaque dialog content: a caller-owned view builder. The service never
/// looks inside; the caller keeps its own copy of whatever state it closes
/// over.
pub type DialogBody = Arc<dyn Fn() -> AnyView + Send + Sync>;

type OnClose = Arc<dyn Fn() + Send + Sync>;

/// The single dialog slot. Fields are reachable only through
/// [`DialogService`] setters, so every mutation is observable.
#[derive(Clone, Debug, PartialEq)]
struct DialogSlot {
    is_open: bool,
    is_dismissable: bool,
    title: String,
    description: String,
}

impl DialogSlot {
    fn new() -> Self {
        Self {
            is_open: false,
            is_dismissable: true,
            title: String::new(),
            description: String::new(),
        }
    }

    fn open(&mut self) {
        self.is_open = true;
    }

    fn close(&mut self) {
        self.is_open = false;
    }

    fn set_title(&mut self, title: String) {
        self.title = title;
    }

    fn set_description(&mut self, description: String) {
        self.description = description;
    }

    fn set_dismissable(&mut self, dismissable: bool) {
        self.is_dismissable = dismissable;
    }
}

/// Сервис для централизованного управления диалоговыми окнами.
///
/// Copy-able handle over reactive state; grab it with
/// `use_context::<DialogService>()` anywhere below the app root.
#[derive(Clone, Copy)]
pub struct DialogService {
    slot: RwSignal<DialogSlot>,
    body: RwSignal<Option<DialogBody>>,
    on_close: RwSignal<Option<OnClose>>,
}

impl DialogService {
    pub fn new() -> Self {
        Self {
            slot: RwSignal::new(DialogSlot::new()),
            body: RwSignal::new(None),
            on_close: RwSignal::new(None),
        }
    }

    fn defer(&self, f: impl FnOnce(DialogService) + 'static) {
        let svc = *self;
        spawn_local(async move {
            // Defer to next tick to avoid "closure invoked ... after being dropped"
            // when the dialog is removed synchronously during the originating
            // DOM event dispatch.
            TimeoutFuture::new(0).await;
            f(svc);
        });
    }

    /// Show the dialog with whatever content is currently set. An empty
    /// slot renders an empty dialog; populating it is the caller's job.
    pub fn open(&self) {
        self.slot.update(|slot| slot.open());
    }

    /// Hide the dialog immediately, then fire the registered close
    /// notification exactly once. Slot content survives until the next
    /// writer replaces it.
    pub fn close(&self) {
        self.slot.update(|slot| slot.close());
        let callback = self.on_close.with_untracked(|cb| cb.clone());
        self.on_close.set(None);
        if let Some(callback) = callback {
            callback();
        }
    }

    /// [`Self::close`] on the next tick; DOM event handlers (overlay click,
    /// Escape) must use this variant.
    pub fn close_deferred(&self) {
        self.defer(|svc| svc.close());
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.slot.update(|slot| slot.set_title(title));
    }

    pub fn set_description(&self, description: impl Into<String>) {
        let description = description.into();
        self.slot.update(|slot| slot.set_description(description));
    }

    /// Whether Escape and overlay clicks may close the dialog. Explicit
    /// close (button, `close()`) works regardless.
    pub fn set_dismissable(&self, dismissable: bool) {
        self.slot.update(|slot| slot.set_dismissable(dismissable));
    }

    /// Replace the dialog content with a caller-owned view builder.
    pub fn set_body<F>(&self, builder: F)
    where
        F: Fn() -> AnyView + Send + Sync + 'static,
    {
        self.body.set(Some(Arc::new(builder) as DialogBody));
    }

    /// Register a "backing data may have changed" notification for the
    /// current dialog. Fired once when the dialog closes, then cleared, so
    /// the next dialog starts without it. Replaces the old behavior of
    /// reloading the whole page on close.
    pub fn set_on_close<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_close.set(Some(Arc::new(callback) as OnClose));
    }

    /// Convenience: title, description, body in call order, then `open()`.
    pub fn present<F>(&self, title: impl Into<String>, description: impl Into<String>, body: F)
    where
        F: Fn() -> AnyView + Send + Sync + 'static,
    {
        self.set_title(title);
        self.set_description(description);
        self.set_body(body);
        self.open();
    }

    pub fn is_open(&self) -> bool {
        self.slot.with(|slot| slot.is_open)
    }

    pub fn is_dismissable(&self) -> bool {
        self.slot.with(|slot| slot.is_dismissable)
    }

    pub fn title(&self) -> String {
        self.slot.with(|slot| slot.title.clone())
    }

    pub fn description(&self) -> String {
        self.slot.with(|slot| slot.description.clone())
    }
}

impl Default for DialogService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::DialogSlot;

    #[test]
    fn last_write_before_open_wins() {
        let mut slot = DialogSlot::new();
        slot.set_title("Первый".to_string());
        slot.set_description("Описание".to_string());
        slot.set_title("Второй".to_string());
        slot.open();

        assert!(slot.is_open);
        assert_eq!(slot.title, "Второй");
        assert_eq!(slot.description, "Описание");
    }

    #[test]
    fn close_always_closes() {
        let mut slot = DialogSlot::new();
        slot.close();
        assert!(!slot.is_open);

        slot.open();
        slot.close();
        assert!(!slot.is_open);
    }

    #[test]
    fn reopen_reuses_the_single_slot() {
        let mut slot = DialogSlot::new();
        slot.set_title("Отгрузка".to_string());
        slot.open();
        slot.open();

        assert!(slot.is_open);
        assert_eq!(slot.title, "Отгрузка");
    }

    #[test]
    fn content_survives_close() {
        let mut slot = DialogSlot::new();
        slot.set_title("Накладная".to_string());
        slot.open();
        slot.close();

        assert_eq!(slot.title, "Накладная");
        assert!(!slot.is_open);
    }

    #[test]
    fn empty_dialog_is_legal() {
        let mut slot = DialogSlot::new();
        slot.open();

        assert!(slot.is_open);
        assert!(slot.title.is_empty());
        assert!(slot.description.is_empty());
        assert!(slot.is_dismissable);
    }

    #[test]
    fn dismissable_flag_is_sticky() {
        let mut slot = DialogSlot::new();
        slot.set_dismissable(false);
        slot.open();
        assert!(!slot.is_dismissable);
    }
}

use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;

use super::DialogService;

/// Renders the dialog slot at the application root.
///
/// Must be mounted exactly once.
#[component]
pub fn DialogHost() -> impl IntoView {
    let svc = use_context::<DialogService>()
        .expect("DialogService not provided in context (provide it in app root)");

    // Global Escape handler; only a dismissable dialog reacts.
    Effect::new(move |_| {
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if let Some(keyboard_event) = event.dyn_ref::<KeyboardEvent>() {
                if keyboard_event.key() == "Escape" {
                    let closable = svc
                        .slot
                        .with_untracked(|slot| slot.is_open && slot.is_dismissable);
                    if closable {
                        svc.close_deferred();
                    }
                }
            }
        }) as Box<dyn FnMut(_)>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            // DialogHost is mounted once for the whole app lifetime; keep closure alive.
            closure.forget();
        }
    });

    let overlay_mouse_down = RwSignal::new(false);

    let is_direct_overlay_event = |ev: &ev::MouseEvent| -> bool {
        match (ev.target(), ev.current_target()) {
            (Some(t), Some(ct)) => t == ct,
            _ => false,
        }
    };

    let handle_overlay_mouse_down = move |ev: ev::MouseEvent| {
        overlay_mouse_down.set(is_direct_overlay_event(&ev));
    };

    // Close only if both press and release landed on the overlay itself:
    // selecting text inside the dialog and releasing outside must not close it.
    let handle_overlay_click = move |ev: ev::MouseEvent| {
        let should_close = svc.slot.with_untracked(|slot| slot.is_dismissable)
            && overlay_mouse_down.get()
            && is_direct_overlay_event(&ev);
        overlay_mouse_down.set(false);
        if should_close {
            svc.close_deferred();
        }
    };

    let stop_propagation = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
    };

    // The explicit close button works even for non-dismissable dialogs.
    let handle_close = move |_| {
        svc.close_deferred();
    };

    view! {
        <Show when=move || svc.is_open()>
            <div
                class="modal-overlay"
                on:mousedown=handle_overlay_mouse_down
                on:click=handle_overlay_click
            >
                <div class="modal" on:click=stop_propagation>
                    <div class="modal-header">
                        <h2 class="modal-title">{move || svc.title()}</h2>
                        <button class="button button--icon modal__close" on:click=handle_close>
                            "\u{00d7}"
                        </button>
                    </div>
                    <Show when=move || !svc.description().is_empty()>
                        <p class="modal-description">{move || svc.description()}</p>
                    </Show>
                    <div class="modal-body">
                        {move || svc.body.get().map(|body| body())}
                    </div>
                </div>
            </div>
        </Show>
    }
}

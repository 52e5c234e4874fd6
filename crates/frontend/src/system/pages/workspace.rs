use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::dialog::DialogService;
use crate::system::auth::context::{use_auth, AuthState};
use crate::system::auth::{api as auth_api, storage};
use crate::system::users::ui::change_password::ChangePasswordForm;

/// Top-level authenticated view: session bar plus the mount point for
/// domain pages.
#[component]
pub fn WorkspacePage() -> impl IntoView {
    let (auth_state, set_auth_state) = use_auth();
    let dialogs = use_context::<DialogService>().expect("DialogService not provided in context");

    let on_change_password = move |_| {
        let Some(user) = auth_state.get_untracked().user else {
            return;
        };
        let user_id = user.id;

        dialogs.set_dismissable(true);
        // Перечитываем профиль после закрытия диалога.
        dialogs.set_on_close(move || {
            spawn_local(async move {
                if let Ok(user) = auth_api::current_user().await {
                    set_auth_state.set(AuthState { user: Some(user) });
                }
            });
        });
        dialogs.present(
            "Смена пароля",
            format!("Пользователь: {}", user.username),
            move || view! { <ChangePasswordForm user_id=user_id/> }.into_any(),
        );
    };

    let on_logout = move |_| {
        spawn_local(async move {
            // Best effort: the local session ends even if the server call fails.
            let _ = auth_api::logout().await;
            storage::clear_token();
            set_auth_state.set(AuthState::default());
        });
    };

    view! {
        <div class="workspace">
            <header class="workspace__topbar">
                <span class="workspace__title">"Учёт производства и отгрузок"</span>
                <div class="workspace__session">
                    <span class="workspace__user">
                        {move || {
                            auth_state
                                .get()
                                .user
                                .map(|u| u.full_name.unwrap_or(u.username))
                                .unwrap_or_default()
                        }}
                    </span>
                    <button class="button" on:click=on_change_password>
                        "Сменить пароль"
                    </button>
                    <button class="button" on:click=on_logout>
                        "Выйти"
                    </button>
                </div>
            </header>
            <main class="workspace__content">
                // Доменные страницы монтируются сюда.
            </main>
        </div>
    }
}

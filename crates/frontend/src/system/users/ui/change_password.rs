use contracts::system::users::ChangePasswordDto;
use leptos::prelude::*;
use leptos::task::spawn_local;
use uuid::Uuid;

use crate::shared::dialog::DialogService;
use crate::system::users::api;

/// Password form rendered inside the shared dialog slot. Closes the dialog
/// on success; failures stay inline so the user can retry.
#[component]
pub fn ChangePasswordForm(user_id: Uuid) -> impl IntoView {
    let (current_password, set_current_password) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_saving, set_is_saving) = signal(false);

    let dialogs = use_context::<DialogService>().expect("DialogService not provided in context");

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let dto = ChangePasswordDto {
            user_id,
            current_password: current_password.get(),
            new_password: new_password.get(),
        };

        set_is_saving.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            match api::change_password(&dto).await {
                Ok(()) => {
                    dialogs.close_deferred();
                }
                Err(err) => {
                    set_error_message.set(Some(err.to_string()));
                    set_is_saving.set(false);
                }
            }
        });
    };

    view! {
        <form class="change-password" on:submit=on_submit>
            <Show when=move || error_message.get().is_some()>
                <div class="error-message">
                    {move || error_message.get().unwrap_or_default()}
                </div>
            </Show>

            <div class="form-group">
                <label for="current-password">"Текущий пароль"</label>
                <input
                    type="password"
                    id="current-password"
                    value=move || current_password.get()
                    on:input=move |ev| set_current_password.set(event_target_value(&ev))
                    required
                    disabled=move || is_saving.get()
                />
            </div>

            <div class="form-group">
                <label for="new-password">"Новый пароль"</label>
                <input
                    type="password"
                    id="new-password"
                    value=move || new_password.get()
                    on:input=move |ev| set_new_password.set(event_target_value(&ev))
                    required
                    disabled=move || is_saving.get()
                />
            </div>

            <button type="submit" class="btn-primary" disabled=move || is_saving.get()>
                {move || if is_saving.get() { "Сохранение..." } else { "Сохранить" }}
            </button>
        </form>
    }
}

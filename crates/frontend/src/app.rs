use leptos::prelude::*;

use crate::shared::dialog::{DialogHost, DialogService};
use crate::system::auth::context::AuthProvider;
use crate::system::auth::guard::RequireAuth;
use crate::system::pages::login::LoginPage;
use crate::system::pages::workspace::WorkspacePage;

#[component]
pub fn App() -> impl IntoView {
    // Provide the dialog service to the whole app via context.
    provide_context(DialogService::new());

    view! {
        <AuthProvider>
            <DialogHost/>
            <RequireAuth fallback=|| view! { <LoginPage/> }.into_any()>
                <WorkspacePage/>
            </RequireAuth>
        </AuthProvider>
    }
}

use crate::pages::BoardPage;
use crate::state::{AppContext, AppState, NoteSyncController};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext(AppState::new());
    provide_context(ctx.clone());
    provide_context(NoteSyncController::new(ctx));

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks require a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-zinc-500">"Not found"</div> }>
                <Route path=path!("") view=BoardPage />
            </Routes>
        </Router>
    }
}

use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;
use std::sync::Arc;

mod api;
mod components;
mod session;

use api::ApiClient;
use components::category_fields::{SchemaFetcher, SharedSchemaFetcher};
use components::product_form::ProductForm;
use session::{Session, SessionContext};

#[component]
pub fn App() -> impl IntoView {
    let session = SessionContext::provide(Session::from_local_storage());
    let fetcher: SharedSchemaFetcher = Arc::new(SchemaFetcher::new(ApiClient::default()));
    provide_context(fetcher);

    view! {
        <Router>
            <div class="flex h-screen bg-gray-100">
                // Sidebar
                <div class="w-64 bg-gray-800 text-white p-4 flex flex-col">
                    <h1 class="text-2xl font-bold mb-8">"RetailCloud"</h1>
                    <nav class="space-y-1 flex-1">
                        <NavLink href="/products/new" label="New Product" />
                    </nav>
                    <div class="text-xs text-gray-500 mt-4">
                        {move || match session.current() {
                            Some(s) => format!("Tenant: {}", s.tenant_id),
                            None => "Not signed in".to_string(),
                        }}
                    </div>
                </div>

                // Main Content
                <div class="flex-1 overflow-y-auto">
                    <Routes fallback=|| "Not found.">
                        <Route path=path!("/") view=ProductForm/>
                        <Route path=path!("/products/new") view=ProductForm/>
                    </Routes>
                </div>
            </div>
        </Router>
    }
}

#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A href=href attr:class="block p-2 hover:bg-gray-700 rounded transition-colors">
            {label}
        </A>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    if let Err(e) = console_log::init_with_level(level) {
        leptos::logging::warn!("Console logger already initialized: {}", e);
    }
    leptos::mount::mount_to_body(App);
}

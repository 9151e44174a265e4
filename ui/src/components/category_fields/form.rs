//! Category Fields Component
//!
//! Loads the signed-in tenant's category schema and renders its fields,
//! with a tab bar when the schema has more than one section.

use leptos::prelude::*;
use std::sync::Arc;

use crate::session::SessionContext;

use super::fetcher::{FetchHandle, FetchOutcome, SharedSchemaFetcher};
use super::fields::CategoryField;
use super::navigator::SectionNavigator;
use super::types::*;

#[derive(Clone)]
enum SchemaState {
    Loaded(Arc<SchemaResponse>),
    /// No session, or the tenant has no category fields
    Empty,
    Pending,
}

/// Tenant-specific category fields bound to a parent form.
///
/// The parent owns the values and errors and receives every edit through
/// `on_change`. Renders nothing when there is no session or the tenant has no
/// category fields.
#[component]
pub fn CategoryFields(
    /// Current field values, keyed by field key
    #[prop(into, default = Signal::stored(FormValues::new()))]
    form_data: Signal<FormValues>,
    /// Validation messages, keyed by field key
    #[prop(into, default = Signal::stored(FormErrors::new()))]
    errors: Signal<FormErrors>,
    /// Called once per edit with `(key, value)`
    on_change: Callback<FieldChange>,
) -> impl IntoView {
    let (Some(session), Some(fetcher)) = (
        use_context::<SessionContext>(),
        use_context::<SharedSchemaFetcher>(),
    ) else {
        log::warn!("CategoryFields mounted without a session or schema fetcher in context");
        return ().into_any();
    };

    let handle = FetchHandle::new();
    on_cleanup({
        let handle = handle.clone();
        move || handle.cancel()
    });

    let schema = LocalResource::new(move || {
        let session = session.current();
        let fetcher = fetcher.clone();
        let handle = handle.clone();
        async move {
            let Some(session) = session else {
                return SchemaState::Empty;
            };
            match fetcher.load(&session, &handle).await {
                Ok(FetchOutcome::Ready(Some(schema))) => SchemaState::Loaded(schema),
                Ok(FetchOutcome::Ready(None)) => SchemaState::Empty,
                Ok(FetchOutcome::Cancelled) => SchemaState::Pending,
                Err(e) => {
                    log::error!("Failed to load category fields: {}", e);
                    SchemaState::Pending
                }
            }
        }
    });

    view! {
        <Suspense fallback=move || view! { <LoadingFields/> }>
            {move || match schema.get() {
                Some(SchemaState::Loaded(schema)) => view! {
                    <SectionedFields
                        schema=schema
                        form_data=form_data
                        errors=errors
                        on_change=on_change
                    />
                }.into_any(),
                Some(SchemaState::Empty) => ().into_any(),
                // Failed or abandoned loads keep the loading state
                Some(SchemaState::Pending) | None => view! { <LoadingFields/> }.into_any(),
            }}
        </Suspense>
    }
    .into_any()
}

#[component]
fn LoadingFields() -> impl IntoView {
    view! { <div class="text-sm text-gray-500">"Loading category fields..."</div> }
}

/// Tab bar (when needed) plus the visible fields of a loaded schema
#[component]
fn SectionedFields(
    schema: Arc<SchemaResponse>,
    form_data: Signal<FormValues>,
    errors: Signal<FormErrors>,
    on_change: Callback<FieldChange>,
) -> impl IntoView {
    let navigator = RwSignal::new(SectionNavigator::new());
    let header = schema.category_name.clone();

    let tabs_schema = schema.clone();
    let tabs = move || {
        let tabs = navigator.with(|nav| nav.layout(&tabs_schema).tabs().to_vec());
        (!tabs.is_empty()).then(|| view! {
            <div class="border-b border-gray-200 mb-4">
                <nav class="flex -mb-px space-x-6">
                    {tabs.into_iter().map(|tab| {
                        let name = tab.name.clone();
                        view! {
                            <button
                                type="button"
                                class=format!(
                                    "py-2 px-1 border-b-2 font-medium text-sm transition-colors {}",
                                    if tab.active {
                                        "border-blue-500 text-blue-600"
                                    } else {
                                        "border-transparent text-gray-500 hover:text-gray-700 hover:border-gray-300"
                                    }
                                )
                                on:click=move |_| navigator.update(|nav| nav.select(name.clone()))
                            >
                                {tab.label}
                                <span class="ml-1 text-xs text-gray-400">{format!("({})", tab.field_count)}</span>
                            </button>
                        }
                    }).collect_view()}
                </nav>
            </div>
        })
    };

    let fields = move || {
        let visible = navigator.with(|nav| nav.layout(&schema).fields().to_vec());
        visible
            .into_iter()
            .map(|descriptor| view! {
                <CategoryField
                    descriptor=descriptor
                    form_data=form_data
                    errors=errors
                    on_change=on_change
                />
            })
            .collect_view()
    };

    view! {
        <section class="category-fields">
            <h3 class="text-sm font-semibold text-gray-700 mb-3">{header}</h3>
            {tabs}
            <div class="grid grid-cols-6 gap-4">{fields}</div>
        </section>
    }
}

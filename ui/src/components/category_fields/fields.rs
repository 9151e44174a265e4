//! Category Field Components
//!
//! DOM rendering of a [`FieldView`]. The element kind is fixed when the field
//! mounts; values, checked state and error text stay reactive so typing never
//! recreates the input underneath the cursor.

use leptos::prelude::*;
use leptos::web_sys;
use wasm_bindgen::JsCast;

use super::render::*;
use super::types::*;

const CONTROL_BASE: &str =
    "w-full px-3 py-2 text-sm border rounded-md focus:outline-none focus:ring-2";

// ============================================================================
// Field Wrapper
// ============================================================================

/// One category field bound to the parent's form state
#[component]
pub fn CategoryField(
    descriptor: FieldDescriptor,
    #[prop(into)] form_data: Signal<FormValues>,
    #[prop(into)] errors: Signal<FormErrors>,
    on_change: Callback<FieldChange>,
) -> impl IntoView {
    let key = descriptor.key.clone();

    let initial = form_data.with_untracked(|values| {
        errors.with_untracked(|errs| {
            render_field(&descriptor, values.get(&key), errs.get(&key).map(String::as_str))
        })
    });
    let Some(initial) = initial else {
        return ().into_any();
    };

    let view_key = key.clone();
    let field_view = Memo::new(move |_| {
        form_data.with(|values| {
            errors.with(|errs| {
                render_field(
                    &descriptor,
                    values.get(&view_key),
                    errs.get(&view_key).map(String::as_str),
                )
            })
        })
    });

    let emit = move |event: ControlEvent| dispatch_change(&key, event, |change| on_change.run(change));
    let error_text = move || field_view.with(|v| v.as_ref().and_then(|v| v.error.clone()));
    let state_class = move || {
        field_view.with(|v| v.as_ref().map(FieldView::state_class).unwrap_or_default())
    };

    let input_id = initial.input_id();
    let is_checkbox = matches!(initial.control, Control::Checkbox { .. });

    let control = match initial.control.clone() {
        Control::Input { input_type, step, placeholder, .. } => view! {
            <input
                id=input_id.clone()
                type=input_type
                step=step
                placeholder=placeholder.unwrap_or_default()
                class=move || format!("{} {}", CONTROL_BASE, state_class())
                prop:value=move || field_view.with(|v| v.as_ref().map(|v| v.control.text_value()).unwrap_or_default())
                on:input=move |ev| emit(ControlEvent::Input(event_target_value(&ev)))
            />
        }.into_any(),
        Control::Checkbox { .. } => view! {
            <input
                id=input_id.clone()
                type="checkbox"
                class="h-4 w-4 text-blue-600 focus:ring-blue-500 border-gray-300 rounded"
                prop:checked=move || field_view.with(|v| v.as_ref().is_some_and(|v| v.control.is_checked()))
                on:change=move |ev| emit(ControlEvent::Toggled(event_target_checked(&ev)))
            />
        }.into_any(),
        Control::Select { options, .. } => view! {
            <select
                id=input_id.clone()
                class=move || format!("{} bg-white {}", CONTROL_BASE, state_class())
                on:change=move |ev| emit(ControlEvent::Selected(event_target_value(&ev)))
            >
                <option
                    value=NO_SELECTION
                    prop:selected=move || field_view.with(|v| v.as_ref().is_some_and(|v| v.control.is_selected(NO_SELECTION)))
                >
                    "-- Select --"
                </option>
                {options.into_iter().map(|opt| {
                    let value = opt.value.clone();
                    view! {
                        <option
                            value=opt.value
                            prop:selected=move || field_view.with(|v| v.as_ref().is_some_and(|v| v.control.is_selected(&value)))
                        >
                            {opt.label}
                        </option>
                    }
                }).collect_view()}
            </select>
        }.into_any(),
        Control::MultiSelect { options, .. } => view! {
            <select
                id=input_id.clone()
                multiple=true
                class=move || format!("{} bg-white {}", CONTROL_BASE, state_class())
                on:change=move |ev| {
                    let select = event_target::<web_sys::HtmlSelectElement>(&ev);
                    emit(ControlEvent::SelectedMany(selected_values(&select)));
                }
            >
                {options.into_iter().map(|opt| {
                    let value = opt.value.clone();
                    view! {
                        <option
                            value=opt.value
                            prop:selected=move || field_view.with(|v| v.as_ref().is_some_and(|v| v.control.is_selected(&value)))
                        >
                            {opt.label}
                        </option>
                    }
                }).collect_view()}
            </select>
        }.into_any(),
        Control::TextArea { rows, placeholder, .. } => view! {
            <textarea
                id=input_id.clone()
                rows=rows.to_string()
                placeholder=placeholder.unwrap_or_default()
                class=move || format!("{} {}", CONTROL_BASE, state_class())
                prop:value=move || field_view.with(|v| v.as_ref().map(|v| v.control.text_value()).unwrap_or_default())
                on:input=move |ev| emit(ControlEvent::Input(event_target_value(&ev)))
            />
        }.into_any(),
        Control::File { .. } => view! {
            <div class="flex items-center gap-3">
                <input
                    id=input_id.clone()
                    type="file"
                    class="text-sm text-gray-700"
                    on:change=move |ev| {
                        let input = event_target::<web_sys::HtmlInputElement>(&ev);
                        if let Some(name) = picked_file_name(&input) {
                            emit(ControlEvent::FilePicked(name));
                        }
                    }
                />
                <span class="text-xs text-gray-500 truncate">
                    {move || field_view.with(|v| match v.as_ref().map(|v| &v.control) {
                        Some(Control::File { current: Some(name) }) => name.clone(),
                        _ => String::new(),
                    })}
                </span>
            </div>
        }.into_any(),
    };

    let label = view! {
        <label for=input_id class="block text-sm font-medium text-gray-700">
            {initial.label.clone()}
            {initial.required.then(|| view! { <span class="text-red-500 ml-0.5">"*"</span> })}
        </label>
    };

    view! {
        <div class=initial.width.grid_class()>
            {if is_checkbox {
                view! { <div class="flex items-center gap-2 mt-6">{control}{label}</div> }.into_any()
            } else {
                view! { <div class="space-y-1">{label}{control}</div> }.into_any()
            }}
            {initial.help_text.clone().map(|help| view! {
                <p class="mt-1 text-xs text-gray-500">{help}</p>
            })}
            {move || error_text().map(|err| view! {
                <p class="mt-1 text-xs text-red-600">{err}</p>
            })}
        </div>
    }
    .into_any()
}

// ============================================================================
// DOM helpers
// ============================================================================

fn selected_values(select: &web_sys::HtmlSelectElement) -> Vec<String> {
    let selected = select.selected_options();
    (0..selected.length())
        .filter_map(|i| selected.item(i))
        .filter_map(|el| el.dyn_into::<web_sys::HtmlOptionElement>().ok())
        .map(|opt| opt.value())
        .collect()
}

/// Display name of the first picked file; the file itself is never read
fn picked_file_name(input: &web_sys::HtmlInputElement) -> Option<String> {
    input.files().and_then(|files| files.get(0)).map(|file| file.name())
}

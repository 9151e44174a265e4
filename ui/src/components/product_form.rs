use leptos::prelude::*;
use serde_json::{Map, Value};

use crate::components::category_fields::{CategoryFields, FieldChange, FormErrors, FormValues};

const BASE_FIELDS: [(&str, &str); 2] = [("name", "Product name"), ("sku", "SKU")];

/// Product editor. Owns the form state that the category fields bind to.
#[component]
pub fn ProductForm() -> impl IntoView {
    let form_data = RwSignal::new(FormValues::new());
    let errors = RwSignal::new(FormErrors::new());
    let (submitted, set_submitted) = signal(Option::<String>::None);

    let on_change = Callback::new(move |(key, value): FieldChange| {
        errors.update(|errs| {
            errs.remove(&key);
        });
        form_data.update(|values| {
            values.insert(key, value);
        });
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let missing = form_data.with(|values| missing_base_fields(values));
        if !missing.is_empty() {
            errors.update(|errs| {
                for key in missing {
                    errs.insert(key.to_string(), "Required".to_string());
                }
            });
            set_submitted.set(None);
            return;
        }
        let payload = form_data.with(to_payload);
        match serde_json::to_string_pretty(&payload) {
            Ok(json) => set_submitted.set(Some(json)),
            Err(e) => log::error!("Failed to serialize product payload: {}", e),
        }
    };

    view! {
        <div class="p-6 max-w-4xl mx-auto">
            <h2 class="text-2xl font-bold mb-6">"New Product"</h2>

            <form on:submit=on_submit class="bg-white rounded-lg shadow p-6 space-y-6">
                <div class="grid grid-cols-6 gap-4">
                    {BASE_FIELDS.into_iter().map(|(key, label)| view! {
                        <div class="col-span-6 md:col-span-3 space-y-1">
                            <label for=key class="block text-sm font-medium text-gray-700">
                                {label}<span class="text-red-500 ml-0.5">"*"</span>
                            </label>
                            <input
                                id=key
                                type="text"
                                class=move || format!(
                                    "w-full px-3 py-2 text-sm border rounded-md focus:outline-none focus:ring-2 {}",
                                    if errors.with(|e| e.contains_key(key)) { "border-red-500" } else { "border-gray-300" }
                                )
                                prop:value=move || form_data.with(|v| {
                                    v.get(key).and_then(Value::as_str).map(String::from).unwrap_or_default()
                                })
                                on:input=move |ev| on_change.run((key.to_string(), Value::String(event_target_value(&ev))))
                            />
                            {move || errors.with(|e| e.get(key).cloned()).map(|err| view! {
                                <p class="mt-1 text-xs text-red-600">{err}</p>
                            })}
                        </div>
                    }).collect_view()}
                </div>

                <CategoryFields form_data=form_data errors=errors on_change=on_change />

                <div class="flex justify-end">
                    <button type="submit" class="px-4 py-2 bg-blue-600 text-white rounded-md hover:bg-blue-700">
                        "Save"
                    </button>
                </div>
            </form>

            {move || submitted.get().map(|json| view! {
                <div class="mt-6">
                    <h3 class="text-sm font-semibold text-gray-700 mb-2">"Submitted payload"</h3>
                    <pre class="bg-gray-900 text-green-200 text-xs p-4 rounded-md overflow-x-auto">{json}</pre>
                </div>
            })}
        </div>
    }
}

fn missing_base_fields(values: &FormValues) -> Vec<&'static str> {
    BASE_FIELDS
        .iter()
        .map(|(key, _)| *key)
        .filter(|key| {
            values
                .get(*key)
                .and_then(Value::as_str)
                .map_or(true, |s| s.trim().is_empty())
        })
        .collect()
}

/// Form values as a JSON object with keys in a stable order
fn to_payload(values: &FormValues) -> Value {
    let mut keys: Vec<&String> = values.keys().collect();
    keys.sort();
    let map: Map<String, Value> = keys
        .into_iter()
        .map(|key| (key.clone(), values[key].clone()))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_base_fields() {
        let mut values = FormValues::new();
        assert_eq!(missing_base_fields(&values), vec!["name", "sku"]);

        values.insert("name".into(), json!("Aspirin"));
        values.insert("sku".into(), json!("  "));
        assert_eq!(missing_base_fields(&values), vec!["sku"]);

        values.insert("sku".into(), json!("ASP-100"));
        assert!(missing_base_fields(&values).is_empty());
    }

    #[test]
    fn test_payload_contains_every_value() {
        let values: FormValues = [
            ("sku".to_string(), json!("ASP-100")),
            ("controlled".to_string(), json!(true)),
        ]
        .into();
        assert_eq!(to_payload(&values), json!({ "controlled": true, "sku": "ASP-100" }));
    }
}

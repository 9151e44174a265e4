//! Field rendering model
//!
//! Maps a [`FieldDescriptor`] plus the parent's current value and error into a
//! plain description of the control to draw. The Leptos components in
//! `fields.rs` only translate this description into DOM, so every rendering
//! rule lives here and is testable without a browser.

use serde_json::Value;

use super::types::*;

/// Visible rows of a textarea control
pub const TEXTAREA_ROWS: u32 = 3;

/// Step attribute of a `number` field
pub const NUMBER_STEP: &str = "any";

/// Step attribute of a `decimal` field
pub const DECIMAL_STEP: &str = "0.01";

/// Value of the "no selection" entry of a select control
pub const NO_SELECTION: &str = "";

// ============================================================================
// Control Model
// ============================================================================

/// The input control a field renders as, with its current state
#[derive(Clone, Debug, PartialEq)]
pub enum Control {
    /// Single-line `<input>` (text, number, decimal, date)
    Input {
        input_type: &'static str,
        step: Option<&'static str>,
        value: String,
        placeholder: Option<String>,
    },
    Checkbox {
        checked: bool,
    },
    /// `selected` is [`NO_SELECTION`] when nothing is chosen
    Select {
        options: Vec<FieldOption>,
        selected: String,
    },
    MultiSelect {
        options: Vec<FieldOption>,
        selected: Vec<String>,
    },
    TextArea {
        rows: u32,
        value: String,
        placeholder: Option<String>,
    },
    /// `current` is the display name last reported for the field, if any
    File {
        current: Option<String>,
    },
}

impl Control {
    /// Text shown inside an input or textarea
    pub fn text_value(&self) -> String {
        match self {
            Control::Input { value, .. } | Control::TextArea { value, .. } => value.clone(),
            Control::Select { selected, .. } => selected.clone(),
            _ => String::new(),
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, Control::Checkbox { checked: true })
    }

    pub fn is_selected(&self, option_value: &str) -> bool {
        match self {
            Control::Select { selected, .. } => selected == option_value,
            Control::MultiSelect { selected, .. } => selected.iter().any(|v| v == option_value),
            _ => false,
        }
    }
}

/// Everything needed to draw one field
#[derive(Clone, Debug, PartialEq)]
pub struct FieldView {
    pub key: String,
    pub label: String,
    pub required: bool,
    pub help_text: Option<String>,
    pub width: FieldWidth,
    pub error: Option<String>,
    pub control: Control,
}

impl FieldView {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// DOM id of the control, used by the label's `for`
    pub fn input_id(&self) -> String {
        format!("category-field-{}", self.key)
    }

    /// Border classes reflecting the error state
    pub fn state_class(&self) -> &'static str {
        if self.has_error() {
            "border-red-500 focus:ring-red-500"
        } else {
            "border-gray-300 focus:ring-blue-500"
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Build the view of a field, or `None` when its type is not recognized.
///
/// `value` and `error` are the parent's entries for `descriptor.key`; a
/// missing error means "no message", not "valid".
pub fn render_field(
    descriptor: &FieldDescriptor,
    value: Option<&Value>,
    error: Option<&str>,
) -> Option<FieldView> {
    let control = match &descriptor.field_type {
        FieldType::Text => single_line("text", None, descriptor, value),
        FieldType::Number => single_line("number", Some(NUMBER_STEP), descriptor, value),
        FieldType::Decimal => single_line("number", Some(DECIMAL_STEP), descriptor, value),
        FieldType::Date => single_line("date", None, descriptor, value),
        FieldType::Boolean => Control::Checkbox {
            checked: value.is_some_and(is_truthy),
        },
        FieldType::Select => Control::Select {
            options: selectable_options(&descriptor.options),
            selected: value.map(display_value).unwrap_or_default(),
        },
        FieldType::MultiSelect => Control::MultiSelect {
            options: selectable_options(&descriptor.options),
            selected: value.map(selection_of).unwrap_or_default(),
        },
        FieldType::TextArea => Control::TextArea {
            rows: TEXTAREA_ROWS,
            value: value.map(display_value).unwrap_or_default(),
            placeholder: descriptor.placeholder.clone(),
        },
        FieldType::File => Control::File {
            current: value.map(display_value).filter(|name| !name.is_empty()),
        },
        FieldType::Unknown(type_name) => {
            note_unsupported(&descriptor.key, type_name);
            return None;
        }
    };

    Some(FieldView {
        key: descriptor.key.clone(),
        label: descriptor.label.clone(),
        required: descriptor.required,
        help_text: descriptor.help_text.clone(),
        width: descriptor.width(),
        error: error.map(String::from),
        control,
    })
}

#[cfg(debug_assertions)]
fn note_unsupported(key: &str, type_name: &str) {
    log::debug!(
        "Skipping category field '{}' with unsupported type '{}'",
        key,
        type_name
    );
}

#[cfg(not(debug_assertions))]
fn note_unsupported(_key: &str, _type_name: &str) {}

fn single_line(
    input_type: &'static str,
    step: Option<&'static str>,
    descriptor: &FieldDescriptor,
    value: Option<&Value>,
) -> Control {
    Control::Input {
        input_type,
        step,
        value: value.map(display_value).unwrap_or_default(),
        placeholder: descriptor.placeholder.clone(),
    }
}

/// Options minus any whose value collides with the "no selection" entry
fn selectable_options(options: &[FieldOption]) -> Vec<FieldOption> {
    options
        .iter()
        .filter(|opt| opt.value != NO_SELECTION)
        .cloned()
        .collect()
}

/// JavaScript truthiness of a form value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String shown for a scalar value; `null` shows as empty and whole
/// floats drop their fraction (`10.0` shows as `10`)
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Selected option values of a multiselect; anything but an array is empty
pub fn selection_of(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(display_value).collect(),
        _ => Vec::new(),
    }
}

// ============================================================================
// Change Events
// ============================================================================

/// What the user did to a control
#[derive(Clone, Debug, PartialEq)]
pub enum ControlEvent {
    /// New text of an input or textarea, passed through unparsed
    Input(String),
    Toggled(bool),
    Selected(String),
    SelectedMany(Vec<String>),
    /// Display name of the picked file
    FilePicked(String),
}

impl ControlEvent {
    pub fn into_value(self) -> Value {
        match self {
            ControlEvent::Input(text) | ControlEvent::Selected(text) => Value::String(text),
            ControlEvent::Toggled(checked) => Value::Bool(checked),
            ControlEvent::SelectedMany(values) => {
                Value::Array(values.into_iter().map(Value::String).collect())
            }
            ControlEvent::FilePicked(name) => Value::String(name),
        }
    }
}

/// Report a control event to the parent as exactly one `(key, value)` change
pub fn dispatch_change<F>(key: &str, event: ControlEvent, mut on_change: F)
where
    F: FnMut(FieldChange),
{
    on_change((key.to_string(), event.into_value()));
}

// ============================================================================
// Tests
// ============================================================================

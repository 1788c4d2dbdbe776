//! Form element model: element types, positions, validation, and styling.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::ORDER_TOLERANCE;

/// The closed set of element types a form can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Text,
    Email,
    Phone,
    Number,
    Date,
    Textarea,
    Dropdown,
    Radio,
    Checkbox,
    Section,
    Heading,
    Divider,
    File,
}

impl ElementType {
    /// Default display label used when an element of this type is created.
    pub fn default_label(&self) -> &'static str {
        match self {
            ElementType::Text => "Text Input",
            ElementType::Email => "Email",
            ElementType::Phone => "Phone Number",
            ElementType::Number => "Number",
            ElementType::Date => "Date",
            ElementType::Textarea => "Paragraph",
            ElementType::Dropdown => "Dropdown",
            ElementType::Radio => "Multiple Choice",
            ElementType::Checkbox => "Checkboxes",
            ElementType::Section => "Section",
            ElementType::Heading => "Heading",
            ElementType::Divider => "Divider",
            ElementType::File => "File Upload",
        }
    }

    /// Default placeholder text, where the type renders one.
    pub fn default_placeholder(&self) -> Option<&'static str> {
        match self {
            ElementType::Text => Some("Enter text"),
            ElementType::Email => Some("name@example.com"),
            ElementType::Phone => Some("(555) 000-0000"),
            ElementType::Number => Some("0"),
            ElementType::Textarea => Some("Enter a longer answer"),
            ElementType::Dropdown => Some("Select an option"),
            _ => None,
        }
    }

    /// Default free-form properties for a freshly created element.
    ///
    /// Choice-type elements start with a small option list; everything else
    /// starts empty.
    pub fn default_properties(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut props = serde_json::Map::new();
        match self {
            ElementType::Dropdown | ElementType::Radio | ElementType::Checkbox => {
                props.insert(
                    "options".to_string(),
                    serde_json::json!(["Option 1", "Option 2", "Option 3"]),
                );
            }
            ElementType::Heading => {
                props.insert("level".to_string(), serde_json::json!(2));
            }
            _ => {}
        }
        props
    }

    /// Whether this element type can contain other elements.
    pub fn is_container(&self) -> bool {
        matches!(self, ElementType::Section)
    }

    /// Whether this element type collects user input (as opposed to layout
    /// and presentation types).
    pub fn is_input(&self) -> bool {
        !matches!(
            self,
            ElementType::Section | ElementType::Heading | ElementType::Divider
        )
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementType::Text => "text",
            ElementType::Email => "email",
            ElementType::Phone => "phone",
            ElementType::Number => "number",
            ElementType::Date => "date",
            ElementType::Textarea => "textarea",
            ElementType::Dropdown => "dropdown",
            ElementType::Radio => "radio",
            ElementType::Checkbox => "checkbox",
            ElementType::Section => "section",
            ElementType::Heading => "heading",
            ElementType::Divider => "divider",
            ElementType::File => "file",
        };
        write!(f, "{}", name)
    }
}

/// Canvas position of an element.
///
/// `x`/`y` are free-form spatial coordinates used for drag feedback and
/// alignment. `order` is the authoritative sequencing key whenever two
/// elements sit within [`ORDER_TOLERANCE`] of each other vertically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementPosition {
    pub x: f64,
    pub y: f64,
    pub order: u32,
}

impl ElementPosition {
    /// Creates a new position.
    pub fn new(x: f64, y: f64, order: u32) -> Self {
        Self { x, y, order }
    }

    /// Sequencing comparison: `order` wins inside the vertical tolerance
    /// band, raw `y` outside it.
    pub fn sequence_cmp(&self, other: &Self) -> std::cmp::Ordering {
        if (self.y - other.y).abs() <= ORDER_TOLERANCE {
            self.order.cmp(&other.order)
        } else {
            self.y.partial_cmp(&other.y).unwrap_or(std::cmp::Ordering::Equal)
        }
    }
}

impl Default for ElementPosition {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, order: 0 }
    }
}

/// A single validation rule attached to an element.
///
/// Rules are carried as data; evaluation belongs to the surrounding
/// application, not this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Rule identifier, e.g. `"min_length"` or `"pattern"`.
    pub kind: String,
    /// Optional rule parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Optional user-facing message shown when the rule fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationRule {
    /// Creates a rule with no parameter or message.
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), value: None, message: None }
    }

    /// Creates a rule with a parameter value.
    pub fn with_value(kind: impl Into<String>, value: serde_json::Value) -> Self {
        Self { kind: kind.into(), value: Some(value), message: None }
    }
}

/// Styling record for an element. Opaque to the core: commands copy it
/// around whole, nothing in the engine interprets individual fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
}

/// A single placed form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormElement {
    pub id: Uuid,
    pub element_type: ElementType,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub required: bool,
    pub validation: Vec<ValidationRule>,
    pub styling: ElementStyle,
    pub position: ElementPosition,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl FormElement {
    /// Creates an element of the given type with the type's default label,
    /// placeholder, and properties.
    pub fn with_defaults(id: Uuid, element_type: ElementType, position: ElementPosition) -> Self {
        Self {
            id,
            element_type,
            label: element_type.default_label().to_string(),
            placeholder: element_type.default_placeholder().map(str::to_string),
            required: false,
            validation: Vec::new(),
            styling: ElementStyle::default(),
            position,
            properties: element_type.default_properties(),
        }
    }
}

//! Strict JSON schemas for structured completions, derived from the Rust output types.
//!
//! OpenAI's strict mode accepts a subset of JSON Schema: every object must list all of its
//! properties as required and forbid additional ones, optional values are expressed as a
//! nullable type, and references must be inlined. `schemars` gets us most of the way;
//! [`enforce_strict`] handles the rest.

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::LlmError;

/// Keywords `schemars` emits that strict mode rejects or that carry no meaning for the model.
const STRIPPED_KEYWORDS: &[&str] = &[
    "$schema",
    "title",
    "format",
    "default",
    "minimum",
    "maximum",
    "definitions",
];

/// Marker for types that can be requested as a structured completion.
pub trait StructuredOutput: JsonSchema + DeserializeOwned + Send {}

impl<T: JsonSchema + DeserializeOwned + Send> StructuredOutput for T {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    JsonSchema { json_schema: JsonSchemaFormat },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub strict: bool,
    pub schema: Value,
}

impl ResponseFormat {
    /// Builds the strict `json_schema` response format for `T`.
    pub fn for_type<T: StructuredOutput>() -> Result<Self, LlmError> {
        Ok(ResponseFormat::JsonSchema {
            json_schema: JsonSchemaFormat {
                name: schema_name::<T>(),
                strict: true,
                schema: strict_schema::<T>()?,
            },
        })
    }

    pub fn name(&self) -> &str {
        match self {
            ResponseFormat::JsonSchema { json_schema } => &json_schema.name,
        }
    }
}

/// Schema names must match `^[a-zA-Z0-9_-]+$`.
fn schema_name<T: JsonSchema>() -> String {
    T::schema_name()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn strict_schema<T: JsonSchema>() -> Result<Value, LlmError> {
    let generator = SchemaSettings::draft07()
        .with(|s| {
            s.inline_subschemas = true;
            s.option_nullable = false;
            s.option_add_null_type = true;
        })
        .into_generator();
    let root = generator.into_root_schema_for::<T>();
    let mut schema = serde_json::to_value(root)?;
    enforce_strict(&mut schema);
    Ok(schema)
}

/// Rewrites a generated schema in place so strict mode accepts it.
pub fn enforce_strict(schema: &mut Value) {
    let Value::Object(map) = schema else {
        return;
    };

    for keyword in STRIPPED_KEYWORDS {
        map.remove(*keyword);
    }
    flatten_single_all_of(map);

    let required = match map.get_mut("properties") {
        Some(Value::Object(properties)) => {
            for property in properties.values_mut() {
                enforce_strict(property);
            }
            Some(
                properties
                    .keys()
                    .cloned()
                    .map(Value::String)
                    .collect::<Vec<_>>(),
            )
        }
        _ => None,
    };
    if let Some(required) = required {
        map.insert("required".to_string(), Value::Array(required));
        map.insert("additionalProperties".to_string(), Value::Bool(false));
    }

    match map.get_mut("items") {
        Some(Value::Array(items)) => items.iter_mut().for_each(enforce_strict),
        Some(items) => enforce_strict(items),
        None => {}
    }

    for combinator in ["anyOf", "oneOf", "allOf"] {
        if let Some(Value::Array(variants)) = map.get_mut(combinator) {
            variants.iter_mut().for_each(enforce_strict);
        }
    }
}

/// `schemars` wraps a documented field of struct type as `allOf: [<inlined schema>]`
/// next to its description. Strict mode does not support `allOf`, so merge it up.
fn flatten_single_all_of(map: &mut Map<String, Value>) {
    let inner = match map.get("allOf") {
        Some(Value::Array(variants)) if variants.len() == 1 => match &variants[0] {
            Value::Object(inner) => inner.clone(),
            _ => return,
        },
        _ => return,
    };
    map.remove("allOf");
    for (key, value) in inner {
        map.entry(key).or_insert(value);
    }
    for keyword in STRIPPED_KEYWORDS {
        map.remove(*keyword);
    }
}

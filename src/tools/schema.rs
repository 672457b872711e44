use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// One entry of the tool catalog, serialized the way MCP `tools/list`
/// expects it.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: InputSchema,
}

impl ToolDescriptor {
    pub fn new(name: &'static str, description: &'static str, input_schema: InputSchema) -> Self {
        Self {
            name,
            description,
            input_schema,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SchemaProperty {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: &'static str,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<&'static [&'static str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl SchemaProperty {
    fn of(kind: &'static str, description: &'static str) -> Self {
        Self {
            kind,
            description,
            allowed: None,
            default: None,
        }
    }

    pub fn string(description: &'static str) -> Self {
        Self::of("string", description)
    }

    pub fn integer(description: &'static str) -> Self {
        Self::of("integer", description)
    }

    pub fn boolean(description: &'static str) -> Self {
        Self::of("boolean", description)
    }

    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// A flat JSON-schema object. Properties keep declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputSchema {
    properties: Vec<(&'static str, SchemaProperty)>,
    required: Vec<&'static str>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: &'static str, property: SchemaProperty) -> Self {
        self.required.push(name);
        self.optional(name, property)
    }

    pub fn optional(mut self, name: &'static str, property: SchemaProperty) -> Self {
        self.properties.push((name, property));
        self
    }

    pub fn required_fields(&self) -> &[&'static str] {
        &self.required
    }

    pub fn property(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, p)| p)
    }
}

struct Properties<'a>(&'a [(&'static str, SchemaProperty)]);

impl Serialize for Properties<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, prop)| (name, prop)))
    }
}

impl Serialize for InputSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("InputSchema", 3)?;
        s.serialize_field("type", "object")?;
        s.serialize_field("properties", &Properties(&self.properties))?;
        s.serialize_field("required", &self.required)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_as_json_schema() {
        let schema = InputSchema::new()
            .required("node", SchemaProperty::string("Node name"))
            .optional(
                "type",
                SchemaProperty::string("Type: qemu (VM) or lxc (container)")
                    .one_of(&["qemu", "lxc"])
                    .with_default(json!("qemu")),
            );

        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "type": "object",
                "properties": {
                    "node": { "type": "string", "description": "Node name" },
                    "type": {
                        "type": "string",
                        "description": "Type: qemu (VM) or lxc (container)",
                        "enum": ["qemu", "lxc"],
                        "default": "qemu"
                    }
                },
                "required": ["node"]
            })
        );
    }

    #[test]
    fn test_empty_schema() {
        let descriptor = ToolDescriptor::new("pve_node_list", "List nodes", InputSchema::new());
        let v = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(v["inputSchema"]["properties"], json!({}));
        assert_eq!(v["inputSchema"]["required"], json!([]));
        assert_eq!(v["name"], "pve_node_list");
    }
}

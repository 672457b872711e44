use super::error::ToolError;
use crate::proxmox::GuestKind;
use serde_json::{Map, Value};

/// The argument map of one tool call.
///
/// Fields are only looked up when a dispatcher asks for them; nothing is
/// checked against the advertised schema up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Accepts an object, or `null` for a call without arguments.
    pub fn from_value(value: Value) -> Result<Self, ToolError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(ToolError::invalid(
                "arguments",
                format!("expected an object, got {}", other),
            )),
        }
    }

    fn present(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    pub fn require_str(&self, name: &str) -> Result<&str, ToolError> {
        self.optional_str(name)?
            .ok_or_else(|| ToolError::MissingArgument(name.to_string()))
    }

    pub fn optional_str(&self, name: &str) -> Result<Option<&str>, ToolError> {
        match self.present(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(ToolError::invalid(
                name,
                format!("expected a string, got {}", other),
            )),
        }
    }

    /// An optional scope such as `node`. Blank means unscoped.
    pub fn optional_filter(&self, name: &str) -> Result<Option<&str>, ToolError> {
        Ok(self
            .optional_str(name)?
            .map(str::trim)
            .filter(|s| !s.is_empty()))
    }

    /// Guest and template ids: a JSON integer or a string of digits.
    pub fn require_id(&self, name: &str) -> Result<i64, ToolError> {
        match self.present(name) {
            None => Err(ToolError::MissingArgument(name.to_string())),
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| ToolError::invalid(name, format!("expected an integer, got {}", n))),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| ToolError::invalid(name, format!("expected an integer, got '{}'", s))),
            Some(other) => Err(ToolError::invalid(
                name,
                format!("expected an integer, got {}", other),
            )),
        }
    }

    /// `node` and `vmid`, the address of every guest-level tool.
    pub fn guest_target(&self) -> Result<(&str, i64), ToolError> {
        Ok((self.require_str("node")?, self.require_id("vmid")?))
    }

    /// The optional `type` selector, `qemu` when absent.
    pub fn guest_kind(&self) -> Result<GuestKind, ToolError> {
        match self.optional_str("type")? {
            None => Ok(GuestKind::default()),
            Some(t) => t.parse().map_err(|reason: String| ToolError::invalid("type", reason)),
        }
    }

    /// Every field except `keys`, in call order.
    pub fn without(&self, keys: &[&str]) -> Map<String, Value> {
        self.0
            .iter()
            .filter(|(k, _)| !keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Only the listed fields that were supplied.
    pub fn pick(&self, keys: &[&str]) -> Map<String, Value> {
        self.0
            .iter()
            .filter(|(k, _)| keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Arguments {
        Arguments::from_value(value).unwrap()
    }

    #[test]
    fn test_null_is_empty() {
        assert_eq!(args(Value::Null), Arguments::default());
        assert!(Arguments::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn test_require_str() {
        let a = args(json!({ "node": "pve1", "vmid": 100 }));
        assert_eq!(a.require_str("node").unwrap(), "pve1");

        let err = a.require_str("storage").unwrap_err();
        assert_eq!(err.to_string(), "Missing required argument: storage");

        let err = a.require_str("vmid").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument { .. }));
    }

    #[test]
    fn test_blank_filter_is_absent() {
        assert_eq!(args(json!({ "node": "" })).optional_filter("node").unwrap(), None);
        assert_eq!(args(json!({ "node": "  " })).optional_filter("node").unwrap(), None);
        assert_eq!(args(json!({})).optional_filter("node").unwrap(), None);
        assert_eq!(
            args(json!({ "node": "pve1" })).optional_filter("node").unwrap(),
            Some("pve1")
        );
    }

    #[test]
    fn test_ids_accept_numbers_and_digit_strings() {
        let a = args(json!({ "vmid": 100, "newid": "201", "bad": "abc", "gone": null }));
        assert_eq!(a.require_id("vmid").unwrap(), 100);
        assert_eq!(a.require_id("newid").unwrap(), 201);
        assert!(matches!(
            a.require_id("bad"),
            Err(ToolError::InvalidArgument { .. })
        ));
        assert!(matches!(
            a.require_id("gone"),
            Err(ToolError::MissingArgument(_))
        ));
    }

    #[test]
    fn test_guest_kind_defaults_to_qemu() {
        assert_eq!(args(json!({})).guest_kind().unwrap(), GuestKind::Qemu);
        assert_eq!(
            args(json!({ "type": "lxc" })).guest_kind().unwrap(),
            GuestKind::Lxc
        );
        let err = args(json!({ "type": "xen" })).guest_kind().unwrap_err();
        assert!(err.to_string().contains("'type'"));
    }

    #[test]
    fn test_without_keeps_order_and_drops_keys() {
        let a = args(json!({ "node": "pve1", "vmid": 100, "memory": 2048, "cores": 2 }));
        let rest = a.without(&["node", "vmid"]);
        assert_eq!(Value::Object(rest.clone()), json!({ "memory": 2048, "cores": 2 }));
        assert_eq!(rest.keys().collect::<Vec<_>>(), vec!["memory", "cores"]);
    }

    #[test]
    fn test_pick_only_supplied() {
        let a = args(json!({ "name": "s1", "vmstate": true, "extra": 1 }));
        let picked = a.pick(&["description", "vmstate"]);
        assert_eq!(Value::Object(picked), json!({ "vmstate": true }));
    }
}

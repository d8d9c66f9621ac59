use crate::value::Value;
use serde::Serialize;

/// A stack frame as reported in `*stopped`, `=thread-selected` and
/// `-stack-list-frames` output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Frame {
    pub level: Option<u32>,
    pub addr: Option<String>,
    pub func: Option<String>,
    pub file: Option<String>,
    pub fullname: Option<String>,
    pub line: Option<u32>,
    pub from: Option<String>,
}

impl Frame {
    /// Accepts a frame tuple or a keyed list element `{frame={..}}`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let tuple = match value.get("frame") {
            Some(inner) => inner.as_tuple()?,
            None => value.as_tuple()?,
        };
        let text = |key: &str| tuple.get_str(key).map(str::to_string);

        Some(Frame {
            level: tuple.get_str("level").and_then(|s| s.parse().ok()),
            addr: text("addr"),
            func: text("func"),
            file: text("file"),
            fullname: text("fullname"),
            line: tuple.get_str("line").and_then(|s| s.parse().ok()),
            from: text("from"),
        })
    }

    /// Source position, preferring the absolute path.
    pub fn source(&self) -> Option<(&str, u32)> {
        let file = self.fullname.as_deref().or(self.file.as_deref())?;
        Some((file, self.line?))
    }
}

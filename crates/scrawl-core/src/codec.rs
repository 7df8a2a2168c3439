//! Byte codec for documents.
//!
//! The wire format is a JSON byte buffer: a document is an array of
//! stroke objects, a stroke is `{"p": style?, "a": [action, ...]}`, a
//! style is `{"sw": width?, "c": "#RRGGBB"?}` and an action is
//! `{"t": tag, "x": x, "y": y}` with tag 1 for a move and 2 for a line.
//!
//! Encoding goes through `Serialize` impls; decoding walks the JSON tree
//! so every structural rule is checked explicitly. A decode error is
//! fatal to that call only and never yields a partial document.

use crate::action::{PathAction, TAG_LINE_TO, TAG_MOVE_TO};
use crate::document::Document;
use crate::stroke::Stroke;
use crate::style::StrokeStyle;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;
use thiserror::Error;

const KEY_STYLE: &str = "p";
const KEY_ACTIONS: &str = "a";
const KEY_TAG: &str = "t";
const KEY_X: &str = "x";
const KEY_Y: &str = "y";
const KEY_STROKE_WIDTH: &str = "sw";
const KEY_COLOR: &str = "c";

/// Errors raised while mapping a document to or from bytes.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An action carried a tag other than the known move/line tags.
    #[error("unknown action tag {0}")]
    UnknownActionTag(i64),
    /// A stroke failed structural validation.
    #[error("malformed stroke: {0}")]
    MalformedStroke(String),
    /// The buffer is not valid JSON or not a stroke array.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

/// Serialize a document to its wire bytes.
pub fn encode(document: &Document) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(document.strokes())
        .map_err(|err| CodecError::MalformedDocument(err.to_string()))
}

/// Rebuild a document from wire bytes.
///
/// Fails atomically: on any error nothing of the buffer is kept.
pub fn decode(bytes: &[u8]) -> Result<Document, CodecError> {
    let root: Value = serde_json::from_slice(bytes)
        .map_err(|err| CodecError::MalformedDocument(err.to_string()))?;
    let Value::Array(entries) = root else {
        return Err(CodecError::MalformedDocument(
            "expected a stroke array".to_string(),
        ));
    };

    let mut strokes = Vec::with_capacity(entries.len());
    for entry in &entries {
        strokes.push(decode_stroke(entry)?);
    }
    Ok(Document::from_strokes(strokes))
}

impl Serialize for PathAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let point = self.point();
        let mut state = serializer.serialize_struct("PathAction", 3)?;
        state.serialize_field(KEY_TAG, &self.tag())?;
        state.serialize_field(KEY_X, &point.x)?;
        state.serialize_field(KEY_Y, &point.y)?;
        state.end()
    }
}

impl Serialize for StrokeStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields =
            usize::from(self.stroke_width().is_some()) + usize::from(self.color_hex().is_some());
        let mut state = serializer.serialize_struct("StrokeStyle", fields)?;
        if let Some(width) = self.stroke_width() {
            state.serialize_field(KEY_STROKE_WIDTH, &width)?;
        }
        if let Some(color) = self.color_hex() {
            state.serialize_field(KEY_COLOR, color)?;
        }
        state.end()
    }
}

impl Serialize for Stroke {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = 1 + usize::from(self.style().is_some());
        let mut state = serializer.serialize_struct("Stroke", fields)?;
        if let Some(style) = self.style() {
            state.serialize_field(KEY_STYLE, style)?;
        }
        state.serialize_field(KEY_ACTIONS, self.actions())?;
        state.end()
    }
}

fn malformed(reason: impl Into<String>) -> CodecError {
    CodecError::MalformedStroke(reason.into())
}

fn decode_stroke(value: &Value) -> Result<Stroke, CodecError> {
    let entry = value
        .as_object()
        .ok_or_else(|| malformed("stroke is not an object"))?;

    let style = match entry.get(KEY_STYLE) {
        None | Some(Value::Null) => None,
        Some(node) => Some(decode_style(node)?),
    };

    let Some(Value::Array(raw_actions)) = entry.get(KEY_ACTIONS) else {
        return Err(malformed("action log missing or not an array"));
    };
    if raw_actions.is_empty() {
        return Err(malformed("empty action log"));
    }

    let mut actions = Vec::with_capacity(raw_actions.len());
    for node in raw_actions {
        actions.push(decode_action(node)?);
    }
    if !matches!(actions[0], PathAction::MoveTo { .. }) {
        return Err(malformed("log must start with a move"));
    }

    Ok(Stroke::from_log(actions, style))
}

fn decode_action(value: &Value) -> Result<PathAction, CodecError> {
    let node = value
        .as_object()
        .ok_or_else(|| malformed("action is not an object"))?;
    let tag = node
        .get(KEY_TAG)
        .and_then(Value::as_i64)
        .ok_or_else(|| malformed("action missing tag"))?;
    let coord = |key: &str| {
        node.get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| malformed(format!("action missing {key}")))
    };
    match tag {
        TAG_MOVE_TO => Ok(PathAction::MoveTo {
            x: coord(KEY_X)?,
            y: coord(KEY_Y)?,
        }),
        TAG_LINE_TO => Ok(PathAction::LineTo {
            x: coord(KEY_X)?,
            y: coord(KEY_Y)?,
        }),
        other => Err(CodecError::UnknownActionTag(other)),
    }
}

fn decode_style(value: &Value) -> Result<StrokeStyle, CodecError> {
    let node = value
        .as_object()
        .ok_or_else(|| malformed("style is not an object"))?;
    let width = match node.get(KEY_STROKE_WIDTH) {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            v.as_f64()
                .ok_or_else(|| malformed("stroke width is not a number"))?,
        ),
    };
    let color = match node.get(KEY_COLOR) {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            v.as_str()
                .ok_or_else(|| malformed("color is not a string"))?
                .to_string(),
        ),
    };
    StrokeStyle::new(width, color).map_err(|err| malformed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        let mut plain = Stroke::begin(10.0, 10.0).unwrap();
        plain.extend(20.0, 10.0).unwrap();
        plain.extend(20.0, 20.0).unwrap();

        let mut styled = Stroke::begin(1.5, -2.25).unwrap();
        styled.extend(3.0, 4.0).unwrap();
        let styled = styled.with_style(Some(
            StrokeStyle::new(Some(5.0), Some("#A0B0C0".to_string())).unwrap(),
        ));

        let mut doc = Document::new();
        doc.push(plain);
        doc.push(styled);
        doc
    }

    #[test]
    fn test_round_trip() {
        let doc = sample_document();
        let bytes = encode(&doc).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn test_wire_shape() {
        let doc = sample_document();
        let bytes = encode(&doc).unwrap();
        let root: Value = serde_json::from_slice(&bytes).unwrap();

        let strokes = root.as_array().unwrap();
        assert_eq!(strokes.len(), 2);

        // An unstyled stroke has no paint key at all.
        assert!(strokes[0].get("p").is_none());
        let first_action = &strokes[0]["a"][0];
        assert_eq!(first_action["t"], 1);
        assert_eq!(first_action["x"], 10.0);
        assert_eq!(strokes[0]["a"][1]["t"], 2);

        assert_eq!(strokes[1]["p"]["sw"], 5.0);
        assert_eq!(strokes[1]["p"]["c"], "#A0B0C0");
    }

    #[test]
    fn test_unknown_tag_fails_whole_decode() {
        let payload = br#"[
            {"a": [{"t": 1, "x": 0.0, "y": 0.0}]},
            {"a": [{"t": 9, "x": 1.0, "y": 1.0}]}
        ]"#;
        let err = decode(payload).unwrap_err();
        assert!(matches!(err, CodecError::UnknownActionTag(9)));
    }

    #[test]
    fn test_empty_action_log_rejected() {
        let payload = br#"[{"a": []}]"#;
        let err = decode(payload).unwrap_err();
        assert!(matches!(err, CodecError::MalformedStroke(_)));
    }

    #[test]
    fn test_missing_action_log_rejected() {
        let payload = br#"[{"p": {"sw": 2.0}}]"#;
        assert!(matches!(
            decode(payload),
            Err(CodecError::MalformedStroke(_))
        ));
    }

    #[test]
    fn test_log_starting_with_line_rejected() {
        let payload = br#"[{"a": [{"t": 2, "x": 1.0, "y": 1.0}]}]"#;
        assert!(matches!(
            decode(payload),
            Err(CodecError::MalformedStroke(_))
        ));
    }

    #[test]
    fn test_missing_coordinate_rejected() {
        let payload = br#"[{"a": [{"t": 1, "x": 1.0}]}]"#;
        assert!(matches!(
            decode(payload),
            Err(CodecError::MalformedStroke(_))
        ));
    }

    #[test]
    fn test_style_with_null_fields_decodes_as_empty_style() {
        let payload = br#"[{"p": {"sw": null, "c": null}, "a": [{"t": 1, "x": 0.0, "y": 0.0}]}]"#;
        let doc = decode(payload).unwrap();
        let style = doc.strokes()[0].style().unwrap();
        assert_eq!(style.stroke_width(), None);
        assert_eq!(style.color_hex(), None);
    }

    #[test]
    fn test_invalid_style_values_rejected() {
        let payload = br#"[{"p": {"sw": -1.0}, "a": [{"t": 1, "x": 0.0, "y": 0.0}]}]"#;
        assert!(matches!(
            decode(payload),
            Err(CodecError::MalformedStroke(_))
        ));

        let payload = br#"[{"p": {"c": "blue"}, "a": [{"t": 1, "x": 0.0, "y": 0.0}]}]"#;
        assert!(matches!(
            decode(payload),
            Err(CodecError::MalformedStroke(_))
        ));
    }

    #[test]
    fn test_non_array_root_rejected() {
        assert!(matches!(
            decode(br#"{"a": []}"#),
            Err(CodecError::MalformedDocument(_))
        ));
        assert!(matches!(
            decode(b"not json"),
            Err(CodecError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_order_preserved() {
        let mut doc = Document::new();
        for x in 0..5 {
            doc.push(Stroke::begin(f64::from(x), 0.0).unwrap());
        }
        let decoded = decode(&encode(&doc).unwrap()).unwrap();
        let xs: Vec<f64> = decoded
            .strokes()
            .iter()
            .map(|s| s.actions()[0].point().x)
            .collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_empty_document_round_trips() {
        let doc = Document::new();
        let decoded = decode(&encode(&doc).unwrap()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_multi_subpath_log_replays() {
        // The wire level permits a later move in the log.
        let payload = br#"[{"a": [
            {"t": 1, "x": 0.0, "y": 0.0},
            {"t": 2, "x": 5.0, "y": 0.0},
            {"t": 1, "x": 10.0, "y": 10.0},
            {"t": 2, "x": 15.0, "y": 10.0}
        ]}]"#;
        let doc = decode(payload).unwrap();
        assert_eq!(doc.strokes()[0].actions().len(), 4);
        assert_eq!(doc.strokes()[0].path().elements().len(), 4);
    }
}

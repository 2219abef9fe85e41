use crate::model::template::TextElement;
use serde::Deserialize;

/// Body of `PUT /api/templates/{id}`.
///
/// Only the element list is replaceable. A full `Template` document also
/// deserializes into this type; its other fields are ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateTemplateRequest {
    #[serde(default)]
    pub elements: Vec<TextElement>,
}

use serde::{Deserialize, Serialize};

/// A base image plus the ordered list of text regions stamped onto it.
///
/// The JSON shape (camelCase) matches what the editor front end sends and
/// receives through `/api/templates`. `elements` may be omitted in a request,
/// in which case the template renders as its bare base image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// UUID assigned when the image is uploaded. Never changes afterwards.
    pub id: String,
    /// Location of the stored base image. Released when the template is deleted.
    pub image_path: String,
    /// Name of the file as uploaded by the user. Informational only.
    #[serde(default)]
    pub original_filename: Option<String>,
    /// Draw order is list order: later elements paint over earlier ones.
    #[serde(default)]
    pub elements: Vec<TextElement>,
}

/// One positioned, styled line of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    /// Role tag (`name`, `birthdate`, `quote`, or anything else).
    /// Only recognised roles can be substituted at render time.
    #[serde(rename = "type")]
    pub element_type: String,
    /// Text drawn when no substitution applies.
    #[serde(default)]
    pub text: String,
    pub font_size: u32,
    /// `#RRGGBB`
    pub color: String,
    /// Baseline anchor, in pixels.
    pub x: i32,
    pub y: i32,
}

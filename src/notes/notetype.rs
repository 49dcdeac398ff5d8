//! Note types and the stock image-occlusion definition.

use serde::{Deserialize, Serialize};

use super::{NotetypeId, TimestampSecs};
use super::occlusion::IMAGE_OCCLUSION_FIELDS;

/// What a note type was created as.
///
/// The image-occlusion services identify "the" image-occlusion note type
/// by this tag, not by name or id: a user may rename it freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NotetypeKind {
    #[default]
    Normal,
    ImageOcclusion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notetype {
    pub id: NotetypeId,
    pub name: String,
    pub kind: NotetypeKind,
    pub fields: Vec<String>,
    pub mtime: TimestampSecs,
}

impl Notetype {
    pub fn is_image_occlusion(&self) -> bool {
        self.kind == NotetypeKind::ImageOcclusion
    }
}

/// Stock image-occlusion note type, not yet persisted (id 0).
pub fn image_occlusion_notetype(name: &str) -> Notetype {
    Notetype {
        id: NotetypeId(0),
        name: name.to_string(),
        kind: NotetypeKind::ImageOcclusion,
        fields: IMAGE_OCCLUSION_FIELDS.iter().map(|f| (*f).to_string()).collect(),
        mtime: TimestampSecs::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_notetype_has_image_occlusion_layout() {
        let nt = image_occlusion_notetype("Image Occlusion");
        assert!(nt.is_image_occlusion());
        assert_eq!(nt.fields.len(), IMAGE_OCCLUSION_FIELDS.len());
        assert_eq!(nt.fields[0], "Occlusion");
    }
}

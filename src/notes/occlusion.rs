//! Field layout of image-occlusion notes.
//!
//! ```text
//! idx  field        content
//! 0    Occlusion    opaque shape data, stored verbatim
//! 1    Image        <img src="NAME">
//! 2    Header       free text
//! 3    Back Extra   free text
//! 4    Comments     free text, untouched by this crate
//! ```

pub const OCCLUSION_FIELD: usize = 0;
pub const IMAGE_FIELD: usize = 1;
pub const HEADER_FIELD: usize = 2;
pub const BACK_EXTRA_FIELD: usize = 3;
pub const COMMENTS_FIELD: usize = 4;

pub const IMAGE_OCCLUSION_FIELDS: [&str; 5] =
    ["Occlusion", "Image", "Header", "Back Extra", "Comments"];

/// Build the `Image` field for a media file name.
pub fn image_tag(file_name: &str) -> String {
    format!("<img src=\"{}\">", escape_attr(file_name))
}

/// Extract the media file name from an `Image` field.
///
/// Accepts single or double quotes and extra attributes; returns `None`
/// when the field holds no `<img>` tag.
pub fn image_src(field: &str) -> Option<String> {
    let lower = field.to_ascii_lowercase();
    let tag_start = lower.find("<img")?;
    let src_pos = tag_start + lower[tag_start..].find("src=")? + "src=".len();
    let rest = &field[src_pos..];
    let quote = rest.chars().next()?;
    let value = if quote == '"' || quote == '\'' {
        let body = &rest[1..];
        &body[..body.find(quote)?]
    } else {
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if value.is_empty() {
        None
    } else {
        Some(unescape_attr(value))
    }
}

/// Occlusion data must carry at least one non-whitespace character.
pub fn occlusions_are_well_formed(occlusions: &str) -> bool {
    !occlusions.trim().is_empty()
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}

fn unescape_attr(s: &str) -> String {
    s.replace("&quot;", "\"").replace("&amp;", "&")
}

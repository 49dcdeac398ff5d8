//! Bundled English resources and a minimal resource-file reader.
//!
//! Resource files use single-line `key = template` entries; `#` starts a
//! comment line. The order of entries inside a module defines the message
//! index used by `TranslateString`, and the order of [`BUILTIN_MODULES`]
//! defines the module index.

pub const BUILTIN_LANG: &str = "en-US";

/// `(module name, resource text)` in module-index order.
pub const BUILTIN_MODULES: [(&str, &str); 4] = [
    ("scheduling", SCHEDULING_FTL),
    ("notetypes", NOTETYPES_FTL),
    ("image-occlusion", IMAGE_OCCLUSION_FTL),
    ("statistics", STATISTICS_FTL),
];

const SCHEDULING_FTL: &str = "\
## Long-form durations
scheduling-time-span-seconds = { $amount -> [one] { $amount } second *[other] { $amount } seconds }
scheduling-time-span-minutes = { $amount -> [one] { $amount } minute *[other] { $amount } minutes }
scheduling-time-span-hours = { $amount -> [one] { $amount } hour *[other] { $amount } hours }
scheduling-time-span-days = { $amount -> [one] { $amount } day *[other] { $amount } days }
scheduling-time-span-months = { $amount -> [one] { $amount } month *[other] { $amount } months }
scheduling-time-span-years = { $amount -> [one] { $amount } year *[other] { $amount } years }
## Compact durations (answer buttons, intervals)
scheduling-answer-button-time-seconds = { $amount }s
scheduling-answer-button-time-minutes = { $amount }m
scheduling-answer-button-time-hours = { $amount }h
scheduling-answer-button-time-days = { $amount }d
scheduling-answer-button-time-months = { $amount }mo
scheduling-answer-button-time-years = { $amount }y
scheduling-next-review-in = Next review in { $time }
";

const NOTETYPES_FTL: &str = "\
notetypes-image-occlusion-name = Image Occlusion
notetypes-occlusion = Occlusion
notetypes-image = Image
notetypes-header = Header
notetypes-back-extra-field = Back Extra
notetypes-comments-field = Comments
";

const IMAGE_OCCLUSION_FTL: &str = "\
image-occlusion-rectangle-tool = Rectangle
image-occlusion-ellipse-tool = Ellipse
image-occlusion-polygon-tool = Polygon
image-occlusion-notes-added = { $count -> [one] { $count } image occlusion note added *[other] { $count } image occlusion notes added }
image-occlusion-select-image = Select Image
";

const STATISTICS_FTL: &str = "\
statistics-cards = { $cards -> [one] { $cards } card *[other] { $cards } cards }
statistics-studied-today = Studied { $cards } in { $time } today
statistics-due-tomorrow = { $count -> [0] Nothing due tomorrow *[other] Due tomorrow: { $count } }
";

/// Parse `key = template` lines, preserving order.
pub fn parse_resource(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

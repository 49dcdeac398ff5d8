//! Integration tests: I18nService over the in-process binding.

use super::mock_ports::{MockMedia, backend};
use cardbridge::I18nService;
use cardbridge::adapters::memory_store::MemoryCollection;
use cardbridge::adapters::strings::StringTable;
use cardbridge::app::service::Backend;
use cardbridge::i18n::INVALID_INDEX_FALLBACK;
use cardbridge::rpc::messages::{
    FormatTimespanRequest, I18nResourcesRequest, TimespanContext, TranslateStringRequest,
};

fn timespan(seconds: f32, context: TimespanContext) -> String {
    let (b, _) = backend(MockMedia::new());
    b.format_timespan(FormatTimespanRequest { seconds, context })
        .unwrap()
}

// ── TranslateString ───────────────────────────────────────────

#[test]
fn translate_substitutes_string_and_number_args() {
    let (b, _) = backend(MockMedia::new());
    let (m, i) = b.strings().indices_of("statistics-studied-today").unwrap();
    let out = b
        .translate_string(
            TranslateStringRequest::new(m, i)
                .arg("cards", 12.0)
                .arg("time", "5 minutes"),
        )
        .unwrap();
    assert_eq!(out, "Studied 12 in 5 minutes today");
}

#[test]
fn translate_missing_arg_shows_placeholder() {
    let (b, _) = backend(MockMedia::new());
    let (m, i) = b.strings().indices_of("scheduling-next-review-in").unwrap();
    let out = b.translate_string(TranslateStringRequest::new(m, i)).unwrap();
    assert_eq!(out, "Next review in {$time}");
}

#[test]
fn translate_out_of_range_degrades() {
    let (b, _) = backend(MockMedia::new());
    for (m, i) in [(0, 9_999), (9_999, 0), (u32::MAX, u32::MAX)] {
        let out = b.translate_string(TranslateStringRequest::new(m, i)).unwrap();
        assert_eq!(out, INVALID_INDEX_FALLBACK);
    }
}

#[test]
fn translate_exact_number_selector() {
    let (b, _) = backend(MockMedia::new());
    let (m, i) = b.strings().indices_of("statistics-due-tomorrow").unwrap();
    let none = b
        .translate_string(TranslateStringRequest::new(m, i).arg("count", 0.0))
        .unwrap();
    let some = b
        .translate_string(TranslateStringRequest::new(m, i).arg("count", 4.0))
        .unwrap();
    assert_eq!(none, "Nothing due tomorrow");
    assert_eq!(some, "Due tomorrow: 4");
}

// ── FormatTimespan ────────────────────────────────────────────

#[test]
fn precise_timespans() {
    assert_eq!(timespan(0.0, TimespanContext::Precise), "0 seconds");
    assert_eq!(timespan(1.0, TimespanContext::Precise), "1 second");
    assert_eq!(timespan(45.4, TimespanContext::Precise), "45 seconds");
    assert_eq!(timespan(150.0, TimespanContext::Precise), "2.5 minutes");
    assert_eq!(timespan(3600.0, TimespanContext::Precise), "1 hour");
    assert_eq!(timespan(86_400.0 * 3.0, TimespanContext::Precise), "3 days");
    assert_eq!(timespan(86_400.0 * 365.0, TimespanContext::Precise), "1 year");
}

#[test]
fn answer_button_timespans() {
    assert_eq!(timespan(30.0, TimespanContext::AnswerButtons), "30s");
    assert_eq!(timespan(150.0, TimespanContext::AnswerButtons), "3m");
    assert_eq!(timespan(86_400.0 * 4.0, TimespanContext::AnswerButtons), "4d");
    assert_eq!(timespan(86_400.0 * 45.0, TimespanContext::AnswerButtons), "1.5mo");
}

#[test]
fn interval_timespans() {
    assert_eq!(timespan(600.0, TimespanContext::Intervals), "10m");
    assert_eq!(timespan(150.0, TimespanContext::Intervals), "2.5m");
}

#[test]
fn non_finite_timespans_show_zero() {
    assert_eq!(timespan(f32::INFINITY, TimespanContext::Precise), "0 seconds");
    assert_eq!(timespan(f32::NAN, TimespanContext::AnswerButtons), "0s");
}

#[test]
fn timespan_without_strings_uses_plain_fallback() {
    let b = Backend::new(
        MemoryCollection::new(),
        MockMedia::new(),
        StringTable::empty(vec!["en-US".into()]),
    );
    let out = b
        .format_timespan(FormatTimespanRequest {
            seconds: 120.0,
            context: TimespanContext::Precise,
        })
        .unwrap();
    assert_eq!(out, "2 minutes");
}

// ── I18nResources ─────────────────────────────────────────────

#[test]
fn resources_contain_requested_modules() {
    let (b, _) = backend(MockMedia::new());
    let out = b
        .i18n_resources(I18nResourcesRequest {
            modules: vec!["scheduling".into(), "notetypes".into(), "missing".into()],
        })
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out.json).unwrap();
    let resources = value["resources"].as_object().unwrap();
    assert_eq!(resources.len(), 2);
    assert!(
        resources["notetypes"]
            .as_str()
            .unwrap()
            .contains("notetypes-image-occlusion-name")
    );
    assert_eq!(value["langs"], serde_json::json!(["en-US"]));
}

#[test]
fn resources_for_no_modules_is_empty_object() {
    let (b, _) = backend(MockMedia::new());
    let out = b.i18n_resources(I18nResourcesRequest::default()).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out.json).unwrap();
    assert!(value["resources"].as_object().unwrap().is_empty());
}

//! Integration tests: ImageOcclusionService over the in-process binding.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use super::mock_ports::{BrokenCollection, MediaCall, MockBackend, MockMedia, backend};
use cardbridge::adapters::strings::StringTable;
use cardbridge::app::events::AppEvent;
use cardbridge::app::ports::CollectionPort;
use cardbridge::app::service::Backend;
use cardbridge::notes::notetype::image_occlusion_notetype;
use cardbridge::notes::{NoteId, NotetypeId, NotetypeKind};
use cardbridge::rpc::messages::{
    AddImageOcclusionNoteRequest, GetImageOcclusionNoteResponse, Op,
    UpdateImageOcclusionNoteRequest,
};
use cardbridge::{BackendError, ImageOcclusionService};

fn with_notetype_42(b: &MockBackend) {
    let mut nt = image_occlusion_notetype("Image Occlusion");
    nt.id = NotetypeId(42);
    let (id, _) = b.collection().add_notetype(nt).unwrap();
    assert_eq!(id, NotetypeId(42));
}

fn scenario_request() -> AddImageOcclusionNoteRequest {
    AddImageOcclusionNoteRequest {
        image_path: "/tmp/a.png".into(),
        occlusions: "[{x:1,y:2}]".into(),
        header: "H".into(),
        back_extra: "B".into(),
        tags: vec!["t1".into()],
        notetype_id: NotetypeId(42),
    }
}

// ── Add + Get ─────────────────────────────────────────────────

#[test]
fn add_then_get_returns_the_note() {
    let (b, sink) = backend(MockMedia::new().with_external("/tmp/a.png", b"PNG"));
    with_notetype_42(&b);

    let changes = b.add_image_occlusion_note(scenario_request()).unwrap();
    assert_eq!(changes.op, Op::AddNote);
    assert!(changes.changes.note);
    assert_eq!(changes.note_id, Some(NoteId(1)));

    let added = sink
        .take()
        .into_iter()
        .find_map(|e| match e {
            AppEvent::NoteAdded { note_id, .. } => Some(note_id),
            _ => None,
        })
        .expect("NoteAdded emitted");

    let resp = b.get_image_occlusion_note(added).unwrap();
    let note = resp.note().expect("note arm");
    assert_eq!(note.occlusions, "[{x:1,y:2}]");
    assert_eq!(note.header, "H");
    assert_eq!(note.back_extra, "B");
    assert_eq!(note.tags, vec!["t1"]);
    assert_eq!(note.notetype_id, NotetypeId(42));
    assert_eq!(note.image_data, b"PNG");
    assert!(resp.error().is_none());
}

#[test]
fn media_is_copied_only_after_validation() {
    let (b, _) = backend(MockMedia::new().with_external("/tmp/a.png", b"PNG"));
    with_notetype_42(&b);

    let mut req = scenario_request();
    req.occlusions = String::new();
    assert!(matches!(
        b.add_image_occlusion_note(req),
        Err(BackendError::InvalidInput(_))
    ));

    let mut req = scenario_request();
    req.notetype_id = NotetypeId(7);
    assert!(matches!(
        b.add_image_occlusion_note(req),
        Err(BackendError::NotFound(_))
    ));

    assert!(b.media().calls().is_empty());
    assert_eq!(b.collection().note_count(), 0);
}

#[test]
fn add_reads_then_stores_the_image() {
    let (b, _) = backend(MockMedia::new().with_external("/tmp/a.png", b"PNG"));
    with_notetype_42(&b);
    b.add_image_occlusion_note(scenario_request()).unwrap();
    assert_eq!(
        b.media().calls(),
        vec![
            MediaCall::ReadExternal("/tmp/a.png".into()),
            MediaCall::AddFile("a.png".into()),
        ]
    );
}

#[test]
fn zero_notetype_id_uses_the_stock_notetype() {
    let (b, _) = backend(MockMedia::new().with_external("/tmp/a.png", b"PNG"));
    b.add_image_occlusion_notetype().unwrap();
    let mut req = scenario_request();
    req.notetype_id = NotetypeId(0);
    b.add_image_occlusion_note(req).unwrap();
    assert_eq!(b.collection().note_count(), 1);
}

// ── Get: in-band errors ───────────────────────────────────────

#[test]
fn missing_image_file_is_reported_in_band() {
    let (b, _) = backend(MockMedia::new().with_external("/tmp/a.png", b"PNG"));
    with_notetype_42(&b);
    b.add_image_occlusion_note(scenario_request()).unwrap();
    b.media().remove_from_folder("a.png");

    match b.get_image_occlusion_note(NoteId(1)).unwrap() {
        GetImageOcclusionNoteResponse::Error(msg) => assert!(msg.contains("a.png")),
        other => panic!("expected error arm, got {other:?}"),
    }
}

#[test]
fn broken_store_is_reported_in_band() {
    let b = Backend::new(BrokenCollection, MockMedia::new(), StringTable::builtin());
    let resp = b.get_image_occlusion_note(NoteId(1)).unwrap();
    assert_eq!(resp.error(), Some("collection data corrupted"));
}

#[test]
fn broken_store_fails_mutations_out_of_band() {
    let b = Backend::new(BrokenCollection, MockMedia::new(), StringTable::builtin());
    assert!(matches!(
        b.add_image_occlusion_notetype(),
        Err(BackendError::Internal(_))
    ));
}

#[test]
fn non_image_occlusion_note_is_an_in_band_error() {
    let (b, _) = backend(MockMedia::new());
    let mut basic = image_occlusion_notetype("Basic");
    basic.kind = NotetypeKind::Normal;
    let (ntid, _) = b.collection().add_notetype(basic).unwrap();
    let (nid, _) = b
        .collection()
        .add_note(cardbridge::notes::Note::new(ntid, vec!["front".into()], vec![]))
        .unwrap();

    let resp = b.get_image_occlusion_note(nid).unwrap();
    assert!(resp.error().unwrap().contains("not an image occlusion note"));
}

// ── Update ────────────────────────────────────────────────────

#[test]
fn update_then_read_reflects_changes() {
    let (b, _) = backend(MockMedia::new().with_external("/tmp/a.png", b"PNG"));
    with_notetype_42(&b);
    b.add_image_occlusion_note(scenario_request()).unwrap();

    let changes = b
        .update_image_occlusion_note(UpdateImageOcclusionNoteRequest {
            note_id: NoteId(1),
            occlusions: "[{x:9}]".into(),
            header: "H2".into(),
            back_extra: "B2".into(),
            tags: vec!["t2".into(), "t1".into()],
        })
        .unwrap();
    assert_eq!(changes.op, Op::UpdateNote);
    assert!(changes.changes.tag);

    let note = b.get_image_occlusion_note(NoteId(1)).unwrap();
    let note = note.note().unwrap();
    assert_eq!(note.occlusions, "[{x:9}]");
    assert_eq!(note.header, "H2");
    assert_eq!(note.back_extra, "B2");
    assert_eq!(note.tags, vec!["t2", "t1"]);
    assert_eq!(note.image_file_name, "a.png");
}

#[test]
fn tags_are_stored_exactly_as_sent() {
    let (b, _) = backend(MockMedia::new().with_external("/tmp/a.png", b"PNG"));
    with_notetype_42(&b);
    let mut req = scenario_request();
    req.tags = vec!["Tag".into(), "tag".into(), " spaced ".into()];
    let nid = b.add_image_occlusion_note(req).unwrap().note_id.unwrap();
    let read = b.get_image_occlusion_note(nid).unwrap();
    assert_eq!(read.note().unwrap().tags, vec!["Tag", "tag", " spaced "]);

    let tags = vec![" spaced ".to_string(), String::new(), "TAG".into(), "tag".into()];
    b.update_image_occlusion_note(UpdateImageOcclusionNoteRequest {
        note_id: nid,
        occlusions: "[{x:1}]".into(),
        tags: tags.clone(),
        ..Default::default()
    })
    .unwrap();
    let read = b.get_image_occlusion_note(nid).unwrap();
    assert_eq!(read.note().unwrap().tags, tags);
}

#[test]
fn update_with_identical_content_changes_nothing() {
    let (b, sink) = backend(MockMedia::new().with_external("/tmp/a.png", b"PNG"));
    with_notetype_42(&b);
    b.add_image_occlusion_note(scenario_request()).unwrap();
    sink.take();

    let changes = b
        .update_image_occlusion_note(UpdateImageOcclusionNoteRequest {
            note_id: NoteId(1),
            occlusions: "[{x:1,y:2}]".into(),
            header: "H".into(),
            back_extra: "B".into(),
            tags: vec!["t1".into()],
        })
        .unwrap();
    assert!(changes.is_empty());
    assert!(sink.take().is_empty());
}

#[test]
fn update_missing_note_fails_out_of_band() {
    let (b, _) = backend(MockMedia::new());
    let err = b
        .update_image_occlusion_note(UpdateImageOcclusionNoteRequest {
            note_id: NoteId(404),
            occlusions: "[]".into(),
            ..Default::default()
        })
        .unwrap_err();
    assert_eq!(err, BackendError::NotFound("note 404 not found".into()));
}

// ── Notetype bootstrap ────────────────────────────────────────

#[test]
fn notetype_bootstrap_is_idempotent() {
    let (b, _) = backend(MockMedia::new());
    let first = b.add_image_occlusion_notetype().unwrap();
    assert_eq!(first.op, Op::AddNotetype);
    assert!(first.changes.notetype);

    for _ in 0..3 {
        let again = b.add_image_occlusion_notetype().unwrap();
        assert!(again.is_empty());
    }
    let io = b.collection().notetypes_of_kind(NotetypeKind::ImageOcclusion);
    assert_eq!(io.len(), 1);
    assert_eq!(io[0].name, "Image Occlusion");
}

#[test]
fn concurrent_adds_share_one_notetype() {
    let (b, _) = backend(MockMedia::new().with_external("/tmp/a.png", b"PNG"));
    let b = Arc::new(b);

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let b = Arc::clone(&b);
            thread::spawn(move || {
                b.add_image_occlusion_notetype().unwrap();
                (0..5)
                    .map(|j| {
                        let req = AddImageOcclusionNoteRequest {
                            header: format!("worker {i} note {j}"),
                            notetype_id: NotetypeId(0),
                            ..scenario_request()
                        };
                        b.add_image_occlusion_note(req).unwrap().note_id.unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: Vec<NoteId> = workers
        .into_iter()
        .flat_map(|w| w.join().unwrap())
        .collect();
    let unique: HashSet<NoteId> = ids.iter().copied().collect();
    assert_eq!(ids.len(), 40);
    assert_eq!(unique.len(), 40);
    assert_eq!(b.collection().note_count(), 40);
    assert_eq!(
        b.collection()
            .notetypes_of_kind(NotetypeKind::ImageOcclusion)
            .len(),
        1
    );
}

#[test]
fn renamed_notetype_still_counts() {
    let (b, _) = backend(MockMedia::new());
    b.collection()
        .add_notetype(image_occlusion_notetype("My occlusions"))
        .unwrap();
    assert!(b.add_image_occlusion_notetype().unwrap().is_empty());
}

// ── GetImageForOcclusion ──────────────────────────────────────

#[test]
fn image_for_occlusion_errors_are_out_of_band() {
    let (b, _) = backend(MockMedia::new());
    assert!(matches!(
        b.get_image_for_occlusion(""),
        Err(BackendError::InvalidInput(_))
    ));
    assert!(matches!(
        b.get_image_for_occlusion("/nope.png"),
        Err(BackendError::NotFound(_))
    ));
}

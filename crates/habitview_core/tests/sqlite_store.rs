use habitview_core::{
    Bindings, ChangeKind, Document, DocumentStore, IndicatorStrip, JournalQueries, RenderContext,
    SqliteDocumentStore, StoreError, View, ViewEnv,
};

fn day(title: &str, week: &str) -> Document {
    Document::new(title).with_tags(["Daily", "Journal", week])
}

#[test]
fn put_and_get_round_trips_fields_and_tags() {
    let mut store = SqliteDocumentStore::open_in_memory().unwrap();
    let doc = day("2024-03-04", "2024-W10").with_field("steps", "1200");

    assert_eq!(store.put_document(&doc).unwrap(), ChangeKind::Created);
    assert_eq!(store.get_document("2024-03-04").unwrap(), Some(doc));
    assert_eq!(store.get_document("2024-03-05").unwrap(), None);
}

#[test]
fn put_replaces_whole_field_and_tag_sets() {
    let mut store = SqliteDocumentStore::open_in_memory().unwrap();
    store
        .put_document(&day("2024-03-04", "2024-W10").with_field("steps", "1"))
        .unwrap();
    let replaced = Document::new("2024-03-04")
        .with_tag("Journal")
        .with_field("mood", "ok");
    assert_eq!(store.put_document(&replaced).unwrap(), ChangeKind::Updated);

    let loaded = store.get_document("2024-03-04").unwrap().unwrap();
    assert_eq!(loaded, replaced);
    assert!(store.titles_tagged("Daily").unwrap().is_empty());
}

#[test]
fn change_journal_merges_and_drains_once() {
    let mut store = SqliteDocumentStore::open_in_memory().unwrap();
    store.put_document(&day("a", "w")).unwrap();
    store.put_document(&day("a", "w").with_field("x", "1")).unwrap();
    store.put_document(&day("b", "w")).unwrap();
    assert!(store.remove_document("b").unwrap());
    assert!(!store.remove_document("missing").unwrap());

    let changes = store.take_changes().unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes.kind("a"), Some(ChangeKind::Created));
    assert_eq!(changes.kind("b"), Some(ChangeKind::Removed));
    assert!(store.take_changes().unwrap().is_empty());
}

#[test]
fn filter_runs_over_tag_index() {
    let mut store = SqliteDocumentStore::open_in_memory().unwrap();
    store.put_document(&day("2024-03-05", "2024-W10")).unwrap();
    store.put_document(&day("2024-03-04", "2024-W10")).unwrap();
    store.put_document(&day("2024-03-11", "2024-W11")).unwrap();

    let titles = store
        .filter(
            "[tag[Daily]tag[Journal]tag<matchTitle>sort[title]]",
            &Bindings::new().with("matchTitle", "2024-W10"),
        )
        .unwrap();
    assert_eq!(titles, vec!["2024-03-04", "2024-03-05"]);

    let err = store.filter("[nope[x]]", &Bindings::new()).unwrap_err();
    assert!(matches!(err, StoreError::Filter(_)));
}

#[test]
fn palette_backs_colour_markup() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    store.set_palette_colour("table-border", "#ddd").unwrap();
    store.set_palette_colour("table-border", "#eee").unwrap();
    assert_eq!(
        store
            .render_inline_markup("<<colour table-border>>")
            .unwrap(),
        "#eee"
    );
}

#[test]
fn views_refresh_from_persisted_changes() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SqliteDocumentStore::open(dir.path().join("journal.db")).unwrap();
    store
        .put_document(
            &Document::new("Exercise")
                .with_tag("$:/tags/Journal/Habit")
                .with_field("journal-field", "exercised")
                .with_field("habit-type", "checkbox")
                .with_field("habit-shorthand", "Ex"),
        )
        .unwrap();
    store.put_document(&day("2024-03-04", "2024-W10")).unwrap();
    store.take_changes().unwrap();

    let queries = JournalQueries::default();
    let context = RenderContext::for_subject("2024-03-04");
    let mut strip = IndicatorStrip::new();
    strip.build(&ViewEnv {
        store: &store,
        queries: &queries,
        context: &context,
    });
    assert!(strip.tree().is_empty());

    store
        .put_document(&day("2024-03-04", "2024-W10").with_field("exercised", "yes"))
        .unwrap();
    let changes = store.take_changes().unwrap();
    let rebuilt = strip.refresh(
        &changes,
        &ViewEnv {
            store: &store,
            queries: &queries,
            context: &context,
        },
    );
    assert!(rebuilt);
    assert_eq!(strip.tree().len(), 1);
    assert_eq!(strip.tree()[0].text_content(), "Ex");
}

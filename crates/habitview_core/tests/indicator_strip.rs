use habitview_core::{
    Document, IndicatorStrip, JournalQueries, MemoryStore, RenderContext, View, ViewEnv,
};

fn habit(title: &str, field: &str, kind: &str, shorthand: &str) -> Document {
    Document::new(title)
        .with_tag("$:/tags/Journal/Habit")
        .with_field("journal-field", field)
        .with_field("habit-type", kind)
        .with_field("habit-shorthand", shorthand)
}

fn render(store: &MemoryStore, subject: &str) -> Vec<(String, String)> {
    let queries = JournalQueries::default();
    let context = RenderContext::for_subject(subject);
    let mut strip = IndicatorStrip::new();
    strip.build(&ViewEnv {
        store,
        queries: &queries,
        context: &context,
    });
    strip
        .tree()
        .iter()
        .map(|node| {
            assert_eq!(node.name(), Some("span"));
            assert_eq!(node.attribute("class"), Some("habit-dot"));
            (
                node.text_content(),
                node.attribute("title").unwrap_or("").to_string(),
            )
        })
        .collect()
}

#[test]
fn checked_checkbox_shows_one_labeled_glyph() {
    let mut store = MemoryStore::new();
    store.put_document(habit("H1", "exercised", "checkbox", "Ex").with_field("caption", "Exercise"));
    store.put_document(Document::new("2024-03-04").with_field("exercised", "yes"));

    assert_eq!(
        render(&store, "2024-03-04"),
        vec![("Ex".to_string(), "Exercise".to_string())]
    );
}

#[test]
fn number_habit_hides_zero_and_shows_positive() {
    let mut store = MemoryStore::new();
    store.put_document(habit("H2", "steps", "number", "St"));
    store.put_document(Document::new("2024-03-04").with_field("steps", "0"));
    assert!(render(&store, "2024-03-04").is_empty());

    store.put_document(Document::new("2024-03-04").with_field("steps", "500"));
    assert_eq!(
        render(&store, "2024-03-04"),
        vec![("St".to_string(), "H2".to_string())]
    );
}

#[test]
fn glyphs_follow_roster_order_and_skip_missing_shorthand() {
    let mut store = MemoryStore::new();
    store.put_document(habit("Water", "water", "number", "W"));
    store.put_document(habit("Journaling", "journal", "text", "J"));
    store.put_document(habit("Anonymous", "anon", "checkbox", "  "));
    store.put_document(
        Document::new("2024-03-04")
            .with_field("water", "3")
            .with_field("journal", "wrote a page")
            .with_field("anon", "yes"),
    );

    let labels: Vec<String> = render(&store, "2024-03-04")
        .into_iter()
        .map(|(label, _)| label)
        .collect();
    assert_eq!(labels, vec!["J", "W"]);
}

#[test]
fn missing_subject_renders_nothing() {
    let mut store = MemoryStore::new();
    store.put_document(habit("H1", "exercised", "checkbox", "Ex"));
    assert!(render(&store, "no-such-day").is_empty());

    let queries = JournalQueries::default();
    let context = RenderContext::default();
    let mut strip = IndicatorStrip::new();
    strip.build(&ViewEnv {
        store: &store,
        queries: &queries,
        context: &context,
    });
    assert!(strip.tree().is_empty());
}

#[test]
fn unknown_type_uses_non_empty_rule() {
    let mut store = MemoryStore::new();
    store.put_document(habit("Mood", "mood", "rating", "M"));
    store.put_document(Document::new("d1").with_field("mood", "0"));
    store.put_document(Document::new("d2").with_field("mood", ""));

    assert_eq!(render(&store, "d1").len(), 1);
    assert!(render(&store, "d2").is_empty());
}

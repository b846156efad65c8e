use habitview_core::{Document, HabitRegistry, JournalQueries, JournalSchema, MemoryStore, ValueType};

const HABIT_TAG: &str = "$:/tags/Journal/Habit";

fn habit(title: &str, field: &str) -> Document {
    Document::new(title)
        .with_tag(HABIT_TAG)
        .with_field("journal-field", field)
}

#[test]
fn roster_sorts_by_caption_case_insensitively() {
    let mut store = MemoryStore::new();
    store.put_document(habit("zz-steps", "steps").with_field("caption", "Steps"));
    store.put_document(habit("aa-water", "water").with_field("caption", "water"));
    store.put_document(habit("Meditation", "meditated"));

    let queries = JournalQueries::default();
    let roster = HabitRegistry::new(&queries).roster(&store).unwrap();
    assert_eq!(roster.titles, vec!["Meditation", "zz-steps", "aa-water"]);
    let captions: Vec<&str> = roster.habits.iter().map(|h| h.caption.as_str()).collect();
    assert_eq!(captions, vec!["Meditation", "Steps", "water"]);
}

#[test]
fn drafts_are_excluded_and_inert_definitions_only_tracked() {
    let mut store = MemoryStore::new();
    store.put_document(habit("Exercise", "exercised").with_field("habit-type", "checkbox"));
    store.put_document(
        habit("Draft of 'Exercise'", "exercised").with_field("draft.of", "Exercise"),
    );
    store.put_document(Document::new("Inert").with_tag(HABIT_TAG));
    store.put_document(Document::new("2024-03-04").with_field("journal-field", "x"));

    let queries = JournalQueries::default();
    let roster = HabitRegistry::new(&queries).roster(&store).unwrap();
    assert_eq!(roster.titles, vec!["Exercise", "Inert"]);
    assert_eq!(roster.habits.len(), 1);
    assert_eq!(roster.habits[0].value_type(), ValueType::Checkbox);
}

#[test]
fn active_habits_are_stable_across_calls() {
    let mut store = MemoryStore::new();
    for (title, caption) in [("b", "Same"), ("a", "Same"), ("c", "Other")] {
        store.put_document(habit(title, title).with_field("caption", caption));
    }

    let queries = JournalQueries::default();
    let registry = HabitRegistry::new(&queries);
    let first = registry.active_habits(&store).unwrap();
    let second = registry.active_habits(&store).unwrap();
    assert_eq!(first, second);
    let titles: Vec<&str> = first.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["c", "a", "b"]);
}

#[test]
fn custom_schema_changes_habit_tag_and_fields() {
    let schema = JournalSchema {
        habit_tag: "Habit".to_string(),
        field_field: "target".to_string(),
        ..JournalSchema::default()
    };
    let mut store = MemoryStore::new();
    store.put_document(Document::new("Run").with_tag("Habit").with_field("target", "ran"));
    store.put_document(habit("Ignored", "x"));

    let queries = JournalQueries::new(schema);
    let habits = HabitRegistry::new(&queries).active_habits(&store).unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].accessor.field, "ran");
    assert_eq!(habits[0].value_type(), ValueType::Number);
}

mod helpers;

use helpers::{test_store, text_draft};
use kioku::store::types::ContextSlots;
use tempfile::TempDir;

/// The canonical end-to-end flow: create a category and a glyph pin, link
/// them, watch the counts and the filtered pin set, then delete the pin and
/// watch the count fall back to zero.
#[test]
fn shrine_pin_lifecycle() {
    let dir = TempDir::new().unwrap();
    let mut store = test_store(dir.path());

    let shrine = store.add_category("shrine").unwrap();
    let pin = store.add_pin(text_draft("寺")).unwrap();
    store.set_pin_categories(&pin, &[shrine.clone()]).unwrap();

    let counts = store.categories_with_counts();
    assert_eq!(counts[0].category.id, shrine);
    assert_eq!(counts[0].pin_count, 1);

    let visible: Vec<_> = store
        .pins_for_category(Some(&shrine))
        .iter()
        .map(|p| p.id.clone())
        .collect();
    assert_eq!(visible, [pin.clone()]);

    store.delete_pin(&pin);

    let counts = store.categories_with_counts();
    assert_eq!(counts[0].category.id, shrine);
    assert_eq!(counts[0].pin_count, 0);
    assert!(store.pins_for_category(Some(&shrine)).is_empty());
}

#[test]
fn set_pin_categories_is_idempotent_in_content() {
    let dir = TempDir::new().unwrap();
    let mut store = test_store(dir.path());

    let pin = store.add_pin(text_draft("🍵")).unwrap();
    let a = store.add_category("tea").unwrap();
    let b = store.add_category("garden").unwrap();

    store.set_pin_categories(&pin, &[a.clone(), b.clone()]).unwrap();
    let first: Vec<_> = store
        .categories_for_pin(&pin)
        .iter()
        .map(|c| c.id.clone())
        .collect();

    // Same ids again, different order — same resolved set
    store.set_pin_categories(&pin, &[b.clone(), a.clone()]).unwrap();
    let mut second: Vec<_> = store
        .categories_for_pin(&pin)
        .iter()
        .map(|c| c.id.clone())
        .collect();

    let mut first_sorted = first.clone();
    first_sorted.sort();
    second.sort();
    assert_eq!(first_sorted, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn filter_toggle_controls_visible_pins() {
    let dir = TempDir::new().unwrap();
    let mut store = test_store(dir.path());

    let tagged = store.add_pin(text_draft("寺")).unwrap();
    let _untagged = store.add_pin(text_draft("🍜")).unwrap();
    let shrine = store.add_category("shrine").unwrap();
    store.set_pin_categories(&tagged, &[shrine.clone()]).unwrap();

    // No filter: everything
    assert_eq!(store.visible_pins().len(), 2);

    store.toggle_category_filter(&shrine);
    let visible: Vec<_> = store.visible_pins().iter().map(|p| p.id.clone()).collect();
    assert_eq!(visible, [tagged.clone()]);

    // Re-selecting the same category clears the filter
    store.toggle_category_filter(&shrine);
    assert_eq!(store.selected_category(), None);
    assert_eq!(store.visible_pins().len(), 2);
}

#[test]
fn detail_view_reads_back_everything_the_edit_flow_wrote() {
    let dir = TempDir::new().unwrap();
    let mut store = test_store(dir.path());

    let mut draft = text_draft("⛩");
    draft.note = Some("夕暮れの鳥居".into());
    draft.rank = 1;
    let pin = store.add_pin(draft).unwrap();

    let shrine = store.add_category("shrine").unwrap();
    store.set_pin_categories(&pin, &[shrine]).unwrap();
    store
        .set_context_meta(
            &pin,
            ContextSlots {
                slot1: Some("晴れ".into()),
                slot4: Some("家族と".into()),
                ..ContextSlots::default()
            },
        )
        .unwrap();

    let details = store.pin_with_details(&pin).unwrap();
    assert_eq!(details.pin.note.as_deref(), Some("夕暮れの鳥居"));
    assert_eq!(details.pin.rank, 1);
    assert_eq!(details.categories.len(), 1);
    let meta = details.context_meta.unwrap();
    assert_eq!(meta.slot1.as_deref(), Some("晴れ"));
    assert_eq!(meta.slot2, None);
    assert_eq!(meta.slot4.as_deref(), Some("家族と"));
}

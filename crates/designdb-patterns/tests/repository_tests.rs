use designdb_core::traits::PatternStore;
use designdb_core::types::{ColorPattern, Pattern, PatternData, PatternMetadata, PatternQuery};
use designdb_patterns::{builtin_patterns, PatternRepository};
use tempfile::TempDir;

fn color(id: &str, category: &str, tags: &[&str]) -> Pattern {
    Pattern {
        id: id.into(),
        category: category.into(),
        name: id.to_uppercase(),
        data: PatternData::Color(ColorPattern { primary: "#123456".into(), tags: tags.iter().map(|t| t.to_string()).collect(), ..ColorPattern::default() }),
        metadata: PatternMetadata::now("test"),
    }
}

#[test]
fn tag_lookup_uses_any_overlap() {
    let repo = PatternRepository::new();
    repo.register(vec![color("p1", "color", &["modern", "calm"]), color("p2", "color", &["bold"])]);
    let found = repo.find(&PatternQuery::default().with_tags(&["calm"]));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "p1");

    let either = repo.find(&PatternQuery::default().with_tags(&["bold", "modern"]));
    let ids: Vec<_> = either.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
}

#[test]
fn category_filter_alone_keeps_registration_order() {
    let repo = PatternRepository::new();
    repo.register(vec![color("a", "color", &[]), color("b", "spacing", &[]), color("c", "color", &[])]);
    let ids: Vec<_> = repo.find(&PatternQuery::category("color")).into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert!(repo.find(&PatternQuery::category("nope")).is_empty());

    // no filter: buckets in creation order
    let all: Vec<_> = repo.find(&PatternQuery::default()).into_iter().map(|p| p.id).collect();
    assert_eq!(all, vec!["a", "c", "b"]);
    assert_eq!(repo.categories(), vec!["color", "spacing"]);
}

#[test]
fn duplicate_ids_are_tolerated_first_wins() {
    let repo = PatternRepository::new();
    repo.register(vec![color("dup", "spacing", &["first"]), color("dup", "color", &["second"])]);
    assert_eq!(repo.len(), 2);
    let p = repo.get_by_id("dup").expect("found");
    assert_eq!(p.category, "spacing");
    assert!(repo.get_by_id("missing").is_none());
}

#[test]
fn saved_patterns_are_visible_to_later_lookups() {
    let repo = PatternRepository::with_builtin();
    let before = repo.len();
    repo.save(color("generated-1", "generated", &["calm"])).expect("save");
    assert_eq!(repo.len(), before + 1);
    assert_eq!(repo.find(&PatternQuery::category("generated")).len(), 1);
    assert!(repo.save(color("bad", " ", &[])).is_err());
}

#[test]
fn persistence_round_trips_saved_patterns_only() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("store/patterns.json");
    {
        let repo = PatternRepository::with_builtin().with_persistence(&path).expect("open");
        repo.save(color("generated-a", "generated", &["bold"])).expect("save");
        repo.save(color("generated-b", "generated", &["calm"])).expect("save");
    }
    let restored = PatternRepository::new().with_persistence(&path).expect("reopen");
    assert_eq!(restored.len(), 2, "static patterns are not written out");
    assert_eq!(restored.get_by_id("generated-b").map(|p| p.tags().to_vec()), Some(vec!["calm".to_string()]));
}

#[test]
fn builtin_patterns_cover_foundation_categories() {
    let repo = PatternRepository::with_builtin();
    for category in ["color", "typography", "spacing", "component"] {
        assert!(!repo.find(&PatternQuery::category(category)).is_empty(), "{category}");
    }
    let calm = repo.find(&PatternQuery::category("color").with_tags(&["calm"]));
    assert_eq!(calm[0].id, "color-calm-teal");
    assert!(builtin_patterns().iter().all(|p| !p.category.is_empty() && !p.tags().is_empty()));
    assert!(!PatternStore::is_empty(&repo));
}

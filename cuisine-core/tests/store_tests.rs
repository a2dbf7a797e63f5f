//! End-to-end behavior of the recipe store and comment manager against an
//! in-memory remote service.

use cuisine_core::{
    FakeRecipeApi, ListSource, MemoryCache, NewComment, Recipe, RecipeCache, RecipeDraft,
    RecipeFilter, RecipePatch, RecipeStore,
};
use std::sync::Arc;

struct Harness {
    api: Arc<FakeRecipeApi>,
    cache: Arc<MemoryCache>,
    store: RecipeStore,
}

fn harness() -> Harness {
    let api = Arc::new(FakeRecipeApi::new());
    let cache = Arc::new(MemoryCache::new());
    let store = RecipeStore::builder(api.clone())
        .cache(Some(cache.clone()))
        .build();
    Harness { api, cache, store }
}

fn tarte() -> RecipeDraft {
    RecipeDraft {
        title: "Tarte".to_string(),
        description: "desc".to_string(),
        ingredients: vec!["pomme".to_string()],
        category: "Dessert".to_string(),
        author: "bob".to_string(),
        ..Default::default()
    }
}

fn carbonara() -> RecipeDraft {
    RecipeDraft {
        title: "Pâtes carbonara".to_string(),
        description: "Un classique italien simple et délicieux".to_string(),
        instructions: "1. Cuire les pâtes...".to_string(),
        ingredients: vec![
            "Pâtes".to_string(),
            "Lardons".to_string(),
            "Crème fraîche".to_string(),
        ],
        category: "Plat principal".to_string(),
        cooking_time: Some(20),
        image: Some("https://example.com/carbonara.jpg".to_string()),
        author: "chef123".to_string(),
    }
}

fn cached_ids(cache: &MemoryCache) -> Vec<String> {
    cache
        .read()
        .unwrap()
        .unwrap_or_default()
        .into_iter()
        .map(|r| r.id)
        .collect()
}

#[tokio::test]
async fn test_tarte_scenario() {
    let h = harness();

    let recipe = h.store.create_recipe(tarte()).await.unwrap();
    let digits = recipe.id.strip_prefix("recipe_").unwrap();
    assert!(!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(recipe.likes, 0);
    assert!(recipe.comments.is_empty());

    let recipe = h
        .store
        .comments()
        .add_comment(&recipe.id, NewComment::new("Delicious", "bob"))
        .await
        .unwrap();
    assert_eq!(recipe.comments.len(), 1);
    assert_eq!(recipe.comments[0].text, "Delicious");
    assert_eq!(recipe.comments[0].author, "bob");

    h.store.delete_recipe(&recipe.id).await.unwrap();
    let err = h.store.get_recipe(&recipe.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_create_then_get_returns_input_plus_assigned_fields() {
    let h = harness();
    let draft = carbonara();

    let created = h.store.create_recipe(draft.clone()).await.unwrap();
    let fetched = h.store.get_recipe(&created.id).await.unwrap();

    let expected = Recipe::from_draft(draft, created.id.clone(), created.created_at.clone());
    assert_eq!(fetched, expected);
    assert!(chrono::DateTime::parse_from_rfc3339(&fetched.created_at).is_ok());
}

#[tokio::test]
async fn test_create_reports_every_missing_field() {
    let h = harness();
    let err = h
        .store
        .create_recipe(RecipeDraft {
            title: "Only a title".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    match err {
        cuisine_core::StoreError::Validation(errors) => {
            assert_eq!(errors.fields(), vec!["description", "ingredients", "category"]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(h.api.request_count(), 0);
}

#[tokio::test]
async fn test_ids_are_unique_for_back_to_back_creates() {
    let h = harness();
    let a = h.store.create_recipe(tarte()).await.unwrap();
    let b = h.store.create_recipe(tarte()).await.unwrap();
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let h = harness();
    let recipe = h.store.create_recipe(tarte()).await.unwrap();

    h.store.delete_recipe(&recipe.id).await.unwrap();
    h.store.delete_recipe(&recipe.id).await.unwrap();
    h.store.delete_recipe("never_existed").await.unwrap();
}

#[tokio::test]
async fn test_update_changes_only_provided_fields() {
    let h = harness();
    let original = h.store.create_recipe(carbonara()).await.unwrap();

    let updated = h
        .store
        .update_recipe(
            &original.id,
            RecipePatch {
                title: Some("X".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "X");
    let mut expected = original.clone();
    expected.title = "X".to_string();
    assert_eq!(updated, expected);
    assert_eq!(updated.id.as_bytes(), original.id.as_bytes());
    assert_eq!(updated.author.as_bytes(), original.author.as_bytes());
    assert_eq!(updated.created_at.as_bytes(), original.created_at.as_bytes());

    // And the remote agrees
    assert_eq!(h.store.get_recipe(&original.id).await.unwrap(), expected);
}

#[tokio::test]
async fn test_update_ignores_attempts_to_change_immutable_fields() {
    let h = harness();
    let original = h.store.create_recipe(tarte()).await.unwrap();

    let patch: RecipePatch = serde_json::from_value(serde_json::json!({
        "id": "hijacked",
        "author": "mallory",
        "createdAt": "1970-01-01T00:00:00Z",
        "likes": 1000,
        "description": "better desc"
    }))
    .unwrap();
    let updated = h.store.update_recipe(&original.id, patch).await.unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.author, "bob");
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.likes, 0);
    assert_eq!(updated.description, "better desc");
}

#[tokio::test]
async fn test_update_missing_recipe_is_not_found() {
    let h = harness();
    let err = h
        .store
        .update_recipe(
            "recipe_404",
            RecipePatch {
                title: Some("X".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_update_rejects_blanking_a_required_field() {
    let h = harness();
    let original = h.store.create_recipe(tarte()).await.unwrap();
    let err = h
        .store
        .update_recipe(
            &original.id,
            RecipePatch {
                ingredients: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_comment_lifecycle_preserves_order() {
    let h = harness();
    let recipe = h.store.create_recipe(tarte()).await.unwrap();
    let comments = h.store.comments();

    for (text, author) in [("first", "alice"), ("second", "bob"), ("third", "carol")] {
        let before = h.store.get_recipe(&recipe.id).await.unwrap().comments.len();
        let after = comments
            .add_comment(&recipe.id, NewComment::new(text, author))
            .await
            .unwrap();
        assert_eq!(after.comments.len(), before + 1);
        assert_eq!(after.comments.last().unwrap().text, text);
    }

    let current = h.store.get_recipe(&recipe.id).await.unwrap();
    let second = current.comments[1].clone();

    // Edit keeps author, date and id
    let edited = comments
        .update_comment(&recipe.id, &second.id, "second, edited")
        .await
        .unwrap();
    let edited_comment = &edited.comments[1];
    assert_eq!(edited_comment.text, "second, edited");
    assert_eq!(edited_comment.id, second.id);
    assert_eq!(edited_comment.author, second.author);
    assert_eq!(edited_comment.date, second.date);
    assert_eq!(edited.title, current.title);

    // Delete removes exactly one and keeps the rest in order
    let first_id = current.comments[0].id.clone();
    let after_delete = comments.delete_comment(&recipe.id, &first_id).await.unwrap();
    let texts: Vec<&str> = after_delete.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["second, edited", "third"]);
}

#[tokio::test]
async fn test_comment_errors() {
    let h = harness();
    let recipe = h.store.create_recipe(tarte()).await.unwrap();
    let comments = h.store.comments();
    let recipe = comments
        .add_comment(&recipe.id, NewComment::new("hello", "bob"))
        .await
        .unwrap();
    let id = recipe.comments[0].id.clone();

    let missing = cuisine_core::CommentId::parse("comment_0");
    assert!(comments
        .delete_comment(&recipe.id, &missing)
        .await
        .unwrap_err()
        .is_not_found());
    assert!(comments
        .update_comment(&recipe.id, &missing, "text")
        .await
        .unwrap_err()
        .is_not_found());
    assert!(comments
        .update_comment(&recipe.id, &id, "")
        .await
        .unwrap_err()
        .is_validation());

    // Nothing changed
    let unchanged = h.store.get_recipe(&recipe.id).await.unwrap();
    assert_eq!(unchanged.comments, recipe.comments);
}

#[tokio::test]
async fn test_listing_replaces_mirror_and_mutations_patch_it() {
    let h = harness();
    let a = h.store.create_recipe(tarte()).await.unwrap();
    let b = h.store.create_recipe(carbonara()).await.unwrap();

    let listing = h.store.list_recipes().await.unwrap();
    assert_eq!(listing.source, ListSource::Remote);
    assert_eq!(listing.recipes.len(), 2);
    assert_eq!(cached_ids(&h.cache), vec![a.id.clone(), b.id.clone()]);

    let c = h.store.create_recipe(tarte()).await.unwrap();
    assert_eq!(
        cached_ids(&h.cache),
        vec![a.id.clone(), b.id.clone(), c.id.clone()]
    );

    h.store
        .update_recipe(
            &b.id,
            RecipePatch {
                title: Some("Carbo".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let snapshot = h.cache.read().unwrap().unwrap();
    assert_eq!(snapshot[1].title, "Carbo");

    h.store.delete_recipe(&a.id).await.unwrap();
    assert_eq!(cached_ids(&h.cache), vec![b.id.clone(), c.id.clone()]);

    let with_comment = h
        .store
        .comments()
        .add_comment(&c.id, NewComment::new("Miam", "alice"))
        .await
        .unwrap();
    let snapshot = h.cache.read().unwrap().unwrap();
    assert_eq!(snapshot[1], with_comment);
    assert_eq!(snapshot, h.api.snapshot());
}

#[tokio::test]
async fn test_remote_wins_over_mirror() {
    let h = harness();
    h.store.create_recipe(tarte()).await.unwrap();
    h.cache.write(&[]).unwrap();

    let listing = h.store.list_recipes().await.unwrap();
    assert_eq!(listing.recipes.len(), 1);
    assert_eq!(cached_ids(&h.cache).len(), 1);
}

#[tokio::test]
async fn test_listing_falls_back_to_stale_mirror() {
    let h = harness();
    h.store.create_recipe(tarte()).await.unwrap();
    h.store.list_recipes().await.unwrap();

    h.api.set_online(false);
    let listing = h.store.list_recipes().await.unwrap();
    assert!(listing.is_stale());
    assert_eq!(listing.recipes.len(), 1);
    match listing.source {
        ListSource::StaleCache { reason } => assert!(reason.contains("offline")),
        ListSource::Remote => panic!("expected stale listing"),
    }
}

#[tokio::test]
async fn test_listing_failure_without_mirror_is_an_error() {
    let h = harness();
    h.api.set_online(false);
    let err = h.store.list_recipes().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_listing_failure_with_fallback_disabled_is_an_error() {
    let api = Arc::new(FakeRecipeApi::new());
    let cached = Recipe::from_draft(
        tarte(),
        "recipe_1".to_string(),
        "2024-03-01T12:00:00.000Z".to_string(),
    );
    let cache = Arc::new(MemoryCache::with_recipes(vec![cached]));
    let store = RecipeStore::builder(api.clone())
        .cache(Some(cache))
        .stale_fallback(false)
        .build();

    api.set_online(false);
    assert!(store.list_recipes().await.unwrap_err().is_transport());
    // The snapshot is still reachable explicitly
    assert_eq!(store.cached_recipes().unwrap().recipes.len(), 1);
}

#[tokio::test]
async fn test_failed_listing_over_empty_mirror_is_an_error() {
    let h = harness();
    assert!(h.store.list_recipes().await.unwrap().recipes.is_empty());
    assert_eq!(h.cache.read().unwrap(), Some(vec![]));

    h.api.set_online(false);
    let err = h.store.list_recipes().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_deleting_everything_then_going_offline_is_an_error() {
    let h = harness();
    let recipe = h.store.create_recipe(tarte()).await.unwrap();
    h.store.list_recipes().await.unwrap();
    h.store.delete_recipe(&recipe.id).await.unwrap();
    assert!(cached_ids(&h.cache).is_empty());

    h.api.set_online(false);
    assert!(h.store.list_recipes().await.unwrap_err().is_transport());
}

#[tokio::test]
async fn test_empty_remote_collection_is_an_empty_success() {
    let h = harness();
    let listing = h.store.list_recipes().await.unwrap();
    assert!(listing.recipes.is_empty());
    assert!(!listing.is_stale());
    assert_eq!(h.cache.read().unwrap(), Some(vec![]));
}

#[tokio::test]
async fn test_mutations_fail_with_transport_error_when_offline() {
    let h = harness();
    let recipe = h.store.create_recipe(tarte()).await.unwrap();
    h.api.set_online(false);

    assert!(h.store.get_recipe(&recipe.id).await.unwrap_err().is_transport());
    assert!(h.store.create_recipe(tarte()).await.unwrap_err().is_transport());
    assert!(h.store.delete_recipe(&recipe.id).await.unwrap_err().is_transport());
    assert!(h
        .store
        .comments()
        .add_comment(&recipe.id, NewComment::new("hi", "bob"))
        .await
        .unwrap_err()
        .is_transport());
}

#[tokio::test]
async fn test_filtered_listing() {
    let h = harness();
    h.store.create_recipe(tarte()).await.unwrap();
    h.store.create_recipe(tarte()).await.unwrap();
    h.store.create_recipe(carbonara()).await.unwrap();

    let listing = h
        .store
        .list_recipes()
        .await
        .unwrap()
        .filtered(&RecipeFilter::default().category("Dessert").author("bob"));
    assert_eq!(listing.recipes.len(), 2);
    assert!(listing
        .recipes
        .iter()
        .all(|r| r.category == "Dessert" && r.author == "bob"));
    assert!(!listing.is_stale());
}

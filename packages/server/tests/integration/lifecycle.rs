use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::common::{TestApp, routes};
use server::entity::{comment, review, user, wine};

#[tokio::test]
async fn deleting_a_review_removes_its_comments() {
    let app = TestApp::spawn().await;
    let alice = app.google_login("sub-1", "alice@example.com").await;
    let bob = app.google_login("sub-2", "bob@example.com").await;
    let wine_id = app.create_wine(&alice, "Test Wine").await;
    let review_id = app.create_review(&alice, wine_id, 4).await;
    app.create_comment(&alice, review_id, "mine").await;
    app.create_comment(&bob, review_id, "also here").await;

    let res = app.delete_with_token(&routes::review(review_id), &alice).await;
    assert_eq!(res.status, 204);

    let remaining = comment::Entity::find()
        .filter(comment::Column::ReviewId.eq(review_id))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn deleting_a_user_removes_their_reviews_and_transitively_comments() {
    let app = TestApp::spawn().await;
    let alice = app.google_login("sub-1", "alice@example.com").await;
    let bob = app.google_login("sub-2", "bob@example.com").await;
    let wine_id = app.create_wine(&alice, "Test Wine").await;

    let alice_review = app.create_review(&alice, wine_id, 5).await;
    let bob_review = app.create_review(&bob, wine_id, 2).await;
    app.create_comment(&bob, alice_review, "on alice's review").await;
    app.create_comment(&alice, bob_review, "alice's stray comment")
        .await;

    let alice_id = app.get_with_token(routes::ME, &alice).await.id();

    let res = app.delete_with_token(routes::ME, &alice).await;
    assert_eq!(res.status, 204);

    // Alice, her reviews, comments on them, and her comments elsewhere are gone.
    assert_eq!(
        user::Entity::find_by_id(alice_id)
            .count(&app.db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        review::Entity::find()
            .filter(review::Column::UserId.eq(alice_id))
            .count(&app.db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        comment::Entity::find()
            .filter(comment::Column::ReviewId.eq(alice_review))
            .count(&app.db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        comment::Entity::find()
            .filter(comment::Column::UserId.eq(alice_id))
            .count(&app.db)
            .await
            .unwrap(),
        0
    );

    // Bob's review survives, now without alice's comment.
    assert_eq!(
        review::Entity::find_by_id(bob_review)
            .count(&app.db)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn deleting_a_wine_removes_its_reviews_and_their_comments() {
    let app = TestApp::spawn().await;
    let alice = app.google_login("sub-1", "alice@example.com").await;
    let bob = app.google_login("sub-2", "bob@example.com").await;
    let doomed_wine = app.create_wine(&alice, "Doomed Wine").await;
    let kept_wine = app.create_wine(&alice, "Kept Wine").await;

    let doomed_review = app.create_review(&alice, doomed_wine, 4).await;
    let kept_review = app.create_review(&bob, kept_wine, 3).await;
    app.create_comment(&bob, doomed_review, "goes with the wine").await;
    app.create_comment(&alice, kept_review, "stays").await;

    let res = app.delete_with_token(&routes::wine(doomed_wine), &alice).await;
    assert_eq!(res.status, 204);

    assert_eq!(
        wine::Entity::find_by_id(doomed_wine)
            .count(&app.db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        review::Entity::find()
            .filter(review::Column::WineId.eq(doomed_wine))
            .count(&app.db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        comment::Entity::find()
            .filter(comment::Column::ReviewId.eq(doomed_review))
            .count(&app.db)
            .await
            .unwrap(),
        0
    );

    // Unrelated data is untouched.
    assert_eq!(
        review::Entity::find_by_id(kept_review)
            .count(&app.db)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        comment::Entity::find()
            .filter(comment::Column::ReviewId.eq(kept_review))
            .count(&app.db)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn double_delete_reports_not_found_second_time() {
    let app = TestApp::spawn().await;
    let token = app.google_login("sub-1", "alice@example.com").await;
    let wine_id = app.create_wine(&token, "Test Wine").await;
    let review_id = app.create_review(&token, wine_id, 4).await;

    let first = app.delete_with_token(&routes::review(review_id), &token).await;
    assert_eq!(first.status, 204);

    let second = app.delete_with_token(&routes::review(review_id), &token).await;
    assert_eq!(second.status, 404);
    assert_eq!(second.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn storage_layer_cascade_backstops_raw_parent_deletes() {
    let app = TestApp::spawn().await;
    let token = app.google_login("sub-1", "alice@example.com").await;
    let wine_id = app.create_wine(&token, "Test Wine").await;
    let review_id = app.create_review(&token, wine_id, 4).await;
    app.create_comment(&token, review_id, "hanging on").await;

    // Delete the review row directly, bypassing the handlers; the declared
    // ON DELETE CASCADE constraint must sweep the comments.
    review::Entity::delete_by_id(review_id)
        .exec(&app.db)
        .await
        .unwrap();

    let remaining = comment::Entity::find()
        .filter(comment::Column::ReviewId.eq(review_id))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

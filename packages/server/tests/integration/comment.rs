use serde_json::json;

use crate::common::{TestApp, routes};

mod creation {
    use super::*;

    #[tokio::test]
    async fn authenticated_user_can_comment_on_any_review() {
        let app = TestApp::spawn().await;
        let alice = app.google_login("sub-1", "alice@example.com").await;
        let bob = app.google_login("sub-2", "bob@example.com").await;
        let wine_id = app.create_wine(&alice, "Test Wine").await;
        let review_id = app.create_review(&alice, wine_id, 4).await;

        let res = app
            .post_with_token(
                routes::COMMENTS,
                &json!({"reviewId": review_id, "content": "Agreed on the tannin."}),
                &bob,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["reviewId"], review_id);
        assert_eq!(res.body["content"], "Agreed on the tannin.");
    }

    #[tokio::test]
    async fn blank_content_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.google_login("sub-1", "alice@example.com").await;
        let wine_id = app.create_wine(&token, "Test Wine").await;
        let review_id = app.create_review(&token, wine_id, 4).await;

        let res = app
            .post_with_token(
                routes::COMMENTS,
                &json!({"reviewId": review_id, "content": "   \n "}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_review_id_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.google_login("sub-1", "alice@example.com").await;

        let res = app
            .post_with_token(routes::COMMENTS, &json!({"content": "orphan"}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn commenting_on_missing_review_is_a_404() {
        let app = TestApp::spawn().await;
        let token = app.google_login("sub-1", "alice@example.com").await;

        let res = app
            .post_with_token(
                routes::COMMENTS,
                &json!({"reviewId": 9999, "content": "hello?"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn commenting_without_session_is_unauthenticated() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::COMMENTS, &json!({"reviewId": 1, "content": "hi"}))
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "UNAUTHENTICATED");
    }
}

mod updates {
    use super::*;

    #[tokio::test]
    async fn author_can_edit_their_comment() {
        let app = TestApp::spawn().await;
        let token = app.google_login("sub-1", "alice@example.com").await;
        let wine_id = app.create_wine(&token, "Test Wine").await;
        let review_id = app.create_review(&token, wine_id, 4).await;
        let comment_id = app.create_comment(&token, review_id, "first draft").await;

        let res = app
            .put_with_token(
                routes::COMMENTS,
                &json!({"id": comment_id, "content": "second draft"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["content"], "second draft");
    }

    #[tokio::test]
    async fn non_author_edit_is_forbidden_and_changes_nothing() {
        let app = TestApp::spawn().await;
        let alice = app.google_login("sub-1", "alice@example.com").await;
        let mallory = app.google_login("sub-2", "mallory@example.com").await;
        let wine_id = app.create_wine(&alice, "Test Wine").await;
        let review_id = app.create_review(&alice, wine_id, 4).await;
        let comment_id = app.create_comment(&alice, review_id, "original").await;

        let res = app
            .put_with_token(
                routes::COMMENTS,
                &json!({"id": comment_id, "content": "defaced"}),
                &mallory,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "FORBIDDEN");

        let list = app
            .get_with_token(&routes::review_comments(review_id), &alice)
            .await;
        assert_eq!(list.body["content"][0]["content"], "original");
    }

    #[tokio::test]
    async fn blank_replacement_text_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.google_login("sub-1", "alice@example.com").await;
        let wine_id = app.create_wine(&token, "Test Wine").await;
        let review_id = app.create_review(&token, wine_id, 4).await;
        let comment_id = app.create_comment(&token, review_id, "fine").await;

        let res = app
            .put_with_token(
                routes::COMMENTS,
                &json!({"id": comment_id, "content": ""}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn editing_missing_comment_is_a_404() {
        let app = TestApp::spawn().await;
        let token = app.google_login("sub-1", "alice@example.com").await;

        let res = app
            .put_with_token(
                routes::COMMENTS,
                &json!({"id": 9999, "content": "ghost"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn author_can_delete_their_comment() {
        let app = TestApp::spawn().await;
        let token = app.google_login("sub-1", "alice@example.com").await;
        let wine_id = app.create_wine(&token, "Test Wine").await;
        let review_id = app.create_review(&token, wine_id, 4).await;
        let comment_id = app.create_comment(&token, review_id, "delete me").await;

        let res = app
            .delete_with_token(&routes::comment(comment_id), &token)
            .await;
        assert_eq!(res.status, 204);

        let list = app
            .get_with_token(&routes::review_comments(review_id), &token)
            .await;
        assert_eq!(list.body["totalElements"], 0);
    }

    #[tokio::test]
    async fn non_author_delete_is_forbidden() {
        let app = TestApp::spawn().await;
        let alice = app.google_login("sub-1", "alice@example.com").await;
        let mallory = app.google_login("sub-2", "mallory@example.com").await;
        let wine_id = app.create_wine(&alice, "Test Wine").await;
        let review_id = app.create_review(&alice, wine_id, 4).await;
        let comment_id = app.create_comment(&alice, review_id, "mine").await;

        let res = app
            .delete_with_token(&routes::comment(comment_id), &mallory)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn deleting_without_session_is_unauthenticated() {
        let app = TestApp::spawn().await;

        let res = app.delete_without_token(&routes::comment(1)).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn deleting_nonexistent_comment_is_a_404() {
        let app = TestApp::spawn().await;
        let token = app.google_login("sub-1", "alice@example.com").await;

        let res = app.delete_with_token(&routes::comment(9999), &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn own_comments_list_is_scoped_to_the_caller() {
        let app = TestApp::spawn().await;
        let alice = app.google_login("sub-1", "alice@example.com").await;
        let bob = app.google_login("sub-2", "bob@example.com").await;
        let wine_id = app.create_wine(&alice, "Test Wine").await;
        let review_id = app.create_review(&alice, wine_id, 4).await;

        app.create_comment(&alice, review_id, "alice says").await;
        app.create_comment(&bob, review_id, "bob says").await;

        let res = app.get_with_token(routes::COMMENTS, &alice).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["totalElements"], 1);
        assert_eq!(res.body["content"][0]["content"], "alice says");
    }

    #[tokio::test]
    async fn review_comment_list_requires_existing_review() {
        let app = TestApp::spawn().await;
        let token = app.google_login("sub-1", "alice@example.com").await;

        let res = app
            .get_with_token(&routes::review_comments(9999), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn review_comment_list_is_paginated() {
        let app = TestApp::spawn().await;
        let token = app.google_login("sub-1", "alice@example.com").await;
        let wine_id = app.create_wine(&token, "Test Wine").await;
        let review_id = app.create_review(&token, wine_id, 4).await;
        for i in 0..5 {
            app.create_comment(&token, review_id, &format!("comment {i}"))
                .await;
        }

        let res = app
            .get_with_token(
                &format!("{}?page=1&size=2", routes::review_comments(review_id)),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["content"].as_array().unwrap().len(), 2);
        assert_eq!(res.body["totalElements"], 5);
        assert_eq!(res.body["totalPages"], 3);
    }

    #[tokio::test]
    async fn listing_without_session_is_unauthenticated() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::COMMENTS).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "UNAUTHENTICATED");
    }
}

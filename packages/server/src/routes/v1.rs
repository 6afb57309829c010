use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/wines", wine_routes())
        .nest("/reviews", review_routes())
        .nest("/comments", comment_routes())
        .nest("/files", file_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::google_exchange))
        .routes(routes!(handlers::auth::login))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::user::me, handlers::user::delete_me))
}

fn wine_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::wine::list_wines,
            handlers::wine::create_wine
        ))
        .routes(routes!(
            handlers::wine::get_wine,
            handlers::wine::update_wine,
            handlers::wine::delete_wine
        ))
}

fn review_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::review::list_reviews,
            handlers::review::create_review
        ))
        .routes(routes!(
            handlers::review::get_review,
            handlers::review::update_review,
            handlers::review::delete_review
        ))
}

fn comment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::comment::list_my_comments,
            handlers::comment::create_comment,
            handlers::comment::update_comment
        ))
        .routes(routes!(
            handlers::comment::list_review_comments,
            handlers::comment::delete_comment
        ))
}

fn file_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::upload::upload_file))
        .layer(handlers::upload::upload_body_limit())
}

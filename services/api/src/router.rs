use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use critiq_core::health::healthz;
use critiq_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    category::{create_category, delete_category, get_categories},
    comment::{create_comment, delete_comment, get_comment, get_comments, update_comment},
    genre::{create_genre, delete_genre, get_genres},
    health::readyz,
    review::{create_review, delete_review, get_review, get_reviews, update_review},
    signup::signup,
    title::{create_title, delete_title, get_title, get_titles, update_title},
    token::create_token,
    user::{create_user, delete_user, get_me, get_user, get_users, update_me, update_user},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/signup", post(signup))
        .route("/auth/token", post(create_token))
        // Users
        .route("/users", get(get_users))
        .route("/users", post(create_user))
        .route("/users/@me", get(get_me))
        .route("/users/@me", patch(update_me))
        .route("/users/{username}", get(get_user))
        .route("/users/{username}", patch(update_user))
        .route("/users/{username}", delete(delete_user))
        // Categories
        .route("/categories", get(get_categories))
        .route("/categories", post(create_category))
        .route("/categories/{slug}", delete(delete_category))
        // Genres
        .route("/genres", get(get_genres))
        .route("/genres", post(create_genre))
        .route("/genres/{slug}", delete(delete_genre))
        // Titles
        .route("/titles", get(get_titles))
        .route("/titles", post(create_title))
        .route("/titles/{title_id}", get(get_title))
        .route("/titles/{title_id}", patch(update_title))
        .route("/titles/{title_id}", delete(delete_title))
        // Reviews
        .route("/titles/{title_id}/reviews", get(get_reviews))
        .route("/titles/{title_id}/reviews", post(create_review))
        .route("/titles/{title_id}/reviews/{review_id}", get(get_review))
        .route("/titles/{title_id}/reviews/{review_id}", patch(update_review))
        .route("/titles/{title_id}/reviews/{review_id}", delete(delete_review))
        // Comments
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            get(get_comments),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            post(create_comment),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(get_comment),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            patch(update_comment),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            delete(delete_comment),
        )
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}

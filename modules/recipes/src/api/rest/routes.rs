use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::auth::require_auth;
use crate::api::rest::handlers::{ingredients, recipes, tags, users};
use crate::domain::service::Service;

/// Attach the module's routes to `router`.
///
/// Account creation and token issuance are public; everything else sits behind
/// the token gate.
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let public = Router::new()
        .route("/api/user/create/", post(users::create_user))
        .route("/api/user/token/", post(users::issue_token));

    let protected = Router::new()
        .route("/api/user/me/", get(users::get_me).patch(users::update_me))
        .route(
            "/api/recipe/tags/",
            get(tags::list_tags).post(tags::create_tag),
        )
        .route(
            "/api/recipe/tags/{id}/",
            get(tags::get_tag)
                .patch(tags::update_tag)
                .delete(tags::delete_tag),
        )
        .route(
            "/api/recipe/ingredients/",
            get(ingredients::list_ingredients).post(ingredients::create_ingredient),
        )
        .route(
            "/api/recipe/ingredients/{id}/",
            get(ingredients::get_ingredient)
                .patch(ingredients::update_ingredient)
                .delete(ingredients::delete_ingredient),
        )
        .route(
            "/api/recipe/recipes/",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/api/recipe/recipes/{id}/",
            get(recipes::get_recipe)
                .patch(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route_layer(middleware::from_fn_with_state(
            service.clone(),
            require_auth,
        ));

    let module_router = public.merge(protected).layer(Extension(service));
    Ok(router.merge(module_router))
}

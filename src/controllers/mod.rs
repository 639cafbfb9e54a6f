mod game;
mod utils;

use crate::{
    game::{GameSettings, IdentityCategory},
    prelude::*,
};

use askama::Template;
use axum::{
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tower_sessions::Session;

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    let router = game::add_routes(router);

    return router
        .route("/", get(index))
        .route("/health", get(|| async { StatusCode::NO_CONTENT }));
}

struct CategoryView {
    tag: &'static str,
    label: &'static str,
    description: &'static str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "setup.html")]
struct SetupTemplate {
    categories: Vec<CategoryView>,
    details: String,
}

impl SetupTemplate {
    fn new(settings: Option<GameSettings>) -> Self {
        let settings = settings.unwrap_or_else(|| {
            GameSettings::new(IdentityCategory::Random.tag(), "")
        });
        let chosen = IdentityCategory::from_tag(&settings.category);

        let categories = IdentityCategory::ALL
            .into_iter()
            .map(|category| CategoryView {
                tag: category.tag(),
                label: category.label(),
                description: category.description(),
                selected: Some(category) == chosen,
            })
            .collect();

        return Self {
            categories,
            details: settings.custom_details,
        };
    }
}

async fn index(session: Session) -> Result<Response> {
    let game_state = utils::load_state(&session)?;

    if game_state.game.is_some() {
        return Ok(Redirect::to("/play").into_response());
    }

    return Ok(SetupTemplate::new(game_state.settings).into_response());
}

use super::utils;

use crate::{
    game::{play_turn, start_game, GameSession, GameSettings, GameState, TurnOutcome},
    prelude::*,
};

use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_sessions::Session;

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    return router
        .route("/setup", post(post_setup))
        .route("/play", get(play))
        .route("/play/ask", post(ask))
        .route("/play/give-up", post(give_up))
        .route("/play/restart", post(restart))
        .route("/play/new-setup", post(new_setup));
}

#[derive(Debug, Deserialize)]
struct SetupForm {
    category: String,
    #[serde(default)]
    details: String,
}

async fn post_setup(
    session: Session,
    State(state): State<AppState>,
    Form(body): Form<SetupForm>,
) -> Result<Response> {
    let settings = GameSettings::new(body.category, body.details.trim());

    let game = start_game(state.llm.as_ref(), &state.cfg.game, &settings).await;

    utils::save_state(
        &session,
        &GameState {
            settings: Some(settings),
            game: Some(game),
        },
    )?;

    return Ok(Redirect::to("/play").into_response());
}

struct MessageView {
    label: &'static str,
    is_player: bool,
    message: String,
}

#[derive(Template)]
#[template(path = "play.html")]
struct PlayTemplate {
    messages: Vec<MessageView>,
    question_count: u32,
    game_over: bool,
    summary: String,
}

impl PlayTemplate {
    fn new(game: GameSession) -> Self {
        let summary = if game.question_count > 0 {
            format!("Game finished in {} questions!", game.question_count)
        } else {
            "Game finished!".to_string()
        };

        let messages = game
            .messages
            .into_iter()
            .map(|entry| MessageView {
                label: entry.sender.label(),
                is_player: entry.sender.is_player(),
                message: entry.message,
            })
            .collect();

        return Self {
            messages,
            question_count: game.question_count,
            game_over: game.game_over,
            summary,
        };
    }
}

async fn play(session: Session) -> Result<Response> {
    let Some(game) = utils::load_state(&session)?.game else {
        return Ok(Redirect::to("/").into_response());
    };

    return Ok(PlayTemplate::new(game).into_response());
}

#[derive(Debug, Deserialize)]
struct AskForm {
    message: String,
}

async fn ask(
    session: Session,
    State(state): State<AppState>,
    Form(body): Form<AskForm>,
) -> Result<Response> {
    // Whole-state load and save; one turn in flight per browser, so last write wins.
    let mut game_state = utils::load_state(&session)?;

    let Some(game) = game_state.game.as_mut() else {
        return Ok(Redirect::to("/").into_response());
    };

    let outcome = play_turn(state.llm.as_ref(), &state.cfg.game, game, &body.message).await;

    if !matches!(outcome, TurnOutcome::Ignored | TurnOutcome::GameOver) {
        utils::save_state(&session, &game_state)?;
    }

    return Ok(Redirect::to("/play").into_response());
}

async fn give_up(session: Session) -> Result<Response> {
    let mut game_state = utils::load_state(&session)?;

    if let Some(game) = game_state.game.as_mut() {
        game.give_up();
        tracing::info!(game_id = %game.game_id, questions = game.question_count, "player gave up");
        utils::save_state(&session, &game_state)?;
    }

    return Ok(Redirect::to("/play").into_response());
}

async fn restart(session: Session, State(state): State<AppState>) -> Result<Response> {
    let mut game_state = utils::load_state(&session)?;

    let Some(settings) = game_state.settings.clone() else {
        return Ok(Redirect::to("/").into_response());
    };

    game_state.game = Some(start_game(state.llm.as_ref(), &state.cfg.game, &settings).await);
    utils::save_state(&session, &game_state)?;

    return Ok(Redirect::to("/play").into_response());
}

async fn new_setup(session: Session) -> Result<Response> {
    let mut game_state = utils::load_state(&session)?;

    game_state.game = None;
    utils::save_state(&session, &game_state)?;

    return Ok(Redirect::to("/").into_response());
}

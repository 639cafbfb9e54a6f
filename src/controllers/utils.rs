use crate::{game::GameState, prelude::*};

use tower_sessions::Session;

pub fn load_state(session: &Session) -> Result<GameState> {
    let state: Option<GameState> = session.get(GameState::SESSION_KEY)?;

    return Ok(state.unwrap_or_default());
}

pub fn save_state(session: &Session, state: &GameState) -> Result {
    session.insert(GameState::SESSION_KEY, state)?;

    return Ok(());
}

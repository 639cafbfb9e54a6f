use super::{
    answer::{apply_overrides, ask_identity, Answer},
    identity::{setup_identity, GameSettings},
};

use crate::{config::GameOptions, llm::TextGenerator};

use nanoid::nanoid;
use serde::{Deserialize, Serialize};

pub const WELCOME_MESSAGE: &str =
    "Guess the secret identity using yes/no questions.\nTry to guess in as few questions as possible!";
pub const INVALID_RESPONSE_MESSAGE: &str = "AI returned invalid JSON. Try again.";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    System,
    Player,
    Ai,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        return match self {
            Sender::System => "System",
            Sender::Player => "You",
            Sender::Ai => "AI",
        };
    }

    pub fn is_player(&self) -> bool {
        return matches!(self, Sender::Player);
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub sender: Sender,
    pub message: String,
}

/// One round of the game, from the hidden identity to the last message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub game_id: String,
    pub identity: String,
    pub question_count: u32,
    pub game_over: bool,
    pub messages: Vec<TranscriptEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input; nothing recorded.
    Ignored,
    /// The game already ended; nothing recorded.
    GameOver,
    /// No usable answer; the player should ask again.
    Invalid,
    Answered(Answer),
    Solved(Answer),
}

impl GameSession {
    pub fn new(identity: impl Into<String>) -> Self {
        return Self {
            game_id: nanoid!(10),
            identity: identity.into(),
            question_count: 0,
            game_over: false,
            messages: vec![TranscriptEntry {
                sender: Sender::System,
                message: WELCOME_MESSAGE.to_string(),
            }],
        };
    }

    pub fn push(&mut self, sender: Sender, message: impl Into<String>) {
        self.messages.push(TranscriptEntry {
            sender,
            message: message.into(),
        });
    }

    pub fn give_up(&mut self) {
        if self.game_over {
            return;
        }

        let message = format!("You gave up. The identity was {}.", self.identity);
        self.push(Sender::System, message);
        self.game_over = true;
    }

    /// Records a validated answer. Returns `true` when it ends the game.
    pub fn record_answer(&mut self, answer: &Answer) -> bool {
        self.push(Sender::Ai, answer.response.clone());

        if answer.is_correct_guess {
            self.question_count += 1;
            let message = format!(
                "Correct! The identity was {}. You solved it in {} questions!",
                self.identity, self.question_count
            );
            self.push(Sender::System, message);
            self.game_over = true;
            return true;
        }

        if answer.is_question {
            self.question_count += 1;
        }

        return false;
    }
}

/// Where the setup screen's choices and the current game live between
/// requests.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    pub settings: Option<GameSettings>,
    pub game: Option<GameSession>,
}

impl GameState {
    pub const SESSION_KEY: &'static str = "game_state";
}

/// Generates an identity for `settings` and opens a fresh game with it.
pub async fn start_game(
    llm: &dyn TextGenerator,
    opts: &GameOptions,
    settings: &GameSettings,
) -> GameSession {
    let identity = setup_identity(llm, opts, settings).await;
    let game = GameSession::new(identity);

    tracing::info!(game_id = %game.game_id, category = %settings.category, "game started");

    return game;
}

/// One player message in, at most one AI message out.
#[tracing::instrument(skip_all, fields(game_id = %game.game_id))]
pub async fn play_turn(
    llm: &dyn TextGenerator,
    opts: &GameOptions,
    game: &mut GameSession,
    input: &str,
) -> TurnOutcome {
    if input.trim().is_empty() {
        return TurnOutcome::Ignored;
    }
    if game.game_over {
        return TurnOutcome::GameOver;
    }

    game.push(Sender::Player, input);

    let answer = ask_identity(llm, opts, &game.identity, input)
        .await
        .map(|answer| apply_overrides(answer, &game.identity, input));

    let Some(answer) = answer else {
        game.push(Sender::System, INVALID_RESPONSE_MESSAGE);
        return TurnOutcome::Invalid;
    };

    if game.record_answer(&answer) {
        tracing::info!(questions = game.question_count, "identity guessed");
        return TurnOutcome::Solved(answer);
    }

    tracing::debug!(
        questions = game.question_count,
        is_question = answer.is_question,
        "turn answered"
    );

    return TurnOutcome::Answered(answer);
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::llm::scripted::ScriptedGenerator;

    const NO: &str = "{\"response\":\"no\",\"is_question\":false,\"is_correct_guess\":false}";
    const NOT_A_QUESTION: &str =
        "{\"response\":\"Please ask a yes/no question.\",\"is_question\":false,\"is_correct_guess\":false}";

    fn opts() -> GameOptions {
        return GameOptions::default();
    }

    #[test]
    fn new_game_starts_with_welcome() {
        let game = GameSession::new("Cleopatra");

        assert_eq!(game.question_count, 0);
        assert!(!game.game_over);
        assert_eq!(game.messages.len(), 1);
        assert_eq!(game.messages[0].sender, Sender::System);
        assert_eq!(game.game_id.len(), 10);
    }

    #[test]
    fn giving_up_reveals_identity_once() {
        let mut game = GameSession::new("Cleopatra");

        game.give_up();
        game.give_up();

        assert!(game.game_over);
        assert_eq!(game.messages.len(), 2);
        assert_eq!(
            game.messages[1].message,
            "You gave up. The identity was Cleopatra."
        );
    }

    #[tokio::test]
    async fn historical_figure_game_end_to_end() {
        let llm = ScriptedGenerator::replying([
            "Abraham Lincoln",
            NO,
        ]);
        let settings = GameSettings::new("Historical Figure", "");

        let mut game = start_game(&llm, &opts(), &settings).await;
        assert_eq!(game.identity, "Abraham Lincoln");

        let before = game.messages.len();
        let outcome = play_turn(&llm, &opts(), &mut game, "Are you alive today?").await;

        assert_eq!(
            outcome,
            TurnOutcome::Answered(Answer {
                response: "no".to_string(),
                is_question: true,
                is_correct_guess: false,
            })
        );
        assert_eq!(game.question_count, 1);

        let added = &game.messages[before..];
        assert_eq!(added.len(), 2);
        assert_eq!(added[0].sender, Sender::Player);
        assert_eq!(added[0].message, "Are you alive today?");
        assert_eq!(added[1].sender, Sender::Ai);
        assert_eq!(added[1].message, "no");
    }

    #[tokio::test]
    async fn records_and_sends_input_as_typed() {
        let llm = ScriptedGenerator::replying([NO]);
        let mut game = GameSession::new("Cleopatra");

        play_turn(&llm, &opts(), &mut game, "  Are you royal?\n").await;

        assert_eq!(game.messages[1].sender, Sender::Player);
        assert_eq!(game.messages[1].message, "  Are you royal?\n");
        assert_eq!(llm.requests()[0].messages[1].content, "  Are you royal?\n");
    }

    #[tokio::test]
    async fn non_questions_do_not_count() {
        let llm = ScriptedGenerator::replying([NOT_A_QUESTION]);
        let mut game = GameSession::new("Cleopatra");

        let outcome = play_turn(&llm, &opts(), &mut game, "hello there").await;

        assert!(matches!(outcome, TurnOutcome::Answered(_)));
        assert_eq!(game.question_count, 0);
        assert_eq!(game.messages.len(), 3);
    }

    #[tokio::test]
    async fn naming_the_identity_ends_the_game() {
        let llm = ScriptedGenerator::replying([NO]);
        let mut game = GameSession::new("Albert Einstein");
        game.question_count = 4;

        let outcome = play_turn(&llm, &opts(), &mut game, "Is it Albert Einstein?").await;

        let TurnOutcome::Solved(answer) = outcome else {
            panic!("expected solved, got {outcome:?}");
        };
        assert_eq!(answer.response, "Yes!");
        assert!(answer.is_correct_guess);
        assert!(!answer.is_question);

        assert!(game.game_over);
        assert_eq!(game.question_count, 5);
        assert_eq!(game.messages.last().unwrap().sender, Sender::System);
        assert!(game
            .messages
            .last()
            .unwrap()
            .message
            .contains("You solved it in 5 questions!"));
    }

    #[tokio::test]
    async fn invalid_answers_leave_the_counter_alone() {
        let llm = ScriptedGenerator::replying(["I cannot answer that."]);
        let mut game = GameSession::new("Cleopatra");

        let outcome = play_turn(&llm, &opts(), &mut game, "Are you royal?").await;

        assert_eq!(outcome, TurnOutcome::Invalid);
        assert_eq!(game.question_count, 0);
        assert!(!game.game_over);
        assert_eq!(game.messages.last().unwrap().message, INVALID_RESPONSE_MESSAGE);
    }

    #[tokio::test]
    async fn blank_input_and_finished_games_are_ignored() {
        let llm = ScriptedGenerator::replying([NO]);
        let mut game = GameSession::new("Cleopatra");

        assert_eq!(play_turn(&llm, &opts(), &mut game, "   ").await, TurnOutcome::Ignored);

        game.give_up();
        let len = game.messages.len();
        assert_eq!(
            play_turn(&llm, &opts(), &mut game, "Are you royal?").await,
            TurnOutcome::GameOver
        );
        assert_eq!(game.messages.len(), len);
        assert!(llm.requests().is_empty());
    }

    #[test]
    fn state_round_trips_through_session_json() {
        let state = GameState {
            settings: Some(GameSettings::new("custom", "a Marvel villain")),
            game: Some(GameSession::new("Thanos")),
        };

        let value = serde_json::to_value(&state).unwrap();
        let back: GameState = serde_json::from_value(value).unwrap();

        assert_eq!(back, state);
    }
}

use crate::{
    config::GameOptions,
    llm::{ChatRequest, ResponseFormat, TextGenerator},
};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    // First `{...}` in the reply, shortest match, across newlines.
    static ref JSON_OBJECT_RE: Regex = Regex::new(r"(?s)\{.*?\}").unwrap();
}

pub const CORRECT_GUESS_REPLY: &str = "Yes!";

/// The model's structured reply to one player message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub response: String,
    pub is_question: bool,
    pub is_correct_guess: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The whole reply was the JSON object.
    Strict(Answer),
    /// The object was dug out of surrounding text.
    Extracted(Answer),
    Invalid(String),
}

pub fn system_prompt(identity: &str) -> String {
    return format!(
        r#"
You are identity: {identity}.

You are playing a guessing game with the user. They are trying to figure out who or what you are.

Rules for you (the AI):
- For questions that gives clues about your identity, only respond with "yes" or "no".
- If the question is ambiguous or unanswerable, ask the user to clarify to help you answer.
- If the user asks if you are {identity}, congratulate them, set "is_correct_guess": true and end the game.
- Keep answers short.
- If the user does not give a direct guess or asks a question that is not a yes/no question, encourage the user to ask a yes/no question and set "is_question": false.
- Drive the conversation towards the game, do not talk about anything else.

# Output format:
Respond **EXCLUSIVELY** with a single JSON object and *nothing* else. The JSON must match exactly:
{{
  "response": "string",           # Your reply to the user
  "is_question": true|false,      # True if the question is a part of the game (yes/no or identity guess). Else false.
  "is_correct_guess": true|false  # True if the user correctly guessed your identity. Else false.
}}

NO markdown fences, headings, pre-ambles, or extra text before/after the JSON.
"#
    );
}

/// Strict decode of the trimmed reply first, then the first brace-delimited
/// substring.
pub fn parse_answer(raw: &str) -> ParseOutcome {
    let raw = raw.trim();

    let strict_err = match serde_json::from_str::<Answer>(raw) {
        Ok(answer) => return ParseOutcome::Strict(answer),
        Err(err) => err,
    };

    let Some(found) = JSON_OBJECT_RE.find(raw) else {
        return ParseOutcome::Invalid(format!("no JSON object in reply ({strict_err})"));
    };

    return match serde_json::from_str::<Answer>(found.as_str()) {
        Ok(answer) => ParseOutcome::Extracted(answer),
        Err(err) => ParseOutcome::Invalid(format!("extracted object rejected: {err}")),
    };
}

/// Sends the player's message and returns the first reply that validates.
/// `None` once every attempt has produced garbage or failed outright.
pub async fn ask_identity(
    llm: &dyn TextGenerator,
    opts: &GameOptions,
    identity: &str,
    input: &str,
) -> Option<Answer> {
    let system = system_prompt(identity);

    for attempt in 1..=opts.max_retries {
        let request = ChatRequest::exchange(
            &opts.model_name,
            system.as_str(),
            input,
            ResponseFormat::Json,
            opts.validator_temperature,
        );

        let raw = match llm.chat(request).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(attempt, error = %err, "answer request failed");
                continue;
            }
        };

        match parse_answer(&raw) {
            ParseOutcome::Strict(answer) => return Some(answer),
            ParseOutcome::Extracted(answer) => {
                tracing::debug!(attempt, "recovered answer from surrounding text");
                return Some(answer);
            }
            ParseOutcome::Invalid(reason) => {
                tracing::warn!(attempt, %reason, raw = %raw, "invalid answer from model");
            }
        }
    }

    return None;
}

/// Fields the game decides for itself, whatever the model said. A bare
/// "yes"/"no" is always a question; naming the identity is always a win.
/// The second rule is applied last and wins.
pub fn apply_overrides(mut answer: Answer, identity: &str, input: &str) -> Answer {
    let reply = answer.response.to_lowercase();
    if reply == "yes" || reply == "no" {
        answer.is_question = true;
    }

    if input.to_lowercase().contains(&identity.to_lowercase()) {
        answer.response = CORRECT_GUESS_REPLY.to_string();
        answer.is_correct_guess = true;
        answer.is_question = false;
    }

    return answer;
}

use crate::{
    config::GameOptions,
    llm::{ChatRequest, ResponseFormat, TextGenerator},
};

use serde::{Deserialize, Serialize};

const GENERATOR_SYSTEM_PROMPT: &str = "\
You are an identity generator for a yes/no guessing game. Create a compelling identity that players can guess through yes/no questions.

Your task is to:
- Create a specific identity (person, character, profession, or concept)

**Your output must be just the name of the identity, no other text.**";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityCategory {
    Random,
    HistoricalFigure,
    FictionalCharacter,
    ProfessionRole,
    Custom,
}

impl IdentityCategory {
    pub const ALL: [IdentityCategory; 5] = [
        IdentityCategory::Random,
        IdentityCategory::HistoricalFigure,
        IdentityCategory::FictionalCharacter,
        IdentityCategory::ProfessionRole,
        IdentityCategory::Custom,
    ];

    /// Tag used in forms and stored settings.
    pub fn tag(&self) -> &'static str {
        return match self {
            IdentityCategory::Random => "random",
            IdentityCategory::HistoricalFigure => "historical",
            IdentityCategory::FictionalCharacter => "fictional",
            IdentityCategory::ProfessionRole => "profession",
            IdentityCategory::Custom => "custom",
        };
    }

    /// Accepts either the form tag or the display label.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();

        return Self::ALL
            .into_iter()
            .find(|c| c.tag().eq_ignore_ascii_case(tag) || c.label().eq_ignore_ascii_case(tag));
    }

    pub fn label(&self) -> &'static str {
        return match self {
            IdentityCategory::Random => "Random Character",
            IdentityCategory::HistoricalFigure => "Historical Figure",
            IdentityCategory::FictionalCharacter => "Fictional Character",
            IdentityCategory::ProfessionRole => "Profession/Role",
            IdentityCategory::Custom => "Custom",
        };
    }

    pub fn description(&self) -> &'static str {
        return match self {
            IdentityCategory::Random => {
                "Generate a completely random identity that could be anyone or anything."
            }
            IdentityCategory::HistoricalFigure => {
                "A real person who lived in the past who made significant contributions or is well-known."
            }
            IdentityCategory::FictionalCharacter => {
                "A character from books, movies, TV shows, comics, or other fictional sources."
            }
            IdentityCategory::ProfessionRole => "A specific job, occupation, or social role.",
            IdentityCategory::Custom => {
                "Specify your own parameters for what kind of identity you want to guess."
            }
        };
    }

    /// The user prompt for this category. `details` is only used by
    /// `Custom` and goes in unescaped.
    pub fn prompt(&self, details: &str) -> String {
        return match self {
            IdentityCategory::Random => "\
Generate a random identity for a guessing game. Include historical figures, fictional characters, \
celebrities, professionals, etc. The player will try to guess who this is through yes/no questions."
                .to_string(),
            IdentityCategory::HistoricalFigure => "\
Generate a historical figure identity for a guessing game. Choose someone significant from \
any time period in history. The player will try to guess who this is through yes/no questions."
                .to_string(),
            IdentityCategory::FictionalCharacter => "\
Generate a fictional character identity for a guessing game. This could be from literature, \
movies, TV shows, comics, etc. The player will try to guess who this is through yes/no questions."
                .to_string(),
            IdentityCategory::ProfessionRole => "\
Generate an identity based on a profession or role for a guessing game. \
This could be any occupation (doctor, astronaut, teacher, etc.) or role (parent, leader, student, etc.) \
The player will try to guess what this profession/role is through yes/no questions."
                .to_string(),
            IdentityCategory::Custom => format!(
                "Generate an identity for a guessing game based on these details: {details}\n\
The player will try to guess who/what this is through yes/no questions."
            ),
        };
    }
}

/// What the player picked on the setup screen. Kept around so a finished
/// game can be restarted with the same choices.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub category: String,
    #[serde(default)]
    pub custom_details: String,
}

impl GameSettings {
    pub fn new(category: impl Into<String>, custom_details: impl Into<String>) -> Self {
        return Self {
            category: category.into(),
            custom_details: custom_details.into(),
        };
    }
}

/// Asks the model for an identity. The first non-empty reply wins; failed
/// calls and blank replies use up one attempt each. `None` for an unknown
/// category or when every attempt failed.
pub async fn generate_identity(
    llm: &dyn TextGenerator,
    opts: &GameOptions,
    settings: &GameSettings,
) -> Option<String> {
    let Some(category) = IdentityCategory::from_tag(&settings.category) else {
        tracing::warn!(category = %settings.category, "unknown identity category");
        return None;
    };

    let prompt = category.prompt(&settings.custom_details);

    for attempt in 1..=opts.max_retries {
        let request = ChatRequest::exchange(
            &opts.model_name,
            GENERATOR_SYSTEM_PROMPT,
            prompt.as_str(),
            ResponseFormat::Text,
            opts.generator_temperature,
        );

        match llm.chat(request).await {
            Ok(raw) => {
                let identity = raw.trim();
                if !identity.is_empty() {
                    tracing::debug!(attempt, category = category.tag(), "identity generated");
                    return Some(identity.to_string());
                }

                tracing::warn!(attempt, "identity generator returned an empty reply");
            }
            Err(err) => {
                tracing::warn!(attempt, error = %err, "identity generation failed");
            }
        }
    }

    return None;
}

/// `generate_identity` with the configured fallback swapped in, so a game
/// always has someone to guess.
pub async fn setup_identity(
    llm: &dyn TextGenerator,
    opts: &GameOptions,
    settings: &GameSettings,
) -> String {
    return match generate_identity(llm, opts, settings).await {
        Some(identity) => identity,
        None => {
            tracing::info!(fallback = %opts.fallback_identity, "using fallback identity");
            opts.fallback_identity.clone()
        }
    };
}

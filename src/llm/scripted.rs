use super::{ChatRequest, TextGenerator};

use crate::prelude::*;

use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;

/// Replays canned replies in order and records every request it receives.
/// Once the script runs out, the last entry repeats.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Option<String>>>,
    last: Mutex<Option<String>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedGenerator {
    /// `None` entries simulate a collaborator that is down.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        return Self {
            replies: Mutex::new(replies.into_iter().map(|r| r.map(Into::into)).collect()),
            last: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        };
    }

    pub fn replying<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        return Self::new(replies.into_iter().map(Some));
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        return self.requests.lock().unwrap().clone();
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn chat(&self, request: ChatRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);

        let next = self.replies.lock().unwrap().pop_front();
        let reply = match next {
            Some(reply) => {
                *self.last.lock().unwrap() = reply.clone();
                reply
            }
            None => self.last.lock().unwrap().clone(),
        };

        return reply.ok_or_else(|| anyhow::anyhow!("connection refused").into());
    }
}

//! Translator client for the OpenAI-compatible chat completion service.
//!
//! The model is offered two tools, `suggest_command` and `answer_question`.
//! Tool calls map directly onto a [`Translation`]; models that reply with
//! text instead are handled by [`parser::parse_response`].

use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionTool, ChatCompletionToolType,
    CreateChatCompletionRequestArgs, FunctionObject,
};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, error, warn};

use super::{Translation, parser, prompt};
use crate::context::ContextSnapshot;
use crate::error::TranslateError;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Conversation turns kept for context (the system prompt is always sent).
const MAX_CONTEXT_MESSAGES: usize = 10;

const TOOL_SUGGEST_COMMAND: &str = "suggest_command";
const TOOL_ANSWER_QUESTION: &str = "answer_question";

// =============================================================================
// Tool Definitions
// =============================================================================

/// Arguments for the suggest_command tool (parsed from AI's JSON response)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestCommandArgs {
    pub command: String,
    pub explanation: String,
    /// low, medium, or high
    pub risk_level: String,
}

impl SuggestCommandArgs {
    fn into_translation(self) -> Translation {
        let command = self.command.trim().to_string();
        if command.is_empty() {
            Translation::Unknown
        } else if self.risk_level.trim().eq_ignore_ascii_case("high") {
            Translation::SensitiveCommand(command)
        } else {
            Translation::PlainCommand(command)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerQuestionArgs {
    pub answer: String,
}

fn create_suggest_command_tool() -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: TOOL_SUGGEST_COMMAND.to_string(),
            description: Some(
                "Suggest a single shell command that fulfils the user's request.".to_string(),
            ),
            parameters: Some(serde_json::json!({
                "type": "object",
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "The shell command to execute"
                    },
                    "explanation": {
                        "type": "string",
                        "description": "A brief explanation of what the command does"
                    },
                    "risk_level": {
                        "type": "string",
                        "enum": ["low", "medium", "high"],
                        "description": "high for destructive, privileged, or system-changing commands"
                    }
                },
                "required": ["command", "explanation", "risk_level"],
                "additionalProperties": false
            })),
            strict: Some(true),
        },
    }
}

fn create_answer_question_tool() -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: TOOL_ANSWER_QUESTION.to_string(),
            description: Some(
                "Answer a question that does not require running a command.".to_string(),
            ),
            parameters: Some(serde_json::json!({
                "type": "object",
                "properties": {
                    "answer": { "type": "string", "description": "The answer text" }
                },
                "required": ["answer"],
                "additionalProperties": false
            })),
            strict: Some(true),
        },
    }
}

/// Map a chat completion choice onto a [`Translation`].
fn interpret(
    tool_calls: Vec<ChatCompletionMessageToolCall>,
    content: Option<String>,
) -> Result<Translation, TranslateError> {
    for call in tool_calls {
        let args = &call.function.arguments;
        match call.function.name.as_str() {
            TOOL_SUGGEST_COMMAND => {
                let args: SuggestCommandArgs = serde_json::from_str(args)
                    .map_err(|e| TranslateError::MalformedToolCall(e.to_string()))?;
                debug!("suggest_command: {:?}", args);
                return Ok(args.into_translation());
            }
            TOOL_ANSWER_QUESTION => {
                let args: AnswerQuestionArgs = serde_json::from_str(args)
                    .map_err(|e| TranslateError::MalformedToolCall(e.to_string()))?;
                return Ok(Translation::QuestionAnswer(args.answer.trim().to_string()));
            }
            other => warn!("Ignoring unknown tool call: {}", other),
        }
    }

    match content {
        Some(text) if !text.trim().is_empty() => Ok(parser::parse_response(&text)),
        _ => Err(TranslateError::EmptyResponse),
    }
}

// =============================================================================
// Translator
// =============================================================================

#[derive(Clone, Debug)]
pub struct TranslatorConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_API_TIMEOUT,
        }
    }
}

/// Turns natural language into a [`Translation`], keeping a short rolling
/// conversation so follow-up requests have context.
pub struct Translator {
    client: Option<Client<OpenAIConfig>>,
    model: String,
    timeout: Duration,
    /// User and assistant turns, oldest first; excludes the system prompt.
    conversation: Vec<ChatCompletionRequestMessage>,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Self {
        let client = config
            .api_key
            .filter(|key| !key.trim().is_empty())
            .map(|key| {
                let openai = OpenAIConfig::new()
                    .with_api_key(key)
                    .with_api_base(config.api_base);
                Client::with_config(openai)
            });

        Self {
            client,
            model: config.model,
            timeout: config.timeout,
            conversation: Vec::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Translate one request. Failures become [`Translation::Error`].
    pub async fn translate(&mut self, user_input: &str, ctx: &ContextSnapshot) -> Translation {
        match self.request(user_input, ctx).await {
            Ok(translation) => translation,
            Err(e) => {
                error!("Translation failed: {}", e);
                Translation::Error(e.to_string())
            }
        }
    }

    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
    }

    pub fn conversation_len(&self) -> usize {
        self.conversation.len()
    }

    async fn request(
        &mut self,
        user_input: &str,
        ctx: &ContextSnapshot,
    ) -> Result<Translation, TranslateError> {
        let client = self.client.as_ref().ok_or(TranslateError::NotConfigured)?;

        let system_msg: ChatCompletionRequestMessage =
            ChatCompletionRequestSystemMessageArgs::default()
                .content(prompt::SYSTEM_PROMPT)
                .build()?
                .into();
        let user_msg: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt::build_prompt(user_input, ctx))
            .build()?
            .into();

        let mut messages = Vec::with_capacity(self.conversation.len() + 2);
        messages.push(system_msg);
        messages.extend(self.conversation.iter().cloned());
        messages.push(user_msg.clone());

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .tools(vec![create_suggest_command_tool(), create_answer_question_tool()])
            .temperature(0.3)
            .max_completion_tokens(500u32)
            .build()?;

        debug!("Sending chat completion request (model: {})", self.model);
        let response = timeout(self.timeout, client.chat().create(request))
            .await
            .map_err(|_| TranslateError::Timeout(self.timeout))??;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(TranslateError::EmptyResponse)?;
        let translation = interpret(
            choice.message.tool_calls.unwrap_or_default(),
            choice.message.content,
        )?;

        self.remember(user_msg, &translation);
        Ok(translation)
    }

    /// Record a completed turn, storing the reply in the text protocol so the
    /// model sees its earlier decisions without tool-call bookkeeping.
    fn remember(&mut self, user_msg: ChatCompletionRequestMessage, translation: &Translation) {
        let reply = match ChatCompletionRequestAssistantMessageArgs::default()
            .content(translation.transcript())
            .build()
        {
            Ok(msg) => msg.into(),
            Err(e) => {
                warn!("Failed to record assistant reply: {}", e);
                return;
            }
        };

        self.conversation.push(user_msg);
        self.conversation.push(reply);

        let excess = self.conversation.len().saturating_sub(MAX_CONTEXT_MESSAGES);
        self.conversation.drain(..excess);
    }
}

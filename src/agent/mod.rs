//! Task Agent - autonomous tool-calling loop over the chat model
//!
//! Information Hiding:
//! - Reason/act loop implementation details hidden
//! - Tool selection logic hidden
//! - Memory retrieval and write-back internalized
//! - LLM interaction details abstracted

use crate::config::Settings;
use crate::core::llm::{ChatMessage, LLMClient};
use crate::memory::{ConversationMemory, MessageDraft};
use crate::search;
use crate::tools::registry::ToolRegistry;
use crate::tools::Tool;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// How many past turns to pull into the prompt
const CONTEXT_TURNS: usize = 3;

/// Decision structure returned by the LLM
#[derive(Debug, Deserialize, Serialize)]
struct AgentDecision {
    thought: String,
    action: Option<AgentAction>,
    is_final: bool,
    final_answer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct AgentAction {
    tool: String,
    input: Value,
}

/// A single step of the loop, for tracing what the agent did
#[derive(Debug, Clone)]
pub struct TaskStep {
    pub iteration: usize,
    pub thought: String,
    pub action: Option<String>,
    pub observation: Option<String>,
}

/// Outcome of one task run
#[derive(Debug)]
pub struct TaskReport {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
    pub memory_enabled: bool,
    pub context_used: bool,
    pub context_lines: usize,
    pub steps: Vec<TaskStep>,
}

enum LoopOutcome {
    Completed { answer: String, steps: Vec<TaskStep> },
    Failed { error: String, steps: Vec<TaskStep> },
}

/// Builder step for the agent: the tool collection is handed over
/// explicitly, and the runtime is rebuilt from it, never mutated behind
/// the caller's back.
pub struct TaskAgentBuilder {
    settings: Settings,
    api_key: String,
    tools: Vec<Arc<dyn Tool>>,
    memory: Option<ConversationMemory>,
}

impl TaskAgentBuilder {
    pub fn new(settings: Settings, api_key: String) -> Self {
        Self {
            settings,
            api_key,
            tools: Vec::new(),
            memory: None,
        }
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn with_memory(mut self, memory: ConversationMemory) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn build(self) -> TaskAgent {
        let mut registry = ToolRegistry::new();
        for tool in self.tools {
            registry.register(tool);
        }

        TaskAgent {
            llm: LLMClient::new(self.api_key, self.settings.clone()),
            registry,
            memory: self.memory,
            settings: self.settings,
        }
    }
}

/// The task automation agent
pub struct TaskAgent {
    llm: LLMClient,
    registry: ToolRegistry,
    memory: Option<ConversationMemory>,
    settings: Settings,
}

impl TaskAgent {
    /// Standard construction: default tools, configured search provider,
    /// memory per settings.
    pub async fn from_settings(settings: Settings) -> Result<Self> {
        let api_key = Settings::api_key()?;
        let provider = search::resolve_provider(&settings)?;
        let registry = ToolRegistry::with_defaults(provider);

        let memory = if settings.memory.enabled {
            Some(ConversationMemory::open(&settings.memory.file, settings.memory.max_size).await?)
        } else {
            None
        };

        Ok(Self {
            llm: LLMClient::new(api_key, settings.clone()),
            registry,
            memory,
            settings,
        })
    }

    /// Extend the capability set after construction. The per-run prompt is
    /// rebuilt from the registry, so the new tool is visible on the next run.
    pub fn add_tool(&mut self, tool: Arc<dyn Tool>) {
        self.registry.register(tool);
    }

    pub fn memory(&self) -> Option<&ConversationMemory> {
        self.memory.as_ref()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.registry.tool_names()
    }

    /// Execute a task: retrieve memory context, run the loop, write the
    /// exchange back to memory. Every failure maps to a report, never a panic.
    pub async fn run(&mut self, task: &str) -> TaskReport {
        let memory_enabled = self.memory.is_some();

        let context = self
            .memory
            .as_ref()
            .map(|memory| memory.retrieve(task, CONTEXT_TURNS))
            .unwrap_or_default();
        let context_lines = if context.is_empty() {
            0
        } else {
            context.lines().count()
        };

        let full_task = if context.is_empty() {
            task.to_string()
        } else {
            format!("{}\n\nCurrent task: {}", context, task)
        };

        match self.run_loop(&full_task).await {
            LoopOutcome::Completed { answer, steps } => {
                if let Some(memory) = self.memory.as_mut() {
                    let drafts = [
                        MessageDraft::user(task),
                        MessageDraft::assistant(answer.clone()),
                    ];
                    if let Err(e) = memory.add_messages(&drafts).await {
                        tracing::error!("Failed to save conversation: {:#}", e);
                        return TaskReport {
                            success: false,
                            output: String::new(),
                            error: Some(format!("Failed to save conversation: {:#}", e)),
                            memory_enabled,
                            context_used: context_lines > 0,
                            context_lines,
                            steps,
                        };
                    }
                }

                TaskReport {
                    success: true,
                    output: answer,
                    error: None,
                    memory_enabled,
                    context_used: context_lines > 0,
                    context_lines,
                    steps,
                }
            }
            LoopOutcome::Failed { error, steps } => TaskReport {
                success: false,
                output: String::new(),
                error: Some(error),
                memory_enabled,
                context_used: context_lines > 0,
                context_lines,
                steps,
            },
        }
    }

    fn system_prompt(&self) -> String {
        let mut prompt = format!(
            "You are a helpful task automation assistant with web access. \
             Search provider: {}. \
             Use web_search to look up current information when needed. \
             Use file tools to manage data. ",
            self.settings.search.provider
        );
        if self.memory.is_some() {
            prompt.push_str(
                "You have access to conversation memory with semantic search capabilities. \
                 Use relevant past context when answering. ",
            );
        }
        prompt.push_str("Always confirm when a task is complete.\n\n");

        prompt.push_str(&format!(
            "Available Tools:\n{}\n\n\
             IMPORTANT: You MUST respond in this EXACT JSON format:\n\
             {{\n  \
               \"thought\": \"your reasoning about what to do next\",\n  \
               \"action\": {{\"tool\": \"tool_name\", \"input\": {{\"param\": \"value\"}}}},\n  \
               \"is_final\": false,\n  \
               \"final_answer\": null\n\
             }}\n\n\
             When the task is COMPLETE:\n\
             - Set \"is_final\": true\n\
             - Set \"action\": null\n\
             - Provide a clear \"final_answer\" summarizing what you accomplished\n\n\
             After each tool execution, check: does the observation contain what the user asked for?\n\
             If YES, immediately set is_final=true and provide the final_answer.\n\
             Do NOT repeat the same action if you already have the result.\n\n\
             Always respond with valid JSON only. No extra text.",
            self.registry.tools_description()
        ));
        prompt
    }

    /// The think -> act -> observe loop, bounded by `max_iterations`
    async fn run_loop(&self, task: &str) -> LoopOutcome {
        let max_iterations = self.settings.agent.max_iterations;
        let mut steps = Vec::new();
        let mut history = vec![
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(format!("Task: {}", task)),
        ];

        for iteration in 0..max_iterations {
            tracing::info!("Agent iteration {}/{}", iteration + 1, max_iterations);

            let decision = match self.think(&history).await {
                Ok(d) => d,
                Err(e) => {
                    tracing::error!("Failed to get decision from LLM: {}", e);
                    return LoopOutcome::Failed {
                        error: format!("Failed to reason: {}", e),
                        steps,
                    };
                }
            };

            tracing::debug!("Agent thought: {}", decision.thought);

            if decision.is_final {
                let answer = decision
                    .final_answer
                    .unwrap_or_else(|| "Task completed without explicit answer".to_string());

                steps.push(TaskStep {
                    iteration,
                    thought: decision.thought,
                    action: None,
                    observation: Some(answer.clone()),
                });

                return LoopOutcome::Completed { answer, steps };
            }

            if let Some(action) = decision.action {
                tracing::info!("Agent executing tool: {}", action.tool);

                let observation = match self.registry.get(&action.tool) {
                    Some(tool) => match tool.execute(action.input.clone()).await {
                        // Structured errors flatten to text exactly here
                        Ok(result) => result.into_observation(),
                        Err(e) => format!("Error: {}", e),
                    },
                    None => format!("Error: Tool '{}' not found", action.tool),
                };

                tracing::debug!("Tool observation: {}", observation);

                history.push(ChatMessage::assistant(
                    serde_json::to_string(&AgentDecision {
                        thought: decision.thought.clone(),
                        action: Some(action.clone()),
                        is_final: false,
                        final_answer: None,
                    })
                    .unwrap_or_else(|_| format!("Action: {}", action.tool)),
                ));
                history.push(ChatMessage::user(format!(
                    "Observation: {}\n\nDoes this observation contain the answer to the original task? \
                     If yes, set is_final=true and provide final_answer. \
                     If no, what is the next action needed?",
                    observation
                )));

                steps.push(TaskStep {
                    iteration,
                    thought: decision.thought,
                    action: Some(action.tool),
                    observation: Some(observation),
                });
            } else {
                // No action and no completion flag. If we already observed
                // something, treat the thought as the answer.
                if steps.iter().any(|s| s.observation.is_some()) {
                    let answer = if decision.thought.is_empty() {
                        steps
                            .last()
                            .and_then(|s| s.observation.clone())
                            .unwrap_or_else(|| "Task completed".to_string())
                    } else {
                        decision.thought.clone()
                    };

                    steps.push(TaskStep {
                        iteration,
                        thought: decision.thought,
                        action: None,
                        observation: Some(answer.clone()),
                    });

                    return LoopOutcome::Completed { answer, steps };
                }

                let error_msg = "No action specified and no prior progress".to_string();
                tracing::warn!("{}", error_msg);

                history.push(ChatMessage::assistant(error_msg.clone()));
                steps.push(TaskStep {
                    iteration,
                    thought: decision.thought,
                    action: None,
                    observation: Some(error_msg),
                });
            }
        }

        LoopOutcome::Failed {
            error: "Max iterations reached without completing task".to_string(),
            steps,
        }
    }

    /// Ask the LLM for the next decision, tolerating JSON wrapped in prose
    async fn think(&self, history: &[ChatMessage]) -> Result<AgentDecision> {
        let response = self.llm.chat(history.to_vec()).await?;

        match serde_json::from_str::<AgentDecision>(&response) {
            Ok(decision) => Ok(decision),
            Err(e) => {
                tracing::warn!("Failed to parse decision as JSON: {}", e);

                if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
                    if let Ok(decision) =
                        serde_json::from_str::<AgentDecision>(&response[start..=end])
                    {
                        return Ok(decision);
                    }
                }

                // Treat a non-JSON reply as a bare thought
                Ok(AgentDecision {
                    thought: response,
                    action: None,
                    is_final: false,
                    final_answer: None,
                })
            }
        }
    }
}

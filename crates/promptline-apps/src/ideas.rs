//! Idea explorer: a phased conversation that turns project ideas into a plan, a PRD, and a prototype sketch.
//!
//! Every model call goes through one conversation template whose `{history}`
//! is the session transcript, so later prompts see earlier exchanges.

use std::collections::HashMap;
use std::sync::Arc;

use promptline_core::{ModelConfig, PipelineError, PromptTemplate, TemplateError};
use promptline_llm::TextGenerator;
use tracing::info;

use crate::session::{Idea, Phase, SessionState, Turn};

const CONVERSATION: &str = "\
The following is a friendly conversation between a human and an AI. The AI is talkative and gives plenty of \
specific details from its context. If the AI does not know the answer to a question, it says so.

Current conversation:
{history}
Human: {input}
AI:";

const FEEDBACK: &str = "Provide feedback and suggestions for this AI project idea: {idea}";

const PLAN: &str = "\
Generate a comprehensive plan based on these ideas:
{ideas}
Steps: {steps}
Milestones: {milestones}";

const PRD: &str = "\
Generate a detailed Product Requirements Document based on these ideas:
{ideas}
And this plan: {plan}";

const PROTOTYPE: &str = "\
Generate a prototype example description based on these ideas:
{ideas}
And this plan: {plan}";

/// Runs idea-explorer operations against a session.
pub struct IdeaExplorer {
    generator: Arc<dyn TextGenerator>,
    model: ModelConfig,
    conversation: PromptTemplate,
    feedback: PromptTemplate,
    plan: PromptTemplate,
    prd: PromptTemplate,
    prototype: PromptTemplate,
}

fn values<const N: usize>(pairs: [(&str, &str); N]) -> HashMap<String, String> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

impl IdeaExplorer {
    pub fn new(generator: Arc<dyn TextGenerator>, model: ModelConfig) -> Result<Self, TemplateError> {
        Ok(Self {
            generator,
            model,
            conversation: PromptTemplate::new("conversation", CONVERSATION)?,
            feedback: PromptTemplate::new("idea_feedback", FEEDBACK)?,
            plan: PromptTemplate::new("plan", PLAN)?,
            prd: PromptTemplate::new("prd", PRD)?,
            prototype: PromptTemplate::new("prototype", PROTOTYPE)?,
        })
    }

    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    /// Sends one turn through the conversation template and records it.
    async fn converse(&self, state: &mut SessionState, input: String) -> Result<String, PipelineError> {
        let history = state.history();
        let prompt = self
            .conversation
            .render(&values([("history", history.as_str()), ("input", input.as_str())]))?;

        let response = self.generator.generate(&self.model, &prompt).await?.content;
        info!("Idea explorer turn {}: {} chars", state.transcript.len() + 1, response.len());

        state.transcript.push(Turn { input, response: response.clone() });
        Ok(response)
    }

    /// Records an idea and returns the model's feedback on it.
    pub async fn add_idea(&self, state: &mut SessionState, idea: &str) -> Result<String, PipelineError> {
        state.require(Phase::Brainstorming)?;
        let idea = idea.trim();
        if idea.is_empty() {
            return Err(PipelineError::MissingInput("idea".to_string()));
        }

        let input = self.feedback.render(&values([("idea", idea)]))?;
        let feedback = self.converse(state, input).await?;

        state.ideas.push(Idea { text: idea.to_string(), feedback: feedback.clone() });
        Ok(feedback)
    }

    /// Generates the plan from the ideas so far, replacing any earlier plan.
    pub async fn generate_plan(
        &self,
        state: &mut SessionState,
        steps: &str,
        milestones: &str,
    ) -> Result<String, PipelineError> {
        state.require(Phase::Planning)?;

        let ideas = state.idea_list();
        let input = self
            .plan
            .render(&values([("ideas", ideas.as_str()), ("steps", steps), ("milestones", milestones)]))?;
        let plan = self.converse(state, input).await?;

        state.plan = Some(plan.clone());
        Ok(plan)
    }

    /// Generates the PRD and the prototype description, each only if not already present.
    pub async fn generate_outputs(&self, state: &mut SessionState) -> Result<(), PipelineError> {
        state.require(Phase::Output)?;

        let ideas = state.idea_list();
        let plan = state.plan.clone().unwrap_or_default();
        let context = values([("ideas", ideas.as_str()), ("plan", plan.as_str())]);

        if state.prd.is_none() {
            let input = self.prd.render(&context)?;
            let prd = self.converse(state, input).await?;
            state.prd = Some(prd);
        }
        if state.prototype.is_none() {
            let input = self.prototype.render(&context)?;
            let prototype = self.converse(state, input).await?;
            state.prototype = Some(prototype);
        }
        Ok(())
    }
}

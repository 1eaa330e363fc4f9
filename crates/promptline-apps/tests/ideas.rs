use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use promptline_apps::{IdeaExplorer, Phase, SessionState};
use promptline_config::{builtin_models, model_ids, Settings};
use promptline_core::{AgentError, ModelConfig, PipelineError};
use promptline_llm::{LlmResponse, TextGenerator};

/// Answers with a numbered reply and keeps every prompt it saw.
struct Recorder {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for Recorder {
    async fn generate(&self, _model: &ModelConfig, prompt: &str) -> Result<LlmResponse, AgentError> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt.to_string());
        Ok(LlmResponse::text(format!("reply {}", prompts.len())))
    }
}

fn explorer() -> (IdeaExplorer, Arc<Recorder>) {
    let recorder = Arc::new(Recorder { prompts: Mutex::new(Vec::new()) });
    let model = builtin_models(&Settings::default())
        .into_iter()
        .find(|m| m.id == model_ids::CLAUDE_CONVERSATION)
        .unwrap();
    (IdeaExplorer::new(recorder.clone(), model).unwrap(), recorder)
}

#[tokio::test]
async fn full_session_walks_every_phase() {
    let (explorer, recorder) = explorer();
    let mut state = SessionState::new();

    state.start_brainstorming().unwrap();
    let feedback = explorer.add_idea(&mut state, "  Voice notes to tasks  ").await.unwrap();
    assert_eq!(feedback, "reply 1");
    explorer.add_idea(&mut state, "Meeting summarizer").await.unwrap();
    assert_eq!(state.ideas[0].text, "Voice notes to tasks");
    assert_eq!(state.ideas[1].feedback, "reply 2");

    state.finalize_brainstorming().unwrap();
    let plan = explorer.generate_plan(&mut state, "build MVP", "beta in May").await.unwrap();
    assert_eq!(state.plan.as_deref(), Some(plan.as_str()));

    state.finalize_planning().unwrap();
    explorer.generate_outputs(&mut state).await.unwrap();
    assert_eq!(state.artifact("product_requirements_document.txt").unwrap(), "reply 4");
    assert_eq!(state.artifact("prototype_example.txt").unwrap(), "reply 5");

    let prompts = recorder.prompts.lock().unwrap();
    assert!(prompts[2].contains("- Voice notes to tasks\n- Meeting summarizer"));
    assert!(prompts[2].contains("Steps: build MVP"));
    // Later prompts carry the whole conversation so far.
    assert!(prompts[4].contains("Human: Provide feedback and suggestions for this AI project idea: Voice notes to tasks\nAI: reply 1"));
    assert!(prompts[4].contains("AI: reply 4"));
}

#[tokio::test]
async fn outputs_are_generated_only_once() {
    let (explorer, recorder) = explorer();
    let mut state = SessionState { phase: Phase::Output, prd: Some("existing".into()), ..Default::default() };

    explorer.generate_outputs(&mut state).await.unwrap();
    explorer.generate_outputs(&mut state).await.unwrap();

    assert_eq!(state.prd.as_deref(), Some("existing"));
    assert_eq!(state.prototype.as_deref(), Some("reply 1"));
    assert_eq!(recorder.prompts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn operations_in_the_wrong_phase_are_rejected() {
    let (explorer, recorder) = explorer();
    let mut state = SessionState::new();

    let err = explorer.add_idea(&mut state, "idea").await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidPhase { .. }));
    assert!(explorer.generate_plan(&mut state, "", "").await.is_err());
    assert!(explorer.generate_outputs(&mut state).await.is_err());
    assert!(recorder.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_idea_is_missing_input() {
    let (explorer, _) = explorer();
    let mut state = SessionState::new();
    state.start_brainstorming().unwrap();

    let err = explorer.add_idea(&mut state, "   ").await.unwrap_err();
    assert!(matches!(err, PipelineError::MissingInput(f) if f == "idea"));
    assert!(state.ideas.is_empty());
}

#[tokio::test]
async fn start_over_resets_before_anything_reruns() {
    let (explorer, recorder) = explorer();
    let mut state = SessionState::new();
    state.start_brainstorming().unwrap();
    explorer.add_idea(&mut state, "first").await.unwrap();

    state.start_over();
    assert_eq!(state, SessionState::default());

    state.start_brainstorming().unwrap();
    explorer.add_idea(&mut state, "second").await.unwrap();

    let prompts = recorder.prompts.lock().unwrap();
    assert!(!prompts[1].contains("first"));
    assert_eq!(state.ideas.len(), 1);
}

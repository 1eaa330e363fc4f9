//! Per-session state of the idea explorer.

use std::fmt;

use promptline_core::PipelineError;
use serde::{Deserialize, Serialize};

/// Idea-explorer phase. Sessions move forward only, or back to [`Phase::Home`] on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Home,
    Brainstorming,
    Planning,
    Output,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Home => "home",
            Phase::Brainstorming => "brainstorming",
            Phase::Planning => "planning",
            Phase::Output => "output",
        };
        f.write_str(name)
    }
}

/// A submitted idea with the feedback it received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub text: String,
    pub feedback: String,
}

/// One exchange with the conversation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub input: String,
    pub response: String,
}

/// Downloadable documents produced in the output phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Prd,
    Prototype,
}

impl Artifact {
    pub const ALL: [Artifact; 2] = [Artifact::Prd, Artifact::Prototype];

    pub fn file_name(&self) -> &'static str {
        match self {
            Artifact::Prd => "product_requirements_document.txt",
            Artifact::Prototype => "prototype_example.txt",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.file_name() == name)
    }
}

/// Everything the idea explorer remembers about one session.
///
/// Fields not yet produced are `None` or empty. Writes overwrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub ideas: Vec<Idea>,
    pub plan: Option<String>,
    pub prd: Option<String>,
    pub prototype: Option<String>,
    pub transcript: Vec<Turn>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails unless the session is in `expected`.
    pub fn require(&self, expected: Phase) -> Result<(), PipelineError> {
        if self.phase == expected {
            return Ok(());
        }
        Err(PipelineError::InvalidPhase {
            expected: expected.to_string(),
            actual: self.phase.to_string(),
        })
    }

    fn advance(&mut self, from: Phase, to: Phase) -> Result<(), PipelineError> {
        self.require(from)?;
        self.phase = to;
        Ok(())
    }

    /// Home → Brainstorming.
    pub fn start_brainstorming(&mut self) -> Result<(), PipelineError> {
        self.advance(Phase::Home, Phase::Brainstorming)
    }

    /// Brainstorming → Planning.
    pub fn finalize_brainstorming(&mut self) -> Result<(), PipelineError> {
        self.advance(Phase::Brainstorming, Phase::Planning)
    }

    /// Planning → Output.
    pub fn finalize_planning(&mut self) -> Result<(), PipelineError> {
        self.advance(Phase::Planning, Phase::Output)
    }

    /// Discards everything and returns to the home phase.
    pub fn start_over(&mut self) {
        *self = Self::default();
    }

    /// Returns the text of a generated artifact by download file name.
    pub fn artifact(&self, file_name: &str) -> Result<&str, PipelineError> {
        let artifact = Artifact::from_file_name(file_name)
            .ok_or_else(|| PipelineError::UnknownArtifact(file_name.to_string()))?;
        self.require(Phase::Output)?;

        let text = match artifact {
            Artifact::Prd => self.prd.as_deref(),
            Artifact::Prototype => self.prototype.as_deref(),
        };
        text.ok_or_else(|| PipelineError::UnknownArtifact(format!("{} has not been generated", file_name)))
    }

    /// Ideas as a bullet list, one per line.
    pub fn idea_list(&self) -> String {
        self.ideas
            .iter()
            .map(|i| format!("- {}", i.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Transcript rendered for the conversation prompt.
    pub fn history(&self) -> String {
        self.transcript
            .iter()
            .map(|t| format!("Human: {}\nAI: {}", t.input, t.response))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

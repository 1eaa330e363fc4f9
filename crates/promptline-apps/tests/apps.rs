use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use promptline_apps::{AppCatalog, FormValue, Submission, NO_DOCUMENTS};
use promptline_config::{builtin_models, Settings};
use promptline_core::{AgentError, ModelConfig, PipelineError};
use promptline_engine::{PipelineEngine, PipelineRun};
use promptline_llm::{LlmResponse, TextGenerator};
use promptline_tools::{SearchBackend, ToolError};

const SEARCH_TEXT: &str = "<<fixed search result>>";

struct EchoGenerator {
    calls: Mutex<usize>,
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, _model: &ModelConfig, prompt: &str) -> Result<LlmResponse, AgentError> {
        *self.calls.lock().unwrap() += 1;
        Ok(LlmResponse::text(format!("ECHO[{}]", prompt)))
    }
}

struct FixedSearch {
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl SearchBackend for FixedSearch {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn search(&self, query: &str) -> Result<String, ToolError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(SEARCH_TEXT.to_string())
    }
}

struct Harness {
    generator: Arc<EchoGenerator>,
    search: Arc<FixedSearch>,
}

impl Harness {
    fn new() -> Self {
        Self {
            generator: Arc::new(EchoGenerator { calls: Mutex::new(0) }),
            search: Arc::new(FixedSearch { queries: Mutex::new(Vec::new()) }),
        }
    }

    async fn run(&self, app_id: &str, submission: Submission) -> Result<PipelineRun, PipelineError> {
        let catalog = AppCatalog::builtin();
        let app = catalog.get(app_id).unwrap();
        let inputs = app.form.validate(&submission)?;
        let engine = PipelineEngine::new(
            app.pipeline_config().unwrap().clone(),
            builtin_models(&Settings::default()),
            self.generator.clone(),
            self.search.clone(),
            HashMap::new(),
        )
        .unwrap();
        engine.execute(inputs).await
    }

    fn calls(&self) -> usize {
        *self.generator.calls.lock().unwrap()
    }

    fn queries(&self) -> Vec<String> {
        self.search.queries.lock().unwrap().clone()
    }
}

fn submit(pairs: &[(&str, &str)]) -> Submission {
    pairs.iter().map(|(k, v)| (k.to_string(), FormValue::from(*v))).collect()
}

fn step_ids(run: &PipelineRun) -> Vec<&str> {
    run.blocks.iter().map(|b| b.step_id.as_str()).collect()
}

#[tokio::test]
async fn stock_report_runs_seven_steps_with_two_searches() {
    let h = Harness::new();
    let run = h.run("stock-report", submit(&[("company", "Acme")])).await.unwrap();

    assert_eq!(
        step_ids(&run),
        [
            "history",
            "news",
            "financial_results",
            "kpis",
            "technical_analysis",
            "value_investing_kpis",
            "report_consolidation",
        ]
    );
    assert_eq!(
        h.queries(),
        ["Acme news last month", "Acme latest financial results for the last 5 years"]
    );
    assert!(run.blocks[1].prompt.contains(SEARCH_TEXT));
    assert!(run.blocks[2].prompt.contains(SEARCH_TEXT));
    assert_eq!(run.blocks[0].stage.as_deref(), Some("Planning Stage"));
    assert_eq!(run.blocks[3].stage.as_deref(), Some("Analysis Stage"));

    let expected = format!(
        "{}\n{}\n{}",
        run.output("kpis").unwrap(),
        run.output("technical_analysis").unwrap(),
        run.output("value_investing_kpis").unwrap()
    );
    assert!(run.blocks[6].prompt.contains(&expected));
    assert_eq!(h.calls(), 7);
}

#[tokio::test]
async fn content_runs_nine_steps_and_adapts_article_research() {
    let h = Harness::new();
    let run = h.run("content", submit(&[("theme", "urban gardening")])).await.unwrap();

    assert_eq!(run.blocks.len(), 9);
    assert_eq!(
        h.queries(),
        ["articles and books about urban gardening", "websites about urban gardening"]
    );
    assert!(run.blocks[1].prompt.contains(SEARCH_TEXT));
    assert!(run.blocks[2].prompt.contains(SEARCH_TEXT));
    let research = run.output("research_articles").unwrap();
    assert!(run.blocks[4].prompt.contains(research));
    assert_eq!(run.last().unwrap().step_id, "twitter");
}

#[tokio::test]
async fn book_runs_thirteen_steps_and_revision_sees_every_chapter() {
    let h = Harness::new();
    let run = h.run("book", submit(&[("theme", "tides")])).await.unwrap();

    assert_eq!(run.blocks.len(), 13);
    assert!(h.queries().is_empty());
    assert!(run.blocks[9].prompt.contains("chapters 5 and 6"));

    let revision = &run.last().unwrap().prompt;
    for n in 1..=5 {
        let chapter = run.output(&format!("writing_chapters_{}", n)).unwrap();
        assert!(revision.contains(chapter), "revision is missing chapter batch {}", n);
    }
}

#[tokio::test]
async fn new_lawsuit_draft_includes_both_searches_and_document_names() {
    let h = Harness::new();
    let mut submission = submit(&[("theme", "eviction"), ("facts", "Tenant was evicted without notice.")]);
    submission.insert(
        "docs".into(),
        FormValue::Files(vec!["lease.pdf".into(), "notice.pdf".into()]),
    );

    let run = h.run("new-lawsuit", submission).await.unwrap();

    assert_eq!(run.blocks.len(), 1);
    let block = &run.blocks[0];
    assert_eq!(
        h.queries(),
        ["eviction legal articles and books", "eviction previous legal decisions"]
    );
    assert!(block.prompt.contains(&format!("Legal Research: {}\n{}", SEARCH_TEXT, SEARCH_TEXT)));
    assert!(block.prompt.contains("Relevant Documents: lease.pdf, notice.pdf"));
    assert_eq!(block.searches.len(), 2);
}

#[tokio::test]
async fn existing_lawsuit_without_documents_says_so() {
    let h = Harness::new();
    let run = h
        .run("existing-lawsuit", submit(&[("theme", "overturn fine"), ("client", "Jane Roe")]))
        .await
        .unwrap();

    let prompt = &run.blocks[0].prompt;
    assert!(prompt.contains(&format!("Relevant Documents: {}", NO_DOCUMENTS)));
    assert!(prompt.contains("drafted in the Initial phase"));
    assert!(prompt.contains("Jane Roe"));
}

#[tokio::test]
async fn missing_required_field_fails_before_any_remote_call() {
    let h = Harness::new();
    let err = h.run("new-lawsuit", submit(&[("theme", "eviction")])).await.unwrap_err();

    assert!(matches!(err, PipelineError::MissingInput(f) if f == "facts"));
    assert_eq!(h.calls(), 0);
    assert!(h.queries().is_empty());
}

#[tokio::test]
async fn supporting_documents_are_single_step() {
    let h = Harness::new();
    for id in ["power-of-attorney", "declaration-of-poverty"] {
        let run = h.run(id, submit(&[("facts", "Client earns minimum wage.")])).await.unwrap();
        assert_eq!(run.blocks.len(), 1);
        assert!(run.blocks[0].prompt.ends_with("Client earns minimum wage."));
    }
    assert_eq!(h.calls(), 2);
}

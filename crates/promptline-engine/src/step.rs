//! Template-fill-and-invoke for a single step.

use std::collections::HashMap;
use std::time::Instant;

use promptline_config::{Source, StepConfig};
use promptline_core::{ModelConfig, PipelineError, PromptTemplate, TemplateError};
use promptline_llm::TextGenerator;
use promptline_tools::SearchBackend;
use tracing::{debug, info};

use crate::{OutputBlock, SearchHit};

/// Resolves a step's placeholders, renders its prompt, and calls the backend once.
///
/// Inputs, outputs, and search queries are all resolved before the first
/// search is issued, so a step that cannot render makes no remote call.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn fill_and_invoke(
    index: usize,
    step: &StepConfig,
    template: &PromptTemplate,
    model: &ModelConfig,
    inputs: &HashMap<String, String>,
    outputs: &HashMap<String, String>,
    generator: &dyn TextGenerator,
    search: &dyn SearchBackend,
) -> Result<OutputBlock, PipelineError> {
    let start = Instant::now();

    let plan = template
        .placeholders()
        .iter()
        .map(|placeholder| {
            let parts = prepare(template, placeholder, step.source_for(placeholder), inputs, outputs)?;
            Ok((placeholder, parts))
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    let mut values = HashMap::new();
    let mut searches = Vec::new();

    for (placeholder, parts) in plan {
        let mut resolved = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                Pending::Ready(value) => resolved.push(value),
                Pending::Query(query) => {
                    let text = run_search(search, &query).await?;
                    resolved.push(text.clone());
                    searches.push(SearchHit { placeholder: placeholder.clone(), query, text });
                }
            }
        }
        values.insert(placeholder.clone(), resolved.join("\n"));
    }

    let prompt = template.render(&values)?;
    debug!("║     Prompt: {}...", prompt.chars().take(100).collect::<String>());

    let response = generator.generate(model, &prompt).await?;
    info!("║     ← Response: {} chars", response.content.len());

    Ok(OutputBlock {
        index,
        step_id: step.id.clone(),
        label: step.label.clone(),
        stage: step.stage.clone(),
        model: model.id.clone(),
        prompt,
        response: response.content,
        searches,
        elapsed_ms: start.elapsed().as_millis() as u64,
    })
}

/// A placeholder part that is either known or waits on a web search.
#[derive(Debug, PartialEq)]
enum Pending {
    Ready(String),
    Query(String),
}

/// Flattens a source into its parts, in order, without touching the network.
fn prepare(
    template: &PromptTemplate,
    placeholder: &str,
    source: Source,
    inputs: &HashMap<String, String>,
    outputs: &HashMap<String, String>,
) -> Result<Vec<Pending>, PipelineError> {
    let mut parts = Vec::new();
    let mut stack = vec![source];

    while let Some(source) = stack.pop() {
        let part = match source {
            Source::Concat(children) => {
                stack.extend(children.into_iter().rev());
                continue;
            }
            Source::Input(name) => inputs.get(&name).cloned().map(Pending::Ready).ok_or_else(|| {
                TemplateError::MissingPlaceholder {
                    template: template.name().to_string(),
                    placeholder: placeholder.to_string(),
                }
            })?,
            Source::Output(step_id) => outputs
                .get(&step_id)
                .cloned()
                .map(Pending::Ready)
                .ok_or(PipelineError::UnresolvedOutput(step_id))?,
            Source::Literal(text) => Pending::Ready(text),
            Source::Search(query) => Pending::Query(PromptTemplate::new("search", query)?.render(inputs)?),
        };
        parts.push(part);
    }

    Ok(parts)
}

async fn run_search(search: &dyn SearchBackend, query: &str) -> Result<String, PipelineError> {
    info!("║     → Searching ({}): {}", search.name(), query);
    let text = search
        .search(query)
        .await
        .map_err(|e| PipelineError::Search(e.to_string()))?;
    info!("║     ← Search result: {} chars", text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> PromptTemplate {
        PromptTemplate::new("t", "{x}").unwrap()
    }

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn nested_concat_flattens_in_order() {
        let source = Source::concat([
            Source::input("a"),
            Source::concat([Source::literal("b"), Source::output("c")]),
            Source::search("{a} news"),
        ]);
        let parts = prepare(&template(), "x", source, &values(&[("a", "A")]), &values(&[("c", "C")])).unwrap();
        assert_eq!(
            parts,
            vec![
                Pending::Ready("A".into()),
                Pending::Ready("b".into()),
                Pending::Ready("C".into()),
                Pending::Query("A news".into()),
            ]
        );
    }

    #[test]
    fn missing_input_names_the_template_placeholder() {
        let source = Source::concat([Source::literal("b"), Source::input("absent")]);
        let err = prepare(&template(), "x", source, &HashMap::new(), &HashMap::new()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Template(TemplateError::MissingPlaceholder { ref placeholder, .. }) if placeholder == "x"
        ));
    }

    #[test]
    fn missing_output_is_unresolved() {
        let err = prepare(&template(), "x", Source::output("later"), &HashMap::new(), &HashMap::new()).unwrap_err();
        assert!(matches!(err, PipelineError::UnresolvedOutput(ref id) if id == "later"));
    }
}

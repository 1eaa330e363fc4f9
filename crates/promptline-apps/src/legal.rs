//! Legal drafting apps: new and existing lawsuits plus the two supporting documents.

use promptline_config::{model_ids, PipelineConfig, Source};

use crate::catalog::{AppDefinition, AppKind};
use crate::forms::{FieldSpec, FormSpec};

const NEW_LAWSUIT_DRAFT: &str = "\
Using the facts, documents, and legal research below, draft a complaint for a new lawsuit on the topic \"{theme}\".
Include the following sections:
- Introduction
- Facts of the Case
- Legal Grounds
- Demand
Facts: {facts}
Relevant Documents: {docs}
Legal Research: {research}
";

const EXISTING_LAWSUIT_DRAFT: &str = "\
Based on the information and research below, draft a response in the ongoing lawsuit concerning \"{theme}\".
The party being defended is: {client}
The petition is being drafted in the {phase} phase.
Expected outcome of this petition: {expectation}
Include the following sections:
- Introduction
- Background
- Response to Claims
- Legal Grounds for Defense
- Conclusion
Facts: {facts}
Relevant Documents: {docs}
Legal Research: {research}
";

const POWER_OF_ATTORNEY: &str = "Generate a Power of Attorney document based on the given facts: {facts}";

const DECLARATION_OF_POVERTY: &str = "Generate a Declaration of Poverty document based on the given facts: {facts}";

const NEW_LAWSUIT_AREAS: &[&str] = &[
    "Civil Law",
    "Real Estate Law",
    "Labor Law",
    "Family Law",
    "Criminal Law",
];

const EXISTING_LAWSUIT_AREAS: &[&str] = &[
    "Civil Law",
    "Real Estate Law",
    "Labor Law",
    "Family Law",
    "Criminal Law",
    "Administrative Law",
    "Tax Law",
    "International Law",
    "Civil Procedure",
    "Criminal Procedure",
    "Administrative Procedure",
    "Tax Procedure",
    "International Procedure",
];

const PHASES: &[&str] = &[
    "Initial",
    "Discovery",
    "Evidence",
    "Appeal",
    "Special Appeal",
    "Extraordinary Appeal",
];

/// Both lawsuit drafts research the theme twice and feed the concatenated results to the draft.
fn legal_research() -> Source {
    Source::concat([
        Source::search("{theme} legal articles and books"),
        Source::search("{theme} previous legal decisions"),
    ])
}

pub fn new_lawsuit() -> AppDefinition {
    let form = FormSpec::new(vec![
        FieldSpec::select("area", "Lawyer's practice area", NEW_LAWSUIT_AREAS),
        FieldSpec::text("theme", "Type of lawsuit").required(),
        FieldSpec::files("docs", "Required documents"),
        FieldSpec::textarea("facts", "Client facts").required(),
        FieldSpec::text("court", "Court of jurisdiction"),
        FieldSpec::files("petition_models", "Petition models for drafting style"),
    ]);

    let pipeline = PipelineConfig::builder("new-lawsuit", "New Lawsuit")
        .description("Research the topic and draft a complaint for a new lawsuit")
        .inputs(form.field_names())
        .step("draft", "First Draft of the Petition")
            .stage("Research and Draft")
            .model(model_ids::LLAMA3_70B)
            .template(NEW_LAWSUIT_DRAFT)
            .bind("research", legal_research())
            .done()
        .build();

    AppDefinition::pipeline("New Lawsuit", form, pipeline)
}

pub fn existing_lawsuit() -> AppDefinition {
    let form = FormSpec::new(vec![
        FieldSpec::select("area", "Lawyer's practice area", EXISTING_LAWSUIT_AREAS),
        FieldSpec::text("client", "Who is being defended"),
        FieldSpec::textarea("expectation", "What the petition should achieve"),
        FieldSpec::radio("phase", "Phase the petition is drafted in", PHASES),
        FieldSpec::text("theme", "Objective").required(),
        FieldSpec::files("decision", "Decision being answered"),
        FieldSpec::files("docs", "Context documents (initial petition and response)"),
        FieldSpec::textarea("facts", "Laws related to the case"),
        FieldSpec::files("petition_models", "Petition models for drafting style"),
        FieldSpec::files("attachments", "Documents attached to the petition"),
    ]);

    let pipeline = PipelineConfig::builder("existing-lawsuit", "Existing Lawsuit")
        .description("Research the objective and draft a response in an ongoing lawsuit")
        .inputs(form.field_names())
        .step("draft", "First Draft of the Petition")
            .stage("Research and Draft")
            .model(model_ids::LLAMA3_70B)
            .template(EXISTING_LAWSUIT_DRAFT)
            .bind("research", legal_research())
            .done()
        .build();

    AppDefinition::pipeline("Existing Lawsuit", form, pipeline)
}

fn facts_document(id: &str, title: &str, label: &str, template: &str) -> AppDefinition {
    let form = FormSpec::new(vec![FieldSpec::textarea("facts", "Client facts").required()]);

    let pipeline = PipelineConfig::builder(id, title)
        .inputs(form.field_names())
        .step("document", label)
            .model(model_ids::LLAMA3_70B)
            .template(template)
            .done()
        .build();

    AppDefinition::pipeline(title, form, pipeline)
}

pub fn power_of_attorney() -> AppDefinition {
    facts_document("power-of-attorney", "Power of Attorney", "Generated Power of Attorney", POWER_OF_ATTORNEY)
}

pub fn declaration_of_poverty() -> AppDefinition {
    facts_document(
        "declaration-of-poverty",
        "Declaration of Poverty",
        "Generated Declaration of Poverty",
        DECLARATION_OF_POVERTY,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_pipelines_validate() {
        for app in [new_lawsuit(), existing_lawsuit(), power_of_attorney(), declaration_of_poverty()] {
            let AppKind::Pipeline(pipeline) = &app.kind else {
                panic!("{} is not a pipeline", app.id);
            };
            pipeline.validate().unwrap();
        }
    }

    #[test]
    fn draft_step_searches_twice() {
        let app = new_lawsuit();
        let step = app.pipeline_config().unwrap().step("draft").unwrap();
        assert!(step.is_search_augmented());
        assert_eq!(step.bindings["research"], legal_research());
    }
}

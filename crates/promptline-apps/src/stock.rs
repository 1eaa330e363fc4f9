//! Stock-report generator.

use promptline_config::{model_ids, PipelineConfig, Source};

use crate::catalog::AppDefinition;
use crate::forms::{FieldSpec, FormSpec};

pub fn stock_report() -> AppDefinition {
    let form = FormSpec::new(vec![FieldSpec::text("company", "Company name").required()]);

    // News and financial results steps receive raw search results in place of the company name.
    let pipeline = PipelineConfig::builder("stock-report", "Stock Analysis Pipeline")
        .description("Research a company and consolidate its KPIs into a report")
        .inputs(form.field_names())
        .step("history", "History Output")
            .stage("Planning Stage")
            .model(model_ids::LLAMA3_70B)
            .template("Research the history of the company: {company}.")
            .done()
        .step("news", "News Output")
            .stage("Planning Stage")
            .model(model_ids::GEMMA2_9B)
            .template("Research the news of the last month for the company: {company}.")
            .bind("company", Source::search("{company} news last month"))
            .done()
        .step("financial_results", "Financial Results Output")
            .stage("Planning Stage")
            .model(model_ids::LLAMA3_8B_TOOL_USE)
            .template("Research the latest financial results for the company: {company}.")
            .bind("company", Source::search("{company} latest financial results for the last 5 years"))
            .done()
        .step("kpis", "KPIs Output")
            .stage("Analysis Stage")
            .model(model_ids::LLAMA3_70B)
            .template("Analyze the key performance indicators (KPIs) for the company: {company}.")
            .done()
        .step("technical_analysis", "Technical Analysis Output")
            .stage("Analysis Stage")
            .model(model_ids::GEMMA2_9B)
            .template("Perform a technical analysis for the company: {company}.")
            .done()
        .step("value_investing_kpis", "Value Investing KPIs Output")
            .stage("Analysis Stage")
            .model(model_ids::LLAMA3_8B_TOOL_USE)
            .template("Evaluate the value investing KPIs for the company: {company}.")
            .done()
        .step("report_consolidation", "Report Consolidation Output")
            .stage("Analysis Stage")
            .model(model_ids::LLAMA3_70B)
            .template("Consolidate the following information into a comprehensive report: {information}.")
            .bind(
                "information",
                Source::concat([
                    Source::output("kpis"),
                    Source::output("technical_analysis"),
                    Source::output("value_investing_kpis"),
                ]),
            )
            .done()
        .build();

    AppDefinition::pipeline("Stock Analysis", form, pipeline)
}

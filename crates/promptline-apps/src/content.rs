//! Marketing-content generator: plan, research, adapt, then publish in three formats.

use promptline_config::{model_ids, PipelineConfig, Source};

use crate::catalog::AppDefinition;
use crate::forms::{FieldSpec, FormSpec};

const PLANNING: &str = "\
Provide a detailed overview of the theme: {theme}. Consider the main aspects, subtopics, and key points that \
should be covered. Think about the relevance and importance of each aspect to the overall theme.";

const RESEARCH_ARTICLES: &str = "\
Research and list the most relevant and high-quality articles and books related to the theme: {theme}. \
Consider the credibility of the sources, the depth of information provided, and how well they align with the \
main aspects and subtopics identified in the planning stage.";

const RESEARCH_WEBSITES: &str = "\
Research and list the most informative and trustworthy websites related to the theme: {theme}. Evaluate the \
websites on their authority and accuracy, and on how well they complement the information gathered from \
articles and books.";

const TARGET_PUBLIC: &str = "\
Analyze the target public for the theme: {theme}. Consider their demographics, interests, knowledge level, and \
the questions or concerns they may have. Think about how the content should be tailored to communicate \
effectively with this audience.";

const LANGUAGE_ADAPTATION: &str = "\
Adapt the language of the following content for the target public: {content}. Consider the target public's \
demographics, interests, and knowledge level. Simplify complex concepts, use relatable examples, and keep an \
engaging tone that resonates with the audience.";

const FIRST_DRAFT: &str = "\
Create the first revised main draft based on the content: {content}. Consider the information gathered during \
the research phase and the insights from the target public analysis. Organize the content logically, keep a \
smooth flow of ideas, and convey the main points of the theme.";

const KEYNOTE: &str = "\
Generate text for a keynote presentation based on the theme: {theme}. Consider the main aspects and key points \
identified in the planning stage. Present the information in a clear, concise, and engaging manner suitable \
for a live presentation. Use storytelling techniques and examples to make the content memorable.";

const LINKEDIN: &str = "\
Generate an article for LinkedIn based on the theme: {theme}. The audience on LinkedIn is mostly professionals \
and industry experts. Present the information in a way that demonstrates thought leadership, provides valuable \
insights, and encourages discussion. Use a professional tone and include relevant examples and data to support \
your points.";

const TWITTER: &str = "\
Generate a series of concise and engaging tweets based on the theme: {theme}. Consider the character limit on \
Twitter and the fast pace of the platform. Break the main points into bite-sized pieces that are easy to \
understand and share. Use hashtags and mentions to increase visibility, and invite retweets and replies with \
questions or thought-provoking statements.";

pub fn content() -> AppDefinition {
    let form = FormSpec::new(vec![FieldSpec::text("theme", "Content theme").required()]);

    // The research prompts receive the raw search results in place of the theme.
    let pipeline = PipelineConfig::builder("content", "Content Generation Pipeline")
        .description("Research a theme and produce a keynote, a LinkedIn article, and tweets")
        .inputs(form.field_names())
        .step("planning", "Planning Output")
            .stage("Planning Stage")
            .model(model_ids::LLAMA3_70B)
            .template(PLANNING)
            .done()
        .step("research_articles", "Research Articles Output")
            .stage("Research Stage")
            .model(model_ids::GEMMA2_9B)
            .template(RESEARCH_ARTICLES)
            .bind("theme", Source::search("articles and books about {theme}"))
            .done()
        .step("research_websites", "Research Websites Output")
            .stage("Research Stage")
            .model(model_ids::LLAMA3_8B)
            .template(RESEARCH_WEBSITES)
            .bind("theme", Source::search("websites about {theme}"))
            .done()
        .step("target_public_analysis", "Target Public Analysis Output")
            .stage("Raw Content Stage")
            .model(model_ids::LLAMA3_70B)
            .template(TARGET_PUBLIC)
            .done()
        .step("language_adaptation", "Language Adaptation Output")
            .stage("Raw Content Stage")
            .model(model_ids::GEMMA2_9B)
            .template(LANGUAGE_ADAPTATION)
            .bind("content", Source::output("research_articles"))
            .done()
        .step("first_draft", "First Revised Main Draft Output")
            .stage("Raw Content Stage")
            .model(model_ids::LLAMA3_8B)
            .template(FIRST_DRAFT)
            .bind("content", Source::output("language_adaptation"))
            .done()
        .step("keynote", "Keynote Presentation Output")
            .stage("Content Generation Stage")
            .model(model_ids::LLAMA3_70B)
            .template(KEYNOTE)
            .done()
        .step("linkedin", "LinkedIn Article Output")
            .stage("Content Generation Stage")
            .model(model_ids::GEMMA2_9B)
            .template(LINKEDIN)
            .done()
        .step("twitter", "Twitter Posts Output")
            .stage("Content Generation Stage")
            .model(model_ids::LLAMA3_8B)
            .template(TWITTER)
            .done()
        .build();

    AppDefinition::pipeline("Content Generation", form, pipeline)
}

//! Book generator: thirteen steps from theme to revised chapters.

use promptline_config::{model_ids, PipelineConfig, Source};

use crate::catalog::AppDefinition;
use crate::forms::{FieldSpec, FormSpec};

/// Chapters drafted by each run of the chapter-writing step.
pub const CHAPTER_RANGES: [(u32, u32); 5] = [(1, 2), (3, 4), (5, 6), (7, 8), (9, 10)];

const THEME_SELECTION: &str = "\
Identify the central theme or concept to explore in this book.
Theme: {theme}
";

const THEME_RESEARCH: &str = "\
Gather information on the theme \"{theme}\". Provide key resources, recent studies, or expert insights that \
enrich our understanding of this topic.
";

const THEME_EXPLORATION: &str = "\
With the gathered information on \"{theme}\" ({theme_research_results}), list specific aspects, subtopics, or \
important questions related to \"{theme}\" that will captivate readers and add depth to the book.
";

const KEY_TAKEAWAYS: &str = "\
Considering the exploration of \"{theme}\" ({theme_exploration_results}), summarize the most compelling arguments, \
surprising facts, or crucial ideas about \"{theme}\" that will form the core of the book.
";

const BOOK_STRUCTURE: &str = "\
Based on the research and exploration of \"{theme}\" so far ({key_takeaways_results}), outline the major sections \
or chapters. Organize them to create a logical flow and keep readers engaged.
";

const CHAPTER_OUTLINES: &str = "\
For each chapter recommended in the book structure ({book_structure}), list the key points to cover. \
Describe how to open the chapter to hook readers and suggest a conclusion to aim for. Do this for all chapters.
";

const ALIGNMENT: &str = "\
Based on the {chapter_outlines}, provide detailed guidelines for tone and style. Include specific points to \
emphasize so the content aligns with the book's overall structure:
    - Tone: the desired tone for the chapters (formal, informal, academic, conversational)
    - Style: the writing style that best fits the theme and target audience, with guidance on sentence structure, \
use of jargon, and level of complexity
    - Chapter Size: an approximate word count or number of pages for each chapter
    - Opening: how to open each chapter engagingly to hook readers
    - Conclusion: a strategy for concluding each chapter effectively
";

const WRITING_CHAPTERS: &str = "\
Based on the chapter outlines ({chapter_outlines}) and considering the alignment guidelines ({alignment}), draft \
the content for chapters {first} and {second}.
For each chapter, follow these guidelines:
    - Introduction: Provide a compelling opening that hooks the reader.
    - Main Points: Cover the key points as outlined. Ensure logical flow and coherence.
    - Tone and Style: Adhere to the tone and style suggested in the ({alignment}) phase.
    - Target Length: Aim for the chapter length suggested in the ({alignment}).
    - Conclusion: End with a strong conclusion that reinforces the main points and provides a seamless \
transition to the next chapter.
";

const REVISION: &str = "\
Considering what has been gathered in {writing_chapters_1}, {writing_chapters_2}, {writing_chapters_3}, \
{writing_chapters_4}, and {writing_chapters_5}, present a final version of the drafted content that respects \
the following guidelines:
    - Grammar and punctuation: Correct any grammatical errors and ensure proper punctuation throughout the text.
    - Spelling: Correct all spelling mistakes.
    - Tone and Style: Maintain the tone and style described in the {alignment} guidelines.
    - Cohesion and Coherence: Ensure a logical flow of ideas and smooth transitions between sections within each chapter.
    - Chapter Length: Ensure that each chapter has at least 15 paragraphs.
    - Engagement: Make sure the content remains engaging and compelling for the reader.
    - Formatting: Ensure the formatting is consistent and professional.
";

/// Step ID of the n-th (1-based) chapter-writing run.
fn writing_step_id(n: usize) -> String {
    format!("writing_chapters_{}", n)
}

pub fn book() -> AppDefinition {
    let form = FormSpec::new(vec![FieldSpec::text("theme", "Book theme").required()]);

    let mut builder = PipelineConfig::builder("book", "Book Generator")
        .description("Turn a theme into outlined, drafted, and revised book chapters")
        .inputs(form.field_names())
        .step("theme_selection", "Theme Selection Output")
            .model(model_ids::LLAMA3_70B)
            .template(THEME_SELECTION)
            .done()
        .step("theme_research", "Theme Research Output")
            .model(model_ids::LLAMA3_70B)
            .template(THEME_RESEARCH)
            .done()
        .step("theme_exploration", "Theme Exploration Output")
            .model(model_ids::LLAMA3_8B)
            .template(THEME_EXPLORATION)
            .bind("theme_research_results", Source::output("theme_research"))
            .done()
        .step("key_takeaways", "Key Takeaways Output")
            .model(model_ids::LLAMA3_8B)
            .template(KEY_TAKEAWAYS)
            .bind("theme_exploration_results", Source::output("theme_exploration"))
            .done()
        .step("book_structure", "Book Structure Output")
            .model(model_ids::LLAMA3_70B)
            .template(BOOK_STRUCTURE)
            .bind("key_takeaways_results", Source::output("key_takeaways"))
            .done()
        .step("chapter_outlines", "Chapter Outlines Output")
            .model(model_ids::LLAMA3_70B)
            .template(CHAPTER_OUTLINES)
            .bind("book_structure", Source::output("book_structure"))
            .done()
        .step("alignment", "Alignment Output")
            .model(model_ids::LLAMA3_8B)
            .template(ALIGNMENT)
            .bind("chapter_outlines", Source::output("chapter_outlines"))
            .done();

    for (n, (first, second)) in CHAPTER_RANGES.iter().enumerate().map(|(i, r)| (i + 1, r)) {
        builder = builder
            .step(writing_step_id(n), format!("Writing Chapters {} and {} Output", first, second))
                .model(model_ids::LLAMA3_8B)
                .template(WRITING_CHAPTERS)
                .bind("chapter_outlines", Source::output("chapter_outlines"))
                .bind("alignment", Source::output("alignment"))
                .bind("first", Source::literal(first.to_string()))
                .bind("second", Source::literal(second.to_string()))
                .done();
    }

    let mut revision = builder
        .step("revision", "Revision Output")
            .model(model_ids::LLAMA3_8B)
            .template(REVISION)
            .bind("alignment", Source::output("alignment"));
    for n in 1..=CHAPTER_RANGES.len() {
        revision = revision.bind(writing_step_id(n), Source::output(writing_step_id(n)));
    }

    AppDefinition::pipeline("Book Generator", form, revision.done().build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_has_thirteen_steps_in_order() {
        let app = book();
        let pipeline = app.pipeline_config().unwrap();
        pipeline.validate().unwrap();

        let ids: Vec<_> = pipeline.steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 13);
        assert_eq!(ids[6], "alignment");
        assert_eq!(&ids[7..12], ["writing_chapters_1", "writing_chapters_2", "writing_chapters_3", "writing_chapters_4", "writing_chapters_5"]);
        assert_eq!(ids[12], "revision");
    }

    #[test]
    fn chapter_steps_share_one_template() {
        let app = book();
        let pipeline = app.pipeline_config().unwrap();
        let writers: Vec<_> = pipeline.steps.iter().filter(|s| s.id.starts_with("writing_chapters_")).collect();

        assert!(writers.iter().all(|s| s.template == WRITING_CHAPTERS));
        assert_eq!(writers[2].bindings["first"], Source::literal("5"));
        assert_eq!(writers[2].bindings["second"], Source::literal("6"));
    }
}

const ANSWER_INSTRUCTION: &str = "Answer this question: ";

pub struct PromptBuilder;

impl PromptBuilder {
    /// `Answer this question: <query>\n\n<context>`
    pub fn answer_prompt(query: &str, context: &str) -> String {
        format!("{}{}\n\n{}", ANSWER_INSTRUCTION, query, context)
    }
}

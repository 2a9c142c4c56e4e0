//! Prompt text for subtitle translation

/// Persona and rules sent as the system message on every translation
pub const SYSTEM_PROMPT: &str = "您是一位专业字幕翻译专家，请严格遵循以下规则：
1. 将原文精准翻译为简体中文，保持原文本意
2. 使用自然的口语化表达，符合中文观影习惯
3. 结合上下文语境，人物称谓、专业术语、情感语气在上下文中保持连贯
4. 按行翻译待译内容。翻译结果不要包括上下文。
5. 输出内容必须仅包括译文。不要输出任何开场白、解释说明或总结";

/// System message seeded into a new conversation session
pub const DEFAULT_SESSION_PROMPT: &str = "请在接下来的对话中使用中文回复，并且内容尽可能详细。";

/// Build the user message. An empty context counts as no context.
pub fn build_user_prompt(text: &str, context: Option<&str>) -> String {
    match context.filter(|c| !c.is_empty()) {
        Some(context) => format!("翻译上下文：\n{context}\n\n需要翻译的内容：\n{text}"),
        None => format!("请翻译：\n{text}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_context() {
        assert_eq!(build_user_prompt("Hello there.", None), "请翻译：\nHello there.");
    }

    #[test]
    fn test_prompt_with_context() {
        assert_eq!(
            build_user_prompt("How are you?", Some("Hello there.")),
            "翻译上下文：\nHello there.\n\n需要翻译的内容：\nHow are you?"
        );
    }

    #[test]
    fn test_empty_context_is_ignored() {
        assert_eq!(build_user_prompt("Hi", Some("")), "请翻译：\nHi");
    }

    #[test]
    fn test_system_prompt_rules() {
        let lines: Vec<&str> = SYSTEM_PROMPT.lines().collect();
        assert_eq!(
            lines,
            vec![
                "您是一位专业字幕翻译专家，请严格遵循以下规则：",
                "1. 将原文精准翻译为简体中文，保持原文本意",
                "2. 使用自然的口语化表达，符合中文观影习惯",
                "3. 结合上下文语境，人物称谓、专业术语、情感语气在上下文中保持连贯",
                "4. 按行翻译待译内容。翻译结果不要包括上下文。",
                "5. 输出内容必须仅包括译文。不要输出任何开场白、解释说明或总结",
            ]
        );
        assert!(!SYSTEM_PROMPT.ends_with('\n'));
    }
}

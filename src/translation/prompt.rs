/// Stands in for literal newlines so each value occupies exactly one line.
#[allow(clippy::literal_string_with_formatting_args)]
pub const NEWLINE_PLACEHOLDER: &str = "{{NEWLINE_PLACEHOLDER}}";

#[allow(clippy::literal_string_with_formatting_args)]
pub const SYSTEM_PROMPT: &str = "You are a professional translator specializing in localizing web content. \
     Your task is to translate the given texts accurately while preserving all HTML structure \
     and the special placeholder {{NEWLINE_PLACEHOLDER}}. \
     Strictly maintain all HTML tags and the placeholder in their original form and position. \
     Translate only the content between tags, not the tags themselves or the placeholder. \
     Provide only the translated texts, each on a new line, maintaining the original order. \
     Do not add any comments, explanations, or additional formatting.";

const CONTENT_SEPARATOR: &str =
    "------------ The following is the content that needs to be translated ------------";

/// Builds the system prompt, appending the user's custom instructions if any.
pub fn build_system_prompt(custom_prompt: Option<&str>) -> String {
    match custom_prompt.map(str::trim) {
        Some(extra) if !extra.is_empty() => format!("{SYSTEM_PROMPT} {extra}"),
        _ => SYSTEM_PROMPT.to_string(),
    }
}

/// Builds the user message carrying the newline-joined texts.
pub fn build_user_prompt(texts: &[String], target_language: &str) -> String {
    format!(
        "Translate the following {count} texts to {target_language}. \
         Maintain the original order and preserve all HTML tags and the placeholder \
         {NEWLINE_PLACEHOLDER} exactly as they appear. \
         Do not translate the content inside HTML tags or the placeholder. \
         Return each translated text on a new line, without any explanations, \
         quotation marks, line numbers, or additional formatting.\n\
         {CONTENT_SEPARATOR}\n\n{joined}",
        count = texts.len(),
        joined = texts.join("\n"),
    )
}

pub fn protect_newlines(text: &str) -> String {
    text.replace('\n', NEWLINE_PLACEHOLDER)
}

pub fn restore_newlines(text: &str) -> String {
    text.replace(NEWLINE_PLACEHOLDER, "\n")
}

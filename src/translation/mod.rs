pub mod batch;
mod client;
mod language;
mod prompt;

pub use batch::{BatchProgress, BatchSettings, BatchTranslator, TranslationBatch, plan_batches};
pub use client::{TranslationCall, TranslationClient};
pub use language::{SUPPORTED_LANGUAGES, code_to_language_name, print_languages};
pub use prompt::{NEWLINE_PLACEHOLDER, build_system_prompt};

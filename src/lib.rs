//! # json-translator - Incremental JSON locale translation
//!
//! `translator` translates the string values of a flat JSON locale file into
//! a target language through an OpenAI-compatible chat-completions API,
//! keeping keys, key order, HTML markup and embedded newlines intact.
//!
//! ## Features
//!
//! - **Incremental runs**: the previous output file acts as the cache; only
//!   new keys and keys still holding the untranslated source text are sent
//! - **Batching**: values are sent in fixed-size batches, one request at a time
//! - **Alignment checks**: a response with the wrong number of lines aborts the
//!   run before anything is written
//! - **Stable output**: one entry per line, source key order, no HTML escaping
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate locales/en.json into locales/fr.json
//! translator -l fr
//!
//! # Custom input, output directory and batch size
//! translator -i web/i18n/en.json -l ja -o dist/i18n -b 50
//!
//! # List supported language codes
//! translator languages
//! ```
//!
//! ## Configuration
//!
//! The API key comes from `OPENAI_API_KEY` (also read from `.env`).
//! Defaults can be stored in `~/.config/json-translator/config.toml`:
//!
//! ```toml
//! [translator]
//! model = "gpt-4o-mini"
//! endpoint = "https://api.openai.com/v1"
//! batch_size = 100
//! custom_prompt = "Keep product names in English."
//! ```

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file, environment and `.env` handling.
pub mod config;

/// Flat JSON document reading and writing.
pub mod document;

/// Error types for the translation pipeline.
pub mod error;

/// File system utilities.
pub mod fs;

/// Merging fresh source documents with previous translations.
pub mod merge;

/// Global output configuration (quiet mode, colors, verbose dumps).
pub mod output;

/// Path utilities for configuration and output files.
pub mod paths;

/// Load, merge, translate and write in one run.
pub mod pipeline;

/// Insertion-ordered string map.
pub mod store;

/// Batching, prompts and the chat-completions client.
pub mod translation;

/// Terminal UI components (spinner, colors).
pub mod ui;

pub use error::{Error, Result};
pub use store::OrderedStore;

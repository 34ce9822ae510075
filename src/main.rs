use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use json_translator::cli::commands::translate::{self, TranslateOptions};
use json_translator::cli::{Args, Command};
use json_translator::config::ConfigurationError;
use json_translator::output::{self, OutputConfig};
use json_translator::translation::print_languages;
use json_translator::ui::Style;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.quiet,
        no_color: args.no_color || std::env::var("NO_COLOR").is_ok(),
        verbose: args.verbose,
    });

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", Style::error("Error:"));
            ExitCode::from(exit_code(&err) as u8)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    if let Some(Command::Languages) = args.command {
        print_languages();
        return Ok(());
    }

    let language = args
        .language
        .ok_or_else(|| anyhow::anyhow!("Missing required option: --language <CODE>"))
        .context(ConfigurationError)?;

    translate::run_translate(TranslateOptions {
        input: args.input,
        language,
        batch_size: args.batch_size,
        env_file: args.env_file,
        output_dir: args.output,
        filename: args.filename,
        model: args.model,
        endpoint: args.endpoint,
        timeout: args.timeout,
    })
    .await
}

fn exit_code(err: &anyhow::Error) -> exitcode::ExitCode {
    if err.downcast_ref::<ConfigurationError>().is_some() {
        return exitcode::CONFIG;
    }
    err.downcast_ref::<json_translator::Error>()
        .map_or(exitcode::SOFTWARE, json_translator::Error::exit_code)
}

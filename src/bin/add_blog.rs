use std::process::ExitCode;

use folio::cli::{self, blog::BlogArgs};
use folio::config::Settings;
use folio::prompt::Prompter;

fn main() -> ExitCode {
    folio::init_tracing("warn");
    let args: BlogArgs = cli::parse_args();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => cli::report(&e),
    }
}

fn run(args: &BlogArgs) -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let post = cli::blog::run(args, &settings, &mut Prompter::stdio())?;

    println!("\nAdded blog post:");
    println!("{}", serde_json::to_string_pretty(&post)?);
    Ok(())
}

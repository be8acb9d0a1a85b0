use std::process::ExitCode;

use folio::cli::{self, talk::TalkArgs};
use folio::config::Settings;
use folio::prompt::Prompter;

fn main() -> ExitCode {
    folio::init_tracing("warn");
    let args: TalkArgs = cli::parse_args();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => cli::report(&e),
    }
}

fn run(args: &TalkArgs) -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let (presentation, path) = cli::talk::run(args, &settings, &mut Prompter::stdio())?;

    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    println!("\nAdded presentation to {}:", file);
    println!("{}", serde_json::to_string_pretty(&presentation)?);
    Ok(())
}

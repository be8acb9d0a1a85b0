use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

use super::{given, select_mode, Mode};
use crate::config::Settings;
use crate::date;
use crate::error::Result;
use crate::model::Presentation;
use crate::prompt::Prompter;
use crate::store;

const EXAMPLES: &str = "\
Examples:
  add-talk                    # Interactive mode
  add-talk -t \"My Talk\" -e \"JSConf\" -d \"2024-06-15\"
  add-talk --title \"Advanced TS\" --event \"Conference\" --date \"2024-06-15\" --slides \"https://...\"";

/// Add a presentation to its yearly collection file.
///
/// Run without arguments to be prompted for each field.
#[derive(Parser, Debug, Default)]
#[command(name = "add-talk", after_help = EXAMPLES)]
pub struct TalkArgs {
    /// Talk title
    #[arg(short = 't', long)]
    pub title: Option<String>,
    /// Event/meetup name
    #[arg(short = 'e', long)]
    pub event: Option<String>,
    /// Date (YYYY-MM-DD format)
    #[arg(short = 'd', long)]
    pub date: Option<String>,
    /// Brief description of the talk
    #[arg(long)]
    pub description: Option<String>,
    /// Slides URL
    #[arg(short = 's', long)]
    pub slides: Option<String>,
    /// Video URL (e.g., YouTube)
    #[arg(short = 'v', long)]
    pub video: Option<String>,
    /// PDF filename, stored under the slides prefix
    #[arg(short = 'p', long)]
    pub pdf: Option<String>,
    /// Prompt for each field
    #[arg(short = 'i', long)]
    pub interactive: bool,
}

/// Raw answers before the pdf filename is turned into a path.
struct Draft<'a> {
    title: &'a str,
    event: &'a str,
    date: &'a str,
    description: Option<&'a str>,
    slides: Option<&'a str>,
    video: Option<&'a str>,
    pdf: Option<&'a str>,
}

impl Draft<'_> {
    fn build(&self, slides_prefix: &str) -> Presentation {
        Presentation {
            title: self.title.to_string(),
            event: self.event.to_string(),
            date: self.date.to_string(),
            description: self.description.map(str::to_string),
            slides: self.slides.map(str::to_string),
            video: self.video.map(str::to_string),
            slide_pdf: self.pdf.map(|f| format!("{slides_prefix}{f}")),
        }
    }
}

impl TalkArgs {
    pub fn resolve(&self, slides_prefix: &str) -> Result<Mode<Presentation>> {
        let title = given(&self.title);
        let event = given(&self.event);
        let date = given(&self.date);
        let description = given(&self.description);
        let slides = given(&self.slides);
        let video = given(&self.video);
        let pdf = given(&self.pdf);

        let required = [("--title", title), ("--event", event), ("--date", date)];
        let optional_given = [description, slides, video, pdf].iter().any(Option::is_some);
        if !select_mode(self.interactive, &required, optional_given)? {
            return Ok(Mode::Interactive);
        }

        let (Some(title), Some(event), Some(date)) = (title, event, date) else {
            return Ok(Mode::Interactive);
        };
        date::validate_event_date(date)?;

        let draft = Draft {
            title,
            event,
            date,
            description,
            slides,
            video,
            pdf,
        };
        Ok(Mode::Direct(draft.build(slides_prefix)))
    }
}

pub fn prompt_presentation<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    slides_prefix: &str,
) -> Result<Presentation> {
    p.say("\nAdd a new presentation (press Enter to skip optional fields)\n")?;
    let title = p.required("Title (required): ")?;
    let event = p.required("Event/meetup name (required): ")?;
    let date = p.required_with("Date (YYYY-MM-DD, required): ", |d| {
        date::parse_event_date(d).is_some()
    })?;
    let description = p.optional("Description (optional): ")?;
    let slides = p.optional("Slides URL (optional): ")?;
    let video = p.optional("Video URL (optional): ")?;
    let pdf = p.optional("PDF filename (optional, e.g., my-talk.pdf): ")?;

    let draft = Draft {
        title: &title,
        event: &event,
        date: &date,
        description: description.as_deref(),
        slides: slides.as_deref(),
        video: video.as_deref(),
        pdf: pdf.as_deref(),
    };
    Ok(draft.build(slides_prefix))
}

/// Collect a presentation from flags or prompts and append it to its year
/// file. Returns the record and the file written.
pub fn run<R: BufRead, W: Write>(
    args: &TalkArgs,
    settings: &Settings,
    prompter: &mut Prompter<R, W>,
) -> Result<(Presentation, PathBuf)> {
    let presentation = match args.resolve(&settings.slides_prefix)? {
        Mode::Direct(p) => p,
        Mode::Interactive => prompt_presentation(prompter, &settings.slides_prefix)?,
    };
    let path = store::add_presentation(&settings.presentations_path(), &presentation)?;
    Ok((presentation, path))
}

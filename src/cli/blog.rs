use std::io::{BufRead, Write};

use clap::Parser;

use super::{given, select_mode, Mode};
use crate::config::Settings;
use crate::date;
use crate::error::Result;
use crate::model::BlogPost;
use crate::prompt::Prompter;
use crate::store;

const EXAMPLES: &str = "\
Examples:
  add-blog                    # Interactive mode
  add-blog -t \"My Post\" -d \"Description\" --date \"2024-01\" -u \"https://...\"";

/// Add a blog post to the blog collection.
///
/// Run without arguments to be prompted for each field.
#[derive(Parser, Debug, Default)]
#[command(name = "add-blog", after_help = EXAMPLES)]
pub struct BlogArgs {
    /// Blog post title
    #[arg(short = 't', long)]
    pub title: Option<String>,
    /// Short description of the post
    #[arg(short = 'd', long)]
    pub description: Option<String>,
    /// Publish date (YYYY-MM format)
    #[arg(long)]
    pub date: Option<String>,
    /// URL to the blog post
    #[arg(short = 'u', long)]
    pub url: Option<String>,
    /// Prompt for each field
    #[arg(short = 'i', long)]
    pub interactive: bool,
}

impl BlogArgs {
    pub fn resolve(&self) -> Result<Mode<BlogPost>> {
        let title = given(&self.title);
        let description = given(&self.description);
        let date = given(&self.date);
        let url = given(&self.url);

        let required = [
            ("--title", title),
            ("--description", description),
            ("--date", date),
            ("--url", url),
        ];
        if !select_mode(self.interactive, &required, false)? {
            return Ok(Mode::Interactive);
        }

        // select_mode only returns true when every field is present.
        let (Some(title), Some(description), Some(date), Some(url)) = (title, description, date, url)
        else {
            return Ok(Mode::Interactive);
        };
        date::validate_year_month(date)?;

        Ok(Mode::Direct(BlogPost {
            title: title.to_string(),
            description: description.to_string(),
            date: date.to_string(),
            url: url.to_string(),
        }))
    }
}

pub fn prompt_post<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<BlogPost> {
    p.say("\nAdd a new blog post\n")?;
    let title = p.required("Title (required): ")?;
    let description = p.required("Description (required): ")?;
    let date = p.required_with("Publish date (YYYY-MM, required): ", |d| {
        date::parse_year_month(d).is_some()
    })?;
    let url = p.required("URL (required): ")?;
    Ok(BlogPost {
        title,
        description,
        date,
        url,
    })
}

/// Collect a post from flags or prompts and append it to the blog file.
pub fn run<R: BufRead, W: Write>(
    args: &BlogArgs,
    settings: &Settings,
    prompter: &mut Prompter<R, W>,
) -> Result<BlogPost> {
    let post = match args.resolve()? {
        Mode::Direct(post) => post,
        Mode::Interactive => prompt_post(prompter)?,
    };
    store::add_blog_post(&settings.blog_path(), &post)?;
    Ok(post)
}

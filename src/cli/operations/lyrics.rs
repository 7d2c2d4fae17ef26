use clap::Args;
use anyhow::Result;

use crate::cli::common::OutputArgs;
use crate::cli::report::{self, LyricsReport, Report};
use crate::services::ServiceFactory;
use crate::utils::progress::{ProgressMessages, ProgressUtils};

#[derive(Args)]
pub struct LyricsArgs {
    /// Song title, as used in the wiki's "Lyrics: <title>" page name
    #[arg(value_name = "TITLE")]
    title: String,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn execute(args: LyricsArgs, services: &ServiceFactory) -> Result<()> {
    let traversal = services.create_traversal(Some(true))?;

    let pb = ProgressUtils::create_traversal_spinner(args.output.is_json());
    pb.set_message(ProgressMessages::lyrics_for(&args.title));
    let lyrics = traversal.lookup_lyrics(&args.title).await;
    pb.finish_and_clear();

    let report = Report::new(
        "lyrics",
        &args.title,
        LyricsReport {
            title: args.title.clone(),
            lyrics: lyrics.clone(),
        },
    );
    report::emit(&args.output, &report, || report::print_lyrics(&args.title, lyrics.as_deref()))
}

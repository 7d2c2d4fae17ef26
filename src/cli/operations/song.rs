use clap::Args;
use anyhow::Result;

use crate::cli::common::{IdentifierArgs, LyricsFlags, OutputArgs};
use crate::cli::report::{self, Report, SongReport};
use crate::services::ServiceFactory;
use crate::utils::progress::{ProgressMessages, ProgressUtils};

#[derive(Args)]
pub struct SongArgs {
    #[command(flatten)]
    song: IdentifierArgs,

    #[command(flatten)]
    lyrics: LyricsFlags,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn execute(args: SongArgs, services: &ServiceFactory) -> Result<()> {
    let identifier = args.song.identifier();
    let mut traversal = services.create_traversal(args.lyrics.include_lyrics())?;

    let pb = ProgressUtils::create_traversal_spinner(args.output.is_json());
    pb.set_message(ProgressMessages::resolving("song", &identifier.to_string()));

    let song = match traversal.lookup_song(&identifier).await {
        Ok(song) => song,
        Err(e) => {
            pb.finish_with_message(ProgressMessages::FAILED);
            return Err(e.into());
        }
    };
    pb.finish_and_clear();

    let report = Report::new("song", &args.song.input, SongReport::from_detail(1, &song, args.output.full));
    report::emit(&args.output, &report, || report::print_song(&song))
}

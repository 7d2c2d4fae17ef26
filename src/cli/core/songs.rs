use clap::Args;
use anyhow::Result;

use crate::cli::common::{IdentifierArgs, LyricsFlags, OutputArgs};
use crate::cli::report::{self, AlbumSongsReport, Report};
use crate::services::ServiceFactory;
use crate::utils::progress::{ProgressMessages, ProgressUtils};

#[derive(Args)]
pub struct SongsArgs {
    #[command(flatten)]
    album: IdentifierArgs,

    #[command(flatten)]
    lyrics: LyricsFlags,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn execute(args: SongsArgs, services: &ServiceFactory) -> Result<()> {
    let identifier = args.album.identifier();
    let mut traversal = services.create_traversal(args.lyrics.include_lyrics())?;

    let pb = ProgressUtils::create_traversal_spinner(args.output.is_json());
    pb.set_message(ProgressMessages::resolving("album", &identifier.to_string()));

    let album = match traversal.fetch_song_details_for_album(&identifier).await {
        Ok(album) => album,
        Err(e) => {
            pb.finish_with_message(ProgressMessages::FAILED);
            return Err(e.into());
        }
    };
    pb.finish_with_message(ProgressMessages::COMPLETED);

    let report = Report::new("songs", &args.album.input, AlbumSongsReport::new(&album, args.output.full));
    report::emit(&args.output, &report, || report::print_album_songs(&album))
}

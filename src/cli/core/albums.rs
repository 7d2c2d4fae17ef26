use clap::Args;
use anyhow::Result;
use tracing::info;

use crate::cli::common::{IdentifierArgs, OutputArgs};
use crate::cli::report::{self, AlbumListReport, Report};
use crate::services::ServiceFactory;
use crate::utils::progress::{ProgressMessages, ProgressUtils};

#[derive(Args)]
pub struct AlbumsArgs {
    #[command(flatten)]
    circle: IdentifierArgs,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn execute(args: AlbumsArgs, services: &ServiceFactory) -> Result<()> {
    let identifier = args.circle.identifier();
    let mut traversal = services.create_traversal(Some(false))?;

    let pb = ProgressUtils::create_traversal_spinner(args.output.is_json());
    pb.set_message(ProgressMessages::resolving("circle", &identifier.to_string()));

    let albums = match traversal.fetch_albums_for_circle(&identifier).await {
        Ok(albums) => albums,
        Err(e) => {
            pb.finish_with_message(ProgressMessages::FAILED);
            return Err(e.into());
        }
    };
    pb.finish_with_message(ProgressMessages::COMPLETED);

    info!("Found {} album(s) for {}", albums.len(), identifier);

    let report = Report::new("albums", &args.circle.input, AlbumListReport::new(&albums));
    report::emit(&args.output, &report, || report::print_albums(&args.circle.input, &albums))
}

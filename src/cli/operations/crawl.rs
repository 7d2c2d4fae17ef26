use clap::Args;
use anyhow::Result;
use tracing::{debug, info};

use crate::cli::common::{IdentifierArgs, LyricsFlags, OutputArgs};
use crate::cli::report::{self, CrawlReport, Report};
use crate::services::ServiceFactory;
use crate::utils::progress::{ProgressMessages, ProgressUtils};

#[derive(Args)]
pub struct CrawlArgs {
    #[command(flatten)]
    circle: IdentifierArgs,

    #[command(flatten)]
    lyrics: LyricsFlags,

    #[command(flatten)]
    output: OutputArgs,

    /// Print resolution cache statistics after the crawl
    #[arg(long)]
    stats: bool,
}

pub async fn execute(args: CrawlArgs, services: &ServiceFactory) -> Result<()> {
    let identifier = args.circle.identifier();
    let mut traversal = services.create_traversal(args.lyrics.include_lyrics())?;

    let pb = ProgressUtils::create_traversal_spinner(args.output.is_json());
    pb.set_message(ProgressMessages::crawling(&identifier.to_string()));

    let crawl = match traversal.crawl_circle(&identifier).await {
        Ok(crawl) => crawl,
        Err(e) => {
            pb.finish_with_message(ProgressMessages::FAILED);
            return Err(e.into());
        }
    };
    pb.finish_with_message(ProgressMessages::COMPLETED);

    info!("Crawled {} album(s) of {}", crawl.albums.len(), crawl.circle.name);
    let stats = traversal.cache_stats();
    for stat in &stats {
        debug!("{} cache: {} entries, {} hits", stat.kind, stat.total_entries, stat.hits);
    }

    let report = Report::new("crawl", &args.circle.input, CrawlReport::new(&crawl, args.output.full));
    report::emit(&args.output, &report, || {
        report::print_crawl(&crawl);
        if args.stats {
            report::print_cache_stats(&stats);
        }
    })
}

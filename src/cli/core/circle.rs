use clap::Args;
use anyhow::Result;

use crate::cli::common::{IdentifierArgs, OutputArgs};
use crate::cli::report::{self, CircleReport, Report};
use crate::services::ServiceFactory;
use crate::utils::progress::{ProgressMessages, ProgressUtils};

#[derive(Args)]
pub struct CircleArgs {
    #[command(flatten)]
    target: IdentifierArgs,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn execute(args: CircleArgs, services: &ServiceFactory) -> Result<()> {
    let identifier = args.target.identifier();
    let mut traversal = services.create_traversal(Some(false))?;

    let pb = ProgressUtils::create_traversal_spinner(args.output.is_json());
    pb.set_message(ProgressMessages::resolving("circle", &identifier.to_string()));

    let circle = match traversal.lookup_circle(&identifier).await {
        Ok(circle) => circle,
        Err(e) => {
            pb.finish_with_message(ProgressMessages::FAILED);
            return Err(e.into());
        }
    };
    pb.finish_and_clear();

    let report = Report::new("circle", &args.target.input, CircleReport::new(&circle, args.output.full));
    report::emit(&args.output, &report, || report::print_circle(&circle))
}

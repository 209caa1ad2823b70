//! Batch configuration download/upload handlers.

use tlnet_api::{BatchConfig, Session, UploadSource};

use crate::cli::{BatchArgs, BatchCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(session: &Session, args: BatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let batch = BatchConfig::new(session);
    match args.command {
        BatchCommand::Download { scope, out } => {
            let scope = util::scope(scope);
            let path = batch.download_to_file(scope, out.as_deref()).await?;
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        BatchCommand::Upload { scope, file } => {
            let scope = util::scope(scope);
            let prompt = format!(
                "Upload {} and apply it to the {scope} configuration? The card restarts its services.",
                file.display()
            );
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }

            let receipt = batch.upload(scope, UploadSource::File(file)).await?;
            output::print_done(
                global,
                &format!(
                    "Uploaded {} bytes of {} configuration; card offline for about {}s",
                    receipt.bytes,
                    receipt.scope,
                    receipt.offline_for.as_secs()
                ),
            );
            Ok(())
        }
    }
}

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use sfbulk::{Action, BatchEvent, load_table};

use crate::Context;

#[derive(Args)]
pub struct MutateArgs {
    /// Object type, e.g. Contact
    object: String,

    /// CSV file; update and delete need Id as the first column
    csvfile: PathBuf,
}

impl MutateArgs {
    pub fn run(self, ctx: &Context, action: Action) -> Result<()> {
        let table = load_table(&self.csvfile)?;
        let session = ctx.settings.session()?;

        let pb = ProgressBar::new(table.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("=>-"),
        );

        let verbose = ctx.verbose;
        let result = session.close_after(|session| {
            session.mutate(&self.object, &table, action.as_str(), |event| match event {
                BatchEvent::Row { number, row } => {
                    if verbose {
                        pb.suspend(|| println!("{number}: {}", row.join(",")));
                    }
                    pb.inc(1);
                }
                BatchEvent::Progress {
                    successes,
                    failures,
                    ..
                } => pb.set_message(format!("{successes} ok, {failures} failed")),
            })
        });
        pb.finish_and_clear();

        for line in result?.summary_lines() {
            println!("{line}");
        }
        Ok(())
    }
}

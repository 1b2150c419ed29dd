use std::io;

use anyhow::Result;
use clap::Args;
use sfbulk::{QueryFormat, core::QueryScope};

use sfctl::output::QueryPrinter;

use crate::Context;

#[derive(Args)]
pub struct QueryArgs {
    /// Query string, e.g. "select Id, Name from Account"
    querystr: String,

    /// Output format: tabular | dict
    #[arg(short, long, default_value = "tabular", value_parser = parse_format)]
    format: QueryFormat,

    /// Include logically deleted records
    #[arg(long)]
    include_deleted: bool,

    /// Keep fetching pages until the result set is exhausted
    #[arg(long)]
    fetch_all: bool,
}

impl QueryArgs {
    pub fn run(self, ctx: &Context) -> Result<()> {
        let scope = if self.include_deleted {
            QueryScope::IncludeDeleted
        } else {
            QueryScope::Live
        };
        let mut printer = QueryPrinter::new(io::stdout().lock());
        ctx.settings.session()?.close_after(|session| -> Result<()> {
            printer.push(session.query(&self.querystr, self.format, scope)?)?;
            while self.fetch_all && session.has_more() {
                printer.push(session.query_more(self.format)?)?;
            }
            if !self.fetch_all && session.has_more() {
                tracing::info!("more results available, rerun with --fetch-all");
            }
            Ok(())
        })?;
        printer.finish()?;
        Ok(())
    }
}

fn parse_format(raw: &str) -> Result<QueryFormat, String> {
    raw.parse().map_err(|e: sfbulk::SfBulkError| e.to_string())
}

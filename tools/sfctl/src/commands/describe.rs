use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::Context;

#[derive(Args)]
pub struct DescArgs {
    /// Object type, e.g. Contact
    object: String,
}

impl DescArgs {
    pub fn run(self, ctx: &Context) -> Result<()> {
        let lines = ctx
            .settings
            .session()?
            .close_after(|session| session.desc(&self.object))?;
        for line in lines {
            println!("{line}");
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct FieldsArgs {
    /// Object type, e.g. Contact
    object: String,
}

impl FieldsArgs {
    pub fn run(self, ctx: &Context) -> Result<()> {
        let fields = ctx
            .settings
            .session()?
            .close_after(|session| session.fields(&self.object))?;
        println!("{}", serde_json::to_string_pretty(&fields)?);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ShowTarget {
    Objects,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(value_enum)]
    what: ShowTarget,
}

impl ShowArgs {
    pub fn run(self, ctx: &Context) -> Result<()> {
        let lines = ctx.settings.session()?.close_after(|session| match self.what {
            ShowTarget::Objects => session.show_objects(),
        })?;
        for line in lines {
            println!("{line}");
        }
        Ok(())
    }
}

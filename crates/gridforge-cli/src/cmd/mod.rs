use anyhow::{anyhow, Result};

use gridforge_store::{DocumentKind, Store, StoreConfig};

use crate::args::{Cli, Command};

mod doctor;
mod export;
mod generate;
mod import;
mod list;

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::List { kind } => list::run(&cli.store_root, kind.as_deref()),
        Command::Export { kind, name, out } => {
            export::run(&cli.store_root, &kind, &name, out.as_deref())
        }
        Command::Import { kind, name, file } => {
            import::run(&cli.store_root, &kind, &name, &file)
        }
        Command::Generate { target, name } => {
            generate::run(&cli.store_root, &target, name.as_deref())
        }
        Command::Doctor => doctor::run(&cli.store_root),
    }
}

pub(crate) fn open_store(store_root: &str) -> Result<Store> {
    Ok(Store::open(StoreConfig::at(store_root))?)
}

pub(crate) fn parse_kind(kind: &str) -> Result<DocumentKind> {
    DocumentKind::parse(kind).ok_or_else(|| anyhow!("unknown document kind: {kind}"))
}

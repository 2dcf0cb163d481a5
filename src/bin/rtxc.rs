//! rtxc codeplug tool
//!
//! Create, inspect and verify codeplug files from the command line

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rtxc::{
    Codeplug, CodeplugBuilder, CodeplugFile, CodeplugSnapshot, ErrorKind, Store, NO_CONTACT,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "rtxc")]
#[command(author, version, about = "Editable codeplug inspector", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty codeplug
    Create {
        /// Codeplug file to create (overwritten if it exists)
        path: PathBuf,

        /// Author stored in the header (max 32 bytes)
        #[arg(short, long)]
        author: Option<String>,

        /// Description stored in the header (max 32 bytes)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Print header and table summary
    Info {
        path: PathBuf,
    },

    /// Print the whole codeplug as JSON
    Dump {
        path: PathBuf,
    },

    /// Verify that counts, offsets and references are consistent
    Check {
        path: PathBuf,
    },

    /// Rebuild a codeplug from a JSON dump
    Import {
        /// JSON produced by `dump`
        json: PathBuf,

        /// Codeplug file to write
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            path,
            author,
            description,
        } => {
            let path_str = path.to_str().context("path is not valid UTF-8")?;
            let mut builder = CodeplugBuilder::new().path(path_str);
            if let Some(author) = author {
                builder = builder.author(author);
            }
            if let Some(description) = description {
                builder = builder.description(description);
            }
            builder
                .create()
                .with_context(|| format!("creating {}", path.display()))?
                .close()?;
            info!("Created {}", path.display());
        }

        Commands::Info { path } => {
            let mut cp = open(&path)?;
            let header = cp.header()?;
            let created = chrono::DateTime::from_timestamp(header.timestamp as i64, 0)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| header.timestamp.to_string());

            println!("File:        {}", path.display());
            println!("Version:     {}.{}", header.version_major, header.version_minor);
            println!("Author:      {}", header.author);
            println!("Description: {}", header.description);
            println!("Created:     {}", created);
            println!("Contacts:    {}", header.contact_count);
            println!("Channels:    {}", header.channel_count);
            println!("Banks:       {}", header.bank_count);

            for pos in 0..header.channel_count {
                let channel = cp.read_channel(pos)?;
                let contact = contact_label(&mut cp, channel.info.contact_index())?;
                println!(
                    "  ch {:>4}  {:<32} {:?} {:>10} Hz  contact {}",
                    pos,
                    channel.name,
                    channel.mode(),
                    channel.rx_frequency,
                    contact
                );
            }
            for pos in 0..header.bank_count {
                let bank = cp.read_bank_header(pos)?;
                println!("  bank {:>2}  {:<32} {:?}", pos, bank.name, cp.bank_members(pos)?);
            }
        }

        Commands::Dump { path } => {
            let snapshot = open(&path)?.snapshot()?;
            println!("{}", snapshot.to_json()?);
        }

        Commands::Check { path } => {
            let mut cp = open(&path)?;
            if let Err(e) = cp.check_integrity() {
                bail!("{}: {}", path.display(), e);
            }
            println!("{}: OK", path.display());
        }

        Commands::Import { json, path } => {
            let text = std::fs::read_to_string(&json)
                .with_context(|| format!("reading {}", json.display()))?;
            let snapshot = CodeplugSnapshot::from_json(&text)?;
            let file = CodeplugFile::create(&path)?;
            Codeplug::import_snapshot(file, &snapshot)?.close()?;
            info!(
                "Imported {} contacts, {} channels and {} banks into {}",
                snapshot.contacts.len(),
                snapshot.channels.len(),
                snapshot.banks.len(),
                path.display()
            );
        }
    }

    Ok(())
}

fn open(path: &Path) -> Result<Codeplug> {
    Codeplug::open(path).with_context(|| format!("opening {}", path.display()))
}

/// Name of the contact a channel points at, `-` when it has none
///
/// A dangling index prints as `?<index>` so the listing still completes;
/// `check` reports it as corruption.
fn contact_label<S: Store>(cp: &mut Codeplug<S>, index: Option<u16>) -> rtxc::Result<String> {
    match index {
        Some(NO_CONTACT) | None => Ok("-".to_string()),
        Some(index) => match cp.read_contact(index) {
            Ok(contact) => Ok(contact.name),
            Err(e) if e.kind() == ErrorKind::Range => Ok(format!("?{}", index)),
            Err(e) => Err(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtxc::core::header::HEADER_SIZE;
    use rtxc::core::record::CONTACT_SIZE;
    use rtxc::{CallType, Channel, Contact, MemoryStore};

    #[test]
    fn test_contact_label() {
        let mut cp = CodeplugBuilder::new().create_in(MemoryStore::new()).unwrap();
        cp.insert_contact(&Contact::dmr("TG 222", 222, CallType::Group), 0).unwrap();
        cp.insert_channel(&Channel::dmr("Repeater", 1, 1, 0), 0).unwrap();

        assert_eq!(contact_label(&mut cp, Some(0)).unwrap(), "TG 222");
        assert_eq!(contact_label(&mut cp, Some(NO_CONTACT)).unwrap(), "-");
        assert_eq!(contact_label(&mut cp, None).unwrap(), "-");
        assert_eq!(contact_label(&mut cp, Some(7)).unwrap(), "?7");
    }

    #[test]
    fn test_contact_label_on_dangling_channel() {
        let mut cp = CodeplugBuilder::new().create_in(MemoryStore::new()).unwrap();
        cp.insert_contact(&Contact::dmr("TG 222", 222, CallType::Group), 0).unwrap();
        cp.insert_channel(&Channel::dmr("Repeater", 1, 1, 0), 0).unwrap();

        // Point the channel past the contact table, as a damaged file would
        let mut bytes = cp.into_store().into_bytes();
        bytes[HEADER_SIZE + CONTACT_SIZE + 91] = 9;
        let mut cp = Codeplug::load(MemoryStore::from_bytes(bytes)).unwrap();

        let index = cp.read_channel(0).unwrap().info.contact_index();
        assert_eq!(contact_label(&mut cp, index).unwrap(), "?9");
        assert!(cp.check_integrity().is_err());
    }
}

// Copyright 2025 Cowboy AI, LLC.

//! cordo-intake: drive an order draft from the command line
//!
//! Each invocation opens the saved draft, applies one action and saves it
//! again, so a sequence of invocations walks the wizard. Photos are
//! attached by reference; nothing here talks to the network.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cordo_intake::projections::project;
use cordo_intake::{
    format_price, telemetry, Catalog, Category, ClientInfo, FileSnapshotStore, IntakeConfig,
    IntakeResult, OrderPayload, PairId, PhotoRef, WizardCommand, WizardSession, WizardStep,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cordo-intake", version, about = "Shoe-care order intake wizard")]
struct Cli {
    /// Configuration file layered over `cordo.toml`
    #[arg(long = "config-file", env = "CORDO_CONFIG_FILE", value_name = "PATH")]
    config_file: Option<PathBuf>,

    /// Service catalog JSON (`{"HOMME": [...], "FEMME": [...]}`)
    #[arg(long, env = "CORDO_CATALOG", default_value = "catalog.json", value_name = "PATH")]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the current view as JSON
    Show,
    /// Append an empty pair
    AddPair,
    /// Remove the pair at a position
    RemovePair {
        /// 1-based pair position
        pair: usize,
    },
    /// Choose a pair's category (HOMME or FEMME)
    Category {
        /// 1-based pair position
        pair: usize,
        /// Category code
        category: Category,
    },
    /// Check or uncheck a service
    Toggle {
        /// 1-based pair position
        pair: usize,
        /// Catalog service id
        service: i64,
    },
    /// Attach an already uploaded photo
    Photo {
        /// 1-based pair position
        pair: usize,
        /// Public URL of the photo
        #[arg(long)]
        url: String,
        /// Stored file name
        #[arg(long)]
        filename: String,
    },
    /// Set a pair's note
    Note {
        /// 1-based pair position
        pair: usize,
        /// Note text
        text: String,
    },
    /// Validate a pair
    Validate {
        /// 1-based pair position
        pair: usize,
    },
    /// Reopen a validated pair
    Edit {
        /// 1-based pair position
        pair: usize,
    },
    /// Move to step 1, 2 or 3
    Step {
        /// Step number
        step: u8,
    },
    /// Set the client contact fields
    Client {
        /// Full name
        #[arg(long)]
        name: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Phone number
        #[arg(long)]
        phone: String,
        /// Company
        #[arg(long)]
        company: Option<String>,
    },
    /// Print the priced recap
    Recap,
    /// Print the order payload that would be submitted
    Payload,
    /// Print the JSON schema of the order payload
    Schema,
    /// Discard the draft
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = IntakeConfig::load(cli.config_file.as_deref()).context("loading configuration")?;
    telemetry::init(&config.logging).context("installing log subscriber")?;

    if let Commands::Schema = cli.command {
        let schema = schemars::schema_for!(OrderPayload);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let catalog = Catalog::from_json_file(&cli.catalog)
        .with_context(|| format!("reading catalog {}", cli.catalog.display()))?;
    let store = FileSnapshotStore::new(config.persistence.dir.clone());
    let mut session = WizardSession::from_config(catalog, store, &config);

    let command = match cli.command {
        Commands::Show | Commands::Schema => None,
        Commands::AddPair => Some(WizardCommand::AddPair),
        Commands::RemovePair { pair } => Some(WizardCommand::RemovePair {
            pair_id: pair_at(&session, pair)?,
        }),
        Commands::Category { pair, category } => Some(WizardCommand::SetCategory {
            pair_id: pair_at(&session, pair)?,
            category,
        }),
        Commands::Toggle { pair, service } => Some(WizardCommand::ToggleService {
            pair_id: pair_at(&session, pair)?,
            service_id: service,
        }),
        Commands::Photo {
            pair,
            url,
            filename,
        } => Some(WizardCommand::SetPhoto {
            pair_id: pair_at(&session, pair)?,
            photo: PhotoRef { url, filename },
        }),
        Commands::Note { pair, text } => Some(WizardCommand::SetNote {
            pair_id: pair_at(&session, pair)?,
            text,
        }),
        Commands::Validate { pair } => Some(WizardCommand::ValidatePair {
            pair_id: pair_at(&session, pair)?,
        }),
        Commands::Edit { pair } => Some(WizardCommand::EditPair {
            pair_id: pair_at(&session, pair)?,
        }),
        Commands::Step { step } => {
            let step = WizardStep::try_from(step).map_err(anyhow::Error::msg)?;
            Some(WizardCommand::Advance { step })
        }
        Commands::Client {
            name,
            email,
            phone,
            company,
        } => Some(WizardCommand::SetClientInfo {
            info: ClientInfo {
                name,
                email,
                phone,
                company,
            },
        }),
        Commands::Recap => {
            print_recap(&session);
            return Ok(());
        }
        Commands::Payload => {
            // submit on a copy so the saved draft is untouched
            let payload = intake(session.draft().clone().submit())?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
            return Ok(());
        }
        Commands::Reset => {
            session.reset();
            println!("draft discarded");
            return Ok(());
        }
    };

    if let Some(command) = command {
        let outcome = intake(session.execute(command))?;
        println!("{}", serde_json::to_string(&outcome)?);
    }
    println!("{}", serde_json::to_string_pretty(&session.view())?);
    Ok(())
}

fn pair_at(session: &WizardSession<FileSnapshotStore>, position: usize) -> Result<PairId> {
    let pairs = session.draft().pairs();
    match position.checked_sub(1).and_then(|i| pairs.get(i)) {
        Some(pair) => Ok(pair.id()),
        None => bail!("no pair {position}; the draft has {} pair(s)", pairs.len()),
    }
}

fn intake<T>(result: IntakeResult<T>) -> Result<T> {
    result.map_err(|err| {
        let message = err.user_message();
        anyhow::Error::new(err).context(message)
    })
}

fn print_recap(session: &WizardSession<FileSnapshotStore>) {
    let recap = project(session.draft().pairs(), session.catalog());
    for (index, pair) in recap.per_pair.iter().enumerate() {
        let category = pair.category.map_or("?", |c| c.label());
        println!("Paire {} ({category})", index + 1);
        for item in &pair.line_items {
            println!("  {:<32} {}", item.name, format_price(item.price));
        }
        if let Some(note) = &pair.note {
            println!("  Note: {note}");
        }
        println!("  Sous-total: {}", format_price(pair.subtotal));
    }
    println!("Total: {}", format_price(recap.total));
}

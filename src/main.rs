//! mtgcards - inspect mana costs, cards and deck lists

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use mtg_cards::core::{CardType, Color, ColorSet, ManaCost, Rarity, Supertype};
use mtg_cards::loader::{CardDatabase, CardFilter, DeckLoader, LoadOptions};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mtgcards")]
#[command(about = "MTG card model - mana costs, cards and printings", long_about = None)]
struct Cli {
    /// Increase log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Where to load set files from
#[derive(clap::Args)]
struct DbArgs {
    /// Directory of JSON set files
    #[arg(long, value_name = "DIR")]
    db: PathBuf,

    /// Fail on the first bad set file or record instead of skipping it
    #[arg(long)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a mana cost and print its properties
    Cost {
        /// Cost in brace notation, e.g. "{2}{W}{U/P}"
        cost: String,

        /// Colors available for payment, e.g. "WU"
        #[arg(long, value_name = "COLORS")]
        palette: Option<ColorSet>,
    },

    /// List cards, optionally filtered
    List {
        #[command(flatten)]
        db: DbArgs,

        /// Card type, e.g. "Creature"
        #[arg(long = "type", value_name = "TYPE")]
        card_type: Option<CardType>,

        /// Supertype, e.g. "Legendary"
        #[arg(long)]
        supertype: Option<Supertype>,

        /// Cards sharing a color with these, e.g. "WU"; "" for colorless
        #[arg(long, value_name = "COLORS")]
        colors: Option<ColorSet>,

        /// Rarity code of some printing: L, C, U, R, M or S
        #[arg(long, value_name = "CODE")]
        rarity: Option<Rarity>,
    },

    /// Show a card's text and printings
    Show {
        #[command(flatten)]
        db: DbArgs,

        /// Card name or face name
        name: String,
    },

    /// Print a card as JSON
    Json {
        #[command(flatten)]
        db: DbArgs,

        /// Card name or face name
        name: String,
    },

    /// Resolve a deck list against the database
    Deck {
        #[command(flatten)]
        db: DbArgs,

        /// Deck file (.dck)
        #[arg(value_name = "DECK")]
        deck: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Cost { cost, palette } => run_cost(&cost, palette),
        Commands::List {
            db,
            card_type,
            supertype,
            colors,
            rarity,
        } => {
            let filter = CardFilter {
                card_type,
                supertype,
                colors,
                rarity,
            };
            run_list(&load_db(&db)?, &filter)
        }
        Commands::Show { db, name } => run_show(&load_db(&db)?, &name),
        Commands::Json { db, name } => run_json(&load_db(&db)?, &name),
        Commands::Deck { db, deck } => run_deck(&load_db(&db)?, &deck),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_db(args: &DbArgs) -> anyhow::Result<CardDatabase> {
    let options = LoadOptions {
        strict: args.strict,
        ..LoadOptions::default()
    };
    CardDatabase::load_dir(&args.db, &options)
        .with_context(|| format!("loading set files from {}", args.db.display()))
}

fn run_cost(text: &str, palette: Option<ColorSet>) -> anyhow::Result<()> {
    let cost = ManaCost::parse(text).with_context(|| format!("parsing cost {text:?}"))?;

    if cost.is_empty() {
        println!("Cost:      (none)");
    } else {
        println!("Cost:      {cost}");
    }
    println!("Converted: {}", cost.converted());
    println!("Colors:    {}", describe_colors(cost.colors()));
    for color in Color::ALL {
        let count = cost.count_color(color);
        if count > 0 {
            println!("  {color}: {count}");
        }
    }
    if let Some(palette) = palette {
        println!(
            "Payable with {}: {}",
            describe_colors(palette),
            if cost.payable_with(palette) { "yes" } else { "no" }
        );
    }
    Ok(())
}

fn describe_colors(colors: ColorSet) -> String {
    if colors.is_empty() {
        "colorless".to_string()
    } else {
        colors.to_string()
    }
}

fn run_list(db: &CardDatabase, filter: &CardFilter) -> anyhow::Result<()> {
    let mut shown = 0;
    for card in db.filter(filter) {
        let cost = card.front().mana_cost();
        println!(
            "{:<32} {:<16} {}",
            card.name(),
            cost.to_string(),
            describe_colors(card.colors())
        );
        shown += 1;
    }
    println!("{shown} of {} cards", db.len());
    Ok(())
}

fn run_show(db: &CardDatabase, name: &str) -> anyhow::Result<()> {
    let Some(card) = db.get_card(name) else {
        bail!("card not found: {name}");
    };
    println!("{card}");

    let printings = db.printings_of(name);
    if !printings.is_empty() {
        println!();
        println!("Printings:");
        for printing in printings {
            println!("  {} - {}", printing, printing.rarity());
        }
    }
    Ok(())
}

fn run_json(db: &CardDatabase, name: &str) -> anyhow::Result<()> {
    let Some(card) = db.get_card(name) else {
        bail!("card not found: {name}");
    };
    println!("{}", serde_json::to_string_pretty(&**card)?);
    Ok(())
}

fn run_deck(db: &CardDatabase, path: &Path) -> anyhow::Result<()> {
    let deck = DeckLoader::load_from_file(path)
        .with_context(|| format!("loading deck {}", path.display()))?;
    let resolved = deck.resolve(db)?;

    println!("Main deck ({} cards):", deck.total_cards());
    for (card, count) in &resolved.main_deck {
        let cost = card.front().mana_cost();
        if cost.is_empty() {
            println!("  {count:>2} {}", card.name());
        } else {
            println!("  {count:>2} {} {cost}", card.name());
        }
    }
    if !resolved.sideboard.is_empty() {
        println!("Sideboard ({} cards):", deck.sideboard_size());
        for (card, count) in &resolved.sideboard {
            println!("  {count:>2} {}", card.name());
        }
    }
    println!();
    println!("Colors: {}", describe_colors(resolved.colors()));
    for color in Color::ALL {
        let symbols = resolved.count_color(color);
        if symbols > 0 {
            println!("  {color}: {symbols} symbols");
        }
    }
    println!("Average converted cost: {:.2}", resolved.average_converted());
    Ok(())
}

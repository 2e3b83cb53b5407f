//! Shigure - Entry Point
//!
//! Thin command-line front end over the calculation engine: loads the data
//! tables and profile store, applies the requested edits and imports, and
//! prints the projected bond level.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use shigure::data::{export_default_data, DataSet, GiftDef, GOLD_BASE_EXP, PURPLE_BASE_EXP};
use shigure::import::{parse_inventory, parse_profile_bundle};
use shigure::profile::{default_store_path, PreferenceTier, ProfileStore};
use shigure::Session;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding levels.ron / gifts.ron overrides
    #[arg(long, default_value = "assets/data")]
    data_dir: PathBuf,

    /// Profile store file (defaults to the per-user data directory)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Create a new profile with this name and make it active
    #[arg(long, value_name = "NAME")]
    create: Option<String>,

    /// Delete the named profile
    #[arg(long, value_name = "NAME")]
    delete: Option<String>,

    /// Activate the named profile
    #[arg(short, long, value_name = "NAME")]
    profile: Option<String>,

    /// Import gift quantities from an inventory export file
    #[arg(short, long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Merge profiles from a shared profile file
    #[arg(long, value_name = "FILE")]
    merge: Option<PathBuf>,

    /// Set a gift quantity, e.g. --set 100001=5 (repeatable)
    #[arg(long, value_name = "ID=QTY", value_parser = parse_quantity_arg)]
    set: Vec<(u32, u32)>,

    /// Promote a gift into a preference tier, e.g. --assign tier60=100001
    #[arg(long, value_name = "TIER=ID", value_parser = parse_tier_arg)]
    assign: Vec<(PreferenceTier, u32)>,

    /// Remove a gift from a preference tier, e.g. --unassign tier60=100001
    #[arg(long, value_name = "TIER=ID", value_parser = parse_tier_arg)]
    unassign: Vec<(PreferenceTier, u32)>,

    /// List the gift catalog (with quantities and tiers of the active profile)
    #[arg(long)]
    gifts: bool,

    /// Set the starting bond level (resets in-level experience)
    #[arg(long, value_name = "LEVEL")]
    level: Option<u32>,

    /// Set the experience accrued within the starting level
    #[arg(long, value_name = "EXP")]
    exp: Option<u64>,

    /// Turn linked mode on or off
    #[arg(long, value_name = "BOOL")]
    linked: Option<bool>,

    /// List profiles and exit
    #[arg(long)]
    list: bool,

    /// Write the built-in data tables to the data directory and exit
    #[arg(long)]
    export_data: bool,
}

fn parse_quantity_arg(raw: &str) -> Result<(u32, u32), String> {
    let (id, quantity) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=QTY, got '{}'", raw))?;
    let id = id.trim().parse().map_err(|_| format!("bad gift id '{}'", id))?;
    let quantity = quantity
        .trim()
        .parse()
        .map_err(|_| format!("bad quantity '{}'", quantity))?;
    Ok((id, quantity))
}

fn parse_tier_arg(raw: &str) -> Result<(PreferenceTier, u32), String> {
    let (tier, id) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TIER=ID, got '{}'", raw))?;
    let tier = match tier.trim().to_ascii_lowercase().as_str() {
        "tier40" | "40" => PreferenceTier::Tier40,
        "tier60" | "60" => PreferenceTier::Tier60,
        "tier180" | "180" => PreferenceTier::Tier180,
        "tier240" | "240" => PreferenceTier::Tier240,
        other => return Err(format!("unknown tier '{}'", other)),
    };
    let id = id.trim().parse().map_err(|_| format!("bad gift id '{}'", id))?;
    Ok((tier, id))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    if args.export_data {
        export_default_data(&args.data_dir)?;
        println!("Wrote built-in tables to {}", args.data_dir.display());
        return Ok(());
    }

    // Without both tables there is nothing to calculate
    let data = DataSet::load(&args.data_dir).context("failed to load data tables")?;

    let store_path = args.store.clone().unwrap_or_else(default_store_path);
    let store = ProfileStore::load(&store_path);
    let mut session = Session::new(data, store, store_path);
    let mut modified = false;

    if let Some(name) = &args.delete {
        if session.delete_profile(name) {
            println!("Deleted profile '{}'", name);
            modified = true;
        } else {
            bail!("no profile named '{}'", name);
        }
    }

    if let Some(name) = &args.create {
        session.create_profile(name)?;
        println!("Created profile '{}'", name);
        modified = true;
    }

    if let Some(name) = &args.profile {
        if !session.activate(name) {
            bail!("no profile named '{}'", name);
        }
    }

    if args.list {
        if session.store().is_empty() {
            println!("No profiles");
        } else {
            for name in session.store().names() {
                let marker = if session.store().active_name() == Some(name) {
                    "*"
                } else {
                    " "
                };
                println!("{} {}", marker, name);
            }
        }
        return Ok(());
    }

    if let Some(path) = &args.merge {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let bundle = parse_profile_bundle(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let merged = session.merge_profiles(bundle);
        println!("Merged {} profiles", merged);
        if merged > 0 {
            modified = true;
        }
    }

    if let Some(path) = &args.import {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let pairs = parse_inventory(&text);
        if pairs.is_empty() {
            bail!("no gift entries found in {}", path.display());
        }
        let imported = session.import_quantities(&pairs);
        println!("Imported quantities for {} gifts", imported);
        if imported > 0 {
            modified = true;
        }
    }

    for &(gift_id, quantity) in &args.set {
        if !session.set_quantity(gift_id, quantity) {
            bail!("no active profile; create one with --create first");
        }
        modified = true;
    }

    for &(tier, gift_id) in &args.assign {
        match session.data().gifts.base_exp(gift_id) {
            Some(base) if base == tier.base_exp() => {
                if !session.assign_tier(tier, gift_id) {
                    bail!("no active profile; create one with --create first");
                }
                modified = true;
            }
            Some(base) => bail!(
                "gift {} has base exp {} and cannot be promoted into that tier",
                gift_id,
                base
            ),
            None => bail!("unknown gift id {}", gift_id),
        }
    }

    for &(tier, gift_id) in &args.unassign {
        if !session.unassign_tier(tier, gift_id) {
            bail!("no active profile; create one with --create first");
        }
        modified = true;
    }

    if let Some(level) = args.level {
        if !session.set_start_level(level) {
            bail!("no active profile; create one with --create first");
        }
        modified = true;
    }

    if let Some(exp) = args.exp {
        if !session.set_start_exp(exp) {
            bail!("no active profile; create one with --create first");
        }
        modified = true;
    }

    if let Some(linked) = args.linked {
        session.set_linked(linked);
        modified = true;
    }

    if args.gifts {
        print_gifts(&session);
    }

    print_projection(&mut session);

    if modified {
        session.save()?;
    }

    Ok(())
}

fn print_gifts(session: &Session) {
    let catalog = &session.data().gifts;
    let profile = session.active_profile();
    let ctx = session.favor_context();

    let print_row = |gift: &GiftDef| {
        let actual = ctx.actual_exp(gift.id, gift.base_exp);
        let quantity = profile.map(|p| p.quantity(gift.id)).unwrap_or(0);
        let promoted = if actual != gift.base_exp {
            format!(" (base {})", gift.base_exp)
        } else {
            String::new()
        };
        println!(
            "  {:>7}  {:<24} {:>4} exp{}  x{}",
            gift.id, gift.name, actual, promoted, quantity
        );
    };

    println!("Gold gifts:");
    for gift in catalog.by_base_exp(GOLD_BASE_EXP) {
        print_row(gift);
    }
    println!("Purple gifts:");
    for gift in catalog.by_base_exp(PURPLE_BASE_EXP) {
        print_row(gift);
    }

    let others = catalog
        .iter()
        .filter(|g| g.base_exp != GOLD_BASE_EXP && g.base_exp != PURPLE_BASE_EXP);
    let mut header_printed = false;
    for gift in others {
        if !header_printed {
            println!("Other gifts:");
            header_printed = true;
        }
        print_row(gift);
    }
}

fn print_projection(session: &mut Session) {
    let projection = session.projection();

    if let Some(name) = session.store().active_name() {
        let linked = session
            .active_profile()
            .map(|p| p.is_linked)
            .unwrap_or(false);
        println!(
            "Profile: {}{}",
            name,
            if linked { " (linked)" } else { "" }
        );
    } else {
        println!("No active profile");
    }

    println!(
        "Current: level {}, exp {}",
        projection.start_level, projection.start_exp
    );
    println!("Experience from gifts: {}", projection.exp_gained);
    println!("Projected level: {}", projection.reached_level);
    match projection.exp_to_next {
        Some(needed) => println!(
            "Needed for level {}: {}",
            projection.reached_level + 1,
            needed
        ),
        None => println!("No further level data"),
    }
}

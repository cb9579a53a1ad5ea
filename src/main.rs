use clap::{Parser, Subcommand};
use std::path::PathBuf;

use rfp_bro::model::{slugify, Category, Criterion, Priority};
use rfp_bro::output::RankedVendor;
use rfp_bro::scoring::{classify_award, evaluate};

const EXIT_SUCCESS: i32 = 0;
const EXIT_USAGE: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank vendors by total score (default if no subcommand)
    Board {
        /// Output tab-separated values for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Show one vendor's category-by-category breakdown
    Show {
        /// Vendor id (or name, which is slugified)
        vendor: String,
    },
    /// Record a raw score for a vendor on one criterion
    Score {
        vendor: String,
        criterion: String,
        /// Raw score in 0..=max_score of the criterion
        value: f64,
    },
    /// Return a criterion to "not yet evaluated" (an absent score is not a zero)
    Unscore {
        vendor: String,
        criterion: String,
    },
    /// Manage the vendor roster
    #[command(subcommand)]
    Vendor(VendorCommands),
    /// Manage template categories
    #[command(subcommand)]
    Category(CategoryCommands),
    /// Manage template criteria
    #[command(subcommand)]
    Criterion(CriterionCommands),
    /// Create a config file interactively
    Init,
}

#[derive(Subcommand, Debug)]
enum VendorCommands {
    /// Register a vendor; its id is derived from the name
    Add { name: String },
    /// Remove a vendor and all of its scores
    Remove { id: String },
    /// List registered vendors
    List,
}

#[derive(Subcommand, Debug)]
enum CategoryCommands {
    /// Add a category to the evaluation template
    Add {
        name: String,
        /// Fraction of the total score (0..=1)
        #[arg(long)]
        weight: f64,
        /// Explicit id (defaults to the slugified name)
        #[arg(long)]
        id: Option<String>,
    },
    /// Remove a category and all of its criteria from the template
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
enum CriterionCommands {
    /// Add a criterion to a category
    Add {
        /// Category id to add the criterion to
        category: String,
        name: String,
        /// Fraction of the category score (0..=1)
        #[arg(long)]
        weight: f64,
        /// Scale raw scores are entered on (0..=max)
        #[arg(long, default_value_t = 5.0)]
        max_score: f64,
        #[arg(long, value_enum, default_value = "medium")]
        priority: Priority,
        /// Explicit id (defaults to the slugified name)
        #[arg(long)]
        id: Option<String>,
    },
    /// Remove a criterion from whichever category holds it
    Remove { id: String },
}

#[derive(Parser, Debug)]
#[command(name = "rfp-bro")]
#[command(about = "Vendor evaluation and award-ranking CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/rfp-bro/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Board { tsv: false });
    let config_path_override = cli.config.clone().map(PathBuf::from);

    // Init runs before config loading; there may be nothing to load yet
    if let Commands::Init = command {
        if let Err(e) = rfp_bro::config::run_init_wizard(config_path_override) {
            eprintln!("Init failed: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config_path = config_path_override
        .clone()
        .unwrap_or_else(rfp_bro::config::get_config_path);
    let mut config = match rfp_bro::config::load_config(config_path_override) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate template and scoring options at startup
    let mut validation_errors = Vec::new();
    if let Err(errors) = rfp_bro::scoring::validate_template(&config.template) {
        validation_errors.extend(errors);
    }
    let effective_scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = rfp_bro::scoring::validate_scoring(&effective_scoring) {
        validation_errors.extend(errors);
    }
    if !validation_errors.is_empty() {
        eprintln!("Config errors:");
        for error in validation_errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    let threshold = effective_scoring.threshold();

    if cli.verbose {
        eprintln!(
            "Loaded template '{}': {} categories, {} criteria, threshold {}",
            config.template.name,
            config.template.categories.len(),
            config.template.criteria_count(),
            threshold
        );
    }

    // Scoring commands need a non-empty template
    let needs_template = matches!(
        command,
        Commands::Board { .. } | Commands::Show { .. } | Commands::Score { .. }
    );
    if needs_template && config.template.criteria_count() == 0 {
        eprintln!("The evaluation template has no criteria yet.");
        eprintln!("Add some to {}:", config_path.display());
        eprintln!("  rfp-bro category add \"Technical capability\" --weight 0.4");
        eprintln!("  rfp-bro criterion add technical-capability \"Architecture fit\" --weight 0.5");
        std::process::exit(EXIT_CONFIG);
    }

    let store_path = rfp_bro::store::get_store_path();
    let mut book = match rfp_bro::store::load_book(&store_path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Vendor book error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let use_colors = rfp_bro::output::should_use_colors();

    match command {
        Commands::Init => unreachable!("handled above"),

        Commands::Board { tsv } => {
            let ranked = rfp_bro::output::rank_vendors(&book.vendors, &config.template, threshold);

            if tsv {
                let output = rfp_bro::output::format_tsv(&ranked);
                if !output.is_empty() {
                    println!("{}", output);
                }
            } else {
                println!("{}", rfp_bro::output::format_board(&ranked, use_colors));
            }

            if cli.verbose {
                let qualified = ranked
                    .iter()
                    .filter(|r| r.decision.map(|d| d.is_qualified()).unwrap_or(false))
                    .count();
                eprintln!();
                eprintln!(
                    "Total: {} vendors, {} qualified at threshold {}",
                    ranked.len(),
                    qualified,
                    threshold
                );
            }
        }

        Commands::Show { vendor } => {
            let vendor_id = resolve_vendor_id(&book, &vendor);
            let vendor = match book.vendor(&vendor_id) {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_USAGE);
                }
            };
            let result = evaluate(&config.template, &vendor.id, &vendor.scores);
            let decision = result.total.map(|t| classify_award(t, threshold));
            let ranked = RankedVendor {
                vendor,
                result,
                decision,
            };
            println!(
                "{}",
                rfp_bro::output::format_vendor_detail(&ranked, &config.template, threshold, use_colors)
            );
        }

        Commands::Score {
            vendor,
            criterion,
            value,
        } => {
            let vendor_id = resolve_vendor_id(&book, &vendor);
            if let Err(e) = book.record_score(&config.template, &vendor_id, &criterion, value) {
                eprintln!("{}", e);
                std::process::exit(EXIT_USAGE);
            }
            save_book_or_exit(&store_path, &book);

            match book.vendor(&vendor_id) {
                Ok(vendor) => {
                    let result = evaluate(&config.template, &vendor.id, &vendor.scores);
                    println!(
                        "Recorded {} = {} for {}. Total: {}",
                        criterion,
                        value,
                        vendor.name,
                        rfp_bro::output::format_percent(result.total)
                    );
                }
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_USAGE);
                }
            }
        }

        Commands::Unscore { vendor, criterion } => {
            let vendor_id = resolve_vendor_id(&book, &vendor);
            match book.clear_score(&vendor_id, &criterion) {
                Ok(true) => {
                    save_book_or_exit(&store_path, &book);
                    println!("Cleared {} for {}.", criterion, vendor_id);
                }
                Ok(false) => {
                    println!("{} had no score for {}.", vendor_id, criterion);
                }
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_USAGE);
                }
            }
        }

        Commands::Vendor(vendor_command) => match vendor_command {
            VendorCommands::Add { name } => match book.add_vendor(&name) {
                Ok(id) => {
                    save_book_or_exit(&store_path, &book);
                    println!("Added vendor '{}' with id '{}'.", name, id);
                }
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_USAGE);
                }
            },
            VendorCommands::Remove { id } => {
                if book.remove_vendor(&id) {
                    save_book_or_exit(&store_path, &book);
                    println!("Removed vendor '{}'.", id);
                } else {
                    eprintln!("vendor '{}' not found", id);
                    std::process::exit(EXIT_USAGE);
                }
            }
            VendorCommands::List => {
                if book.vendors.is_empty() {
                    println!("No vendors registered. Run `rfp-bro vendor add <name>`.");
                } else {
                    for vendor in &book.vendors {
                        println!(
                            "{}  {}  ({} scores)",
                            vendor.id,
                            vendor.name,
                            vendor.scores.len()
                        );
                    }
                }
            }
        },

        Commands::Category(category_command) => match category_command {
            CategoryCommands::Add { name, weight, id } => {
                let category = Category {
                    id: id.unwrap_or_else(|| slugify(&name)),
                    name,
                    weight,
                    criteria: Vec::new(),
                };
                let category_id = category.id.clone();
                if let Err(e) = config.template.add_category(category) {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_USAGE);
                }
                save_config_or_exit(&config, &config_path);
                println!("Added category '{}'.", category_id);
            }
            CategoryCommands::Remove { id } => match config.template.remove_category(&id) {
                Ok(removed) => {
                    save_config_or_exit(&config, &config_path);
                    println!(
                        "Removed category '{}' ({} criteria). Recorded scores are kept but no longer counted.",
                        removed.name,
                        removed.criteria.len()
                    );
                }
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_USAGE);
                }
            },
        },

        Commands::Criterion(criterion_command) => match criterion_command {
            CriterionCommands::Add {
                category,
                name,
                weight,
                max_score,
                priority,
                id,
            } => {
                let criterion = Criterion {
                    id: id.unwrap_or_else(|| slugify(&name)),
                    name,
                    description: None,
                    weight,
                    max_score,
                    priority,
                };
                let criterion_id = criterion.id.clone();
                if let Err(e) = config.template.add_criterion(&category, criterion) {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_USAGE);
                }
                save_config_or_exit(&config, &config_path);
                println!("Added criterion '{}' to '{}'.", criterion_id, category);
            }
            CriterionCommands::Remove { id } => match config.template.remove_criterion(&id) {
                Ok(removed) => {
                    save_config_or_exit(&config, &config_path);
                    println!(
                        "Removed criterion '{}'. Recorded scores are kept but no longer counted.",
                        removed.name
                    );
                }
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_USAGE);
                }
            },
        },
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Accept either a vendor id or a display name on the command line;
/// names are slugified to the id they would have been registered under.
fn resolve_vendor_id(book: &rfp_bro::store::VendorBook, input: &str) -> String {
    if book.vendor(input).is_ok() {
        input.to_string()
    } else {
        slugify(input)
    }
}

fn save_book_or_exit(path: &std::path::Path, book: &rfp_bro::store::VendorBook) {
    if let Err(e) = rfp_bro::store::save_book(path, book) {
        eprintln!("Failed to save vendor book: {}", e);
        std::process::exit(EXIT_CONFIG);
    }
}

fn save_config_or_exit(config: &rfp_bro::config::Config, path: &std::path::Path) {
    if let Err(e) = rfp_bro::config::save_config(config, path) {
        eprintln!("Failed to save config: {}", e);
        std::process::exit(EXIT_CONFIG);
    }
}

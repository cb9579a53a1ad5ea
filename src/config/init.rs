use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, Config};
use crate::model::{slugify, Category, Criterion, Priority, Template};
use crate::scoring::ScoringConfig;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(18));
    }
    println!();
}

/// Prompt for a weight in 0..=1, retrying until valid.
fn prompt_weight(message: &str, default: &str) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, default)?;
        match input.parse::<f64>() {
            Ok(v) if (0.0..=1.0).contains(&v) => return Ok(v),
            Ok(_) => println!("  Invalid: must be within 0..=1. Try again."),
            Err(_) => println!("  Invalid: must be a number within 0..=1. Try again."),
        }
    }
}

fn prompt_priority() -> Result<Priority> {
    loop {
        let input = prompt_with_default("  Priority (high/medium/low)", "medium")?;
        match input.to_lowercase().as_str() {
            "high" | "h" => return Ok(Priority::High),
            "medium" | "m" => return Ok(Priority::Medium),
            "low" | "l" => return Ok(Priority::Low),
            _ => println!("  Invalid: choose high, medium or low. Try again."),
        }
    }
}

/// Interactively build one category and its criteria.
fn build_category(template: &Template) -> Result<Category> {
    let name = loop {
        let n = prompt("Category name (e.g., 'Technical capability'): ")?;
        if n.is_empty() {
            println!("  Category name is required.");
            continue;
        }
        let id = slugify(&n);
        if template.categories.iter().any(|c| c.id == id) {
            println!("  A category with id '{}' already exists. Try again.", id);
            continue;
        }
        break n;
    };
    let weight = prompt_weight("Category weight (fraction of the total, e.g., 0.4)", "0.25")?;

    let mut category = Category {
        id: slugify(&name),
        name,
        weight,
        criteria: Vec::new(),
    };

    println!();
    typewriter("Now the criteria for this category. Each gets a weight (fraction of the category) and a max raw score -- evaluators will enter scores on a 0..max scale.");
    loop {
        let criterion_name = loop {
            let n = prompt("  Criterion name (e.g., 'Pricing competitiveness'): ")?;
            if n.is_empty() {
                println!("  Criterion name is required.");
                continue;
            }
            let id = slugify(&n);
            if template.criteria().any(|c| c.id == id)
                || category.criteria.iter().any(|c| c.id == id)
            {
                println!("  A criterion with id '{}' already exists. Try again.", id);
                continue;
            }
            break n;
        };
        let criterion_weight = prompt_weight("  Criterion weight (fraction of the category)", "0.5")?;
        let max_score: f64 = loop {
            let input = prompt_with_default("  Max raw score", "5")?;
            match input.parse::<f64>() {
                Ok(v) if v > 0.0 => break v,
                _ => println!("  Invalid: must be a positive number. Try again."),
            }
        };
        let priority = prompt_priority()?;

        category.criteria.push(Criterion {
            id: slugify(&criterion_name),
            name: criterion_name,
            description: None,
            weight: criterion_weight,
            max_score,
            priority,
        });

        let add_more = prompt_yes_no("  Add another criterion?", false)?;
        if !add_more {
            break;
        }
    }

    Ok(category)
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("RFP Bro Evaluation Setup");
    println!("========================");
    println!();

    // 1. Evaluation template
    typewriter("An evaluation template is a tree of weighted categories (e.g., Technical, Commercial) holding weighted criteria. Vendors are scored per criterion; rfp-bro rolls the tree up into one percentage.");
    println!();

    let template_name = prompt_with_default("Evaluation name", "Vendor RFP evaluation")?;

    let use_sample = prompt_yes_no(
        "Start from the sample procurement template? (n builds one from scratch)",
        true,
    )?;

    let template = if use_sample {
        let mut template = Template::sample();
        template.name = template_name;
        template
    } else {
        let mut template = Template::new(template_name);
        println!();
        typewriter("Let's define your categories. Weights are fractions of the total -- conventionally they sum to 1.0, but scores are always renormalized over what has actually been evaluated.");
        println!();
        loop {
            let category = build_category(&template)?;
            // Ids were checked against the tree during the prompts
            template.categories.push(category);
            println!();
            let add_more = prompt_yes_no("Add another category?", template.categories.len() < 2)?;
            if !add_more {
                break;
            }
            println!();
        }
        template
    };

    // 2. Qualifying threshold
    println!();
    typewriter("Vendors at or above the qualifying threshold are marked eligible for award on the board.");
    let threshold: f64 = loop {
        let input = prompt_with_default("Minimum qualifying score (0..=100)", "85")?;
        match input.parse::<f64>() {
            Ok(v) if (0.0..=100.0).contains(&v) => break v,
            Ok(_) => println!("  Invalid: must be within 0..=100. Try again."),
            Err(_) => println!("  Invalid: must be a number within 0..=100. Try again."),
        }
    };

    // 3. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    // Check if file already exists
    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 4. Write config
    let config = Config {
        template,
        scoring: Some(ScoringConfig {
            minimum_qualifying_score: Some(threshold),
        }),
    };
    save_config(&config, &config_path)?;

    println!();
    println!("Config written to {}", config_path.display());
    typewriter("You can tweak weights, max scores and the threshold in the config file at any time -- scores already entered are never touched.");
    println!("Run `rfp-bro vendor add <name>` to register your first vendor.");

    Ok(())
}

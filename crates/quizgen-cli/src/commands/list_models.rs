//! The `quizgen list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use quizgen_providers::config::ConfigError;
use quizgen_providers::create_provider;

pub fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = quizgen_providers::config::load_config_from(config_path.as_deref())?;

    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();

    let mut found_any = false;

    for name in names {
        if let Some(filter) = &provider_filter {
            if name != filter {
                continue;
            }
        }

        let provider = match create_provider(name, &config.providers[name]) {
            Ok(provider) => provider,
            Err(e) if e.downcast_ref::<ConfigError>().is_some() => {
                println!("Provider: {name} (skipped: {e})\n");
                continue;
            }
            Err(e) => return Err(e),
        };
        let models = provider.available_models();

        if !models.is_empty() {
            found_any = true;
            let marker = if *name == config.default_provider {
                " (default)"
            } else {
                ""
            };
            println!("Provider: {name}{marker}");
            for model in &models {
                println!(
                    "  {} — {} ({}K context)",
                    model.id,
                    model.name,
                    model.max_context / 1000,
                );
            }
            println!();
        }
    }

    if !found_any {
        println!("No usable providers configured. Run `quizgen init` to create a config file.");
    }

    Ok(())
}

//! The `quizgen init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizgen.toml").exists() {
        println!("quizgen.toml already exists, skipping.");
    } else {
        std::fs::write("quizgen.toml", SAMPLE_CONFIG)?;
        println!("Created quizgen.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export GROQ_API_KEY (or edit quizgen.toml for another provider)");
    println!("  2. Run: quizgen quiz --topic \"The Solar System\" --count 5");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizgen configuration

default_provider = "groq"
default_model = "llama-3.1-8b-instant"
temperature = 0.9
max_tokens = 512
max_attempts = 3
retry_delay_ms = 500
parallelism = 1
results_dir = "results"

[providers.groq]
type = "groq"
api_key = "${GROQ_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.anthropic]
type = "anthropic"
api_key = "${ANTHROPIC_API_KEY}"
"#;

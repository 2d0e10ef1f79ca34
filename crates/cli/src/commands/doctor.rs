//! `ragline doctor` — Check the configuration.

use ragline_config::AppConfig;

pub fn run() -> anyhow::Result<()> {
    println!("Ragline Doctor — configuration check");
    println!("====================================\n");

    match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            println!("     Model:           {}", config.chat_model);
            println!("     Search index:    {}", config.search.index);
            println!("     Search endpoint: {}", config.search.endpoint);
            println!("     OpenAI endpoint: {}", config.openai.endpoint);
            println!("     Chatlog:         {}/{}", config.chatlog.database, config.chatlog.container);
            if config.extraction.endpoint.trim().is_empty() {
                println!("  ⚠️  No extraction endpoint — `ragline index` will not work");
            } else {
                println!("     Extraction:      {}", config.extraction.endpoint);
            }
            println!("\nAll checks passed.");
            Ok(())
        }
        Err(e) => {
            println!("  ❌ {e}");
            std::process::exit(1);
        }
    }
}

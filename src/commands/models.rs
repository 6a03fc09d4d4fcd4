//! Model inspection commands

use crate::config::{Config, ModelParams};
use crate::error::Result;

use prettytable::{row, Table};

/// List the configured models and their generation parameters
pub fn list_models(config: &Config) -> Result<()> {
    let mut table = Table::new();
    table.add_row(row!["Model", "Temperature", "Max Tokens", "Context Window"]);

    for (name, params) in &config.models {
        let label = if *name == config.chat.default_model {
            format!("{} (default)", name)
        } else {
            name.clone()
        };
        table.add_row(row![
            label,
            params.temperature,
            params.num_predict,
            format!("{} tokens", params.num_ctx)
        ]);
    }

    println!();
    table.printstd();

    let fallback = ModelParams::fallback();
    println!(
        "\nModels not listed above use temperature={}, num_predict={}, num_ctx={}.\n",
        fallback.temperature, fallback.num_predict, fallback.num_ctx
    );
    Ok(())
}

use clap::Parser;
use formwright::cli::commands::{cmd_fields, cmd_resolve, cmd_template};
use formwright::cli::config::{load_config, Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Fields {
            input,
            screens,
            doc_name,
            output,
        } => {
            cmd_fields(
                &input,
                screens.as_deref(),
                &doc_name,
                output.as_deref(),
                &config,
                cli.verbose,
            )?;
        }
        Commands::Template {
            input,
            retain_calls,
            signature_filter,
            doc_name,
            output,
        } => {
            cmd_template(
                &input,
                retain_calls,
                signature_filter.as_deref(),
                &doc_name,
                output.as_deref(),
                &config,
                cli.verbose,
            )?;
        }
        Commands::Resolve { labels } => {
            cmd_resolve(&labels)?;
        }
    }

    Ok(())
}

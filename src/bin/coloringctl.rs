use clap::{Args, Parser, Subcommand};
use coloring_book_generator::buffer::{export_to_dir, ExportOptions};
use coloring_book_generator::generation::generate_batch;
use coloring_book_generator::{Config, ImageBuffer, ImageClient};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "coloringctl", about = "CLI for the Coloring Book Generator", version)]
struct Cli {
    /// Override OPENAI_API_URL
    #[arg(global = true, long)]
    api_url: Option<String>,

    /// Override REQUEST_TIMEOUT_SECS
    #[arg(global = true, long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate one coloring page per prompt and export the results
    Generate {
        /// Descriptions to turn into coloring pages, in order
        #[arg(required = true, value_name = "PROMPT")]
        prompts: Vec<String>,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Export the two placeholder pages without calling the provider
    Placeholders {
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Show the effective configuration
    Env,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Directory that receives image_<n>.png files
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,
    /// Also write images.zip with every image
    #[arg(long)]
    zip: bool,
    /// Also write print.html with every image
    #[arg(long)]
    print: bool,
    /// Leave the auto-print script out of print.html
    #[arg(long, requires = "print")]
    no_auto_print: bool,
}

impl ExportArgs {
    fn options(&self) -> ExportOptions {
        ExportOptions { zip: self.zip, print: self.print, auto_print: !self.no_auto_print }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Load env and parse CLI
    Config::dotenv_load();
    let cli = Cli::parse();

    let mut conf = Config::new()?;
    if let Some(url) = cli.api_url {
        conf.openai_api_url = url;
    }
    if let Some(secs) = cli.timeout {
        conf.request_timeout_secs = secs;
    }

    match cli.command {
        Commands::Generate { prompts, export } => {
            let client = ImageClient::new(&conf)?;
            if !client.is_configured() {
                eprintln!("Warning: OPENAI_API_KEY is not set");
            }
            let outcome = generate_batch(&client, &prompts).await;
            for (input, e) in &outcome.failures {
                eprintln!("Skipped \"{}\" ({}): {}", input, e.kind(), e);
            }
            let buffer = outcome.into_nonempty()?;
            write_exports(&buffer, &export).await
        }
        Commands::Placeholders { export } => write_exports(&ImageBuffer::with_placeholders(), &export).await,
        Commands::Env => {
            for (name, value) in conf.env_vars() {
                println!("{}: {}", name, value);
            }
            Ok(())
        }
    }
}

async fn write_exports(buffer: &ImageBuffer, export: &ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    for file in export_to_dir(buffer, &export.out_dir, export.options()).await? {
        println!("Saved {} ({} bytes)", file.path.display(), file.bytes);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn export_flags_map_to_options() {
        let cli = Cli::parse_from(["coloringctl", "placeholders", "--zip", "--print", "--no-auto-print"]);
        match cli.command {
            Commands::Placeholders { export } => {
                assert_eq!(export.options(), ExportOptions { zip: true, print: true, auto_print: false });
                assert_eq!(export.out_dir, PathBuf::from("."));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn zero_timeout_is_refused() {
        assert!(Cli::try_parse_from(["coloringctl", "--timeout", "0", "env"]).is_err());
        let cli = Cli::try_parse_from(["coloringctl", "--timeout", "30", "env"]).unwrap();
        assert_eq!(cli.timeout, Some(30));
    }

    #[test]
    fn generate_needs_a_prompt_and_auto_print_needs_print() {
        assert!(Cli::try_parse_from(["coloringctl", "generate"]).is_err());
        assert!(Cli::try_parse_from(["coloringctl", "generate", "a cat", "--no-auto-print"]).is_err());
        let cli = Cli::try_parse_from(["coloringctl", "generate", "a cat", "", "a dog", "--out-dir", "out"]).unwrap();
        match cli.command {
            Commands::Generate { prompts, export } => {
                assert_eq!(prompts, ["a cat", "", "a dog"]);
                assert_eq!(export.options(), ExportOptions::default());
                assert_eq!(export.out_dir, PathBuf::from("out"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}

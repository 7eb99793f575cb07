use clap::{Parser, Subcommand};
use std::path::PathBuf;
use symptomx_core::{config::data_path_from_env_value, Dataset, SymptomService, DEFAULT_TOP_K};

#[derive(Parser)]
#[command(name = "symptomx")]
#[command(about = "Offline symptom lookup")]
struct Cli {
    /// Dataset file (JSON, or CSV). Defaults to $SYMPTOMX_DATA_PATH or data/diseases.json
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank diseases against free-text symptoms
    Diagnose {
        /// Symptoms, e.g. "fever, cough"
        symptoms: String,
        /// Maximum number of matches
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the loaded diseases
    List,
    /// List the distinct symptom phrases in the dataset
    Vocab,
    /// Show where the dataset was loaded from
    Health,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let data_path = cli
        .data
        .unwrap_or_else(|| data_path_from_env_value(std::env::var("SYMPTOMX_DATA_PATH").ok()));
    let service = SymptomService::new(Dataset::load(Some(data_path.as_path())));

    match cli.command {
        Some(Commands::Diagnose {
            symptoms,
            top_k,
            json,
        }) => {
            let res = service.diagnose(&symptoms, top_k);
            if json {
                println!("{}", serde_json::to_string_pretty(&res)?);
            } else {
                if let Some(message) = &res.message {
                    println!("{message}");
                }
                for (rank, item) in res.primary.iter().chain(res.possible.iter()).enumerate() {
                    println!(
                        "{}. {} ({:.1}%, score {})",
                        rank + 1,
                        item.disease,
                        item.confidence,
                        item.score
                    );
                    if !item.matched.is_empty() {
                        println!("   matched: {}", item.matched.join(", "));
                    }
                    if !item.treatment.is_empty() {
                        println!("   treatment: {}", item.treatment);
                    }
                }
            }
        }
        Some(Commands::List) => {
            for disease in service.list_diseases() {
                println!("{}: {}", disease.disease, disease.symptoms);
            }
        }
        Some(Commands::Vocab) => {
            for phrase in service.vocab() {
                println!("{phrase}");
            }
        }
        Some(Commands::Health) => {
            println!("{}", serde_json::to_string_pretty(&service.health())?);
        }
        None => {
            println!("Use 'symptomx --help' for commands");
        }
    }

    Ok(())
}

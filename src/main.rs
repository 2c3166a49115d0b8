use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use pppk_kontrak::{ContractTemplate, Employee, Error, PLACEHOLDERS};

#[derive(Parser)]
#[command(name = "pppk-kontrak", version, about = "PPPK contract document engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compose a draft contract from a template and an employee record
    Compose {
        /// Contract template (JSON)
        #[arg(long)]
        template: PathBuf,
        /// Employee record (JSON)
        #[arg(long)]
        record: PathBuf,
        /// Contract start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Output PDF path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Replace the draft's signature placeholder page with a signed page
    Merge {
        /// Draft contract PDF
        draft: PathBuf,
        /// Signed-page PDF (its first page is used)
        signature: PathBuf,
        /// Output PDF path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List the placeholder tokens templates may use
    Placeholders,
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Compose {
            template,
            record,
            start,
            output,
        } => {
            let template: ContractTemplate = serde_json::from_slice(&fs::read(&template)?)
                .map_err(|e| Error::InvalidTemplate(e.to_string()))?;
            let employee: Employee = serde_json::from_slice(&fs::read(&record)?)
                .map_err(|e| Error::InvalidRecord(e.to_string()))?;
            let bytes = pppk_kontrak::generate_contract(&template, &employee, start)?;
            fs::write(&output, bytes)?;
            println!("Wrote {}", output.display());
        }
        Command::Merge {
            draft,
            signature,
            output,
        } => {
            let draft = fs::read(&draft)?;
            let signature = fs::read(&signature)?;
            let bytes = pppk_kontrak::merge_signed_page(&draft, &signature)?;
            fs::write(&output, bytes)?;
            println!("Wrote {}", output.display());
        }
        Command::Placeholders => {
            for p in &PLACEHOLDERS {
                println!("{:<30} {}", p.token, p.description);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use triage::{dataset, ModelStore, TicketClassifier, TicketRecord, TrainingBatch};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding trained models (defaults to $TRIAGE_HOME/models or the user cache)
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a classifier from a CSV file and save it to the model store
    Train {
        /// CSV with subject, body, language, queue and priority columns
        #[arg(short, long)]
        data: PathBuf,
        /// Name of the saved model
        #[arg(short, long, default_value = "support-tickets-classifier")]
        name: String,
    },
    /// Classify one ticket with a saved model and print the labels as JSON
    Predict {
        /// Name of the saved model
        #[arg(short, long, default_value = "support-tickets-classifier")]
        name: String,
        #[arg(short, long)]
        subject: String,
        #[arg(short, long)]
        body: String,
    },
}

fn main() -> Result<()> {
    triage::init_logger();
    let args = Args::parse();

    let store = match args.models_dir {
        Some(dir) => ModelStore::new(dir)?,
        None => ModelStore::new_default()?,
    };

    match args.command {
        Command::Train { data, name } => train(&store, &data, &name),
        Command::Predict { name, subject, body } => predict(&store, &name, subject, body),
    }
}

fn train(store: &ModelStore, data: &Path, name: &str) -> Result<()> {
    info!("=== Training Ticket Classifier ===");
    let start_time = Instant::now();

    let tickets = dataset::load_training_csv(data)
        .with_context(|| format!("Failed to load training data from {:?}", data))?;
    if tickets.is_empty() {
        bail!("No complete training rows in {:?}", data);
    }

    let batch = TrainingBatch::from_tickets(&tickets)?;
    let classifier = TicketClassifier::builder().train(&batch)?;
    let info = classifier.info();
    info!("Queue labels: {:?}", info.queue.labels);
    info!("Language labels: {:?}", info.language.labels);
    info!("Priority labels: {:?}", info.priority.labels);

    let path = store.save(name, &classifier)?;
    info!("=== Model saved to {:?} (took {:.2?}) ===", path, start_time.elapsed());
    Ok(())
}

fn predict(store: &ModelStore, name: &str, subject: String, body: String) -> Result<()> {
    let classifier = store
        .load(name)
        .with_context(|| format!("Failed to load model '{}' from {:?}", name, store.models_dir()))?;

    let start_time = Instant::now();
    let prediction = classifier.predict(&[TicketRecord::new(subject, body)])?;
    info!("Classification took {:.2?}", start_time.elapsed());

    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}

use std::fs;

use tempfile::tempdir;
use triage::{dataset, DatasetError, TicketClassifier, TicketRecord, TrainingBatch};

const TRAINING_CSV: &str = "\
subject,body,answer,type,queue,priority,language
Invoice payment failed,Please refund the invoice payment for the account. Service information.,ok,Request,Billing,High,en
Invoice question,A question about the invoice payment for the account. Service information.,ok,Request,Billing,Low,en
Server error,The server shows an error for the account login. Service information.,ok,Incident,Tech,High,en
,The server is down again.,ok,Incident,Tech,High,en
Serverfehler,Der Server meldet einen Fehler für das Konto. Service information.,ok,Incident,Tech,High,de
Rechnung,\"Eine Frage zur Rechnung für das Konto, bitte. Service information.\",ok,Request,Billing,Low,de
Anmeldung,Die Anmeldung am Server zeigt einen Fehler. Service information.,ok,Incident,Tech,Low,de
Unlabeled,This row has no priority.,ok,Request,Billing,,en
";

#[test]
fn test_train_from_csv_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("tickets.csv");
    fs::write(&path, TRAINING_CSV)?;

    let tickets = dataset::load_training_csv(&path)?;
    assert_eq!(tickets.len(), 6);
    assert!(tickets.iter().all(|ticket| ticket.is_complete()));

    let batch = TrainingBatch::from_tickets(&tickets)?;
    let classifier = TicketClassifier::builder().train(&batch)?;
    let info = classifier.info();
    assert_eq!(info.queue.labels, vec!["Billing", "Tech"]);
    assert_eq!(info.language.labels, vec!["de", "en"]);

    let prediction = classifier.predict(&[TicketRecord::new("Invoice", "Refund the invoice payment.")])?;
    assert_eq!(prediction.len(), 1);
    Ok(())
}

#[test]
fn test_missing_file() {
    let result = dataset::load_training_csv("/nonexistent/tickets.csv");
    assert!(matches!(result, Err(DatasetError::IoError(_))));
}

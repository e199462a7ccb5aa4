use std::fs;

use tempfile::tempdir;
use triage::{LabeledTicket, ModelError, ModelStore, TicketClassifier, TicketRecord, TrainingBatch};

fn train_classifier() -> Result<TicketClassifier, Box<dyn std::error::Error>> {
    let tickets = vec![
        LabeledTicket::new("Invoice payment failed", "Please refund the invoice payment for the account. Service information.", "Billing", "en", "High"),
        LabeledTicket::new("Invoice question", "A question about the invoice payment for the account. Service information.", "Billing", "en", "Low"),
        LabeledTicket::new("Server error", "The server shows an error for the account login. Service information.", "Tech", "en", "High"),
        LabeledTicket::new("Serverfehler", "Der Server meldet einen Fehler für das Konto. Service information.", "Tech", "de", "High"),
        LabeledTicket::new("Rechnung", "Eine Frage zur Rechnung für das Konto, bitte. Service information.", "Billing", "de", "Low"),
        LabeledTicket::new("Anmeldung", "Die Anmeldung am Server zeigt einen Fehler. Service information.", "Tech", "de", "Low"),
    ];
    let batch = TrainingBatch::from_tickets(&tickets)?;
    Ok(TicketClassifier::builder().train(&batch)?)
}

#[test]
fn test_save_and_load() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = ModelStore::new(dir.path())?;
    let classifier = train_classifier()?;

    let path = store.save("tickets", &classifier)?;
    assert!(path.exists());
    assert!(store.is_model_saved("tickets"));
    assert!(store.verify_model("tickets")?);

    let loaded = store.load("tickets")?;
    assert_eq!(loaded.info(), classifier.info());

    let records = vec![TicketRecord::new("Refund", "The invoice payment failed, please refund.")];
    assert_eq!(loaded.predict(&records)?, classifier.predict(&records)?);
    Ok(())
}

#[test]
fn test_corrupted_model_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = ModelStore::new(dir.path())?;
    store.save("tickets", &train_classifier()?)?;

    let model_path = store.get_model_path("tickets");
    let mut bytes = fs::read(&model_path)?;
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    fs::write(&model_path, &bytes)?;

    assert!(!store.verify_model("tickets")?);
    match store.load("tickets") {
        Err(ModelError::HashMismatch { name, expected, actual }) => {
            assert_eq!(name, "tickets");
            assert_ne!(expected, actual);
        }
        other => panic!("expected a hash mismatch, got {:?}", other.map(|c| c.info())),
    }
    Ok(())
}

#[test]
fn test_remove_model() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = ModelStore::new(dir.path())?;
    store.save("tickets", &train_classifier()?)?;

    store.remove_model("tickets")?;
    assert!(!store.is_model_saved("tickets"));
    assert!(!store.get_checksum_path("tickets").exists());
    assert!(matches!(store.load("tickets"), Err(ModelError::NotFound(_))));

    // removing twice is fine
    store.remove_model("tickets")?;
    Ok(())
}

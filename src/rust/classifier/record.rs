use serde::{Deserialize, Serialize};

use super::error::ClassifierError;

/// One support ticket as submitted for inference.
///
/// `None` marks a missing field; a record missing either field is skipped
/// by training and prediction alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub subject: Option<String>,
    pub body: Option<String>,
}

impl TicketRecord {
    /// Creates a complete record.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            body: Some(body.into()),
        }
    }

    /// `subject + " " + body`, or `None` if either field is missing.
    pub fn joined_text(&self) -> Option<String> {
        match (&self.subject, &self.body) {
            (Some(subject), Some(body)) => Some(format!("{} {}", subject, body)),
            _ => None,
        }
    }
}

/// A training ticket: the record plus its three target labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledTicket {
    pub subject: Option<String>,
    pub body: Option<String>,
    pub queue: Option<String>,
    pub language: Option<String>,
    pub priority: Option<String>,
}

impl LabeledTicket {
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        queue: impl Into<String>,
        language: impl Into<String>,
        priority: impl Into<String>,
    ) -> Self {
        Self {
            subject: Some(subject.into()),
            body: Some(body.into()),
            queue: Some(queue.into()),
            language: Some(language.into()),
            priority: Some(priority.into()),
        }
    }

    pub fn record(&self) -> TicketRecord {
        TicketRecord {
            subject: self.subject.clone(),
            body: self.body.clone(),
        }
    }

    /// `true` when all five fields are present.
    pub fn is_complete(&self) -> bool {
        self.subject.is_some()
            && self.body.is_some()
            && self.queue.is_some()
            && self.language.is_some()
            && self.priority.is_some()
    }
}

/// Joins subject and body of every complete record, preserving order.
///
/// Incomplete records are dropped without error, so the result may be
/// shorter than the input or empty.
pub fn assemble_texts(records: &[TicketRecord]) -> Vec<String> {
    records.iter().filter_map(TicketRecord::joined_text).collect()
}

/// Joined texts and their labels, filtered by one mask.
///
/// Every constructor drops the same rows from the texts and from all three
/// label columns at once, so row `i` of every column describes the same
/// ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingBatch {
    texts: Vec<String>,
    queue: Vec<String>,
    language: Vec<String>,
    priority: Vec<String>,
}

impl TrainingBatch {
    /// Builds a batch from labeled tickets.
    ///
    /// Tickets missing subject or body are skipped. A kept ticket without
    /// all three labels is a `ValidationError`.
    pub fn from_tickets(tickets: &[LabeledTicket]) -> Result<Self, ClassifierError> {
        let mut batch = Self::default();
        for (row, ticket) in tickets.iter().enumerate() {
            let Some(text) = ticket.record().joined_text() else {
                continue;
            };
            let queue = required_label(&ticket.queue, "queue", row)?;
            let language = required_label(&ticket.language, "language", row)?;
            let priority = required_label(&ticket.priority, "priority", row)?;
            batch.push(text, queue, language, priority);
        }
        Ok(batch)
    }

    /// Builds a batch from a record column and three label columns.
    ///
    /// All columns must have the same length; the subject/body mask of
    /// `records` is applied to every label column.
    pub fn from_columns(
        records: &[TicketRecord],
        queue: &[String],
        language: &[String],
        priority: &[String],
    ) -> Result<Self, ClassifierError> {
        for column in [queue, language, priority] {
            if column.len() != records.len() {
                return Err(ClassifierError::LabelMismatch {
                    expected: records.len(),
                    actual: column.len(),
                });
            }
        }

        let mut batch = Self::default();
        for (row, record) in records.iter().enumerate() {
            if let Some(text) = record.joined_text() {
                batch.push(
                    text,
                    queue[row].clone(),
                    language[row].clone(),
                    priority[row].clone(),
                );
            }
        }
        Ok(batch)
    }

    fn push(&mut self, text: String, queue: String, language: String, priority: String) {
        self.texts.push(text);
        self.queue.push(queue);
        self.language.push(language);
        self.priority.push(priority);
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn queue_labels(&self) -> &[String] {
        &self.queue
    }

    pub fn language_labels(&self) -> &[String] {
        &self.language
    }

    pub fn priority_labels(&self) -> &[String] {
        &self.priority
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

fn required_label(label: &Option<String>, name: &str, row: usize) -> Result<String, ClassifierError> {
    label.clone().ok_or_else(|| {
        ClassifierError::ValidationError(format!("Ticket {} is missing its {} label", row, name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_assemble_texts_drops_incomplete_records() {
        let records = vec![
            TicketRecord::new("Login", "cannot sign in"),
            TicketRecord { subject: None, body: Some("orphan body".into()) },
            TicketRecord { subject: Some("orphan subject".into()), body: None },
            TicketRecord::new("Refund", "please refund"),
        ];
        assert_eq!(
            assemble_texts(&records),
            strings(&["Login cannot sign in", "Refund please refund"])
        );
    }

    #[test]
    fn test_assemble_texts_keeps_empty_strings() {
        let records = vec![TicketRecord::new("", "")];
        assert_eq!(assemble_texts(&records), strings(&[" "]));
        assert!(assemble_texts(&[TicketRecord::default()]).is_empty());
    }

    #[test]
    fn test_from_columns_applies_one_mask() -> Result<(), ClassifierError> {
        let records = vec![
            TicketRecord::new("a", "b"),
            TicketRecord { subject: None, body: Some("x".into()) },
            TicketRecord::new("c", "d"),
        ];
        let batch = TrainingBatch::from_columns(
            &records,
            &strings(&["Billing", "Dropped", "Tech"]),
            &strings(&["en", "xx", "de"]),
            &strings(&["Low", "Dropped", "High"]),
        )?;

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.texts(), &strings(&["a b", "c d"])[..]);
        assert_eq!(batch.queue_labels(), &strings(&["Billing", "Tech"])[..]);
        assert_eq!(batch.language_labels(), &strings(&["en", "de"])[..]);
        assert_eq!(batch.priority_labels(), &strings(&["Low", "High"])[..]);
        Ok(())
    }

    #[test]
    fn test_from_columns_rejects_misaligned_labels() {
        let records = vec![TicketRecord::new("a", "b")];
        let result = TrainingBatch::from_columns(
            &records,
            &strings(&["Billing"]),
            &strings(&["en", "de"]),
            &strings(&["Low"]),
        );
        assert!(matches!(
            result,
            Err(ClassifierError::LabelMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_from_tickets() -> Result<(), ClassifierError> {
        let mut incomplete = LabeledTicket::new("s", "b", "Tech", "en", "Low");
        incomplete.body = None;
        let tickets = vec![
            LabeledTicket::new("Refund", "money back", "Billing", "en", "High"),
            incomplete,
        ];
        let batch = TrainingBatch::from_tickets(&tickets)?;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.queue_labels(), &strings(&["Billing"])[..]);

        let mut unlabeled = LabeledTicket::new("s", "b", "Tech", "en", "Low");
        unlabeled.priority = None;
        assert!(!unlabeled.is_complete());
        assert!(matches!(
            TrainingBatch::from_tickets(&[unlabeled]),
            Err(ClassifierError::ValidationError(_))
        ));
        Ok(())
    }
}

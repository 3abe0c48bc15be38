//! Expression history: completed evaluations, newest first.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use calc_base::api::{ExpressionId, ExpressionRecord, ExpressionStatus, Transport};

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Server id, known only for entries fetched from the server
    pub id: Option<ExpressionId>,
    pub expression: String,
    pub result: Option<f64>,
    pub status: ExpressionStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    /// Entry recorded locally when an evaluation finishes.
    pub fn completed(expression: impl Into<String>, result: Option<f64>, status: ExpressionStatus) -> Self {
        Self { id: None, expression: expression.into(), result, status, created_at: Some(Utc::now()) }
    }
}

impl From<ExpressionRecord> for HistoryEntry {
    fn from(rec: ExpressionRecord) -> Self {
        Self {
            id: Some(rec.id),
            expression: rec.expression,
            result: rec.result,
            status: rec.status,
            created_at: rec.created_at,
        }
    }
}

#[derive(Default)]
struct HistoryData {
    entries: Vec<HistoryEntry>,
    is_loading: bool,
    error: Option<String>,
}

/// Shared history cache. Clones share the same list.
#[derive(Clone, Default)]
pub struct History {
    inner: Arc<Mutex<HistoryData>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HistoryData> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Prepend one entry. No dedup, no cap.
    pub fn append(&self, entry: HistoryEntry) {
        self.lock().entries.insert(0, entry);
    }

    /// Snapshot of all entries, newest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Replace the list with the server's copy.
    ///
    /// The lock is not held across the call, so an append that lands while
    /// the request is in flight is overwritten by the fetched list.
    /// On failure the list is left as is and the error is recorded.
    pub fn fetch_all(&self, transport: &dyn Transport) {
        {
            let mut data = self.lock();
            data.is_loading = true;
            data.error = None;
        }

        let outcome = transport.list_expressions();

        let mut data = self.lock();
        match outcome {
            Ok(records) => {
                tracing::info!(count = records.len(), "history fetched");
                let mut entries: Vec<HistoryEntry> = records.into_iter().map(HistoryEntry::from).collect();
                // Newest first; records without a timestamp keep server order at the end
                entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                data.entries = entries;
            }
            Err(e) => {
                tracing::warn!(error = %e, "history fetch failed");
                data.error = Some(e);
            }
        }
        data.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_base::mock::ScriptedTransport;

    fn record(id: &str, expr: &str, ts: &str) -> ExpressionRecord {
        ExpressionRecord {
            id: ExpressionId::from(id),
            expression: expr.to_string(),
            status: ExpressionStatus::Succeeded,
            result: Some(1.0),
            created_at: Some(ts.parse().unwrap()),
        }
    }

    #[test]
    fn append_prepends_without_dedup() {
        let h = History::new();
        h.append(HistoryEntry::completed("1+1", Some(2.0), ExpressionStatus::Succeeded));
        h.append(HistoryEntry::completed("2+2", Some(4.0), ExpressionStatus::Succeeded));
        h.append(HistoryEntry::completed("2+2", Some(4.0), ExpressionStatus::Succeeded));

        let exprs: Vec<String> = h.entries().into_iter().map(|e| e.expression).collect();
        assert_eq!(exprs, vec!["2+2", "2+2", "1+1"]);
    }

    #[test]
    fn clones_share_list() {
        let a = History::new();
        let b = a.clone();
        a.append(HistoryEntry::completed("3*3", Some(9.0), ExpressionStatus::Succeeded));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn fetch_all_replaces_list_newest_first() {
        let h = History::new();
        h.append(HistoryEntry::completed("local", None, ExpressionStatus::Failed));

        let transport = ScriptedTransport::new().on_list(Ok(vec![
            record("1", "old", "2025-01-01T00:00:00Z"),
            record("2", "new", "2025-06-01T00:00:00Z"),
        ]));
        h.fetch_all(&transport);

        let entries = h.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].expression, "new");
        assert_eq!(entries[0].id, Some(ExpressionId::from("2")));
        assert_eq!(entries[1].expression, "old");
        assert!(!h.is_loading());
        assert!(h.error().is_none());
    }

    #[test]
    fn fetch_failure_keeps_list_and_sets_error() {
        let h = History::new();
        h.append(HistoryEntry::completed("1/0", None, ExpressionStatus::Failed));

        let transport = ScriptedTransport::new().on_list(Err("something went wrong".into()));
        h.fetch_all(&transport);

        assert_eq!(h.len(), 1);
        assert_eq!(h.error().as_deref(), Some("something went wrong"));
        assert!(!h.is_loading());
    }

    #[test]
    fn fetch_clears_previous_error() {
        let h = History::new();
        let transport = ScriptedTransport::new().on_list(Err("boom".into())).on_list(Ok(vec![]));
        h.fetch_all(&transport);
        assert!(h.error().is_some());
        h.fetch_all(&transport);
        assert!(h.error().is_none());
        assert!(h.is_empty());
    }
}

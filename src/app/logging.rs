//! Progress logging driven by pass events.

use log::{debug, info};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::batch::PassEvent;
use crate::models::RootEntry;

/// Logs every pass event until the sending side is dropped.
///
/// Returns the number of entry updates seen, which lets callers and tests
/// confirm that the observer kept up.
pub fn spawn_progress_logger(mut events: UnboundedReceiver<PassEvent>) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut updates = 0usize;
        let mut total = 0usize;
        while let Some(event) = events.recv().await {
            match event {
                PassEvent::Started { pass, total: t } => {
                    total = t;
                    debug!("{pass} started");
                }
                PassEvent::EntryUpdated { pass, index, entry } => {
                    updates += 1;
                    info!("[{pass} {}/{total}] {}", index + 1, describe(&entry));
                }
                PassEvent::Finished(report) => {
                    debug!("{} finished after {} item(s)", report.pass, report.processed);
                }
            }
        }
        updates
    })
}

/// Short one-line description of an entry's current state.
fn describe(entry: &RootEntry) -> String {
    let mut parts = vec![entry.root().to_string()];
    match (&entry.ip, &entry.ip_error) {
        (Some(ip), _) => parts.push(ip.to_string()),
        (None, Some(e)) => parts.push(format!("ip: {e}")),
        (None, None) => {}
    }
    if let Some(redirect) = &entry.redirect {
        parts.push(format!("-> {}", redirect.final_url()));
    }
    if let Some(crawl) = &entry.crawl {
        match &crawl.error {
            Some(e) => parts.push(format!("crawl: {e}")),
            None => parts.push(format!("{} third parties", crawl.third_parties.len())),
        }
    }
    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{PassKind, PassReport};
    use crate::domain::canonical_root;
    use crate::error_handling::DnsError;
    use tokio::sync::mpsc;

    #[test]
    fn test_describe_entry() {
        let mut entry = RootEntry::new(canonical_root("https://a.test/x").unwrap(), "https://a.test/x");
        assert_eq!(describe(&entry), "https://a.test");
        entry.ip_error = Some(DnsError::NoRecord);
        assert_eq!(describe(&entry), "https://a.test | ip: no A record found");
    }

    #[tokio::test]
    async fn test_progress_logger_counts_updates() {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = spawn_progress_logger(rx);
        let entry = RootEntry::new(canonical_root("https://a.test/").unwrap(), "https://a.test/");

        tx.send(PassEvent::Started {
            pass: PassKind::ResolveIps,
            total: 1,
        })
        .unwrap();
        tx.send(PassEvent::EntryUpdated {
            pass: PassKind::ResolveIps,
            index: 0,
            entry,
        })
        .unwrap();
        tx.send(PassEvent::Finished(PassReport::new(PassKind::ResolveIps, 1)))
            .unwrap();
        drop(tx);

        assert_eq!(handle.await.unwrap(), 1);
    }
}

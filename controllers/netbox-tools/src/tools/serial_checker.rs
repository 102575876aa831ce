//! Serial checker
//!
//! Finds the next free asset serial in the virtual machine names. Actions
//! are replayed against one session so that `next` walks the snapshot taken
//! by the preceding `check`.

use crate::config::SerialConfig;
use crate::error::ToolsError;
use crate::inventory::Inventory;
use crate::session::{SerialAction, SerialSnapshot, SerialView, SessionStore};
use tracing::info;

/// Run `actions` in order on a fresh session starting at `index`
pub async fn run_serial(
    inventory: &Inventory,
    store: &SessionStore,
    config: &SerialConfig,
    actions: &[SerialAction],
    index: usize,
) -> Result<Vec<SerialView>, ToolsError> {
    let session = store.open(index).await;
    let mut views = Vec::with_capacity(actions.len());

    for &action in actions {
        let view = store
            .apply(session, action, || async {
                let names = inventory.vm_names().await?;
                let snapshot = SerialSnapshot::build(&names, &config.grammar);
                info!(
                    "Scanned {} VM names, {} serials taken, highest {}",
                    names.len(),
                    snapshot.ledger.taken_count(),
                    snapshot.ledger.highest_taken
                );
                Ok::<_, ToolsError>(snapshot)
            })
            .await;

        match view {
            Ok(view) => views.push(view),
            Err(e) => {
                store.close(session).await;
                return Err(e);
            }
        }
    }

    store.close(session).await;
    Ok(views)
}

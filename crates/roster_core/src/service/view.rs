//! Display projection of the record store.

use crate::service::record_store::{RecordStore, RowKey};
use crate::service::session::EditSession;
use crate::storage::KvStore;

/// One table row as the UI shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Zero-based position in store order.
    pub position: usize,
    /// Identity the row's edit/delete triggers dispatch with.
    pub key: RowKey,
    pub name: String,
    pub id: String,
    pub email: String,
    pub contact: String,
}

/// Projects the store into rows, in store order.
pub fn render_rows<K: KvStore>(store: &RecordStore<K>) -> Vec<RowView> {
    store
        .entries()
        .enumerate()
        .map(|(position, (key, record))| RowView {
            position,
            key,
            name: record.name.clone(),
            id: record.id.clone(),
            email: record.email.clone(),
            contact: record.contact.clone(),
        })
        .collect()
}

/// Which form actions are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Submit visible; update and cancel hidden.
    Create,
    /// Update and cancel visible; submit hidden.
    Edit,
}

impl FormMode {
    pub fn for_session(session: EditSession) -> Self {
        if session.is_editing() {
            Self::Edit
        } else {
            Self::Create
        }
    }

    pub fn shows_submit(self) -> bool {
        self == Self::Create
    }

    pub fn shows_update(self) -> bool {
        self == Self::Edit
    }

    pub fn shows_cancel(self) -> bool {
        self == Self::Edit
    }
}

#[cfg(test)]
mod tests {
    use super::{render_rows, FormMode};
    use crate::model::record::Record;
    use crate::repo::record_repo::RecordRepository;
    use crate::service::record_store::RecordStore;
    use crate::service::session::EditSession;
    use crate::storage::MemoryKvStore;

    #[test]
    fn rows_follow_store_order_with_positions() {
        let repo = RecordRepository::new(MemoryKvStore::new());
        let (mut store, _) = RecordStore::load(repo).unwrap();
        for (name, id) in [("Ada", "1"), ("Bob", "2")] {
            store
                .append(Record {
                    name: name.to_string(),
                    id: id.to_string(),
                    email: "x@y.io".to_string(),
                    contact: "0123456789".to_string(),
                })
                .unwrap();
        }

        let rows = render_rows(&store);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].position, rows[0].name.as_str()), (0, "Ada"));
        assert_eq!((rows[1].position, rows[1].id.as_str()), (1, "2"));
        assert_eq!(Some(rows[1].key), store.key_at(1));
        assert_eq!(render_rows(&store), rows);
    }

    #[test]
    fn form_mode_toggles_visible_actions() {
        let create = FormMode::for_session(EditSession::Creating);
        assert!(create.shows_submit() && !create.shows_update() && !create.shows_cancel());

        let edit = FormMode::for_session(EditSession::Editing { index: 0 });
        assert!(!edit.shows_submit() && edit.shows_update() && edit.shows_cancel());
    }
}

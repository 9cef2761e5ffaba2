use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::SubmittedFile;

/// An opaque, revocable handle to a locally renderable copy of a submitted
/// file. Cheap to clone; the bytes live in the [`PreviewStore`] until the
/// handle is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRef {
    id: u64,
    pub file_name: String,
}

impl PreviewRef {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// In-memory registry of preview resources.
///
/// The upload machine is the single owner that ever creates or releases
/// entries; the presentation layer only reads through [`resolve`].
///
/// [`resolve`]: PreviewStore::resolve
pub struct PreviewStore {
    entries: DashMap<u64, Arc<Vec<u8>>>,
    next_id: AtomicU64,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register the file's bytes under a fresh id and return a handle.
    ///
    /// Infallible and non-blocking: the bytes are already in memory and are
    /// shared, not copied.
    pub fn create(&self, file: &SubmittedFile) -> PreviewRef {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(id, Arc::clone(&file.bytes));
        tracing::debug!(id, name = %file.name, size = file.len(), "preview created");
        PreviewRef {
            id,
            file_name: file.name.clone(),
        }
    }

    /// Read-only access to the preview bytes. `None` once released.
    pub fn resolve(&self, preview: &PreviewRef) -> Option<Arc<Vec<u8>>> {
        self.entries.get(&preview.id).map(|e| Arc::clone(e.value()))
    }

    /// Invalidate the handle and free the underlying bytes. Idempotent:
    /// releasing an already-released handle is a no-op.
    pub fn release(&self, preview: &PreviewRef) {
        if self.entries.remove(&preview.id).is_some() {
            tracing::debug!(id = preview.id, "preview released");
        }
    }

    /// Number of live preview resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PreviewStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PDF_MEDIA_TYPE;

    fn pdf_file() -> SubmittedFile {
        SubmittedFile::new("doc.pdf", PDF_MEDIA_TYPE, b"%PDF-1.4 x".to_vec())
    }

    #[test]
    fn create_then_resolve_returns_bytes() {
        let store = PreviewStore::new();
        let file = pdf_file();
        let preview = store.create(&file);

        let bytes = store.resolve(&preview).expect("preview should resolve");
        assert_eq!(bytes.as_slice(), file.bytes.as_slice());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn release_invalidates_handle() {
        let store = PreviewStore::new();
        let preview = store.create(&pdf_file());

        store.release(&preview);
        assert!(store.resolve(&preview).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn double_release_is_idempotent() {
        let store = PreviewStore::new();
        let first = store.create(&pdf_file());
        let second = store.create(&pdf_file());

        store.release(&first);
        store.release(&first);

        // The second handle is untouched by the double release.
        assert!(store.resolve(&second).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn handles_get_distinct_ids() {
        let store = PreviewStore::new();
        let a = store.create(&pdf_file());
        let b = store.create(&pdf_file());
        assert_ne!(a.id(), b.id());
    }
}

//! Document id extraction and splitting

use super::ResourceIdentifier;

const DOCUMENT_SEGMENT: &str = "document";
const TREE_SEGMENT: &str = "tree";

/// A provider-defined document id, split into `kind` and `local_ref`.
///
/// The split happens on the first `:` only, so a local reference may itself
/// contain colons. Without a separator the whole id is the kind and the local
/// reference is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentId {
    raw: String,
    kind: String,
    local_ref: String,
}

impl DocumentId {
    pub fn parse(raw: &str) -> Self {
        let (kind, local_ref) = raw.split_once(':').unwrap_or((raw, ""));
        Self {
            raw: raw.to_string(),
            kind: kind.to_string(),
            local_ref: local_ref.to_string(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn local_ref(&self) -> &str {
        &self.local_ref
    }
}

/// Reads the document id out of a structured document path.
///
/// Recognises `/document/<id>` and `/tree/<tree-id>/document/<id>`.
pub fn document_id_from_path(identifier: &ResourceIdentifier) -> Option<String> {
    match identifier.segments() {
        [doc, id] if doc == DOCUMENT_SEGMENT => Some(id.clone()),
        [tree, _, doc, id] if tree == TREE_SEGMENT && doc == DOCUMENT_SEGMENT => Some(id.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifier(raw: &str) -> ResourceIdentifier {
        ResourceIdentifier::parse(raw).unwrap()
    }

    #[test]
    fn test_split_kind_and_local_ref() {
        let doc = DocumentId::parse("primary:Download/x.txt");
        assert_eq!(doc.kind(), "primary");
        assert_eq!(doc.local_ref(), "Download/x.txt");
    }

    #[test]
    fn test_split_without_separator() {
        let doc = DocumentId::parse("1234");
        assert_eq!(doc.kind(), "1234");
        assert_eq!(doc.local_ref(), "");
    }

    #[test]
    fn test_split_keeps_later_colons() {
        let doc = DocumentId::parse("raw:/storage/emulated/0/a:b.txt");
        assert_eq!(doc.kind(), "raw");
        assert_eq!(doc.local_ref(), "/storage/emulated/0/a:b.txt");
    }

    #[test]
    fn test_document_id_from_document_path() {
        let id = identifier("content://com.android.providers.media.documents/document/image%3A42");
        assert_eq!(document_id_from_path(&id), Some("image:42".to_string()));
    }

    #[test]
    fn test_document_id_from_tree_path() {
        let id = identifier(
            "content://com.android.externalstorage.documents/tree/primary%3ADCIM/document/primary%3ADCIM%2Fa.jpg",
        );
        assert_eq!(document_id_from_path(&id), Some("primary:DCIM/a.jpg".to_string()));
    }

    #[test]
    fn test_non_document_paths() {
        let id = identifier("content://media/external/images/media/42");
        assert_eq!(document_id_from_path(&id), None);

        let id = identifier("content://com.android.externalstorage.documents/tree/primary%3ADCIM");
        assert_eq!(document_id_from_path(&id), None);
    }
}

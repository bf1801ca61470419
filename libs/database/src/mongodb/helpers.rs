use mongodb::bson::{Bson, Document, doc, to_bson};
use mongodb::error::{Error, ErrorKind, WriteFailure};
use uuid::Uuid;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Encodes a UUID the same way the serde models store their `_id` and reference fields.
pub fn uuid_to_bson(id: &Uuid) -> Bson {
    to_bson(id).unwrap_or(Bson::Null)
}

/// `{ "_id": <id> }`
pub fn id_filter(id: &Uuid) -> Document {
    doc! { "_id": uuid_to_bson(id) }
}

/// True when a write was rejected by a unique index.
pub fn is_duplicate_key_error(error: &Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(ce) => ce.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_filter_matches_serde_encoding() {
        let id = Uuid::now_v7();
        let filter = id_filter(&id);
        assert_eq!(filter.get("_id"), Some(&to_bson(&id).unwrap()));
    }

    #[test]
    fn test_uuid_to_bson_is_not_null() {
        assert_ne!(uuid_to_bson(&Uuid::now_v7()), Bson::Null);
    }

    #[test]
    fn test_is_duplicate_key_error_ignores_other_errors() {
        let err = Error::custom("boom");
        assert!(!is_duplicate_key_error(&err));
    }
}

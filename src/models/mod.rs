pub mod code_file;
pub mod file_tree;
pub mod hero_slide;
pub mod project;

use bson::oid::ObjectId;
use serde::Serializer;

/// Serialize an `ObjectId` as its plain hex string.
///
/// Documents keep a native `ObjectId` for MongoDB, but API consumers expect
/// `"_id": "66f1…"` rather than the extended-JSON `{"$oid": …}` form.
/// Deserialization is untouched, so reads from the driver still work.
pub(crate) fn serialize_oid_as_hex<S>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id {
        Some(oid) => serializer.serialize_str(&oid.to_hex()),
        None => serializer.serialize_none(),
    }
}

/// Parse a path/body id into an `ObjectId`, rejecting malformed input with
/// the message the API contract promises.
pub fn parse_object_id(id: &str, what: &str) -> Result<ObjectId, crate::error::AppError> {
    ObjectId::parse_str(id)
        .map_err(|_| crate::error::AppError::BadRequest(format!("Invalid {what} ID format")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object_id_rejects_garbage() {
        assert!(parse_object_id("not-an-id", "file").is_err());
    }

    #[test]
    fn parse_object_id_accepts_hex() {
        let oid = ObjectId::new();
        assert_eq!(parse_object_id(&oid.to_hex(), "file").unwrap(), oid);
    }
}

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A stored user profile record.
///
/// `id` is assigned by the service at creation time and equals the key the
/// record is stored under; it never changes afterwards. The remaining fields
/// are opaque text with no uniqueness or format constraints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub email: String,
    pub about: String,
    /// Stored and returned verbatim. The wire format carries no protection
    /// for this field; hashing before persistence remains an open gap.
    pub secret: String,
}

/// Caller-supplied mutable fields, shared by create and update.
///
/// There is deliberately no `id` here: ids are minted by the service, and an
/// `id` key in a request body is dropped during deserialization. Update
/// replaces all four fields at once, so every field is required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInput {
    pub name: String,
    pub email: String,
    pub about: String,
    pub secret: String,
}

impl Record {
    /// Build a record from caller-supplied fields under a service-assigned id.
    pub fn from_input(id: String, input: RecordInput) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            about: input.about,
            secret: input.secret,
        }
    }
}

/// Encode a record into the field-named JSON payload stored in the hash.
///
/// Keeping the payload field-named (rather than positional) leaves stored
/// values human-inspectable and lets later schema additions ride along as
/// unknown fields.
pub fn serialize(record: &Record) -> Result<String, ModelError> {
    serde_json::to_string(record).map_err(|e| ModelError::Serialization(e.to_string()))
}

/// Decode a stored payload back into a record.
///
/// Unknown fields in the payload are ignored; a payload that cannot be
/// parsed is a `Serialization` error, which callers must keep distinct from
/// "key absent".
pub fn deserialize(payload: &str) -> Result<Record, ModelError> {
    serde_json::from_str(payload).map_err(|e| ModelError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record {
            id: "7f2d".into(),
            name: "Ann".into(),
            email: "a@x.com".into(),
            about: "hi".into(),
            secret: "p1".into(),
        }
    }

    #[test]
    fn serialize_deserialize_round_trip() {
        let r = sample();
        let payload = serialize(&r).expect("serialize");
        let back = deserialize(&payload).expect("deserialize");
        assert_eq!(back, r);
    }

    #[test]
    fn round_trip_preserves_empty_fields() {
        let r = Record { about: String::new(), secret: String::new(), ..sample() };
        let payload = serialize(&r).expect("serialize");
        assert_eq!(deserialize(&payload).expect("deserialize"), r);
    }

    #[test]
    fn deserialize_tolerates_unknown_fields() {
        let payload = r#"{"id":"7f2d","name":"Ann","email":"a@x.com","about":"hi","secret":"p1","schema_version":2}"#;
        let r = deserialize(payload).expect("deserialize");
        assert_eq!(r, sample());
    }

    #[test]
    fn deserialize_rejects_corrupt_payload() {
        let err = deserialize("not-json").expect_err("must fail");
        assert!(matches!(err, ModelError::Serialization(_)));
    }

    #[test]
    fn deserialize_rejects_missing_field() {
        let payload = r#"{"id":"7f2d","name":"Ann"}"#;
        assert!(deserialize(payload).is_err());
    }

    #[test]
    fn input_deserialization_drops_client_supplied_id() {
        let input: RecordInput =
            serde_json::from_str(r#"{"id":"client-pick","name":"Ann","email":"a@x.com","about":"hi","secret":"p1"}"#)
                .expect("parse");
        assert_eq!(input.name, "Ann");
        let record = Record::from_input("server-pick".into(), input);
        assert_eq!(record.id, "server-pick");
    }
}

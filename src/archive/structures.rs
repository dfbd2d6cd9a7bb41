use byteorder::{ByteOrder, LittleEndian};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::content_type;

/// Identifier written at the start of every `.rkyv` file
pub const MAGIC: &[u8; 4] = b"RKYV";

/// File extension used for container file names
pub const EXTENSION: &str = "rkyv";

/// Format version assigned when an archive is first finalized
pub const DEFAULT_VERSION: &str = "1.0";

/// Fixed header: magic (4 bytes) + meta pointer (8 bytes)
pub const HEADER_SIZE: usize = 12;

/// Length of an entry's SHA-256 content hash
pub const HASH_SIZE: usize = 32;

/// Fixed-size header at the start of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Length of the payload section that follows the header
    pub meta_pointer: u64,
}

impl Header {
    pub const SIZE: usize = HEADER_SIZE;

    /// Absolute offset of the JSON metadata record
    pub fn metadata_offset(&self) -> u64 {
        Self::SIZE as u64 + self.meta_pointer
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..MAGIC.len()].copy_from_slice(MAGIC);
        LittleEndian::write_u64(&mut buf[MAGIC.len()..], self.meta_pointer);
        buf
    }
}

/// In-memory model of one `.rkyv` container.
///
/// Serializes to the JSON metadata record stored at the end of the file.
/// Entry payloads are not part of that record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Archive {
    #[serde(default)]
    version: String,
    #[serde(default)]
    uuid: String,
    #[serde(rename = "date_created", default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(rename = "date_updated", default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "files", default, deserialize_with = "null_as_empty")]
    entries: Vec<Entry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    tags: Vec<String>,
    #[serde(rename = "search", default, deserialize_with = "null_as_empty")]
    search_terms: Vec<String>,
}

/// One file stored in an archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: u64,
    #[serde(with = "hash_base64")]
    pub hash: [u8; HASH_SIZE],
    #[serde(skip)]
    data: Vec<u8>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file and its contents.
    ///
    /// Content type, size and hash are derived from `data` here, once.
    pub fn add_file(&mut self, name: impl Into<String>, data: Vec<u8>) {
        let entry = Entry::new(name.into(), data);
        tracing::debug!(
            name = %entry.name,
            content_type = %entry.content_type,
            size = entry.size,
            hash = %entry.hash_hex(),
            "added file to archive"
        );
        self.entries.push(entry);
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    pub fn add_search_term(&mut self, term: impl Into<String>) {
        self.search_terms.push(term.into());
    }

    /// Populate identity and timestamps for a write at `now`.
    ///
    /// Version, uuid and creation date are only filled in when absent, so
    /// finalizing an already written archive keeps its identity. The update
    /// date always becomes `now`.
    pub fn finalized(mut self, now: DateTime<Utc>) -> Self {
        if self.version.is_empty() {
            self.version = DEFAULT_VERSION.to_string();
        }
        if self.uuid.is_empty() {
            self.uuid = Uuid::new_v4().to_string();
        }
        self.created_at.get_or_insert(now);
        self.updated_at = Some(now);
        self
    }

    /// Container file name, `<uuid>.rkyv`.
    ///
    /// The uuid is assigned by [`finalized`](Self::finalized); before that
    /// this returns a bare `.rkyv`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.uuid, EXTENSION)
    }

    /// Total length of all entry payloads, i.e. the meta pointer value
    pub fn payload_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn search_terms(&self) -> &[String] {
        &self.search_terms
    }
}

impl Entry {
    fn new(name: String, data: Vec<u8>) -> Self {
        Self {
            name,
            content_type: content_type::detect(&data).to_string(),
            size: data.len() as u64,
            hash: Sha256::digest(&data).into(),
            data,
        }
    }

    /// Payload bytes; empty for entries decoded from a container
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Hex form of the content hash
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// `files`, `tags` and `search` may be `null` in files written by older tools
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Hashes are stored as standard base64 strings
mod hash_base64 {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::HASH_SIZE;

    pub fn serialize<S: Serializer>(hash: &[u8; HASH_SIZE], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; HASH_SIZE], D::Error> {
        let encoded = String::deserialize(d)?;
        let bytes = STANDARD.decode(&encoded).map_err(D::Error::custom)?;
        <[u8; HASH_SIZE]>::try_from(bytes.as_slice())
            .map_err(|_| D::Error::invalid_length(bytes.len(), &"a 32 byte hash"))
    }
}

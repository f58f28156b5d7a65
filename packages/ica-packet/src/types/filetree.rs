//! Transaction messages of the Jackal `canine_chain.filetree` module, and the
//! path hashing used to address files in the tree.

use sha2::{Digest, Sha256};

/// Type URL of [`MsgPostKey`]
pub const MSG_POST_KEY_TYPE_URL: &str = "/canine_chain.filetree.MsgPostKey";
/// Type URL of [`MsgPostFile`]
pub const MSG_POST_FILE_TYPE_URL: &str = "/canine_chain.filetree.MsgPostFile";
/// Type URL of [`MsgDeleteFile`]
pub const MSG_DELETE_FILE_TYPE_URL: &str = "/canine_chain.filetree.MsgDeleteFile";
/// Type URL of [`MsgAddViewers`]
pub const MSG_ADD_VIEWERS_TYPE_URL: &str = "/canine_chain.filetree.MsgAddViewers";
/// Type URL of [`MsgRemoveViewers`]
pub const MSG_REMOVE_VIEWERS_TYPE_URL: &str = "/canine_chain.filetree.MsgRemoveViewers";
/// Type URL of [`MsgResetViewers`]
pub const MSG_RESET_VIEWERS_TYPE_URL: &str = "/canine_chain.filetree.MsgResetViewers";
/// Type URL of [`MsgAddEditors`]
pub const MSG_ADD_EDITORS_TYPE_URL: &str = "/canine_chain.filetree.MsgAddEditors";
/// Type URL of [`MsgRemoveEditors`]
pub const MSG_REMOVE_EDITORS_TYPE_URL: &str = "/canine_chain.filetree.MsgRemoveEditors";
/// Type URL of [`MsgResetEditors`]
pub const MSG_RESET_EDITORS_TYPE_URL: &str = "/canine_chain.filetree.MsgResetEditors";
/// Type URL of [`MsgProvisionFileTree`]
pub const MSG_PROVISION_FILE_TREE_TYPE_URL: &str = "/canine_chain.filetree.MsgProvisionFileTree";
/// Type URL of [`MsgChangeOwner`]
pub const MSG_CHANGE_OWNER_TYPE_URL: &str = "/canine_chain.filetree.MsgChangeOwner";

/// Publishes the account's public key to the filetree.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct MsgPostKey {
    /// The key owner
    #[prost(string, tag = "1")]
    pub creator: String,
    /// Hex encoded public key
    #[prost(string, tag = "2")]
    pub key: String,
}

/// Creates a file entry under a parent path.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct MsgPostFile {
    /// The file owner
    #[prost(string, tag = "1")]
    pub creator: String,
    /// Hashed account of the owner
    #[prost(string, tag = "2")]
    pub account: String,
    /// Merkle hash of the parent path
    #[prost(string, tag = "3")]
    pub hash_parent: String,
    /// Hash of the child name
    #[prost(string, tag = "4")]
    pub hash_child: String,
    /// File contents descriptor
    #[prost(string, tag = "5")]
    pub contents: String,
    /// JSON map of viewer keys
    #[prost(string, tag = "6")]
    pub viewers: String,
    /// JSON map of editor keys
    #[prost(string, tag = "7")]
    pub editors: String,
    /// Client supplied tracking id
    #[prost(string, tag = "8")]
    pub tracking_number: String,
}

/// Removes a file entry.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct MsgDeleteFile {
    /// The file owner
    #[prost(string, tag = "1")]
    pub creator: String,
    /// Merkle hash of the file path
    #[prost(string, tag = "2")]
    pub hash_path: String,
    /// Hashed account of the owner
    #[prost(string, tag = "3")]
    pub account: String,
}

/// Grants read access to a file.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct MsgAddViewers {
    /// The file owner
    #[prost(string, tag = "1")]
    pub creator: String,
    /// Comma separated hashed viewer ids
    #[prost(string, tag = "2")]
    pub viewer_ids: String,
    /// Comma separated encrypted file keys, one per viewer
    #[prost(string, tag = "3")]
    pub viewer_keys: String,
    /// Merkle hash of the file path
    #[prost(string, tag = "4")]
    pub address: String,
    /// Hashed account of the owner
    #[prost(string, tag = "5")]
    pub file_owner: String,
}

/// Revokes read access to a file.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct MsgRemoveViewers {
    /// The file owner
    #[prost(string, tag = "1")]
    pub creator: String,
    /// Comma separated hashed viewer ids
    #[prost(string, tag = "2")]
    pub viewer_ids: String,
    /// Merkle hash of the file path
    #[prost(string, tag = "3")]
    pub address: String,
    /// Hashed account of the owner
    #[prost(string, tag = "4")]
    pub file_owner: String,
}

/// Revokes read access from every viewer but the owner.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct MsgResetViewers {
    /// The file owner
    #[prost(string, tag = "1")]
    pub creator: String,
    /// Merkle hash of the file path
    #[prost(string, tag = "2")]
    pub address: String,
    /// Hashed account of the owner
    #[prost(string, tag = "3")]
    pub file_owner: String,
}

/// Grants write access to a file.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct MsgAddEditors {
    /// The file owner
    #[prost(string, tag = "1")]
    pub creator: String,
    /// Comma separated hashed editor ids
    #[prost(string, tag = "2")]
    pub editor_ids: String,
    /// Comma separated encrypted file keys, one per editor
    #[prost(string, tag = "3")]
    pub editor_keys: String,
    /// Merkle hash of the file path
    #[prost(string, tag = "4")]
    pub address: String,
    /// Hashed account of the owner
    #[prost(string, tag = "5")]
    pub file_owner: String,
}

/// Revokes write access to a file.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct MsgRemoveEditors {
    /// The file owner
    #[prost(string, tag = "1")]
    pub creator: String,
    /// Comma separated hashed editor ids
    #[prost(string, tag = "2")]
    pub editor_ids: String,
    /// Merkle hash of the file path
    #[prost(string, tag = "3")]
    pub address: String,
    /// Hashed account of the owner
    #[prost(string, tag = "4")]
    pub file_owner: String,
}

/// Revokes write access from every editor but the owner.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct MsgResetEditors {
    /// The file owner
    #[prost(string, tag = "1")]
    pub creator: String,
    /// Merkle hash of the file path
    #[prost(string, tag = "2")]
    pub address: String,
    /// Hashed account of the owner
    #[prost(string, tag = "3")]
    pub file_owner: String,
}

/// Creates the root of an account's file tree.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct MsgProvisionFileTree {
    /// The account provisioning its tree
    #[prost(string, tag = "1")]
    pub creator: String,
    /// JSON map of editor keys
    #[prost(string, tag = "2")]
    pub editors: String,
    /// JSON map of viewer keys
    #[prost(string, tag = "3")]
    pub viewers: String,
    /// Client supplied tracking id
    #[prost(string, tag = "4")]
    pub tracking_number: String,
}

/// Hands a file over to another account.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct MsgChangeOwner {
    /// The current owner
    #[prost(string, tag = "1")]
    pub creator: String,
    /// Merkle hash of the file path
    #[prost(string, tag = "2")]
    pub address: String,
    /// Hashed account of the current owner
    #[prost(string, tag = "3")]
    pub file_owner: String,
    /// The new owner
    #[prost(string, tag = "4")]
    pub new_owner: String,
}

/// Hex encoded SHA-256 of `input`.
///
/// Used for hashed accounts, viewer ids and child names.
#[must_use]
pub fn hash_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// The merkle hash of a `/` separated path, as the filetree module computes
/// it. A trailing `/` is ignored.
///
/// Each segment folds into the running hash as
/// `hash_hex(running ++ hash_hex(segment))`, starting from the empty string.
#[must_use]
pub fn merkle_path(path: &str) -> String {
    path.trim_end_matches('/')
        .split('/')
        .fold(String::new(), |total, segment| {
            hash_hex(&format!("{total}{}", hash_hex(segment)))
        })
}

/// Splits `path` into the `hash_parent` and `hash_child` fields of
/// [`MsgPostFile`]: the merkle hash of the parent path and the hash of the last
/// segment.
#[must_use]
pub fn parent_and_child_hashes(path: &str) -> (String, String) {
    let path = path.trim_end_matches('/');
    let (parent, child) = path.rsplit_once('/').unwrap_or(("", path));

    (merkle_path(parent), hash_hex(child))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_hash_hex() {
        assert_eq!(
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            hash_hex("")
        );
        assert_eq!(
            "1b99395b2df86d02b01fa00c1e39f481bbc66acd80017555004f5c8ee30affd6",
            hash_hex("jackal")
        );
    }

    #[rstest]
    #[case::root("s", "49393f93b5fe69febf59ca052588a63bb4ac6d933462d390026ba1c9a7bb8e44")]
    #[case::nested("s/home", "44dd8e232b2c5d253c41748e71d4fb243e2ce36fa18f2f59701cd37d1d08ca3c")]
    #[case::trailing_slash("s/home/", "44dd8e232b2c5d253c41748e71d4fb243e2ce36fa18f2f59701cd37d1d08ca3c")]
    fn test_merkle_path(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(expected, merkle_path(path));
    }

    #[test]
    fn test_parent_and_child_hashes() {
        let (parent, child) = parent_and_child_hashes("s/home/docs/");
        assert_eq!(merkle_path("s/home"), parent);
        assert_eq!(hash_hex("docs"), child);

        // the child of a top level path hangs off the empty parent
        let (parent, child) = parent_and_child_hashes("s");
        assert_eq!(merkle_path(""), parent);
        assert_eq!(hash_hex("s"), child);
    }

    #[test]
    fn test_post_file_addresses_child_of_parent() {
        let (hash_parent, hash_child) = parent_and_child_hashes("s/home/notes.txt");
        let msg = MsgPostFile {
            creator: "jkl1ica".to_string(),
            account: hash_hex("jkl1ica"),
            hash_parent,
            hash_child,
            ..Default::default()
        };

        // the file's own address is the merkle hash of its full path
        assert_eq!(
            merkle_path("s/home/notes.txt"),
            hash_hex(&format!("{}{}", msg.hash_parent, msg.hash_child))
        );
    }
}

//! Exit codes for flowerctl

use flowerengine::MetadataError;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when no node could be recommended
pub const EXIT_NO_RECOMMENDATION: i32 = 2;

/// Exit code when the account does not exist or carries no metadata
pub const EXIT_ACCOUNT_UNUSABLE: i32 = 66;

/// Exit code when the published metadata is not a valid node document
pub const EXIT_INVALID_METADATA: i32 = 65;

/// Exit code when the Hive API could not be reached
pub const EXIT_LOOKUP_UNAVAILABLE: i32 = 69;

/// Map an error to the process exit code
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<MetadataError>() {
        Some(MetadataError::AccountNotFound { .. } | MetadataError::EmptyMetadata { .. }) => {
            EXIT_ACCOUNT_UNUSABLE
        }
        Some(
            MetadataError::MalformedMetadata { .. } | MetadataError::InvalidMetadataShape { .. },
        ) => EXIT_INVALID_METADATA,
        Some(MetadataError::Lookup { .. }) => EXIT_LOOKUP_UNAVAILABLE,
        None => EXIT_GENERAL_ERROR,
    }
}

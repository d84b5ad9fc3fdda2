use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

use crate::dao::storage::StorageError;

/// Result alias for MongoDB dao operations.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failure of a single MongoDB dao operation, carrying the driver error.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("missing required environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save game `{id}`")]
    SaveGame {
        id: i64,
        #[source]
        source: MongoError,
    },
    #[error("failed to list games for game day `{day}`")]
    ListGames {
        day: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to save day report `{day}`")]
    SaveDayReport {
        day: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to load day report `{day}`")]
    LoadDayReport {
        day: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to save pick set `{id}` for game day `{day}`")]
    SavePickSet {
        id: Uuid,
        day: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to list pick sets for game day `{day}`")]
    ListPickSets {
        day: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to list pick sets for season `{season}`")]
    ListSeasonPickSets {
        season: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to save day results `{day}`")]
    SaveDayResults {
        day: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to load day results `{day}`")]
    LoadDayResults {
        day: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to save leaderboard `{season}`")]
    SaveLeaderboard {
        season: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to load leaderboard `{season}`")]
    LoadLeaderboard {
        season: String,
        #[source]
        source: MongoError,
    },
}

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        let message = err.to_string();
        StorageError::Unavailable {
            message,
            source: Box::new(err),
        }
    }
}

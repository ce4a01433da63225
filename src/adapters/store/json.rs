use crate::{
    adapters::store::memory::{MemoryStore, Records},
    domain::{Club, Competition},
    ports::store::{Error, StorePort},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Whether bookings are written back to the record files
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PersistMode {
    /// Rewrite both files after every booking
    #[default]
    Enabled,
    /// Keep changes in memory only, e.g. in tests
    Disabled,
}

/// Store backed by a `clubs.json` and a `competitions.json` file
///
/// Records are read once when opening the store and served from memory afterwards. Every saved
/// booking rewrites both files in full.
#[derive(Clone, Debug)]
pub struct JsonStore {
    records: MemoryStore,
    clubs_path: PathBuf,
    competitions_path: PathBuf,
    mode: PersistMode,
}

impl JsonStore {
    pub async fn open(
        clubs_path: impl Into<PathBuf>,
        competitions_path: impl Into<PathBuf>,
        mode: PersistMode,
    ) -> Result<Self, Error> {
        let clubs_path = clubs_path.into();
        let competitions_path = competitions_path.into();

        let clubs: ClubsFile = read_json(&clubs_path).await?;
        let competitions: CompetitionsFile = read_json(&competitions_path).await?;
        tracing::info!(
            clubs = clubs.clubs.len(),
            competitions = competitions.competitions.len(),
            ?mode,
            "loaded records"
        );

        Ok(Self {
            records: MemoryStore::new(
                clubs.clubs.into_iter().map(Into::into).collect(),
                competitions.competitions.into_iter().map(Into::into).collect(),
            ),
            clubs_path,
            competitions_path,
            mode,
        })
    }

    /// Write `next` to both record files, or leave both files as they were
    ///
    /// Each file is staged next to its target and renamed into place. If the competitions file
    /// cannot be replaced, the clubs file is put back from `previous`.
    async fn write_all(&self, previous: &Records, next: &Records) -> Result<(), FileError> {
        let clubs_staged = stage_json(&self.clubs_path, &ClubsFile::from(next)).await?;
        let competitions_staged =
            match stage_json(&self.competitions_path, &CompetitionsFile::from(next)).await {
                Ok(staged) => staged,
                Err(err) => {
                    discard(&clubs_staged).await;
                    return Err(err);
                }
            };

        if let Err(err) = commit(&clubs_staged, &self.clubs_path).await {
            discard(&clubs_staged).await;
            discard(&competitions_staged).await;
            return Err(err);
        }
        if let Err(err) = commit(&competitions_staged, &self.competitions_path).await {
            discard(&competitions_staged).await;
            if let Err(restore_err) = self.restore_clubs(previous).await {
                tracing::error!(%restore_err, "clubs file no longer matches competitions file");
            }
            return Err(err);
        }

        tracing::debug!(
            clubs = %self.clubs_path.display(),
            competitions = %self.competitions_path.display(),
            "records written"
        );
        Ok(())
    }

    async fn restore_clubs(&self, previous: &Records) -> Result<(), FileError> {
        let staged = stage_json(&self.clubs_path, &ClubsFile::from(previous)).await?;
        commit(&staged, &self.clubs_path).await
    }
}

#[async_trait::async_trait]
impl StorePort for JsonStore {
    async fn list_clubs(&self) -> Result<Vec<Club>, Error> {
        self.records.list_clubs().await
    }

    async fn list_competitions(&self) -> Result<Vec<Competition>, Error> {
        self.records.list_competitions().await
    }

    async fn find_club_by_email(&self, email: &str) -> Result<Option<Club>, Error> {
        self.records.find_club_by_email(email).await
    }

    async fn find_club_by_name(&self, name: &str) -> Result<Option<Club>, Error> {
        self.records.find_club_by_name(name).await
    }

    async fn find_competition_by_name(&self, name: &str) -> Result<Option<Competition>, Error> {
        self.records.find_competition_by_name(name).await
    }

    async fn save_booking(&self, club: Club, competition: Competition) -> Result<(), Error> {
        let previous = self.records.snapshot()?;
        let mut next = previous.clone();
        next.apply_booking(club, competition)?;

        // Memory only changes once the files hold the booking
        match self.mode {
            PersistMode::Enabled => self.write_all(&previous, &next).await?,
            PersistMode::Disabled => {
                tracing::debug!("persistence disabled, records kept in memory");
            }
        }

        self.records.replace(next)
    }
}

/// Format of competition dates in the record files
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize, Serialize)]
struct ClubsFile {
    clubs: Vec<ClubRecord>,
}

#[derive(Debug, Deserialize, Serialize)]
struct CompetitionsFile {
    competitions: Vec<CompetitionRecord>,
}

#[derive(Debug, Deserialize, Serialize)]
struct ClubRecord {
    name: String,
    email: String,
    #[serde(deserialize_with = "count")]
    points: u32,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompetitionRecord {
    name: String,
    #[serde(with = "record_date")]
    date: NaiveDateTime,
    #[serde(deserialize_with = "count")]
    number_of_places: u32,
}

impl From<&Records> for ClubsFile {
    fn from(records: &Records) -> Self {
        Self {
            clubs: records.clubs.iter().map(Into::into).collect(),
        }
    }
}

impl From<&Records> for CompetitionsFile {
    fn from(records: &Records) -> Self {
        Self {
            competitions: records.competitions.iter().map(Into::into).collect(),
        }
    }
}

impl From<ClubRecord> for Club {
    fn from(record: ClubRecord) -> Self {
        Club::new(record.name, record.email, record.points)
    }
}

impl From<&Club> for ClubRecord {
    fn from(club: &Club) -> Self {
        Self {
            name: club.name.clone(),
            email: club.email.clone(),
            points: club.points(),
        }
    }
}

impl From<CompetitionRecord> for Competition {
    fn from(record: CompetitionRecord) -> Self {
        Competition::new(record.name, record.date, record.number_of_places)
    }
}

impl From<&Competition> for CompetitionRecord {
    fn from(competition: &Competition) -> Self {
        Self {
            name: competition.name.clone(),
            date: competition.date,
            number_of_places: competition.number_of_places(),
        }
    }
}

/// Read a count stored either as a JSON number or as a string holding one
fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u32),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(count) => Ok(count),
        Count::Text(text) => text.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("expected a non-negative integer, got {text:?}"))
        }),
    }
}

mod record_date {
    use super::DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Error reading or writing a record file
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed records in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<FileError> for Error {
    fn from(err: FileError) -> Self {
        Self::Adapter(Box::new(err))
    }
}

async fn read_json<T>(path: &Path) -> Result<T, FileError>
where
    T: serde::de::DeserializeOwned,
{
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&content).map_err(|source| FileError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Path next to `path` where its new content is written before replacing it
fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Write `value` to the staging file of `path`, and return the staging path
async fn stage_json<T>(path: &Path, value: &T) -> Result<PathBuf, FileError>
where
    T: Serialize,
{
    let mut content = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|source| FileError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let staged = staging_path(path);
    tokio::fs::write(&staged, content)
        .await
        .map_err(|source| FileError::Io {
            path: staged.clone(),
            source,
        })?;

    Ok(staged)
}

async fn commit(staged: &Path, path: &Path) -> Result<(), FileError> {
    tokio::fs::rename(staged, path)
        .await
        .map_err(|source| FileError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn discard(staged: &Path) {
    if let Err(err) = tokio::fs::remove_file(staged).await {
        tracing::warn!(path = %staged.display(), %err, "could not remove staged records");
    }
}

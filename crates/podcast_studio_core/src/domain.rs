//! crates/podcast_studio_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage backend or transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

//=========================================================================================
// Projects
//=========================================================================================

/// The top-level container. Owns its documents and generations exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub documents: Vec<Document>,
    pub generations: Vec<AudioGeneration>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            documents: Vec::new(),
            generations: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refreshes `updated_at`. Called on every mutation of the project or a child.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn ready_documents(&self) -> impl Iterator<Item = &Document> {
        self.documents
            .iter()
            .filter(|d| d.status == DocumentStatus::Ready)
    }
}

/// Fields of a project that may be changed after creation.
/// A `None` field leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
}

//=========================================================================================
// Documents
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Uploading,
    Processing,
    Ready,
    Error,
}

impl DocumentStatus {
    fn rank(self) -> u8 {
        match self {
            Self::Uploading => 0,
            Self::Processing => 1,
            Self::Ready => 2,
            Self::Error => 3,
        }
    }

    /// Forward-only lifecycle. `Error` is reachable from anywhere and is final.
    pub fn can_transition_to(self, next: DocumentStatus) -> bool {
        match (self, next) {
            (Self::Error, next) => next == Self::Error,
            (_, Self::Error) => true,
            (current, next) => next.rank() >= current.rank(),
        }
    }
}

/// An uploaded source file and its processing status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub content: Option<String>,
    pub preview: Option<String>,
    pub status: DocumentStatus,
    /// Single authoritative upload progress (0-100).
    pub upload_progress: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn from_file(file: &FileDescriptor) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.size,
            content: None,
            preview: None,
            status: DocumentStatus::Uploading,
            upload_progress: Some(0),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentUpdate {
    pub status: Option<DocumentStatus>,
    pub upload_progress: Option<u8>,
    pub content: Option<String>,
    pub preview: Option<String>,
}

/// Describes a file offered for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }

    /// Infers the MIME type from the file extension.
    pub fn from_name(name: impl Into<String>, size: u64) -> Self {
        let mut file = Self::new(name, "application/octet-stream", size);
        if let Some(format) = file
            .extension()
            .and_then(|ext| DocumentFormat::ALL.into_iter().find(|f| f.extension() == ext))
        {
            file.mime_type = format.mime_type().to_string();
        }
        file
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// The document formats the studio accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    PlainText,
    Docx,
    Markdown,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 4] = [
        DocumentFormat::Pdf,
        DocumentFormat::PlainText,
        DocumentFormat::Docx,
        DocumentFormat::Markdown,
    ];

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::PlainText => "text/plain",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Markdown => "text/markdown",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::PlainText => "txt",
            Self::Docx => "docx",
            Self::Markdown => "md",
        }
    }

    /// Matches on MIME type first, then on the file extension.
    pub fn detect(file: &FileDescriptor) -> Option<Self> {
        let mime = file.mime_type.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.mime_type() == mime)
            .or_else(|| {
                let ext = file.extension()?;
                Self::ALL.into_iter().find(|format| format.extension() == ext)
            })
    }
}

//=========================================================================================
// Personas
//=========================================================================================

/// A named AI discussion participant profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub role: String,
    pub voice_id: String,
    pub personality: String,
    pub speaking_style: String,
    pub avatar: String,
    #[serde(default)]
    pub is_custom: bool,
}

impl Persona {
    /// Builds a user-defined persona with a fresh id.
    pub fn custom(
        name: impl Into<String>,
        role: impl Into<String>,
        voice_id: impl Into<String>,
        personality: impl Into<String>,
        speaking_style: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("custom-{}", Uuid::new_v4()),
            name: name.into(),
            role: role.into(),
            voice_id: voice_id.into(),
            personality: personality.into(),
            speaking_style: speaking_style.into(),
            avatar: avatar.into(),
            is_custom: true,
        }
    }
}

//=========================================================================================
// Generation Settings
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationBucket {
    #[serde(rename = "5-10")]
    FiveToTen,
    #[serde(rename = "10-15")]
    TenToFifteen,
    #[serde(rename = "15-20")]
    FifteenToTwenty,
}

impl DurationBucket {
    /// Target length range in minutes.
    pub fn minutes(self) -> (u32, u32) {
        match self {
            Self::FiveToTen => (5, 10),
            Self::TenToFifteen => (10, 15),
            Self::FifteenToTwenty => (15, 20),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Educational,
    Entertaining,
    Balanced,
    Debate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    Inline,
    Endnotes,
    Timestamps,
}

/// User-chosen parameters for one generation, snapshotted into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub duration: DurationBucket,
    /// Speaking order. An empty list asks the store to pick personas.
    pub personas: Vec<Persona>,
    pub tone: Tone,
    pub focus_areas: Vec<String>,
    pub include_intro: bool,
    pub include_outro: bool,
    pub background_music: bool,
    pub citation_style: CitationStyle,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            duration: DurationBucket::TenToFifteen,
            personas: Vec::new(),
            tone: Tone::Balanced,
            focus_areas: Vec::new(),
            include_intro: true,
            include_outro: true,
            background_music: false,
            citation_style: CitationStyle::Inline,
        }
    }
}

//=========================================================================================
// Audio Generations
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl GenerationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    fn rank(self) -> u8 {
        match self {
            Self::Queued => 0,
            Self::Processing => 1,
            Self::Completed | Self::Failed => 2,
        }
    }

    /// Nothing leaves a terminal state; otherwise status only moves forward.
    pub fn can_transition_to(self, next: GenerationStatus) -> bool {
        !self.is_terminal() && next.rank() >= self.rank()
    }
}

/// One request to produce a podcast, and its lifecycle and output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioGeneration {
    pub id: Uuid,
    pub project_id: Uuid,
    pub status: GenerationStatus,
    pub progress: u8,
    pub current_step: String,
    /// Seconds remaining.
    pub estimated_time: Option<u32>,
    pub audio_url: Option<String>,
    pub transcript_url: Option<String>,
    /// Length of the finished audio in seconds.
    pub duration: Option<u32>,
    pub settings: GenerationSettings,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationUpdate {
    pub status: Option<GenerationStatus>,
    pub progress: Option<u8>,
    pub current_step: Option<String>,
    pub estimated_time: Option<u32>,
    pub audio_url: Option<String>,
    pub transcript_url: Option<String>,
    pub duration: Option<u32>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl GenerationUpdate {
    /// A terminal failure update carrying the reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            status: Some(GenerationStatus::Failed),
            current_step: Some(format!("Failed: {}", reason)),
            completed_at: Some(Utc::now()),
            error_message: Some(reason),
            ..Default::default()
        }
    }
}

//! crates/podcast_studio_core/src/store.rs
//!
//! The single source of truth for all projects. Every mutation goes through a
//! named operation on `Store`; a rejected operation returns a `StoreError` and
//! leaves the state exactly as it was.
//!
//! The "current project" is kept as an id into the canonical collection, so
//! there is only ever one copy of a project to update.

use crate::domain::{
    AudioGeneration, Document, DocumentFormat, DocumentUpdate, FileDescriptor, GenerationSettings,
    GenerationStatus, GenerationUpdate, Persona, Project, ProjectUpdate,
};
use crate::error::{StoreError, StoreResult};
use crate::personas;
use chrono::Utc;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The fewest personas a discussion can have.
pub const MIN_PERSONAS: usize = 2;
pub const DEFAULT_MAX_PERSONAS: usize = 3;
/// 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
pub const INITIAL_GENERATION_STEP: &str = "Initializing...";

//=========================================================================================
// Store Configuration
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub max_personas: usize,
    pub max_file_size: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_personas: DEFAULT_MAX_PERSONAS,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

//=========================================================================================
// The Store
//=========================================================================================

#[derive(Debug, Default)]
pub struct Store {
    config: StoreConfig,
    projects: Vec<Project>,
    current_project_id: Option<Uuid>,
}

impl Store {
    /// A `max_personas` below the two-persona minimum is raised to it.
    pub fn new(mut config: StoreConfig) -> Self {
        if config.max_personas < MIN_PERSONAS {
            warn!(
                requested = config.max_personas,
                "max_personas raised to {}", MIN_PERSONAS
            );
            config.max_personas = MIN_PERSONAS;
        }
        Self {
            config,
            projects: Vec::new(),
            current_project_id: None,
        }
    }

    // --- Queries ---

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: Uuid) -> StoreResult<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or(StoreError::ProjectNotFound(id))
    }

    pub fn current_project(&self) -> Option<&Project> {
        let id = self.current_project_id?;
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn document(&self, project_id: Uuid, document_id: Uuid) -> StoreResult<&Document> {
        self.project(project_id)?
            .documents
            .iter()
            .find(|d| d.id == document_id)
            .ok_or(StoreError::DocumentNotFound(document_id))
    }

    pub fn generation(
        &self,
        project_id: Uuid,
        generation_id: Uuid,
    ) -> StoreResult<&AudioGeneration> {
        self.project(project_id)?
            .generations
            .iter()
            .find(|g| g.id == generation_id)
            .ok_or(StoreError::GenerationNotFound(generation_id))
    }

    /// The upload progress of a document in any project, if it is tracked.
    pub fn upload_progress(&self, document_id: Uuid) -> Option<u8> {
        self.projects
            .iter()
            .flat_map(|p| p.documents.iter())
            .find(|d| d.id == document_id)
            .and_then(|d| d.upload_progress)
    }

    /// True while any generation is queued or processing.
    pub fn is_generating(&self) -> bool {
        self.projects
            .iter()
            .flat_map(|p| p.generations.iter())
            .any(|g| !g.status.is_terminal())
    }

    /// Checks the preconditions for starting a generation: a ready document,
    /// a valid cast, and no generation already running.
    pub fn can_generate(&self, project_id: Uuid, settings: &GenerationSettings) -> StoreResult<()> {
        let project = self.project(project_id)?;
        if project.ready_documents().next().is_none() {
            return Err(StoreError::NoReadyDocuments(project_id));
        }
        if !settings.personas.is_empty() {
            validate_cast(&settings.personas, self.config.max_personas)?;
        }
        if self.is_generating() {
            return Err(StoreError::GenerationInProgress);
        }
        Ok(())
    }

    fn project_mut(&mut self, id: Uuid) -> StoreResult<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::ProjectNotFound(id))
    }

    // --- Projects ---

    /// Creates a project with empty document and generation lists and makes it current.
    pub fn create_project(&mut self, name: &str, description: Option<&str>) -> StoreResult<Project> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        let project = Project::new(name.to_string(), description.map(str::to_string));
        info!(project_id = %project.id, name = %project.name, "Project created");
        self.current_project_id = Some(project.id);
        self.projects.push(project.clone());
        Ok(project)
    }

    pub fn set_current_project(&mut self, id: Option<Uuid>) -> StoreResult<()> {
        if let Some(id) = id {
            self.project(id)?;
        }
        self.current_project_id = id;
        Ok(())
    }

    pub fn update_project(&mut self, id: Uuid, update: ProjectUpdate) -> StoreResult<Project> {
        let name = match update.name {
            Some(name) if name.trim().is_empty() => return Err(StoreError::EmptyName),
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };

        let project = self.project_mut(id)?;
        if let Some(name) = name {
            project.name = name;
        }
        if let Some(description) = update.description {
            project.description = description;
        }
        project.touch();
        Ok(project.clone())
    }

    /// Removes a project together with its documents and generations.
    pub fn delete_project(&mut self, id: Uuid) -> StoreResult<Project> {
        let index = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::ProjectNotFound(id))?;
        let removed = self.projects.remove(index);
        if self.current_project_id == Some(id) {
            self.current_project_id = None;
        }
        info!(project_id = %id, "Project deleted");
        Ok(removed)
    }

    // --- Documents ---

    /// Accepts a file into a project. The document starts out `uploading` at 0%.
    pub fn add_document(&mut self, project_id: Uuid, file: &FileDescriptor) -> StoreResult<Document> {
        let max_file_size = self.config.max_file_size;
        let project = self.project_mut(project_id)?;

        if DocumentFormat::detect(file).is_none() {
            return Err(StoreError::UnsupportedFormat {
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            });
        }
        if file.size > max_file_size {
            return Err(StoreError::FileTooLarge {
                name: file.name.clone(),
                size: file.size,
                max: max_file_size,
            });
        }

        let document = Document::from_file(file);
        debug!(%project_id, document_id = %document.id, name = %document.name, "Document added");
        project.documents.push(document.clone());
        project.touch();
        Ok(document)
    }

    pub fn update_document(
        &mut self,
        project_id: Uuid,
        document_id: Uuid,
        update: DocumentUpdate,
    ) -> StoreResult<Document> {
        let project = self.project_mut(project_id)?;
        let document = project
            .documents
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or(StoreError::DocumentNotFound(document_id))?;

        if let Some(next) = update.status {
            if !document.status.can_transition_to(next) {
                return Err(StoreError::InvalidDocumentTransition {
                    from: document.status,
                    to: next,
                });
            }
        }
        if let Some(progress) = update.upload_progress {
            check_percent(progress)?;
        }

        if let Some(status) = update.status {
            if status != document.status {
                debug!(%document_id, from = ?document.status, to = ?status, "Document status changed");
            }
            document.status = status;
        }
        if let Some(progress) = update.upload_progress {
            document.upload_progress = Some(progress);
        }
        if let Some(content) = update.content {
            document.content = Some(content);
        }
        if let Some(preview) = update.preview {
            document.preview = Some(preview);
        }
        let updated = document.clone();
        project.touch();
        Ok(updated)
    }

    pub fn remove_document(&mut self, project_id: Uuid, document_id: Uuid) -> StoreResult<Document> {
        let project = self.project_mut(project_id)?;
        let index = project
            .documents
            .iter()
            .position(|d| d.id == document_id)
            .ok_or(StoreError::DocumentNotFound(document_id))?;
        let removed = project.documents.remove(index);
        project.touch();
        debug!(%project_id, %document_id, "Document removed");
        Ok(removed)
    }

    pub fn set_upload_progress(&mut self, document_id: Uuid, percent: u8) -> StoreResult<()> {
        check_percent(percent)?;
        self.with_document_mut(document_id, |document| {
            document.upload_progress = Some(percent)
        })
    }

    pub fn clear_upload_progress(&mut self, document_id: Uuid) -> StoreResult<()> {
        self.with_document_mut(document_id, |document| document.upload_progress = None)
    }

    fn with_document_mut(
        &mut self,
        document_id: Uuid,
        apply: impl FnOnce(&mut Document),
    ) -> StoreResult<()> {
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.documents.iter().any(|d| d.id == document_id))
            .ok_or(StoreError::DocumentNotFound(document_id))?;
        if let Some(document) = project.documents.iter_mut().find(|d| d.id == document_id) {
            apply(document);
        }
        project.touch();
        Ok(())
    }

    // --- Generations ---

    /// Queues a new generation. An empty persona list is filled with two random
    /// catalog personas. Ready documents are the caller's responsibility; see
    /// [`Store::can_generate`].
    pub fn start_generation(
        &mut self,
        project_id: Uuid,
        mut settings: GenerationSettings,
    ) -> StoreResult<AudioGeneration> {
        let max_personas = self.config.max_personas;
        let project = self.project_mut(project_id)?;

        if settings.personas.is_empty() {
            settings.personas = personas::random_personas(MIN_PERSONAS);
        } else {
            validate_cast(&settings.personas, max_personas)?;
        }

        let generation = AudioGeneration {
            id: Uuid::new_v4(),
            project_id,
            status: GenerationStatus::Queued,
            progress: 0,
            current_step: INITIAL_GENERATION_STEP.to_string(),
            estimated_time: None,
            audio_url: None,
            transcript_url: None,
            duration: None,
            settings,
            created_at: Utc::now(),
            completed_at: None,
            error_message: None,
        };
        info!(%project_id, generation_id = %generation.id, "Generation queued");
        project.generations.push(generation.clone());
        project.touch();
        Ok(generation)
    }

    pub fn update_generation(
        &mut self,
        project_id: Uuid,
        generation_id: Uuid,
        update: GenerationUpdate,
    ) -> StoreResult<AudioGeneration> {
        let project = self.project_mut(project_id)?;
        let generation = project
            .generations
            .iter_mut()
            .find(|g| g.id == generation_id)
            .ok_or(StoreError::GenerationNotFound(generation_id))?;

        let next_status = update.status.unwrap_or(generation.status);
        if !generation.status.can_transition_to(next_status) {
            return Err(StoreError::InvalidGenerationTransition {
                from: generation.status,
                to: next_status,
            });
        }
        if let Some(progress) = update.progress {
            check_percent(progress)?;
            if progress < generation.progress {
                return Err(StoreError::ProgressRegression {
                    from: generation.progress,
                    to: progress,
                });
            }
            generation.progress = progress;
        }

        generation.status = next_status;
        if let Some(step) = update.current_step {
            generation.current_step = step;
        }
        if let Some(estimated) = update.estimated_time {
            generation.estimated_time = Some(estimated);
        }
        if let Some(url) = update.audio_url {
            generation.audio_url = Some(url);
        }
        if let Some(url) = update.transcript_url {
            generation.transcript_url = Some(url);
        }
        if let Some(duration) = update.duration {
            generation.duration = Some(duration);
        }
        if let Some(message) = update.error_message {
            generation.error_message = Some(message);
        }
        if let Some(at) = update.completed_at {
            generation.completed_at = Some(at);
        }
        if next_status.is_terminal() {
            generation.estimated_time = None;
            generation.completed_at.get_or_insert_with(Utc::now);
            info!(%generation_id, status = ?next_status, "Generation finished");
        }

        let updated = generation.clone();
        project.touch();
        Ok(updated)
    }
}

fn check_percent(percent: u8) -> StoreResult<()> {
    if percent > 100 {
        return Err(StoreError::InvalidProgress(percent));
    }
    Ok(())
}

/// A cast has between `MIN_PERSONAS` and `max` speakers, none repeated.
fn validate_cast(cast: &[Persona], max: usize) -> StoreResult<()> {
    let count = cast.len();
    if !(MIN_PERSONAS..=max).contains(&count) {
        return Err(StoreError::InvalidPersonaCount {
            count,
            min: MIN_PERSONAS,
            max,
        });
    }
    let mut seen = HashSet::with_capacity(count);
    if let Some(repeated) = cast.iter().find(|p| !seen.insert(p.id.as_str())) {
        return Err(StoreError::DuplicatePersona(repeated.id.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentStatus;
    use std::thread::sleep;
    use std::time::Duration;

    fn research_store() -> (Store, Uuid) {
        let mut store = Store::default();
        let project = store.create_project("Research", None).unwrap();
        (store, project.id)
    }

    fn ready_document(store: &mut Store, project_id: Uuid) -> Document {
        let document = store
            .add_document(
                project_id,
                &FileDescriptor::new("paper.pdf", "application/pdf", 500_000),
            )
            .unwrap();
        store
            .update_document(
                project_id,
                document.id,
                DocumentUpdate {
                    status: Some(DocumentStatus::Ready),
                    upload_progress: Some(100),
                    ..Default::default()
                },
            )
            .unwrap()
    }

    #[test]
    fn create_project_becomes_current_with_empty_lists() {
        let (store, project_id) = research_store();
        let current = store.current_project().unwrap();
        assert_eq!(current.id, project_id);
        assert_eq!(current.name, "Research");
        assert!(current.documents.is_empty());
        assert!(current.generations.is_empty());
        assert_eq!(store.projects().len(), 1);
    }

    #[test]
    fn create_project_rejects_blank_name() {
        let mut store = Store::default();
        assert_eq!(store.create_project("   ", None), Err(StoreError::EmptyName));
        assert!(store.projects().is_empty());
        assert!(store.current_project().is_none());
    }

    #[test]
    fn set_current_project_validates_id() {
        let (mut store, project_id) = research_store();
        store.set_current_project(None).unwrap();
        assert!(store.current_project().is_none());

        let missing = Uuid::new_v4();
        assert_eq!(
            store.set_current_project(Some(missing)),
            Err(StoreError::ProjectNotFound(missing))
        );
        store.set_current_project(Some(project_id)).unwrap();
        assert_eq!(store.current_project().unwrap().id, project_id);
    }

    #[test]
    fn update_project_merges_and_refreshes_timestamp() {
        let (mut store, project_id) = research_store();
        let before = store.project(project_id).unwrap().updated_at;
        sleep(Duration::from_millis(2));

        let updated = store
            .update_project(
                project_id,
                ProjectUpdate {
                    description: Some(Some("Papers on sleep".into())),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Research");
        assert_eq!(updated.description.as_deref(), Some("Papers on sleep"));
        assert!(updated.updated_at > before);
        // The current project reads from the same collection.
        assert_eq!(store.current_project().unwrap(), &updated);
    }

    #[test]
    fn unknown_ids_leave_state_unchanged() {
        let (mut store, project_id) = research_store();
        let document = ready_document(&mut store, project_id);
        let snapshot = store.projects().to_vec();
        let missing = Uuid::new_v4();

        assert!(store
            .update_project(missing, ProjectUpdate::default())
            .unwrap_err()
            .is_not_found());
        assert_eq!(
            store.update_document(project_id, missing, DocumentUpdate::default()),
            Err(StoreError::DocumentNotFound(missing))
        );
        assert_eq!(
            store.update_document(missing, document.id, DocumentUpdate::default()),
            Err(StoreError::ProjectNotFound(missing))
        );
        assert_eq!(
            store.update_generation(project_id, missing, GenerationUpdate::default()),
            Err(StoreError::GenerationNotFound(missing))
        );
        assert!(store.delete_project(missing).is_err());
        assert!(store.remove_document(project_id, missing).is_err());
        assert!(store.set_upload_progress(missing, 50).is_err());

        assert_eq!(store.projects(), snapshot.as_slice());
    }

    #[test]
    fn add_then_remove_document_restores_list() {
        let (mut store, project_id) = research_store();
        ready_document(&mut store, project_id);
        let before = store.project(project_id).unwrap().documents.clone();

        let added = store
            .add_document(project_id, &FileDescriptor::new("notes.md", "text/markdown", 42))
            .unwrap();
        assert_eq!(added.status, DocumentStatus::Uploading);
        assert_eq!(added.upload_progress, Some(0));
        assert_eq!(store.project(project_id).unwrap().documents.len(), 2);

        let removed = store.remove_document(project_id, added.id).unwrap();
        assert_eq!(removed.id, added.id);
        assert_eq!(store.project(project_id).unwrap().documents, before);
    }

    #[test]
    fn add_document_validates_format_and_size() {
        let (mut store, project_id) = research_store();

        let image = FileDescriptor::new("cat.png", "image/png", 10);
        assert!(matches!(
            store.add_document(project_id, &image),
            Err(StoreError::UnsupportedFormat { .. })
        ));

        let huge = FileDescriptor::new("big.pdf", "application/pdf", DEFAULT_MAX_FILE_SIZE + 1);
        assert!(matches!(
            store.add_document(project_id, &huge),
            Err(StoreError::FileTooLarge { .. })
        ));

        let limit = FileDescriptor::new("ok.txt", "text/plain", DEFAULT_MAX_FILE_SIZE);
        assert!(store.add_document(project_id, &limit).is_ok());
    }

    #[test]
    fn document_status_cannot_move_backwards() {
        let (mut store, project_id) = research_store();
        let document = ready_document(&mut store, project_id);

        let result = store.update_document(
            project_id,
            document.id,
            DocumentUpdate {
                status: Some(DocumentStatus::Processing),
                ..Default::default()
            },
        );
        assert_eq!(
            result,
            Err(StoreError::InvalidDocumentTransition {
                from: DocumentStatus::Ready,
                to: DocumentStatus::Processing,
            })
        );
    }

    #[test]
    fn upload_progress_lives_on_the_document() {
        let (mut store, project_id) = research_store();
        let document = store
            .add_document(project_id, &FileDescriptor::new("a.txt", "text/plain", 1))
            .unwrap();

        store.set_upload_progress(document.id, 40).unwrap();
        assert_eq!(store.upload_progress(document.id), Some(40));
        assert_eq!(
            store.document(project_id, document.id).unwrap().upload_progress,
            Some(40)
        );
        assert_eq!(
            store.set_upload_progress(document.id, 101),
            Err(StoreError::InvalidProgress(101))
        );

        store.clear_upload_progress(document.id).unwrap();
        assert_eq!(store.upload_progress(document.id), None);
    }

    #[test]
    fn start_generation_fills_in_personas() {
        let (mut store, project_id) = research_store();
        let generation = store
            .start_generation(project_id, GenerationSettings::default())
            .unwrap();

        let count = generation.settings.personas.len();
        assert!((MIN_PERSONAS..=DEFAULT_MAX_PERSONAS).contains(&count));
        assert_eq!(generation.status, GenerationStatus::Queued);
        assert_eq!(generation.progress, 0);
        assert_eq!(generation.current_step, INITIAL_GENERATION_STEP);
        assert_eq!(generation.project_id, project_id);
        assert!(store.is_generating());
    }

    #[test]
    fn start_generation_rejects_bad_cast_size() {
        let (mut store, project_id) = research_store();
        let solo = GenerationSettings {
            personas: personas::all()[..1].to_vec(),
            ..Default::default()
        };
        assert!(matches!(
            store.start_generation(project_id, solo),
            Err(StoreError::InvalidPersonaCount { count: 1, .. })
        ));

        let crowd = GenerationSettings {
            personas: personas::all()[..4].to_vec(),
            ..Default::default()
        };
        assert!(store.start_generation(project_id, crowd).is_err());
        assert!(store.project(project_id).unwrap().generations.is_empty());
    }

    #[test]
    fn start_generation_rejects_repeated_persona() {
        let (mut store, project_id) = research_store();
        let professor = personas::get_persona_by_id("professor").unwrap().clone();
        let settings = GenerationSettings {
            personas: vec![professor.clone(), professor],
            ..Default::default()
        };

        assert_eq!(
            store.can_generate(project_id, &settings).unwrap_err(),
            StoreError::NoReadyDocuments(project_id)
        );
        ready_document(&mut store, project_id);
        assert_eq!(
            store.can_generate(project_id, &settings),
            Err(StoreError::DuplicatePersona("professor".to_string()))
        );
        assert_eq!(
            store.start_generation(project_id, settings),
            Err(StoreError::DuplicatePersona("professor".to_string()))
        );
        assert!(store.project(project_id).unwrap().generations.is_empty());
    }

    #[test]
    fn max_personas_below_minimum_is_raised() {
        let mut store = Store::new(StoreConfig {
            max_personas: 1,
            ..Default::default()
        });
        let project = store.create_project("Tiny", None).unwrap();

        let generation = store
            .start_generation(project.id, GenerationSettings::default())
            .unwrap();
        assert_eq!(generation.settings.personas.len(), MIN_PERSONAS);

        let pair = GenerationSettings {
            personas: personas::all()[..2].to_vec(),
            ..Default::default()
        };
        assert!(store.start_generation(project.id, pair).is_ok());
    }

    #[test]
    fn child_mutations_refresh_project_timestamp() {
        let (mut store, project_id) = research_store();
        let mut last = store.project(project_id).unwrap().updated_at;
        let mut assert_refreshed = |store: &Store, what: &str| {
            let now = store.project(project_id).unwrap().updated_at;
            assert!(now > last, "{} did not refresh updated_at", what);
            last = now;
            sleep(Duration::from_millis(2));
        };
        sleep(Duration::from_millis(2));

        let document = store
            .add_document(project_id, &FileDescriptor::new("a.txt", "text/plain", 1))
            .unwrap();
        assert_refreshed(&store, "add_document");

        store
            .update_document(
                project_id,
                document.id,
                DocumentUpdate {
                    status: Some(DocumentStatus::Processing),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_refreshed(&store, "update_document");

        store.set_upload_progress(document.id, 60).unwrap();
        assert_refreshed(&store, "set_upload_progress");

        store.clear_upload_progress(document.id).unwrap();
        assert_refreshed(&store, "clear_upload_progress");

        let generation = store
            .start_generation(project_id, GenerationSettings::default())
            .unwrap();
        assert_refreshed(&store, "start_generation");

        store
            .update_generation(
                project_id,
                generation.id,
                GenerationUpdate {
                    progress: Some(10),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_refreshed(&store, "update_generation");

        store.remove_document(project_id, document.id).unwrap();
        assert_refreshed(&store, "remove_document");
    }

    #[test]
    fn custom_personas_count_towards_the_cast() {
        let (mut store, project_id) = research_store();
        let host = Persona::custom("Sam", "Host", "voice_9", "Warm", "Chatty", "🎙");
        let settings = GenerationSettings {
            personas: vec![host.clone(), personas::all()[0].clone()],
            ..Default::default()
        };
        let generation = store.start_generation(project_id, settings).unwrap();
        assert_eq!(generation.settings.personas[0], host);
        assert!(generation.settings.personas[0].is_custom);
    }

    #[test]
    fn completion_clears_generating_other_statuses_do_not() {
        let (mut store, project_id) = research_store();
        let generation = store
            .start_generation(project_id, GenerationSettings::default())
            .unwrap();

        store
            .update_generation(
                project_id,
                generation.id,
                GenerationUpdate {
                    status: Some(GenerationStatus::Processing),
                    progress: Some(50),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(store.is_generating());

        store
            .update_generation(
                project_id,
                generation.id,
                GenerationUpdate {
                    status: Some(GenerationStatus::Completed),
                    progress: Some(100),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!store.is_generating());
    }

    #[test]
    fn failure_clears_generating_and_records_reason() {
        let (mut store, project_id) = research_store();
        let generation = store
            .start_generation(project_id, GenerationSettings::default())
            .unwrap();

        let failed = store
            .update_generation(project_id, generation.id, GenerationUpdate::failed("boom"))
            .unwrap();
        assert_eq!(failed.status, GenerationStatus::Failed);
        assert_eq!(failed.error_message.as_deref(), Some("boom"));
        assert!(failed.completed_at.is_some());
        assert!(!store.is_generating());
    }

    #[test]
    fn finishing_one_generation_keeps_another_running() {
        let (mut store, project_id) = research_store();
        let first = store
            .start_generation(project_id, GenerationSettings::default())
            .unwrap();
        let second = store
            .start_generation(project_id, GenerationSettings::default())
            .unwrap();

        store
            .update_generation(
                project_id,
                first.id,
                GenerationUpdate {
                    status: Some(GenerationStatus::Completed),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(store.is_generating());

        store
            .update_generation(project_id, second.id, GenerationUpdate::failed("stopped"))
            .unwrap();
        assert!(!store.is_generating());
    }

    #[test]
    fn generation_progress_is_monotonic_and_terminal_is_final() {
        let (mut store, project_id) = research_store();
        let generation = store
            .start_generation(project_id, GenerationSettings::default())
            .unwrap();
        let progress = |p: u8| GenerationUpdate {
            progress: Some(p),
            ..Default::default()
        };

        store.update_generation(project_id, generation.id, progress(40)).unwrap();
        assert_eq!(
            store.update_generation(project_id, generation.id, progress(25)),
            Err(StoreError::ProgressRegression { from: 40, to: 25 })
        );
        assert_eq!(
            store.update_generation(project_id, generation.id, progress(120)),
            Err(StoreError::InvalidProgress(120))
        );

        store
            .update_generation(project_id, generation.id, GenerationUpdate::failed("x"))
            .unwrap();
        assert!(matches!(
            store.update_generation(project_id, generation.id, progress(90)),
            Err(StoreError::InvalidGenerationTransition { .. })
        ));
    }

    #[test]
    fn can_generate_requires_ready_document_and_idle_store() {
        let (mut store, project_id) = research_store();
        let settings = GenerationSettings::default();
        assert_eq!(
            store.can_generate(project_id, &settings),
            Err(StoreError::NoReadyDocuments(project_id))
        );

        ready_document(&mut store, project_id);
        store.can_generate(project_id, &settings).unwrap();

        store.start_generation(project_id, settings.clone()).unwrap();
        assert_eq!(
            store.can_generate(project_id, &settings),
            Err(StoreError::GenerationInProgress)
        );
    }

    #[test]
    fn research_scenario_runs_to_completion() {
        let (mut store, project_id) = research_store();
        let document = store
            .add_document(
                project_id,
                &FileDescriptor::new("paper.pdf", "application/pdf", 500_000),
            )
            .unwrap();
        for (status, preview) in [
            (DocumentStatus::Processing, None),
            (DocumentStatus::Ready, Some("A study of sleep.".to_string())),
        ] {
            store
                .update_document(
                    project_id,
                    document.id,
                    DocumentUpdate {
                        status: Some(status),
                        preview,
                        ..Default::default()
                    },
                )
                .unwrap();
        }

        let settings = GenerationSettings {
            personas: vec![
                personas::get_persona_by_id("professor").unwrap().clone(),
                personas::get_persona_by_id("student").unwrap().clone(),
            ],
            ..Default::default()
        };
        store.can_generate(project_id, &settings).unwrap();
        let generation = store.start_generation(project_id, settings).unwrap();

        for progress in [10u8, 25, 40, 60, 80, 95, 100] {
            let done = progress == 100;
            let mut update = GenerationUpdate {
                progress: Some(progress),
                status: Some(if done {
                    GenerationStatus::Completed
                } else {
                    GenerationStatus::Processing
                }),
                ..Default::default()
            };
            if done {
                update.audio_url = Some("/demo-audio.mp3".into());
                update.transcript_url = Some("/demo-transcript.txt".into());
                update.duration = Some(847);
            }
            store
                .update_generation(project_id, generation.id, update)
                .unwrap();
        }

        let finished = store.generation(project_id, generation.id).unwrap();
        assert_eq!(finished.status, GenerationStatus::Completed);
        assert_eq!(finished.progress, 100);
        assert!(finished.audio_url.is_some());
        assert!(finished.transcript_url.is_some());
        assert!(finished.completed_at.is_some());
        assert!(!store.is_generating());
    }

    #[test]
    fn deleting_current_project_clears_pointer() {
        let (mut store, project_id) = research_store();
        let other = store.create_project("Other", Some("keep me")).unwrap();
        store.set_current_project(Some(project_id)).unwrap();

        store.delete_project(project_id).unwrap();
        assert!(store.current_project().is_none());
        assert!(store.project(project_id).is_err());
        assert_eq!(store.projects().len(), 1);
        assert_eq!(store.projects()[0].id, other.id);
    }
}

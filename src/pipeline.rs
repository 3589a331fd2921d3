use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::{Config, Granularity};
use crate::database::{ClipRecord, MetadataSink};
use crate::errors::{ClipError, FatalError};
use crate::extractor::{
    self, ClipCandidate, extract_sentence_candidates, extract_word_candidates,
};
use crate::file_utils::{FileManager, HARD_SUB_MARKER};
use crate::subtitle_acquirer::SubtitleAcquirer;
use crate::subtitle_processor::SubtitleCollection;
use crate::transcode::{CodecMode, SpeechRecognizer, Transcoder, generate_thumbnail};

// @module: Batch pipeline driver

/// One run's worth of explicit configuration, constructed once in `main`
/// and passed into the driver.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory scanned recursively for source videos
    pub source_dir: PathBuf,
    /// Sentence-clip output directory; word clips land next to their source
    pub output_dir: Option<PathBuf>,
    /// Clip granularity mode
    pub granularity: Granularity,
}

/// Counters reported at the end of a batch run
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    /// Videos matched by the directory scan
    pub videos_found: usize,
    /// Videos that produced at least one candidate
    pub videos_processed: usize,
    /// Videos skipped for lack of a usable subtitle
    pub videos_skipped: usize,
    /// Successful clip renders (a word clip rendered twice counts twice)
    pub clips_rendered: usize,
    /// Records accepted by the metadata sink
    pub records_persisted: usize,
    /// Item-level failures (validation, render, persist)
    pub items_failed: usize,
}

/// Batch driver: scans a directory tree for source videos and runs the
/// acquire → parse → extract → validate → render → thumbnail → persist
/// stages for each, one video and one candidate at a time.
///
/// Failure semantics: an item-level failure skips that candidate, a
/// subtitle-acquisition failure skips that video, and only output-directory
/// or sink unavailability aborts the batch.
pub struct Pipeline<'a> {
    config: &'a Config,
    run_config: PipelineConfig,
    transcoder: &'a dyn Transcoder,
    recognizer: &'a dyn SpeechRecognizer,
    sink: &'a dyn MetadataSink,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline over explicit configuration and tool capabilities
    pub fn new(
        config: &'a Config,
        run_config: PipelineConfig,
        transcoder: &'a dyn Transcoder,
        recognizer: &'a dyn SpeechRecognizer,
        sink: &'a dyn MetadataSink,
    ) -> Self {
        Self {
            config,
            run_config,
            transcoder,
            recognizer,
            sink,
        }
    }

    /// Run the batch over the configured source directory
    pub async fn run(&self) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();
        let source_dir = &self.run_config.source_dir;

        if !source_dir.is_dir() {
            return Err(FatalError::SourceDirNotFound(source_dir.clone()).into());
        }

        // Sentence clips need their output directory up front; failure here
        // is the fatal kind
        if self.run_config.granularity == Granularity::Sentence {
            let output_dir = self
                .sentence_output_dir()
                .ok_or_else(|| anyhow::anyhow!("sentence mode requires an output directory"))?
                .to_path_buf();
            FileManager::ensure_dir(&output_dir).map_err(|e| FatalError::OutputDirUnavailable {
                dir: output_dir,
                source: std::io::Error::other(e.to_string()),
            })?;
        }

        // Generated hard-sub derivatives must never re-enter the batch as
        // sources in sentence mode
        let exclude_marker = match self.run_config.granularity {
            Granularity::Word => None,
            Granularity::Sentence => Some(HARD_SUB_MARKER),
        };

        let videos = FileManager::scan_videos(
            source_dir,
            &self.config.accepted_extensions,
            exclude_marker,
        )?;

        info!(
            "Found {} video file(s) under {:?} ({} mode)",
            videos.len(),
            source_dir,
            self.run_config.granularity
        );

        let mut summary = RunSummary {
            videos_found: videos.len(),
            ..RunSummary::default()
        };

        let folder_pb = ProgressBar::new(videos.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("█▓▒░"));

        for video in &videos {
            let file_name = video
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            match self.process_video(video, &mut summary).await {
                Ok(()) => summary.videos_processed += 1,
                Err(e) => {
                    warn!("Skipping video {}: {}", file_name, e);
                    summary.videos_skipped += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Batch complete");

        info!(
            "Batch completed in {:.1}s: {} video(s) processed, {} skipped, {} clip(s) rendered, {} record(s) persisted, {} item failure(s)",
            start_time.elapsed().as_secs_f64(),
            summary.videos_processed,
            summary.videos_skipped,
            summary.clips_rendered,
            summary.records_persisted,
            summary.items_failed,
        );

        Ok(summary)
    }

    fn sentence_output_dir(&self) -> Option<&Path> {
        match self.run_config.granularity {
            Granularity::Word => None,
            Granularity::Sentence => self.run_config.output_dir.as_deref(),
        }
    }

    /// Run every stage for one video. Returns Err only for video-level
    /// skips (no usable subtitle); item-level failures are absorbed into
    /// the summary.
    async fn process_video(&self, video: &Path, summary: &mut RunSummary) -> Result<(), ClipError> {
        let mode = self.run_config.granularity;

        let acquirer = SubtitleAcquirer::new(
            self.transcoder,
            self.recognizer,
            &self.config.subtitle_language,
            self.config.hard_sub_derivative,
        );
        let subtitle_path = acquirer.acquire(video, mode).await?;

        let collection = SubtitleCollection::parse_srt_file(&subtitle_path);
        if collection.is_empty() {
            return Err(ClipError::SubtitleUnavailable {
                video: video.to_path_buf(),
                reason: format!("no parseable entries in {:?}", subtitle_path),
            });
        }

        let candidates = match mode {
            Granularity::Word => extract_word_candidates(video, &collection.entries),
            Granularity::Sentence => {
                // run() guarantees the output directory in sentence mode
                let output_dir = self.sentence_output_dir().expect("sentence output dir");
                extract_sentence_candidates(video, output_dir, &collection.entries)
            }
        };

        info!(
            "{:?}: {} entries -> {} candidate clip(s)",
            video.file_name().unwrap_or_default(),
            collection.entries.len(),
            candidates.len()
        );

        for candidate in &candidates {
            if let Err(e) = self.process_candidate(video, candidate, summary).await {
                debug!("[{}] {}", e.kind(), e);
                warn!("Skipping candidate {}: {}", candidate.label, e);
                summary.items_failed += 1;
            }
        }

        Ok(())
    }

    /// Validate, render, thumbnail and persist one candidate clip
    async fn process_candidate(
        &self,
        video: &Path,
        candidate: &ClipCandidate,
        summary: &mut RunSummary,
    ) -> Result<(), ClipError> {
        extractor::validate_window(
            &candidate.label,
            candidate.start_secs,
            candidate.end_secs,
            self.run_config.granularity,
        )?;

        match self.run_config.granularity {
            Granularity::Word => self.render_word_clip(video, candidate, summary).await,
            Granularity::Sentence => self.render_sentence_clip(video, candidate, summary).await,
        }
    }

    /// Word mode renders the clip twice into the same path — plain
    /// stream-copy first, then the mobile-optimized H.264 re-encode — and
    /// persists one record per render.
    async fn render_word_clip(
        &self,
        video: &Path,
        candidate: &ClipCandidate,
        summary: &mut RunSummary,
    ) -> Result<(), ClipError> {
        for mode in [CodecMode::StreamCopy, CodecMode::ReencodeH264] {
            self.render(video, candidate, mode).await?;
            summary.clips_rendered += 1;

            let thumbnail = self.derive_thumbnail(&candidate.output_path).await;
            let record = self
                .build_record(candidate, thumbnail.as_deref())?
                .with_word(&candidate.label);

            self.persist(record, summary).await?;
        }

        Ok(())
    }

    /// Sentence mode renders once (re-encode) and fans out one record per
    /// distinct word the sentence contains, all sharing the clip file and
    /// thumbnail.
    async fn render_sentence_clip(
        &self,
        video: &Path,
        candidate: &ClipCandidate,
        summary: &mut RunSummary,
    ) -> Result<(), ClipError> {
        self.render(video, candidate, CodecMode::ReencodeH264).await?;
        summary.clips_rendered += 1;

        let thumbnail = self.derive_thumbnail(&candidate.output_path).await;

        let words = extractor::fanout_words(&candidate.label);
        if words.is_empty() {
            debug!("No fan-out words for sentence: {}", candidate.label);
            return Ok(());
        }

        for word in &words {
            let record = self
                .build_record(candidate, thumbnail.as_deref())?
                .with_word(word)
                .with_sentence(&candidate.label);

            self.persist(record, summary).await?;
        }

        Ok(())
    }

    async fn render(
        &self,
        video: &Path,
        candidate: &ClipCandidate,
        mode: CodecMode,
    ) -> Result<(), ClipError> {
        self.transcoder
            .clip(
                video,
                candidate.start_secs,
                candidate.duration_secs(),
                &candidate.output_path,
                mode,
            )
            .await
            .map_err(|e| ClipError::TranscodeFailed {
                output: candidate.output_path.clone(),
                diagnostic: e.to_string(),
            })
    }

    /// Thumbnail failure is the one failure that does not cancel
    /// persistence of its parent record; it only empties the reference.
    async fn derive_thumbnail(&self, clip: &Path) -> Option<PathBuf> {
        match generate_thumbnail(self.transcoder, clip).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Thumbnail derivation failed for {:?}: {}", clip, e);
                None
            }
        }
    }

    /// Stat the rendered file immediately before persistence so the record
    /// always references a file that exists with the recorded size.
    fn build_record(
        &self,
        candidate: &ClipCandidate,
        thumbnail: Option<&Path>,
    ) -> Result<ClipRecord, ClipError> {
        let file_size = FileManager::file_size(&candidate.output_path).map_err(|e| {
            ClipError::TranscodeFailed {
                output: candidate.output_path.clone(),
                diagnostic: format!("rendered file missing at stat time: {}", e),
            }
        })?;

        Ok(
            ClipRecord::new(&candidate.output_path, file_size, candidate.duration_secs())
                .with_thumbnail(thumbnail),
        )
    }

    async fn persist(&self, record: ClipRecord, summary: &mut RunSummary) -> Result<(), ClipError> {
        let filename = record.filename.clone();

        match self.sink.create(&record).await {
            Ok(id) => {
                debug!("Persisted {} as record {}", filename, id);
                summary.records_persisted += 1;
                Ok(())
            }
            Err(e) => Err(ClipError::PersistFailed {
                filename,
                reason: e.to_string(),
            }),
        }
    }
}

// epsplit-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and when the "test-mocks" feature is enabled.
#![cfg(any(test, feature = "test-mocks"))]

use crate::chapters::ChapterBoundary;
use crate::error::{CoreError, CoreResult};
use crate::external::{ChapterSource, SplitProgress, SplitRequest, Splitter};
use crate::utils::format_ms;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Mock chapter source serving canned boundary records per input path.
#[derive(Clone, Default)]
pub struct MockChapterSource {
    boundaries: Rc<RefCell<HashMap<PathBuf, Vec<ChapterBoundary>>>>,
    errors: Rc<RefCell<HashMap<PathBuf, CoreError>>>,
    received_calls: Rc<RefCell<Vec<PathBuf>>>,
}

impl MockChapterSource {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_boundaries(&self, input: &Path, boundaries: Vec<ChapterBoundary>) {
        self.boundaries
            .borrow_mut()
            .insert(input.to_path_buf(), boundaries);
    }

    /// Registers contiguous chapters starting at zero with the given durations.
    pub fn add_durations(&self, input: &Path, durations_ms: &[u64]) {
        let mut start = 0;
        let mut boundaries = Vec::with_capacity(durations_ms.len() * 2);
        for duration in durations_ms {
            boundaries.push(ChapterBoundary::Start(format_ms(start)));
            start += duration;
            boundaries.push(ChapterBoundary::End(format_ms(start)));
        }
        self.add_boundaries(input, boundaries);
    }

    /// The next read of `input` fails with `error`.
    pub fn add_error(&self, input: &Path, error: CoreError) {
        self.errors.borrow_mut().insert(input.to_path_buf(), error);
    }

    pub fn get_received_calls(&self) -> Vec<PathBuf> {
        self.received_calls.borrow().clone()
    }
}

impl ChapterSource for MockChapterSource {
    fn read_boundaries(&self, input: &Path) -> CoreResult<Vec<ChapterBoundary>> {
        self.received_calls.borrow_mut().push(input.to_path_buf());

        if let Some(error) = self.errors.borrow_mut().remove(input) {
            log::warn!("MockChapterSource simulating error for {:?}: {}", input, error);
            return Err(error);
        }

        match self.boundaries.borrow().get(input) {
            Some(boundaries) => Ok(boundaries.clone()),
            None => panic!("MockChapterSource: no chapters registered for {:?}", input),
        }
    }
}

/// Mock splitter that records requests and optionally fakes output files.
#[derive(Clone, Default)]
pub struct MockSplitter {
    create_outputs: bool,
    progress_events: Rc<RefCell<Vec<SplitProgress>>>,
    failure: Rc<RefCell<Option<CoreError>>>,
    received_requests: Rc<RefCell<Vec<SplitRequest>>>,
}

impl MockSplitter {
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates an empty file for every output path on split.
    pub fn creating_outputs() -> Self {
        Self {
            create_outputs: true,
            ..Default::default()
        }
    }

    pub fn add_progress_event(&self, progress: SplitProgress) {
        self.progress_events.borrow_mut().push(progress);
    }

    /// The next split fails with `error`.
    pub fn fail_with(&self, error: CoreError) {
        *self.failure.borrow_mut() = Some(error);
    }

    pub fn get_received_requests(&self) -> Vec<SplitRequest> {
        self.received_requests.borrow().clone()
    }
}

impl Splitter for MockSplitter {
    fn command_line(&self, request: &SplitRequest) -> Vec<String> {
        vec![
            "mock-split".to_string(),
            request.input.to_string_lossy().into_owned(),
            request.split_spec.clone(),
        ]
    }

    fn split(
        &self,
        request: &SplitRequest,
        on_progress: &mut dyn FnMut(&SplitProgress),
    ) -> CoreResult<()> {
        self.received_requests.borrow_mut().push(request.clone());

        if let Some(error) = self.failure.borrow_mut().take() {
            return Err(error);
        }

        for progress in self.progress_events.borrow().iter() {
            on_progress(progress);
        }

        if self.create_outputs {
            for path in request.output_paths() {
                std::fs::File::create(&path)?;
                log::debug!("MockSplitter created dummy output file: {:?}", path);
            }
        }
        Ok(())
    }
}

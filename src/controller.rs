//! Upload form state machine.
//!
//! [`UploadController`] owns all mutable form state: the candidate file
//! list, the upload status, the progress percentage and the drag-active
//! flag. Everything the view renders derives from it, and every mutation
//! goes through a named transition.
//!
//! The controller is generic over [`FileLike`] so the whole machine can be
//! unit-tested on the host with stub files; the browser side plugs in
//! [`crate::files::WebFile`].

use std::rc::Rc;

use log::Level;
use serde_json::json;

use crate::config::{ALLOWED_TYPES, MAX_FILES, MAX_FILE_SIZE};
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::types::{RejectReason, RejectedFile, UploadStatus};

/// Minimal view of a candidate file the controller needs to validate it.
pub trait FileLike {
    fn name(&self) -> String;
    fn mime(&self) -> String;
    fn size(&self) -> u64;
}

/// Check one offered file against the type and size rules.
///
/// Returns `None` when the file is acceptable.
pub fn validate<F: FileLike>(file: &F) -> Option<RejectReason> {
    let mime = file.mime();
    if !ALLOWED_TYPES.contains(&mime.as_str()) {
        return Some(RejectReason::UnsupportedType(mime));
    }
    if file.size() > MAX_FILE_SIZE {
        return Some(RejectReason::TooLarge(file.size()));
    }
    None
}

/// An accepted file plus the stable id it keeps for its lifetime in the
/// list.
///
/// Ids are never reused, so keyed rendering can tell "the same candidate
/// moved up" apart from "a new candidate took this position".
#[derive(Clone)]
pub struct Candidate<F> {
    id: u64,
    file: F,
}

impl<F> Candidate<F> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn file(&self) -> &F {
        &self.file
    }
}

/// The single authoritative state object behind the upload form.
#[derive(Clone)]
pub struct UploadController<F> {
    files: Vec<Candidate<F>>,
    next_id: u64,
    status: UploadStatus,
    progress: f64,
    drag_active: bool,
    diag: Rc<dyn DiagnosticSink>,
}

impl<F: FileLike> UploadController<F> {
    pub fn new(diag: Rc<dyn DiagnosticSink>) -> Self {
        Self {
            files: Vec::new(),
            next_id: 0,
            status: UploadStatus::Idle,
            progress: 0.0,
            drag_active: false,
            diag,
        }
    }

    pub fn files(&self) -> &[Candidate<F>] {
        &self.files
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    /// Percent of bytes transferred, in [0, 100]. Only meaningful while
    /// the status is [`UploadStatus::Uploading`].
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.files.is_empty() && self.status != UploadStatus::Uploading
    }

    /// Run a batch of offered files through validation and append the
    /// accepted ones, oldest first. The combined list is truncated to
    /// [`MAX_FILES`]; excess newest files are silently dropped from the
    /// tail. Returns the rejected files, which are never added.
    pub fn accept(&mut self, batch: Vec<F>) -> Vec<RejectedFile> {
        let mut rejected = Vec::new();
        for file in batch {
            match validate(&file) {
                Some(reason) => rejected.push(RejectedFile {
                    name: file.name(),
                    reason,
                }),
                None => {
                    if self.files.len() < MAX_FILES {
                        let id = self.next_id;
                        self.next_id += 1;
                        self.files.push(Candidate { id, file });
                    } else {
                        self.diag.record(
                            Level::Debug,
                            DiagnosticEvent::new("select", "candidate limit reached")
                                .with_detail(json!({ "dropped": file.name(), "max": MAX_FILES })),
                        );
                    }
                }
            }
        }
        if !rejected.is_empty() {
            let entries: Vec<serde_json::Value> = rejected
                .iter()
                .map(|r| {
                    json!({
                        "file": r.name,
                        "reason": r.reason.to_string(),
                        "detail": r.reason.detail(),
                    })
                })
                .collect();
            self.diag.record(
                Level::Warn,
                DiagnosticEvent::new("select", "files rejected")
                    .with_detail(json!({ "rejected": entries })),
            );
        }
        rejected
    }

    /// Drop the candidate with the given id. Its preview resource is
    /// released when the handle is dropped.
    pub fn remove(&mut self, id: u64) {
        if let Some(index) = self.files.iter().position(|c| c.id == id) {
            let candidate = self.files.remove(index);
            self.diag.record(
                Level::Debug,
                DiagnosticEvent::new("select", "candidate removed")
                    .with_detail(json!({ "name": candidate.file.name() })),
            );
        }
    }

    /// Drop every candidate, releasing preview resources. Called on view
    /// unmount and from [`UploadController::finish_success`].
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Try to enter the uploading state.
    ///
    /// Refuses when the list is empty or an upload is already in flight,
    /// so a submit with nothing attached is a no-op and two requests can
    /// never overlap. Resets progress before the new request starts.
    pub fn begin_upload(&mut self) -> bool {
        if self.files.is_empty() || self.status == UploadStatus::Uploading {
            return false;
        }
        self.progress = 0.0;
        self.status = UploadStatus::Uploading;
        self.diag.record(
            Level::Info,
            DiagnosticEvent::new("upload", "upload started")
                .with_detail(json!({ "files": self.files.len() })),
        );
        true
    }

    /// Fold a transport progress event into the displayed percentage.
    ///
    /// Ignored outside the uploading state. The value is clamped to
    /// [0, 100] and never moves backwards, so out-of-order callbacks
    /// cannot make the bar jump back.
    pub fn record_progress(&mut self, loaded: f64, total: f64) {
        if self.status != UploadStatus::Uploading || total <= 0.0 {
            return;
        }
        let percent = (loaded / total * 100.0).clamp(0.0, 100.0);
        if percent > self.progress {
            self.progress = percent;
        }
    }

    /// The in-flight request resolved with a 2xx response: clear the
    /// candidates and reset progress.
    pub fn finish_success(&mut self) {
        self.status = UploadStatus::Success;
        self.files.clear();
        self.progress = 0.0;
        self.diag
            .record(Level::Info, DiagnosticEvent::new("upload", "upload succeeded"));
    }

    /// The in-flight request failed: keep the candidates so the user can
    /// retry without re-selecting, and reset progress.
    pub fn finish_error(&mut self, message: &str, detail: Option<serde_json::Value>) {
        self.status = UploadStatus::Error;
        self.progress = 0.0;
        let mut event = DiagnosticEvent::new("upload", message);
        if let Some(detail) = detail {
            event = event.with_detail(detail);
        }
        self.diag.record(Level::Error, event);
    }

    /// Drag indicator flag; no other side effects.
    pub fn set_drag_active(&mut self, active: bool) {
        self.drag_active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CapturingSink;

    struct StubFile {
        name: &'static str,
        mime: &'static str,
        size: u64,
    }

    impl FileLike for StubFile {
        fn name(&self) -> String {
            self.name.to_string()
        }
        fn mime(&self) -> String {
            self.mime.to_string()
        }
        fn size(&self) -> u64 {
            self.size
        }
    }

    fn png(name: &'static str) -> StubFile {
        StubFile {
            name,
            mime: "image/png",
            size: 1024,
        }
    }

    fn controller() -> (UploadController<StubFile>, Rc<CapturingSink>) {
        let sink = Rc::new(CapturingSink::new());
        (UploadController::new(sink.clone()), sink)
    }

    fn names(ctrl: &UploadController<StubFile>) -> Vec<String> {
        ctrl.files().iter().map(|c| c.file().name()).collect()
    }

    fn ids(ctrl: &UploadController<StubFile>) -> Vec<u64> {
        ctrl.files().iter().map(|c| c.id()).collect()
    }

    #[test]
    fn list_never_exceeds_three_candidates() {
        let (mut ctrl, _) = controller();
        let rejected = ctrl.accept(vec![png("a"), png("b")]);
        assert!(rejected.is_empty());
        let rejected = ctrl.accept(vec![png("c"), png("d")]);
        assert!(rejected.is_empty());

        // First two survive, then the first of the second batch; "d" is
        // silently dropped from the tail.
        assert_eq!(names(&ctrl), vec!["a", "b", "c"]);
    }

    #[test]
    fn wrong_type_is_rejected_with_reason() {
        let (mut ctrl, sink) = controller();
        let rejected = ctrl.accept(vec![StubFile {
            name: "notes.txt",
            mime: "text/plain",
            size: 10,
        }]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(
            rejected[0].to_string(),
            "notes.txt: Invalid file type (PNG, JPG, PDF only)"
        );
        assert!(ctrl.files().is_empty());
        // The warn event carries the offending MIME type for triage.
        let recorded = sink.0.borrow();
        let (level, event) = recorded
            .iter()
            .find(|(_, event)| event.scope == "select")
            .expect("rejection recorded");
        assert_eq!(*level, Level::Warn);
        let detail = serde_json::to_string(event.detail.as_ref().unwrap()).unwrap();
        assert!(detail.contains("text/plain"));
    }

    #[test]
    fn oversized_file_is_rejected_with_reason() {
        let (mut ctrl, _) = controller();
        let rejected = ctrl.accept(vec![StubFile {
            name: "big.pdf",
            mime: "application/pdf",
            size: 2 * 1024 * 1024 + 1,
        }]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].to_string(), "big.pdf: File size exceeds 2MB");
        assert!(ctrl.files().is_empty());
    }

    #[test]
    fn exactly_two_mib_is_accepted() {
        let (mut ctrl, _) = controller();
        let rejected = ctrl.accept(vec![StubFile {
            name: "edge.pdf",
            mime: "application/pdf",
            size: 2 * 1024 * 1024,
        }]);
        assert!(rejected.is_empty());
        assert_eq!(ctrl.files().len(), 1);
    }

    #[test]
    fn mixed_batch_keeps_valid_files_only() {
        let (mut ctrl, _) = controller();
        let rejected = ctrl.accept(vec![
            png("ok.png"),
            StubFile {
                name: "movie.mp4",
                mime: "video/mp4",
                size: 500,
            },
        ]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(names(&ctrl), vec!["ok.png"]);
    }

    #[test]
    fn submit_with_empty_list_is_a_noop() {
        let (mut ctrl, _) = controller();
        assert!(!ctrl.begin_upload());
        assert_eq!(ctrl.status(), UploadStatus::Idle);
    }

    #[test]
    fn submit_while_uploading_is_refused() {
        let (mut ctrl, _) = controller();
        ctrl.accept(vec![png("a")]);
        assert!(ctrl.begin_upload());
        assert!(!ctrl.begin_upload());
        assert_eq!(ctrl.status(), UploadStatus::Uploading);
    }

    #[test]
    fn successful_upload_clears_candidates_and_progress() {
        let (mut ctrl, _) = controller();
        ctrl.accept(vec![png("a"), png("b")]);
        assert!(ctrl.begin_upload());
        ctrl.record_progress(50.0, 100.0);
        assert_eq!(ctrl.progress(), 50.0);

        ctrl.finish_success();
        assert_eq!(ctrl.status(), UploadStatus::Success);
        assert!(ctrl.files().is_empty());
        assert_eq!(ctrl.progress(), 0.0);
    }

    #[test]
    fn failed_upload_keeps_candidates_for_retry() {
        let (mut ctrl, sink) = controller();
        ctrl.accept(vec![png("a"), png("b")]);
        assert!(ctrl.begin_upload());
        ctrl.record_progress(80.0, 100.0);

        ctrl.finish_error("request failed", Some(json!({ "status": 500 })));
        assert_eq!(ctrl.status(), UploadStatus::Error);
        assert_eq!(names(&ctrl), vec!["a", "b"]);
        // Progress goes back to zero on failure too, so a retry starts
        // from a clean bar.
        assert_eq!(ctrl.progress(), 0.0);
        assert!(sink
            .0
            .borrow()
            .iter()
            .any(|(level, event)| *level == Level::Error
                && event.detail == Some(json!({ "status": 500 }))));
    }

    #[test]
    fn resubmit_is_allowed_after_failure() {
        let (mut ctrl, _) = controller();
        ctrl.accept(vec![png("a")]);
        assert!(ctrl.begin_upload());
        ctrl.finish_error("request failed", None);
        assert!(ctrl.begin_upload());
        assert_eq!(ctrl.status(), UploadStatus::Uploading);
    }

    #[test]
    fn progress_is_monotonic_and_clamped() {
        let (mut ctrl, _) = controller();
        ctrl.accept(vec![png("a")]);
        ctrl.begin_upload();

        ctrl.record_progress(80.0, 100.0);
        ctrl.record_progress(40.0, 100.0);
        assert_eq!(ctrl.progress(), 80.0);

        ctrl.record_progress(150.0, 100.0);
        assert_eq!(ctrl.progress(), 100.0);
    }

    #[test]
    fn progress_outside_uploading_is_ignored() {
        let (mut ctrl, _) = controller();
        ctrl.accept(vec![png("a")]);
        ctrl.record_progress(50.0, 100.0);
        assert_eq!(ctrl.progress(), 0.0);

        ctrl.record_progress(50.0, 0.0);
        assert_eq!(ctrl.progress(), 0.0);
    }

    #[test]
    fn remove_preserves_order_of_the_rest() {
        let (mut ctrl, _) = controller();
        ctrl.accept(vec![png("a"), png("b"), png("c")]);
        let middle = ctrl.files()[1].id();
        ctrl.remove(middle);
        assert_eq!(names(&ctrl), vec!["a", "c"]);

        // Unknown id is a no-op.
        ctrl.remove(9999);
        assert_eq!(ctrl.files().len(), 2);
    }

    #[test]
    fn candidate_ids_survive_removal_and_are_never_reused() {
        let (mut ctrl, _) = controller();
        ctrl.accept(vec![png("a"), png("b"), png("c")]);
        let before = ids(&ctrl);

        // Removing the head must not re-identify the survivors: keyed
        // rows for "b" and "c" stay the same rows.
        ctrl.remove(before[0]);
        assert_eq!(ids(&ctrl), vec![before[1], before[2]]);
        assert_eq!(names(&ctrl), vec!["b", "c"]);

        // A freshly accepted file gets an id no earlier candidate ever
        // had, so its row is rendered from scratch.
        ctrl.accept(vec![png("d")]);
        let after = ids(&ctrl);
        assert_eq!(after.len(), 3);
        assert!(!before.contains(&after[2]));
        assert!(after[2] > *before.iter().max().unwrap());
    }

    #[test]
    fn drag_flag_has_no_other_side_effects() {
        let (mut ctrl, _) = controller();
        ctrl.accept(vec![png("a")]);
        ctrl.set_drag_active(true);
        assert!(ctrl.drag_active());
        ctrl.set_drag_active(false);
        assert!(!ctrl.drag_active());
        assert_eq!(ctrl.status(), UploadStatus::Idle);
        assert_eq!(ctrl.files().len(), 1);
    }
}

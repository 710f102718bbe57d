use std::path::PathBuf;

use crate::upload::TransferEvent;

/// A file chosen through the native picker, held until it is removed,
/// the dialog is dismissed, or the upload succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

impl SelectedFile {
    /// Returns `None` for paths without a representable file name;
    /// callers treat that as "nothing was selected".
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        let size = std::fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
        Some(Self { name, path, size })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    FileSelected,
    Uploading,
    Succeeded,
}

/// The upload state machine. Rendering is a pure function of this
/// struct; transitions happen only through the methods below, driven by
/// UI interactions and `TransferEvent`s from the worker.
///
/// A failed upload lands back in `FileSelected` with `upload_failed`
/// set, keeping the file around for a manual retry.
#[derive(Debug, Default)]
pub struct UploadMachine {
    phase: UploadPhase,
    selected: Option<SelectedFile>,
    progress: u8,
    upload_failed: bool,
    dialog_visible: bool,
}

impl UploadMachine {
    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    /// Percentage in 0..=100, meaningful during and after Uploading.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn upload_failed(&self) -> bool {
        self.upload_failed
    }

    pub fn dialog_visible(&self) -> bool {
        self.dialog_visible
    }

    pub fn is_uploading(&self) -> bool {
        self.phase == UploadPhase::Uploading
    }

    /// Stores a newly picked file and clears any previous failure.
    /// Ignored while an upload is running (the control is disabled).
    pub fn select_file(&mut self, file: SelectedFile) {
        if self.is_uploading() {
            return;
        }
        self.selected = Some(file);
        self.upload_failed = false;
        self.phase = UploadPhase::FileSelected;
    }

    /// Drops the selection and returns to Idle. Ignored while uploading.
    pub fn remove_file(&mut self) {
        if self.is_uploading() {
            return;
        }
        self.selected = None;
        self.progress = 0;
        self.upload_failed = false;
        self.phase = UploadPhase::Idle;
    }

    /// Moves into Uploading. Returns `false` (and changes nothing) when
    /// there is no selection or an upload is already running.
    pub fn begin_upload(&mut self) -> bool {
        if self.selected.is_none() || self.is_uploading() {
            return false;
        }
        self.upload_failed = false;
        self.phase = UploadPhase::Uploading;
        true
    }

    /// Applies a worker event. Events arriving outside the Uploading
    /// phase are stale and ignored.
    pub fn apply(&mut self, event: &TransferEvent) {
        if !self.is_uploading() {
            return;
        }
        match event {
            TransferEvent::Progress { loaded, total } => {
                self.progress = progress_percent(*loaded, *total);
            }
            TransferEvent::Completed => {
                self.phase = UploadPhase::Succeeded;
                self.dialog_visible = true;
            }
            TransferEvent::Failed(_) => {
                // Keep the file (and the last progress value) so the
                // user can retry; detail goes to the log, not the UI.
                self.upload_failed = true;
                self.phase = UploadPhase::FileSelected;
            }
        }
    }

    /// Dialog close and accept both land here; the outcomes are identical.
    pub fn dismiss_dialog(&mut self) {
        self.selected = None;
        self.progress = 0;
        self.upload_failed = false;
        self.dialog_visible = false;
        self.phase = UploadPhase::Idle;
    }
}

/// Whole-number upload percentage. An unknown or zero total counts as 1
/// so the division is always defined; the result is capped at 100.
pub fn progress_percent(loaded: u64, total: u64) -> u8 {
    let total = if total == 0 { 1 } else { total };
    let percent = (loaded as f64 / total as f64 * 100.0).round();
    percent.min(100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file() -> SelectedFile {
        SelectedFile {
            name: "report.pdf".into(),
            path: PathBuf::from("/tmp/report.pdf"),
            size: 1024,
        }
    }

    fn machine_with_file() -> UploadMachine {
        let mut machine = UploadMachine::default();
        machine.select_file(sample_file());
        machine
    }

    #[test]
    fn select_then_remove_returns_to_idle() {
        let mut machine = machine_with_file();
        assert_eq!(machine.phase(), UploadPhase::FileSelected);

        machine.remove_file();
        assert_eq!(machine.phase(), UploadPhase::Idle);
        assert!(machine.selected_file().is_none());
        assert_eq!(machine.progress(), 0);
        assert!(!machine.upload_failed());
    }

    #[test]
    fn begin_upload_without_file_is_a_noop() {
        let mut machine = UploadMachine::default();
        assert!(!machine.begin_upload());
        assert_eq!(machine.phase(), UploadPhase::Idle);
        assert!(machine.selected_file().is_none());
        assert_eq!(machine.progress(), 0);
        assert!(!machine.upload_failed());
    }

    #[test]
    fn progress_events_drive_percentage_then_success_shows_dialog() {
        let mut machine = machine_with_file();
        assert!(machine.begin_upload());

        machine.apply(&TransferEvent::Progress {
            loaded: 50,
            total: 100,
        });
        assert_eq!(machine.progress(), 50);

        machine.apply(&TransferEvent::Progress {
            loaded: 100,
            total: 100,
        });
        assert_eq!(machine.progress(), 100);

        machine.apply(&TransferEvent::Completed);
        assert_eq!(machine.phase(), UploadPhase::Succeeded);
        assert!(machine.dialog_visible());
    }

    #[test]
    fn failure_keeps_file_and_progress_for_retry() {
        let mut machine = machine_with_file();
        assert!(machine.begin_upload());
        machine.apply(&TransferEvent::Progress {
            loaded: 30,
            total: 100,
        });

        machine.apply(&TransferEvent::Failed("connection reset".into()));
        assert_eq!(machine.phase(), UploadPhase::FileSelected);
        assert!(machine.upload_failed());
        assert_eq!(machine.progress(), 30);
        assert_eq!(machine.selected_file(), Some(&sample_file()));

        // Retry is possible straight away.
        assert!(machine.begin_upload());
        assert!(!machine.upload_failed());
    }

    #[test]
    fn dismissing_the_dialog_resets_everything() {
        let mut machine = machine_with_file();
        assert!(machine.begin_upload());
        machine.apply(&TransferEvent::Progress {
            loaded: 100,
            total: 100,
        });
        machine.apply(&TransferEvent::Completed);

        // Close and accept are bound to the same transition, so one
        // check covers both paths.
        machine.dismiss_dialog();
        assert_eq!(machine.phase(), UploadPhase::Idle);
        assert!(machine.selected_file().is_none());
        assert_eq!(machine.progress(), 0);
        assert!(!machine.dialog_visible());
    }

    #[test]
    fn selecting_a_new_file_clears_the_error_flag() {
        let mut machine = machine_with_file();
        assert!(machine.begin_upload());
        machine.apply(&TransferEvent::Failed("403 forbidden".into()));
        assert!(machine.upload_failed());

        machine.select_file(SelectedFile {
            name: "other.txt".into(),
            path: PathBuf::from("/tmp/other.txt"),
            size: 5,
        });
        assert!(!machine.upload_failed());
        assert_eq!(machine.phase(), UploadPhase::FileSelected);
    }

    #[test]
    fn controls_are_inert_while_uploading() {
        let mut machine = machine_with_file();
        assert!(machine.begin_upload());

        machine.remove_file();
        assert!(machine.selected_file().is_some());
        assert_eq!(machine.phase(), UploadPhase::Uploading);

        machine.select_file(sample_file());
        assert_eq!(machine.phase(), UploadPhase::Uploading);

        assert!(!machine.begin_upload());
    }

    #[test]
    fn progress_percent_never_divides_by_zero() {
        assert_eq!(progress_percent(50, 100), 50);
        assert_eq!(progress_percent(100, 100), 100);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(0, 0), 0);
        // Unknown total counts as 1; the result stays capped.
        assert_eq!(progress_percent(7, 0), 100);
    }

    #[test]
    fn stale_events_after_failure_are_ignored() {
        let mut machine = machine_with_file();
        assert!(machine.begin_upload());
        machine.apply(&TransferEvent::Failed("timeout".into()));

        machine.apply(&TransferEvent::Progress {
            loaded: 90,
            total: 100,
        });
        machine.apply(&TransferEvent::Completed);
        assert_eq!(machine.phase(), UploadPhase::FileSelected);
        assert!(!machine.dialog_visible());
    }
}

use std::time::{Duration, Instant};

use crate::overview::OverviewRequest;

#[derive(Debug, Clone, PartialEq)]
enum EditorState {
    Idle,
    Editing {
        draft: OverviewRequest,
        deadline: Instant,
    },
}

/// Debounced filter editing as an explicit state machine: Idle → Editing →
/// (Timeout | ExplicitApply) → Committed. Rapid successive edits coalesce
/// into one commit; a superseding edit replaces the pending draft and
/// restarts the timer. Only pending applications are ever discarded —
/// recomputation itself is synchronous, so nothing in flight is cancelled.
///
/// The clock is injected: callers pass `Instant::now()` (or a test clock)
/// into `edit` and `poll`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEditor {
    delay: Duration,
    committed: OverviewRequest,
    state: EditorState,
}

impl FilterEditor {
    pub fn new(initial: OverviewRequest, delay: Duration) -> Self {
        FilterEditor {
            delay,
            committed: initial,
            state: EditorState::Idle,
        }
    }

    /// The last committed filter state; recomputation always reads this.
    pub fn committed(&self) -> &OverviewRequest {
        &self.committed
    }

    pub fn pending(&self) -> Option<&OverviewRequest> {
        match &self.state {
            EditorState::Editing { draft, .. } => Some(draft),
            EditorState::Idle => None,
        }
    }

    /// Records an edit at `now`, replacing any pending draft.
    pub fn edit(&mut self, draft: OverviewRequest, now: Instant) {
        self.state = EditorState::Editing {
            draft,
            deadline: now + self.delay,
        };
    }

    /// Commits the pending draft once its deadline has passed. Returns the
    /// newly committed state, or None when nothing is due.
    pub fn poll(&mut self, now: Instant) -> Option<&OverviewRequest> {
        let due = matches!(&self.state, EditorState::Editing { deadline, .. } if now >= *deadline);
        if due {
            self.take_draft()
        } else {
            None
        }
    }

    /// Commits the pending draft immediately, bypassing the timer.
    pub fn apply_now(&mut self) -> Option<&OverviewRequest> {
        match self.state {
            EditorState::Editing { .. } => self.take_draft(),
            EditorState::Idle => None,
        }
    }

    fn take_draft(&mut self) -> Option<&OverviewRequest> {
        match std::mem::replace(&mut self.state, EditorState::Idle) {
            EditorState::Editing { draft, .. } => {
                self.committed = draft;
                Some(&self.committed)
            }
            EditorState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_for_account(account: &str) -> OverviewRequest {
        OverviewRequest {
            account_id: Some(account.to_string()),
            ..OverviewRequest::default()
        }
    }

    fn editor() -> (FilterEditor, Instant) {
        let start = Instant::now();
        (
            FilterEditor::new(OverviewRequest::default(), Duration::from_millis(400)),
            start,
        )
    }

    #[test]
    fn nothing_commits_before_the_deadline() {
        let (mut editor, start) = editor();

        editor.edit(request_for_account("ACC_A"), start);

        assert_eq!(editor.poll(start + Duration::from_millis(399)), None);
        assert_eq!(editor.committed(), &OverviewRequest::default());
        assert!(editor.pending().is_some());
    }

    #[test]
    fn pending_draft_commits_after_the_deadline() {
        let (mut editor, start) = editor();

        editor.edit(request_for_account("ACC_A"), start);
        let committed = editor.poll(start + Duration::from_millis(400)).cloned();

        assert_eq!(committed, Some(request_for_account("ACC_A")));
        assert_eq!(editor.committed(), &request_for_account("ACC_A"));
        assert_eq!(editor.pending(), None);
    }

    #[test]
    fn superseding_edit_replaces_the_draft_and_restarts_the_timer() {
        let (mut editor, start) = editor();

        editor.edit(request_for_account("ACC_A"), start);
        editor.edit(request_for_account("ACC_B"), start + Duration::from_millis(300));

        // The first deadline passes without committing the stale draft.
        assert_eq!(editor.poll(start + Duration::from_millis(450)), None);

        let committed = editor.poll(start + Duration::from_millis(700)).cloned();
        assert_eq!(committed, Some(request_for_account("ACC_B")));
    }

    #[test]
    fn explicit_apply_skips_the_timer() {
        let (mut editor, start) = editor();

        editor.edit(request_for_account("ACC_A"), start);
        let committed = editor.apply_now().cloned();

        assert_eq!(committed, Some(request_for_account("ACC_A")));
        assert_eq!(editor.apply_now(), None);
    }

    #[test]
    fn polling_when_idle_returns_nothing() {
        let (mut editor, start) = editor();

        assert_eq!(editor.poll(start + Duration::from_secs(10)), None);
        assert_eq!(editor.committed(), &OverviewRequest::default());
    }
}

use std::io::Write;

use vidqueue_core::{AppViewModel, DeliveryOutcome, JobRowView, Notice};
use vidqueue_engine::Renderer;

/// Writes each view as a plain text block.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &AppViewModel) {
        // A closed stdout is not worth tearing the session down for.
        let _ = self.out.write_all(render_text(view).as_bytes());
        let _ = self.out.flush();
    }
}

pub fn render_text(view: &AppViewModel) -> String {
    let stats = &view.stats;
    let mut lines = vec![format!(
        "== total {} | completed {} | downloading {} | queued {} | failed {} ==",
        stats.total, stats.completed, stats.downloading, stats.queued, stats.failed
    )];
    if !stats.counters_consistent {
        lines.push(format!(
            "   (server counters imply {} failed)",
            stats.failed_by_subtraction
        ));
    }

    lines.push(format!("Folder: {}", view.directory_label));
    if !view.link_input.is_empty() {
        lines.push(format!("Link: {}", view.link_input));
    }
    if let Some(batch) = &view.batch_file {
        lines.push(format!("Batch file: {batch}"));
    }

    for row in &view.rows {
        lines.push(render_row(row));
        if let Some(error) = &row.error {
            lines.push(format!("      error: {error}"));
        }
    }

    let page = &view.page;
    lines.push(format!(
        "{} | page {}/{} | {} rows | delivered {}",
        page.summary(),
        page.page,
        page.total_pages,
        page.rows_per_page,
        view.delivered_count
    ));

    if let Some(notice) = &view.notice {
        let marker = match notice {
            Notice::Validation(_) => "!",
            Notice::Advisory(_) => "*",
        };
        lines.push(format!("{marker} {}", notice.text()));
    }

    let mut text = lines.join("\n");
    text.push_str("\n\n");
    text
}

fn render_row(row: &JobRowView) -> String {
    let mut line = format!(
        "  #{:<5} {:<12} {:>5.1}%  {:<9} {}",
        row.job_id, row.status_label, row.progress, row.platform, row.url
    );
    if let Some(filename) = &row.filename {
        line.push_str(&format!("  [{filename}]"));
    }
    for extra in [&row.size, &row.duration].into_iter().flatten() {
        line.push_str(&format!(" {extra}"));
    }
    match &row.delivery {
        Some(DeliveryOutcome::SavedToDirectory { path }) => {
            line.push_str(&format!("  -> {}", path.display()));
        }
        Some(DeliveryOutcome::FallbackTriggered { reason }) => {
            line.push_str(&format!("  -> save flow ({reason})"));
        }
        None => {}
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidqueue_core::{update, AppState, DirectoryHandle, Job, Msg, Snapshot, NO_DIRECTORY_LABEL};

    fn view_with(jobs: Vec<Job>) -> AppViewModel {
        let (state, _) = update(AppState::new(), Msg::SessionStarted);
        let (state, _) = update(state, Msg::SnapshotPolled(Ok(Snapshot::from_jobs(jobs))));
        state.view()
    }

    #[test]
    fn empty_queue_shows_placeholder_labels() {
        let text = render_text(&view_with(Vec::new()));
        assert!(text.contains("== total 0 |"));
        assert!(text.contains(NO_DIRECTORY_LABEL));
        assert!(text.contains("No items | page 1/1 | 50 rows"));
    }

    #[test]
    fn rows_show_status_platform_and_error() {
        let mut failed = Job::new(2, "https://vimeo.com/1", "Error");
        failed.error = Some("403 Forbidden".to_string());
        let text = render_text(&view_with(vec![
            Job::new(1, "https://www.youtube.com/watch?v=x", "Downloading").with_progress(140.0),
            failed,
            Job::new(3, "https://example.com/v", "Paused"),
        ]));

        assert!(text.contains("Downloading"));
        assert!(text.contains("100.0%"));
        assert!(text.contains("YouTube"));
        assert!(text.contains("error: 403 Forbidden"));
        assert!(text.contains("unknown"));
        assert!(text.contains("Showing 1 to 3 of 3 items"));
    }

    #[test]
    fn notice_and_directory_are_rendered() {
        let (state, _) = update(AppState::new(), Msg::SubmitLinkClicked);
        let (state, _) = update(
            state,
            Msg::DirectoryPicked(Ok(DirectoryHandle::new("/media/videos"))),
        );
        let text = render_text(&state.view());
        assert!(text.contains("Folder: videos"));
        assert!(text.contains("! Please enter a link"));
    }

    #[test]
    fn renderer_writes_to_sink() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&view_with(Vec::new()));
        let written = String::from_utf8(renderer.out).unwrap();
        assert!(written.ends_with("\n\n"));
    }
}

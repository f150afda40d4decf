//! Server-rendered page for the current view model snapshot.
//!
//! The resource section shows exactly one of: loading indicator, error
//! message, "no data" placeholder, or the extracted resume.

pub mod handlers;

use std::fmt::Write;

use crate::extraction::resource::ResourceView;
use crate::extraction::view_model::{FetchMode, Snapshot};
use crate::models::resume::Resume;

const PAGE_TITLE: &str = "Resume Extractor";

pub fn render_page(snapshot: &Snapshot) -> String {
    let loading = snapshot.resource.is_loading();
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    if loading {
        // No client script: poll until the extraction settles.
        html.push_str("<meta http-equiv=\"refresh\" content=\"1\">\n");
    }
    let _ = writeln!(html, "<title>{PAGE_TITLE}</title>\n</head>\n<body>");
    let _ = writeln!(html, "<main class=\"extractor\">\n<h1>{PAGE_TITLE}</h1>");

    render_form(&mut html, snapshot, loading);

    html.push_str("<section class=\"resource\">\n<h2>Resume Extraction</h2>\n");
    render_resource(&mut html, snapshot);
    html.push_str("</section>\n");

    let _ = writeln!(
        html,
        "<footer class=\"status\">\n<div>API Status: {}</div>\n<div>Mode: {}</div>\n</footer>",
        escape(&snapshot.status),
        snapshot.fetch_mode.label()
    );

    let raw = serde_json::to_string_pretty(&snapshot.resource).unwrap_or_default();
    let _ = writeln!(
        html,
        "<section class=\"raw\">\n<h3>Raw Resource Data:</h3>\n<pre>{}</pre>\n</section>",
        escape(&raw)
    );

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_form(html: &mut String, snapshot: &Snapshot, loading: bool) {
    let server_label = if loading {
        "Processing..."
    } else {
        "Refetch Resume (Server Action)"
    };
    let disabled = if loading { " disabled" } else { "" };

    html.push_str("<form method=\"post\" action=\"/refetch\">\n");
    // Parsers drop one newline right after <textarea>; this one absorbs it.
    let _ = writeln!(
        html,
        "<textarea name=\"text\" rows=\"14\" cols=\"60\">\n{}</textarea>",
        escape(&snapshot.input_text)
    );
    let _ = writeln!(
        html,
        "<button type=\"submit\" name=\"mode\" value=\"{}\"{disabled}>{server_label}</button>",
        mode_value(FetchMode::ServerInitiated)
    );
    let _ = writeln!(
        html,
        "<button type=\"submit\" name=\"mode\" value=\"{}\">Refetch Resume (Client-side)</button>",
        mode_value(FetchMode::ClientInitiated)
    );
    html.push_str("</form>\n");
}

fn render_resource(html: &mut String, snapshot: &Snapshot) {
    match snapshot.resource.view() {
        ResourceView::Loading => {
            html.push_str("<p class=\"loading\">Loading resume data...</p>\n");
        }
        ResourceView::Error(message) => {
            let _ = writeln!(html, "<p class=\"error\">Error: {}</p>", escape(message));
        }
        ResourceView::NoData => {
            html.push_str("<p class=\"no-data\">No resume data available.</p>\n");
        }
        ResourceView::Value(resume) => render_resume(html, resume),
    }
}

fn render_resume(html: &mut String, resume: &Resume) {
    html.push_str("<div class=\"resume\">\n");
    let _ = writeln!(
        html,
        "<div class=\"header\"><span class=\"avatar\">{}</span><h3>{}</h3><p>{}</p></div>",
        escape(&resume.initials()),
        escape(&resume.name),
        escape(&resume.email)
    );

    html.push_str("<div class=\"experience\">\n<h4>Experience</h4>\n<ul>\n");
    for entry in &resume.experience {
        let _ = writeln!(html, "<li>{}</li>", escape(entry));
    }
    html.push_str("</ul>\n</div>\n");

    html.push_str("<div class=\"skills\">\n<h4>Skills</h4>\n");
    for skill in &resume.skills {
        let _ = writeln!(html, "<span class=\"skill\">{}</span>", escape(skill));
    }
    html.push_str("</div>\n</div>\n");
}

fn mode_value(mode: FetchMode) -> &'static str {
    match mode {
        FetchMode::ServerInitiated => "server_initiated",
        FetchMode::ClientInitiated => "client_initiated",
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::extraction::error::ExtractionError;
    use crate::extraction::gateway::fakes::sample_resume;
    use crate::extraction::resource::AsyncResource;

    fn snapshot(resource: AsyncResource<Resume>) -> Snapshot {
        Snapshot {
            input_text: "Vaibhav Gupta".to_string(),
            fetch_mode: FetchMode::ServerInitiated,
            generation: 1,
            resource,
            status: "status".to_string(),
            updated_at: Utc::now(),
        }
    }

    const LOADING: &str = "Loading resume data...";
    const NO_DATA: &str = "No resume data available.";
    const RESUME_BLOCK: &str = "<div class=\"resume\">";
    const ERROR_BLOCK: &str = "<p class=\"error\">";

    #[test]
    fn test_idle_shows_only_no_data() {
        let html = render_page(&snapshot(AsyncResource::Idle));
        assert!(html.contains(NO_DATA));
        assert!(!html.contains(LOADING));
        assert!(!html.contains(ERROR_BLOCK));
        assert!(!html.contains(RESUME_BLOCK));
        assert!(!html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn test_pending_shows_only_loading_even_with_stale_value() {
        let html = render_page(&snapshot(AsyncResource::Ready(sample_resume()).begin()));
        assert!(html.contains(LOADING));
        assert!(!html.contains(NO_DATA));
        assert!(!html.contains(RESUME_BLOCK));
        assert!(html.contains("Processing..."));
        assert!(html.contains(" disabled>"));
        assert!(html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn test_failed_shows_message_and_no_data() {
        let html = render_page(&snapshot(AsyncResource::Failed(ExtractionError::Transport(
            "network down".into(),
        ))));
        assert!(html.contains("<p class=\"error\">Error: network down</p>"));
        assert!(!html.contains(RESUME_BLOCK));
        assert!(!html.contains(NO_DATA));
        assert!(!html.contains(LOADING));
    }

    #[test]
    fn test_ready_lists_experience_and_skills() {
        let html = render_page(&snapshot(AsyncResource::Ready(sample_resume())));
        assert!(html.contains(RESUME_BLOCK));
        assert!(html.contains("<span class=\"avatar\">VG</span>"));
        assert!(html.contains("<h3>Vaibhav Gupta</h3>"));
        assert!(html.contains("<p>vbv@boundaryml.com</p>"));
        assert!(html.contains("<li>Founder at BoundaryML</li>"));
        assert!(html.contains("<li>CV Engineer at Microsoft</li>"));
        assert!(html.contains("<span class=\"skill\">Rust</span>"));
        assert!(html.contains("<span class=\"skill\">C++</span>"));
        assert!(!html.contains(NO_DATA));
        assert!(html.contains("Refetch Resume (Server Action)"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut snap = snapshot(AsyncResource::Failed(ExtractionError::Backend(
            "<script>alert(1)</script>".into(),
        )));
        snap.input_text = "</textarea><b>".to_string();
        let html = render_page(&snap);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;/textarea&gt;&lt;b&gt;"));
    }

    #[test]
    fn test_textarea_keeps_leading_newline_of_input() {
        let mut snap = snapshot(AsyncResource::Idle);
        snap.input_text = "\n  Vaibhav Gupta".to_string();
        let html = render_page(&snap);
        assert!(html.contains("cols=\"60\">\n\n  Vaibhav Gupta</textarea>"));
    }

    #[test]
    fn test_footer_shows_status_and_mode() {
        let mut snap = snapshot(AsyncResource::Idle);
        snap.fetch_mode = FetchMode::ClientInitiated;
        let html = render_page(&snap);
        assert!(html.contains("API Status: status"));
        assert!(html.contains("Mode: Client-side"));
    }
}

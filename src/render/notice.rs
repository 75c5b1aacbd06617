use super::{escape, Page};
use crate::state::{Notice, NoticeKind};

fn icon(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Success => "✓",
        NoticeKind::Info => "ℹ",
        NoticeKind::Warning => "⚠",
        NoticeKind::Error => "✗",
    }
}

/// Dismissible banners, in the order given
pub fn banners(page: Page, notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|n| {
            format!(
                r#"
        <div class="alert alert-{tone} alert-dismissible fade show" role="alert">
            <strong>{icon}</strong> {message}
            <form method="post" action="/notices/{page}/{id}/dismiss" class="btn-close-form">
                <button type="submit" class="btn-close" aria-label="Close"></button>
            </form>
        </div>"#,
                tone = n.kind.tone(),
                icon = icon(n.kind),
                message = escape(&n.message),
                page = page.key(),
                id = n.id,
            )
        })
        .collect()
}

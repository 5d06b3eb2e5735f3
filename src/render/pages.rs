use super::{escape_html, RenderMode};
use crate::catalog_store::{ArtistDetail, ReleaseDetail};
use crate::releases::{Pagination, ReleasePage};

const APP_NAME: &str = "Catalog Browser";
const HTMX_SCRIPT: &str =
    r#"<script src="https://unpkg.com/htmx.org@2.0.4" crossorigin="anonymous"></script>"#;
const RELEASES_TARGET: &str = "releases";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavItem {
    Home,
    Releases,
    About,
    None,
}

impl NavItem {
    const LINKS: [(NavItem, &'static str, &'static str); 3] = [
        (NavItem::Home, "/", "Home"),
        (NavItem::Releases, "/releases", "Releases"),
        (NavItem::About, "/about", "About"),
    ];
}

/// Renders the catalog pages as HTML strings.
#[derive(Clone, Debug)]
pub struct Renderer {
    version: String,
    git_hash: String,
}

impl Renderer {
    pub fn new(version: impl Into<String>, git_hash: impl Into<String>) -> Self {
        Renderer {
            version: version.into(),
            git_hash: git_hash.into(),
        }
    }

    fn document(
        &self,
        mode: RenderMode,
        title: &str,
        active: NavItem,
        include_htmx: bool,
        content: String,
    ) -> String {
        if mode == RenderMode::Partial {
            return content;
        }

        let mut nav = String::from("<nav>\n");
        for (item, href, label) in NavItem::LINKS {
            let class = if item == active { r#" class="active""# } else { "" };
            nav.push_str(&format!("    <a href=\"{}\"{}>{}</a>\n", href, class, label));
        }
        nav.push_str("</nav>");

        format!(
            "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">
<title>{} | {}</title>
<link rel=\"stylesheet\" href=\"/static/style.css\">
{}
</head>
<body>
{}
<main>
{}
</main>
</body>
</html>
",
            escape_html(title),
            APP_NAME,
            if include_htmx { HTMX_SCRIPT } else { "" },
            nav,
            content
        )
    }

    pub fn index(&self, mode: RenderMode) -> String {
        let content = format!(
            "<h1>{}</h1>
<p>Browse the release catalog, or search it by release title, artist or year.</p>
<p><a href=\"/releases\">See all releases</a></p>",
            APP_NAME
        );
        self.document(mode, "Home Page", NavItem::Home, false, content)
    }

    pub fn about(&self, mode: RenderMode) -> String {
        let content = format!(
            "<h1>About</h1>
<p>{} is a read-only view over a release catalog, with full-text search across release and artist names.</p>
<dl>
    <dt>Version</dt><dd>{}</dd>
    <dt>Build</dt><dd>{}</dd>
</dl>",
            APP_NAME,
            escape_html(&self.version),
            escape_html(&self.git_hash)
        );
        self.document(mode, "About", NavItem::About, false, content)
    }

    /// The full page carries the search form around the listing fragment.
    /// Partial requests get only the fragment, which htmx swaps into
    /// `#releases`.
    pub fn releases(&self, mode: RenderMode, page: &ReleasePage) -> String {
        let fragment = releases_fragment(page);
        if mode == RenderMode::Partial {
            return fragment;
        }

        let term = page.filter.search_term().unwrap_or_default();
        let content = format!(
            "<h1>Releases</h1>
<form action=\"/releases\" method=\"get\" hx-get=\"/releases\" hx-target=\"#{target}\" hx-push-url=\"true\" hx-trigger=\"submit, input changed delay:300ms from:input[name=q]\">
    <input type=\"search\" name=\"q\" value=\"{term}\" placeholder=\"Search releases or artists\" aria-label=\"Search\">
    <input type=\"hidden\" name=\"page_size\" value=\"{limit}\">
    <button type=\"submit\">Search</button>
</form>
<div id=\"{target}\">
{fragment}
</div>",
            target = RELEASES_TARGET,
            term = escape_html(term),
            limit = page.pagination.limit,
            fragment = fragment
        );
        self.document(mode, "Releases", NavItem::Releases, true, content)
    }

    pub fn artist(&self, mode: RenderMode, detail: &ArtistDetail) -> String {
        let mut content = format!("<h1>{}</h1>\n", escape_html(&detail.artist.name));
        if detail.releases.is_empty() {
            content.push_str("<p class=\"empty\">No releases for this artist.</p>");
        } else {
            content.push_str("<h2>Releases</h2>\n<ul class=\"releases\">\n");
            for release in &detail.releases {
                content.push_str(&format!(
                    "    <li><a href=\"/release/{}\">{}</a> ({})</li>\n",
                    release.id,
                    escape_html(&release.title),
                    release.year
                ));
            }
            content.push_str("</ul>");
        }
        self.document(mode, "Artist Details", NavItem::None, false, content)
    }

    pub fn release(&self, mode: RenderMode, detail: &ReleaseDetail) -> String {
        let mut content = format!(
            "<h1>{}</h1>\n<p class=\"year\">{}</p>\n",
            escape_html(&detail.release.title),
            detail.release.year
        );
        if !detail.artists.is_empty() {
            let artists: Vec<String> = detail
                .artists
                .iter()
                .map(|artist| {
                    format!(
                        "<a href=\"/artist/{}\">{}</a>",
                        artist.id,
                        escape_html(&artist.name)
                    )
                })
                .collect();
            content.push_str(&format!("<p class=\"artists\">By {}</p>", artists.join(", ")));
        }
        self.document(mode, "Release Details", NavItem::None, false, content)
    }

    pub fn not_found(&self, mode: RenderMode, path: &str) -> String {
        let content = format!(
            "<h1>Not found</h1>\n<p>Nothing lives at <code>{}</code>.</p>",
            escape_html(path)
        );
        self.document(mode, "Not Found", NavItem::None, false, content)
    }
}

fn releases_fragment(page: &ReleasePage) -> String {
    if page.releases.is_empty() {
        return "<p class=\"empty\">No releases found.</p>".to_string();
    }

    let mut html = String::from(
        "<table class=\"releases\">
    <thead><tr><th>Year</th><th>Title</th><th>Artist</th></tr></thead>
    <tbody>
",
    );
    for row in &page.releases {
        html.push_str(&format!(
            "        <tr><td>{}</td><td><a href=\"/release/{}\">{}</a></td><td>{}</td></tr>\n",
            row.release_year,
            row.release_id,
            escape_html(&row.release_title),
            escape_html(&row.artist_name)
        ));
    }
    html.push_str("    </tbody>\n</table>\n");
    html.push_str(&pagination_nav(&page.pagination));
    html
}

fn pagination_nav(pagination: &Pagination) -> String {
    let link = |url: &Option<String>, rel: &str, label: &str| match url {
        Some(url) => {
            let url = escape_html(url);
            format!(
                "<a href=\"{url}\" rel=\"{rel}\" hx-get=\"{url}\" hx-target=\"#{target}\" hx-push-url=\"true\">{label}</a>",
                url = url,
                rel = rel,
                target = RELEASES_TARGET,
                label = label
            )
        }
        None => format!("<span class=\"disabled\">{}</span>", label),
    };

    format!(
        "<nav class=\"pagination\">
    {}
    <span class=\"summary\">Showing {} to {} of {} (page {} of {})</span>
    {}
</nav>",
        link(&pagination.prev_url, "prev", "Previous"),
        pagination.first,
        pagination.last,
        pagination.total_count,
        pagination.page,
        pagination.total_pages.max(1),
        link(&pagination.next_url, "next", "Next")
    )
}

//! Directory listing
//!
//! Plain HTML index of a directory that has no index file.

use std::io;
use std::path::Path;
use tokio::fs;

use super::resolve::percent_encode;

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Text shown to the user: directories get `/`, symlinks `@`
    pub fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Relative link target; directories (symlinked or not) keep the trailing `/`
    pub fn link(&self) -> String {
        if self.is_dir {
            percent_encode(&format!("{}/", self.name))
        } else {
            percent_encode(&self.name)
        }
    }
}

/// Read a directory, sorted case-insensitively by name
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_symlink = entry
            .file_type()
            .await
            .is_ok_and(|t| t.is_symlink());
        // Follows symlinks, so a link to a directory is listed as one
        let is_dir = fs::metadata(entry.path())
            .await
            .is_ok_and(|m| m.is_dir());

        entries.push(ListingEntry {
            name,
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the listing page for `display_path` (the decoded request path)
pub fn render(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));

    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_html(&entry.link()),
            escape_html(&entry.display_name())
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

/// Escape text for an HTML body or a double-quoted attribute
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_display_and_link() {
        let file = entry("notes 1.txt", false, false);
        assert_eq!(file.display_name(), "notes 1.txt");
        assert_eq!(file.link(), "notes%201.txt");

        let dir = entry("assets", true, false);
        assert_eq!(dir.display_name(), "assets/");
        assert_eq!(dir.link(), "assets/");

        let linked_dir = entry("latest", true, true);
        assert_eq!(linked_dir.display_name(), "latest@");
        assert_eq!(linked_dir.link(), "latest/");
    }

    #[test]
    fn test_render_escapes_names() {
        let html = render("/<docs>/", &[entry("a&b.html", false, false)]);
        assert!(html.contains("<title>Directory listing for /&lt;docs&gt;/</title>"));
        assert!(html.contains("<li><a href=\"a%26b.html\">a&amp;b.html</a></li>"));
    }

    #[test]
    fn test_render_empty_directory() {
        let html = render("/empty/", &[]);
        assert!(html.contains("<ul>\n</ul>"));
    }
}

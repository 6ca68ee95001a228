use std::path::Path;

use crate::error::Result;
use crate::output::{Output, OutputFile};
use crate::plugin::Plugin;
use crate::util;

/// Sitemap generation: emits `sitemap.xml` listing every page under a
/// fixed hostname, `lastmod` stamped with the build date.
///
/// Runs in activation order, so activate it after any plugin that moves
/// pages around (directory indexes) and the recorded locations are final.
pub struct Sitemap {
    hostname: String,
}

impl Sitemap {
    pub fn new<S: Into<String>>(hostname: S) -> Self {
        let mut hostname = hostname.into();
        while hostname.ends_with('/') {
            hostname.pop();
        }

        Sitemap { hostname }
    }

    fn page_url(&self, path: &Path) -> String {
        let mut path = util::url_path(path);
        if path == "index.html" {
            path.clear();
        } else if let Some(dir) = path.strip_suffix("/index.html") {
            path = format!("{dir}/");
        }

        format!("{}/{}", self.hostname, path)
    }
}

impl Plugin for Sitemap {
    fn name(&self) -> &'static str {
        "sitemap"
    }

    fn process(&self, output: &mut Output) -> Result<()> {
        let build_date = chrono::DateTime::<chrono::Utc>::from(std::time::SystemTime::now());
        let lastmod = build_date.format("%Y-%m-%d");

        let mut xml = String::from(concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        ));

        for file in output.files().iter().filter(|f| f.is_page()) {
            xml.push_str(&format!(
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{lastmod}</lastmod>\n  </url>\n",
                util::xml_escape(&self.page_url(&file.path)),
            ));
        }

        xml.push_str("</urlset>\n");
        output.push(OutputFile::text("sitemap.xml", xml));
        Ok(())
    }
}

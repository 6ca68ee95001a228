use std::path::{Component, Path};

/// Renders a relative path as a URL path: components joined with `/`,
/// regardless of the platform separator. `CurDir` components are dropped.
pub fn url_path(path: &Path) -> String {
    let mut output = String::with_capacity(path.as_os_str().len());
    for component in path.components() {
        if let Component::Normal(part) = component {
            if !output.is_empty() {
                output.push('/');
            }

            output.push_str(&part.to_string_lossy());
        }
    }

    output
}

/// Returns `true` if `path` has extension `ext`, compared ASCII
/// case-insensitively.
pub fn ext_is(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case(ext))
}

/// Escapes the five XML-reserved characters in `input`.
pub fn xml_escape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&apos;"),
            ch => output.push(ch),
        }
    }

    output
}

#[cfg(test)]
mod url_path_tests {
    use std::path::PathBuf;
    use super::{ext_is, url_path};

    #[test]
    fn test_url_path() {
        let path: PathBuf = ["how-tos", "foo", "index.html"].iter().collect();
        assert_eq!(url_path(&path), "how-tos/foo/index.html");

        assert_eq!(url_path(&PathBuf::from("about.html")), "about.html");
        assert_eq!(url_path(&PathBuf::from("./about.html")), "about.html");
        assert_eq!(url_path(&PathBuf::new()), "");
    }

    #[test]
    fn test_ext_is() {
        assert!(ext_is("a/b.html".as_ref(), "html"));
        assert!(ext_is("a/b.HTML".as_ref(), "html"));
        assert!(!ext_is("a/b.htm".as_ref(), "html"));
        assert!(!ext_is("a/html".as_ref(), "html"));
    }
}

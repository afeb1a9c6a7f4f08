//! Call-site identification
//!
//! The caller is resolved at compile time by the [`call_site!`](crate::call_site)
//! macro: it declares a nested function item and reads its path through
//! `std::any::type_name`. No stack walking and no frame counting are involved,
//! so wrapping the emitter in more layers never shifts the reported caller.

use std::fmt;

/// Short identity of the code that emitted a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
    type_name: String,
    method: String,
}

impl CallSite {
    pub fn new(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    /// Reduce a fully-qualified item path to `(short type, method)`.
    ///
    /// Accepts the raw `type_name` of the marker function expanded by
    /// `call_site!`, e.g. `app::net::Client::connect::__call_site_marker`
    /// or `<app::Client as app::Dial>::dial::{{closure}}::__call_site_marker`.
    /// Closure segments are skipped. For free functions the enclosing module
    /// stands in for the type.
    pub fn from_path(path: &str) -> Self {
        let path = path
            .strip_suffix(MARKER_SUFFIX)
            .unwrap_or(path);

        let mut segments = split_path(path);
        segments.retain(|s| *s != "{{closure}}");

        let method = segments.pop().unwrap_or("<unknown>");
        let owner = segments.pop().unwrap_or("<unknown>");

        Self::new(short_type_name(owner), method)
    }

    /// Enclosing type (or module) name, without its path prefix
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn into_parts(self) -> (String, String) {
        (self.type_name, self.method)
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.method)
    }
}

const MARKER_SUFFIX: &str = "::__call_site_marker";

/// Split on `::` outside of angle brackets.
fn split_path(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&path[start..]);
    segments.retain(|s| !s.is_empty());
    segments
}

/// `<a::Foo<T> as b::Trait>` -> `Foo`, `a::Foo<T>` -> `Foo`, `Foo` -> `Foo`
fn short_type_name(owner: &str) -> String {
    let owner = match owner.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        Some(inner) => inner.split(" as ").next().unwrap_or(inner),
        None => owner,
    };
    let owner = owner.split('<').next().unwrap_or(owner);
    let short = owner.rsplit("::").next().unwrap_or(owner);
    short.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Locator;

    impl Locator {
        fn locate(&self) -> CallSite {
            crate::call_site!()
        }
    }

    #[test]
    fn test_free_function_path() {
        let site = CallSite::from_path("app::net::connect::__call_site_marker");
        assert_eq!(site.type_name(), "net");
        assert_eq!(site.method(), "connect");
    }

    #[test]
    fn test_inherent_method_path() {
        let site = CallSite::from_path("app::net::Client::connect::__call_site_marker");
        assert_eq!(site, CallSite::new("Client", "connect"));
    }

    #[test]
    fn test_trait_method_path_with_closure() {
        let site = CallSite::from_path(
            "<app::Client<u8> as app::Dial>::dial::{{closure}}::{{closure}}::__call_site_marker",
        );
        assert_eq!(site, CallSite::new("Client", "dial"));
    }

    #[test]
    fn test_macro_reports_enclosing_function() {
        let site = crate::call_site!();
        assert_eq!(site.type_name(), "tests");
        assert_eq!(site.method(), "test_macro_reports_enclosing_function");
    }

    #[test]
    fn test_macro_inside_closure() {
        let site = (|| crate::call_site!())();
        assert_eq!(site.method(), "test_macro_inside_closure");
    }

    #[test]
    fn test_macro_inside_method() {
        assert_eq!(Locator.locate(), CallSite::new("Locator", "locate"));
    }

    #[test]
    fn test_display() {
        assert_eq!(CallSite::new("Client", "connect").to_string(), "Client.connect");
    }
}

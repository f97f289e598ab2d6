/// Policy for which archive kinds are served as containers.
///
/// Each recognized extension can be toggled independently; a disabled kind
/// is treated as an opaque file, so paths crossing into it fail to resolve
/// and enumeration does not descend into it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContainerOptions {
    /// Serve `.zip` files as containers.
    pub zip: bool,
    /// Serve `.jar` files (zip-format) as containers.
    pub jar: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            zip: true,
            jar: true,
        }
    }
}

impl ContainerOptions {
    /// Returns `true` if `name` carries a recognized, enabled container
    /// extension. A trailing separator is ignored.
    #[must_use]
    pub fn recognizes(&self, name: &str) -> bool {
        let name = vpath::trim_trailing(name);
        (self.zip && vpath::ends_with_ignore_case(name, ".zip"))
            || (self.jar && vpath::ends_with_ignore_case(name, ".jar"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_recognizes_both_kinds() {
        let options = ContainerOptions::default();
        assert!(options.recognizes("bundle.zip"));
        assert!(options.recognizes("Bundle.ZIP"));
        assert!(options.recognizes("lib.jar"));
        assert!(options.recognizes("dir/bundle.zip/"));
        assert!(!options.recognizes("archive.tar"));
        assert!(!options.recognizes("zip"));
    }

    #[test]
    fn disabled_kind_is_opaque() {
        let options = ContainerOptions {
            zip: false,
            jar: true,
        };
        assert!(!options.recognizes("bundle.zip"));
        assert!(options.recognizes("lib.jar"));
    }
}

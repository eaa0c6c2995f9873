/// Resolves a command argument against a session's virtual working directory.
///
/// The result is always an absolute, normalized virtual path: no `.` or `..`
/// components, no repeated or trailing slashes (except the root itself), and
/// never above `/`. Absolute arguments are normalized the same way, starting
/// from the root. No filesystem access happens here; callers check existence
/// after resolving.
///
/// # Arguments
///
/// * `current_dir` - The session's current virtual directory (already normalized).
/// * `arg` - The raw command argument, if any.
pub fn resolve(current_dir: &str, arg: Option<&str>) -> String {
    let arg = match arg {
        Some(arg) => arg,
        None => return current_dir.to_string(),
    };

    let mut resolved = if arg.starts_with('/') {
        String::from("/")
    } else {
        current_dir.to_string()
    };

    for segment in arg.split('/').filter(|s| !s.is_empty()) {
        match segment {
            "." => {}
            ".." => match resolved.rfind('/') {
                Some(0) | None => resolved = String::from("/"),
                Some(idx) => resolved.truncate(idx),
            },
            name => {
                if !resolved.ends_with('/') {
                    resolved.push('/');
                }
                resolved.push_str(name);
            }
        }
    }

    if resolved.is_empty() {
        resolved.push('/');
    }
    resolved
}

/// True if `path` is in the form `resolve` produces.
pub fn is_normalized(path: &str) -> bool {
    if path == "/" {
        return true;
    }
    path.starts_with('/')
        && !path.ends_with('/')
        && path[1..]
            .split('/')
            .all(|s| !s.is_empty() && s != "." && s != "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_argument_keeps_current_dir() {
        assert_eq!(resolve("/a/b", None), "/a/b");
        assert_eq!(resolve("/", None), "/");
        assert_eq!(resolve("/a", Some("")), "/a");
    }

    #[test]
    fn relative_segments() {
        assert_eq!(resolve("/a", Some("x/./y")), "/a/x/y");
        assert_eq!(resolve("/", Some("x")), "/x");
        assert_eq!(resolve("/a", Some("x//y/")), "/a/x/y");
        assert_eq!(resolve("/a", Some("my folder")), "/a/my folder");
    }

    #[test]
    fn parent_segments_clamp_at_root() {
        assert_eq!(resolve("/a/b", Some("../../c")), "/c");
        assert_eq!(resolve("/a/b", Some("..")), "/a");
        assert_eq!(resolve("/a", Some("..")), "/");
        assert_eq!(resolve("/", Some("..")), "/");
        assert_eq!(resolve("/a", Some("../../../..")), "/");
        assert_eq!(resolve("/a", Some("../../../b")), "/b");
    }

    #[test]
    fn absolute_arguments_are_normalized_too() {
        assert_eq!(resolve("/a/b", Some("/x")), "/x");
        assert_eq!(resolve("/a/b", Some("/x/../y/./z")), "/y/z");
        assert_eq!(resolve("/a/b", Some("/../..")), "/");
        assert_eq!(resolve("/a/b", Some("/")), "/");
        assert_eq!(resolve("/a/b", Some("//x//")), "/x");
    }

    #[test]
    fn every_mix_of_segments_stays_normalized() {
        let segments = [".", "..", "a", "bb", "", "c d"];
        let cwds = ["/", "/a", "/a/bb", "/x/y/z"];
        // All argument strings of up to four segments, relative and absolute.
        let mut args = vec![String::new()];
        for _ in 0..4 {
            let mut next = Vec::new();
            for prefix in &args {
                for seg in segments {
                    next.push(if prefix.is_empty() {
                        seg.to_string()
                    } else {
                        format!("{}/{}", prefix, seg)
                    });
                }
            }
            args.extend(next);
        }

        for cwd in cwds {
            for arg in &args {
                for candidate in [arg.clone(), format!("/{}", arg)] {
                    let out = resolve(cwd, Some(&candidate));
                    assert!(!out.is_empty());
                    assert!(is_normalized(&out), "{} + {:?} -> {:?}", cwd, candidate, out);
                }
            }
        }
    }

    #[test]
    fn normalized_form_check() {
        assert!(is_normalized("/"));
        assert!(is_normalized("/a/b"));
        assert!(!is_normalized(""));
        assert!(!is_normalized("a"));
        assert!(!is_normalized("/a/"));
        assert!(!is_normalized("/a/../b"));
        assert!(!is_normalized("/a//b"));
        assert!(!is_normalized("/."));
    }
}

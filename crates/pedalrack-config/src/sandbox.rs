//! Confinement of file references to an asset root.

use std::path::{Component, Path, PathBuf};

use crate::validation::{ValidationError, ValidationResult};

/// Resolve `name` against `root`, requiring an existing file strictly inside it.
///
/// The joined path is normalized lexically first, so `..` cannot climb out even
/// when the escaped target exists. An existing target is then canonicalized,
/// following symlinks, and checked against the canonical root again.
pub(crate) fn resolve_in_root(param: &str, root: &Path, name: &str) -> ValidationResult<PathBuf> {
    let violation = || {
        tracing::warn!(param, name, root = %root.display(), "file reference escapes asset root");
        ValidationError::SandboxViolation {
            param: param.to_string(),
            name: name.to_string(),
        }
    };
    let not_found = || ValidationError::FileNotFound {
        param: param.to_string(),
        name: name.to_string(),
    };

    let lexical_root = std::path::absolute(root).map_err(|_| not_found())?;
    let lexical_root = normalize(&lexical_root);
    let candidate = normalize(&lexical_root.join(name));
    if !is_strictly_inside(&candidate, &lexical_root) {
        return Err(violation());
    }

    let (Ok(real_root), Ok(real)) = (root.canonicalize(), candidate.canonicalize()) else {
        return Err(not_found());
    };
    if !is_strictly_inside(&real, &real_root) {
        return Err(violation());
    }
    if !real.is_file() {
        return Err(not_found());
    }
    Ok(real)
}

fn is_strictly_inside(path: &Path, root: &Path) -> bool {
    path != root && path.starts_with(root)
}

/// Resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        root: PathBuf,
        outside: PathBuf,
    }

    /// `<tmp>/impulses/room.wav` plus `<tmp>/secret.wav` next to the root.
    fn fixture() -> Fixture {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("impulses");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("room.wav"), b"RIFF").unwrap();
        let outside = tmp.path().join("secret.wav");
        fs::write(&outside, b"RIFF").unwrap();
        Fixture {
            _tmp: tmp,
            root,
            outside,
        }
    }

    fn is_violation(result: ValidationResult<PathBuf>) -> bool {
        matches!(result, Err(ValidationError::SandboxViolation { .. }))
    }

    #[test]
    fn resolves_existing_file() {
        let fx = fixture();
        let path = resolve_in_root("ir", &fx.root, "room.wav").unwrap();
        assert_eq!(path, fx.root.canonicalize().unwrap().join("room.wav"));
    }

    #[test]
    fn traversal_to_existing_file_is_rejected() {
        let fx = fixture();
        assert!(fx.outside.exists());
        assert!(is_violation(resolve_in_root("ir", &fx.root, "../secret.wav")));
        assert!(is_violation(resolve_in_root("ir", &fx.root, "sub/../../secret.wav")));
    }

    #[test]
    fn absolute_path_outside_is_rejected() {
        let fx = fixture();
        let abs = fx.outside.to_string_lossy().into_owned();
        assert!(is_violation(resolve_in_root("ir", &fx.root, &abs)));
    }

    #[test]
    fn sibling_with_shared_prefix_is_rejected() {
        let fx = fixture();
        let sibling = fx.root.with_file_name("impulses_evil");
        fs::create_dir(&sibling).unwrap();
        fs::write(sibling.join("x.wav"), b"RIFF").unwrap();
        assert!(is_violation(resolve_in_root("ir", &fx.root, "../impulses_evil/x.wav")));
    }

    #[test]
    fn root_itself_is_rejected() {
        let fx = fixture();
        assert!(is_violation(resolve_in_root("ir", &fx.root, ".")));
        assert!(is_violation(resolve_in_root("ir", &fx.root, "sub/..")));
    }

    #[test]
    fn inner_traversal_that_stays_inside_is_allowed() {
        let fx = fixture();
        fs::create_dir(fx.root.join("cabs")).unwrap();
        let path = resolve_in_root("ir", &fx.root, "cabs/../room.wav").unwrap();
        assert!(path.ends_with("room.wav"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let fx = fixture();
        assert_eq!(
            resolve_in_root("ir", &fx.root, "hall.wav").unwrap_err(),
            ValidationError::FileNotFound {
                param: "ir".to_string(),
                name: "hall.wav".to_string(),
            }
        );
    }

    #[test]
    fn directory_is_not_a_file() {
        let fx = fixture();
        fs::create_dir(fx.root.join("cabs")).unwrap();
        assert!(matches!(
            resolve_in_root("ir", &fx.root, "cabs"),
            Err(ValidationError::FileNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_out_of_root_is_rejected() {
        let fx = fixture();
        std::os::unix::fs::symlink(&fx.outside, fx.root.join("link.wav")).unwrap();
        assert!(is_violation(resolve_in_root("ir", &fx.root, "link.wav")));
    }

    #[test]
    fn normalize_pops_parents() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize(Path::new("/../x")), PathBuf::from("/x"));
    }
}

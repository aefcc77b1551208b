//! Providers of the GLSL text fragments the composer stitches together.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use fractview_core::FractalKind;
use tracing::debug;

use crate::error::RenderError;

/// Which piece of program text is being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentRole {
    Vertex,
    Variables,
    Helpers,
    Coloring,
    Kernel(FractalKind),
}

impl FragmentRole {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Vertex => "quad.vert",
            Self::Variables => "variables.glsl",
            Self::Helpers => "helpers.glsl",
            Self::Coloring => "coloring.glsl",
            Self::Kernel(FractalKind::Mandelbrot) => "mandelbrot.glsl",
            Self::Kernel(FractalKind::Julia) => "julia.glsl",
        }
    }
}

/// Source of opaque UTF-8 shader text, keyed by role.
pub trait FragmentSource {
    fn fragment(&self, role: FragmentRole) -> crate::Result<Cow<'_, str>>;
}

/// Fragments compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFragments;

impl FragmentSource for BuiltinFragments {
    fn fragment(&self, role: FragmentRole) -> crate::Result<Cow<'_, str>> {
        let text = match role {
            FragmentRole::Vertex => include_str!("../shaders/quad.vert"),
            FragmentRole::Variables => include_str!("../shaders/variables.glsl"),
            FragmentRole::Helpers => include_str!("../shaders/helpers.glsl"),
            FragmentRole::Coloring => include_str!("../shaders/coloring.glsl"),
            FragmentRole::Kernel(FractalKind::Mandelbrot) => {
                include_str!("../shaders/mandelbrot.glsl")
            }
            FragmentRole::Kernel(FractalKind::Julia) => include_str!("../shaders/julia.glsl"),
        };
        Ok(Cow::Borrowed(text))
    }
}

/// Fragments read from a directory. Each file is read when a program using it
/// is first composed; composed text is cached for the life of the engine.
#[derive(Debug, Clone)]
pub struct DirectoryFragments {
    dir: PathBuf,
}

impl DirectoryFragments {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FragmentSource for DirectoryFragments {
    fn fragment(&self, role: FragmentRole) -> crate::Result<Cow<'_, str>> {
        let path = self.dir.join(role.file_name());
        debug!(path = %path.display(), "Reading shader fragment");
        std::fs::read_to_string(&path)
            .map(Cow::Owned)
            .map_err(|source| RenderError::Fragment { path, source })
    }
}

impl<S: FragmentSource + ?Sized> FragmentSource for Box<S> {
    fn fragment(&self, role: FragmentRole) -> crate::Result<Cow<'_, str>> {
        (**self).fragment(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: [FragmentRole; 6] = [
        FragmentRole::Vertex,
        FragmentRole::Variables,
        FragmentRole::Helpers,
        FragmentRole::Coloring,
        FragmentRole::Kernel(FractalKind::Mandelbrot),
        FragmentRole::Kernel(FractalKind::Julia),
    ];

    #[test]
    fn builtin_provides_every_role() {
        for role in ROLES {
            let text = BuiltinFragments.fragment(role).unwrap();
            assert!(!text.trim().is_empty(), "{role:?} is empty");
        }
    }

    #[test]
    fn kernels_define_their_iteration_function() {
        for kind in FractalKind::ALL {
            let text = BuiltinFragments.fragment(FragmentRole::Kernel(kind)).unwrap();
            assert!(text.contains(&format!("iterate{}(", kind.label())));
        }
    }

    #[test]
    fn directory_reads_files_by_role() {
        let dir = std::env::temp_dir().join(format!("fractview-fragments-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("helpers.glsl"), "// custom helpers").unwrap();

        let source = DirectoryFragments::new(&dir);
        assert_eq!(
            source.fragment(FragmentRole::Helpers).unwrap(),
            "// custom helpers"
        );
        let err = source.fragment(FragmentRole::Coloring).unwrap_err();
        assert!(matches!(err, RenderError::Fragment { ref path, .. } if path.ends_with("coloring.glsl")));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

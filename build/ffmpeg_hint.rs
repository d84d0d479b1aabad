//! FFmpeg discovery hints for Windows builds.
//!
//! `ffmpeg-sys-next` finds FFmpeg on its own; on Windows that usually means
//! vcpkg, which fails quietly when the triplet or linkage is wrong. The build
//! script turns the relevant environment into at most one [`Hint`].

use std::{
    env,
    fmt::{self, Display, Formatter},
    path::{Path, PathBuf},
};

/// Variables whose change must re-run the build script.
pub const WATCHED_VARS: [&str; 4] = [
    "FFMPEG_DIR",
    "VCPKG_ROOT",
    "VCPKGRS_DYNAMIC",
    "VCPKGRS_TRIPLET",
];

const DEFAULT_TRIPLET: &str = "x64-windows";

/// The slice of the build environment FFmpeg discovery depends on.
#[derive(Debug, Clone, Default)]
pub struct BuildEnv {
    pub target_os: String,
    pub ffmpeg_dir: Option<PathBuf>,
    pub vcpkg_root: Option<PathBuf>,
    pub vcpkg_triplet: Option<String>,
    pub vcpkg_dynamic: bool,
}

impl BuildEnv {
    pub fn from_env() -> Self {
        Self {
            target_os: env::var("CARGO_CFG_TARGET_OS").unwrap_or_default(),
            ffmpeg_dir: env::var_os("FFMPEG_DIR").map(PathBuf::from),
            vcpkg_root: env::var_os("VCPKG_ROOT").map(PathBuf::from),
            vcpkg_triplet: env::var("VCPKGRS_TRIPLET").ok(),
            vcpkg_dynamic: env::var_os("VCPKGRS_DYNAMIC").is_some(),
        }
    }

    /// Where vcpkg installs packages for the selected triplet.
    pub fn vcpkg_install_dir(&self) -> Option<PathBuf> {
        let triplet = self.vcpkg_triplet.as_deref().unwrap_or(DEFAULT_TRIPLET);
        self.vcpkg_root
            .as_ref()
            .map(|root| root.join("installed").join(triplet))
    }
}

/// Advice printed as a cargo warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    /// Neither FFMPEG_DIR nor VCPKG_ROOT is set.
    Unconfigured,
    /// vcpkg has an install for the triplet but FFMPEG_DIR does not point at it.
    VcpkgFound { dir: PathBuf, dynamic: bool },
    /// VCPKG_ROOT is set but nothing is installed for the triplet.
    VcpkgMissing { dir: PathBuf },
}

impl Display for Hint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Hint::Unconfigured => write!(
                f,
                "slidesift needs FFmpeg; set FFMPEG_DIR, or VCPKG_ROOT after `vcpkg install ffmpeg`"
            ),
            Hint::VcpkgFound { dir, dynamic } => {
                write!(f, "using vcpkg FFmpeg at {}; set FFMPEG_DIR to pin it", dir.display())?;
                if !dynamic {
                    write!(f, " (VCPKGRS_DYNAMIC=1 for a dynamic build)")?;
                }
                Ok(())
            }
            Hint::VcpkgMissing { dir } => write!(
                f,
                "no vcpkg FFmpeg under {}; check VCPKGRS_TRIPLET",
                dir.display()
            ),
        }
    }
}

/// The hint for `build_env`, if any. `exists` reports whether a directory is
/// present.
pub fn diagnose(build_env: &BuildEnv, exists: impl Fn(&Path) -> bool) -> Option<Hint> {
    if build_env.target_os != "windows" || build_env.ffmpeg_dir.is_some() {
        return None;
    }

    let Some(dir) = build_env.vcpkg_install_dir() else {
        return Some(Hint::Unconfigured);
    };

    if exists(&dir) {
        Some(Hint::VcpkgFound {
            dir,
            dynamic: build_env.vcpkg_dynamic,
        })
    } else {
        Some(Hint::VcpkgMissing { dir })
    }
}
